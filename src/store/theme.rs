//! The light/dark preference.
//!
//! The persisted value is the source of truth on start-up; after that the presentation
//! surface is, since [`ThemeStore::toggle`] flips whatever the surface currently shows.

use crate::{
    option::ThemeStoreOptions,
    presentation::ColorSchemeHost,
    storage::{KEY_STORAGE_THEME, ThemeStorage},
    util::observable::{Readable, Writable},
};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;
#[cfg(feature = "tracing")]
use tracing::{error, warn};

/// A color scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn is_dark(&self) -> bool {
        matches!(self, Theme::Dark)
    }

    /// Returns the other theme.
    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    fn from_dark_flag(dark: bool) -> Self {
        if dark { Theme::Dark } else { Theme::Light }
    }

    /// Interprets a persisted preference. Empty means unset; anything but `"dark"` renders light.
    fn from_persisted(value: &str) -> Option<Self> {
        if value.is_empty() {
            return None;
        }
        match value.parse() {
            Ok(theme) => Some(theme),
            Err(_e) => {
                #[cfg(feature = "tracing")]
                warn!("Unrecognized persisted theme, rendering light: {_e}");
                Some(Theme::Light)
            }
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The error returned when parsing a [`Theme`] from a string fails.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown theme: {0}")]
pub struct ParseThemeError(String);

impl FromStr for Theme {
    type Err = ParseThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(ParseThemeError(other.to_string())),
        }
    }
}

struct ThemeEnvironment {
    storage: Mutex<Box<dyn ThemeStorage>>,
    host: Mutex<Box<dyn ColorSchemeHost>>,
}

impl ThemeEnvironment {
    fn initial_theme(&self) -> Theme {
        let stored = match self.storage.lock().get(KEY_STORAGE_THEME) {
            Ok(stored) => stored,
            Err(_e) => {
                #[cfg(feature = "tracing")]
                error!("Could not read the persisted theme: {_e}");
                None
            }
        };

        stored
            .as_deref()
            .and_then(Theme::from_persisted)
            .unwrap_or_else(|| Theme::from_dark_flag(self.host.lock().prefers_dark()))
    }

    fn apply(&self, theme: Theme) {
        self.host.lock().set_dark(theme.is_dark());
    }

    fn persist(&self, theme: Theme) {
        if let Err(_e) = self.storage.lock().set(KEY_STORAGE_THEME, theme.as_str()) {
            #[cfg(feature = "tracing")]
            error!("Could not persist the theme: {_e}");
        }
    }
}

/// Reactive light/dark preference kept in sync with storage and the presentation surface.
///
/// A store built with [`ThemeStore::detached`] has nowhere to read from or apply to:
/// its operations do nothing and the theme stays [`Theme::Light`].
pub struct ThemeStore {
    theme: Writable<Theme>,
    env: Option<ThemeEnvironment>,
}

impl ThemeStore {
    /// Creates a store seeded from the persisted preference, or the system preference.
    ///
    /// Nothing is applied to the surface until [`ThemeStore::init`].
    pub fn new(options: ThemeStoreOptions) -> Self {
        let env = ThemeEnvironment {
            storage: Mutex::new(options.storage),
            host: Mutex::new(options.host),
        };
        Self {
            theme: Writable::new(env.initial_theme()),
            env: Some(env),
        }
    }

    /// Creates a store for contexts without persistence or presentation.
    pub fn detached() -> Self {
        Self {
            theme: Writable::new(Theme::Light),
            env: None,
        }
    }

    /// The current theme.
    pub fn theme(&self) -> Readable<Theme> {
        self.theme.readable()
    }

    /// Resolves the initial theme again and applies it to the surface.
    pub fn init(&self) {
        let Some(env) = &self.env else { return };
        let theme = env.initial_theme();
        env.apply(theme);
        self.theme.set(theme);
    }

    /// Flips the theme the surface currently shows, then persists it.
    pub fn toggle(&self) {
        let Some(env) = &self.env else { return };
        let current = Theme::from_dark_flag(env.host.lock().is_dark());
        self.commit(env, current.toggled());
    }

    /// Applies and persists `theme`.
    pub fn set_theme(&self, theme: Theme) {
        let Some(env) = &self.env else { return };
        self.commit(env, theme);
    }

    fn commit(&self, env: &ThemeEnvironment, theme: Theme) {
        env.apply(theme);
        env.persist(theme);
        self.theme.set(theme);
    }
}

impl fmt::Debug for ThemeStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeStore")
            .field("theme", &self.theme)
            .field("detached", &self.env.is_none())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        presentation::MemoryColorScheme,
        storage::{MemoryStorage, StorageError},
    };
    use serde_test::{Token, assert_tokens};

    fn store(storage: &MemoryStorage, host: &MemoryColorScheme) -> ThemeStore {
        ThemeStore::new(
            ThemeStoreOptions::builder()
                .storage(storage.clone())
                .host(host.clone())
                .build(),
        )
    }

    struct BrokenStorage;

    impl ThemeStorage for BrokenStorage {
        fn get(&mut self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::WebSys("unavailable".to_string()))
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::WebSys("unavailable".to_string()))
        }
    }

    #[test]
    fn theme_wire_form_is_lowercase() {
        assert_tokens(
            &Theme::Dark,
            &[Token::UnitVariant {
                name: "Theme",
                variant: "dark",
            }],
        );
        assert_eq!("light".parse::<Theme>(), Ok(Theme::Light));
        assert!("Dark".parse::<Theme>().is_err());
    }

    #[test]
    fn persisted_value_wins_over_system_preference() {
        let storage = MemoryStorage::with_entry(KEY_STORAGE_THEME, "light");
        let host = MemoryColorScheme::new(true);
        let store = store(&storage, &host);
        assert_eq!(store.theme().get(), Theme::Light);

        store.init();
        assert!(!host.is_dark());
        assert_eq!(store.theme().get(), Theme::Light);
    }

    #[test]
    fn system_preference_used_when_nothing_persisted() {
        let storage = MemoryStorage::new();
        let host = MemoryColorScheme::new(true);
        let store = store(&storage, &host);
        store.init();
        assert!(host.is_dark());
        assert_eq!(store.theme().get(), Theme::Dark);
        assert_eq!(storage.peek(KEY_STORAGE_THEME), None);
    }

    #[test]
    fn light_is_the_last_resort() {
        let storage = MemoryStorage::with_entry(KEY_STORAGE_THEME, "");
        let host = MemoryColorScheme::new(false);
        let store = store(&storage, &host);
        store.init();
        assert_eq!(store.theme().get(), Theme::Light);
        assert!(!host.is_dark());
    }

    #[test]
    fn unrecognized_persisted_value_renders_light() {
        let storage = MemoryStorage::with_entry(KEY_STORAGE_THEME, "sepia");
        let host = MemoryColorScheme::new(true);
        let store = store(&storage, &host);
        store.init();
        assert_eq!(store.theme().get(), Theme::Light);
        assert!(!host.is_dark());
    }

    #[test]
    fn toggle_flips_surface_storage_and_observable() {
        let storage = MemoryStorage::new();
        let host = MemoryColorScheme::new(false);
        let store = store(&storage, &host);
        store.init();

        store.toggle();
        assert!(host.is_dark());
        assert_eq!(storage.peek(KEY_STORAGE_THEME).as_deref(), Some("dark"));
        assert_eq!(store.theme().get(), Theme::Dark);

        store.toggle();
        assert!(!host.is_dark());
        assert_eq!(storage.peek(KEY_STORAGE_THEME).as_deref(), Some("light"));
        assert_eq!(store.theme().get(), Theme::Light);
    }

    #[test]
    fn toggle_reads_the_surface_not_the_observable() {
        let storage = MemoryStorage::with_entry(KEY_STORAGE_THEME, "dark");
        let mut host = MemoryColorScheme::new(false);
        let store = store(&storage, &host);
        assert_eq!(store.theme().get(), Theme::Dark);

        // Not initialized: the surface still shows light.
        host.set_dark(false);
        store.toggle();
        assert_eq!(store.theme().get(), Theme::Dark);
        assert!(host.is_dark());
    }

    #[test]
    fn set_theme_applies_and_persists() {
        let storage = MemoryStorage::new();
        let host = MemoryColorScheme::new(false);
        let store = store(&storage, &host);
        store.set_theme(Theme::Dark);
        assert!(host.is_dark());
        assert_eq!(storage.peek(KEY_STORAGE_THEME).as_deref(), Some("dark"));
        assert_eq!(store.theme().get(), Theme::Dark);
    }

    #[test]
    fn storage_failures_do_not_interrupt_theme_changes() {
        let host = MemoryColorScheme::new(true);
        let store = ThemeStore::new(
            ThemeStoreOptions::builder()
                .storage(Box::new(BrokenStorage) as Box<dyn ThemeStorage>)
                .host(host.clone())
                .build(),
        );
        assert_eq!(store.theme().get(), Theme::Dark);
        store.toggle();
        assert_eq!(store.theme().get(), Theme::Dark);
        assert!(host.is_dark());
    }

    #[test]
    fn detached_store_is_inert() {
        let store = ThemeStore::detached();
        store.init();
        store.toggle();
        store.set_theme(Theme::Dark);
        assert_eq!(store.theme().get(), Theme::Light);
    }
}
