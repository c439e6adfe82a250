//! The surface a theme is applied to.

use parking_lot::Mutex;
use std::sync::Arc;

#[cfg(all(target_family = "wasm", feature = "wasm-js"))]
pub mod wasm_js;

#[cfg(all(target_family = "wasm", feature = "wasm-js"))]
pub use wasm_js::DocumentColorScheme;

/// Trait for the presentation layer that renders light or dark.
pub trait ColorSchemeHost: Send {
    /// Whether the ambient system preference asks for a dark color scheme.
    fn prefers_dark(&self) -> bool;

    /// Whether dark mode is currently active on the surface.
    fn is_dark(&self) -> bool;

    /// Activates or deactivates dark mode on the surface.
    fn set_dark(&mut self, dark: bool);
}

#[derive(Debug, Default)]
struct ColorSchemeState {
    prefers_dark: bool,
    dark: bool,
}

/// In-process [`ColorSchemeHost`] with a fixed system preference. Clones share the same flag.
#[derive(Debug, Default, Clone)]
pub struct MemoryColorScheme {
    state: Arc<Mutex<ColorSchemeState>>,
}

impl MemoryColorScheme {
    /// Creates a host whose system preference is `prefers_dark` and whose dark flag is off.
    pub fn new(prefers_dark: bool) -> Self {
        Self {
            state: Arc::new(Mutex::new(ColorSchemeState {
                prefers_dark,
                dark: false,
            })),
        }
    }
}

impl ColorSchemeHost for MemoryColorScheme {
    fn prefers_dark(&self) -> bool {
        self.state.lock().prefers_dark
    }

    fn is_dark(&self) -> bool {
        self.state.lock().dark
    }

    fn set_dark(&mut self, dark: bool) {
        self.state.lock().dark = dark;
    }
}

impl From<MemoryColorScheme> for Box<dyn ColorSchemeHost> {
    fn from(host: MemoryColorScheme) -> Self {
        Box::new(host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_color_scheme_shares_flag_between_clones() {
        let host = MemoryColorScheme::new(true);
        let mut handle = host.clone();
        assert!(host.prefers_dark());
        assert!(!host.is_dark());
        handle.set_dark(true);
        assert!(host.is_dark());
    }
}
