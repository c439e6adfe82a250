//! Client and store configuration types.
//!
//! This module provides the configuration structures for the notes client and the
//! theme store's persistence and presentation backends.

use crate::{presentation::ColorSchemeHost, storage::ThemeStorage};
use std::{fmt, time::Duration};

/// Options for [`NotesClient::new_with_options`](crate::NotesClient::new_with_options).
#[derive(Clone, Debug, Default, bon::Builder)]
#[builder(on(String, into))]
pub struct NotesClientOptions {
    /// The base URL of the REST backend, without the `/notes` suffix.
    /// If not provided, [`DEFAULT_BASE_URL`](crate::client::DEFAULT_BASE_URL) is used.
    pub base_url: Option<String>,

    /// Per-request timeout. If not provided, the transport's defaults apply.
    pub timeout: Option<Duration>,

    /// A pre-configured HTTP client, e.g. one sharing a connection pool with the rest of the app.
    pub http_client: Option<reqwest::Client>,
}

/// Options for [`ThemeStore::new`](crate::store::ThemeStore::new).
#[derive(bon::Builder)]
pub struct ThemeStoreOptions {
    /// Where the theme preference is persisted.
    #[builder(into)]
    pub storage: Box<dyn ThemeStorage>,
    /// The surface the dark flag is applied to and the system preference is read from.
    #[builder(into)]
    pub host: Box<dyn ColorSchemeHost>,
}

impl fmt::Debug for ThemeStoreOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeStoreOptions")
            .field("storage", &"<dyn ThemeStorage>")
            .field("host", &"<dyn ColorSchemeHost>")
            .finish()
    }
}
