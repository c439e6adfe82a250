//! Client-side plumbing for a notes application backed by a REST API.
//!
//! The crate has three parts:
//!
//! - [`NotesClient`], a typed client for the backend's `/notes` resource.
//! - [`NotesStore`], reactive notes state that calls a [`NotesBackend`] and reconciles
//!   its collection, loading flag and error message after every call.
//! - [`ThemeStore`], a reactive light/dark preference kept in sync with a
//!   [`ThemeStorage`] and a [`ColorSchemeHost`].
//!
//! # Usage
//! ```no_run
//! use notes_client::{NoteData, NotesClient, NotesStore};
//!
//! # async fn run() -> Result<(), notes_client::ApiError> {
//! let store = NotesStore::new(NotesClient::new()?);
//! let _subscription = store.notes().subscribe(|notes: &Vec<notes_client::Note>| {
//!     println!("{} notes", notes.len());
//! });
//!
//! store.load_notes().await;
//! store.create_note(NoteData::new().with("title", "Groceries")).await?;
//! # Ok(())
//! # }
//! ```
//!
//! In a browser, enable the `wasm-js` feature to persist the theme in `localStorage` and
//! apply it as the `dark` class on the document element.

pub mod api;
pub mod client;
pub mod option;
pub mod presentation;
pub mod storage;
pub mod store;
mod util;

pub use api::{Note, NoteData, NoteId};
pub use client::{ApiError, NotesBackend, NotesClient};
pub use option::{NotesClientOptions, ThemeStoreOptions};
pub use presentation::{ColorSchemeHost, MemoryColorScheme};
pub use storage::{MemoryStorage, StorageError, ThemeStorage};
pub use store::{NotesStore, Theme, ThemeStore};
pub use util::{callback, observable};
