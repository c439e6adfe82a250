//! Reactive stores for the UI layer.
//!
//! Stores are constructed explicitly and owned by the application; there are no global
//! instances. Each store exposes [`Readable`](crate::observable::Readable) handles for its
//! state and action methods that change it.

pub mod notes;
pub mod theme;

pub use notes::{DEFAULT_ERROR_MESSAGE, NotesStore};
pub use theme::{ParseThemeError, Theme, ThemeStore};
