//! The notes list and its request state.
//!
//! Every action follows the same sequence: raise the loading flag and clear the
//! previous error, make one backend call, reconcile the collection on success or
//! record the error message on failure, then lower the loading flag.
//!
//! Overlapping actions on the same store are not serialized. Each one reconciles the
//! collection under the container's lock, but the loading flag is shared, so an
//! action that finishes early lowers it while a later one may still be in flight.

use crate::{
    api::{Note, NoteData, NoteId},
    client::{ApiError, NotesBackend},
    util::observable::{Readable, Writable},
};
use serde_json::Value;
use std::fmt;
#[cfg(feature = "tracing")]
use tracing::error;

/// The message recorded when a failure carries no text of its own.
pub const DEFAULT_ERROR_MESSAGE: &str = "An error occurred";

/// Reactive notes state bound to a [`NotesBackend`].
#[derive(Clone)]
pub struct NotesStore<B> {
    backend: B,
    notes: Writable<Vec<Note>>,
    loading: Writable<bool>,
    error: Writable<Option<String>>,
}

impl<B: NotesBackend> NotesStore<B> {
    /// Creates an empty store that talks to `backend`.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            notes: Writable::new(Vec::new()),
            loading: Writable::new(false),
            error: Writable::new(None),
        }
    }

    /// The notes, newest first.
    pub fn notes(&self) -> Readable<Vec<Note>> {
        self.notes.readable()
    }

    /// Whether a request is in flight.
    pub fn loading(&self) -> Readable<bool> {
        self.loading.readable()
    }

    /// The message of the most recent failure.
    pub fn error(&self) -> Readable<Option<String>> {
        self.error.readable()
    }

    /// Replaces the collection with the backend's notes.
    ///
    /// Failures are not returned; they are only visible through [`NotesStore::error`].
    pub async fn load_notes(&self) {
        let _loading = self.begin();
        match self.backend.list_notes().await {
            Ok(notes) => self.notes.set(notes),
            Err(e) => {
                self.record_failure(e);
            }
        }
    }

    /// Creates a note and puts it at the front of the collection.
    pub async fn create_note(&self, data: NoteData) -> Result<Note, ApiError> {
        let _loading = self.begin();
        let note = self
            .backend
            .create_note(data)
            .await
            .map_err(|e| self.record_failure(e))?;
        self.notes.update(|notes| notes.insert(0, note.clone()));
        Ok(note)
    }

    /// Replaces the note with `id` by the record the backend returns.
    ///
    /// Other notes keep their contents and positions.
    pub async fn update_note(&self, id: &NoteId, data: NoteData) -> Result<Note, ApiError> {
        let _loading = self.begin();
        let updated = self
            .backend
            .update_note(id, data)
            .await
            .map_err(|e| self.record_failure(e))?;
        self.notes.update(|notes| {
            notes
                .iter_mut()
                .filter(|note| note.id == *id)
                .for_each(|note| *note = updated.clone());
        });
        Ok(updated)
    }

    /// Deletes the note with `id` and drops it from the collection.
    pub async fn delete_note(&self, id: &NoteId) -> Result<(), ApiError> {
        let _loading = self.begin();
        let _ack: Value = self
            .backend
            .delete_note(id)
            .await
            .map_err(|e| self.record_failure(e))?;
        self.notes.update(|notes| notes.retain(|note| note.id != *id));
        Ok(())
    }

    /// Clears the error message. The collection and loading flag are untouched.
    pub fn clear_error(&self) {
        self.error.set(None);
    }

    fn begin(&self) -> LoadingGuard {
        self.loading.set(true);
        self.error.set(None);
        LoadingGuard {
            loading: self.loading.clone(),
        }
    }

    fn record_failure<E: fmt::Display>(&self, err: E) -> E {
        let message = error_message(&err);
        #[cfg(feature = "tracing")]
        error!("{message}");
        self.error.set(Some(message));
        err
    }
}

impl<B> fmt::Debug for NotesStore<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotesStore")
            .field("notes", &self.notes)
            .field("loading", &self.loading)
            .field("error", &self.error)
            .finish()
    }
}

/// Lowers the loading flag when the action finishes, including when its future is dropped.
struct LoadingGuard {
    loading: Writable<bool>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.loading.set(false);
    }
}

fn error_message<E: fmt::Display>(err: &E) -> String {
    let message = err.to_string();
    if message.is_empty() {
        DEFAULT_ERROR_MESSAGE.to_string()
    } else {
        message
    }
}
