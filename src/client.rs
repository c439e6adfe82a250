//! HTTP client for the notes REST backend.

use crate::{
    api::{Note, NoteData, NoteId},
    option::NotesClientOptions,
};
use chrono::{SecondsFormat, Utc};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::{future::Future, sync::Arc, time::Duration};
use thiserror::Error;
#[cfg(feature = "tracing")]
use tracing::{debug, error};
use url::Url;

/// The mock API the notes app talks to when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://684e9802f0c9c9848d288efd.mockapi.io/api/v1";

const NOTES_PATH: &str = "notes";

/// The error type for the notes client.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never got a response.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// A response arrived with a status outside the 2xx range.
    #[error("HTTP error! status: {status}")]
    Http { status: u16 },
    /// A successful response carried a body that is not the expected JSON.
    #[error("Failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),
    /// The configured base URL could not be parsed.
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
    /// A failure raised by a [`NotesBackend`] implementation other than
    /// [`NotesClient`], such as a cache or an in-process backend. The message is shown
    /// verbatim, and the notes store records it as the error message.
    #[error("{0}")]
    Unexpected(String),
}

impl ApiError {
    /// Returns the HTTP status for [`ApiError::Http`].
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status } => Some(*status),
            _ => None,
        }
    }
}

/// The four note operations the stores depend on.
///
/// [`NotesClient`] is the HTTP implementation; anything else that speaks the same
/// contract (an in-memory fake, a cache in front of the client) can be handed to a
/// [`NotesStore`](crate::store::NotesStore) instead.
pub trait NotesBackend {
    /// Fetches every note.
    fn list_notes(&self) -> impl Future<Output = Result<Vec<Note>, ApiError>>;

    /// Creates a note and returns it with its backend-assigned id.
    fn create_note(&self, data: NoteData) -> impl Future<Output = Result<Note, ApiError>>;

    /// Replaces a note and returns the stored record.
    fn update_note(
        &self,
        id: &NoteId,
        data: NoteData,
    ) -> impl Future<Output = Result<Note, ApiError>>;

    /// Deletes a note and returns the acknowledgment body.
    fn delete_note(&self, id: &NoteId) -> impl Future<Output = Result<Value, ApiError>>;
}

impl<B: NotesBackend> NotesBackend for Arc<B> {
    fn list_notes(&self) -> impl Future<Output = Result<Vec<Note>, ApiError>> {
        (**self).list_notes()
    }

    fn create_note(&self, data: NoteData) -> impl Future<Output = Result<Note, ApiError>> {
        (**self).create_note(data)
    }

    fn update_note(
        &self,
        id: &NoteId,
        data: NoteData,
    ) -> impl Future<Output = Result<Note, ApiError>> {
        (**self).update_note(id, data)
    }

    fn delete_note(&self, id: &NoteId) -> impl Future<Output = Result<Value, ApiError>> {
        (**self).delete_note(id)
    }
}

/// Typed client for the `/notes` resource.
#[derive(Clone, Debug)]
pub struct NotesClient {
    base_url: String,
    http: reqwest::Client,
    timeout: Option<Duration>,
}

impl NotesClient {
    /// Creates a new [`NotesClient`] pointing at [`DEFAULT_BASE_URL`].
    pub fn new() -> Result<Self, ApiError> {
        Self::new_with_options(NotesClientOptions::default())
    }

    /// Creates a new [`NotesClient`] with the given options.
    pub fn new_with_options(options: NotesClientOptions) -> Result<Self, ApiError> {
        let base_url = options
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string();
        Url::parse(&base_url)?;

        Ok(Self {
            base_url,
            http: options.http_client.unwrap_or_default(),
            timeout: options.timeout,
        })
    }

    /// Returns the base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches every note.
    pub async fn list_notes(&self) -> Result<Vec<Note>, ApiError> {
        let request = self.request(Method::GET, self.collection_url());
        logged(self.send_json(request).await, "fetching notes")
    }

    /// Stamps `createdAt` with the current time and creates the note.
    ///
    /// Any `createdAt` already present in `data` is overwritten.
    pub async fn create_note(&self, data: NoteData) -> Result<Note, ApiError> {
        let data = data.stamped(now_iso8601());
        let request = self
            .request(Method::POST, self.collection_url())
            .json(&data);
        logged(self.send_json(request).await, "creating note")
    }

    /// Replaces the note with `id` by `data`. There are no partial updates.
    pub async fn update_note(&self, id: &NoteId, data: NoteData) -> Result<Note, ApiError> {
        let request = self.request(Method::PUT, self.note_url(id)).json(&data);
        logged(self.send_json(request).await, "updating note")
    }

    /// Deletes the note with `id` and returns whatever the backend answered.
    ///
    /// An empty body is returned as [`Value::Null`].
    pub async fn delete_note(&self, id: &NoteId) -> Result<Value, ApiError> {
        let request = self.request(Method::DELETE, self.note_url(id));
        let result = match self.send(request).await {
            Ok(body) if body.iter().all(u8::is_ascii_whitespace) => Ok(Value::Null),
            Ok(body) => serde_json::from_slice(&body).map_err(ApiError::from),
            Err(e) => Err(e),
        };
        logged(result, "deleting note")
    }

    fn collection_url(&self) -> String {
        format!("{}/{}", self.base_url, NOTES_PATH)
    }

    fn note_url(&self, id: &NoteId) -> String {
        format!("{}/{}/{}", self.base_url, NOTES_PATH, id)
    }

    fn request(&self, method: Method, url: String) -> RequestBuilder {
        let request = self.http.request(method, url);
        match self.timeout {
            Some(timeout) => request.timeout(timeout),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Vec<u8>, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        #[cfg(feature = "tracing")]
        debug!("{} answered {}", response.url(), status);

        if !status.is_success() {
            return Err(ApiError::Http {
                status: status.as_u16(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let body = self.send(request).await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

impl NotesBackend for NotesClient {
    fn list_notes(&self) -> impl Future<Output = Result<Vec<Note>, ApiError>> {
        NotesClient::list_notes(self)
    }

    fn create_note(&self, data: NoteData) -> impl Future<Output = Result<Note, ApiError>> {
        NotesClient::create_note(self, data)
    }

    fn update_note(
        &self,
        id: &NoteId,
        data: NoteData,
    ) -> impl Future<Output = Result<Note, ApiError>> {
        NotesClient::update_note(self, id, data)
    }

    fn delete_note(&self, id: &NoteId) -> impl Future<Output = Result<Value, ApiError>> {
        NotesClient::delete_note(self, id)
    }
}

/// Logs a failed request before handing the result back to the caller.
fn logged<T>(result: Result<T, ApiError>, _context: &str) -> Result<T, ApiError> {
    #[cfg(feature = "tracing")]
    {
        if let Err(e) = &result {
            error!("Error {_context}: {e}");
        }
    }
    result
}

fn now_iso8601() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
