use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// The wire name of the creation timestamp stamped by [`NotesClient::create_note`](crate::NotesClient::create_note).
pub const CREATED_AT_FIELD: &str = "createdAt";

/// The identifier the backend assigns to a note.
///
/// The backend may send either a string or a number; both are kept in their string form,
/// which is also what appears in `/notes/{id}` paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for NoteId {
    fn from(value: String) -> Self {
        NoteId(value)
    }
}

impl From<&str> for NoteId {
    fn from(value: &str) -> Self {
        NoteId(value.to_string())
    }
}

impl From<u64> for NoteId {
    fn from(value: u64) -> Self {
        NoteId(value.to_string())
    }
}

impl<'de> Deserialize<'de> for NoteId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Unsigned(u64),
            Signed(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => NoteId(text),
            RawId::Unsigned(number) => NoteId(number.to_string()),
            RawId::Signed(number) => NoteId(number.to_string()),
        })
    }
}

/// A note record as returned by the backend.
///
/// Apart from `id` and `createdAt`, the fields are owned by the caller and kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// The identifier assigned by the backend.
    pub id: NoteId,
    /// Creation time. Notes created through this crate carry an ISO-8601 string, but
    /// records written by other clients are passed through whatever their shape.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Value>,
    /// Every other field of the record.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Note {
    /// Returns the creation time when it is a string.
    pub fn created_at_str(&self) -> Option<&str> {
        self.created_at.as_ref().and_then(Value::as_str)
    }

    /// Returns a caller-owned field of the record.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
}

/// The caller-supplied body of a note for create and update requests.
///
/// # Usage
/// ```
/// use notes_client::NoteData;
///
/// let data = NoteData::new()
///     .with("title", "Groceries")
///     .with("content", "milk, eggs");
/// assert_eq!(data.get("title").and_then(|v| v.as_str()), Some("Groceries"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteData(Map<String, Value>);

impl NoteData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field, replacing any previous value under the same name.
    pub fn with<K: Into<String>, V: Into<Value>>(mut self, field: K, value: V) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert<K: Into<String>, V: Into<Value>>(&mut self, field: K, value: V) {
        self.0.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    pub(crate) fn stamped(mut self, created_at: String) -> Self {
        self.0
            .insert(CREATED_AT_FIELD.to_string(), Value::String(created_at));
        self
    }
}

impl From<Map<String, Value>> for NoteData {
    fn from(value: Map<String, Value>) -> Self {
        NoteData(value)
    }
}
