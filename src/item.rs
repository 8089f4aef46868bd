//! Lost-item data structures.
//!
//! The [`Item`] is the sole entity that flows through the sync layer. Remote
//! records arrive as loosely-typed JSON maps and are coerced into [`Item`]s by
//! [`Item::decode`]; the local fallback store persists [`Item`]s directly.
//!
//! # Example
//!
//! ```
//! use lostfound_sync::{Item, ItemStatus};
//! use serde_json::json;
//!
//! let record = json!({
//!     "id": "abc123",
//!     "title": "Blue Backpack",
//!     "description": "Left in library",
//!     "status": "lost",
//!     "createdAt": 1724500000000i64,
//! });
//!
//! let item = Item::decode(record.as_object().unwrap()).unwrap();
//! assert_eq!(item.title, "Blue Backpack");
//! assert_eq!(item.status, ItemStatus::Lost);
//! assert!(item.photo.is_none());
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// A loosely-typed record as delivered by the remote document store.
pub type RawRecord = serde_json::Map<String, Value>;

/// Lifecycle status of a lost-item report.
///
/// Created as [`Lost`](ItemStatus::Lost); the only allowed transition is
/// `Lost -> Found`, one-way, never reversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Lost,
    Found,
}

impl ItemStatus {
    /// Wire/display name, matching the serialized form.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lost => "lost",
            Self::Found => "found",
        }
    }
}

/// A lost-item report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Opaque unique id, assigned by whichever backend accepted the record.
    /// Immutable once assigned.
    pub id: String,
    /// Display title (non-empty by UI contract; not validated here).
    pub title: String,
    /// Display description.
    pub description: String,
    /// Optional photo URL. `None` means "no photo, render a placeholder".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    pub status: ItemStatus,
    /// Creation time in epoch milliseconds, stamped by the accepting backend.
    /// Used only for ordering and relative-age display.
    #[serde(rename = "createdAt")]
    pub created_at: i64,
}

/// Caller-supplied fields for a new report.
///
/// The backend assigns `id`, `created_at`, and the initial `Lost` status.
#[derive(Debug, Clone, Default)]
pub struct ItemDraft {
    pub title: String,
    pub description: String,
    pub photo: Option<String>,
}

impl ItemDraft {
    /// Encode as a raw record for the remote store.
    ///
    /// An absent photo is omitted entirely rather than written as null, so a
    /// record round-tripped through the remote store decodes back to `None`.
    #[must_use]
    pub fn to_record(&self) -> RawRecord {
        let mut record = RawRecord::new();
        record.insert("title".into(), Value::String(self.title.clone()));
        record.insert(
            "description".into(),
            Value::String(self.description.clone()),
        );
        if let Some(photo) = &self.photo {
            record.insert("photo".into(), Value::String(photo.clone()));
        }
        record.insert("status".into(), Value::String("lost".into()));
        record
    }
}

/// Failure to coerce a raw remote record into an [`Item`].
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DecodeError {
    #[error("record missing required field '{0}'")]
    MissingField(&'static str),
    #[error("field '{field}' has unexpected value: {value}")]
    InvalidField { field: &'static str, value: String },
}

impl Item {
    /// Decode a raw remote record into an [`Item`].
    ///
    /// Lenient where the remote store is legitimately incomplete:
    /// - missing `photo` (or a null) becomes `None`;
    /// - missing or null `createdAt` (a server timestamp still pending) gets
    ///   a "now" placeholder until the resolved value arrives on the next
    ///   snapshot.
    ///
    /// Strict everywhere else: missing or mistyped `id`, `title`,
    /// `description`, or `status` is a [`DecodeError`], never a panic.
    pub fn decode(record: &RawRecord) -> Result<Self, DecodeError> {
        let id = require_string(record, "id")?;
        let title = require_string(record, "title")?;
        let description = require_string(record, "description")?;

        let photo = match record.get("photo") {
            None | Some(Value::Null) => None,
            Some(Value::String(url)) => Some(url.clone()),
            Some(other) => {
                return Err(DecodeError::InvalidField {
                    field: "photo",
                    value: other.to_string(),
                })
            }
        };

        let status = match record.get("status") {
            Some(Value::String(s)) if s == "lost" => ItemStatus::Lost,
            Some(Value::String(s)) if s == "found" => ItemStatus::Found,
            Some(other) => {
                return Err(DecodeError::InvalidField {
                    field: "status",
                    value: other.to_string(),
                })
            }
            None => return Err(DecodeError::MissingField("status")),
        };

        let created_at = match record.get("createdAt") {
            Some(Value::Number(n)) => n.as_i64().ok_or(DecodeError::InvalidField {
                field: "createdAt",
                value: n.to_string(),
            })?,
            // Server timestamp not resolved yet; placeholder until it is.
            None | Some(Value::Null) => now_millis(),
            Some(other) => {
                return Err(DecodeError::InvalidField {
                    field: "createdAt",
                    value: other.to_string(),
                })
            }
        };

        Ok(Self {
            id,
            title,
            description,
            photo,
            status,
            created_at,
        })
    }
}

fn require_string(record: &RawRecord, field: &'static str) -> Result<String, DecodeError> {
    match record.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(DecodeError::InvalidField {
            field,
            value: other.to_string(),
        }),
        None => Err(DecodeError::MissingField(field)),
    }
}

/// Current wall-clock time in epoch milliseconds.
#[must_use]
pub fn now_millis() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}
