use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Whether an upload is filed under the notes or the images section.
///
/// Client-supplied; anything the client sends that is not `image` is
/// treated as a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NoteType {
    Note,
    Image,
}

impl NoteType {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "image" => Self::Image,
            _ => Self::Note,
        }
    }
}

/// One uploaded file plus its metadata. Immutable once created; the only
/// lifecycle transition is removal from the registry.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Millisecond-timestamp id, unique and monotonic by creation order
    pub id: String,
    /// Display title, non-empty after trimming
    pub title: String,
    /// Course or topic, empty when the uploader left it blank
    pub subject: String,
    /// Free-form description
    pub desc: String,
    #[serde(rename = "type")]
    pub note_type: NoteType,
    /// Original filename as uploaded
    pub file_name: String,
    /// Durable URL returned by the media store
    pub file_url: String,
    /// Opaque media-store identifier
    pub public_id: String,
    /// MIME type reported in the multipart request
    pub file_type: String,
    /// Size in bytes
    pub file_size: u64,
    pub created_at: DateTime<Utc>,
}
