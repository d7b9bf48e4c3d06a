use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Note, NoteType};

/// A single file part pulled out of the multipart body.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Parsed upload request. The file is optional here so the service can
/// enforce its presence before anything is sent to the media store.
#[derive(Debug, Clone)]
pub struct UploadNoteRequest {
    pub file: Option<UploadedFile>,
    pub title: String,
    pub subject: String,
    pub desc: String,
    pub note_type: NoteType,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    pub message: String,
    pub file: Note,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteResponse {
    pub success: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}
