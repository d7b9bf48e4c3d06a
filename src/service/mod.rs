use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

use crate::{
    dto::UploadNoteRequest,
    media::{MediaStore, MediaStoreError, UPLOAD_FOLDER},
    models::Note,
    repository::Registry,
};

#[derive(Debug, thiserror::Error)]
pub enum NoteServiceError {
    #[error("file and title are required")]
    MissingFileOrTitle,

    #[error("media store upload failed: {0}")]
    Store(#[from] MediaStoreError),

    #[error("no note with id {0}")]
    NotFound(String),
}

pub struct NoteService {
    registry: Arc<tokio::sync::Mutex<Registry>>,
    media: Arc<dyn MediaStore>,
    last_id_ms: AtomicI64,
}

impl NoteService {
    pub fn new(registry: Arc<tokio::sync::Mutex<Registry>>, media: Arc<dyn MediaStore>) -> Self {
        Self {
            registry,
            media,
            last_id_ms: AtomicI64::new(0),
        }
    }

    /// Validates, stores the file remotely, then appends the record.
    ///
    /// Validation runs before anything is sent to the media store so a
    /// rejected request never leaves an orphaned upload behind. Retried
    /// requests create duplicate records with distinct ids; there is no
    /// dedup key.
    pub async fn upload_note(&self, request: UploadNoteRequest) -> Result<Note, NoteServiceError> {
        let title = request.title.trim();

        let Some(file) = request.file else {
            return Err(NoteServiceError::MissingFileOrTitle);
        };
        if title.is_empty() {
            return Err(NoteServiceError::MissingFileOrTitle);
        }

        let file_size = file.data.len() as u64;
        let stored = self
            .media
            .store(file.data, &file.name, UPLOAD_FOLDER)
            .await?;

        let note = Note {
            id: self.next_id(),
            title: title.to_string(),
            subject: request.subject.trim().to_string(),
            desc: request.desc.trim().to_string(),
            note_type: request.note_type,
            file_name: file.name,
            file_url: stored.url,
            public_id: stored.public_id,
            file_type: file.content_type,
            file_size,
            created_at: Utc::now(),
        };

        self.registry.lock().await.append(note.clone());

        tracing::info!(
            "stored '{}' ({}, {})",
            note.title,
            note.file_name,
            format_file_size(note.file_size)
        );

        Ok(note)
    }

    /// Full registry contents in insertion order. No server-side
    /// filtering, pagination or sorting; clients partition by type.
    pub async fn list_notes(&self) -> Vec<Note> {
        self.registry.lock().await.list()
    }

    /// Removes the record. The stored media object is left in place; only
    /// the record goes away.
    pub async fn delete_note(&self, id: &str) -> Result<(), NoteServiceError> {
        let mut registry = self.registry.lock().await;

        let Some(note) = registry.get(id) else {
            return Err(NoteServiceError::NotFound(id.to_string()));
        };
        let title = note.title.clone();
        registry.remove(id);

        tracing::info!("deleted note '{title}' ({id})");
        Ok(())
    }

    /// Millisecond wall-clock id, bumped past the previous one when two
    /// uploads land in the same millisecond.
    fn next_id(&self) -> String {
        let now = Utc::now().timestamp_millis();
        let mut last = self.last_id_ms.load(Ordering::SeqCst);
        loop {
            let id = now.max(last + 1);
            match self
                .last_id_ms
                .compare_exchange(last, id, Ordering::SeqCst, Ordering::SeqCst)
            {
                Ok(_) => return id.to_string(),
                Err(actual) => last = actual,
            }
        }
    }
}

/// Renders a byte count with the largest unit that keeps the value at or
/// above one, rounded to one decimal place. Mirrored by the browser
/// client's card labels.
pub(crate) fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let exponent = (((bytes as f64).ln() / 1024_f64.ln()).floor() as usize).min(UNITS.len() - 1);
    let scaled = bytes as f64 / 1024_f64.powi(exponent as i32);
    let rounded = (scaled * 10.0).round() / 10.0;

    if rounded.fract() == 0.0 {
        format!("{} {}", rounded as u64, UNITS[exponent])
    } else {
        format!("{rounded:.1} {}", UNITS[exponent])
    }
}
