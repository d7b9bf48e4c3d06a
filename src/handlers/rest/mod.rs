use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_macros::debug_handler;
use utoipa::OpenApi;

use std::sync::Arc;

use crate::{
    dto::{DeleteResponse, ErrorResponse, UploadNoteRequest, UploadResponse, UploadedFile},
    models::{Note, NoteType},
    service::{NoteService, NoteServiceError},
};

#[derive(OpenApi)]
#[openapi(
    paths(upload_note, get_all_notes, delete_note, health_check),
    components(schemas(Note, NoteType, UploadResponse, DeleteResponse, ErrorResponse)),
    tags(
        (name = "notes", description = "Note and image upload API")
    )
)]
pub struct ApiDoc;

#[utoipa::path(
    post,
    path = "/data",
    responses(
        (status = 201, description = "File uploaded and record created", body = UploadResponse),
        (status = 400, description = "Missing file or title", body = ErrorResponse),
        (status = 500, description = "Media store upload failed", body = ErrorResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn upload_note(
    State(service): State<Arc<NoteService>>,
    multipart: Multipart,
) -> Response {
    let request = match parse_upload(multipart).await {
        Ok(request) => request,
        Err(message) => {
            tracing::error!("failed to parse upload body: {message}");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::with_details("Invalid upload request", message)),
            )
                .into_response();
        }
    };

    match service.upload_note(request).await {
        Ok(note) => (
            StatusCode::CREATED,
            Json(UploadResponse {
                message: "File uploaded successfully!".to_string(),
                file: note,
            }),
        )
            .into_response(),
        Err(e @ NoteServiceError::MissingFileOrTitle) => {
            tracing::error!("rejected upload: {e}");
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new("File and title are required")),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("failed to store upload: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::with_details("Upload failed", e.to_string())),
            )
                .into_response()
        }
    }
}

/// Pulls the file part and the string fields out of the multipart body.
/// Missing fields stay at their defaults; the service decides what is
/// actually required.
async fn parse_upload(mut multipart: Multipart) -> Result<UploadNoteRequest, String> {
    let mut request = UploadNoteRequest {
        file: None,
        title: String::new(),
        subject: String::new(),
        desc: String::new(),
        note_type: NoteType::Note,
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("multipart error: {e}"))?
    {
        let name = field.name().map(ToString::to_string);
        match name.as_deref() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| format!("read error: {e}"))?
                    .to_vec();
                request.file = Some(UploadedFile {
                    name: file_name,
                    content_type,
                    data,
                });
            }
            Some("title") => {
                request.title = field.text().await.map_err(|e| format!("read error: {e}"))?;
            }
            Some("subject") => {
                request.subject = field.text().await.map_err(|e| format!("read error: {e}"))?;
            }
            Some("desc") => {
                request.desc = field.text().await.map_err(|e| format!("read error: {e}"))?;
            }
            Some("type") => {
                let raw = field.text().await.map_err(|e| format!("read error: {e}"))?;
                request.note_type = NoteType::parse(&raw);
            }
            _ => {} // ignore unknown fields
        }
    }

    Ok(request)
}

#[utoipa::path(
    get,
    path = "/data",
    responses(
        (status = 200, description = "All records in upload order", body = Vec<Note>)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn get_all_notes(State(service): State<Arc<NoteService>>) -> Response {
    (StatusCode::OK, Json(service.list_notes().await)).into_response()
}

#[utoipa::path(
    delete,
    path = "/data/{id}",
    params(
        ("id" = String, Path, description = "Note ID")
    ),
    responses(
        (status = 200, description = "Record deleted", body = DeleteResponse),
        (status = 404, description = "No record with this id", body = ErrorResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn delete_note(
    State(service): State<Arc<NoteService>>,
    Path(id): Path<String>,
) -> Response {
    match service.delete_note(&id).await {
        Ok(()) => (StatusCode::OK, Json(DeleteResponse { success: true })).into_response(),
        Err(e) => {
            tracing::error!("failed to delete note {id}: {e}");
            (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new("File not found")),
            )
                .into_response()
        }
    }
}

/// Liveness probe the browser client hits before its first render.
#[utoipa::path(
    get,
    path = "/notes",
    responses(
        (status = 200, description = "Server is up")
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn health_check() -> Response {
    (StatusCode::OK, "CampusNotes API is running").into_response()
}
