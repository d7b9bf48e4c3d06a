//! Integration boundary to the Cloudinary media host.
//!
//! Everything the rest of the server knows about file hosting goes through
//! the [`MediaStore`] trait; [`CloudinaryStore`] is the production
//! implementation. Uploads use the `auto` resource type so Cloudinary
//! classifies PDFs, images and other binaries from content.

use async_trait::async_trait;
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::config::Config;

/// Logical folder all uploads land in. Not configurable per request.
pub const UPLOAD_FOLDER: &str = "campusnotes/notes";

/// Path marker that makes Cloudinary serve a file as an attachment.
const FORCE_DOWNLOAD_MARKER: &str = "/upload/fl_attachment/";

/// What the media host hands back for a stored file.
#[derive(Debug, Clone)]
pub struct StoredMedia {
    pub url: String,
    pub public_id: String,
}

#[derive(Debug, thiserror::Error)]
pub enum MediaStoreError {
    #[error("upload transport failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("media host rejected upload ({status}): {message}")]
    Rejected { status: u16, message: String },
}

#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Store a file and return its durable URL and public id.
    ///
    /// Failures are surfaced un-retried; the caller reports a single
    /// failure to the requester.
    async fn store(
        &self,
        data: Vec<u8>,
        file_name: &str,
        folder: &str,
    ) -> Result<StoredMedia, MediaStoreError>;
}

/// Signed-upload client for the Cloudinary REST API.
pub struct CloudinaryStore {
    cloud_name: String,
    api_key: String,
    api_secret: String,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct CloudinaryUploadResponse {
    secure_url: String,
    public_id: String,
}

#[derive(Deserialize)]
struct CloudinaryErrorBody {
    error: CloudinaryErrorMessage,
}

#[derive(Deserialize)]
struct CloudinaryErrorMessage {
    message: String,
}

impl CloudinaryStore {
    pub fn new(config: &Config) -> Self {
        Self {
            cloud_name: config.cloud_name.clone(),
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
            client: reqwest::Client::new(),
        }
    }

    /// SHA-256 signature over the alphabetically ordered request params,
    /// as required by the Cloudinary signed upload API. The secret is
    /// appended to the payload, never sent.
    fn sign(&self, params: &[(&str, &str)]) -> String {
        let mut params: Vec<&(&str, &str)> = params.iter().collect();
        params.sort_by_key(|(name, _)| *name);

        let payload = params
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("&");

        let mut hasher = Sha256::new();
        hasher.update(payload.as_bytes());
        hasher.update(self.api_secret.as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[async_trait]
impl MediaStore for CloudinaryStore {
    async fn store(
        &self,
        data: Vec<u8>,
        file_name: &str,
        folder: &str,
    ) -> Result<StoredMedia, MediaStoreError> {
        let now = chrono::Utc::now();
        // Timestamped public id keeps repeated uploads of files sharing a
        // base name from colliding.
        let public_id = format!("{}_{}", now.timestamp_millis(), file_stem(file_name));
        let timestamp = now.timestamp().to_string();

        let signature = self.sign(&[
            ("folder", folder),
            ("overwrite", "false"),
            ("public_id", &public_id),
            ("timestamp", &timestamp),
            ("unique_filename", "false"),
            ("use_filename", "true"),
        ]);

        let file_part = reqwest::multipart::Part::bytes(data).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new()
            .part("file", file_part)
            .text("api_key", self.api_key.clone())
            .text("timestamp", timestamp)
            .text("signature", signature)
            .text("public_id", public_id)
            .text("folder", folder.to_string())
            .text("use_filename", "true")
            .text("unique_filename", "false")
            .text("overwrite", "false");

        let url = format!(
            "https://api.cloudinary.com/v1_1/{}/auto/upload",
            self.cloud_name
        );

        let response = self.client.post(&url).multipart(form).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .json::<CloudinaryErrorBody>()
                .await
                .map(|body| body.error.message)
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(MediaStoreError::Rejected { status, message });
        }

        let body: CloudinaryUploadResponse = response.json().await?;

        Ok(StoredMedia {
            url: body.secure_url,
            public_id: body.public_id,
        })
    }
}

/// Rewrite a delivery URL so browsers download the file instead of
/// rendering it inline. URLs without an `/upload/` segment pass through
/// unchanged; the marker is inserted after the first occurrence only.
/// The browser client applies the same rewrite to its download anchors,
/// so the two sides must agree on the marker.
#[allow(dead_code)] // consumed by the browser client; kept as the reference transform
pub fn to_force_download_url(url: &str) -> String {
    if url.contains("/upload/") {
        url.replacen("/upload/", FORCE_DOWNLOAD_MARKER, 1)
    } else {
        url.to_string()
    }
}

fn file_stem(name: &str) -> &str {
    name.split('.').next().unwrap_or(name)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn force_download_inserts_marker_after_upload_segment() {
        let url = "https://res.cloudinary.com/demo/raw/upload/v1700/campusnotes/notes/x.pdf";
        assert_eq!(
            to_force_download_url(url),
            "https://res.cloudinary.com/demo/raw/upload/fl_attachment/v1700/campusnotes/notes/x.pdf"
        );
    }

    #[test]
    fn force_download_leaves_other_urls_unchanged() {
        let url = "https://example.com/files/x.pdf";
        assert_eq!(to_force_download_url(url), url);
    }

    #[test]
    fn force_download_rewrites_first_segment_only() {
        let url = "https://res.cloudinary.com/demo/raw/upload/v1/upload/x.pdf";
        let rewritten = to_force_download_url(url);
        assert_eq!(rewritten.matches("fl_attachment").count(), 1);
        assert!(rewritten.starts_with("https://res.cloudinary.com/demo/raw/upload/fl_attachment/"));
    }

    #[test]
    fn file_stem_stops_at_first_dot() {
        assert_eq!(file_stem("midterm.pdf"), "midterm");
        assert_eq!(file_stem("archive.tar.gz"), "archive");
        assert_eq!(file_stem("README"), "README");
    }

    #[test]
    fn signature_is_sha256_of_sorted_params_and_secret() {
        let store = CloudinaryStore {
            cloud_name: "demo".to_string(),
            api_key: "key".to_string(),
            api_secret: "shhh".to_string(),
            client: reqwest::Client::new(),
        };

        // Passed out of order on purpose; signing must sort.
        let signature = store.sign(&[
            ("timestamp", "1700000000"),
            ("folder", "campusnotes/notes"),
            ("use_filename", "true"),
            ("public_id", "1700000000000_midterm"),
            ("unique_filename", "false"),
            ("overwrite", "false"),
        ]);

        assert_eq!(
            signature,
            "b8c5cf8bd130a6bc430093d677d66c9a0a1ab6aee86db54ebcb812387d515047"
        );
    }
}
