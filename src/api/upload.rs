//! File upload handler.
//!
//! Accepts one multipart file, stores it in the scratch directory for the
//! duration of the request and returns its extracted text.

use axum::{
    body::Bytes,
    extract::{Multipart, State, multipart::MultipartRejection},
    http::StatusCode,
    response::Json,
};
use serde::Serialize;

use super::error::{ApiRejection, reject};
use crate::AppState;
use crate::extraction::{DocumentKind, sanitize_filename};

/// Multipart field carrying the document.
const FILE_FIELD: &str = "file";

/// Response for a successfully extracted upload.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub extracted_text: String,
}

/// Extract the text of an uploaded document.
///
/// POST /upload
///
/// The `file` part is written to the scratch directory, dispatched by
/// extension and removed again before the response is sent.
pub async fn upload_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiRejection> {
    let mut multipart = multipart.map_err(|e| {
        tracing::debug!(error = %e, "Request is not multipart");
        reject(StatusCode::BAD_REQUEST, "No file uploaded")
    })?;

    let (filename, data) = read_file_field(&mut multipart)
        .await?
        .ok_or_else(|| reject(StatusCode::BAD_REQUEST, "No file uploaded"))?;

    if filename.is_empty() {
        return Err(reject(StatusCode::BAD_REQUEST, "Empty filename"));
    }

    let safe_name = sanitize_filename(&filename);
    if safe_name.is_empty() {
        return Err(reject(StatusCode::BAD_REQUEST, "Invalid filename"));
    }

    let upload_id = uuid::Uuid::new_v4();
    tracing::info!(
        name: "upload.received",
        %upload_id,
        filename = %safe_name,
        size = data.len(),
        mime = %mime_guess::from_path(&safe_name).first_or_octet_stream(),
        "Upload received"
    );

    // Removed from disk when `stored` drops, on every path below.
    let stored = state.scratch.persist(&safe_name, &data).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to write upload to scratch directory");
        reject(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to store upload: {e}"),
        )
    })?;

    let Some(kind) = DocumentKind::from_filename(&safe_name) else {
        return Err(reject(StatusCode::BAD_REQUEST, "Unsupported file type"));
    };

    let extracted_text = state
        .extractors
        .extract(kind, stored.path())
        .await
        .map_err(|e| {
            tracing::warn!(%upload_id, kind = kind.as_str(), error = %e, "Extraction failed");
            reject(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Extraction failed: {e}"),
            )
        })?;

    tracing::info!(
        name: "upload.extracted",
        %upload_id,
        kind = kind.as_str(),
        chars = extracted_text.chars().count(),
        "Text extracted"
    );

    Ok(Json(UploadResponse { extracted_text }))
}

/// Find the `file` part; `None` when the request has no file part.
async fn read_file_field(
    multipart: &mut Multipart,
) -> Result<Option<(String, Bytes)>, ApiRejection> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        reject(e.status(), format!("Failed to read multipart field: {e}"))
    })? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        // A part without a filename is a plain form value, not a file.
        let Some(filename) = field.file_name().map(ToString::to_string) else {
            continue;
        };
        let data = field.bytes().await.map_err(|e| {
            reject(
                e.status(),
                format!("Failed to read file '{filename}': {e}"),
            )
        })?;
        return Ok(Some((filename, data)));
    }
    Ok(None)
}
