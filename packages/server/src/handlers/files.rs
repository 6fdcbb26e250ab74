use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::Response;
use tokio_util::io::ReaderStream;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/files/{path}",
    tag = "Files",
    operation_id = "serveFile",
    summary = "Download a stored paper",
    description = "Streams a file from the upload directory. Backslashes are accepted as \
        separators. Paths that would leave the upload directory are answered with 404.",
    params(("path" = String, Path, description = "Stored path, e.g. `1/1/Physics/Mid/paper.pdf`")),
    responses(
        (status = 200, description = "File content"),
        (status = 404, description = "File not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn serve_file(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Response, AppError> {
    let file_path = state.catalog.resolve_file(&path).await?;

    let file = tokio::fs::File::open(&file_path)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to open {}: {e}", file_path.display())))?;
    let size = file
        .metadata()
        .await
        .map_err(|e| AppError::Internal(format!("Failed to stat {}: {e}", file_path.display())))?
        .len();

    let mime = mime_guess::from_path(&file_path).first_or_octet_stream();
    let filename = file_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, mime.as_ref())
        .header(header::CONTENT_LENGTH, size.to_string())
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition_value(&filename),
        )
        .header(header::CACHE_CONTROL, "public, max-age=3600")
        .body(Body::from_stream(ReaderStream::new(file)))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))
}

/// Inline `Content-Disposition` with an ASCII fallback and an RFC 5987 `filename*`.
fn content_disposition_value(filename: &str) -> String {
    let ascii_safe: String = filename
        .chars()
        .filter(|c| c.is_ascii_graphic() && !matches!(c, '"' | ';' | '\\'))
        .collect();
    let ascii_name = if ascii_safe.is_empty() {
        "paper".to_string()
    } else {
        ascii_safe
    };

    let encoded: String = filename
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                String::from(b as char)
            }
            _ => format!("%{b:02X}"),
        })
        .collect();

    format!("inline; filename=\"{ascii_name}\"; filename*=UTF-8''{encoded}")
}
