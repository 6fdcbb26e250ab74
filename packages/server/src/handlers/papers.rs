use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::extract::{DefaultBodyLimit, Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use common::PaperRecord;
use common::catalog::{DeleteReport, IncomingFile, UploadMetadata, UploadReport};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AdminSession;
use crate::models::paper::{PaperListQuery, PaperListResponse};
use crate::state::AppState;

pub fn upload_body_limit(max_bytes: usize) -> DefaultBodyLimit {
    DefaultBodyLimit::max(max_bytes)
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("Upload exceeds the request size limit".into())
    } else {
        AppError::Validation(format!("Multipart error: {}", e.body_text()))
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/papers",
    tag = "Papers",
    operation_id = "listPapers",
    summary = "List papers",
    description = "Filters by year, semester, subject and exam type, all optional. \
        Results are ordered newest exam year first, then subject, then exam type. \
        `subjects` lists the distinct subjects for the year/semester filters.",
    params(PaperListQuery),
    responses(
        (status = 200, description = "Matching papers", body = PaperListResponse),
    ),
)]
#[instrument(skip(state))]
pub async fn list_papers(
    State(state): State<AppState>,
    Query(query): Query<PaperListQuery>,
) -> Json<PaperListResponse> {
    let filter = query.into_filter();
    Json(state.catalog.list(&filter).await.into())
}

#[utoipa::path(
    get,
    path = "/api/v1/papers/{id}",
    tag = "Papers",
    operation_id = "getPaper",
    summary = "Get a paper record",
    params(("id" = u64, Path, description = "Paper ID")),
    responses(
        (status = 200, description = "Paper record", body = PaperRecord),
        (status = 404, description = "Paper not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_paper(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<PaperRecord>, AppError> {
    state
        .catalog
        .get(id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Paper {id} not found")))
}

#[utoipa::path(
    post,
    path = "/api/v1/papers",
    tag = "Papers",
    operation_id = "uploadPapers",
    summary = "Upload one or more papers",
    description = "Multipart fields `subject`, `exam_type`, `year`, `semester`, `exam_year` \
        and one or more `files` parts. Unsupported or unusable files are skipped with a \
        warning. A file whose sanitized name already exists in the target folder replaces \
        the earlier file and its record.",
    request_body(content_type = "multipart/form-data", description = "Paper metadata and files"),
    responses(
        (status = 201, description = "At least one file saved", body = UploadReport),
        (status = 200, description = "Nothing saved; see warnings", body = UploadReport),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 413, description = "Request too large (PAYLOAD_TOO_LARGE)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _session, multipart))]
pub async fn upload_papers(
    _session: AdminSession,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut metadata = UploadMetadata::default();
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        match name.as_str() {
            "files" => {
                // Browsers send an empty part when no file was chosen.
                let filename = match field.file_name() {
                    Some(f) if !f.is_empty() => f.to_owned(),
                    _ => continue,
                };
                let data = field.bytes().await.map_err(multipart_error)?;
                files.push(IncomingFile {
                    filename,
                    data: data.to_vec(),
                });
            }
            "subject" | "exam_type" | "year" | "semester" | "exam_year" => {
                let text = field.text().await.map_err(multipart_error)?;
                let slot = match name.as_str() {
                    "subject" => &mut metadata.subject,
                    "exam_type" => &mut metadata.exam_type,
                    "year" => &mut metadata.year,
                    "semester" => &mut metadata.semester,
                    _ => &mut metadata.exam_year,
                };
                *slot = text;
            }
            _ => {} // Ignore unknown fields.
        }
    }

    let report = state.catalog.upload(metadata, files).await?;
    let status = if report.saved > 0 {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(report)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/papers/{id}",
    tag = "Papers",
    operation_id = "deletePaper",
    summary = "Delete a paper",
    description = "Removes the record and, best effort, its file. A file that cannot be \
        removed is reported in `warnings`; the record is deleted regardless.",
    params(("id" = u64, Path, description = "Paper ID")),
    responses(
        (status = 200, description = "Paper deleted", body = DeleteReport),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Paper not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _session))]
pub async fn delete_paper(
    _session: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<DeleteReport>, AppError> {
    Ok(Json(state.catalog.delete(id).await?))
}
