use axum::Json;
use axum::extract::{Path, State};
use common::paper::{PROGRAM_YEARS, semesters_for_year};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::models::paper::{SubjectListResponse, YearListResponse, YearSummary};
use crate::state::AppState;

fn year_summary(year: u8) -> Result<YearSummary, AppError> {
    let semesters =
        semesters_for_year(year).ok_or_else(|| AppError::NotFound("Invalid year".into()))?;
    Ok(YearSummary {
        year,
        semesters: semesters.to_vec(),
    })
}

#[utoipa::path(
    get,
    path = "/api/v1/years",
    tag = "Browse",
    operation_id = "listYears",
    summary = "List program years and their semesters",
    responses(
        (status = 200, description = "Program years", body = YearListResponse),
    ),
)]
pub async fn list_years() -> Json<YearListResponse> {
    let years = PROGRAM_YEARS
        .iter()
        .filter_map(|&y| year_summary(y).ok())
        .collect();
    Json(YearListResponse { years })
}

#[utoipa::path(
    get,
    path = "/api/v1/years/{year}/semesters",
    tag = "Browse",
    operation_id = "listSemesters",
    summary = "List the semesters of a program year",
    params(("year" = u8, Path, description = "Program year (1-4)")),
    responses(
        (status = 200, description = "Semesters of the year", body = YearSummary),
        (status = 404, description = "Invalid year (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument]
pub async fn list_semesters(Path(year): Path<String>) -> Result<Json<YearSummary>, AppError> {
    let year = parse_year(&year)?;
    Ok(Json(year_summary(year)?))
}

#[utoipa::path(
    get,
    path = "/api/v1/years/{year}/semesters/{semester}/subjects",
    tag = "Browse",
    operation_id = "listSubjects",
    summary = "List subjects with papers for a year and semester",
    params(
        ("year" = u8, Path, description = "Program year (1-4)"),
        ("semester" = u8, Path, description = "Semester belonging to that year"),
    ),
    responses(
        (status = 200, description = "Sorted distinct subjects", body = SubjectListResponse),
        (status = 404, description = "Invalid year or semester (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn list_subjects(
    State(state): State<AppState>,
    Path((year, semester)): Path<(String, String)>,
) -> Result<Json<SubjectListResponse>, AppError> {
    let year = parse_year(&year)?;
    let summary = year_summary(year)?;
    let semester = semester
        .trim()
        .parse::<u8>()
        .ok()
        .filter(|s| summary.semesters.contains(s))
        .ok_or_else(|| AppError::NotFound("Invalid semester".into()))?;

    let subjects = state.catalog.subjects(year, semester).await;
    Ok(Json(SubjectListResponse {
        year,
        semester,
        subjects,
    }))
}

fn parse_year(raw: &str) -> Result<u8, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::NotFound("Invalid year".into()))
}
