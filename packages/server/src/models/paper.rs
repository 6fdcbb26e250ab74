use common::PaperRecord;
use common::catalog::{PaperFilter, PaperListing};
use serde::{Deserialize, Serialize};

/// Query parameters for listing papers.
///
/// Values arrive as raw strings: blank or non-numeric year/semester are
/// treated as "no filter" rather than rejected.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaperListQuery {
    /// Program year (1-4).
    pub year: Option<String>,
    pub semester: Option<String>,
    /// Case-insensitive subject match.
    pub subject: Option<String>,
    /// `Mid` or `End`, exact match.
    pub exam_type: Option<String>,
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

impl PaperListQuery {
    pub fn into_filter(self) -> PaperFilter {
        PaperFilter {
            year: trimmed(self.year).and_then(|v| v.parse().ok()),
            semester: trimmed(self.semester).and_then(|v| v.parse().ok()),
            subject: trimmed(self.subject),
            exam_type: trimmed(self.exam_type),
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct PaperListResponse {
    /// Newest exam year first, then subject, then exam type.
    pub papers: Vec<PaperRecord>,
    pub total: usize,
    /// Distinct subjects among papers matching the year/semester filters.
    pub subjects: Vec<String>,
}

impl From<PaperListing> for PaperListResponse {
    fn from(listing: PaperListing) -> Self {
        Self {
            total: listing.papers.len(),
            papers: listing.papers,
            subjects: listing.subjects,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct YearSummary {
    #[schema(example = 2)]
    pub year: u8,
    #[schema(example = json!([3, 4]))]
    pub semesters: Vec<u8>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct YearListResponse {
    pub years: Vec<YearSummary>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SubjectListResponse {
    pub year: u8,
    pub semester: u8,
    /// Sorted, distinct.
    pub subjects: Vec<String>,
}
