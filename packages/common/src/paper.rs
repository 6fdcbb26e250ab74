use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Program years a paper can belong to.
pub const PROGRAM_YEARS: [u8; 4] = [1, 2, 3, 4];

/// Earliest exam year accepted on upload.
pub const MIN_EXAM_YEAR: i32 = 2000;

/// Exam sitting a paper was set for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
pub enum ExamType {
    Mid,
    End,
}

impl ExamType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mid => "Mid",
            Self::End => "End",
        }
    }
}

impl fmt::Display for ExamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExamType {
    type Err = String;

    /// Exact, case-sensitive match on `Mid` or `End`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Mid" => Ok(Self::Mid),
            "End" => Ok(Self::End),
            other => Err(format!("unknown exam type '{other}' (expected Mid or End)")),
        }
    }
}

/// The two semesters taught in a program year: 1 -> [1, 2], ..., 4 -> [7, 8].
pub fn semesters_for_year(year: u8) -> Option<[u8; 2]> {
    match year {
        1..=4 => Some([year * 2 - 1, year * 2]),
        _ => None,
    }
}

/// One catalog entry: an uploaded paper's metadata and where its file lives.
///
/// Records are immutable once created. `stored_path` is relative to the
/// upload root and always uses `/` separators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PaperRecord {
    #[schema(example = 12)]
    pub id: u64,
    /// Program year (1-4).
    #[schema(example = 2)]
    pub year: u8,
    /// Semester (1-8).
    #[schema(example = 3)]
    pub semester: u8,
    #[schema(example = "Physics")]
    pub subject: String,
    pub exam_type: ExamType,
    /// Starting year of the exam period, primary sort key.
    #[schema(example = 2024)]
    pub exam_year: i32,
    /// Display range such as `2024-2025`, when one was supplied.
    #[serde(default)]
    #[schema(example = "2024-2025")]
    pub academic_year: Option<String>,
    #[schema(example = "Physics Mid 2024.pdf")]
    pub original_filename: String,
    #[schema(example = "2/3/Physics/Mid/Physics_Mid_2024.pdf")]
    pub stored_path: String,
    #[schema(example = "2024-11-02T10:15:00")]
    pub uploaded_at: String,
}

/// Fields of a record that has not been assigned an ID yet.
#[derive(Debug, Clone)]
pub struct NewPaper {
    pub year: u8,
    pub semester: u8,
    pub subject: String,
    pub exam_type: ExamType,
    pub exam_year: i32,
    pub academic_year: Option<String>,
    pub original_filename: String,
    pub stored_path: String,
    pub uploaded_at: String,
}

impl NewPaper {
    pub(crate) fn with_id(self, id: u64) -> PaperRecord {
        PaperRecord {
            id,
            year: self.year,
            semester: self.semester,
            subject: self.subject,
            exam_type: self.exam_type,
            exam_year: self.exam_year,
            academic_year: self.academic_year,
            original_filename: self.original_filename,
            stored_path: self.stored_path,
            uploaded_at: self.uploaded_at,
        }
    }
}
