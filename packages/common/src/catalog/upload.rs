use chrono::Local;
use serde::Serialize;
use tokio::fs;
use tracing::{debug, info, warn};

use super::Catalog;
use super::error::CatalogError;
use crate::exam_year::{ExamYear, parse_exam_year};
use crate::filename::{has_allowed_extension, secure_filename, validate_path_segment};
use crate::paper::{ExamType, MIN_EXAM_YEAR, NewPaper, PROGRAM_YEARS, PaperRecord};

/// Raw upload form fields, validated as a unit before any disk I/O.
#[derive(Debug, Clone, Default)]
pub struct UploadMetadata {
    pub subject: String,
    pub exam_type: String,
    pub year: String,
    pub semester: String,
    pub exam_year: String,
}

/// One file from an upload batch, fully buffered.
#[derive(Debug, Clone)]
pub struct IncomingFile {
    /// Name declared by the client. Kept verbatim as `original_filename`.
    pub filename: String,
    pub data: Vec<u8>,
}

/// Validated upload metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaperTarget {
    pub year: u8,
    pub semester: u8,
    pub subject: String,
    pub exam_type: ExamType,
    pub exam_year: ExamYear,
}

impl PaperTarget {
    /// `year/semester/subject/exam_type`, relative to the upload root.
    pub fn relative_dir(&self) -> String {
        format!(
            "{}/{}/{}/{}",
            self.year, self.semester, self.subject, self.exam_type
        )
    }
}

impl UploadMetadata {
    pub fn validate(&self) -> Result<PaperTarget, CatalogError> {
        let year: u8 = self
            .year
            .trim()
            .parse()
            .ok()
            .filter(|y| PROGRAM_YEARS.contains(y))
            .ok_or_else(|| CatalogError::validation("year", "must be one of 1, 2, 3, 4"))?;

        let semester: u8 = self
            .semester
            .trim()
            .parse()
            .ok()
            .filter(|s| (1..=8).contains(s))
            .ok_or_else(|| CatalogError::validation("semester", "must be between 1 and 8"))?;

        let exam_type: ExamType = self
            .exam_type
            .trim()
            .parse()
            .map_err(|e: String| CatalogError::validation("exam_type", e))?;

        let subject = validate_path_segment(&self.subject)
            .map_err(|e| CatalogError::validation("subject", e.message()))?
            .to_string();

        let exam_year = parse_exam_year(&self.exam_year)
            .filter(|y| y.start >= MIN_EXAM_YEAR)
            .ok_or_else(|| {
                CatalogError::validation(
                    "exam_year",
                    format!("enter a year from {MIN_EXAM_YEAR} like 2024 or 2024-25"),
                )
            })?;

        Ok(PaperTarget {
            year,
            semester,
            subject,
            exam_type,
            exam_year,
        })
    }
}

/// Outcome of an upload batch.
#[derive(Debug, Clone, Default, Serialize, utoipa::ToSchema)]
pub struct UploadReport {
    /// Files written and recorded.
    pub saved: usize,
    /// Files skipped (unsupported type, unusable name, exhausted IDs, I/O failure).
    pub skipped: usize,
    /// Older records superseded because their file was overwritten.
    pub replaced: usize,
    pub warnings: Vec<String>,
    /// Records created by this batch, in upload order.
    pub papers: Vec<PaperRecord>,
}

impl UploadReport {
    fn skip(&mut self, warning: String) {
        warn!("{warning}");
        self.skipped += 1;
        self.warnings.push(warning);
    }

    /// Count superseded records and drop any that this batch created.
    fn supersede(&mut self, records: Vec<PaperRecord>) {
        self.replaced += records.len();
        self.papers
            .retain(|paper| records.iter().all(|old| old.id != paper.id));
    }
}

impl Catalog {
    /// Store a batch of files under one set of metadata.
    ///
    /// Metadata problems reject the batch before anything touches disk.
    /// Per-file problems skip that file only. Each file is staged in the
    /// target directory and renamed into place, so a failed write leaves any
    /// earlier file and its records untouched. A file whose sanitized name
    /// already exists replaces it, and records pointing at the replaced file
    /// are superseded by the new one. The collection is saved once at the end.
    pub async fn upload(
        &self,
        metadata: UploadMetadata,
        files: Vec<IncomingFile>,
    ) -> Result<UploadReport, CatalogError> {
        let target = metadata.validate()?;
        if files.is_empty() {
            return Err(CatalogError::validation(
                "files",
                "choose at least one file",
            ));
        }

        let relative_dir = target.relative_dir();
        let target_dir = self.upload_root.join(&relative_dir);
        fs::create_dir_all(&target_dir).await?;

        let mut guard = self.store.lock().await;
        let mut next = guard.clone();
        let mut report = UploadReport::default();

        for file in files {
            if !has_allowed_extension(&file.filename) {
                report.skip(format!("Skipped unsupported type: {}", file.filename));
                continue;
            }

            let safe_name = secure_filename(&file.filename);
            if safe_name.is_empty() {
                report.skip(format!("Skipped unusable filename: {}", file.filename));
                continue;
            }

            if next.next_id().is_none() {
                report.skip(format!("Couldn't save {safe_name}: no record IDs left"));
                continue;
            }

            let destination = target_dir.join(&safe_name);
            let stored_path = format!("{relative_dir}/{safe_name}");
            let replaced_file = fs::try_exists(&destination).await.unwrap_or(false);

            // Stage next to the destination so the rename never crosses filesystems.
            let staged = target_dir.join(format!(".upload-{}.tmp", uuid::Uuid::new_v4()));
            if let Err(e) = fs::write(&staged, &file.data).await {
                let _ = fs::remove_file(&staged).await;
                report.skip(format!("Couldn't save {safe_name}: {e}"));
                continue;
            }
            if let Err(e) = fs::rename(&staged, &destination).await {
                let _ = fs::remove_file(&staged).await;
                if replaced_file {
                    report.skip(format!("Couldn't replace old duplicate for {safe_name}: {e}"));
                } else {
                    report.skip(format!("Couldn't save {safe_name}: {e}"));
                }
                continue;
            }
            if replaced_file {
                debug!(stored_path = %stored_path, "Replaced previous file");
            }

            report.supersede(next.remove_by_stored_path(&stored_path));
            let record = next.append(NewPaper {
                year: target.year,
                semester: target.semester,
                subject: target.subject.clone(),
                exam_type: target.exam_type,
                exam_year: target.exam_year.start,
                academic_year: target.exam_year.academic_year.clone(),
                original_filename: file.filename,
                stored_path,
                uploaded_at: Local::now().format("%Y-%m-%dT%H:%M:%S").to_string(),
            })?;
            debug!(paper_id = record.id, stored_path = %record.stored_path, "Paper stored");
            report.papers.push(record.clone());
            report.saved += 1;
        }

        self.commit(&mut guard, next).await?;
        info!(
            saved = report.saved,
            skipped = report.skipped,
            replaced = report.replaced,
            dir = %relative_dir,
            "Upload batch processed"
        );

        Ok(report)
    }
}
