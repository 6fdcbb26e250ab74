use std::collections::{BTreeSet, HashSet};

use super::error::CatalogError;
use crate::paper::{NewPaper, PaperRecord};
use crate::paths::normalize_stored_path;

/// Optional equality filters for listing papers.
///
/// `subject` compares case-insensitively, `exam_type` exactly.
#[derive(Debug, Clone, Default)]
pub struct PaperFilter {
    pub year: Option<u8>,
    pub semester: Option<u8>,
    pub subject: Option<String>,
    pub exam_type: Option<String>,
}

impl PaperFilter {
    fn matches_term(&self, record: &PaperRecord) -> bool {
        self.year.is_none_or(|y| record.year == y)
            && self.semester.is_none_or(|s| record.semester == s)
    }

    fn matches(&self, record: &PaperRecord) -> bool {
        self.matches_term(record)
            && self
                .subject
                .as_deref()
                .is_none_or(|s| record.subject.to_lowercase() == s.to_lowercase())
            && self
                .exam_type
                .as_deref()
                .is_none_or(|t| record.exam_type.as_str() == t)
    }
}

/// Filtered, sorted papers plus subject suggestions.
#[derive(Debug, Clone, PartialEq)]
pub struct PaperListing {
    /// Matches ordered by exam year (newest first), then subject, then exam type.
    pub papers: Vec<PaperRecord>,
    /// Distinct subjects among records matching only the year/semester filters.
    pub subjects: Vec<String>,
}

/// The in-memory paper collection.
///
/// IDs are assigned from a high-water mark so a deleted ID is never handed
/// out again while the mark is retained.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaperStore {
    papers: Vec<PaperRecord>,
    last_id: u64,
}

impl PaperStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from persisted records and the persisted high-water mark.
    ///
    /// Rejects ID 0 and duplicate IDs.
    pub fn from_parts(papers: Vec<PaperRecord>, last_id: u64) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(papers.len());
        for paper in &papers {
            if paper.id == 0 {
                return Err(CatalogError::StoreUnavailable(
                    "record with id 0".to_string(),
                ));
            }
            if !seen.insert(paper.id) {
                return Err(CatalogError::StoreUnavailable(format!(
                    "duplicate record id {}",
                    paper.id
                )));
            }
        }

        let max_id = papers.iter().map(|p| p.id).max().unwrap_or(0);
        Ok(Self {
            papers,
            last_id: last_id.max(max_id),
        })
    }

    pub fn records(&self) -> &[PaperRecord] {
        &self.papers
    }

    pub fn len(&self) -> usize {
        self.papers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.papers.is_empty()
    }

    /// Highest ID ever assigned or loaded.
    pub fn last_id(&self) -> u64 {
        self.last_id
    }

    /// ID the next appended record will receive, or `None` once the ID
    /// space is used up.
    pub fn next_id(&self) -> Option<u64> {
        let max_id = self.papers.iter().map(|p| p.id).max().unwrap_or(0);
        max_id.max(self.last_id).checked_add(1)
    }

    pub fn get(&self, id: u64) -> Option<&PaperRecord> {
        self.papers.iter().find(|p| p.id == id)
    }

    /// Append a record under a freshly assigned ID.
    ///
    /// No metadata-level duplicate check is made.
    pub fn append(&mut self, paper: NewPaper) -> Result<&PaperRecord, CatalogError> {
        let id = self
            .next_id()
            .ok_or(CatalogError::IdsExhausted(self.last_id))?;
        self.last_id = id;
        self.papers.push(paper.with_id(id));
        Ok(&self.papers[self.papers.len() - 1])
    }

    /// Remove the record with `id`, returning it if it existed.
    pub fn remove(&mut self, id: u64) -> Option<PaperRecord> {
        let index = self.papers.iter().position(|p| p.id == id)?;
        Some(self.papers.remove(index))
    }

    /// Remove every record pointing at `stored_path`.
    pub fn remove_by_stored_path(&mut self, stored_path: &str) -> Vec<PaperRecord> {
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.papers)
            .into_iter()
            .partition(|p| p.stored_path == stored_path);
        self.papers = kept;
        removed
    }

    /// Rewrite any non-canonical `stored_path` in place.
    ///
    /// Returns the number of records changed.
    pub fn normalize_paths(&mut self) -> usize {
        let mut changed = 0;
        for paper in &mut self.papers {
            let fixed = normalize_stored_path(&paper.stored_path);
            if fixed != paper.stored_path {
                paper.stored_path = fixed;
                changed += 1;
            }
        }
        changed
    }

    /// Filter and sort for listing.
    pub fn query(&self, filter: &PaperFilter) -> PaperListing {
        let mut papers: Vec<PaperRecord> = self
            .papers
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();

        papers.sort_by(|a, b| {
            b.exam_year
                .cmp(&a.exam_year)
                .then_with(|| a.subject.cmp(&b.subject))
                .then_with(|| a.exam_type.as_str().cmp(b.exam_type.as_str()))
        });

        PaperListing {
            papers,
            subjects: self.subjects(filter),
        }
    }

    /// Sorted distinct subjects among records matching the filter's year and
    /// semester. The subject and exam type filters are ignored.
    pub fn subjects(&self, filter: &PaperFilter) -> Vec<String> {
        let subjects: BTreeSet<&str> = self
            .papers
            .iter()
            .filter(|p| filter.matches_term(p))
            .map(|p| p.subject.as_str())
            .collect();
        subjects.into_iter().map(str::to_string).collect()
    }
}
