use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::Serialize;
use tokio::fs;

use super::Catalog;
use super::error::CatalogError;
use crate::paths::resolve_within;

/// Drift between records and files under the upload root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct ReconcileReport {
    /// IDs of records whose file is missing.
    pub missing_files: Vec<u64>,
    /// Stored-path style paths of files that no record points at.
    pub orphaned_files: Vec<String>,
}

impl ReconcileReport {
    pub fn is_consistent(&self) -> bool {
        self.missing_files.is_empty() && self.orphaned_files.is_empty()
    }
}

impl Catalog {
    /// Compare records against the files on disk. Read-only.
    pub async fn reconcile(&self) -> Result<ReconcileReport, CatalogError> {
        let guard = self.store.lock().await;

        let mut report = ReconcileReport::default();
        let mut recorded = BTreeSet::new();
        for paper in guard.records() {
            recorded.insert(paper.stored_path.as_str());
            let present = match resolve_within(&self.upload_root, &paper.stored_path) {
                Some(path) => fs::try_exists(&path).await?,
                None => false,
            };
            if !present {
                report.missing_files.push(paper.id);
            }
        }

        let mut pending: Vec<(PathBuf, String)> = vec![(self.upload_root.clone(), String::new())];
        while let Some((dir, prefix)) = pending.pop() {
            let mut entries = fs::read_dir(&dir).await?;
            while let Some(entry) = entries.next_entry().await? {
                let name = entry.file_name().to_string_lossy().into_owned();
                let relative = if prefix.is_empty() {
                    name
                } else {
                    format!("{prefix}/{name}")
                };
                let file_type = entry.file_type().await?;
                if file_type.is_dir() {
                    pending.push((entry.path(), relative));
                } else if !recorded.contains(relative.as_str()) {
                    report.orphaned_files.push(relative);
                }
            }
        }
        report.orphaned_files.sort();

        Ok(report)
    }
}
