//! The paper catalog: a JSON record store coupled to an upload directory tree.
//!
//! Files live at `upload_root/<year>/<semester>/<subject>/<exam_type>/<name>`
//! and each has exactly one record. File and record writes are not
//! transactional; [`Catalog::reconcile`] reports any drift between them.

mod error;
mod json_file;
mod reconcile;
mod store;
mod upload;

use std::path::{Path, PathBuf};

use serde::Serialize;
use tokio::fs;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

pub use error::CatalogError;
pub use json_file::JsonFile;
pub use reconcile::ReconcileReport;
pub use store::{PaperFilter, PaperListing, PaperStore};
pub use upload::{IncomingFile, PaperTarget, UploadMetadata, UploadReport};

use crate::paper::PaperRecord;
use crate::paths::{normalize_stored_path, resolve_within};

/// Outcome of deleting a paper.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct DeleteReport {
    pub deleted: PaperRecord,
    /// Best-effort file removal problems. The record is gone regardless.
    pub warnings: Vec<String>,
}

/// Owns the paper collection and the upload root.
///
/// Every mutation runs mutate-a-copy, save, then commit under one lock, so
/// writers in this process are serialized and a failed save leaves the
/// in-memory collection identical to the file on disk.
pub struct Catalog {
    upload_root: PathBuf,
    file: JsonFile,
    store: Mutex<PaperStore>,
}

impl Catalog {
    /// Open (or initialize) the catalog and heal non-canonical stored paths.
    pub async fn open(upload_root: PathBuf, data_file: PathBuf) -> Result<Self, CatalogError> {
        fs::create_dir_all(&upload_root).await?;

        let file = JsonFile::new(data_file);
        let mut store = file.load_or_init().await?;

        let healed = store.normalize_paths();
        if healed > 0 {
            match file.save(&store).await {
                Ok(()) => info!(healed, "Normalized stored_path values to forward slashes"),
                Err(e) => warn!(healed, error = %e, "Failed to persist normalized stored paths"),
            }
        }

        info!(
            upload_root = %upload_root.display(),
            data_file = %file.path().display(),
            papers = store.len(),
            "Paper catalog opened"
        );

        Ok(Self {
            upload_root,
            file,
            store: Mutex::new(store),
        })
    }

    pub fn upload_root(&self) -> &Path {
        &self.upload_root
    }

    pub async fn len(&self) -> usize {
        self.store.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.lock().await.is_empty()
    }

    pub async fn get(&self, id: u64) -> Option<PaperRecord> {
        self.store.lock().await.get(id).cloned()
    }

    /// Filtered, sorted listing with subject suggestions.
    pub async fn list(&self, filter: &PaperFilter) -> PaperListing {
        self.store.lock().await.query(filter)
    }

    /// Sorted distinct subjects recorded for a year and semester.
    pub async fn subjects(&self, year: u8, semester: u8) -> Vec<String> {
        let filter = PaperFilter {
            year: Some(year),
            semester: Some(semester),
            ..Default::default()
        };
        self.store.lock().await.subjects(&filter)
    }

    /// Persist `next` and make it the live collection.
    async fn commit(
        &self,
        guard: &mut MutexGuard<'_, PaperStore>,
        next: PaperStore,
    ) -> Result<(), CatalogError> {
        self.file.save(&next).await?;
        **guard = next;
        Ok(())
    }

    /// Remove a record and best-effort remove its file.
    ///
    /// A missing file is fine; any other unlink failure becomes a warning and
    /// the record is removed anyway.
    pub async fn delete(&self, id: u64) -> Result<DeleteReport, CatalogError> {
        let mut guard = self.store.lock().await;
        let mut next = guard.clone();
        let deleted = next.remove(id).ok_or(CatalogError::NotFound(id))?;

        let mut warnings = Vec::new();
        if !deleted.stored_path.is_empty() {
            match resolve_within(&self.upload_root, &deleted.stored_path) {
                Some(path) => match fs::remove_file(&path).await {
                    Ok(()) => debug!(paper_id = id, path = %path.display(), "Removed paper file"),
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                        debug!(paper_id = id, "Paper file already absent")
                    }
                    Err(e) => {
                        warn!(paper_id = id, error = %e, "Failed to remove paper file");
                        warnings.push(format!("Couldn't remove file from disk: {e}"));
                    }
                },
                None => {
                    warn!(paper_id = id, stored_path = %deleted.stored_path, "Stored path escapes upload root");
                    warnings.push(format!(
                        "Left file in place: stored path '{}' is outside the upload root",
                        deleted.stored_path
                    ));
                }
            }
        }

        self.commit(&mut guard, next).await?;
        info!(paper_id = id, "Paper deleted");

        Ok(DeleteReport { deleted, warnings })
    }

    /// Resolve a client-supplied relative path to a readable file under the
    /// upload root.
    ///
    /// Either separator convention is accepted. Anything resolving outside the
    /// root, including through symlinks, is `PathRejected`.
    pub async fn resolve_file(&self, relative: &str) -> Result<PathBuf, CatalogError> {
        let normalized = normalize_stored_path(relative);
        let candidate = resolve_within(&self.upload_root, &normalized)
            .ok_or_else(|| CatalogError::PathRejected(relative.to_string()))?;

        let root = fs::canonicalize(&self.upload_root).await?;
        let resolved = match fs::canonicalize(&candidate).await {
            Ok(path) => path,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CatalogError::FileNotFound(normalized));
            }
            Err(e) => return Err(e.into()),
        };

        if !resolved.starts_with(&root) {
            warn!(requested = %relative, "File request resolved outside upload root");
            return Err(CatalogError::PathRejected(relative.to_string()));
        }

        if !fs::metadata(&resolved).await?.is_file() {
            return Err(CatalogError::FileNotFound(normalized));
        }

        Ok(resolved)
    }
}
