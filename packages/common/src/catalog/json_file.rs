use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{info, warn};

use super::error::CatalogError;
use super::store::PaperStore;
use crate::paper::PaperRecord;

/// The on-disk JSON collection backing a [`PaperStore`].
///
/// The document is a pretty-printed array of records. The ID high-water mark
/// lives in a sidecar `<file>.seq` so deleted IDs stay retired across
/// restarts. Both files are replaced via write-to-temp then rename.
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn sequence_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".seq");
        self.path.with_file_name(name)
    }

    /// Load the collection, creating an empty one on first run.
    pub async fn load_or_init(&self) -> Result<PaperStore, CatalogError> {
        if !fs::try_exists(&self.path).await? {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent).await?;
            }
            write_atomic(&self.path, b"[]").await?;
            info!(path = %self.path.display(), "Initialized empty paper store");
            return Ok(PaperStore::new());
        }
        self.load().await
    }

    /// Load the collection. Missing or malformed data is `StoreUnavailable`.
    pub async fn load(&self) -> Result<PaperStore, CatalogError> {
        let bytes = fs::read(&self.path).await.map_err(|e| {
            CatalogError::StoreUnavailable(format!("cannot read {}: {e}", self.path.display()))
        })?;
        let papers: Vec<PaperRecord> = serde_json::from_slice(&bytes).map_err(|e| {
            CatalogError::StoreUnavailable(format!("malformed {}: {e}", self.path.display()))
        })?;
        let last_id = self.load_sequence().await;
        PaperStore::from_parts(papers, last_id)
    }

    /// The sidecar is advisory: when absent or unreadable the store falls
    /// back to the highest loaded ID.
    async fn load_sequence(&self) -> u64 {
        let path = self.sequence_path();
        match fs::read_to_string(&path).await {
            Ok(text) => text.trim().parse().unwrap_or_else(|_| {
                warn!(path = %path.display(), "Ignoring unreadable ID sequence file");
                0
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => 0,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring unreadable ID sequence file");
                0
            }
        }
    }

    /// Overwrite the collection with `store`.
    ///
    /// The sequence is written first: if the second write fails the mark
    /// can only be ahead of the records, which skips an ID and never reuses one.
    pub async fn save(&self, store: &PaperStore) -> Result<(), CatalogError> {
        write_atomic(&self.sequence_path(), store.last_id().to_string().as_bytes()).await?;
        let rendered = serde_json::to_string_pretty(store.records())?;
        write_atomic(&self.path, rendered.as_bytes()).await
    }
}

async fn write_atomic(path: &Path, data: &[u8]) -> Result<(), CatalogError> {
    let file_name = path.file_name().unwrap_or_default().to_string_lossy();
    let temp_path = path.with_file_name(format!(".{file_name}.{}.tmp", uuid::Uuid::new_v4()));

    if let Err(e) = fs::write(&temp_path, data).await {
        let _ = fs::remove_file(&temp_path).await;
        return Err(e.into());
    }

    if let Err(e) = fs::rename(&temp_path, path).await {
        let _ = fs::remove_file(&temp_path).await;
        return Err(e.into());
    }

    Ok(())
}
