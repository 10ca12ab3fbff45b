use std::path::{Path, PathBuf};

use async_trait::async_trait;
use zmna_core::record::{VerbDraft, VerbRecord};
use zmna_core::store::{DraftStore, StoreError};

/// Drafts as pretty JSON files, one per record key, plus assembled records
/// next to them.
pub struct FileDraftStore {
    root: PathBuf,
}

impl FileDraftStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn drafts_dir(&self) -> PathBuf {
        self.root.join("drafts")
    }

    fn records_dir(&self) -> PathBuf {
        self.root.join("records")
    }

    fn file_for(dir: &Path, key: &str) -> Result<PathBuf, StoreError> {
        let key = key.trim();
        let invalid = key.is_empty()
            || key.starts_with('.')
            || key.chars().any(|c| matches!(c, '/' | '\\' | ':') || c.is_control());

        if invalid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }

        Ok(dir.join(format!("{key}.json")))
    }

    /// Write to a sibling temp file first so a crash never leaves half a file
    async fn write_atomic(path: &Path, contents: String) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, contents).await?;
        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }

    pub fn record_path(&self, key: &str) -> Result<PathBuf, StoreError> {
        Self::file_for(&self.records_dir(), key)
    }
}

#[async_trait]
impl DraftStore for FileDraftStore {
    async fn load(&self, key: &str) -> Result<Option<VerbDraft>, StoreError> {
        let path = Self::file_for(&self.drafts_dir(), key)?;

        match tokio::fs::read_to_string(&path).await {
            Ok(data) => Ok(Some(serde_json::from_str(&data)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, key: &str, draft: &VerbDraft) -> Result<(), StoreError> {
        let path = Self::file_for(&self.drafts_dir(), key)?;
        Self::write_atomic(&path, serde_json::to_string_pretty(draft)?).await?;
        tracing::debug!("Saved draft {}", path.display());
        Ok(())
    }

    async fn clear(&self, key: &str) -> Result<(), StoreError> {
        let path = Self::file_for(&self.drafts_dir(), key)?;

        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn publish(&self, record: &VerbRecord) -> Result<(), StoreError> {
        let path = self.record_path(record.key())?;
        Self::write_atomic(&path, record.to_json_pretty()?).await?;
        tracing::info!("Wrote record {}", path.display());
        Ok(())
    }
}
