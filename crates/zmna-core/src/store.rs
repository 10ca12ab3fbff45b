use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::RwLock;

use crate::record::{VerbDraft, VerbRecord};

/// Persistence of form progress, keyed by record
#[async_trait::async_trait]
pub trait DraftStore: Send + Sync {
    async fn load(&self, key: &str) -> Result<Option<VerbDraft>, StoreError>;

    async fn save(&self, key: &str, draft: &VerbDraft) -> Result<(), StoreError>;

    async fn clear(&self, key: &str) -> Result<(), StoreError>;

    /// Store an assembled record under its key
    async fn publish(&self, record: &VerbRecord) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid key: {0:?}")]
    InvalidKey(String),
}

/// Store kept in memory, counting saves
#[derive(Default)]
pub struct MemoryStore {
    drafts: RwLock<HashMap<String, VerbDraft>>,
    records: RwLock<HashMap<String, VerbRecord>>,
    saves: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub async fn record(&self, key: &str) -> Option<VerbRecord> {
        self.records.read().await.get(key).cloned()
    }
}

#[async_trait::async_trait]
impl DraftStore for MemoryStore {
    async fn load(&self, key: &str) -> Result<Option<VerbDraft>, StoreError> {
        Ok(self.drafts.read().await.get(key).cloned())
    }

    async fn save(&self, key: &str, draft: &VerbDraft) -> Result<(), StoreError> {
        self.drafts
            .write()
            .await
            .insert(key.to_string(), draft.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn clear(&self, key: &str) -> Result<(), StoreError> {
        self.drafts.write().await.remove(key);
        Ok(())
    }

    async fn publish(&self, record: &VerbRecord) -> Result<(), StoreError> {
        self.records
            .write()
            .await
            .insert(record.key().to_string(), record.clone());
        Ok(())
    }
}
