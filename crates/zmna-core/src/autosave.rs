use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::record::VerbDraft;
use crate::store::{DraftStore, StoreError};

struct PendingSave {
    key: String,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Debounced persistence of the latest draft.
///
/// Every `schedule` supersedes the pending one, so a burst of edits ends in
/// a single write of the newest snapshot. Intermediate states are never
/// queued.
pub struct Autosave {
    store: Arc<dyn DraftStore>,
    delay: Duration,
    pending: Option<PendingSave>,
}

impl Autosave {
    pub fn new(store: Arc<dyn DraftStore>, delay: Duration) -> Self {
        Self {
            store,
            delay,
            pending: None,
        }
    }

    pub fn store(&self) -> &Arc<dyn DraftStore> {
        &self.store
    }

    /// Must be called from within a tokio runtime.
    pub fn schedule(&mut self, key: &str, draft: VerbDraft) {
        if let Some(previous) = self.pending.take() {
            previous.cancel.cancel();
        }

        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let store = Arc::clone(&self.store);
        let delay = self.delay;
        let task_key = key.to_string();

        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    tracing::debug!("Autosave of {task_key} superseded");
                    return;
                }
                _ = tokio::time::sleep(delay) => {}
            }

            match store.save(&task_key, &draft).await {
                Ok(()) => tracing::debug!("Autosaved {task_key}"),
                Err(e) => tracing::error!("Autosave of {task_key} failed: {e}"),
            }
        });

        self.pending = Some(PendingSave {
            key: key.to_string(),
            cancel,
            handle,
        });
    }

    /// Key of a save that has not completed yet
    pub fn pending_key(&self) -> Option<&str> {
        self.pending
            .as_ref()
            .filter(|p| !p.handle.is_finished())
            .map(|p| p.key.as_str())
    }

    /// Cancel the pending save and wait, so no write for it can land after
    /// this returns. A save already writing is allowed to finish.
    pub async fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.cancel.cancel();
            if let Err(e) = pending.handle.await {
                tracing::error!("Autosave task for {} failed: {e}", pending.key);
            }
        }
    }

    /// Persist `draft` immediately in place of whatever was pending
    pub async fn flush(&mut self, key: &str, draft: &VerbDraft) -> Result<(), StoreError> {
        self.cancel().await;
        self.store.save(key, draft).await
    }
}
