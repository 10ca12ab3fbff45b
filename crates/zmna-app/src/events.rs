use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use tokio_util::sync::CancellationToken;
use zmna_core::session::EditorSession;
use zmna_core::store::DraftStore;
use zmna_lang_georgian::GeorgianPreprocessor;
use zmna_types::AppEvent;

use crate::state::AppState;

pub mod edit;
pub mod record;

use edit::handle_edit;
use record::{handle_clear, handle_load, handle_save};

/// App's main loop. Owns the editor session; returns once `Shutdown`
/// arrives, the channel closes or `cancel` fires, after flushing the draft.
pub async fn event_loop(
    state: Arc<AppState>,
    store: Arc<dyn DraftStore>,
    front_to_app_rx: AsyncReceiver<AppEvent>,
    app_to_front_tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let mut session = {
        let config = state.config.read().await;
        EditorSession::new(&config.editor)
            .with_store(store)
            .with_preprocessor(Arc::new(GeorgianPreprocessor::new()))
    };

    tracing::info!("Event loop started");
    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Event loop cancelled");
                break;
            }
            event = front_to_app_rx.recv() => match event {
                Ok(event) => event,
                Err(e) => {
                    tracing::info!("Event channel closed: {e}");
                    break;
                }
            },
        };

        tracing::debug!("Event received: {:?}", std::mem::discriminant(&event));
        if !handle_events(&mut session, &app_to_front_tx, event).await? {
            break;
        }
    }

    if let Err(e) = session.flush().await {
        tracing::error!("Final draft save failed: {e}");
    }
    tracing::info!("Event loop stopped");
    Ok(())
}

/// Returns false when the loop should stop
async fn handle_events(
    session: &mut EditorSession,
    app_to_front_tx: &AsyncSender<AppEvent>,
    event: AppEvent,
) -> anyhow::Result<bool> {
    match event {
        AppEvent::Edit(edit) => {
            handle_edit(session, edit, app_to_front_tx).await?;
        }
        AppEvent::Load { key } => {
            handle_load(session, &key, app_to_front_tx).await?;
        }
        AppEvent::Clear => {
            handle_clear(session, app_to_front_tx).await?;
        }
        AppEvent::Save => {
            handle_save(session, app_to_front_tx).await?;
        }
        AppEvent::Shutdown => return Ok(false),
        AppEvent::Saved { .. }
        | AppEvent::SaveRejected { .. }
        | AppEvent::VisibilityChanged(_)
        | AppEvent::EditWarnings(_) => {
            // outbound only
        }
    }

    Ok(true)
}
