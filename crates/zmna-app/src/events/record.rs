use anyhow::Context;
use kanal::AsyncSender;
use zmna_core::session::{EditorSession, SaveError};
use zmna_types::AppEvent;

/// Switch records and report the full visibility state of the new one
pub async fn handle_load(
    session: &mut EditorSession,
    key: &str,
    app_to_front_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    match session.load(key).await {
        Ok(_) => send_visibility(session, app_to_front_tx).await,
        Err(e) => {
            tracing::error!("Failed to load {key}: {e}");
            app_to_front_tx
                .send(AppEvent::EditWarnings(vec![format!("Could not load {key}: {e}")]))
                .await?;
            Ok(())
        }
    }
}

pub async fn handle_clear(
    session: &mut EditorSession,
    app_to_front_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    session.clear().await.context("failed to clear stored draft")?;
    send_visibility(session, app_to_front_tx).await
}

pub async fn handle_save(
    session: &mut EditorSession,
    app_to_front_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let reply = match session.save().await {
        Ok(record) => AppEvent::Saved {
            key: record.key().to_string(),
        },
        Err(SaveError::Rejected(err)) => {
            tracing::warn!("Save rejected: {err}");
            AppEvent::SaveRejected {
                issues: err.messages(),
            }
        }
        Err(e) => {
            tracing::error!("Save failed: {e}");
            AppEvent::SaveRejected {
                issues: vec![e.to_string()],
            }
        }
    };

    app_to_front_tx.send(reply).await?;
    Ok(())
}

async fn send_visibility(
    session: &EditorSession,
    app_to_front_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let states = session.visibility().all_states().into_iter().collect();
    app_to_front_tx
        .send(AppEvent::VisibilityChanged(states))
        .await?;
    Ok(())
}
