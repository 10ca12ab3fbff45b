use kanal::AsyncSender;
use zmna_core::session::EditorSession;
use zmna_lang_georgian::preverbs::unknown_preverbs;
use zmna_types::{AppEvent, EditEvent};

pub async fn handle_edit(
    session: &mut EditorSession,
    edit: EditEvent,
    app_to_front_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let adds_preverb = matches!(edit, EditEvent::AddPreverb { .. });
    let mut outcome = session.apply(edit);

    if adds_preverb {
        let available = &session.draft().preverb_config.available_preverbs;
        outcome.warnings.extend(
            unknown_preverbs(available)
                .into_iter()
                .map(|p| format!("{p:?} is not a known Georgian preverb")),
        );
    }

    if !outcome.visibility.transitions.is_empty() {
        let changes = outcome
            .visibility
            .transitions
            .into_iter()
            .map(|t| (t.section, t.visible))
            .collect();
        app_to_front_tx
            .send(AppEvent::VisibilityChanged(changes))
            .await?;
    }

    if !outcome.warnings.is_empty() {
        for warning in &outcome.warnings {
            tracing::warn!("{warning}");
        }
        app_to_front_tx
            .send(AppEvent::EditWarnings(outcome.warnings))
            .await?;
    }

    Ok(())
}
