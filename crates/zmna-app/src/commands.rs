use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, bail};
use zmna_config::Config;
use zmna_core::assembler::RecordAssembler;
use zmna_core::pattern::{ArgumentPattern, scan_gloss, validate_raw_gloss};
use zmna_core::record::{VerbDraft, VerbRecord};
use zmna_core::reference::{ReferenceKind, ReferenceLookup, ReferenceQuery};
use zmna_core::session::EditorSession;
use zmna_examples::{ExampleError, ExampleGenerator, ExampleRequest};
use zmna_lang_georgian::{HttpExampleGenerator, ReferenceLoader};
use zmna_types::{AppEvent, EditEvent, Tense};

use crate::controller::AppController;
use crate::state::AppState;
use crate::storage::FileDraftStore;

/// Read a draft, or a canonical record converted back into one
pub fn read_draft(path: &Path) -> anyhow::Result<VerbDraft> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    if let Ok(record) = VerbRecord::from_json(&json) {
        tracing::debug!("{} is a canonical record", path.display());
        return Ok(VerbDraft::from_record(&record));
    }

    serde_json::from_str(&json)
        .with_context(|| format!("{} is neither a draft nor a record", path.display()))
}

/// Parse JSON-lines edit events, skipping blank lines
pub fn parse_events(text: &str) -> anyhow::Result<Vec<EditEvent>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(n, line)| {
            serde_json::from_str(line).with_context(|| format!("invalid edit event on line {}", n + 1))
        })
        .collect()
}

fn parse_tense(tense: &str) -> anyhow::Result<Tense> {
    Tense::parse(tense).with_context(|| {
        let known: Vec<&str> = Tense::ALL.iter().map(|t| t.as_str()).collect();
        format!("unknown tense {tense:?} (expected one of {})", known.join(", "))
    })
}

fn assemble_record(config: &Config, path: &Path) -> anyhow::Result<VerbRecord> {
    let draft = read_draft(path)?;

    RecordAssembler::new(config.editor.optative_policy)
        .assemble(&draft)
        .map_err(|err| {
            for issue in &err.issues {
                eprintln!("  - {issue}");
            }
            anyhow::Error::new(err)
        })
}

pub fn assemble(config: &Config, path: &Path) -> anyhow::Result<()> {
    let record = assemble_record(config, path)?;
    println!("{}", record.to_json_pretty()?);
    Ok(())
}

pub fn check_gloss(pattern: &str, gloss: &str) -> anyhow::Result<()> {
    let pattern = ArgumentPattern::parse(pattern.trim())?;
    let scan = scan_gloss(gloss);

    if !scan.malformed.is_empty() {
        tracing::warn!("Malformed gloss tokens: {}", scan.malformed.join(" "));
    }

    validate_raw_gloss(gloss, pattern)?;
    println!(
        "ok: {} {} matches {pattern}",
        scan.voice.as_deref().unwrap_or("?"),
        scan.tense_code.as_deref().unwrap_or("?")
    );
    Ok(())
}

pub fn resolve(config: &Config, path: &Path, preverb: &str, tense: &str) -> anyhow::Result<()> {
    let tense = parse_tense(tense)?;
    let session = EditorSession::from_draft(&config.editor, read_draft(path)?);

    let resolution = session.resolve_preverb(preverb, tense);
    println!("effective: {}", resolution.effective);
    println!("used_fallback: {}", resolution.used_fallback);
    if let Some(warning) = &resolution.warning {
        println!("warning: {warning}");
    }
    println!("translation: {}", session.translation(&resolution.effective, tense));
    Ok(())
}

/// Replay `events` against the stored draft for `key` through the event
/// loop, then save.
pub async fn edit(config: Config, key: &str, events: &Path) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(events)
        .with_context(|| format!("failed to read {}", events.display()))?;
    let edits = parse_events(&text)?;

    let store = Arc::new(FileDraftStore::new(&config.storage.data_dir));
    let controller = AppController::new(Arc::new(AppState::new(config)));
    let mut tasks = controller.spawn_tasks(store);

    let rx = controller.receiver();
    let printer = tokio::spawn(async move {
        while let Ok(event) = rx.recv().await {
            match event {
                AppEvent::VisibilityChanged(changes) => {
                    for (section, visible) in changes {
                        println!("{section}: {}", if visible { "shown" } else { "hidden" });
                    }
                }
                AppEvent::EditWarnings(warnings) => {
                    for warning in warnings {
                        println!("warning: {warning}");
                    }
                }
                AppEvent::Saved { key } => {
                    println!("saved {key}");
                    return true;
                }
                AppEvent::SaveRejected { issues } => {
                    for issue in issues {
                        println!("issue: {issue}");
                    }
                    return false;
                }
                _ => {}
            }
        }
        false
    });

    let tx = controller.sender();
    tx.send(AppEvent::Load {
        key: key.to_string(),
    })
    .await?;
    tracing::info!("Replaying {} edits", edits.len());
    for edit in edits {
        tx.send(AppEvent::Edit(edit)).await?;
    }
    tx.send(AppEvent::Save).await?;
    tx.send(AppEvent::Shutdown).await?;

    while let Some(result) = tasks.join_next().await {
        result.context("event loop panicked")??;
    }
    controller.shutdown();

    if !printer.await.context("printer panicked")? {
        bail!("record {key} was not saved");
    }
    Ok(())
}

pub async fn examples(
    config: &Config,
    path: &Path,
    tense: &str,
    preverbs: &[String],
) -> anyhow::Result<()> {
    if !config.examples.enabled {
        let err = ExampleError::Disabled;
        bail!("{err} ({})", err.guidance().unwrap_or_default());
    }

    let tense = parse_tense(tense)?;
    let record = assemble_record(config, path)?;
    let request = ExampleRequest::resolve(&record, tense, preverbs);
    for preverb in &request.preverbs {
        if let Some(warning) = &preverb.warning {
            tracing::warn!("{warning}");
        }
    }

    let generator = HttpExampleGenerator::from_config(&config.examples);
    let metadata = generator.metadata();
    if metadata.authenticated {
        tracing::info!("Using {}", metadata.name);
    } else {
        tracing::warn!("Using {} without an API key", metadata.name);
    }

    match generator.generate(&request).await {
        Ok(set) => {
            println!("{}", serde_json::to_string_pretty(&set)?);
            Ok(())
        }
        Err(err) => {
            if let Some(guidance) = err.guidance() {
                eprintln!("{guidance}");
            }
            Err(err.into())
        }
    }
}

pub fn lookup(
    config: &Config,
    kind: &str,
    text: &str,
    categories: Vec<String>,
    domains: Vec<String>,
) -> anyhow::Result<()> {
    let kind = match kind {
        "noun" | "nouns" => ReferenceKind::Noun,
        "adjective" | "adjectives" => ReferenceKind::Adjective,
        other => bail!("unknown reference kind {other:?} (expected noun or adjective)"),
    };
    let Some(dir) = &config.reference.data_dir else {
        bail!("no reference data directory, set ZMNA_REFERENCE_DIR");
    };

    let data = ReferenceLoader::load_dir(Path::new(dir))?;
    let query = ReferenceQuery {
        text: text.to_string(),
        categories: categories.into_iter().collect(),
        domains: domains.into_iter().collect(),
        max_results: config.reference.max_results,
    };

    for item in data.for_kind(kind).search(&query) {
        println!("{}\t{}", item.key, item.display_label);
    }
    Ok(())
}
