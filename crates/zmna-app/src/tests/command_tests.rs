use std::path::PathBuf;

use zmna_core::assembler::RecordAssembler;
use zmna_core::record::VerbDraft;
use zmna_types::{EditEvent, Tense};

use crate::commands::{check_gloss, parse_events, read_draft};

fn scratch_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("zmna-{}-{name}", std::process::id()));
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_parse_events_skips_blank_lines() {
    let text = r#"{"op": "set_pattern", "pattern": "<S-DO>"}

{"op": "set_raw_gloss", "tense": "present", "gloss": "V Act Pres <S:Nom> <DO:Dat>"}
"#;
    let events = parse_events(text).unwrap();

    assert_eq!(events.len(), 2);
    assert_eq!(
        events[0],
        EditEvent::SetPattern {
            pattern: "<S-DO>".to_string()
        }
    );
    assert!(matches!(
        events[1],
        EditEvent::SetRawGloss {
            tense: Tense::Present,
            ..
        }
    ));
}

#[test]
fn test_parse_events_reports_the_line() {
    let err = parse_events("{\"op\": \"set_pattern\", \"pattern\": \"<S>\"}\n{\"op\": \"nope\"}").unwrap_err();
    assert!(err.to_string().contains("line 2"));
}

#[test]
fn test_read_draft_accepts_records_and_drafts() {
    let mut draft = VerbDraft::default();
    draft.scalars.georgian_wrapper = "წერა".to_string();
    draft.pattern = "<S-DO>".to_string();
    let record = RecordAssembler::default().assemble(&draft).unwrap();

    let record_file = scratch_file("record.json", &record.to_json_pretty().unwrap());
    let from_record = read_draft(&record_file).unwrap();
    assert_eq!(from_record.pattern, "<S-DO>");
    assert_eq!(from_record.scalars.georgian_wrapper, "წერა");

    let draft_file = scratch_file("draft.json", &serde_json::to_string(&draft).unwrap());
    assert_eq!(read_draft(&draft_file).unwrap(), draft);
}

#[test]
fn test_check_gloss() {
    assert!(check_gloss("<S-DO>", "V Act Pres <S:Nom> <DO:Dat>").is_ok());
    assert!(check_gloss("<S-DO>", "V Act Pres <S:Nom> <IO:Dat>").is_err());
    assert!(check_gloss("<DO>", "V Act Pres <S:Nom>").is_err());
}
