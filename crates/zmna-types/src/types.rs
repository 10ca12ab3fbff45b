use serde::{Deserialize, Serialize};

use crate::grammar::{BindingField, Person, Role, Tense};

#[derive(Debug, Clone)]
pub enum AppEvent {
    Edit(EditEvent),
    /// Switch the editor to another record
    Load {
        key: String,
    },
    Clear,
    Save,
    Saved {
        key: String,
    },
    SaveRejected {
        issues: Vec<String>,
    },
    VisibilityChanged(Vec<(String, bool)>),
    /// Advisory problems with the last edit
    EditWarnings(Vec<String>),
    Shutdown,
}

/// Plain text fields of a verb record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarField {
    Wrapper,
    Display,
    Description,
    SemanticKey,
}

/// One discrete user edit of the verb form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditEvent {
    SetScalar {
        field: ScalarField,
        value: String,
    },
    SetPattern {
        pattern: String,
    },
    SetAlternatives {
        patterns: Vec<String>,
    },
    SetPreposition {
        role: Role,
        value: String,
    },
    SetBinding {
        role: Role,
        person: Person,
        field: BindingField,
        value: String,
    },
    SetHasMultiplePreverbs {
        enabled: bool,
    },
    AddPreverb {
        preverb: String,
    },
    RemovePreverb {
        preverb: String,
    },
    SetDefaultPreverb {
        preverb: String,
    },
    /// One fallback authored for several tenses at once
    SetTenseFallback {
        preverb: String,
        tenses: Vec<Tense>,
        fallback: String,
    },
    ClearTenseFallback {
        preverb: String,
        tense: Tense,
    },
    SetPreverbTranslation {
        preverb: String,
        tense: Tense,
        text: String,
    },
    SetArgumentOverride {
        preverb: String,
        role: Role,
        person: Person,
        field: BindingField,
        value: String,
    },
    SetTranslation {
        tense: Tense,
        text: String,
    },
    SetRawGloss {
        tense: Tense,
        gloss: String,
    },
    SetForm {
        tense: Tense,
        person: Person,
        form: String,
    },
    SetFlag {
        name: String,
        value: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_events_are_tagged_by_op() {
        let event: EditEvent = serde_json::from_str(
            r#"{"op":"set_binding","role":"direct_object","person":"3sg","field":"noun","value":"წიგნი"}"#,
        )
        .unwrap();

        assert_eq!(
            event,
            EditEvent::SetBinding {
                role: Role::DirectObject,
                person: Person::Third,
                field: BindingField::Noun,
                value: "წიგნი".to_string(),
            }
        );
    }
}
