use std::collections::BTreeSet;

use zmna_types::{Role, Tense};

fn role_list(roles: &BTreeSet<Role>) -> String {
    let codes: Vec<&str> = roles.iter().map(|r| r.code()).collect();
    format!("{{{}}}", codes.join(", "))
}

fn malformed_suffix(tokens: &[String]) -> String {
    if tokens.is_empty() {
        String::new()
    } else {
        format!(" (malformed: {})", tokens.join(" "))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("Invalid argument pattern: {0:?} (expected one of <S>, <S-DO>, <S-IO>, <S-DO-IO>)")]
    InvalidPattern(String),
}

/// Raw gloss roles disagree with the argument pattern.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "Gloss mismatch: expected roles {}, found {}{}",
    role_list(.expected),
    role_list(.found),
    malformed_suffix(.malformed)
)]
pub struct GlossMismatch {
    pub expected: BTreeSet<Role>,
    pub found: BTreeSet<Role>,
    /// Tokens that did not fit the gloss grammar
    pub malformed: Vec<String>,
}

/// Advisory outcome of preverb resolution. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionWarning {
    #[error("Preverb {requested:?} is not configured for this verb, using {substitute:?}")]
    PreverbNotConfigured { requested: String, substitute: String },

    #[error("Preverb {requested:?} has no {tense} form, showing {substitute:?}")]
    TenseFallback {
        requested: String,
        tense: Tense,
        substitute: String,
    },
}

/// A visibility predicate failed; its section was forced hidden.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Visibility predicate for section {section:?} faulted: {message}")]
pub struct PredicateFault {
    pub section: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssemblyIssue {
    #[error("{field}: {source}")]
    InvalidPattern { field: String, source: PatternError },

    #[error("{tense} raw gloss: {source}")]
    GlossMismatch { tense: Tense, source: GlossMismatch },

    #[error("Default preverb {default:?} is not among the available preverbs {available:?}")]
    DefaultPreverbNotAvailable { default: String, available: Vec<String> },

    #[error("Georgian wrapper is empty, the record has no identity key")]
    MissingWrapper,
}

/// A record failed cross-field validation. Carries every issue found.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Record failed validation with {} issue(s): {}", .issues.len(), issue_list(.issues))]
pub struct AssemblyError {
    pub issues: Vec<AssemblyIssue>,
}

fn issue_list(issues: &[AssemblyIssue]) -> String {
    issues
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl AssemblyError {
    pub fn messages(&self) -> Vec<String> {
        self.issues.iter().map(|i| i.to_string()).collect()
    }
}
