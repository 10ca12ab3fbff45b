//! Argument-pattern notation and raw-gloss validation.
//!
//! A pattern names which semantic roles a verb takes, written as a bracketed,
//! hyphen-joined list of role codes. Only four patterns exist:
//! `<S>`, `<S-DO>`, `<S-IO>` and `<S-DO-IO>`.
//!
//! A raw gloss annotates one conjugation: `V <Voice> <TenseCode>` followed by
//! one `<RoleCode:Case>` token per argument, e.g. `V Act Pres <S:Nom> <DO:Dat>`.
//! Its role codes must form exactly the pattern's role set.

use std::collections::BTreeSet;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zmna_types::Role;

use crate::error::{GlossMismatch, PatternError};

static ROLE_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^<(S|DO|IO):([A-Za-z]+)>$").expect("role token regex"));

static HEAD_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9.]*$").expect("gloss head regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArgumentPattern {
    Subject,
    SubjectDirectObject,
    SubjectIndirectObject,
    SubjectDirectIndirectObject,
}

impl ArgumentPattern {
    pub const ALL: [ArgumentPattern; 4] = [
        ArgumentPattern::Subject,
        ArgumentPattern::SubjectDirectObject,
        ArgumentPattern::SubjectIndirectObject,
        ArgumentPattern::SubjectDirectIndirectObject,
    ];

    /// Parse one of the four literal pattern forms. Anything else,
    /// including reorderings such as `<DO-S>`, is rejected.
    pub fn parse(text: &str) -> Result<Self, PatternError> {
        match text {
            "<S>" => Ok(ArgumentPattern::Subject),
            "<S-DO>" => Ok(ArgumentPattern::SubjectDirectObject),
            "<S-IO>" => Ok(ArgumentPattern::SubjectIndirectObject),
            "<S-DO-IO>" => Ok(ArgumentPattern::SubjectDirectIndirectObject),
            _ => Err(PatternError::InvalidPattern(text.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ArgumentPattern::Subject => "<S>",
            ArgumentPattern::SubjectDirectObject => "<S-DO>",
            ArgumentPattern::SubjectIndirectObject => "<S-IO>",
            ArgumentPattern::SubjectDirectIndirectObject => "<S-DO-IO>",
        }
    }

    /// Roles in canonical order
    pub fn roles(&self) -> &'static [Role] {
        match self {
            ArgumentPattern::Subject => &[Role::Subject],
            ArgumentPattern::SubjectDirectObject => &[Role::Subject, Role::DirectObject],
            ArgumentPattern::SubjectIndirectObject => &[Role::Subject, Role::IndirectObject],
            ArgumentPattern::SubjectDirectIndirectObject => {
                &[Role::Subject, Role::DirectObject, Role::IndirectObject]
            }
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles().contains(&role)
    }

    /// Pattern taking exactly `roles`, if one exists
    pub fn from_roles(roles: &BTreeSet<Role>) -> Option<Self> {
        ArgumentPattern::ALL
            .into_iter()
            .find(|p| &role_set_of(*p) == roles)
    }
}

impl fmt::Display for ArgumentPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ArgumentPattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ArgumentPattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        ArgumentPattern::parse(&text).map_err(serde::de::Error::custom)
    }
}

/// Role set of a pattern. `BTreeSet` iterates in canonical role order.
pub fn role_set_of(pattern: ArgumentPattern) -> BTreeSet<Role> {
    pattern.roles().iter().copied().collect()
}

/// Default pattern plus valency alternations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Valency {
    pub default: ArgumentPattern,
    #[serde(default)]
    pub alternatives: Vec<ArgumentPattern>,
}

impl Valency {
    /// Parse default and alternative pattern texts, reporting every invalid
    /// one with the record field it came from.
    pub fn parse(
        default: &str,
        alternatives: &[String],
    ) -> Result<Self, Vec<(String, PatternError)>> {
        let mut errors = Vec::new();

        let default = ArgumentPattern::parse(default)
            .map_err(|e| errors.push(("valency.default".to_string(), e)))
            .ok();

        let mut parsed = Vec::new();
        for (i, text) in alternatives.iter().enumerate() {
            match ArgumentPattern::parse(text) {
                Ok(p) if !parsed.contains(&p) => parsed.push(p),
                Ok(_) => {}
                Err(e) => errors.push((format!("valency.alternatives[{i}]"), e)),
            }
        }

        match default {
            Some(default) if errors.is_empty() => Ok(Self {
                default,
                alternatives: parsed,
            }),
            _ => Err(errors),
        }
    }
}

/// What a raw gloss actually contains
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlossScan {
    pub voice: Option<String>,
    pub tense_code: Option<String>,
    /// Role and case of every well-formed argument token, in gloss order
    pub arguments: Vec<(Role, String)>,
    pub malformed: Vec<String>,
}

impl GlossScan {
    pub fn roles(&self) -> BTreeSet<Role> {
        self.arguments.iter().map(|(role, _)| *role).collect()
    }
}

/// Tokenize a raw gloss against `V <Voice> <TenseCode> (<RoleCode:Case>)+`.
pub fn scan_gloss(gloss: &str) -> GlossScan {
    let tokens: Vec<&str> = gloss.split_whitespace().collect();
    let mut scan = GlossScan::default();

    let args_start = tokens
        .iter()
        .position(|t| ROLE_TOKEN.is_match(t))
        .unwrap_or(tokens.len());

    match &tokens[..args_start] {
        ["V", voice, tense] if HEAD_TOKEN.is_match(voice) && HEAD_TOKEN.is_match(tense) => {
            scan.voice = Some(voice.to_string());
            scan.tense_code = Some(tense.to_string());
        }
        head => scan.malformed.push(if head.is_empty() {
            "<missing V Voice Tense>".to_string()
        } else {
            head.join(" ")
        }),
    }

    for token in &tokens[args_start..] {
        match ROLE_TOKEN.captures(token) {
            Some(caps) => {
                if let Some(role) = Role::from_code(&caps[1]) {
                    scan.arguments.push((role, caps[2].to_string()));
                }
            }
            None => scan.malformed.push(token.to_string()),
        }
    }

    if scan.arguments.is_empty() && scan.malformed.is_empty() {
        scan.malformed.push("<no argument tokens>".to_string());
    }

    scan
}

/// Require the gloss's role codes to equal the pattern's role set.
/// Order and repetition do not matter.
pub fn validate_raw_gloss(gloss: &str, pattern: ArgumentPattern) -> Result<(), GlossMismatch> {
    let scan = scan_gloss(gloss);
    let expected = role_set_of(pattern);
    let found = scan.roles();

    if scan.malformed.is_empty() && found == expected {
        Ok(())
    } else {
        Err(GlossMismatch {
            expected,
            found,
            malformed: scan.malformed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_only_the_four_literals() {
        for pattern in ArgumentPattern::ALL {
            assert_eq!(ArgumentPattern::parse(pattern.as_str()), Ok(pattern));
        }

        for bad in ["<DO-S>", "<S-IO-DO>", "<IO>", "S-DO", "<S-DO> ", "<s-do>", "", "<>"] {
            assert_eq!(
                ArgumentPattern::parse(bad),
                Err(PatternError::InvalidPattern(bad.to_string())),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn role_sets_are_canonical() {
        let roles: Vec<Role> = role_set_of(ArgumentPattern::SubjectDirectIndirectObject)
            .into_iter()
            .collect();
        assert_eq!(roles, vec![Role::Subject, Role::DirectObject, Role::IndirectObject]);

        let set: BTreeSet<Role> = [Role::IndirectObject, Role::Subject].into_iter().collect();
        assert_eq!(
            ArgumentPattern::from_roles(&set),
            Some(ArgumentPattern::SubjectIndirectObject)
        );
    }

    #[test]
    fn gloss_matching_pattern_validates() {
        assert_eq!(
            validate_raw_gloss("V Act Pres <S:Nom> <DO:Dat>", ArgumentPattern::SubjectDirectObject),
            Ok(())
        );
        assert_eq!(
            validate_raw_gloss("V Act Aor <DO:Nom> <S:Erg>", ArgumentPattern::SubjectDirectObject),
            Ok(())
        );
    }

    #[test]
    fn gloss_with_wrong_role_reports_both_sets() {
        let err = validate_raw_gloss("V Act Pres <S:Nom> <IO:Dat>", ArgumentPattern::SubjectDirectObject)
            .unwrap_err();

        assert_eq!(err.expected, [Role::Subject, Role::DirectObject].into_iter().collect::<BTreeSet<_>>());
        assert_eq!(err.found, [Role::Subject, Role::IndirectObject].into_iter().collect::<BTreeSet<_>>());
        assert!(err.malformed.is_empty());
    }

    #[test]
    fn missing_and_extra_roles_fail() {
        assert!(validate_raw_gloss("V Act Pres <S:Nom>", ArgumentPattern::SubjectDirectObject).is_err());
        assert!(
            validate_raw_gloss("V Act Pres <S:Nom> <DO:Dat> <IO:Dat>", ArgumentPattern::SubjectDirectObject)
                .is_err()
        );
    }

    #[test]
    fn malformed_tokens_fail_even_when_roles_match() {
        let err = validate_raw_gloss("V Act Pres <S:Nom> <DO-Dat>", ArgumentPattern::Subject).unwrap_err();
        assert_eq!(err.malformed, vec!["<DO-Dat>".to_string()]);

        let err = validate_raw_gloss("Act Pres <S:Nom>", ArgumentPattern::Subject).unwrap_err();
        assert_eq!(err.malformed, vec!["Act Pres".to_string()]);
        assert_eq!(err.found, err.expected);

        assert!(validate_raw_gloss("V Act Pres", ArgumentPattern::Subject).is_err());
    }

    #[test]
    fn scan_keeps_voice_tense_and_cases() {
        let scan = scan_gloss("V MedAct Fut <S:Erg> <IO:Dat>");
        assert_eq!(scan.voice.as_deref(), Some("MedAct"));
        assert_eq!(scan.tense_code.as_deref(), Some("Fut"));
        assert_eq!(
            scan.arguments,
            vec![(Role::Subject, "Erg".to_string()), (Role::IndirectObject, "Dat".to_string())]
        );
    }

    #[test]
    fn valency_parse_reports_each_bad_field() {
        let errors = Valency::parse("<S-DO>", &["<S>".to_string(), "<X>".to_string()]).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].0, "valency.alternatives[1]");

        let valency = Valency::parse("<S-DO>", &["<S>".to_string(), "<S>".to_string()]).unwrap();
        assert_eq!(valency.alternatives, vec![ArgumentPattern::Subject]);
    }

    #[test]
    fn pattern_serializes_as_literal() {
        let json = serde_json::to_string(&ArgumentPattern::SubjectIndirectObject).unwrap();
        assert_eq!(json, "\"<S-IO>\"");
        assert!(serde_json::from_str::<ArgumentPattern>("\"<IO-S>\"").is_err());
    }
}
