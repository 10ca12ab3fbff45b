//! Canonical verb record and the editable draft it is assembled from.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use zmna_types::{Person, Role, Tense};

use crate::binding::BindingSnapshot;
use crate::pattern::{ArgumentPattern, Valency};
use crate::preverb::{PreverbConfig, PreverbRules, resolve_argument_override};
use crate::translation::TranslationBlock;
use crate::visibility::sections::{FLAG_HAS_ALTERNATIVES, FLAG_OVERRIDE_ARGUMENTS};

/// Key of the translation block every record carries
pub const DEFAULT_TRANSLATION_KEY: &str = "default";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prepositions {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub direct_object: String,
    #[serde(default)]
    pub indirect_object: String,
}

impl Prepositions {
    pub fn get(&self, role: Role) -> &str {
        match role {
            Role::Subject => &self.subject,
            Role::DirectObject => &self.direct_object,
            Role::IndirectObject => &self.indirect_object,
        }
    }

    pub fn set(&mut self, role: Role, value: String) {
        match role {
            Role::Subject => self.subject = value,
            Role::DirectObject => self.direct_object = value,
            Role::IndirectObject => self.indirect_object = value,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Syntax {
    #[serde(default)]
    pub arguments: BindingSnapshot,
    #[serde(default)]
    pub prepositions: Prepositions,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Conjugation {
    #[serde(default)]
    pub raw_gloss: String,
    #[serde(default)]
    pub forms: BTreeMap<Person, String>,
    /// Produced by the example service, opaque here
    #[serde(default)]
    pub examples: Vec<serde_json::Value>,
}

/// The canonical record handed to persistence and the example service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerbRecord {
    /// Identity key
    pub georgian_wrapper: String,
    /// Presentation form, deliberately separate from the key
    pub georgian_display: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub semantic_key: String,
    pub global_argument_pattern: ArgumentPattern,
    pub valency: Valency,
    #[serde(default)]
    pub syntax: Syntax,
    #[serde(default)]
    pub english_translations: BTreeMap<String, TranslationBlock>,
    #[serde(default)]
    pub conjugations: BTreeMap<Tense, Conjugation>,
    #[serde(default)]
    pub preverb_config: PreverbConfig,
    #[serde(default)]
    pub preverb_rules: PreverbRules,
}

impl VerbRecord {
    pub fn key(&self) -> &str {
        &self.georgian_wrapper
    }

    pub fn default_translations(&self) -> Option<&TranslationBlock> {
        self.english_translations.get(DEFAULT_TRANSLATION_KEY)
    }

    /// Argument bindings as they apply to `preverb` in `tense`, overrides
    /// merged in. The imperative binds second person slots only.
    pub fn resolved_arguments(&self, preverb: &str, tense: Tense) -> BindingSnapshot {
        let mut resolved = BindingSnapshot::new();

        for role in self.global_argument_pattern.roles() {
            let base = self.syntax.arguments.get(role);

            for person in tense.persons_for(*role) {
                let base_binding = base.and_then(|b| b.get(&person)).cloned().unwrap_or_default();
                let binding = resolve_argument_override(
                    preverb,
                    *role,
                    person,
                    &self.preverb_config,
                    &self.preverb_rules,
                    &base_binding,
                );
                if !binding.is_empty() {
                    resolved.entry(*role).or_default().insert(person, binding);
                }
            }
        }

        resolved
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Plain text fields of the form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScalarFields {
    pub georgian_wrapper: String,
    pub georgian_display: String,
    pub description: String,
    pub semantic_key: String,
    pub prepositions: Prepositions,
}

/// Everything authored for one tense
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TenseEntry {
    pub raw_gloss: String,
    pub forms: BTreeMap<Person, String>,
    pub examples: Vec<serde_json::Value>,
    /// Default English translation for this tense
    pub translation: String,
}

/// Form progress as authored, possibly incomplete or inconsistent.
/// This is what gets autosaved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerbDraft {
    pub scalars: ScalarFields,
    /// Default pattern text as typed
    pub pattern: String,
    pub alternatives: Vec<String>,
    pub bindings: BindingSnapshot,
    pub preverb_config: PreverbConfig,
    pub preverb_rules: PreverbRules,
    pub tenses: BTreeMap<Tense, TenseEntry>,
    pub flags: BTreeMap<String, bool>,
}

impl VerbDraft {
    pub fn tense(&self, tense: Tense) -> Option<&TenseEntry> {
        self.tenses.get(&tense)
    }

    pub fn tense_mut(&mut self, tense: Tense) -> &mut TenseEntry {
        self.tenses.entry(tense).or_default()
    }

    pub fn default_translations(&self) -> TranslationBlock {
        self.tenses
            .iter()
            .filter(|(_, entry)| !entry.translation.trim().is_empty())
            .map(|(tense, entry)| (*tense, entry.translation.clone()))
            .collect()
    }

    /// Rebuild the draft a record was assembled from.
    ///
    /// Rules, overrides and translations for preverbs that are no longer
    /// configured come back untouched. Per-preverb translation blocks are
    /// derived data and are not read back, and neither is default text that
    /// only repeats the description.
    pub fn from_record(record: &VerbRecord) -> Self {
        let defaults = record.default_translations();

        let tenses = Tense::ALL
            .into_iter()
            .filter_map(|tense| {
                let conjugation = record.conjugations.get(&tense);
                // text the chain took from the description stays derived
                let translation = defaults
                    .and_then(|d| d.get(&tense))
                    .filter(|text| **text != record.description)
                    .cloned()
                    .unwrap_or_default();

                if conjugation.is_none() && translation.is_empty() {
                    return None;
                }

                let conjugation = conjugation.cloned().unwrap_or_default();
                Some((
                    tense,
                    TenseEntry {
                        raw_gloss: conjugation.raw_gloss,
                        forms: conjugation.forms,
                        examples: conjugation.examples,
                        translation,
                    },
                ))
            })
            .collect();

        let flags = BTreeMap::from([
            (
                FLAG_HAS_ALTERNATIVES.to_string(),
                !record.valency.alternatives.is_empty(),
            ),
            (
                FLAG_OVERRIDE_ARGUMENTS.to_string(),
                !record.preverb_rules.argument_overrides.is_empty(),
            ),
        ]);

        Self {
            scalars: ScalarFields {
                georgian_wrapper: record.georgian_wrapper.clone(),
                georgian_display: record.georgian_display.clone(),
                description: record.description.clone(),
                semantic_key: record.semantic_key.clone(),
                prepositions: record.syntax.prepositions.clone(),
            },
            pattern: record.valency.default.as_str().to_string(),
            alternatives: record
                .valency
                .alternatives
                .iter()
                .map(|p| p.as_str().to_string())
                .collect(),
            bindings: record.syntax.arguments.clone(),
            preverb_config: record.preverb_config.clone(),
            preverb_rules: record.preverb_rules.clone(),
            tenses,
            flags,
        }
    }
}
