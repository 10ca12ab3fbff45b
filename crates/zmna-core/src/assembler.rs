use std::collections::BTreeMap;

use zmna_config::OptativePolicy;
use zmna_types::Tense;

use crate::binding::BindingSnapshot;
use crate::error::{AssemblyError, AssemblyIssue};
use crate::pattern::{ArgumentPattern, Valency, validate_raw_gloss};
use crate::preverb::{PreverbConfig, PreverbRules};
use crate::record::{Conjugation, DEFAULT_TRANSLATION_KEY, Syntax, TenseEntry, VerbDraft, VerbRecord};
use crate::translation::{TranslationBlock, translation_block};

/// Turns a draft into a canonical [`VerbRecord`], or reports every reason it
/// cannot. Never produces a partial record.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordAssembler {
    optative_policy: OptativePolicy,
}

impl RecordAssembler {
    pub fn new(optative_policy: OptativePolicy) -> Self {
        Self { optative_policy }
    }

    /// Validate and merge scalar fields, valency, argument bindings, preverb
    /// configuration and rules, and per-tense data.
    pub fn assemble(&self, draft: &VerbDraft) -> Result<VerbRecord, AssemblyError> {
        let issues = validate(draft);
        let valency = match Valency::parse(&draft.pattern, &draft.alternatives) {
            Ok(valency) if issues.is_empty() => valency,
            _ => {
                tracing::debug!("Draft failed validation with {} issue(s)", issues.len());
                return Err(AssemblyError { issues });
            }
        };

        let scalars = &draft.scalars;
        let config = normalized_config(&draft.preverb_config);

        let stale = draft.preverb_rules.stale_preverbs(&config);
        if !stale.is_empty() {
            tracing::debug!("Keeping inert rule entries for unconfigured preverbs {stale:?}");
        }

        let record = VerbRecord {
            georgian_wrapper: scalars.georgian_wrapper.trim().to_string(),
            georgian_display: scalars.georgian_display.trim().to_string(),
            description: scalars.description.clone(),
            semantic_key: scalars.semantic_key.clone(),
            global_argument_pattern: valency.default,
            syntax: Syntax {
                arguments: active_arguments(&draft.bindings, valency.default),
                prepositions: scalars.prepositions.clone(),
            },
            english_translations: self.translations(draft, &config),
            conjugations: conjugations(&draft.tenses),
            preverb_rules: PreverbRules {
                default: config.default_preverb.clone(),
                ..draft.preverb_rules.clone()
            },
            preverb_config: config,
            valency,
        };

        tracing::info!("Assembled record {}", record.key());
        Ok(record)
    }

    /// The `default` block plus one block per configured preverb.
    fn translations(&self, draft: &VerbDraft, config: &PreverbConfig) -> BTreeMap<String, TranslationBlock> {
        let defaults = draft.default_translations();
        let description = &draft.scalars.description;
        let rules = &draft.preverb_rules;

        let mut blocks = BTreeMap::from([(
            DEFAULT_TRANSLATION_KEY.to_string(),
            translation_block(
                DEFAULT_TRANSLATION_KEY,
                config,
                rules,
                &defaults,
                description,
                self.optative_policy,
            ),
        )]);

        for preverb in config.configured() {
            blocks.insert(
                preverb.clone(),
                translation_block(preverb, config, rules, &defaults, description, self.optative_policy),
            );
        }

        blocks
    }
}

/// Every blocking problem with a draft; empty when it can be assembled.
pub fn validate(draft: &VerbDraft) -> Vec<AssemblyIssue> {
    let mut issues = Vec::new();

    if draft.scalars.georgian_wrapper.trim().is_empty() {
        issues.push(AssemblyIssue::MissingWrapper);
    }

    let pattern = match ArgumentPattern::parse(&draft.pattern) {
        Ok(pattern) => Some(pattern),
        Err(source) => {
            issues.push(AssemblyIssue::InvalidPattern {
                field: "valency.default".to_string(),
                source,
            });
            None
        }
    };

    if let Err(errors) = Valency::parse(&draft.pattern, &draft.alternatives) {
        issues.extend(
            errors
                .into_iter()
                .filter(|(field, _)| field != "valency.default")
                .map(|(field, source)| AssemblyIssue::InvalidPattern { field, source }),
        );
    }

    // glosses can only be checked against a legal pattern
    if let Some(pattern) = pattern {
        for (tense, entry) in &draft.tenses {
            let gloss = entry.raw_gloss.trim();
            if gloss.is_empty() {
                continue;
            }
            if let Err(source) = validate_raw_gloss(gloss, pattern) {
                issues.push(AssemblyIssue::GlossMismatch { tense: *tense, source });
            }
        }
    }

    let config = &draft.preverb_config;
    if config.has_multiple && !config.is_available(&config.default_preverb) {
        issues.push(AssemblyIssue::DefaultPreverbNotAvailable {
            default: config.default_preverb.clone(),
            available: config.available_preverbs.clone(),
        });
    }

    issues
}

fn normalized_config(config: &PreverbConfig) -> PreverbConfig {
    PreverbConfig {
        available_preverbs: config.configured().to_vec(),
        ..config.clone()
    }
}

/// Bindings of the pattern's roles only, legal persons only, no empties
fn active_arguments(bindings: &BindingSnapshot, pattern: ArgumentPattern) -> BindingSnapshot {
    bindings
        .iter()
        .filter(|(role, _)| pattern.has_role(**role))
        .filter_map(|(role, persons)| {
            let persons: BTreeMap<_, _> = persons
                .iter()
                .filter(|(person, binding)| role.binds(**person) && !binding.is_empty())
                .map(|(person, binding)| (*person, binding.clone()))
                .collect();
            (!persons.is_empty()).then_some((*role, persons))
        })
        .collect()
}

/// All six tenses, forms restricted to each tense's persons
fn conjugations(tenses: &BTreeMap<Tense, TenseEntry>) -> BTreeMap<Tense, Conjugation> {
    Tense::ALL
        .into_iter()
        .map(|tense| {
            let entry = tenses.get(&tense).cloned().unwrap_or_default();

            let forms = entry
                .forms
                .into_iter()
                .filter(|(person, form)| {
                    let legal = tense.persons().contains(person);
                    if !legal {
                        tracing::warn!("Dropping {tense} form for {person}, the tense has no such person");
                    }
                    legal && !form.trim().is_empty()
                })
                .collect();

            (
                tense,
                Conjugation {
                    raw_gloss: entry.raw_gloss.trim().to_string(),
                    forms,
                    examples: entry.examples,
                },
            )
        })
        .collect()
}
