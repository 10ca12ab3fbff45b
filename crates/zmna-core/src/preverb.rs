//! Preverb configuration, per-preverb rules and their resolution.
//!
//! Rule entries are keyed by preverb. An entry only counts while its preverb
//! is in `available_preverbs`; entries for removed preverbs are kept as-is so
//! a later re-add (or an unchanged save) brings them back, but resolution
//! never reads them.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use zmna_types::{BindingField, Person, Role, Tense};

use crate::binding::{ArgumentBinding, BindingSnapshot};
use crate::error::ResolutionWarning;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreverbConfig {
    #[serde(rename = "has_multiple_preverbs", default)]
    pub has_multiple: bool,
    /// Empty means no preverb marking
    #[serde(default)]
    pub default_preverb: String,
    #[serde(default)]
    pub available_preverbs: Vec<String>,
}

impl PreverbConfig {
    pub fn single(default_preverb: &str) -> Self {
        Self {
            has_multiple: false,
            default_preverb: default_preverb.to_string(),
            available_preverbs: Vec::new(),
        }
    }

    pub fn multiple(default_preverb: &str, available: &[&str]) -> Self {
        let mut config = Self {
            has_multiple: true,
            default_preverb: default_preverb.to_string(),
            available_preverbs: Vec::new(),
        };
        for preverb in available {
            config.add_preverb(preverb);
        }
        config
    }

    /// True only for a configured preverb of a multi-preverb verb
    pub fn is_available(&self, preverb: &str) -> bool {
        self.has_multiple && self.available_preverbs.iter().any(|p| p == preverb)
    }

    /// Preverbs rules may be consulted for
    pub fn configured(&self) -> &[String] {
        if self.has_multiple {
            self.available_preverbs.as_slice()
        } else {
            &[]
        }
    }

    /// Appends keeping insertion order. Returns false for blanks and duplicates.
    pub fn add_preverb(&mut self, preverb: &str) -> bool {
        let preverb = preverb.trim();
        if preverb.is_empty() || self.available_preverbs.iter().any(|p| p == preverb) {
            return false;
        }
        self.available_preverbs.push(preverb.to_string());
        true
    }

    pub fn remove_preverb(&mut self, preverb: &str) -> bool {
        let before = self.available_preverbs.len();
        self.available_preverbs.retain(|p| p != preverb);
        before != self.available_preverbs.len()
    }

    /// Turning multiple preverbs off empties the available list.
    pub fn set_has_multiple(&mut self, enabled: bool) {
        self.has_multiple = enabled;
        if !enabled {
            self.available_preverbs.clear();
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreverbRules {
    #[serde(default)]
    pub default: String,
    /// Carried through untouched, resolution does not read it
    #[serde(default)]
    pub replacements: BTreeMap<String, String>,
    /// preverb -> tense -> preverb shown instead
    #[serde(rename = "tense_specific_fallbacks", default)]
    pub tense_fallbacks: BTreeMap<String, BTreeMap<Tense, String>>,
    /// preverb -> tense -> English translation
    #[serde(rename = "english_fallbacks", default)]
    pub translations: BTreeMap<String, BTreeMap<Tense, String>>,
    /// preverb -> role -> person -> binding
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub argument_overrides: BTreeMap<String, BindingSnapshot>,
}

impl PreverbRules {
    /// One fallback authored for several tenses is stored per tense.
    pub fn set_fallback(&mut self, preverb: &str, tenses: &[Tense], fallback: &str) {
        let fallback = fallback.trim();
        if fallback.is_empty() {
            for tense in tenses {
                self.clear_fallback(preverb, *tense);
            }
            return;
        }

        let per_tense = self.tense_fallbacks.entry(preverb.to_string()).or_default();
        for tense in tenses {
            per_tense.insert(*tense, fallback.to_string());
        }
    }

    pub fn clear_fallback(&mut self, preverb: &str, tense: Tense) {
        if let Some(per_tense) = self.tense_fallbacks.get_mut(preverb) {
            per_tense.remove(&tense);
            if per_tense.is_empty() {
                self.tense_fallbacks.remove(preverb);
            }
        }
    }

    pub fn fallback(&self, preverb: &str, tense: Tense) -> Option<&str> {
        self.tense_fallbacks
            .get(preverb)
            .and_then(|t| t.get(&tense))
            .map(String::as_str)
            .filter(|p| !p.trim().is_empty())
    }

    /// Blank text removes the entry
    pub fn set_translation(&mut self, preverb: &str, tense: Tense, text: &str) {
        if text.trim().is_empty() {
            if let Some(per_tense) = self.translations.get_mut(preverb) {
                per_tense.remove(&tense);
                if per_tense.is_empty() {
                    self.translations.remove(preverb);
                }
            }
            return;
        }

        self.translations
            .entry(preverb.to_string())
            .or_default()
            .insert(tense, text.to_string());
    }

    pub fn translation(&self, preverb: &str, tense: Tense) -> Option<&str> {
        self.translations
            .get(preverb)
            .and_then(|t| t.get(&tense))
            .map(String::as_str)
            .filter(|t| !t.trim().is_empty())
    }

    pub fn set_override(
        &mut self,
        preverb: &str,
        role: Role,
        person: Person,
        field: BindingField,
        value: &str,
    ) {
        let per_role = self.argument_overrides.entry(preverb.to_string()).or_default();
        let per_person = per_role.entry(role).or_default();
        per_person.entry(person).or_default().set(field, value);

        if per_person.get(&person).is_some_and(ArgumentBinding::is_empty) {
            per_person.remove(&person);
        }
        if per_person.is_empty() {
            per_role.remove(&role);
        }
        if per_role.is_empty() {
            self.argument_overrides.remove(preverb);
        }
    }

    pub fn override_for(&self, preverb: &str, role: Role, person: Person) -> Option<&ArgumentBinding> {
        self.argument_overrides
            .get(preverb)
            .and_then(|roles| roles.get(&role))
            .and_then(|persons| persons.get(&person))
    }

    /// Preverbs that have rule entries but are not configured any more
    pub fn stale_preverbs(&self, config: &PreverbConfig) -> BTreeSet<String> {
        self.tense_fallbacks
            .keys()
            .chain(self.translations.keys())
            .chain(self.argument_overrides.keys())
            .filter(|p| !config.is_available(p))
            .cloned()
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreverbResolution {
    pub effective: String,
    pub used_fallback: bool,
    pub warning: Option<ResolutionWarning>,
}

/// Which preverb's forms to show for `requested` in `tense`.
///
/// Single-preverb verbs always resolve to the default. An unconfigured
/// request falls back to the default with a warning. A configured one is
/// replaced by its tense-specific fallback when one exists.
pub fn resolve_effective_preverb(
    requested: &str,
    tense: Tense,
    config: &PreverbConfig,
    rules: &PreverbRules,
) -> PreverbResolution {
    if !config.has_multiple {
        return PreverbResolution {
            effective: config.default_preverb.clone(),
            used_fallback: false,
            warning: None,
        };
    }

    if !config.is_available(requested) {
        return PreverbResolution {
            effective: config.default_preverb.clone(),
            used_fallback: true,
            warning: Some(ResolutionWarning::PreverbNotConfigured {
                requested: requested.to_string(),
                substitute: config.default_preverb.clone(),
            }),
        };
    }

    match rules.fallback(requested, tense) {
        Some(fallback) => PreverbResolution {
            effective: fallback.to_string(),
            used_fallback: true,
            warning: Some(ResolutionWarning::TenseFallback {
                requested: requested.to_string(),
                tense,
                substitute: fallback.to_string(),
            }),
        },
        None => PreverbResolution {
            effective: requested.to_string(),
            used_fallback: false,
            warning: None,
        },
    }
}

/// English translation for `preverb` in `tense`.
///
/// Priority: the preverb's own translation, then the verb's default
/// translation for the tense, then its description. May return "".
pub fn resolve_translation(
    preverb: &str,
    tense: Tense,
    config: &PreverbConfig,
    rules: &PreverbRules,
    default_translations: &BTreeMap<Tense, String>,
    description: &str,
) -> String {
    if config.is_available(preverb) {
        if let Some(text) = rules.translation(preverb, tense) {
            return text.to_string();
        }
    }

    default_translations
        .get(&tense)
        .filter(|t| !t.trim().is_empty())
        .cloned()
        .unwrap_or_else(|| description.to_string())
}

/// Argument binding for `preverb`: its non-empty override inherits unset
/// fields from `base`. Without a usable override, `base` is returned as-is.
pub fn resolve_argument_override(
    preverb: &str,
    role: Role,
    person: Person,
    config: &PreverbConfig,
    rules: &PreverbRules,
    base: &ArgumentBinding,
) -> ArgumentBinding {
    if !config.is_available(preverb) {
        return base.clone();
    }

    match rules.override_for(preverb, role, person) {
        Some(over) if !over.is_empty() => over.inherit(base),
        _ => base.clone(),
    }
}
