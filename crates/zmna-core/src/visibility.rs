//! Progressive disclosure: which editor sections are relevant right now.
//!
//! Each section owns a predicate over the aggregate [`ConfigSnapshot`].
//! Predicates read raw configuration only, never another section's
//! visibility, so evaluation order does not matter. A predicate that errors
//! or panics hides its section and is reported as a [`PredicateFault`].

use std::collections::BTreeMap;
use std::panic::{AssertUnwindSafe, catch_unwind};

use serde::{Deserialize, Serialize};
use zmna_types::Role;

use crate::error::PredicateFault;
use crate::pattern::ArgumentPattern;

/// Aggregate configuration the predicates see.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    pub pattern: Option<ArgumentPattern>,
    pub has_multiple_preverbs: bool,
    pub default_preverb: String,
    pub available_preverbs: Vec<String>,
    pub has_wrapper: bool,
    /// Section-specific switches (`override_arguments`, `has_alternatives`...)
    pub flags: BTreeMap<String, bool>,
}

impl ConfigSnapshot {
    pub fn has_role(&self, role: Role) -> bool {
        self.pattern.is_some_and(|p| p.has_role(role))
    }

    /// Unset flags read as false
    pub fn flag(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    pub fn merge(&mut self, update: ConfigUpdate) {
        if let Some(pattern) = update.pattern {
            self.pattern = pattern;
        }
        if let Some(has_multiple) = update.has_multiple_preverbs {
            self.has_multiple_preverbs = has_multiple;
        }
        if let Some(default_preverb) = update.default_preverb {
            self.default_preverb = default_preverb;
        }
        if let Some(available) = update.available_preverbs {
            self.available_preverbs = available;
        }
        if let Some(has_wrapper) = update.has_wrapper {
            self.has_wrapper = has_wrapper;
        }
        self.flags.extend(update.flags);
    }
}

/// Partial configuration change. Unset fields leave the snapshot alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigUpdate {
    pub pattern: Option<Option<ArgumentPattern>>,
    pub has_multiple_preverbs: Option<bool>,
    pub default_preverb: Option<String>,
    pub available_preverbs: Option<Vec<String>>,
    pub has_wrapper: Option<bool>,
    pub flags: BTreeMap<String, bool>,
}

impl ConfigUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pattern(mut self, pattern: Option<ArgumentPattern>) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn has_multiple_preverbs(mut self, enabled: bool) -> Self {
        self.has_multiple_preverbs = Some(enabled);
        self
    }

    pub fn default_preverb(mut self, preverb: impl Into<String>) -> Self {
        self.default_preverb = Some(preverb.into());
        self
    }

    pub fn available_preverbs(mut self, preverbs: Vec<String>) -> Self {
        self.available_preverbs = Some(preverbs);
        self
    }

    pub fn has_wrapper(mut self, has_wrapper: bool) -> Self {
        self.has_wrapper = Some(has_wrapper);
        self
    }

    pub fn flag(mut self, name: impl Into<String>, value: bool) -> Self {
        self.flags.insert(name.into(), value);
        self
    }
}

pub type Predicate = Box<dyn Fn(&ConfigSnapshot) -> Result<bool, String> + Send + Sync>;

struct Section {
    predicate: Predicate,
    visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub section: String,
    pub visible: bool,
}

/// What one re-evaluation changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilityReport {
    pub transitions: Vec<Transition>,
    pub faults: Vec<PredicateFault>,
}

#[derive(Default)]
pub struct VisibilityEvaluator {
    state: ConfigSnapshot,
    sections: BTreeMap<String, Section>,
}

impl VisibilityEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluator preloaded with the verb editor's sections
    pub fn with_standard_sections() -> Self {
        let mut evaluator = Self::new();
        sections::register_standard(&mut evaluator);
        evaluator
    }

    /// Register (or replace) a section and evaluate it immediately.
    pub fn register_section<F>(&mut self, id: impl Into<String>, predicate: F) -> Option<PredicateFault>
    where
        F: Fn(&ConfigSnapshot) -> Result<bool, String> + Send + Sync + 'static,
    {
        let id = id.into();
        let predicate: Predicate = Box::new(predicate);
        let (visible, fault) = evaluate(&id, &predicate, &self.state);

        self.sections.insert(id, Section { predicate, visible });
        fault
    }

    /// Merge `update` into the snapshot and re-evaluate every section.
    pub fn update_state(&mut self, update: ConfigUpdate) -> VisibilityReport {
        self.state.merge(update);
        self.refresh()
    }

    /// Re-evaluate every section against the current snapshot
    pub fn refresh(&mut self) -> VisibilityReport {
        let mut report = VisibilityReport::default();

        for (id, section) in self.sections.iter_mut() {
            let (visible, fault) = evaluate(id, &section.predicate, &self.state);

            if let Some(fault) = fault {
                report.faults.push(fault);
            }
            if visible != section.visible {
                tracing::debug!("Section {id} is now {}", if visible { "visible" } else { "hidden" });
                section.visible = visible;
                report.transitions.push(Transition {
                    section: id.clone(),
                    visible,
                });
            }
        }

        report
    }

    /// Unknown sections are hidden
    pub fn is_visible(&self, id: &str) -> bool {
        self.sections.get(id).is_some_and(|s| s.visible)
    }

    pub fn all_states(&self) -> BTreeMap<String, bool> {
        self.sections
            .iter()
            .map(|(id, s)| (id.clone(), s.visible))
            .collect()
    }

    pub fn state(&self) -> &ConfigSnapshot {
        &self.state
    }

    /// Replace the snapshot wholesale, for switching to another record
    pub fn reset_state(&mut self, state: ConfigSnapshot) -> VisibilityReport {
        self.state = state;
        self.refresh()
    }
}

fn evaluate(id: &str, predicate: &Predicate, state: &ConfigSnapshot) -> (bool, Option<PredicateFault>) {
    let outcome = catch_unwind(AssertUnwindSafe(|| predicate(state)));

    let message = match outcome {
        Ok(Ok(visible)) => return (visible, None),
        Ok(Err(message)) => message,
        Err(panic) => panic
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| panic.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "predicate panicked".to_string()),
    };

    let fault = PredicateFault {
        section: id.to_string(),
        message,
    };
    tracing::warn!("{fault}");
    (false, Some(fault))
}

/// The verb editor's section catalog.
pub mod sections {
    use zmna_types::Role;

    use super::VisibilityEvaluator;

    pub const SUBJECT_ARGUMENTS: &str = "subject_arguments";
    pub const DIRECT_OBJECT_ARGUMENTS: &str = "direct_object_arguments";
    pub const INDIRECT_OBJECT_ARGUMENTS: &str = "indirect_object_arguments";
    pub const PREVERB_SELECTION: &str = "preverb_selection";
    pub const PREVERB_FALLBACKS: &str = "preverb_fallbacks";
    pub const PREVERB_TRANSLATIONS: &str = "preverb_translations";
    pub const ARGUMENT_OVERRIDES: &str = "argument_overrides";
    pub const VALENCY_ALTERNATIVES: &str = "valency_alternatives";
    pub const EXAMPLE_GENERATION: &str = "example_generation";

    pub const FLAG_OVERRIDE_ARGUMENTS: &str = "override_arguments";
    pub const FLAG_HAS_ALTERNATIVES: &str = "has_alternatives";

    pub fn register_standard(evaluator: &mut VisibilityEvaluator) {
        evaluator.register_section(SUBJECT_ARGUMENTS, |s| Ok(s.has_role(Role::Subject)));
        evaluator.register_section(DIRECT_OBJECT_ARGUMENTS, |s| Ok(s.has_role(Role::DirectObject)));
        evaluator.register_section(INDIRECT_OBJECT_ARGUMENTS, |s| {
            Ok(s.has_role(Role::IndirectObject))
        });
        evaluator.register_section(PREVERB_SELECTION, |s| Ok(s.has_multiple_preverbs));
        // a fallback needs somewhere to fall back to
        evaluator.register_section(PREVERB_FALLBACKS, |s| {
            Ok(s.has_multiple_preverbs && s.available_preverbs.len() >= 2)
        });
        evaluator.register_section(PREVERB_TRANSLATIONS, |s| {
            Ok(s.has_multiple_preverbs && !s.available_preverbs.is_empty())
        });
        evaluator.register_section(ARGUMENT_OVERRIDES, |s| {
            Ok(s.has_multiple_preverbs && s.flag(FLAG_OVERRIDE_ARGUMENTS))
        });
        evaluator.register_section(VALENCY_ALTERNATIVES, |s| Ok(s.flag(FLAG_HAS_ALTERNATIVES)));
        evaluator.register_section(EXAMPLE_GENERATION, |s| Ok(s.pattern.is_some() && s.has_wrapper));
    }
}
