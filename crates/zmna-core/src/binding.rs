use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use zmna_types::{BindingField, Person, Role};

use crate::pattern::ArgumentPattern;

/// Lexical item (noun) and optional modifier (adjective) chosen for one
/// role/person slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentBinding {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub noun: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adjective: Option<String>,
}

impl ArgumentBinding {
    pub fn new(noun: Option<&str>, adjective: Option<&str>) -> Self {
        let mut binding = Self::default();
        binding.set(BindingField::Noun, noun.unwrap_or_default());
        binding.set(BindingField::Adjective, adjective.unwrap_or_default());
        binding
    }

    pub fn get(&self, field: BindingField) -> Option<&str> {
        match field {
            BindingField::Noun => self.noun.as_deref(),
            BindingField::Adjective => self.adjective.as_deref(),
        }
    }

    /// Blank values clear the field
    pub fn set(&mut self, field: BindingField, value: &str) {
        let value = Some(value.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        match field {
            BindingField::Noun => self.noun = value,
            BindingField::Adjective => self.adjective = value,
        }
    }

    pub fn is_empty(&self) -> bool {
        is_blank(&self.noun) && is_blank(&self.adjective)
    }

    /// Field-by-field merge: fields set here win, unset ones come from `base`.
    pub fn inherit(&self, base: &ArgumentBinding) -> ArgumentBinding {
        ArgumentBinding {
            noun: non_blank(&self.noun).or_else(|| base.noun.clone()),
            adjective: non_blank(&self.adjective).or_else(|| base.adjective.clone()),
        }
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|v| v.trim().is_empty())
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value.clone().filter(|v| !v.trim().is_empty())
}

pub type PersonBindings = BTreeMap<Person, ArgumentBinding>;

/// Non-empty bindings of active roles, keyed role -> person
pub type BindingSnapshot = BTreeMap<Role, PersonBindings>;

/// Argument choices per (role, person).
///
/// Reads are total: an inactive role or a person the role cannot bind yields
/// the empty binding.
#[derive(Debug, Clone, Default)]
pub struct ArgumentBindingStore {
    active: BTreeSet<Role>,
    bindings: BTreeMap<(Role, Person), ArgumentBinding>,
}

impl ArgumentBindingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with exactly the roles of `pattern` active
    pub fn for_pattern(pattern: ArgumentPattern) -> Self {
        let mut store = Self::new();
        store.reconfigure_pattern(pattern);
        store
    }

    pub fn is_role_active(&self, role: Role) -> bool {
        self.active.contains(&role)
    }

    pub fn active_roles(&self) -> impl Iterator<Item = Role> + '_ {
        self.active.iter().copied()
    }

    /// Activating creates an empty slot for every person the role binds.
    pub fn activate(&mut self, role: Role) {
        if self.active.insert(role) {
            tracing::debug!("Activated role {role}");
            for person in role.persons() {
                self.bindings.entry((role, *person)).or_default();
            }
        }
    }

    /// Deactivating discards every binding of the role.
    pub fn deactivate(&mut self, role: Role) {
        if self.active.remove(&role) {
            tracing::debug!("Deactivated role {role}, clearing its bindings");
            self.bindings.retain(|(r, _), _| *r != role);
        }
    }

    /// Returns false when the edit was ignored (inactive role or a person
    /// the role cannot bind).
    pub fn set(&mut self, role: Role, person: Person, field: BindingField, value: &str) -> bool {
        if !self.is_role_active(role) || !role.binds(person) {
            tracing::debug!("Ignoring binding edit for inactive slot {role}/{person}");
            return false;
        }

        self.bindings
            .entry((role, person))
            .or_default()
            .set(field, value);
        true
    }

    pub fn get(&self, role: Role, person: Person) -> ArgumentBinding {
        if !self.is_role_active(role) || !role.binds(person) {
            return ArgumentBinding::default();
        }

        self.bindings
            .get(&(role, person))
            .cloned()
            .unwrap_or_default()
    }

    /// Only active roles, legal persons and non-empty bindings.
    pub fn snapshot(&self) -> BindingSnapshot {
        let mut snapshot = BindingSnapshot::new();

        for ((role, person), binding) in &self.bindings {
            if self.is_role_active(*role) && role.binds(*person) && !binding.is_empty() {
                snapshot
                    .entry(*role)
                    .or_default()
                    .insert(*person, binding.clone());
            }
        }

        snapshot
    }

    /// First phase of a pattern change: activate the pattern's roles and
    /// clear the rest. Returns what the store held before, for
    /// [`restore_bindings`](Self::restore_bindings).
    pub fn reconfigure_pattern(&mut self, pattern: ArgumentPattern) -> BindingSnapshot {
        let previous = self.snapshot();

        for role in Role::ALL {
            if pattern.has_role(role) {
                self.activate(role);
            } else {
                self.deactivate(role);
            }
        }

        previous
    }

    /// Second phase: re-apply captured bindings that are still structurally
    /// valid. Returns how many slots were restored.
    pub fn restore_bindings(&mut self, snapshot: &BindingSnapshot) -> usize {
        let mut restored = 0;

        for (role, persons) in snapshot {
            if !self.is_role_active(*role) {
                continue;
            }
            for (person, binding) in persons {
                if role.binds(*person) && !binding.is_empty() {
                    self.bindings.insert((*role, *person), binding.clone());
                    restored += 1;
                }
            }
        }

        tracing::debug!("Restored {restored} argument bindings");
        restored
    }

    /// Drop every role and binding
    pub fn reset(&mut self) {
        self.active.clear();
        self.bindings.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_are_total() {
        let store = ArgumentBindingStore::for_pattern(ArgumentPattern::Subject);

        assert_eq!(store.get(Role::DirectObject, Person::First), ArgumentBinding::default());
        assert_eq!(store.get(Role::Subject, Person::First), ArgumentBinding::default());
    }

    #[test]
    fn set_ignores_inactive_and_illegal_slots() {
        let mut store = ArgumentBindingStore::for_pattern(ArgumentPattern::SubjectDirectObject);

        assert!(!store.set(Role::IndirectObject, Person::Third, BindingField::Noun, "ქალი"));
        assert!(!store.set(Role::Subject, Person::First, BindingField::Noun, "ქალი"));
        assert!(store.set(Role::Subject, Person::Third, BindingField::Noun, "ქალი"));

        assert_eq!(store.get(Role::Subject, Person::Third).noun.as_deref(), Some("ქალი"));
    }

    #[test]
    fn snapshot_omits_empty_bindings() {
        let mut store = ArgumentBindingStore::for_pattern(ArgumentPattern::SubjectDirectObject);
        store.set(Role::DirectObject, Person::Third, BindingField::Adjective, "დიდი");
        store.set(Role::Subject, Person::Third, BindingField::Noun, "  ");

        let snapshot = store.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(
            snapshot[&Role::DirectObject][&Person::Third],
            ArgumentBinding::new(None, Some("დიდი"))
        );
    }

    #[test]
    fn deactivate_clears_bindings() {
        let mut store = ArgumentBindingStore::for_pattern(ArgumentPattern::SubjectDirectObject);
        store.set(Role::DirectObject, Person::First, BindingField::Noun, "წიგნი");

        store.deactivate(Role::DirectObject);
        store.activate(Role::DirectObject);

        assert!(store.get(Role::DirectObject, Person::First).is_empty());
    }

    #[test]
    fn two_phase_pattern_change_keeps_surviving_roles() {
        let mut store = ArgumentBindingStore::for_pattern(ArgumentPattern::SubjectDirectObject);
        store.set(Role::Subject, Person::Third, BindingField::Noun, "კაცი");
        store.set(Role::DirectObject, Person::Third, BindingField::Noun, "წერილი");

        let captured = store.reconfigure_pattern(ArgumentPattern::SubjectIndirectObject);
        assert!(!store.is_role_active(Role::DirectObject));
        assert!(store.is_role_active(Role::IndirectObject));

        let restored = store.restore_bindings(&captured);
        assert_eq!(restored, 1);
        assert_eq!(store.get(Role::Subject, Person::Third).noun.as_deref(), Some("კაცი"));
        assert!(store.get(Role::DirectObject, Person::Third).is_empty());
    }

    #[test]
    fn inherit_merges_field_by_field() {
        let base = ArgumentBinding::new(Some("სახლი"), None);
        let over = ArgumentBinding::new(None, Some("ახალი"));

        assert_eq!(over.inherit(&base), ArgumentBinding::new(Some("სახლი"), Some("ახალი")));
        assert_eq!(ArgumentBinding::default().inherit(&base), base);
    }
}
