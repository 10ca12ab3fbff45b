//! Property-based tests for pattern parsing, gloss validation and preverb
//! resolution.

use std::collections::BTreeMap;

use proptest::prelude::*;
use zmna_core::binding::ArgumentBinding;
use zmna_core::pattern::{ArgumentPattern, role_set_of, validate_raw_gloss};
use zmna_core::preverb::{
    PreverbConfig, PreverbRules, resolve_argument_override, resolve_effective_preverb,
    resolve_translation,
};
use zmna_types::{Person, Role, Tense};

const PREVERBS: [&str; 6] = ["მი", "მო", "და", "გა", "წა", "შე"];

fn pattern_strategy() -> impl Strategy<Value = ArgumentPattern> {
    prop::sample::select(ArgumentPattern::ALL.to_vec())
}

fn tense_strategy() -> impl Strategy<Value = Tense> {
    prop::sample::select(Tense::ALL.to_vec())
}

fn preverb_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(PREVERBS.to_vec()).prop_map(str::to_string)
}

/// Case labels as they appear in glosses
fn case_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Nom".to_string()),
        Just("Dat".to_string()),
        Just("Erg".to_string()),
        "[A-Z][a-z]{1,6}",
    ]
}

/// A gloss carrying exactly the pattern's role tokens, shuffled
fn gloss_strategy() -> impl Strategy<Value = (ArgumentPattern, String)> {
    pattern_strategy().prop_flat_map(|pattern| {
        let roles = pattern.roles().to_vec();
        let count = roles.len();
        (
            Just(pattern),
            Just(roles).prop_shuffle(),
            prop::collection::vec(case_strategy(), count),
            "[A-Z][A-Za-z]{1,8}",
            "[A-Z][a-z]{1,5}",
        )
            .prop_map(|(pattern, roles, cases, voice, tense)| {
                let arguments: Vec<String> = roles
                    .iter()
                    .zip(cases)
                    .map(|(role, case)| format!("<{}:{case}>", role.code()))
                    .collect();
                (pattern, format!("V {voice} {tense} {}", arguments.join(" ")))
            })
    })
}

/// Rules with arbitrary fallbacks and translations over the preverb pool
fn rules_strategy() -> impl Strategy<Value = PreverbRules> {
    prop::collection::vec(
        (preverb_strategy(), tense_strategy(), preverb_strategy(), "[a-z ]{0,12}"),
        0..12,
    )
    .prop_map(|entries| {
        let mut rules = PreverbRules::default();
        for (preverb, tense, fallback, text) in entries {
            rules.set_fallback(&preverb, &[tense], &fallback);
            rules.set_translation(&preverb, tense, &text);
        }
        rules
    })
}

fn config_strategy() -> impl Strategy<Value = PreverbConfig> {
    (
        preverb_strategy(),
        prop::collection::btree_set(preverb_strategy(), 0..PREVERBS.len()),
    )
        .prop_map(|(default, available)| {
            let available: Vec<&str> = available.iter().map(String::as_str).collect();
            PreverbConfig::multiple(&default, &available)
        })
}

#[cfg(test)]
mod proptest_tests {
    use super::*;

    proptest! {
        #[test]
        fn only_the_four_literals_parse(text in "\\PC{0,12}") {
            let literal = ArgumentPattern::ALL.iter().any(|p| p.as_str() == text);
            prop_assert_eq!(ArgumentPattern::parse(&text).is_ok(), literal);
        }

        #[test]
        fn padded_literals_are_rejected(pattern in pattern_strategy(), pad in "[ \t]{1,3}") {
            let padded = format!("{pad}{}", pattern.as_str());
            prop_assert!(ArgumentPattern::parse(&padded).is_err());
        }

        #[test]
        fn role_set_matches_pattern_roles(pattern in pattern_strategy()) {
            let parsed = ArgumentPattern::parse(pattern.as_str()).unwrap();
            prop_assert_eq!(role_set_of(parsed), role_set_of(pattern));
            prop_assert!(role_set_of(parsed).contains(&Role::Subject));
        }

        #[test]
        fn glosses_with_exact_roles_validate((pattern, gloss) in gloss_strategy()) {
            prop_assert!(validate_raw_gloss(&gloss, pattern).is_ok(), "{gloss} vs {pattern}");
        }

        #[test]
        fn glosses_with_an_extra_role_fail((pattern, gloss) in gloss_strategy()) {
            let missing = Role::ALL.into_iter().find(|r| !pattern.has_role(*r));
            if let Some(role) = missing {
                let gloss = format!("{gloss} <{}:Dat>", role.code());
                let err = validate_raw_gloss(&gloss, pattern).unwrap_err();
                prop_assert!(err.found.contains(&role));
                prop_assert_eq!(err.expected, role_set_of(pattern));
            }
        }

        #[test]
        fn resolution_is_idempotent(
            config in config_strategy(),
            rules in rules_strategy(),
            requested in preverb_strategy(),
            tense in tense_strategy(),
        ) {
            let first = resolve_effective_preverb(&requested, tense, &config, &rules);
            let second = resolve_effective_preverb(&requested, tense, &config, &rules);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn single_preverb_verbs_ignore_rules(
            default in preverb_strategy(),
            rules in rules_strategy(),
            requested in preverb_strategy(),
            tense in tense_strategy(),
        ) {
            let config = PreverbConfig::single(&default);
            let resolution = resolve_effective_preverb(&requested, tense, &config, &rules);
            prop_assert_eq!(resolution.effective, default);
            prop_assert!(!resolution.used_fallback);
            prop_assert!(resolution.warning.is_none());
        }

        #[test]
        fn resolution_lands_on_a_known_preverb(
            config in config_strategy(),
            rules in rules_strategy(),
            requested in preverb_strategy(),
            tense in tense_strategy(),
        ) {
            let resolution = resolve_effective_preverb(&requested, tense, &config, &rules);
            let known = config.is_available(&resolution.effective)
                || resolution.effective == config.default_preverb
                || rules.fallback(&requested, tense) == Some(resolution.effective.as_str());
            prop_assert!(known);
            prop_assert_eq!(resolution.used_fallback, resolution.warning.is_some());
        }
    }
}

#[test]
fn translation_chain_priority() {
    let config = PreverbConfig::multiple("მი", &["მი", "მო"]);
    let mut rules = PreverbRules::default();
    rules.set_translation("მო", Tense::Present, "a");
    let mut defaults = BTreeMap::from([(Tense::Present, "b".to_string())]);

    let resolve = |rules: &PreverbRules, defaults: &BTreeMap<Tense, String>| {
        resolve_translation("მო", Tense::Present, &config, rules, defaults, "c")
    };

    assert_eq!(resolve(&rules, &defaults), "a");
    rules.set_translation("მო", Tense::Present, "");
    assert_eq!(resolve(&rules, &defaults), "b");
    defaults.clear();
    assert_eq!(resolve(&rules, &defaults), "c");
}

#[test]
fn override_inherits_unset_fields() {
    let config = PreverbConfig::multiple("მი", &["მი", "მო"]);
    let mut rules = PreverbRules::default();
    rules.set_override(
        "მო",
        Role::DirectObject,
        Person::Third,
        zmna_types::BindingField::Adjective,
        "დიდი",
    );
    let base = ArgumentBinding::new(Some("სახლი"), None);

    let merged =
        resolve_argument_override("მო", Role::DirectObject, Person::Third, &config, &rules, &base);
    assert_eq!(merged, ArgumentBinding::new(Some("სახლი"), Some("დიდი")));
}
