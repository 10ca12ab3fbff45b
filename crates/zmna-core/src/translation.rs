use std::collections::BTreeMap;

use zmna_config::OptativePolicy;
use zmna_types::Tense;

use crate::preverb::{PreverbConfig, PreverbRules, resolve_translation};

/// English translations keyed by tense
pub type TranslationBlock = BTreeMap<Tense, String>;

const SHOULD: &str = "should ";

/// Apply the optative "should" policy to each `;`-separated alternative.
pub fn apply_optative_policy(text: &str, policy: OptativePolicy) -> String {
    if policy == OptativePolicy::Keep {
        return text.to_string();
    }

    text.split(';')
        .map(|alt| {
            let trimmed = alt.trim();
            let has_should = trimmed
                .get(..SHOULD.len())
                .is_some_and(|p| p.eq_ignore_ascii_case(SHOULD));

            match policy {
                OptativePolicy::Strip if has_should => trimmed[SHOULD.len()..].trim_start().to_string(),
                OptativePolicy::Ensure if !has_should && !trimmed.is_empty() => {
                    format!("{SHOULD}{trimmed}")
                }
                _ => trimmed.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Resolved translation for every tense of one preverb (or of the `default`
/// pseudo-preverb, which is never configured and so skips straight to the
/// default translations).
pub fn translation_block(
    preverb: &str,
    config: &PreverbConfig,
    rules: &PreverbRules,
    defaults: &TranslationBlock,
    description: &str,
    policy: OptativePolicy,
) -> TranslationBlock {
    Tense::ALL
        .into_iter()
        .map(|tense| {
            let text = resolve_translation(preverb, tense, config, rules, defaults, description);
            let text = match tense {
                Tense::Optative => apply_optative_policy(&text, policy),
                _ => text,
            };
            (tense, text)
        })
        .collect()
}
