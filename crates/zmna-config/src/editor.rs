use std::env;

use serde::{Deserialize, Serialize};

/// How optative English translations treat a leading "should".
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OptativePolicy {
    /// Pass translations through untouched
    #[default]
    Keep,
    /// Remove a leading "should "
    Strip,
    /// Prefix "should " when missing
    Ensure,
}

impl OptativePolicy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "keep" => Some(OptativePolicy::Keep),
            "strip" => Some(OptativePolicy::Strip),
            "ensure" => Some(OptativePolicy::Ensure),
            _ => None,
        }
    }
}

fn default_autosave_ms() -> u64 {
    750
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct EditorConfig {
    /// Debounce delay before a burst of edits is persisted
    #[serde(default = "default_autosave_ms")]
    pub autosave_ms: u64,
    pub optative_policy: OptativePolicy,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            autosave_ms: default_autosave_ms(),
            optative_policy: OptativePolicy::default(),
        }
    }
}

impl EditorConfig {
    pub fn new() -> Self {
        let autosave_ms = env::var("ZMNA_AUTOSAVE_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_autosave_ms);

        let optative_policy = env::var("ZMNA_OPTATIVE_POLICY")
            .ok()
            .and_then(|v| OptativePolicy::parse(&v))
            .unwrap_or_default();

        Self {
            autosave_ms,
            optative_policy,
        }
    }
}
