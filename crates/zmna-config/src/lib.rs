use std::env;

use serde::{Deserialize, Serialize};

use self::editor::EditorConfig;
use self::examples::ExamplesConfig;
use self::reference::ReferenceConfig;
use self::storage::StorageConfig;

pub mod editor;
pub mod examples;
pub mod reference;
pub mod storage;

pub use editor::OptativePolicy;

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub editor: EditorConfig,
    pub examples: ExamplesConfig,
    pub reference: ReferenceConfig,

    /// Default `tracing` filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Emit logs as JSON lines
    pub log_json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            editor: EditorConfig::default(),
            examples: ExamplesConfig::default(),
            reference: ReferenceConfig::default(),
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

impl Config {
    /// Build the config from environment variables, falling back to defaults
    pub fn new() -> Self {
        let log_level = env::var("ZMNA_LOG").unwrap_or_else(|_| default_log_level());

        let log_json = env::var("LOG_FORMAT")
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        Config {
            storage: StorageConfig::new(),
            editor: EditorConfig::new(),
            examples: ExamplesConfig::new(),
            reference: ReferenceConfig::new(),

            log_level,
            log_json,
        }
    }

    /// Parse a JSON config file body; missing fields take their defaults
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = Config::from_json(r#"{"editor": {"optative_policy": "strip"}}"#).unwrap();

        assert_eq!(config.editor.optative_policy, OptativePolicy::Strip);
        assert_eq!(config.editor.autosave_ms, 750);
        assert_eq!(config.log_level, "info");
        assert!(!config.examples.enabled);
        assert_eq!(config.reference.max_results, 20);
    }

    #[test]
    fn optative_policy_parses_loosely() {
        assert_eq!(OptativePolicy::parse(" Ensure "), Some(OptativePolicy::Ensure));
        assert_eq!(OptativePolicy::parse("drop"), None);
    }
}
