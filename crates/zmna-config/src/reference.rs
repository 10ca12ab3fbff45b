use std::env;

use serde::{Deserialize, Serialize};

fn default_max_results() -> usize {
    20
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct ReferenceConfig {
    /// Folder holding `nouns.json` and `adjectives.json`
    #[serde(default)]
    pub data_dir: Option<String>,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            max_results: default_max_results(),
        }
    }
}

impl ReferenceConfig {
    pub fn new() -> Self {
        let data_dir = env::var("ZMNA_REFERENCE_DIR").ok();

        Self {
            data_dir,
            max_results: default_max_results(),
        }
    }
}
