use std::env;

use serde::{Deserialize, Serialize};

fn default_enabled() -> bool {
    false
}

fn default_api_url() -> String {
    "http://localhost:8000/api/generate-examples".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct ExamplesConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for ExamplesConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            api_url: default_api_url(),
            api_key: String::new(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl ExamplesConfig {
    pub fn new() -> Self {
        let enabled = env::var("ZMNA_EXAMPLES_ENABLED")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_enabled);

        let api_url = env::var("ZMNA_EXAMPLES_URL").unwrap_or_else(|_| default_api_url());
        let api_key = env::var("ZMNA_EXAMPLES_API_KEY").unwrap_or_default();

        let timeout_seconds = env::var("ZMNA_EXAMPLES_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_timeout_seconds);

        Self {
            enabled,
            api_url,
            api_key,
            timeout_seconds,
        }
    }
}
