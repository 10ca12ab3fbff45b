use std::env;

use serde::{Deserialize, Serialize};

fn default_data_dir() -> String {
    "./zmna-data".to_string()
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct StorageConfig {
    /// Root folder of saved drafts
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl StorageConfig {
    pub fn new() -> Self {
        let data_dir = env::var("ZMNA_DATA_DIR").unwrap_or_else(|_| default_data_dir());

        Self { data_dir }
    }
}
