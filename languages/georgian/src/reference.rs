use std::path::{Path, PathBuf};

use serde::Deserialize;
use zmna_core::preprocess::Preprocessor;
use zmna_core::reference::{ReferenceIndex, ReferenceItem, ReferenceKind};

use crate::preprocessor::GeorgianPreprocessor;

pub const NOUNS_FILE: &str = "nouns.json";
pub const ADJECTIVES_FILE: &str = "adjectives.json";

#[derive(Debug, thiserror::Error)]
pub enum ReferenceError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse reference data: {0}")]
    Parse(#[from] serde_json::Error),
}

// Files are either a bare array or wrapped as {"items": [...]}
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ReferenceJson {
    Items(Vec<ReferenceJsonEntry>),
    Wrapped { items: Vec<ReferenceJsonEntry> },
}

#[derive(Debug, Deserialize)]
struct ReferenceJsonEntry {
    key: String,
    #[serde(default, alias = "displayLabel")]
    display_label: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default, alias = "semanticDomain")]
    semantic_domain: Option<String>,
}

/// Noun and adjective lists offered for argument slots
#[derive(Debug)]
pub struct ReferenceData {
    pub nouns: ReferenceIndex,
    pub adjectives: ReferenceIndex,
}

impl ReferenceData {
    pub fn for_kind(&self, kind: ReferenceKind) -> &ReferenceIndex {
        match kind {
            ReferenceKind::Noun => &self.nouns,
            ReferenceKind::Adjective => &self.adjectives,
        }
    }
}

pub struct ReferenceLoader;

impl ReferenceLoader {
    /// Parse one reference list. Keys are normalized; entries without a
    /// label show their key.
    pub fn from_json(kind: ReferenceKind, json: &str) -> Result<ReferenceIndex, ReferenceError> {
        let entries = match serde_json::from_str::<ReferenceJson>(json)? {
            ReferenceJson::Items(items) | ReferenceJson::Wrapped { items } => items,
        };

        let preprocessor = GeorgianPreprocessor::new();
        let items: Vec<ReferenceItem> = entries
            .into_iter()
            .filter_map(|entry| {
                let key = preprocessor.process(&entry.key);
                if key.is_empty() {
                    return None;
                }
                let display_label = entry
                    .display_label
                    .map(|l| preprocessor.process(&l))
                    .filter(|l| !l.is_empty())
                    .unwrap_or_else(|| key.clone());

                Some(ReferenceItem {
                    key,
                    display_label,
                    category: entry.category.filter(|c| !c.trim().is_empty()),
                    semantic_domain: entry.semantic_domain.filter(|d| !d.trim().is_empty()),
                })
            })
            .collect();

        Ok(ReferenceIndex::new(kind, items))
    }

    pub fn load_from_file(kind: ReferenceKind, path: &Path) -> Result<ReferenceIndex, ReferenceError> {
        tracing::info!("Loading {kind:?} reference data from {}", path.display());
        let json = std::fs::read_to_string(path).map_err(|source| ReferenceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let index = Self::from_json(kind, &json)?;
        tracing::info!("Loaded {} {kind:?} entries", index.len());
        Ok(index)
    }

    /// Load `nouns.json` and `adjectives.json` from `dir`. A missing file
    /// gives an empty list; an unreadable or malformed one is an error.
    pub fn load_dir(dir: &Path) -> Result<ReferenceData, ReferenceError> {
        let load = |kind: ReferenceKind, file: &str| {
            let path = dir.join(file);
            if path.exists() {
                Self::load_from_file(kind, &path)
            } else {
                tracing::warn!("No reference file at {}", path.display());
                Ok(ReferenceIndex::new(kind, Vec::new()))
            }
        };

        Ok(ReferenceData {
            nouns: load(ReferenceKind::Noun, NOUNS_FILE)?,
            adjectives: load(ReferenceKind::Adjective, ADJECTIVES_FILE)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use zmna_core::reference::{ReferenceLookup, ReferenceQuery};

    use super::*;

    #[test]
    fn parses_both_layouts() {
        let bare = r#"[{"key": "კაცი", "display_label": "კაცი (man)", "category": "person"}]"#;
        let wrapped = r#"{"items": [{"key": "ხე", "semanticDomain": "nature"}, {"key": " "}]}"#;

        let nouns = ReferenceLoader::from_json(ReferenceKind::Noun, bare).unwrap();
        assert_eq!(nouns.len(), 1);
        assert_eq!(nouns.get("კაცი").unwrap().display_label, "კაცი (man)");

        let more = ReferenceLoader::from_json(ReferenceKind::Noun, wrapped).unwrap();
        assert_eq!(more.len(), 1);
        let tree = more.get("ხე").unwrap();
        assert_eq!(tree.display_label, "ხე");
        assert_eq!(tree.semantic_domain.as_deref(), Some("nature"));
    }

    #[test]
    fn keys_are_normalized_for_search() {
        let json = r#"[{"key": "ᲬᲘᲒᲜᲘ", "display_label": "book"}]"#;
        let index = ReferenceLoader::from_json(ReferenceKind::Noun, json).unwrap();

        let hits = index.search(&ReferenceQuery::text("წიგ"));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].key, "წიგნი");
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            ReferenceLoader::from_json(ReferenceKind::Adjective, "{"),
            Err(ReferenceError::Parse(_))
        ));
    }

    #[test]
    fn missing_directory_gives_empty_lists() {
        let dir = std::env::temp_dir().join("zmna-reference-missing-dir");
        let data = ReferenceLoader::load_dir(&dir).unwrap();
        assert!(data.nouns.is_empty());
        assert!(data.for_kind(ReferenceKind::Adjective).is_empty());
    }
}
