//! Reference data (nouns, adjectives) offered when filling argument slots.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

/// Reference lookup operations
pub trait ReferenceLookup: Send + Sync {
    /// Items matching a free-text filter and optional category/domain sets
    fn search(&self, query: &ReferenceQuery) -> Vec<ReferenceItem>;

    /// Item by its key
    fn get(&self, key: &str) -> Option<ReferenceItem>;

    fn metadata(&self) -> ReferenceMetadata;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceItem {
    pub key: String,
    pub display_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantic_domain: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ReferenceQuery {
    /// Case-insensitive substring of key or label; empty matches everything
    pub text: String,
    /// Empty means any category
    pub categories: BTreeSet<String>,
    /// Empty means any semantic domain
    pub domains: BTreeSet<String>,
    pub max_results: usize,
}

impl Default for ReferenceQuery {
    fn default() -> Self {
        Self {
            text: String::new(),
            categories: BTreeSet::new(),
            domains: BTreeSet::new(),
            max_results: 20,
        }
    }
}

impl ReferenceQuery {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    fn matches(&self, item: &ReferenceItem, needle: &str) -> bool {
        let text_ok = needle.is_empty()
            || item.key.to_lowercase().contains(needle)
            || item.display_label.to_lowercase().contains(needle);

        let category_ok = self.categories.is_empty()
            || item
                .category
                .as_ref()
                .is_some_and(|c| self.categories.contains(c));

        let domain_ok = self.domains.is_empty()
            || item
                .semantic_domain
                .as_ref()
                .is_some_and(|d| self.domains.contains(d));

        text_ok && category_ok && domain_ok
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    Noun,
    Adjective,
}

#[derive(Debug, Clone)]
pub struct ReferenceMetadata {
    pub kind: ReferenceKind,
    pub entry_count: usize,
    pub categories: BTreeSet<String>,
    pub domains: BTreeSet<String>,
}

/// In-memory reference list with a key index
#[derive(Debug)]
pub struct ReferenceIndex {
    kind: ReferenceKind,
    items: Vec<ReferenceItem>,
    key_index: HashMap<String, usize>,
}

impl ReferenceIndex {
    /// Later items with a duplicate key replace earlier ones
    pub fn new(kind: ReferenceKind, items: Vec<ReferenceItem>) -> Self {
        let mut index = Self {
            kind,
            items: Vec::with_capacity(items.len()),
            key_index: HashMap::new(),
        };

        for item in items {
            match index.key_index.get(&item.key) {
                Some(&idx) => index.items[idx] = item,
                None => {
                    index.key_index.insert(item.key.clone(), index.items.len());
                    index.items.push(item);
                }
            }
        }

        index
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl ReferenceLookup for ReferenceIndex {
    fn search(&self, query: &ReferenceQuery) -> Vec<ReferenceItem> {
        let needle = query.text.trim().to_lowercase();

        self.items
            .iter()
            .filter(|item| query.matches(item, &needle))
            .take(query.max_results)
            .cloned()
            .collect()
    }

    fn get(&self, key: &str) -> Option<ReferenceItem> {
        self.key_index.get(key).map(|&idx| self.items[idx].clone())
    }

    fn metadata(&self) -> ReferenceMetadata {
        ReferenceMetadata {
            kind: self.kind,
            entry_count: self.items.len(),
            categories: self.items.iter().filter_map(|i| i.category.clone()).collect(),
            domains: self
                .items
                .iter()
                .filter_map(|i| i.semantic_domain.clone())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(key: &str, label: &str, category: &str, domain: &str) -> ReferenceItem {
        ReferenceItem {
            key: key.to_string(),
            display_label: label.to_string(),
            category: Some(category.to_string()),
            semantic_domain: Some(domain.to_string()),
        }
    }

    fn nouns() -> ReferenceIndex {
        ReferenceIndex::new(
            ReferenceKind::Noun,
            vec![
                item("kali", "ქალი (woman)", "person", "people"),
                item("katsi", "კაცი (man)", "person", "people"),
                item("tsigni", "წიგნი (book)", "object", "education"),
                item("kali", "ქალი (woman, wife)", "person", "family"),
            ],
        )
    }

    #[test]
    fn duplicate_keys_replace() {
        let index = nouns();
        assert_eq!(index.len(), 3);
        assert_eq!(index.get("kali").unwrap().semantic_domain.as_deref(), Some("family"));
    }

    #[test]
    fn filters_by_text_and_sets() {
        let index = nouns();

        let hits = index.search(&ReferenceQuery::text("BOOK"));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].key, "tsigni");

        let query = ReferenceQuery {
            categories: BTreeSet::from(["person".to_string()]),
            domains: BTreeSet::from(["people".to_string()]),
            ..ReferenceQuery::default()
        };
        let keys: Vec<String> = index.search(&query).into_iter().map(|i| i.key).collect();
        assert_eq!(keys, vec!["katsi".to_string()]);

        let capped = ReferenceQuery {
            max_results: 2,
            ..ReferenceQuery::default()
        };
        assert_eq!(index.search(&capped).len(), 2);
    }

    #[test]
    fn metadata_lists_categories() {
        let meta = nouns().metadata();
        assert_eq!(meta.entry_count, 3);
        assert!(meta.categories.contains("object"));
    }
}
