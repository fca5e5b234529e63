use include_dir::{include_dir, Dir};
use serde::Deserialize;
use serde_json::from_str;
use std::collections::HashSet;

use crate::error::{Result, SpellError};
use crate::word_list::normalize_words;

static CATALOG_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/catalog");

const CATALOG_FILE: &str = "db.json";

#[derive(Deserialize)]
struct CatalogDocument {
    default: CatalogSection,
}

#[derive(Deserialize)]
struct CatalogSection {
    lists: Vec<CatalogEntry>,
}

/// A built-in list as shipped in the bundled catalog
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct CatalogEntry {
    pub name: String,
    pub label: String,
    pub words: Vec<String>,
}

/// The static, read-only set of built-in word lists.
///
/// Source of truth for which names are built-in and for what "reset" restores.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Load the catalog embedded in the binary
    pub fn bundled() -> Result<Self> {
        let file = CATALOG_DIR
            .get_file(CATALOG_FILE)
            .ok_or_else(|| SpellError::Catalog(format!("{CATALOG_FILE} not bundled")))?;
        let contents = file
            .contents_utf8()
            .ok_or_else(|| SpellError::Catalog(format!("{CATALOG_FILE} is not utf-8")))?;
        Self::from_json(contents)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let doc: CatalogDocument = from_str(json)?;
        Self::from_entries(doc.default.lists)
    }

    pub fn from_entries(entries: Vec<CatalogEntry>) -> Result<Self> {
        if entries.is_empty() {
            return Err(SpellError::Catalog("catalog has no lists".into()));
        }

        let mut seen = HashSet::new();
        let mut normalized = Vec::with_capacity(entries.len());
        for entry in entries {
            if !seen.insert(entry.name.clone()) {
                return Err(SpellError::Catalog(format!(
                    "duplicate list name \"{}\"",
                    entry.name
                )));
            }
            normalized.push(CatalogEntry {
                words: normalize_words(entry.words.iter().map(String::as_str)),
                ..entry
            });
        }

        Ok(Self {
            entries: normalized,
        })
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Built-in names in catalog order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn is_builtin(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn label(&self, name: &str) -> Option<&str> {
        self.get(name).map(|e| e.label.as_str())
    }

    /// Fallback active list. Construction guarantees at least one entry.
    pub fn first_name(&self) -> &str {
        &self.entries[0].name
    }

    /// Every catalog word, flattened in catalog order
    pub fn all_words(&self) -> Vec<String> {
        self.entries
            .iter()
            .flat_map(|e| e.words.iter().cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn bundled_catalog_loads() {
        let catalog = Catalog::bundled().unwrap();

        assert!(!catalog.entries().is_empty());
        assert_eq!(catalog.first_name(), "grade1");
        assert!(catalog.is_builtin("tricky"));
        assert!(!catalog.is_builtin("Grade1"));
        for entry in catalog.entries() {
            assert!(!entry.words.is_empty(), "{} has no words", entry.name);
            for word in &entry.words {
                assert_eq!(word, &word.trim().to_lowercase());
            }
        }
    }

    #[test]
    fn words_are_normalized_on_load() {
        let json = r#"
        {
            "default": {
                "lists": [
                    { "name": "a", "label": "A", "words": ["  Cat ", "", "DOG"] }
                ]
            }
        }
        "#;

        let catalog = Catalog::from_json(json).unwrap();

        assert_eq!(catalog.get("a").unwrap().words, vec!["cat", "dog"]);
        assert_eq!(catalog.label("a"), Some("A"));
    }

    #[test]
    fn empty_catalog_is_rejected() {
        let json = r#"{ "default": { "lists": [] } }"#;
        assert_matches!(Catalog::from_json(json), Err(SpellError::Catalog(_)));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let entry = CatalogEntry {
            name: "a".into(),
            label: "A".into(),
            words: vec!["x".into()],
        };
        let result = Catalog::from_entries(vec![entry.clone(), entry]);
        assert_matches!(result, Err(SpellError::Catalog(msg)) if msg.contains("duplicate"));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert_matches!(Catalog::from_json("{ nope"), Err(SpellError::Json(_)));
    }

    #[test]
    fn all_words_flattens_in_order() {
        let catalog = Catalog::from_entries(vec![
            CatalogEntry {
                name: "a".into(),
                label: "A".into(),
                words: vec!["one".into(), "two".into()],
            },
            CatalogEntry {
                name: "b".into(),
                label: "B".into(),
                words: vec!["three".into()],
            },
        ])
        .unwrap();

        assert_eq!(catalog.all_words(), vec!["one", "two", "three"]);
        assert_eq!(catalog.names().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
