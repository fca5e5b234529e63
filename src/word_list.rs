use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A named word list as seen by the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordList {
    pub name: String,
    /// Display name, only set for built-in lists
    pub label: Option<String>,
    pub words: Vec<String>,
    pub is_builtin: bool,
}

impl WordList {
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}

/// Trim, lowercase and drop blank entries, preserving order
pub fn normalize_words<'a, I>(words: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    words
        .into_iter()
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Split editor text into words, one per line
pub fn parse_words(text: &str) -> Vec<String> {
    normalize_words(text.lines())
}

/// Persisted mapping from list name to its words.
///
/// Serializes as a plain JSON object so the stored value stays
/// `{ "name": ["word", ...], ... }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WordListCollection {
    lists: BTreeMap<String, Vec<String>>,
}

impl WordListCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.lists.get(name).map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lists.contains_key(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, words: Vec<String>) {
        self.lists.insert(name.into(), words);
    }

    pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
        self.lists.remove(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.lists.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }
}
