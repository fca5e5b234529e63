use itertools::Itertools;
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::error::{Result, SpellError};
use crate::kv_store::KeyValueStore;
use crate::word_list::{parse_words, WordList, WordListCollection};

/// Storage key of the multi-list variant: name -> words
pub const MULTI_LIST_KEY: &str = "spellingWordLists";
/// Storage key of the single-list variant: words
pub const SINGLE_LIST_KEY: &str = "spellingWords";

/// Name and label of the one list the single-list variant exposes
pub const SINGLE_LIST_NAME: &str = "words";
pub const SINGLE_LIST_LABEL: &str = "My Words";

/// Word-list management as needed by the orchestrator, independent of
/// which storage variant backs it.
pub trait WordLists {
    /// Built-in lists first in catalog order, then custom lists by name
    fn ordered_lists(&self) -> Vec<WordList>;
    fn words(&self, name: &str) -> Option<&[String]>;
    fn contains(&self, name: &str) -> bool {
        self.words(name).is_some()
    }
    fn is_builtin(&self, name: &str) -> bool;
    /// Active list at start-up and after a delete
    fn default_list_name(&self) -> &str;
    fn label(&self, name: &str) -> String;

    /// Replace a list's words with the lines of `text`, returning the stored words
    fn save(&mut self, name: &str, text: &str) -> Result<Vec<String>>;
    /// Restore a built-in list to its catalog words
    fn reset(&mut self, name: &str) -> Result<Vec<String>>;
    /// Add an empty custom list, returning its (trimmed) name
    fn create(&mut self, name: &str) -> Result<String>;
    /// Remove a custom list, returning the list that should become active
    fn delete(&mut self, name: &str) -> Result<String>;
}

/// Multi-list store: built-in catalog lists plus user lists, persisted as a
/// single JSON mapping.
pub struct WordListStore<S: KeyValueStore> {
    kv: S,
    catalog: Catalog,
    lists: WordListCollection,
}

impl<S: KeyValueStore> WordListStore<S> {
    /// Merge persisted lists with the catalog.
    ///
    /// Built-in lists are always refreshed to the catalog's words: edits to a
    /// built-in list survive only for the rest of the session, not a reload.
    pub fn load(kv: S, catalog: Catalog) -> Result<Self> {
        let mut lists = match kv.get(MULTI_LIST_KEY)? {
            Some(raw) => match serde_json::from_str::<WordListCollection>(&raw) {
                Ok(saved) => saved,
                Err(e) => {
                    warn!(error = %e, "ignoring unreadable saved word lists");
                    WordListCollection::new()
                }
            },
            None => WordListCollection::new(),
        };

        for entry in catalog.entries() {
            lists.insert(entry.name.clone(), entry.words.clone());
        }
        info!(
            lists = lists.len(),
            builtin = catalog.entries().len(),
            "loaded word lists"
        );

        Ok(Self { kv, catalog, lists })
    }

    /// Hand back the underlying key-value store, e.g. to reload from it
    pub fn into_inner(self) -> S {
        self.kv
    }

    pub fn ordered_names(&self) -> Vec<String> {
        let builtin = self.catalog.names().map(str::to_string);
        let custom = self
            .lists
            .names()
            .filter(|n| !self.catalog.is_builtin(n))
            .sorted_by(|a, b| {
                a.to_lowercase()
                    .cmp(&b.to_lowercase())
                    .then_with(|| a.cmp(b))
            })
            .map(str::to_string);
        builtin.chain(custom).collect()
    }

    /// Write `next` and only then make it the in-memory state, so a failed
    /// write leaves the store as it was.
    fn commit(&mut self, next: WordListCollection) -> Result<()> {
        let data = serde_json::to_string(&next)?;
        self.kv.set(MULTI_LIST_KEY, &data)?;
        debug!(bytes = data.len(), "persisted word lists");
        self.lists = next;
        Ok(())
    }

    fn with_list(&self, name: &str, words: Vec<String>) -> WordListCollection {
        let mut next = self.lists.clone();
        next.insert(name, words);
        next
    }

    fn require(&self, name: &str) -> Result<()> {
        if self.lists.contains(name) {
            Ok(())
        } else {
            Err(SpellError::UnknownList(name.to_string()))
        }
    }
}

impl<S: KeyValueStore> WordLists for WordListStore<S> {
    fn ordered_lists(&self) -> Vec<WordList> {
        self.ordered_names()
            .into_iter()
            .map(|name| {
                let words = self.lists.get(&name).unwrap_or_default().to_vec();
                let label = self.catalog.label(&name).map(str::to_string);
                WordList {
                    is_builtin: label.is_some(),
                    name,
                    label,
                    words,
                }
            })
            .collect()
    }

    fn words(&self, name: &str) -> Option<&[String]> {
        self.lists.get(name)
    }

    fn is_builtin(&self, name: &str) -> bool {
        self.catalog.is_builtin(name)
    }

    fn default_list_name(&self) -> &str {
        self.catalog.first_name()
    }

    fn label(&self, name: &str) -> String {
        self.catalog.label(name).unwrap_or(name).to_string()
    }

    fn save(&mut self, name: &str, text: &str) -> Result<Vec<String>> {
        self.require(name)?;
        let words = parse_words(text);
        self.commit(self.with_list(name, words.clone()))?;
        info!(list = name, words = words.len(), "saved word list");
        Ok(words)
    }

    fn reset(&mut self, name: &str) -> Result<Vec<String>> {
        let entry = self
            .catalog
            .get(name)
            .ok_or_else(|| SpellError::NotResettable(name.to_string()))?;
        let words = entry.words.clone();
        self.commit(self.with_list(name, words.clone()))?;
        info!(list = name, "reset word list to catalog");
        Ok(words)
    }

    fn create(&mut self, name: &str) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SpellError::BlankName);
        }
        if self.catalog.is_builtin(name) {
            return Err(SpellError::ReservedName(name.to_string()));
        }
        if self.lists.contains(name) {
            return Err(SpellError::DuplicateName(name.to_string()));
        }
        self.commit(self.with_list(name, Vec::new()))?;
        info!(list = name, "created word list");
        Ok(name.to_string())
    }

    fn delete(&mut self, name: &str) -> Result<String> {
        if self.catalog.is_builtin(name) {
            return Err(SpellError::NotDeletable(name.to_string()));
        }
        self.require(name)?;
        let mut next = self.lists.clone();
        next.remove(name);
        self.commit(next)?;
        info!(list = name, "deleted word list");
        Ok(self.catalog.first_name().to_string())
    }
}

/// Single-list store: one list whose default is every catalog word
pub struct SingleListStore<S: KeyValueStore> {
    kv: S,
    catalog: Catalog,
    words: Vec<String>,
}

impl<S: KeyValueStore> SingleListStore<S> {
    pub fn load(kv: S, catalog: Catalog) -> Result<Self> {
        let saved = match kv.get(SINGLE_LIST_KEY)? {
            Some(raw) => match serde_json::from_str::<Vec<String>>(&raw) {
                Ok(words) => Some(words),
                Err(e) => {
                    warn!(error = %e, "ignoring unreadable saved words");
                    None
                }
            },
            None => None,
        };
        let words = saved.unwrap_or_else(|| catalog.all_words());
        info!(words = words.len(), "loaded single word list");

        Ok(Self { kv, catalog, words })
    }

    pub fn into_inner(self) -> S {
        self.kv
    }

    fn commit(&mut self, words: Vec<String>) -> Result<()> {
        let data = serde_json::to_string(&words)?;
        self.kv.set(SINGLE_LIST_KEY, &data)?;
        self.words = words;
        Ok(())
    }

    fn require(&self, name: &str) -> Result<()> {
        if name == SINGLE_LIST_NAME {
            Ok(())
        } else {
            Err(SpellError::UnknownList(name.to_string()))
        }
    }
}

impl<S: KeyValueStore> WordLists for SingleListStore<S> {
    fn ordered_lists(&self) -> Vec<WordList> {
        vec![WordList {
            name: SINGLE_LIST_NAME.to_string(),
            label: Some(SINGLE_LIST_LABEL.to_string()),
            words: self.words.clone(),
            is_builtin: true,
        }]
    }

    fn words(&self, name: &str) -> Option<&[String]> {
        (name == SINGLE_LIST_NAME).then_some(self.words.as_slice())
    }

    fn is_builtin(&self, name: &str) -> bool {
        name == SINGLE_LIST_NAME
    }

    fn default_list_name(&self) -> &str {
        SINGLE_LIST_NAME
    }

    fn label(&self, name: &str) -> String {
        if name == SINGLE_LIST_NAME {
            SINGLE_LIST_LABEL.to_string()
        } else {
            name.to_string()
        }
    }

    fn save(&mut self, name: &str, text: &str) -> Result<Vec<String>> {
        self.require(name)?;
        self.commit(parse_words(text))?;
        info!(words = self.words.len(), "saved single word list");
        Ok(self.words.clone())
    }

    fn reset(&mut self, name: &str) -> Result<Vec<String>> {
        self.require(name)?;
        self.commit(self.catalog.all_words())?;
        info!("reset single word list to catalog");
        Ok(self.words.clone())
    }

    fn create(&mut self, _name: &str) -> Result<String> {
        Err(SpellError::Unsupported("creating lists"))
    }

    fn delete(&mut self, _name: &str) -> Result<String> {
        Err(SpellError::Unsupported("deleting lists"))
    }
}
