//! Survey answer persistence.
//!
//! Answers are keyed per survey identifier and stored as one serialized
//! JSON mapping of question key to answer text, under a namespaced key
//! (`codelab-survey-<surveyId>` by default). Storage sits behind the
//! [`KeyValueStore`] trait so hosts can back it with whatever their
//! platform offers and tests can run against [`MemoryStore`];
//! [`FileStore`] is the file-backed implementation.
//!
//! Corrupt stored data is never trusted partially: a parse failure
//! discards the stored value entirely and [`AnswerStore::load`] returns an
//! empty mapping.

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use crate::error::{LabkitError, Result};
use crate::normalize::slugify;

const DEFAULT_PREFIX: &str = "codelab-survey";

/// Abstract interface for keyed string persistence.
pub trait KeyValueStore {
    /// Get the stored value for a key, `None` if absent.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Set the value for a key, overwriting any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// In-memory storage for testing. No persistence.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// File-based storage: one `<key>.json` file per key under a root
/// directory the host passes in.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn key_path(&self, key: &str) -> Result<PathBuf> {
        // Keys come from slugified survey ids, but never trust them as
        // path components blindly.
        if key.contains(['/', '\\', '.']) {
            return Err(LabkitError::Store(format!("invalid storage key: {key}")));
        }
        Ok(self.root.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key)?;
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(LabkitError::Io(err)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key)?;
        if !self.root.exists() {
            fs::create_dir_all(&self.root)?;
        }
        fs::write(path, value)?;
        Ok(())
    }
}

/// The data record the host renders for one survey option: the radio group
/// is the survey id, the element id the slugified option title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionRecord {
    pub group: String,
    pub id: String,
    pub title: String,
}

/// Builds the option records for a question's raw option titles.
pub fn option_records(survey_id: &str, titles: &[String]) -> Vec<OptionRecord> {
    titles
        .iter()
        .map(|title| OptionRecord {
            group: survey_id.to_string(),
            id: slugify(title),
            title: title.clone(),
        })
        .collect()
}

/// Keyed persistence of survey answers, independent per survey identifier.
pub struct AnswerStore<S: KeyValueStore> {
    store: S,
    prefix: String,
}

impl<S: KeyValueStore> AnswerStore<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.to_string();
        self
    }

    fn key(&self, survey_id: &str) -> String {
        format!("{}-{}", self.prefix, slugify(survey_id))
    }

    /// Loads the stored answers for a survey. Absent, unreadable, or
    /// corrupt data all yield an empty mapping; the parse error is logged
    /// and never propagated.
    pub fn load(&self, survey_id: &str) -> BTreeMap<String, String> {
        let key = self.key(survey_id);
        let raw = match self.store.get(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return BTreeMap::new(),
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "failed to read stored answers");
                return BTreeMap::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(answers) => answers,
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "discarding corrupt stored answers");
                BTreeMap::new()
            }
        }
    }

    /// Merges one answer into the survey's mapping and writes the whole
    /// mapping back synchronously.
    pub fn record(&mut self, survey_id: &str, question: &str, answer: &str) -> Result<()> {
        let mut answers = self.load(survey_id);
        answers.insert(question.to_string(), answer.to_string());
        let raw = serde_json::to_string(&answers)?;
        self.store.set(&self.key(survey_id), &raw)
    }

    /// Re-applies stored answers to the host's rendered options: for each
    /// stored answer the resolver gets the question key and the slugified
    /// option id and marks the option selected, returning whether it found
    /// one. Unresolved ids are skipped and logged, never fatal.
    pub fn apply<F>(&self, survey_id: &str, mut resolver: F)
    where
        F: FnMut(&str, &str) -> bool,
    {
        for (question, answer) in self.load(survey_id) {
            let option_id = slugify(&answer);
            if !resolver(&question, &option_id) {
                tracing::warn!(
                    survey = survey_id,
                    question = %question,
                    option = %option_id,
                    "stored answer has no matching option"
                );
            }
        }
    }
}
