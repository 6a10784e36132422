use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum WordListError {
    #[error("word list name cannot be empty")]
    EmptyName,

    #[error("word list must contain at least one word")]
    NoWords,

    #[error("word at position {index} is blank")]
    BlankWord { index: usize },
}

/// A named, ordered list of spelling words assigned to one child.
///
/// The order of `words` is the drill order. A list is always written whole;
/// assigning a new one replaces the old one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawWordList")]
pub struct WordList {
    name: String,
    words: Vec<String>,
}

#[derive(Deserialize)]
struct RawWordList {
    name: String,
    words: Vec<String>,
}

impl TryFrom<RawWordList> for WordList {
    type Error = WordListError;

    fn try_from(raw: RawWordList) -> Result<Self, Self::Error> {
        Self::new(raw.name, raw.words)
    }
}

impl WordList {
    /// Build a word list from already-separated words.
    ///
    /// # Errors
    ///
    /// Returns `WordListError::EmptyName` for a blank name,
    /// `WordListError::NoWords` for an empty list and
    /// `WordListError::BlankWord` if any word is blank.
    pub fn new(name: impl Into<String>, words: Vec<String>) -> Result<Self, WordListError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(WordListError::EmptyName);
        }
        if words.is_empty() {
            return Err(WordListError::NoWords);
        }
        if let Some(index) = words.iter().position(|w| w.trim().is_empty()) {
            return Err(WordListError::BlankWord { index });
        }
        Ok(Self { name, words })
    }

    /// Parse the comma-separated form a parent types in.
    ///
    /// Each piece is trimmed and empty pieces are dropped, so `"cat, dog,,"`
    /// yields `["cat", "dog"]`.
    ///
    /// # Errors
    ///
    /// Returns `WordListError` if the name is blank or no words remain.
    pub fn parse(name: impl Into<String>, raw_words: &str) -> Result<Self, WordListError> {
        let words = raw_words
            .split(',')
            .map(str::trim)
            .filter(|w| !w.is_empty())
            .map(ToString::to_string)
            .collect();
        Self::new(name, words)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn words(&self) -> &[String] {
        &self.words
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Always false for a constructed list; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    #[must_use]
    pub fn word(&self, index: usize) -> Option<&str> {
        self.words.get(index).map(String::as_str)
    }

    /// Comma-joined words, as shown on the parent dashboard.
    #[must_use]
    pub fn joined(&self) -> String {
        self.words.join(", ")
    }
}
