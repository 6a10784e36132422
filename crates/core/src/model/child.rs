use serde::{Deserialize, Serialize};

use crate::model::{ChildId, ProgressEntry, ProgressTally, WordList};

/// A child document as the backend stores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildProfile {
    pub id: ChildId,
    pub name: String,
    #[serde(default)]
    pub word_list: Option<WordList>,
    #[serde(default)]
    pub progress: Vec<ProgressEntry>,
}

impl ChildProfile {
    #[must_use]
    pub fn new(id: ChildId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            word_list: None,
            progress: Vec::new(),
        }
    }

    /// True when `username` names this child, ignoring case and surrounding spaces.
    #[must_use]
    pub fn answers_to(&self, username: &str) -> bool {
        self.name.trim().to_lowercase() == username.trim().to_lowercase()
    }

    #[must_use]
    pub fn progress_tally(&self) -> ProgressTally {
        ProgressTally::from_entries(&self.progress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answers_to_is_case_insensitive() {
        let child = ChildProfile::new(ChildId::new(1), "Maya");
        assert!(child.answers_to("maya"));
        assert!(child.answers_to(" MAYA "));
        assert!(!child.answers_to("may"));
    }

    #[test]
    fn missing_fields_deserialize_to_empty() {
        let child: ChildProfile = serde_json::from_str(r#"{"id":3,"name":"Sam"}"#).unwrap();
        assert!(child.word_list.is_none());
        assert!(child.progress.is_empty());
    }
}
