use std::sync::Arc;

use spell_core::model::{ChildId, ChildProfile, ProgressEntry, ProgressTally, WordList};
use storage::repository::{ChildRepository, StorageError};

use crate::error::ParentError;

/// One row of the parent dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildOverview {
    pub id: ChildId,
    pub name: String,
    pub word_list: Option<WordList>,
    pub progress: Vec<ProgressEntry>,
    pub tally: ProgressTally,
}

impl From<ChildProfile> for ChildOverview {
    fn from(child: ChildProfile) -> Self {
        let tally = child.progress_tally();
        Self {
            id: child.id,
            name: child.name,
            word_list: child.word_list,
            progress: child.progress,
            tally,
        }
    }
}

/// Parent-side management of children and their word lists.
#[derive(Clone)]
pub struct ParentService {
    children: Arc<dyn ChildRepository>,
}

impl ParentService {
    #[must_use]
    pub fn new(children: Arc<dyn ChildRepository>) -> Self {
        Self { children }
    }

    /// # Errors
    ///
    /// Returns `ParentError::EmptyName` for a blank name and
    /// `ParentError::Storage` if persistence fails.
    pub async fn add_child(&self, name: &str) -> Result<ChildId, ParentError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ParentError::EmptyName);
        }
        let id = self.children.create_child(name).await?;
        tracing::info!(child_id = %id, name, "child added");
        Ok(id)
    }

    /// # Errors
    ///
    /// Returns `ParentError::Storage` if repository access fails.
    pub async fn list_children(&self) -> Result<Vec<ChildProfile>, ParentError> {
        Ok(self.children.list_children().await?)
    }

    /// Parse `raw_words` (comma-separated) and assign the list to a child,
    /// replacing any previous list and clearing its progress.
    ///
    /// # Errors
    ///
    /// Returns `ParentError::WordList` for a blank name or no words,
    /// `ParentError::ChildNotFound` if the child does not exist.
    pub async fn assign_word_list(
        &self,
        child_id: ChildId,
        list_name: &str,
        raw_words: &str,
    ) -> Result<WordList, ParentError> {
        let list = WordList::parse(list_name, raw_words)?;
        match self.children.set_word_list(child_id, &list).await {
            Ok(()) => {}
            Err(StorageError::NotFound) => return Err(ParentError::ChildNotFound),
            Err(err) => return Err(err.into()),
        }
        tracing::info!(child_id = %child_id, list = list.name(), words = list.len(), "word list assigned");
        Ok(list)
    }

    /// Every child with its current list and progress, for review.
    ///
    /// # Errors
    ///
    /// Returns `ParentError::Storage` if repository access fails.
    pub async fn overview(&self) -> Result<Vec<ChildOverview>, ParentError> {
        let children = self.children.list_children().await?;
        Ok(children.into_iter().map(ChildOverview::from).collect())
    }
}
