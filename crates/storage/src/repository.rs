use async_trait::async_trait;
use spell_core::model::{ChildId, ChildProfile, Email, ProgressEntry, Role, WordList};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::feed::{ChildFeed, ChildListener, ChildSubscription};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Stored sign-in credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    pub email: Email,
    pub password: String,
}

//
// ─── CONTRACTS ─────────────────────────────────────────────────────────────────
//

/// Sign-in credentials and the role document kept next to them.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Store credentials for a new account.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the email is already registered.
    async fn insert_credentials(&self, email: &Email, password: &str) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn get_credentials(&self, email: &Email)
    -> Result<Option<CredentialRecord>, StorageError>;

    /// Create or replace the role document for `email`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn set_role(&self, email: &Email, role: Role) -> Result<(), StorageError>;

    /// Store credentials and role for a new account as one write. Either both
    /// land or neither does.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the email is already registered.
    async fn create_account(
        &self,
        email: &Email,
        password: &str,
        role: Role,
    ) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn get_role(&self, email: &Email) -> Result<Option<Role>, StorageError>;
}

/// Child documents: name, assigned word list and append-only progress.
#[async_trait]
pub trait ChildRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` if the child cannot be stored.
    async fn create_child(&self, name: &str) -> Result<ChildId, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn get_child(&self, id: ChildId) -> Result<Option<ChildProfile>, StorageError>;

    /// All children ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_children(&self) -> Result<Vec<ChildProfile>, StorageError>;

    /// First child (by id) whose name matches, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn find_child_by_name(&self, name: &str) -> Result<Option<ChildProfile>, StorageError>;

    /// Replace the child's word list and clear its progress.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the child does not exist.
    async fn set_word_list(&self, id: ChildId, list: &WordList) -> Result<(), StorageError>;

    /// Append one attempt to the child's progress log.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the child does not exist.
    async fn append_progress(&self, id: ChildId, entry: &ProgressEntry)
    -> Result<(), StorageError>;

    /// Deliver the current snapshot to `listener` now and after every change.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the child does not exist.
    async fn subscribe_child(
        &self,
        id: ChildId,
        listener: ChildListener,
    ) -> Result<ChildSubscription, StorageError>;
}

//
// ─── IN-MEMORY ─────────────────────────────────────────────────────────────────
//

#[derive(Default)]
struct Tables {
    next_child_id: u64,
    children: BTreeMap<ChildId, ChildProfile>,
    credentials: HashMap<Email, String>,
    roles: HashMap<Email, Role>,
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    tables: Arc<Mutex<Tables>>,
    feed: ChildFeed,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn feed(&self) -> &ChildFeed {
        &self.feed
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Tables>, StorageError> {
        self.tables
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))
    }

    /// Apply `change` to a child and publish the result.
    fn update_child(
        &self,
        id: ChildId,
        change: impl FnOnce(&mut ChildProfile),
    ) -> Result<(), StorageError> {
        let snapshot = {
            let mut guard = self.lock()?;
            let child = guard.children.get_mut(&id).ok_or(StorageError::NotFound)?;
            change(child);
            child.clone()
        };
        self.feed.publish(&snapshot);
        Ok(())
    }
}

#[async_trait]
impl AccountRepository for InMemoryRepository {
    async fn insert_credentials(&self, email: &Email, password: &str) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        if guard.credentials.contains_key(email) {
            return Err(StorageError::Conflict);
        }
        guard.credentials.insert(email.clone(), password.to_string());
        Ok(())
    }

    async fn get_credentials(
        &self,
        email: &Email,
    ) -> Result<Option<CredentialRecord>, StorageError> {
        let guard = self.lock()?;
        Ok(guard.credentials.get(email).map(|password| CredentialRecord {
            email: email.clone(),
            password: password.clone(),
        }))
    }

    async fn set_role(&self, email: &Email, role: Role) -> Result<(), StorageError> {
        self.lock()?.roles.insert(email.clone(), role);
        Ok(())
    }

    async fn create_account(
        &self,
        email: &Email,
        password: &str,
        role: Role,
    ) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        if guard.credentials.contains_key(email) {
            return Err(StorageError::Conflict);
        }
        guard.credentials.insert(email.clone(), password.to_string());
        guard.roles.insert(email.clone(), role);
        Ok(())
    }

    async fn get_role(&self, email: &Email) -> Result<Option<Role>, StorageError> {
        Ok(self.lock()?.roles.get(email).copied())
    }
}

#[async_trait]
impl ChildRepository for InMemoryRepository {
    async fn create_child(&self, name: &str) -> Result<ChildId, StorageError> {
        let mut guard = self.lock()?;
        guard.next_child_id += 1;
        let id = ChildId::new(guard.next_child_id);
        guard.children.insert(id, ChildProfile::new(id, name));
        Ok(id)
    }

    async fn get_child(&self, id: ChildId) -> Result<Option<ChildProfile>, StorageError> {
        Ok(self.lock()?.children.get(&id).cloned())
    }

    async fn list_children(&self) -> Result<Vec<ChildProfile>, StorageError> {
        Ok(self.lock()?.children.values().cloned().collect())
    }

    async fn find_child_by_name(&self, name: &str) -> Result<Option<ChildProfile>, StorageError> {
        Ok(self
            .lock()?
            .children
            .values()
            .find(|child| child.answers_to(name))
            .cloned())
    }

    async fn set_word_list(&self, id: ChildId, list: &WordList) -> Result<(), StorageError> {
        self.update_child(id, |child| {
            child.word_list = Some(list.clone());
            child.progress.clear();
        })
    }

    async fn append_progress(
        &self,
        id: ChildId,
        entry: &ProgressEntry,
    ) -> Result<(), StorageError> {
        self.update_child(id, |child| child.progress.push(entry.clone()))
    }

    async fn subscribe_child(
        &self,
        id: ChildId,
        listener: ChildListener,
    ) -> Result<ChildSubscription, StorageError> {
        let snapshot = self
            .lock()?
            .children
            .get(&id)
            .cloned()
            .ok_or(StorageError::NotFound)?;
        let subscription = self.feed.register(id, Arc::clone(&listener));
        listener(&snapshot);
        Ok(subscription)
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub children: Arc<dyn ChildRepository>,
    pub accounts: Arc<dyn AccountRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let children: Arc<dyn ChildRepository> = Arc::new(repo.clone());
        let accounts: Arc<dyn AccountRepository> = Arc::new(repo);
        Self { children, accounts }
    }
}
