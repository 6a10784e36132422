use std::sync::Arc;

use storage::repository::Storage;

use crate::Clock;
use crate::auth_service::AuthService;
use crate::config::PracticeConfig;
use crate::error::AppServicesError;
use crate::parent_service::ParentService;
use crate::practice::{CelebrationEffect, PracticeService, SpeechService};

/// Assembles app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    storage: Storage,
    auth: Arc<AuthService>,
    parent: Arc<ParentService>,
    practice: Arc<PracticeService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        config: PracticeConfig,
        speech: Arc<dyn SpeechService>,
        celebration: Arc<dyn CelebrationEffect>,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(storage, clock, config, speech, celebration))
    }

    /// Build services over fresh in-memory storage.
    #[must_use]
    pub fn in_memory(
        clock: Clock,
        config: PracticeConfig,
        speech: Arc<dyn SpeechService>,
        celebration: Arc<dyn CelebrationEffect>,
    ) -> Self {
        Self::from_storage(Storage::in_memory(), clock, config, speech, celebration)
    }

    #[must_use]
    pub fn from_storage(
        storage: Storage,
        clock: Clock,
        config: PracticeConfig,
        speech: Arc<dyn SpeechService>,
        celebration: Arc<dyn CelebrationEffect>,
    ) -> Self {
        let auth = Arc::new(AuthService::new(Arc::clone(&storage.accounts)));
        let parent = Arc::new(ParentService::new(Arc::clone(&storage.children)));
        let practice = Arc::new(PracticeService::new(
            clock,
            Arc::clone(&storage.children),
            speech,
            celebration,
            config,
        ));
        Self {
            storage,
            auth,
            parent,
            practice,
        }
    }

    #[must_use]
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    #[must_use]
    pub fn auth(&self) -> Arc<AuthService> {
        Arc::clone(&self.auth)
    }

    #[must_use]
    pub fn parent(&self) -> Arc<ParentService> {
        Arc::clone(&self.parent)
    }

    #[must_use]
    pub fn practice(&self) -> Arc<PracticeService> {
        Arc::clone(&self.practice)
    }
}
