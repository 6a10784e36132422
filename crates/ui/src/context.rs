use std::sync::Arc;

use services::{AuthService, ParentService, PracticeService};
use spell_core::model::{Email, Role};

use crate::webview::WebviewSpeech;

pub trait UiApp: Send + Sync {
    fn auth(&self) -> Arc<AuthService>;
    fn parent(&self) -> Arc<ParentService>;
    fn practice(&self) -> Arc<PracticeService>;

    /// The speech adapter the practice service speaks through; the child view
    /// feeds it the voices the webview reports.
    fn speech(&self) -> Arc<WebviewSpeech>;
}

/// The signed-in account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Account {
    pub email: Email,
    pub role: Role,
}

#[derive(Clone)]
pub struct AppContext {
    auth: Arc<AuthService>,
    parent: Arc<ParentService>,
    practice: Arc<PracticeService>,
    speech: Arc<WebviewSpeech>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            auth: app.auth(),
            parent: app.parent(),
            practice: app.practice(),
            speech: app.speech(),
        }
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

    #[must_use]
    pub fn speech(&self) -> Arc<WebviewSpeech> {
        Arc::clone(&self.speech)
    }
}

// This context is provided by the application composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
