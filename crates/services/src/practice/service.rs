use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use spell_core::model::{ChildId, ChildProfile, Email};
use spell_core::session::{PracticeSession, SessionEffect, SessionState};
use spell_core::voice::{Voice, VoiceSelector};
use storage::feed::{ChildListener, ChildSubscription};
use storage::repository::{ChildRepository, StorageError};

use super::adapter::{EffectAdapter, EffectReport};
use super::effects::{CelebrationEffect, SpeechService};
use crate::Clock;
use crate::config::PracticeConfig;
use crate::error::PracticeError;

/// Outcome of one practice transition after its effects ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PracticeStep {
    pub state: SessionState,
    pub effects: Vec<SessionEffect>,
    pub report: EffectReport,
}

/// Child-side practice: finds the child, runs session transitions and
/// executes the effects they emit.
#[derive(Clone)]
pub struct PracticeService {
    clock: Clock,
    children: Arc<dyn ChildRepository>,
    adapter: EffectAdapter,
    config: PracticeConfig,
}

impl PracticeService {
    #[must_use]
    pub fn new(
        clock: Clock,
        children: Arc<dyn ChildRepository>,
        speech: Arc<dyn SpeechService>,
        celebration: Arc<dyn CelebrationEffect>,
        config: PracticeConfig,
    ) -> Self {
        let adapter = EffectAdapter::new(Arc::clone(&children), speech, celebration, &config);
        Self {
            clock,
            children,
            adapter,
            config,
        }
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    #[must_use]
    pub fn config(&self) -> &PracticeConfig {
        &self.config
    }

    #[must_use]
    pub fn reveal_delay(&self) -> Duration {
        self.config.reveal_delay
    }

    /// Voice selector seeded with whatever the speech service offers right now.
    #[must_use]
    pub fn voice_selector(&self) -> VoiceSelector {
        let mut selector = self.config.voice_selector();
        selector.on_voices_changed(self.adapter.speech().list_voices());
        selector
    }

    /// The child profile a child account practices with: the child whose
    /// name matches the part of the email before `@`.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::NoMatchingChild` if no child has that name.
    pub async fn find_child_for(&self, email: &Email) -> Result<ChildProfile, PracticeError> {
        let username = email.username();
        self.children
            .find_child_by_name(username)
            .await?
            .ok_or_else(|| PracticeError::NoMatchingChild {
                username: username.to_string(),
            })
    }

    /// Subscribe to a child's document. The caller owns the returned handle
    /// and must drop it when the view goes away.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::ChildNotFound` if the child does not exist.
    pub async fn watch_child(
        &self,
        child_id: ChildId,
        listener: ChildListener,
    ) -> Result<ChildSubscription, PracticeError> {
        match self.children.subscribe_child(child_id, listener).await {
            Ok(sub) => Ok(sub),
            Err(StorageError::NotFound) => Err(PracticeError::ChildNotFound),
            Err(err) => Err(err.into()),
        }
    }

    /// # Errors
    ///
    /// Returns `PracticeError::Session` when the child has no word list.
    pub fn start(&self, child: &ChildProfile) -> Result<PracticeSession, PracticeError> {
        let session = PracticeSession::start_for(child)?;
        tracing::info!(
            child_id = %child.id,
            list = session.word_list().name(),
            words = session.word_list().len(),
            "practice session started"
        );
        Ok(session)
    }

    /// Run effects emitted by a transition the caller applied itself.
    pub async fn execute(
        &self,
        child_id: ChildId,
        effects: &[SessionEffect],
        voice: Option<&Voice>,
    ) -> EffectReport {
        self.adapter.execute(child_id, effects, voice).await
    }

    /// Speak the current word.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::Session` unless a word is being presented.
    pub async fn speak(
        &self,
        session: &PracticeSession,
        child_id: ChildId,
        voice: Option<&Voice>,
    ) -> Result<PracticeStep, PracticeError> {
        let effects = session.speak()?;
        Ok(self.finish(session, child_id, effects, voice).await)
    }

    /// Submit the pending answer and record the attempt.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::Session` if an answer is already being
    /// evaluated or the session is complete.
    pub async fn submit(
        &self,
        session: &mut PracticeSession,
        child_id: ChildId,
    ) -> Result<PracticeStep, PracticeError> {
        let effects = session.submit(self.clock.now())?;
        Ok(self.finish(session, child_id, effects, None).await)
    }

    /// Move past the reveal step.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::Session` unless an answer is being evaluated.
    pub async fn advance(
        &self,
        session: &mut PracticeSession,
        child_id: ChildId,
    ) -> Result<PracticeStep, PracticeError> {
        let effects = session.advance()?;
        if session.is_complete() {
            tracing::info!(child_id = %child_id, list = session.word_list().name(), "practice session complete");
        }
        Ok(self.finish(session, child_id, effects, None).await)
    }

    pub fn restart(&self, session: &mut PracticeSession) -> SessionState {
        session.restart();
        session.state()
    }

    async fn finish(
        &self,
        session: &PracticeSession,
        child_id: ChildId,
        effects: Vec<SessionEffect>,
        voice: Option<&Voice>,
    ) -> PracticeStep {
        let report = self.adapter.execute(child_id, &effects, voice).await;
        PracticeStep {
            state: session.state(),
            effects,
            report,
        }
    }
}
