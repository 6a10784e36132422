use std::sync::Arc;

use spell_core::model::{ChildId, ProgressEntry};
use spell_core::session::{Celebration, SessionEffect};
use spell_core::voice::Voice;
use storage::repository::{ChildRepository, StorageError};

use super::effects::{Burst, CelebrationEffect, SpeechService};
use crate::config::{PersistencePolicy, PracticeConfig};

/// What happened to the effects of one transition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EffectReport {
    pub persisted: usize,
    pub persist_failures: usize,
    pub spoken: usize,
    pub celebrations: usize,
}

/// Executes session effects against the backend, speech and celebration services.
///
/// Failures are logged and counted; they never reach the session, which has
/// already moved on by the time effects run.
#[derive(Clone)]
pub struct EffectAdapter {
    children: Arc<dyn ChildRepository>,
    speech: Arc<dyn SpeechService>,
    celebration: Arc<dyn CelebrationEffect>,
    persistence: PersistencePolicy,
    star_burst: Burst,
    completion_burst: Burst,
}

impl EffectAdapter {
    #[must_use]
    pub fn new(
        children: Arc<dyn ChildRepository>,
        speech: Arc<dyn SpeechService>,
        celebration: Arc<dyn CelebrationEffect>,
        config: &PracticeConfig,
    ) -> Self {
        Self {
            children,
            speech,
            celebration,
            persistence: config.persistence,
            star_burst: config.star_burst,
            completion_burst: config.completion_burst,
        }
    }

    #[must_use]
    pub fn speech(&self) -> Arc<dyn SpeechService> {
        Arc::clone(&self.speech)
    }

    /// Run `effects` in order for `child_id`.
    ///
    /// `voice` is the currently selected voice; speech is skipped without one.
    pub async fn execute(
        &self,
        child_id: ChildId,
        effects: &[SessionEffect],
        voice: Option<&Voice>,
    ) -> EffectReport {
        let mut report = EffectReport::default();
        for effect in effects {
            match effect {
                SessionEffect::Persist(entry) => {
                    if self.persist(child_id, entry).await {
                        report.persisted += 1;
                    } else {
                        report.persist_failures += 1;
                    }
                }
                SessionEffect::Speak(text) => {
                    if let Some(voice) = voice {
                        self.speech.speak(text, voice);
                        report.spoken += 1;
                    } else {
                        tracing::debug!(text = %text, "no voice selected, not speaking");
                    }
                }
                SessionEffect::Celebrate(kind) => {
                    let burst = match kind {
                        Celebration::Star => &self.star_burst,
                        Celebration::Completion => &self.completion_burst,
                    };
                    self.celebration.celebrate(*kind, burst);
                    report.celebrations += 1;
                }
            }
        }
        report
    }

    async fn persist(&self, child_id: ChildId, entry: &ProgressEntry) -> bool {
        let attempts = match self.persistence {
            PersistencePolicy::FireAndForget => 1,
            PersistencePolicy::RetryOnce => 2,
        };
        let mut last_err: Option<StorageError> = None;
        for attempt in 1..=attempts {
            match self.children.append_progress(child_id, entry).await {
                Ok(()) => {
                    tracing::debug!(child_id = %child_id, word = %entry.word, correct = entry.correct, "attempt recorded");
                    return true;
                }
                // A missing child will not appear on retry.
                Err(StorageError::NotFound) => {
                    last_err = Some(StorageError::NotFound);
                    break;
                }
                Err(err) => {
                    tracing::debug!(child_id = %child_id, attempt, error = %err, "recording attempt failed");
                    last_err = Some(err);
                }
            }
        }
        if let Some(err) = last_err {
            tracing::warn!(child_id = %child_id, word = %entry.word, error = %err, "attempt not recorded");
        }
        false
    }
}
