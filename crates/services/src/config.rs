use std::env;
use std::time::Duration;

use spell_core::voice::{DEFAULT_VOICE_LOCALE, VoiceRefresh, VoiceSelector};

use crate::practice::Burst;

/// What to do when recording an attempt fails.
///
/// The session is never rolled back either way; the child keeps going.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PersistencePolicy {
    /// Log the failure and move on.
    FireAndForget,
    /// Try once more, then log and move on.
    #[default]
    RetryOnce,
}

impl PersistencePolicy {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "fire-and-forget" => Some(Self::FireAndForget),
            "retry-once" => Some(Self::RetryOnce),
            _ => None,
        }
    }
}

fn parse_voice_refresh(raw: &str) -> Option<VoiceRefresh> {
    match raw.trim().to_lowercase().as_str() {
        "overwrite" => Some(VoiceRefresh::Overwrite),
        "keep-manual" => Some(VoiceRefresh::KeepManual),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PracticeConfig {
    /// How long the correct/incorrect indicator stays up before the next word.
    pub reveal_delay: Duration,
    pub voice_locale: String,
    pub voice_refresh: VoiceRefresh,
    pub persistence: PersistencePolicy,
    pub star_burst: Burst,
    pub completion_burst: Burst,
}

impl Default for PracticeConfig {
    fn default() -> Self {
        Self {
            reveal_delay: Duration::from_millis(1000),
            voice_locale: DEFAULT_VOICE_LOCALE.to_string(),
            voice_refresh: VoiceRefresh::default(),
            persistence: PersistencePolicy::default(),
            star_burst: Burst::star(),
            completion_burst: Burst::completion(),
        }
    }
}

impl PracticeConfig {
    /// Read overrides from `SPELL_*` environment variables.
    ///
    /// Unset or unparsable values fall back to the defaults (with a warning
    /// for unparsable ones).
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup("SPELL_REVEAL_DELAY_MS") {
            match raw.trim().parse::<u64>() {
                Ok(ms) => config.reveal_delay = Duration::from_millis(ms),
                Err(_) => tracing::warn!(value = %raw, "ignoring invalid SPELL_REVEAL_DELAY_MS"),
            }
        }
        if let Some(raw) = lookup("SPELL_VOICE_LOCALE") {
            if !raw.trim().is_empty() {
                config.voice_locale = raw.trim().to_string();
            }
        }
        if let Some(raw) = lookup("SPELL_VOICE_REFRESH") {
            match parse_voice_refresh(&raw) {
                Some(refresh) => config.voice_refresh = refresh,
                None => tracing::warn!(value = %raw, "ignoring invalid SPELL_VOICE_REFRESH"),
            }
        }
        if let Some(raw) = lookup("SPELL_PERSIST_POLICY") {
            match PersistencePolicy::parse(&raw) {
                Some(policy) => config.persistence = policy,
                None => tracing::warn!(value = %raw, "ignoring invalid SPELL_PERSIST_POLICY"),
            }
        }

        config
    }

    /// A fresh voice selector honoring the configured locale and refresh policy.
    #[must_use]
    pub fn voice_selector(&self) -> VoiceSelector {
        VoiceSelector::new(self.voice_locale.clone(), self.voice_refresh)
    }
}
