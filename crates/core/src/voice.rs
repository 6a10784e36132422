//! Default voice selection for spoken prompts.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Locale tag preferred when no other is configured.
pub const DEFAULT_VOICE_LOCALE: &str = "en-gb";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Voice {
    pub name: String,
    pub lang: String,
}

impl Voice {
    #[must_use]
    pub fn new(name: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lang: lang.into(),
        }
    }

    #[must_use]
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.lang)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum VoiceError {
    #[error("no voice named {0:?}")]
    UnknownVoice(String),
}

/// What a voice-list refresh does to a choice the user made by hand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VoiceRefresh {
    /// Every refresh re-applies the default, discarding a manual choice.
    #[default]
    Overwrite,
    /// A manual choice survives refreshes as long as the voice is still offered.
    KeepManual,
}

/// First voice whose language tag contains `preferred_locale` (case-insensitive),
/// otherwise the first voice.
#[must_use]
pub fn default_voice<'a>(voices: &'a [Voice], preferred_locale: &str) -> Option<&'a Voice> {
    let wanted = preferred_locale.to_lowercase();
    voices
        .iter()
        .find(|v| v.lang.to_lowercase().contains(&wanted))
        .or_else(|| voices.first())
}

#[derive(Debug, Clone)]
pub struct VoiceSelector {
    preferred_locale: String,
    refresh: VoiceRefresh,
    voices: Vec<Voice>,
    selected: Option<Voice>,
    manual: bool,
}

impl Default for VoiceSelector {
    fn default() -> Self {
        Self::new(DEFAULT_VOICE_LOCALE, VoiceRefresh::default())
    }
}

impl VoiceSelector {
    #[must_use]
    pub fn new(preferred_locale: impl Into<String>, refresh: VoiceRefresh) -> Self {
        Self {
            preferred_locale: preferred_locale.into(),
            refresh,
            voices: Vec::new(),
            selected: None,
            manual: false,
        }
    }

    #[must_use]
    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    #[must_use]
    pub fn selected(&self) -> Option<&Voice> {
        self.selected.as_ref()
    }

    #[must_use]
    pub fn is_manual(&self) -> bool {
        self.manual
    }

    /// Handle a (possibly repeated) voice-list notification.
    ///
    /// An empty list is ignored: platforms report one before voices are loaded.
    pub fn on_voices_changed(&mut self, voices: Vec<Voice>) {
        if voices.is_empty() {
            return;
        }
        self.voices = voices;

        if self.refresh == VoiceRefresh::KeepManual && self.manual {
            let still_offered = self
                .selected
                .as_ref()
                .is_some_and(|chosen| self.voices.contains(chosen));
            if still_offered {
                return;
            }
        }

        self.manual = false;
        self.selected = default_voice(&self.voices, &self.preferred_locale).cloned();
    }

    /// Select a voice by name.
    ///
    /// # Errors
    ///
    /// Returns `VoiceError::UnknownVoice` if no listed voice has that name.
    pub fn choose(&mut self, name: &str) -> Result<&Voice, VoiceError> {
        let voice = self
            .voices
            .iter()
            .find(|v| v.name == name)
            .cloned()
            .ok_or_else(|| VoiceError::UnknownVoice(name.to_string()))?;
        self.manual = true;
        Ok(self.selected.insert(voice))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn us_and_gb() -> Vec<Voice> {
        vec![Voice::new("A", "en-US"), Voice::new("B", "en-GB")]
    }

    #[test]
    fn prefers_configured_locale() {
        let voices = us_and_gb();
        assert_eq!(default_voice(&voices, "en-gb").unwrap().name, "B");
    }

    #[test]
    fn falls_back_to_first_voice() {
        let voices = vec![Voice::new("A", "en-US"), Voice::new("C", "fr-FR")];
        assert_eq!(default_voice(&voices, "en-gb").unwrap().name, "A");
        assert!(default_voice(&[], "en-gb").is_none());
    }

    #[test]
    fn empty_refresh_is_ignored() {
        let mut selector = VoiceSelector::default();
        selector.on_voices_changed(us_and_gb());
        selector.on_voices_changed(Vec::new());
        assert_eq!(selector.voices().len(), 2);
        assert_eq!(selector.selected().unwrap().name, "B");
    }

    #[test]
    fn overwrite_policy_discards_manual_choice_on_refresh() {
        let mut selector = VoiceSelector::default();
        selector.on_voices_changed(us_and_gb());
        selector.choose("A").unwrap();
        assert!(selector.is_manual());

        selector.on_voices_changed(us_and_gb());
        assert_eq!(selector.selected().unwrap().name, "B");
        assert!(!selector.is_manual());
    }

    #[test]
    fn keep_manual_policy_survives_refresh_while_voice_exists() {
        let mut selector = VoiceSelector::new("en-gb", VoiceRefresh::KeepManual);
        selector.on_voices_changed(us_and_gb());
        selector.choose("A").unwrap();

        selector.on_voices_changed(us_and_gb());
        assert_eq!(selector.selected().unwrap().name, "A");

        selector.on_voices_changed(vec![Voice::new("B", "en-GB")]);
        assert_eq!(selector.selected().unwrap().name, "B");
    }

    #[test]
    fn choosing_unknown_voice_fails() {
        let mut selector = VoiceSelector::default();
        selector.on_voices_changed(us_and_gb());
        assert_eq!(
            selector.choose("Z").unwrap_err(),
            VoiceError::UnknownVoice("Z".into())
        );
        assert_eq!(selector.selected().unwrap().name, "B");
    }
}
