use serde::Serialize;
use spell_core::session::Celebration;
use spell_core::voice::Voice;

/// Platform text-to-speech.
pub trait SpeechService: Send + Sync {
    /// Voices currently offered by the platform. May be empty until the
    /// platform finishes loading them.
    fn list_voices(&self) -> Vec<Voice>;

    /// Speak `text` with `voice`. Fire-and-forget.
    fn speak(&self, text: &str, voice: &Voice);
}

/// Visual celebration. Fire-and-forget.
pub trait CelebrationEffect: Send + Sync {
    fn celebrate(&self, kind: Celebration, burst: &Burst);
}

/// Size and shape of a celebration burst.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Burst {
    pub particle_count: u32,
    /// Spread angle in degrees.
    pub spread: u32,
    /// Vertical origin, 0.0 (top) to 1.0 (bottom).
    pub origin_y: f32,
}

impl Burst {
    #[must_use]
    pub fn star() -> Self {
        Self {
            particle_count: 1,
            spread: 0,
            origin_y: 0.5,
        }
    }

    #[must_use]
    pub fn completion() -> Self {
        Self {
            particle_count: 150,
            spread: 100,
            origin_y: 0.6,
        }
    }
}

/// Speech service for headless runs: no voices, speaks nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentSpeech;

impl SpeechService for SilentSpeech {
    fn list_voices(&self) -> Vec<Voice> {
        Vec::new()
    }

    fn speak(&self, text: &str, voice: &Voice) {
        tracing::debug!(text, voice = %voice.name, "speech disabled");
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoCelebration;

impl CelebrationEffect for NoCelebration {
    fn celebrate(&self, kind: Celebration, _burst: &Burst) {
        tracing::debug!(?kind, "celebration disabled");
    }
}
