mod adapter;
mod effects;
mod service;

// Public API of the practice subsystem.
pub use crate::error::PracticeError;
pub use adapter::{EffectAdapter, EffectReport};
pub use effects::{Burst, CelebrationEffect, NoCelebration, SilentSpeech, SpeechService};
pub use service::{PracticeService, PracticeStep};
