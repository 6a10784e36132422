#![forbid(unsafe_code)]

pub mod app_services;
pub mod auth_service;
pub mod config;
pub mod error;
pub mod parent_service;
pub mod practice;

pub use spell_core::Clock;

pub use app_services::AppServices;
pub use auth_service::AuthService;
pub use config::{PersistencePolicy, PracticeConfig};
pub use error::{AppServicesError, AuthError, ParentError, PracticeError};
pub use parent_service::{ChildOverview, ParentService};
pub use practice::{
    Burst, CelebrationEffect, EffectAdapter, EffectReport, NoCelebration, PracticeService,
    PracticeStep, SilentSpeech, SpeechService,
};
