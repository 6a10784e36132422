mod parent_vm;
mod practice_vm;
mod time_fmt;

pub use parent_vm::{ChildCardVm, ProgressRowVm, map_child_card};
pub use practice_vm::{
    FeedbackVm, PracticeVm, RevealTicket, VoiceOptionVm, advance_after_reveal, map_practice,
    map_voice_options, reconcile_session,
};
pub use time_fmt::format_attempt_time;
