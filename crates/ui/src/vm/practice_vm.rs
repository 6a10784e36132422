use spell_core::model::ChildProfile;
use spell_core::session::{Outcome, PracticeSession, SessionEffect, SessionPhase};
use spell_core::voice::VoiceSelector;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedbackVm {
    pub label: &'static str,
    pub class: &'static str,
}

impl From<Outcome> for FeedbackVm {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Correct => Self {
                label: "✅ Correct!",
                class: "feedback feedback-correct",
            },
            Outcome::Incorrect => Self {
                label: "❌ Try again!",
                class: "feedback feedback-wrong",
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PracticeVm {
    pub title: String,
    pub progress_label: String,
    pub input: String,
    pub feedback: Option<FeedbackVm>,
    /// Input, speak and submit are live only while a word is presented.
    pub accepts_input: bool,
    pub complete: bool,
}

#[must_use]
pub fn map_practice(session: &PracticeSession) -> PracticeVm {
    let total = session.word_list().len();
    let progress_label = match session.phase() {
        SessionPhase::Complete => format!("{total} of {total} words"),
        SessionPhase::Presenting(i) | SessionPhase::Evaluating(i) => {
            format!("Word {} of {total}", i + 1)
        }
    };
    PracticeVm {
        title: format!("Practice: {}", session.word_list().name()),
        progress_label,
        input: session.input().to_string(),
        feedback: session.last_outcome().map(FeedbackVm::from),
        accepts_input: session.accepts_input(),
        complete: session.is_complete(),
    }
}

/// Bring the session in line with a fresh child snapshot.
///
/// A new list restarts practice on it; a removed list ends practice.
/// An unchanged list leaves the session where it is.
#[must_use]
pub fn reconcile_session(
    current: Option<PracticeSession>,
    snapshot: &ChildProfile,
) -> Option<PracticeSession> {
    let list = snapshot.word_list.as_ref()?;
    match current {
        Some(mut session) => match session.sync_word_list(list) {
            Ok(_) => Some(session),
            Err(err) => {
                tracing::warn!(child_id = %snapshot.id, error = %err, "ignoring unusable word list");
                Some(session)
            }
        },
        None => PracticeSession::start(list).ok(),
    }
}

/// Generation counter for reveal timers. Each submit, restart or list change
/// bumps it, which retires every timer started under an older value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RevealTicket(u64);

impl RevealTicket {
    pub fn bump(&mut self) {
        self.0 = self.0.wrapping_add(1);
    }
}

/// Advance past the revealed answer when the timer holding `issued` fires.
///
/// Returns no effects if `latest` has moved on since the timer started.
#[must_use]
pub fn advance_after_reveal(
    session: Option<&mut PracticeSession>,
    latest: RevealTicket,
    issued: RevealTicket,
) -> Vec<SessionEffect> {
    if latest != issued {
        return Vec::new();
    }
    let Some(session) = session else {
        return Vec::new();
    };
    session.advance().unwrap_or_else(|err| {
        tracing::debug!(error = %err, "reveal timer found nothing to advance");
        Vec::new()
    })
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoiceOptionVm {
    pub name: String,
    pub label: String,
    pub selected: bool,
}

#[must_use]
pub fn map_voice_options(selector: &VoiceSelector) -> Vec<VoiceOptionVm> {
    let selected = selector.selected().map(|v| v.name.as_str());
    selector
        .voices()
        .iter()
        .map(|voice| VoiceOptionVm {
            name: voice.name.clone(),
            label: voice.label(),
            selected: selected == Some(voice.name.as_str()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use spell_core::model::{ChildId, WordList};
    use spell_core::session::Celebration;
    use spell_core::time::fixed_now;
    use spell_core::voice::Voice;

    fn cat_dog() -> WordList {
        WordList::new("Week 1", vec!["cat".into(), "dog".into()]).unwrap()
    }

    fn child_with(list: Option<WordList>) -> ChildProfile {
        let mut child = ChildProfile::new(ChildId::new(1), "Maya");
        child.word_list = list;
        child
    }

    #[test]
    fn labels_follow_the_session() {
        let mut session = PracticeSession::start(&cat_dog()).unwrap();
        let vm = map_practice(&session);
        assert_eq!(vm.title, "Practice: Week 1");
        assert_eq!(vm.progress_label, "Word 1 of 2");
        assert!(vm.accepts_input);
        assert_eq!(vm.feedback, None);

        session.set_input("Kat").unwrap();
        session.submit(fixed_now()).unwrap();
        let vm = map_practice(&session);
        assert!(!vm.accepts_input);
        assert_eq!(vm.feedback.unwrap().label, "❌ Try again!");

        session.advance().unwrap();
        session.set_input("dog").unwrap();
        session.submit(fixed_now()).unwrap();
        assert_eq!(map_practice(&session).feedback.unwrap().label, "✅ Correct!");
        session.advance().unwrap();

        let vm = map_practice(&session);
        assert!(vm.complete);
        assert_eq!(vm.progress_label, "2 of 2 words");
    }

    #[test]
    fn snapshots_start_keep_or_end_practice() {
        let started = reconcile_session(None, &child_with(Some(cat_dog()))).unwrap();
        assert_eq!(started.current_word(), Some("cat"));

        let mut moved = started;
        moved.set_input("cat").unwrap();
        moved.submit(fixed_now()).unwrap();
        moved.advance().unwrap();
        let kept = reconcile_session(Some(moved.clone()), &child_with(Some(cat_dog()))).unwrap();
        assert_eq!(kept, moved);

        let next = WordList::new("Week 2", vec!["emu".into()]).unwrap();
        let replaced = reconcile_session(Some(kept), &child_with(Some(next))).unwrap();
        assert_eq!(replaced.current_word(), Some("emu"));

        assert!(reconcile_session(Some(replaced), &child_with(None)).is_none());
    }

    #[test]
    fn reveal_timer_advances_only_with_latest_ticket() {
        let mut latest = RevealTicket::default();
        let mut session = PracticeSession::start(&cat_dog()).unwrap();
        session.set_input("cat").unwrap();
        session.submit(fixed_now()).unwrap();
        latest.bump();
        let issued = latest;

        assert!(advance_after_reveal(Some(&mut session), latest, issued).is_empty());
        assert_eq!(session.current_word(), Some("dog"));
        assert!(session.accepts_input());

        session.set_input("dog").unwrap();
        session.submit(fixed_now()).unwrap();
        latest.bump();
        let effects = advance_after_reveal(Some(&mut session), latest, latest);
        assert_eq!(effects, vec![SessionEffect::Celebrate(Celebration::Completion)]);
        assert!(session.is_complete());
    }

    #[test]
    fn restart_retires_pending_reveal_timer() {
        let mut latest = RevealTicket::default();
        let mut session = PracticeSession::start(&cat_dog()).unwrap();
        session.set_input("cat").unwrap();
        session.submit(fixed_now()).unwrap();
        latest.bump();
        let issued = latest;

        session.restart();
        latest.bump();
        session.set_input("ca").unwrap();

        assert!(advance_after_reveal(Some(&mut session), latest, issued).is_empty());
        assert_eq!(session.current_word(), Some("cat"));
        assert_eq!(session.input(), "ca");
    }

    #[test]
    fn reveal_timer_without_session_is_a_no_op() {
        let ticket = RevealTicket::default();
        assert!(advance_after_reveal(None, ticket, ticket).is_empty());

        // Ticket current but nothing under evaluation.
        let mut session = PracticeSession::start(&cat_dog()).unwrap();
        assert!(advance_after_reveal(Some(&mut session), ticket, ticket).is_empty());
        assert_eq!(session.current_word(), Some("cat"));
    }

    #[test]
    fn voice_options_mark_the_selection() {
        let mut selector = VoiceSelector::default();
        selector.on_voices_changed(vec![Voice::new("A", "en-US"), Voice::new("B", "en-GB")]);
        let options = map_voice_options(&selector);
        assert_eq!(options.len(), 2);
        assert_eq!(options[0].label, "A (en-US)");
        assert!(!options[0].selected);
        assert!(options[1].selected);
    }
}
