//! Practice-session state machine.
//!
//! A session walks a child through one word list. Every transition returns
//! the side effects it wants performed (persist an attempt, speak a word,
//! play a celebration) instead of performing them, so the machine has no
//! I/O and the caller decides how effects are executed.

use chrono::{DateTime, Utc};
use std::fmt;
use thiserror::Error;

use crate::model::{ChildProfile, ProgressEntry, WordList};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no word list assigned")]
    NoWordList,

    #[error("word list is empty")]
    EmptyWordList,

    #[error("{op} is not allowed while {phase}")]
    InvalidTransition { op: &'static str, phase: SessionPhase },
}

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Waiting for input on word `i`.
    Presenting(usize),
    /// Word `i` was submitted; the outcome is on screen until `advance`.
    Evaluating(usize),
    /// Every word was attempted.
    Complete,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionPhase::Presenting(i) => write!(f, "presenting word {i}"),
            SessionPhase::Evaluating(i) => write!(f, "evaluating word {i}"),
            SessionPhase::Complete => f.write_str("complete"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Incorrect,
}

impl Outcome {
    #[must_use]
    pub fn is_correct(self) -> bool {
        matches!(self, Outcome::Correct)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Celebration {
    /// Short burst after a correct answer.
    Star,
    /// Played once when the last word has been attempted.
    Completion,
}

/// Work requested by a transition, executed by an adapter outside the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEffect {
    Persist(ProgressEntry),
    Speak(String),
    Celebrate(Celebration),
}

/// Snapshot of the observable session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub current_index: usize,
    pub input_text: String,
    pub last_outcome: Option<Outcome>,
    pub completed: bool,
}

/// Word comparison used by `submit`: surrounding whitespace and letter case
/// are ignored, everything else must match exactly.
#[must_use]
pub fn answers_match(input: &str, target: &str) -> bool {
    input.trim().to_lowercase() == target.trim().to_lowercase()
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PracticeSession {
    list: WordList,
    phase: SessionPhase,
    current_index: usize,
    input: String,
    last_outcome: Option<Outcome>,
}

impl PracticeSession {
    /// Begin drilling `list` from its first word.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyWordList` if the list has no words.
    pub fn start(list: &WordList) -> Result<Self, SessionError> {
        if list.is_empty() {
            return Err(SessionError::EmptyWordList);
        }
        Ok(Self {
            list: list.clone(),
            phase: SessionPhase::Presenting(0),
            current_index: 0,
            input: String::new(),
            last_outcome: None,
        })
    }

    /// Begin drilling the list assigned to `child`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoWordList` when the child has no list yet.
    pub fn start_for(child: &ChildProfile) -> Result<Self, SessionError> {
        let list = child.word_list.as_ref().ok_or(SessionError::NoWordList)?;
        Self::start(list)
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn word_list(&self) -> &WordList {
        &self.list
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// The word being drilled, or `None` once complete.
    #[must_use]
    pub fn current_word(&self) -> Option<&str> {
        match self.phase {
            SessionPhase::Presenting(i) | SessionPhase::Evaluating(i) => self.list.word(i),
            SessionPhase::Complete => None,
        }
    }

    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    #[must_use]
    pub fn last_outcome(&self) -> Option<Outcome> {
        self.last_outcome
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self.phase, SessionPhase::Complete)
    }

    #[must_use]
    pub fn accepts_input(&self) -> bool {
        matches!(self.phase, SessionPhase::Presenting(_))
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        SessionState {
            current_index: self.current_index,
            input_text: self.input.clone(),
            last_outcome: self.last_outcome,
            completed: self.is_complete(),
        }
    }

    /// Replace the pending answer.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` unless a word is being presented.
    pub fn set_input(&mut self, text: impl Into<String>) -> Result<(), SessionError> {
        self.presenting("set_input")?;
        self.input = text.into();
        Ok(())
    }

    /// Ask for the current word to be spoken.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` unless a word is being presented.
    pub fn speak(&self) -> Result<Vec<SessionEffect>, SessionError> {
        let index = self.presenting("speak")?;
        Ok(self
            .list
            .word(index)
            .map(|word| SessionEffect::Speak(word.to_string()))
            .into_iter()
            .collect())
    }

    /// Check the pending answer against the current word.
    ///
    /// Emits exactly one `Persist` effect for the word at submission time,
    /// plus a star celebration when correct.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` while evaluating or complete;
    /// the state is left untouched and nothing is emitted.
    pub fn submit(&mut self, now: DateTime<Utc>) -> Result<Vec<SessionEffect>, SessionError> {
        let index = self.presenting("submit")?;
        let word = self.list.word(index).unwrap_or_default().to_string();
        let correct = answers_match(&self.input, &word);

        self.last_outcome = Some(if correct {
            Outcome::Correct
        } else {
            Outcome::Incorrect
        });
        self.phase = SessionPhase::Evaluating(index);

        let mut effects = vec![SessionEffect::Persist(ProgressEntry::new(word, correct, now))];
        if correct {
            effects.push(SessionEffect::Celebrate(Celebration::Star));
        }
        Ok(effects)
    }

    /// Leave the reveal step: move to the next word, or finish.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` unless an answer is being evaluated.
    pub fn advance(&mut self) -> Result<Vec<SessionEffect>, SessionError> {
        let SessionPhase::Evaluating(index) = self.phase else {
            return Err(self.invalid("advance"));
        };

        self.input.clear();
        self.last_outcome = None;

        let next = index + 1;
        if next < self.list.len() {
            self.current_index = next;
            self.phase = SessionPhase::Presenting(next);
            Ok(Vec::new())
        } else {
            self.phase = SessionPhase::Complete;
            Ok(vec![SessionEffect::Celebrate(Celebration::Completion)])
        }
    }

    /// Go back to the first word. Allowed from any state.
    pub fn restart(&mut self) {
        self.current_index = 0;
        self.phase = SessionPhase::Presenting(0);
        self.input.clear();
        self.last_outcome = None;
    }

    /// Apply a list from a fresh child snapshot.
    ///
    /// Returns `true` when the list changed and the session was restarted on it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyWordList` if the new list has no words;
    /// the current session is kept in that case.
    pub fn sync_word_list(&mut self, list: &WordList) -> Result<bool, SessionError> {
        if *list == self.list {
            return Ok(false);
        }
        *self = Self::start(list)?;
        Ok(true)
    }

    fn presenting(&self, op: &'static str) -> Result<usize, SessionError> {
        match self.phase {
            SessionPhase::Presenting(i) => Ok(i),
            _ => Err(self.invalid(op)),
        }
    }

    fn invalid(&self, op: &'static str) -> SessionError {
        SessionError::InvalidTransition {
            op,
            phase: self.phase,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ChildId;
    use crate::time::fixed_now;

    fn list(words: &[&str]) -> WordList {
        WordList::new("Week 1", words.iter().map(ToString::to_string).collect()).unwrap()
    }

    fn persisted(effects: &[SessionEffect]) -> Vec<&ProgressEntry> {
        effects
            .iter()
            .filter_map(|e| match e {
                SessionEffect::Persist(entry) => Some(entry),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn start_presents_first_word_with_clean_state() {
        let session = PracticeSession::start(&list(&["cat", "dog"])).unwrap();
        assert_eq!(session.phase(), SessionPhase::Presenting(0));
        assert_eq!(session.current_word(), Some("cat"));
        assert_eq!(
            session.state(),
            SessionState {
                current_index: 0,
                input_text: String::new(),
                last_outcome: None,
                completed: false,
            }
        );
    }

    #[test]
    fn start_for_child_without_list_is_refused() {
        let child = ChildProfile::new(ChildId::new(1), "Maya");
        assert_eq!(
            PracticeSession::start_for(&child),
            Err(SessionError::NoWordList)
        );
    }

    #[test]
    fn matching_ignores_case_and_outer_whitespace_only() {
        assert!(answers_match(" Cat ", "cat"));
        assert!(answers_match("CAT", " cat"));
        assert!(!answers_match("Cats", "cat"));
        assert!(!answers_match("ice cream", "icecream"));
        assert!(!answers_match("dont", "don't"));
    }

    #[test]
    fn end_to_end_two_words() {
        let now = fixed_now();
        let mut session = PracticeSession::start(&list(&["cat", "dog"])).unwrap();

        session.set_input("cat").unwrap();
        let effects = session.submit(now).unwrap();
        assert_eq!(session.last_outcome(), Some(Outcome::Correct));
        assert_eq!(session.phase(), SessionPhase::Evaluating(0));
        assert_eq!(
            effects,
            vec![
                SessionEffect::Persist(ProgressEntry::new("cat", true, now)),
                SessionEffect::Celebrate(Celebration::Star),
            ]
        );

        assert!(session.advance().unwrap().is_empty());
        assert_eq!(session.phase(), SessionPhase::Presenting(1));
        assert_eq!(session.input(), "");
        assert_eq!(session.last_outcome(), None);

        session.set_input("fox").unwrap();
        let effects = session.submit(now).unwrap();
        assert_eq!(session.last_outcome(), Some(Outcome::Incorrect));
        assert_eq!(
            effects,
            vec![SessionEffect::Persist(ProgressEntry::new("dog", false, now))]
        );
        assert_eq!(session.phase(), SessionPhase::Evaluating(1));

        let effects = session.advance().unwrap();
        assert_eq!(session.phase(), SessionPhase::Complete);
        assert_eq!(
            effects,
            vec![SessionEffect::Celebrate(Celebration::Completion)]
        );
        assert!(session.state().completed);
        assert_eq!(session.current_index(), 1);
        assert!(session.advance().is_err());
    }

    #[test]
    fn completes_after_exactly_one_submission_per_word() {
        for len in 1..=6 {
            let words: Vec<String> = (0..len).map(|i| format!("word{i}")).collect();
            let list = WordList::new("L", words).unwrap();
            let mut session = PracticeSession::start(&list).unwrap();
            let mut submissions = 0;
            let mut completions = 0;
            while !session.is_complete() {
                if submissions % 2 == 0 {
                    let word = session.current_word().unwrap().to_string();
                    session.set_input(word).unwrap();
                }
                session.submit(fixed_now()).unwrap();
                submissions += 1;
                completions += session
                    .advance()
                    .unwrap()
                    .iter()
                    .filter(|e| **e == SessionEffect::Celebrate(Celebration::Completion))
                    .count();
            }
            assert_eq!(submissions, len);
            assert_eq!(completions, 1);
        }
    }

    #[test]
    fn double_submit_is_rejected_without_side_effects() {
        let mut session = PracticeSession::start(&list(&["cat", "dog"])).unwrap();
        session.set_input("cat").unwrap();
        let first = session.submit(fixed_now()).unwrap();
        assert_eq!(persisted(&first).len(), 1);

        let before = session.clone();
        let err = session.submit(fixed_now()).unwrap_err();
        assert_eq!(
            err,
            SessionError::InvalidTransition {
                op: "submit",
                phase: SessionPhase::Evaluating(0)
            }
        );
        assert_eq!(session, before);
        assert!(session.set_input("other").is_err());
        assert_eq!(session.input(), "cat");
    }

    #[test]
    fn submit_after_completion_is_rejected() {
        let mut session = PracticeSession::start(&list(&["cat"])).unwrap();
        session.submit(fixed_now()).unwrap();
        session.advance().unwrap();
        let before = session.clone();
        assert!(session.submit(fixed_now()).is_err());
        assert!(session.speak().is_err());
        assert_eq!(session, before);
    }

    #[test]
    fn entry_records_word_at_submission_time() {
        let mut session = PracticeSession::start(&list(&["alpha", "beta", "gamma"])).unwrap();
        session.submit(fixed_now()).unwrap();
        session.advance().unwrap();
        session.set_input("BETA").unwrap();
        let effects = session.submit(fixed_now()).unwrap();
        let entries = persisted(&effects);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].word, "beta");
        assert!(entries[0].correct);
    }

    #[test]
    fn restart_from_complete_returns_to_first_word() {
        let mut session = PracticeSession::start(&list(&["cat", "dog", "emu"])).unwrap();
        while !session.is_complete() {
            session.set_input("zzz").unwrap();
            session.submit(fixed_now()).unwrap();
            session.advance().unwrap();
        }
        session.restart();
        assert_eq!(session.phase(), SessionPhase::Presenting(0));
        assert_eq!(session.input(), "");
        assert_eq!(session.last_outcome(), None);
        assert_eq!(session.current_word(), Some("cat"));
    }

    #[test]
    fn restart_mid_evaluation_aborts() {
        let mut session = PracticeSession::start(&list(&["cat", "dog"])).unwrap();
        session.set_input("cat").unwrap();
        session.submit(fixed_now()).unwrap();
        session.restart();
        assert_eq!(session.phase(), SessionPhase::Presenting(0));
        assert!(session.advance().is_err());
    }

    #[test]
    fn speak_emits_current_word() {
        let mut session = PracticeSession::start(&list(&["cat", "dog"])).unwrap();
        assert_eq!(
            session.speak().unwrap(),
            vec![SessionEffect::Speak("cat".into())]
        );
        session.submit(fixed_now()).unwrap();
        assert!(session.speak().is_err());
    }

    #[test]
    fn sync_restarts_only_when_list_changes() {
        let mut session = PracticeSession::start(&list(&["cat", "dog"])).unwrap();
        session.submit(fixed_now()).unwrap();
        session.advance().unwrap();

        assert!(!session.sync_word_list(&list(&["cat", "dog"])).unwrap());
        assert_eq!(session.current_index(), 1);

        assert!(session.sync_word_list(&list(&["emu"])).unwrap());
        assert_eq!(session.phase(), SessionPhase::Presenting(0));
        assert_eq!(session.current_word(), Some("emu"));
    }
}
