use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One attempt at one word. Entries are appended and never edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEntry {
    pub word: String,
    pub correct: bool,
    pub timestamp: DateTime<Utc>,
}

impl ProgressEntry {
    #[must_use]
    pub fn new(word: impl Into<String>, correct: bool, timestamp: DateTime<Utc>) -> Self {
        Self {
            word: word.into(),
            correct,
            timestamp,
        }
    }
}

/// Counts over a progress log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressTally {
    pub attempts: u32,
    pub correct: u32,
    pub incorrect: u32,
}

impl ProgressTally {
    #[must_use]
    pub fn from_entries(entries: &[ProgressEntry]) -> Self {
        entries.iter().fold(Self::default(), |mut tally, entry| {
            tally.attempts = tally.attempts.saturating_add(1);
            if entry.correct {
                tally.correct = tally.correct.saturating_add(1);
            } else {
                tally.incorrect = tally.incorrect.saturating_add(1);
            }
            tally
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn tally_counts_outcomes() {
        let now = fixed_now();
        let entries = vec![
            ProgressEntry::new("cat", true, now),
            ProgressEntry::new("dog", false, now),
            ProgressEntry::new("dog", true, now),
        ];
        let tally = ProgressTally::from_entries(&entries);
        assert_eq!(
            tally,
            ProgressTally {
                attempts: 3,
                correct: 2,
                incorrect: 1
            }
        );
    }
}
