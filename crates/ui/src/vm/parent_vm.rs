use services::ChildOverview;
use spell_core::model::{ChildId, ProgressEntry};

use super::time_fmt::format_attempt_time;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProgressRowVm {
    pub word: String,
    pub result_label: &'static str,
    pub result_class: &'static str,
    pub time_label: String,
}

impl From<&ProgressEntry> for ProgressRowVm {
    fn from(entry: &ProgressEntry) -> Self {
        let (result_label, result_class) = if entry.correct {
            ("✅ Correct", "result-correct")
        } else {
            ("❌ Incorrect", "result-wrong")
        };
        Self {
            word: entry.word.clone(),
            result_label,
            result_class,
            time_label: format_attempt_time(entry.timestamp),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChildCardVm {
    pub id: ChildId,
    pub name: String,
    /// `None` until a list is assigned.
    pub list_label: Option<String>,
    pub words_label: Option<String>,
    pub tally_label: Option<String>,
    pub progress: Vec<ProgressRowVm>,
}

#[must_use]
pub fn map_child_card(overview: &ChildOverview) -> ChildCardVm {
    let tally = overview.tally;
    let tally_label = (tally.attempts > 0)
        .then(|| format!("{} of {} correct", tally.correct, tally.attempts));
    ChildCardVm {
        id: overview.id,
        name: overview.name.clone(),
        list_label: overview
            .word_list
            .as_ref()
            .map(|list| format!("Current List: {}", list.name())),
        words_label: overview
            .word_list
            .as_ref()
            .map(|list| format!("Words: {}", list.joined())),
        tally_label,
        progress: overview.progress.iter().map(ProgressRowVm::from).collect(),
    }
}
