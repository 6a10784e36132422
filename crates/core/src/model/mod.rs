mod account;
mod child;
mod ids;
mod progress;
mod word_list;

pub use account::{AccountError, Email, Role};
pub use child::ChildProfile;
pub use ids::{ChildId, ParseIdError};
pub use progress::{ProgressEntry, ProgressTally};
pub use word_list::{WordList, WordListError};
