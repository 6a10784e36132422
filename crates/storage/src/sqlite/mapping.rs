use spell_core::model::{ChildId, ChildProfile, Email, ProgressEntry, Role, WordList};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

pub(crate) fn child_id_to_i64(id: ChildId) -> Result<i64, StorageError> {
    i64::try_from(id.value()).map_err(|_| StorageError::Serialization("child_id overflow".into()))
}

pub(crate) fn child_id_from_i64(v: i64) -> Result<ChildId, StorageError> {
    u64::try_from(v)
        .map(ChildId::new)
        .map_err(|_| StorageError::Serialization("child_id sign overflow".into()))
}

/// Word lists are stored whole as a JSON document in `children.word_list`.
pub(crate) fn word_list_to_json(list: &WordList) -> Result<String, StorageError> {
    serde_json::to_string(list).map_err(ser)
}

pub(crate) fn word_list_from_json(raw: Option<String>) -> Result<Option<WordList>, StorageError> {
    raw.map(|json| serde_json::from_str::<WordList>(&json).map_err(ser))
        .transpose()
}

pub(crate) fn role_from_str(raw: &str) -> Result<Role, StorageError> {
    raw.parse::<Role>().map_err(ser)
}

pub(crate) fn email_from_str(raw: &str) -> Result<Email, StorageError> {
    Email::parse(raw).map_err(ser)
}

/// Map a `children` row (`id`, `name`, `word_list`) with an empty progress log.
pub(crate) fn map_child_row(row: &SqliteRow) -> Result<ChildProfile, StorageError> {
    let id = child_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?;
    let mut child = ChildProfile::new(id, row.try_get::<String, _>("name").map_err(ser)?);
    child.word_list = word_list_from_json(row.try_get("word_list").map_err(ser)?)?;
    Ok(child)
}

/// Map a `progress_entries` row (`word`, `correct`, `recorded_at`).
pub(crate) fn map_progress_row(row: &SqliteRow) -> Result<ProgressEntry, StorageError> {
    let correct: i64 = row.try_get("correct").map_err(ser)?;
    Ok(ProgressEntry {
        word: row.try_get("word").map_err(ser)?,
        correct: correct != 0,
        timestamp: row.try_get("recorded_at").map_err(ser)?,
    })
}
