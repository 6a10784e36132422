use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use spell_core::model::{ChildId, ChildProfile, ProgressEntry, WordList};
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{
    child_id_from_i64, child_id_to_i64, conn, map_child_row, map_progress_row, ser,
    word_list_to_json,
};
use crate::feed::{ChildListener, ChildSubscription};
use crate::repository::{ChildRepository, StorageError};

impl SqliteRepository {
    async fn load_child(&self, id: ChildId) -> Result<Option<ChildProfile>, StorageError> {
        let raw_id = child_id_to_i64(id)?;
        let row = sqlx::query("SELECT id, name, word_list FROM children WHERE id = ?1")
            .bind(raw_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;
        let Some(row) = row else {
            return Ok(None);
        };
        let mut child = map_child_row(&row)?;

        let rows = sqlx::query(
            r"
            SELECT word, correct, recorded_at
            FROM progress_entries
            WHERE child_id = ?1
            ORDER BY id ASC
            ",
        )
        .bind(raw_id)
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;
        child.progress = rows
            .iter()
            .map(map_progress_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Some(child))
    }

    /// Re-read a child after a committed write and push it to subscribers.
    ///
    /// The write already stands, so a failed re-read is logged and never
    /// reported to the caller as a failed write.
    async fn publish_child(&self, id: ChildId) {
        match self.load_child(id).await {
            Ok(Some(child)) => self.feed.publish(&child),
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(child_id = %id, error = %err, "child written but snapshot not published");
            }
        }
    }
}

#[async_trait::async_trait]
impl ChildRepository for SqliteRepository {
    async fn create_child(&self, name: &str) -> Result<ChildId, StorageError> {
        let res = sqlx::query("INSERT INTO children (name, created_at) VALUES (?1, ?2)")
            .bind(name)
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(conn)?;
        child_id_from_i64(res.last_insert_rowid())
    }

    async fn get_child(&self, id: ChildId) -> Result<Option<ChildProfile>, StorageError> {
        self.load_child(id).await
    }

    async fn list_children(&self) -> Result<Vec<ChildProfile>, StorageError> {
        let rows = sqlx::query("SELECT id, name, word_list FROM children ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(conn)?;
        let mut children = BTreeMap::new();
        for row in &rows {
            let child = map_child_row(row)?;
            children.insert(child.id, child);
        }

        let progress_rows = sqlx::query(
            r"
            SELECT child_id, word, correct, recorded_at
            FROM progress_entries
            ORDER BY child_id ASC, id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;
        for row in &progress_rows {
            let child_id = child_id_from_i64(row.try_get::<i64, _>("child_id").map_err(ser)?)?;
            if let Some(child) = children.get_mut(&child_id) {
                child.progress.push(map_progress_row(row)?);
            }
        }

        Ok(children.into_values().collect())
    }

    async fn find_child_by_name(&self, name: &str) -> Result<Option<ChildProfile>, StorageError> {
        // Names are compared with Unicode case folding, which SQLite's lower() lacks.
        let rows = sqlx::query("SELECT id, name, word_list FROM children ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(conn)?;
        for row in &rows {
            let child = map_child_row(row)?;
            if child.answers_to(name) {
                return self.load_child(child.id).await;
            }
        }
        Ok(None)
    }

    async fn set_word_list(&self, id: ChildId, list: &WordList) -> Result<(), StorageError> {
        let raw_id = child_id_to_i64(id)?;
        let json = word_list_to_json(list)?;

        let mut tx = self.pool.begin().await.map_err(conn)?;
        let res = sqlx::query("UPDATE children SET word_list = ?1 WHERE id = ?2")
            .bind(json)
            .bind(raw_id)
            .execute(&mut *tx)
            .await
            .map_err(conn)?;
        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        sqlx::query("DELETE FROM progress_entries WHERE child_id = ?1")
            .bind(raw_id)
            .execute(&mut *tx)
            .await
            .map_err(conn)?;
        tx.commit().await.map_err(conn)?;

        tracing::debug!(child_id = %id, list = list.name(), words = list.len(), "word list replaced");
        self.publish_child(id).await;
        Ok(())
    }

    async fn append_progress(
        &self,
        id: ChildId,
        entry: &ProgressEntry,
    ) -> Result<(), StorageError> {
        let raw_id = child_id_to_i64(id)?;
        let res = sqlx::query(
            r"
            INSERT INTO progress_entries (child_id, word, correct, recorded_at)
            SELECT ?1, ?2, ?3, ?4
            WHERE EXISTS (SELECT 1 FROM children WHERE id = ?1)
            ",
        )
        .bind(raw_id)
        .bind(entry.word.as_str())
        .bind(i64::from(entry.correct))
        .bind(entry.timestamp)
        .execute(&self.pool)
        .await
        .map_err(conn)?;
        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        self.publish_child(id).await;
        Ok(())
    }

    async fn subscribe_child(
        &self,
        id: ChildId,
        listener: ChildListener,
    ) -> Result<ChildSubscription, StorageError> {
        let snapshot = self.load_child(id).await?.ok_or(StorageError::NotFound)?;
        let subscription = self.feed.register(id, Arc::clone(&listener));
        listener(&snapshot);
        Ok(subscription)
    }
}
