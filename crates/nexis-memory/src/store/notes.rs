//! Notes: facts the user asked to remember.

use super::{format_timestamp, parse_timestamp, Store};
use chrono::NaiveDateTime;
use nexis_core::error::NexisError;
use serde::Serialize;
use tracing::info;

/// A remembered fact. Immutable once saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Note {
    pub id: i64,
    pub content: String,
    pub saved_at: NaiveDateTime,
}

impl Store {
    /// Save a note stamped with the current local time.
    pub async fn save_note(&self, content: &str) -> Result<Note, NexisError> {
        self.save_note_at(content, chrono::Local::now().naive_local())
            .await
    }

    /// Save a note with an explicit timestamp.
    pub async fn save_note_at(
        &self,
        content: &str,
        saved_at: NaiveDateTime,
    ) -> Result<Note, NexisError> {
        let content = content.trim();
        // Stored at second precision; return what a later read would see.
        let stamp = format_timestamp(&saved_at);
        let result = sqlx::query("INSERT INTO memories (content, saved_at) VALUES (?, ?)")
            .bind(content)
            .bind(&stamp)
            .execute(&self.pool)
            .await
            .map_err(|e| NexisError::Memory(format!("save note failed: {e}")))?;

        info!("note saved: {content:?}");

        Ok(Note {
            id: result.last_insert_rowid(),
            content: content.to_string(),
            saved_at: parse_timestamp(&stamp)?,
        })
    }

    /// All notes, newest first.
    pub async fn list_notes(&self) -> Result<Vec<Note>, NexisError> {
        let rows: Vec<(i64, String, String)> =
            sqlx::query_as("SELECT id, content, saved_at FROM memories ORDER BY id DESC")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| NexisError::Memory(format!("list notes failed: {e}")))?;

        rows.into_iter()
            .map(|(id, content, saved_at)| {
                Ok(Note {
                    id,
                    content,
                    saved_at: parse_timestamp(&saved_at)?,
                })
            })
            .collect()
    }

    /// Delete every note. Reminders are not touched. Returns the number removed.
    pub async fn clear_notes(&self) -> Result<u64, NexisError> {
        let result = sqlx::query("DELETE FROM memories")
            .execute(&self.pool)
            .await
            .map_err(|e| NexisError::Memory(format!("clear notes failed: {e}")))?;

        info!("cleared {} notes", result.rows_affected());
        Ok(result.rows_affected())
    }
}
