//! Reminder CRUD and delivery state.

use super::{format_timestamp, parse_timestamp, Store};
use chrono::NaiveDateTime;
use nexis_core::error::NexisError;
use serde::Serialize;
use tracing::{debug, info};

/// A timed reminder. `notified` flips to true once, when it is delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reminder {
    pub id: i64,
    pub task: String,
    pub remind_at: NaiveDateTime,
    pub notified: bool,
}

type ReminderRow = (i64, String, String, i64);

fn into_reminder((id, task, remind_at, notified): ReminderRow) -> Result<Reminder, NexisError> {
    Ok(Reminder {
        id,
        task,
        remind_at: parse_timestamp(&remind_at)?,
        notified: notified != 0,
    })
}

impl Store {
    /// Schedule a reminder. It starts out not notified.
    pub async fn add_reminder(
        &self,
        task: &str,
        remind_at: NaiveDateTime,
    ) -> Result<Reminder, NexisError> {
        let task = task.trim();
        let stamp = format_timestamp(&remind_at);
        let result = sqlx::query("INSERT INTO reminders (task, remind_at) VALUES (?, ?)")
            .bind(task)
            .bind(&stamp)
            .execute(&self.pool)
            .await
            .map_err(|e| NexisError::Memory(format!("add reminder failed: {e}")))?;

        info!("reminder set: {task:?} at {stamp}");

        Ok(Reminder {
            id: result.last_insert_rowid(),
            task: task.to_string(),
            remind_at: parse_timestamp(&stamp)?,
            notified: false,
        })
    }

    /// Every reminder not yet delivered, soonest first.
    pub async fn list_pending_reminders(&self) -> Result<Vec<Reminder>, NexisError> {
        let rows: Vec<ReminderRow> = sqlx::query_as(
            "SELECT id, task, remind_at, notified FROM reminders \
             WHERE notified = 0 \
             ORDER BY remind_at ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| NexisError::Memory(format!("list pending reminders failed: {e}")))?;

        rows.into_iter().map(into_reminder).collect()
    }

    /// Reminders whose time has come (`remind_at <= now`) and that have not
    /// been delivered, soonest first.
    pub async fn list_due_reminders(
        &self,
        now: NaiveDateTime,
    ) -> Result<Vec<Reminder>, NexisError> {
        let rows: Vec<ReminderRow> = sqlx::query_as(
            "SELECT id, task, remind_at, notified FROM reminders \
             WHERE notified = 0 AND remind_at <= ? \
             ORDER BY remind_at ASC, id ASC",
        )
        .bind(format_timestamp(&now))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| NexisError::Memory(format!("list due reminders failed: {e}")))?;

        rows.into_iter().map(into_reminder).collect()
    }

    /// Fetch one reminder by id, delivered or not.
    pub async fn get_reminder(&self, id: i64) -> Result<Option<Reminder>, NexisError> {
        let row: Option<ReminderRow> =
            sqlx::query_as("SELECT id, task, remind_at, notified FROM reminders WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| NexisError::Memory(format!("get reminder failed: {e}")))?;

        row.map(into_reminder).transpose()
    }

    /// Mark a reminder delivered.
    ///
    /// Idempotent. Returns `true` only for the call that performed the
    /// transition, so concurrent pollers can use it as a claim.
    pub async fn mark_notified(&self, id: i64) -> Result<bool, NexisError> {
        let result = sqlx::query("UPDATE reminders SET notified = 1 WHERE id = ? AND notified = 0")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| NexisError::Memory(format!("mark notified failed: {e}")))?;

        let claimed = result.rows_affected() > 0;
        debug!("mark_notified({id}): claimed={claimed}");
        Ok(claimed)
    }
}
