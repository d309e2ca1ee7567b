//! Reminder delivery in the background.
//!
//! One tokio task polls the store on a fixed interval. Each due reminder is
//! claimed with `mark_notified` *before* it is spoken, so a reminder is
//! delivered at most once even if two pollers race or the speaker fails.
//! A speaker failure therefore drops that reminder; it is logged, not retried.

use nexis_core::traits::Speaker;
use nexis_memory::Store;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// How long `stop()` waits for an in-flight delivery before abandoning it.
const STOP_GRACE: Duration = Duration::from_secs(2);

/// Handle to the running scheduler task.
pub struct ReminderScheduler {
    shutdown_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl ReminderScheduler {
    /// Spawn the polling task. The first poll happens immediately.
    pub fn start(store: Store, speaker: Arc<dyn Speaker>, interval: Duration) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(poll_loop(store, speaker, interval, shutdown_rx));
        info!("reminder scheduler started (every {}s)", interval.as_secs());
        Self {
            shutdown_tx,
            handle,
        }
    }

    /// Signal the task and wait (briefly) for it to finish.
    pub async fn stop(self) {
        let _ = self.shutdown_tx.send(true);
        let mut handle = self.handle;
        match tokio::time::timeout(STOP_GRACE, &mut handle).await {
            Ok(Ok(())) => info!("reminder scheduler stopped"),
            Ok(Err(e)) => warn!("reminder scheduler task ended abnormally: {e}"),
            Err(_) => {
                warn!("reminder scheduler did not stop in time; aborting");
                handle.abort();
            }
        }
    }
}

async fn poll_loop(
    store: Store,
    speaker: Arc<dyn Speaker>,
    interval: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    loop {
        if *shutdown_rx.borrow() {
            break;
        }

        deliver_due(&store, speaker.as_ref(), chrono::Local::now().naive_local()).await;

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = shutdown_rx.changed() => {}
        }
    }
}

/// One polling cycle: claim and speak every reminder due at `now`.
///
/// Returns how many reminders were delivered.
pub(crate) async fn deliver_due(
    store: &Store,
    speaker: &dyn Speaker,
    now: chrono::NaiveDateTime,
) -> usize {
    let due = match store.list_due_reminders(now).await {
        Ok(due) => due,
        Err(e) => {
            error!("scheduler: listing due reminders failed: {e}");
            return 0;
        }
    };

    let mut delivered = 0;
    for reminder in due {
        match store.mark_notified(reminder.id).await {
            Ok(true) => {}
            Ok(false) => continue,
            Err(e) => {
                warn!("scheduler: could not claim reminder {}: {e}", reminder.id);
                continue;
            }
        }

        info!("scheduler: delivering reminder {}: {}", reminder.id, reminder.task);
        if let Err(e) = speaker.speak(&format!("Reminder: {}", reminder.task)).await {
            error!("scheduler: failed to speak reminder {}: {e}", reminder.id);
            continue;
        }
        delivered += 1;
    }
    delivered
}
