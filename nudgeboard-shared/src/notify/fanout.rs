/// Notification fan-out
///
/// Task events (assignment, completion, nudge) produce one notification
/// per assigned worker. Each insert is attempted independently; failures
/// are logged with `tracing::warn!` and tallied in the returned
/// [`FanoutReport`] instead of aborting the loop, so one bad recipient
/// never blocks the rest.

use sqlx::SqlitePool;
use tracing::warn;

use crate::models::notification::{CreateNotification, Notification, NotificationKind};
use crate::models::task::Task;

/// Per-event delivery tally
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FanoutReport {
    /// Notifications written
    pub delivered: usize,

    /// Inserts that failed (logged, not fatal)
    pub failed: usize,
}

/// Writes one notification of `kind` with `message` to every recipient
pub async fn notify_workers(
    pool: &SqlitePool,
    task_id: i64,
    kind: NotificationKind,
    message: &str,
    recipients: &[i64],
) -> FanoutReport {
    let mut report = FanoutReport::default();

    for &user_id in recipients {
        let result = Notification::create(
            pool,
            CreateNotification {
                user_id,
                task_id,
                kind,
                message: message.to_string(),
            },
        )
        .await;

        match result {
            Ok(_) => report.delivered += 1,
            Err(e) => {
                report.failed += 1;
                warn!(
                    task_id,
                    user_id,
                    kind = kind.as_str(),
                    error = %e,
                    "Failed to write notification"
                );
            }
        }
    }

    report
}

/// Fans out assignment notifications for a freshly created task
pub async fn task_assigned(pool: &SqlitePool, task: &Task, recipients: &[i64]) -> FanoutReport {
    let message = format!("New task assigned: {}", task.title);
    notify_workers(pool, task.id, NotificationKind::TaskAssigned, &message, recipients).await
}

/// Fans out completion notifications to a task's workers
pub async fn task_completed(pool: &SqlitePool, task: &Task, recipients: &[i64]) -> FanoutReport {
    let message = format!("Task completed: {}", task.title);
    notify_workers(pool, task.id, NotificationKind::TaskCompleted, &message, recipients).await
}

/// Fans out a nudge to a task's workers
pub async fn nudge(pool: &SqlitePool, task: &Task, recipients: &[i64]) -> FanoutReport {
    let message = format!("Progress nudge: {}", task.title);
    notify_workers(pool, task.id, NotificationKind::Nudge, &message, recipients).await
}
