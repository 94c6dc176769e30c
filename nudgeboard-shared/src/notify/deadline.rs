/// Deadline reminder sweep
///
/// Scans in-progress tasks and reminds assigned workers as the deadline
/// approaches: five, three, and one day ahead ("D-5: <title>") and on the
/// day itself ("Due today: <title>"). The sweep runs periodically from a
/// background job, so each (task, worker) pair is reminded at most once
/// per day regardless of how often the sweep fires.

use chrono::{NaiveDate, TimeZone, Utc};
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::models::notification::{CreateNotification, Notification, NotificationKind};
use crate::models::task::Task;
use crate::models::task_worker::TaskWorker;

/// Days ahead of the deadline on which a reminder is sent
pub const REMINDER_OFFSETS: [i64; 3] = [5, 3, 1];

/// Outcome of one sweep run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// In-progress tasks examined
    pub examined: usize,

    /// Reminders written
    pub emitted: usize,

    /// Reminders skipped because one already exists for today
    pub skipped: usize,

    /// Inserts that failed (logged, not fatal)
    pub failed: usize,
}

/// Builds the reminder message for a task due in `days_left` days
///
/// Returns `None` when no reminder is due at that distance.
pub fn reminder_message(title: &str, days_left: i64) -> Option<String> {
    if days_left == 0 {
        Some(format!("Due today: {}", title))
    } else if REMINDER_OFFSETS.contains(&days_left) {
        Some(format!("D-{}: {}", days_left, title))
    } else {
        None
    }
}

/// Runs one deadline sweep as of `today`
///
/// # Errors
///
/// Returns an error only when the task or worker listing fails; individual
/// notification inserts are best-effort and tallied in the report.
pub async fn run_sweep(pool: &SqlitePool, today: NaiveDate) -> Result<SweepReport, sqlx::Error> {
    let mut report = SweepReport::default();

    let tasks = Task::list_in_progress(pool).await?;
    report.examined = tasks.len();

    for task in &tasks {
        let days_left = task.deadline_date.signed_duration_since(today).num_days();
        let message = match reminder_message(&task.title, days_left) {
            Some(m) => m,
            None => continue,
        };

        let workers = TaskWorker::worker_ids(pool, task.id).await?;

        for worker_id in workers {
            match already_reminded_today(pool, task.id, worker_id, today).await {
                Ok(true) => {
                    report.skipped += 1;
                    continue;
                }
                Ok(false) => {}
                Err(e) => {
                    report.failed += 1;
                    warn!(task_id = task.id, worker_id, error = %e, "Reminder lookup failed");
                    continue;
                }
            }

            let result = Notification::create(
                pool,
                CreateNotification {
                    user_id: worker_id,
                    task_id: task.id,
                    kind: NotificationKind::Deadline,
                    message: message.clone(),
                },
            )
            .await;

            match result {
                Ok(_) => report.emitted += 1,
                Err(e) => {
                    report.failed += 1;
                    warn!(task_id = task.id, worker_id, error = %e, "Failed to write reminder");
                }
            }
        }
    }

    if report.emitted > 0 || report.failed > 0 {
        info!(
            examined = report.examined,
            emitted = report.emitted,
            skipped = report.skipped,
            failed = report.failed,
            "Deadline sweep finished"
        );
    }

    Ok(report)
}

/// Checks whether a deadline reminder for this task/worker was already
/// written today
async fn already_reminded_today(
    pool: &SqlitePool,
    task_id: i64,
    worker_id: i64,
    today: NaiveDate,
) -> Result<bool, sqlx::Error> {
    let midnight = Utc.from_utc_datetime(&today.and_time(chrono::NaiveTime::MIN));

    let (count,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM notifications \
         WHERE task_id = ? AND user_id = ? AND kind = 'deadline' AND created_at >= ?",
    )
    .bind(task_id)
    .bind(worker_id)
    .bind(midnight)
    .fetch_one(pool)
    .await?;

    Ok(count > 0)
}
