/// Task model and lifecycle operations
///
/// Tasks are the core entity of the system. A task starts in `in_progress`
/// and moves to `completed` when a user completes it; completing records
/// who completed it and when. Workers are assigned through the
/// `task_workers` join table (see [`crate::models::task_worker`]).
///
/// # Lifecycle
///
/// ```text
/// in_progress → completed
/// ```
///
/// Completing an already-completed task succeeds again and overwrites the
/// completer and completion date. Rejecting the second completion is a
/// pending product decision; until then the overwrite stands.
///
/// # Consistency
///
/// Multi-step writes (task + worker links, full-replace updates, deletes
/// with their dependent rows) run inside a single transaction. Notification
/// fan-out happens after commit and is best-effort, so a fan-out failure
/// never rolls back a task mutation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::models::task_worker::{TaskWorker, WorkerRef};

/// Task priority level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Converts priority to its storage string
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    /// Parses a priority from its storage string
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "high" => Some(Priority::High),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }
}

/// Task completion status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    InProgress,
    Completed,
}

impl TaskStatus {
    /// Converts status to its storage string
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
        }
    }

    /// Parses a status from its storage string
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "in_progress" => Some(TaskStatus::InProgress),
            "completed" => Some(TaskStatus::Completed),
            _ => None,
        }
    }
}

/// Task row as stored
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: i64,

    /// Task title
    pub title: String,

    /// Free-form description, empty string when not provided
    pub description: String,

    /// Priority ("high", "medium", "low")
    pub priority: String,

    /// Status ("in_progress", "completed")
    pub status: String,

    /// User who created the task
    pub creator_id: i64,

    /// User who completed the task (null while in progress)
    pub completer_id: Option<i64>,

    /// Date the task was created
    pub created_date: NaiveDate,

    /// Date the task is due
    pub deadline_date: NaiveDate,

    /// Date the task was completed (null while in progress)
    pub completed_date: Option<NaiveDate>,
}

/// Task joined with creator/completer names and its worker list
///
/// This is the shape the API returns for task listings and detail lookups.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct TaskDetails {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub priority: String,
    pub status: String,
    pub creator_id: i64,
    pub completer_id: Option<i64>,
    pub created_date: NaiveDate,
    pub deadline_date: NaiveDate,
    pub completed_date: Option<NaiveDate>,

    /// Display name of the creator (null if the user vanished)
    pub creator_name: Option<String>,

    /// Display name of the completer (null while in progress)
    pub completer_name: Option<String>,

    /// Assigned workers
    #[sqlx(skip)]
    pub workers: Vec<WorkerRef>,
}

/// Input for creating a new task
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub deadline_date: NaiveDate,
    pub creator_id: i64,
}

/// Input for updating a task
///
/// Updates are full replacements of the mutable fields. `status` is only
/// changed when present.
#[derive(Debug, Clone)]
pub struct UpdateTask {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub deadline_date: NaiveDate,
    pub status: Option<TaskStatus>,
}

const TASK_COLUMNS: &str = "id, title, description, priority, status, creator_id, \
                            completer_id, created_date, deadline_date, completed_date";

const DETAILS_SELECT: &str = "SELECT t.id, t.title, t.description, t.priority, t.status, \
     t.creator_id, t.completer_id, t.created_date, t.deadline_date, t.completed_date, \
     cu.name AS creator_name, xu.name AS completer_name \
     FROM tasks t \
     LEFT JOIN users cu ON cu.id = t.creator_id \
     LEFT JOIN users xu ON xu.id = t.completer_id";

impl Task {
    /// Creates a task with its worker links in one transaction
    ///
    /// Worker IDs are deduplicated; one link row is written per distinct
    /// worker. Returns the task and the deduplicated worker list so the
    /// caller can fan out assignment notifications after commit.
    ///
    /// # Errors
    ///
    /// Returns an error if any statement in the transaction fails; the
    /// whole write is rolled back in that case.
    pub async fn create(
        pool: &SqlitePool,
        data: CreateTask,
        worker_ids: &[i64],
        today: NaiveDate,
    ) -> Result<(Self, Vec<i64>), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let task = sqlx::query_as::<_, Task>(&format!(
            "INSERT INTO tasks (title, description, priority, status, creator_id, created_date, deadline_date) \
             VALUES (?, ?, ?, 'in_progress', ?, ?, ?) \
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(data.title)
        .bind(data.description)
        .bind(data.priority.as_str())
        .bind(data.creator_id)
        .bind(today)
        .bind(data.deadline_date)
        .fetch_one(&mut *tx)
        .await?;

        let assigned = TaskWorker::insert_links(&mut tx, task.id, worker_ids).await?;

        tx.commit().await?;

        Ok((task, assigned))
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID with resolved names and worker list
    pub async fn find_details(
        pool: &SqlitePool,
        id: i64,
    ) -> Result<Option<TaskDetails>, sqlx::Error> {
        let details = sqlx::query_as::<_, TaskDetails>(&format!("{DETAILS_SELECT} WHERE t.id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await?;

        match details {
            Some(mut d) => {
                d.workers = TaskWorker::list_for_task(pool, d.id).await?;
                Ok(Some(d))
            }
            None => Ok(None),
        }
    }

    /// Lists tasks with resolved names and worker lists
    ///
    /// `status` filters by exact match on "in_progress" or "completed";
    /// any other value (or `None`) returns all tasks.
    pub async fn list(
        pool: &SqlitePool,
        status: Option<&str>,
    ) -> Result<Vec<TaskDetails>, sqlx::Error> {
        let filter = status.and_then(TaskStatus::parse);

        let mut rows = match filter {
            Some(s) => {
                sqlx::query_as::<_, TaskDetails>(&format!(
                    "{DETAILS_SELECT} WHERE t.status = ? ORDER BY t.id"
                ))
                .bind(s.as_str())
                .fetch_all(pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, TaskDetails>(&format!("{DETAILS_SELECT} ORDER BY t.id"))
                    .fetch_all(pool)
                    .await?
            }
        };

        for row in &mut rows {
            row.workers = TaskWorker::list_for_task(pool, row.id).await?;
        }

        Ok(rows)
    }

    /// Marks a task completed
    ///
    /// Sets status, completer, and completion date in one statement.
    /// Calling this on an already-completed task overwrites the completer
    /// and date (see the module docs).
    ///
    /// Returns `None` if the task does not exist.
    pub async fn complete(
        pool: &SqlitePool,
        id: i64,
        completer_id: i64,
        today: NaiveDate,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "UPDATE tasks \
             SET status = 'completed', completer_id = ?, completed_date = ? \
             WHERE id = ? \
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(completer_id)
        .bind(today)
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Replaces a task's mutable fields and its entire worker-link set
    ///
    /// The worker list is replaced wholesale (delete all, then insert),
    /// not diffed: passing an empty list unassigns everyone. Status is
    /// left untouched unless `data.status` is set. Runs in one
    /// transaction.
    ///
    /// Returns `None` if the task does not exist.
    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        data: UpdateTask,
        worker_ids: &[i64],
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let task = sqlx::query_as::<_, Task>(&format!(
            "UPDATE tasks \
             SET title = ?, description = ?, priority = ?, deadline_date = ?, \
                 status = COALESCE(?, status) \
             WHERE id = ? \
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(data.title)
        .bind(data.description)
        .bind(data.priority.as_str())
        .bind(data.deadline_date)
        .bind(data.status.map(|s| s.as_str()))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let task = match task {
            Some(t) => t,
            None => return Ok(None),
        };

        TaskWorker::delete_for_task(&mut tx, id).await?;
        TaskWorker::insert_links(&mut tx, id, worker_ids).await?;

        tx.commit().await?;

        Ok(Some(task))
    }

    /// Deletes a task with its worker links and notifications
    ///
    /// All three deletes run in one transaction. Returns `false` if the
    /// task does not exist.
    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM notifications WHERE task_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM task_workers WHERE task_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists all in-progress tasks, used by the deadline sweep
    pub async fn list_in_progress(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE status = 'in_progress' ORDER BY id"
        ))
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }
}
