/// Notification model and database operations
///
/// Notifications are derived records written by the fan-out layer when a
/// task event occurs (assignment, completion, nudge, deadline reminder).
/// Each targets a single recipient and starts unread.
///
/// Reads are always scoped to the recipient: a user sees only their own
/// feed, and marking a notification read is a silent no-op when it belongs
/// to someone else.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// Number of notifications returned per feed read
pub const FEED_LIMIT: i64 = 50;

/// Notification kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    TaskAssigned,
    TaskCompleted,
    Nudge,
    Deadline,
}

impl NotificationKind {
    /// Converts kind to its storage string
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::TaskAssigned => "task_assigned",
            NotificationKind::TaskCompleted => "task_completed",
            NotificationKind::Nudge => "nudge",
            NotificationKind::Deadline => "deadline",
        }
    }
}

/// Notification row as stored
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Notification {
    pub id: i64,

    /// Recipient
    pub user_id: i64,

    /// Task the notification refers to
    pub task_id: i64,

    /// Kind ("task_assigned", "task_completed", "nudge", "deadline")
    pub kind: String,

    /// Human-readable message
    pub message: String,

    /// Whether the recipient has read it
    pub is_read: bool,

    pub created_at: DateTime<Utc>,
}

/// Notification joined with its task title, the feed shape
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct FeedItem {
    pub id: i64,
    pub user_id: i64,
    pub task_id: i64,
    pub kind: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,

    /// Title of the referenced task (null if the task vanished)
    pub task_title: Option<String>,
}

/// Input for creating a notification
#[derive(Debug, Clone)]
pub struct CreateNotification {
    pub user_id: i64,
    pub task_id: i64,
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    /// Creates a notification record
    pub async fn create(
        pool: &SqlitePool,
        data: CreateNotification,
    ) -> Result<Self, sqlx::Error> {
        let notification = sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications (user_id, task_id, kind, message, is_read, created_at)
            VALUES (?, ?, ?, ?, 0, ?)
            RETURNING id, user_id, task_id, kind, message, is_read, created_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.task_id)
        .bind(data.kind.as_str())
        .bind(data.message)
        .bind(Utc::now())
        .fetch_one(pool)
        .await?;

        Ok(notification)
    }

    /// Lists a user's notifications, newest first, capped at [`FEED_LIMIT`]
    pub async fn list_for_user(
        pool: &SqlitePool,
        user_id: i64,
    ) -> Result<Vec<FeedItem>, sqlx::Error> {
        let items = sqlx::query_as::<_, FeedItem>(
            r#"
            SELECT n.id, n.user_id, n.task_id, n.kind, n.message, n.is_read, n.created_at,
                   t.title AS task_title
            FROM notifications n
            LEFT JOIN tasks t ON t.id = n.task_id
            WHERE n.user_id = ?
            ORDER BY n.created_at DESC, n.id DESC
            LIMIT ?
            "#,
        )
        .bind(user_id)
        .bind(FEED_LIMIT)
        .fetch_all(pool)
        .await?;

        Ok(items)
    }

    /// Marks a notification read, scoped to its owner
    ///
    /// Returns `false` without touching anything when the notification
    /// does not exist or belongs to a different user.
    pub async fn mark_read(
        pool: &SqlitePool,
        id: i64,
        user_id: i64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = 1 WHERE id = ? AND user_id = ?",
        )
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
