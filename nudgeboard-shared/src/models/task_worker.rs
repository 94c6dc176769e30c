/// Task-to-worker assignment links
///
/// A task can have any number of workers and a worker can be on any number
/// of tasks. The join table holds at most one row per (task, worker) pair;
/// inserts deduplicate their input and ignore rows that already exist, so
/// repeated IDs in a request never produce duplicate links.

use serde::{Deserialize, Serialize};
use sqlx::{Sqlite, SqlitePool, Transaction};

/// Assignment link row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskWorker {
    pub id: i64,
    pub task_id: i64,
    pub worker_id: i64,
}

/// Worker as embedded in task responses
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct WorkerRef {
    pub id: i64,
    pub name: String,
    pub phone: String,
}

impl TaskWorker {
    /// Inserts links for the given workers inside an open transaction
    ///
    /// Input IDs are deduplicated (first occurrence wins) and existing
    /// links are left untouched. Returns the deduplicated worker list.
    pub async fn insert_links(
        tx: &mut Transaction<'_, Sqlite>,
        task_id: i64,
        worker_ids: &[i64],
    ) -> Result<Vec<i64>, sqlx::Error> {
        let mut assigned = Vec::with_capacity(worker_ids.len());

        for &worker_id in worker_ids {
            if assigned.contains(&worker_id) {
                continue;
            }

            sqlx::query(
                "INSERT OR IGNORE INTO task_workers (task_id, worker_id) VALUES (?, ?)",
            )
            .bind(task_id)
            .bind(worker_id)
            .execute(&mut **tx)
            .await?;

            assigned.push(worker_id);
        }

        Ok(assigned)
    }

    /// Removes every link for a task inside an open transaction
    pub async fn delete_for_task(
        tx: &mut Transaction<'_, Sqlite>,
        task_id: i64,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM task_workers WHERE task_id = ?")
            .bind(task_id)
            .execute(&mut **tx)
            .await?;

        Ok(result.rows_affected())
    }

    /// Lists a task's workers with their display details
    ///
    /// Links pointing at deleted users are skipped by the join.
    pub async fn list_for_task(
        pool: &SqlitePool,
        task_id: i64,
    ) -> Result<Vec<WorkerRef>, sqlx::Error> {
        let workers = sqlx::query_as::<_, WorkerRef>(
            r#"
            SELECT u.id, u.name, u.phone
            FROM task_workers tw
            JOIN users u ON u.id = tw.worker_id
            WHERE tw.task_id = ?
            ORDER BY tw.id
            "#,
        )
        .bind(task_id)
        .fetch_all(pool)
        .await?;

        Ok(workers)
    }

    /// Lists a task's worker IDs, the recipient set for fan-out
    pub async fn worker_ids(pool: &SqlitePool, task_id: i64) -> Result<Vec<i64>, sqlx::Error> {
        let rows: Vec<(i64,)> =
            sqlx::query_as("SELECT worker_id FROM task_workers WHERE task_id = ? ORDER BY id")
                .bind(task_id)
                .fetch_all(pool)
                .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}
