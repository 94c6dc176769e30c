/// Task endpoints
///
/// The task lifecycle lives here: creation with worker assignment,
/// listing, full-replace updates, completion, deletion, and nudges.
///
/// # Endpoints
///
/// - `GET    /api/tasks?status=` - List tasks, optionally filtered
/// - `GET    /api/tasks/:id` - Single task with workers
/// - `POST   /api/tasks` - Create a task and assign workers
/// - `PUT    /api/tasks/:id` - Replace fields and the worker set
/// - `PUT    /api/tasks/:id/complete` - Mark completed
/// - `DELETE /api/tasks/:id` - Delete with links and notifications
/// - `POST   /api/tasks/:id/nudge` - Nudge the assigned workers
///
/// Mutations commit first; notification fan-out runs afterwards and is
/// best-effort, so a fan-out failure never turns a successful mutation
/// into an error response.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    middleware::AuthUser,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use nudgeboard_shared::models::task::{CreateTask, Priority, Task, TaskDetails, TaskStatus, UpdateTask};
use nudgeboard_shared::models::task_worker::TaskWorker;
use nudgeboard_shared::notify::fanout;

/// Task list query parameters
#[derive(Debug, Deserialize)]
pub struct TaskQuery {
    /// Exact status filter; anything other than "in_progress" or
    /// "completed" returns all tasks
    pub status: Option<String>,
}

/// Create task request
///
/// `deadline` and `workerIds` are accepted as aliases because both key
/// styles exist in the wild among the mobile clients.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "title is required"))]
    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "priority is required"))]
    pub priority: String,

    /// Due date, YYYY-MM-DD
    #[serde(default, alias = "deadline")]
    #[validate(length(min = 1, message = "deadline_date is required"))]
    pub deadline_date: String,

    #[serde(default, alias = "workerIds")]
    pub worker_ids: Vec<i64>,
}

/// Update task request
///
/// Updates are full replacements: every mutable field is written and the
/// worker set is replaced wholesale. Status only changes when present.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "title is required"))]
    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "priority is required"))]
    pub priority: String,

    #[serde(default, alias = "deadline")]
    #[validate(length(min = 1, message = "deadline_date is required"))]
    pub deadline_date: String,

    pub status: Option<String>,

    #[serde(default, alias = "workerIds")]
    pub worker_ids: Vec<i64>,
}

/// Create task response
#[derive(Debug, Serialize)]
pub struct CreateTaskResponse {
    pub message: String,

    #[serde(rename = "taskId")]
    pub task_id: i64,
}

/// Plain acknowledgement response
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

fn parse_priority(value: &str) -> Result<Priority, ApiError> {
    Priority::parse(value).ok_or_else(|| {
        ApiError::Validation("priority must be one of: high, medium, low".to_string())
    })
}

fn parse_deadline(value: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| ApiError::Validation("deadline_date must be YYYY-MM-DD".to_string()))
}

/// Lists tasks with creator/completer names and worker lists
pub async fn list_tasks(
    State(state): State<AppState>,
    Query(query): Query<TaskQuery>,
) -> ApiResult<Json<Vec<TaskDetails>>> {
    let tasks = Task::list(&state.db, query.status.as_deref()).await?;
    Ok(Json(tasks))
}

/// Gets a single task
///
/// # Errors
///
/// - `404 Not Found`: no such task
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<TaskDetails>> {
    let task = Task::find_details(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task))
}

/// Creates a task, assigns workers, and notifies them
///
/// The task and its worker links are written in one transaction; each
/// distinct worker then receives a `task_assigned` notification.
///
/// # Errors
///
/// - `400 Bad Request`: missing title/priority/deadline or unknown priority
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<CreateTaskResponse>)> {
    req.validate().map_err(ApiError::from_validation)?;

    let priority = parse_priority(&req.priority)?;
    let deadline_date = parse_deadline(&req.deadline_date)?;

    let (task, assigned) = Task::create(
        &state.db,
        CreateTask {
            title: req.title,
            description: req.description,
            priority,
            deadline_date,
            creator_id: auth.id,
        },
        &req.worker_ids,
        Utc::now().date_naive(),
    )
    .await?;

    let report = fanout::task_assigned(&state.db, &task, &assigned).await;
    tracing::info!(
        task_id = task.id,
        creator_id = auth.id,
        workers = assigned.len(),
        delivered = report.delivered,
        "Task created"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateTaskResponse {
            message: "Task created".to_string(),
            task_id: task.id,
        }),
    ))
}

/// Replaces a task's fields and worker set
///
/// # Errors
///
/// - `400 Bad Request`: missing/invalid fields or unknown status value
/// - `404 Not Found`: no such task
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<MessageResponse>> {
    req.validate().map_err(ApiError::from_validation)?;

    let priority = parse_priority(&req.priority)?;
    let deadline_date = parse_deadline(&req.deadline_date)?;

    let status = match req.status.as_deref() {
        Some(s) => Some(TaskStatus::parse(s).ok_or_else(|| {
            ApiError::Validation("status must be in_progress or completed".to_string())
        })?),
        None => None,
    };

    Task::update(
        &state.db,
        id,
        UpdateTask {
            title: req.title,
            description: req.description,
            priority,
            deadline_date,
            status,
        },
        &req.worker_ids,
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(MessageResponse {
        message: "Task updated".to_string(),
    }))
}

/// Marks a task completed and notifies its workers
///
/// Completing an already-completed task succeeds again and overwrites the
/// completer and date.
///
/// # Errors
///
/// - `404 Not Found`: no such task
pub async fn complete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> ApiResult<Json<MessageResponse>> {
    let task = Task::complete(&state.db, id, auth.id, Utc::now().date_naive())
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    let workers = TaskWorker::worker_ids(&state.db, task.id).await?;
    let report = fanout::task_completed(&state.db, &task, &workers).await;
    tracing::info!(
        task_id = task.id,
        completer_id = auth.id,
        delivered = report.delivered,
        "Task completed"
    );

    Ok(Json(MessageResponse {
        message: "Task completed".to_string(),
    }))
}

/// Deletes a task with its worker links and notifications
///
/// # Errors
///
/// - `404 Not Found`: no such task
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<MessageResponse>> {
    let deleted = Task::delete(&state.db, id).await?;

    if !deleted {
        return Err(ApiError::NotFound("Task not found".to_string()));
    }

    Ok(Json(MessageResponse {
        message: "Task deleted".to_string(),
    }))
}

/// Sends a nudge notification to every assigned worker
///
/// The task itself is untouched.
///
/// # Errors
///
/// - `404 Not Found`: no such task
pub async fn nudge_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> ApiResult<Json<MessageResponse>> {
    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    let workers = TaskWorker::worker_ids(&state.db, task.id).await?;
    let report = fanout::nudge(&state.db, &task, &workers).await;
    tracing::info!(
        task_id = task.id,
        from_user = auth.id,
        delivered = report.delivered,
        "Nudge sent"
    );

    Ok(Json(MessageResponse {
        message: "Nudge sent to assigned workers".to_string(),
    }))
}
