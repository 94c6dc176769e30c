/// Database models for Nudgeboard
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: User accounts
/// - `task`: Tasks and their lifecycle (create, complete, update, delete)
/// - `task_worker`: Task-to-worker assignment links
/// - `notification`: Notification records produced by fan-out

pub mod notification;
pub mod task;
pub mod task_worker;
pub mod user;
