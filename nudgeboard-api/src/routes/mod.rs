/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Service index and health check
/// - `auth`: Registration and login
/// - `users`: User listing and lookup
/// - `tasks`: Task lifecycle (create, list, update, complete, delete, nudge)
/// - `notifications`: Notification feed and read marking

pub mod auth;
pub mod health;
pub mod notifications;
pub mod tasks;
pub mod users;
