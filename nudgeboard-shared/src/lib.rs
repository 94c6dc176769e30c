//! # Nudgeboard Shared Library
//!
//! This crate contains the types, storage layer, and business logic shared
//! by the Nudgeboard API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models and their CRUD operations
//! - `auth`: Password hashing and JWT utilities
//! - `db`: SQLite connection pool and migrations
//! - `notify`: Notification fan-out and the deadline sweep

pub mod auth;
pub mod db;
pub mod models;
pub mod notify;

/// Current version of the Nudgeboard shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
