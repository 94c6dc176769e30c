/// User model and database operations
///
/// Users register with a phone number (unique) and a password, which is
/// stored as an Argon2id hash. Accounts are immutable after creation apart
/// from out-of-scope profile edits.
///
/// # Example
///
/// ```no_run
/// use nudgeboard_shared::models::user::{CreateUser, User};
/// use chrono::NaiveDate;
///
/// # async fn example(pool: sqlx::SqlitePool) -> Result<(), sqlx::Error> {
/// let user = User::create(&pool, CreateUser {
///     name: "Jiho Park".to_string(),
///     phone: "010-1234-5678".to_string(),
///     birthdate: NaiveDate::from_ymd_opt(1990, 4, 1).unwrap(),
///     password_hash: "$argon2id$...".to_string(),
///     is_admin: false,
/// }).await?;
///
/// assert!(User::find_by_phone(&pool, "010-1234-5678").await?.is_some());
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// User account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID, assigned on creation
    pub id: i64,

    /// Display name
    pub name: String,

    /// Phone number, unique across all users
    pub phone: String,

    /// Date of birth
    pub birthdate: NaiveDate,

    /// Argon2id password hash, never serialized in responses
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Administrator flag
    pub is_admin: bool,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub phone: String,
    pub birthdate: NaiveDate,
    /// Argon2id hash, not the plaintext password
    pub password_hash: String,
    pub is_admin: bool,
}

impl User {
    /// Creates a new user account
    ///
    /// # Errors
    ///
    /// Returns an error if the phone number already exists (unique
    /// constraint) or the database operation fails.
    pub async fn create(pool: &SqlitePool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, phone, birthdate, password_hash, is_admin, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id, name, phone, birthdate, password_hash, is_admin, created_at
            "#,
        )
        .bind(data.name)
        .bind(data.phone)
        .bind(data.birthdate)
        .bind(data.password_hash)
        .bind(data.is_admin)
        .bind(Utc::now())
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, phone, birthdate, password_hash, is_admin, created_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by phone number
    ///
    /// Used for registration duplicate checks and login.
    pub async fn find_by_phone(pool: &SqlitePool, phone: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, phone, birthdate, password_hash, is_admin, created_at
            FROM users
            WHERE phone = ?
            "#,
        )
        .bind(phone)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Lists all users, ordered by ID
    pub async fn list(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, phone, birthdate, password_hash, is_admin, created_at
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(users)
    }
}
