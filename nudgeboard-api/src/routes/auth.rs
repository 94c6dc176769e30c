/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /api/register` - Register a new user
/// - `POST /api/login` - Login and receive a bearer token
///
/// Registration rejects duplicate phone numbers with 400. Login failures
/// (unknown phone or wrong password) both return 401 with the same
/// message, so a caller cannot probe which phone numbers exist.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, Json};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use nudgeboard_shared::auth::{jwt, password};
use nudgeboard_shared::models::user::{CreateUser, User};

/// Register request
///
/// Fields default to empty so a missing field reads as an empty string
/// and fails the length validation with a 400, rather than bouncing off
/// the JSON deserializer.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "name is required"))]
    pub name: String,

    #[serde(default)]
    #[validate(length(min = 1, max = 32, message = "phone is required"))]
    pub phone: String,

    /// Date of birth, YYYY-MM-DD
    #[serde(default)]
    #[validate(length(min = 1, message = "birthdate is required"))]
    pub birthdate: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Register response
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,

    #[serde(rename = "userId")]
    pub user_id: i64,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "phone is required"))]
    pub phone: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// User as returned by login
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub birthdate: NaiveDate,
    pub is_admin: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            phone: user.phone,
            birthdate: user.birthdate,
            is_admin: user.is_admin,
        }
    }
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Bearer token, valid for seven days
    pub token: String,

    pub user: UserResponse,
}

/// Register a new user
///
/// # Errors
///
/// - `400 Bad Request`: missing field, malformed birthdate, or duplicate phone
/// - `500 Internal Server Error`: hashing or database failure
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    req.validate().map_err(ApiError::from_validation)?;

    let birthdate = NaiveDate::parse_from_str(&req.birthdate, "%Y-%m-%d")
        .map_err(|_| ApiError::Validation("birthdate must be YYYY-MM-DD".to_string()))?;

    if User::find_by_phone(&state.db, &req.phone).await?.is_some() {
        return Err(ApiError::Validation(
            "Phone number already registered".to_string(),
        ));
    }

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            name: req.name,
            phone: req.phone,
            birthdate,
            password_hash,
            is_admin: false,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Registration complete".to_string(),
            user_id: user.id,
        }),
    ))
}

/// Login and receive a bearer token
///
/// # Errors
///
/// - `400 Bad Request`: missing field
/// - `401 Unauthorized`: unknown phone or wrong password
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    req.validate().map_err(ApiError::from_validation)?;

    let user = User::find_by_phone(&state.db, &req.phone)
        .await?
        .ok_or_else(|| {
            ApiError::Unauthenticated("Invalid phone number or password".to_string())
        })?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthenticated(
            "Invalid phone number or password".to_string(),
        ));
    }

    let claims = jwt::Claims::new(user.id, &user.phone, user.is_admin);
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(LoginResponse {
        token,
        user: user.into(),
    }))
}
