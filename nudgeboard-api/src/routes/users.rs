/// User endpoints
///
/// # Endpoints
///
/// - `GET /api/users` - All users, for assignment pickers
/// - `GET /api/users/:id` - Single user lookup

use crate::{app::AppState, error::{ApiError, ApiResult}};
use axum::{
    extract::{Path, State},
    Json,
};
use chrono::NaiveDate;
use serde::Serialize;

use nudgeboard_shared::models::user::User;

/// User as listed for assignment pickers
#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub birthdate: NaiveDate,
}

/// User detail, includes the admin flag
#[derive(Debug, Serialize)]
pub struct UserDetail {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub birthdate: NaiveDate,
    pub is_admin: bool,
}

/// Lists all users
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<UserSummary>>> {
    let users = User::list(&state.db).await?;

    let summaries = users
        .into_iter()
        .map(|u| UserSummary {
            id: u.id,
            name: u.name,
            phone: u.phone,
            birthdate: u.birthdate,
        })
        .collect();

    Ok(Json(summaries))
}

/// Gets a single user by ID
///
/// # Errors
///
/// - `404 Not Found`: no such user
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<UserDetail>> {
    let user = User::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(UserDetail {
        id: user.id,
        name: user.name,
        phone: user.phone,
        birthdate: user.birthdate,
        is_admin: user.is_admin,
    }))
}
