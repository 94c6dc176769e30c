/// Notification endpoints
///
/// # Endpoints
///
/// - `GET /api/notifications` - The caller's feed, newest first, capped at 50
/// - `PUT /api/notifications/:id/read` - Mark one as read
///
/// Reads are scoped to the caller. Marking a notification that belongs to
/// someone else (or does not exist) is a deliberate no-op that still
/// returns 200, so read-state cannot be tampered with across users and
/// the endpoint stays idempotent for the owner.

use crate::{app::AppState, error::ApiResult, middleware::AuthUser};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Serialize;

use nudgeboard_shared::models::notification::{FeedItem, Notification};

/// Plain acknowledgement response
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Lists the caller's notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<Json<Vec<FeedItem>>> {
    let feed = Notification::list_for_user(&state.db, auth.id).await?;
    Ok(Json(feed))
}

/// Marks a notification as read
pub async fn mark_read(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> ApiResult<Json<MessageResponse>> {
    let updated = Notification::mark_read(&state.db, id, auth.id).await?;

    if !updated {
        tracing::debug!(notification_id = id, user_id = auth.id, "Mark-read was a no-op");
    }

    Ok(Json(MessageResponse {
        message: "Notification marked as read".to_string(),
    }))
}
