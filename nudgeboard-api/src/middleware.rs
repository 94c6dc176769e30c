/// Bearer-token authentication middleware
///
/// Every `/api` route except registration and login runs behind this
/// layer. It extracts the `Authorization: Bearer <token>` header, validates
/// the JWT, and attaches the acting user's identity to request extensions
/// for handlers to pick up via `Extension<AuthUser>`.
///
/// A missing credential is 401; a credential that fails validation
/// (malformed, bad signature, expired) is 403.

use axum::{extract::Request, extract::State, http::header, middleware::Next, response::Response};
use serde::{Deserialize, Serialize};

use crate::{app::AppState, error::ApiError};
use nudgeboard_shared::auth::jwt;

/// Identity of the authenticated caller, attached to request extensions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    /// User ID
    pub id: i64,

    /// Phone number
    pub phone: String,

    /// Administrator flag
    pub is_admin: bool,
}

impl AuthUser {
    /// Creates the auth identity from validated JWT claims
    pub fn from_claims(claims: jwt::Claims) -> Self {
        Self {
            id: claims.sub,
            phone: claims.phone,
            is_admin: claims.is_admin,
        }
    }
}

/// Authentication middleware layer
///
/// Validates the bearer token and injects [`AuthUser`] into request
/// extensions before the handler runs.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let token = auth_header
        .and_then(|h| h.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::Unauthenticated("Authentication token required".to_string()))?;

    let claims = jwt::validate_token(token, state.jwt_secret())?;

    req.extensions_mut().insert(AuthUser::from_claims(claims));

    Ok(next.run(req).await)
}
