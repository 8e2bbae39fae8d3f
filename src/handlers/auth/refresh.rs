use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::token;
use crate::error::ApiError;
use crate::middleware::ApiResponse;

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub token: String,
}

/// POST /auth/refresh - Exchange a refresh token for a fresh access token
///
/// Public route: the caller's access token may already be expired, so the
/// refresh token travels in the body instead of the Authorization header.
/// An expired refresh token is the cue to log in again.
pub async fn refresh_post(
    Json(payload): Json<RefreshRequest>,
) -> Result<ApiResponse<Value>, ApiError> {
    let claims = token::verify_token(&payload.token)?;

    let access = token::issue_access_token(
        claims.sub,
        &claims.email,
        claims.role,
        claims.active_role,
    )?;

    tracing::debug!(user = %claims.email, "access token refreshed");

    Ok(ApiResponse::success(json!({
        "token": access,
        "expiresIn": token::access_expiry_secs(),
    })))
}
