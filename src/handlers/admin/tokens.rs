use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::{token, Identity, Role};
use crate::error::ApiError;
use crate::middleware::ApiResponse;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintTokenRequest {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub active_role: Option<Role>,
    /// Mint with the refresh TTL instead of the access TTL
    #[serde(default)]
    pub refresh: bool,
}

/// POST /api/admin/tokens - Mint a token for an arbitrary user
///
/// Support tooling for admins: impersonate a user or hand out a session
/// when the normal login path is unavailable. Route is layered with
/// `require_admin`, so the base-role check has already passed. Every mint
/// is logged with the acting admin.
pub async fn tokens_post(
    Extension(identity): Extension<Identity>,
    Json(payload): Json<MintTokenRequest>,
) -> Result<ApiResponse<Value>, ApiError> {
    // Issuance-time invariant: an active role must be one the subject is
    // entitled to assume
    if let Some(active) = payload.active_role {
        if !payload.role.may_assume(active) {
            return Err(ApiError::bad_request(format!(
                "Role '{}' is not entitled to assume role '{}'",
                payload.role, active
            )));
        }
    }

    let token = if payload.refresh {
        token::issue_refresh_token(
            payload.user_id,
            &payload.email,
            payload.role,
            payload.active_role,
        )?
    } else {
        token::issue_access_token(
            payload.user_id,
            &payload.email,
            payload.role,
            payload.active_role,
        )?
    };

    tracing::info!(
        minted_for = %payload.email,
        role = %payload.role,
        refresh = payload.refresh,
        acting_admin = %identity.email,
        "admin minted a token"
    );

    Ok(ApiResponse::created(json!({
        "token": token,
        "userId": payload.user_id,
        "email": payload.email,
        "role": payload.role,
        "activeRole": payload.active_role,
        "refresh": payload.refresh,
    })))
}
