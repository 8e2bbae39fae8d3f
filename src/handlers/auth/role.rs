use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{token, Identity, Role};
use crate::error::ApiError;
use crate::middleware::ApiResponse;

#[derive(Debug, Deserialize)]
pub struct SwitchRoleRequest {
    pub role: Role,
}

/// POST /api/auth/role - Switch into a different active role
///
/// Entitlement is checked here, at issuance time: admins may assume any
/// role, supervisors the floor roles they oversee, everyone else only their
/// own base role. The response carries a freshly issued token; the old one
/// simply ages out.
pub async fn role_post(
    Extension(identity): Extension<Identity>,
    Json(payload): Json<SwitchRoleRequest>,
) -> Result<ApiResponse<Value>, ApiError> {
    if !identity.base_role.may_assume(payload.role) {
        tracing::warn!(
            user = %identity.email,
            base_role = %identity.base_role,
            requested = %payload.role,
            "role switch rejected"
        );
        return Err(ApiError::forbidden(format!(
            "Role '{}' is not entitled to assume role '{}'",
            identity.base_role, payload.role
        )));
    }

    // Switching into the base role is just a revert
    let active_role = (payload.role != identity.base_role).then_some(payload.role);
    let token = token::issue_access_token(
        identity.user_id,
        &identity.email,
        identity.base_role,
        active_role,
    )?;

    tracing::info!(
        user = %identity.email,
        base_role = %identity.base_role,
        active_role = %payload.role,
        "active role switched"
    );

    Ok(ApiResponse::success(json!({
        "token": token,
        "baseRole": identity.base_role,
        "activeRole": active_role,
        "effectiveRole": active_role.unwrap_or(identity.base_role),
        "expiresIn": token::access_expiry_secs(),
    })))
}

/// DELETE /api/auth/role - Revert to the base role
pub async fn role_delete(
    Extension(identity): Extension<Identity>,
) -> Result<ApiResponse<Value>, ApiError> {
    let token = token::issue_access_token(
        identity.user_id,
        &identity.email,
        identity.base_role,
        None,
    )?;

    Ok(ApiResponse::success(json!({
        "token": token,
        "baseRole": identity.base_role,
        "activeRole": null,
        "effectiveRole": identity.base_role,
        "expiresIn": token::access_expiry_secs(),
    })))
}
