// Role probes for UI and service callers: each probe is guarded by the
// matching authorization middleware, so reaching the handler means the
// check passed. The POST variant runs an arbitrary allow-list against the
// caller's identity.

use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{Identity, Role};
use crate::error::ApiError;
use crate::middleware::ApiResponse;

/// GET /api/access/admin - guarded by `require_admin`
pub async fn admin_get(Extension(identity): Extension<Identity>) -> ApiResponse<Value> {
    probe_response(&identity)
}

/// GET /api/access/supervisor - guarded by `require_supervisor`
pub async fn supervisor_get(Extension(identity): Extension<Identity>) -> ApiResponse<Value> {
    probe_response(&identity)
}

/// GET /api/access/picker - guarded by `require_picker`
pub async fn picker_get(Extension(identity): Extension<Identity>) -> ApiResponse<Value> {
    probe_response(&identity)
}

#[derive(Debug, Deserialize)]
pub struct AccessCheckRequest {
    pub roles: Vec<Role>,
}

/// POST /api/access/check - Allow-list check (with the admin override)
/// against the caller's effective role
pub async fn check_post(
    Extension(identity): Extension<Identity>,
    Json(payload): Json<AccessCheckRequest>,
) -> Result<ApiResponse<Value>, ApiError> {
    identity.authorize(&payload.roles)?;
    Ok(probe_response(&identity))
}

fn probe_response(identity: &Identity) -> ApiResponse<Value> {
    ApiResponse::success(json!({
        "allowed": true,
        "effectiveRole": identity.effective_role(),
    }))
}
