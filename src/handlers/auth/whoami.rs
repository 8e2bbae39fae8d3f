use axum::Extension;

use crate::auth::Identity;
use crate::middleware::ApiResponse;

/// GET /api/auth/whoami - Return the resolved identity for the presented token
///
/// The response mirrors the request context downstream handlers see:
/// `{ userId, email, role, baseRole, activeRole, effectiveRole }` where
/// `role` aliases `effectiveRole`.
pub async fn whoami_get(Extension(identity): Extension<Identity>) -> ApiResponse<Identity> {
    ApiResponse::success(identity)
}
