use axum::{extract::Request, middleware::Next, response::Response};

use crate::auth::{Identity, Role};
use crate::error::ApiError;

/// Allow-list authorization middleware. Routes wire it with a closure:
///
/// ```ignore
/// .route_layer(middleware::from_fn(|req, next| {
///     authorize_roles(&[Role::Supervisor, Role::Admin], req, next)
/// }))
/// ```
pub async fn authorize_roles(
    allowed: &'static [Role],
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    attached_identity(&request)?.authorize(allowed)?;
    Ok(next.run(request).await)
}

pub async fn require_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    attached_identity(&request)?.require_admin()?;
    Ok(next.run(request).await)
}

pub async fn require_supervisor(request: Request, next: Next) -> Result<Response, ApiError> {
    attached_identity(&request)?.require_supervisor()?;
    Ok(next.run(request).await)
}

pub async fn require_picker(request: Request, next: Next) -> Result<Response, ApiError> {
    attached_identity(&request)?.require_picker()?;
    Ok(next.run(request).await)
}

/// A missing Identity extension means the route was wired without
/// `authenticate` upstream. That is a wiring bug, surfaced as 401 so the
/// route fails closed.
fn attached_identity(request: &Request) -> Result<Identity, ApiError> {
    request
        .extensions()
        .get::<Identity>()
        .cloned()
        .ok_or_else(|| {
            tracing::warn!(
                path = %request.uri().path(),
                "authorization check reached without an authenticated identity"
            );
            ApiError::unauthorized("User not authenticated")
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode, middleware, routing::get, Extension, Router};
    use tower::ServiceExt;
    use uuid::Uuid;

    async fn ok_handler() -> &'static str {
        "ok"
    }

    fn identity(base: Role, active: Option<Role>) -> Identity {
        Identity {
            user_id: Uuid::new_v4(),
            email: "worker@warehouse.test".to_string(),
            base_role: base,
            active_role: active,
        }
    }

    /// Router guarded by the role-list middleware, with the identity
    /// pre-attached the way authenticate would
    fn allow_list_router(allowed: &'static [Role], id: Identity) -> Router {
        Router::new()
            .route("/", get(ok_handler))
            .route_layer(middleware::from_fn(move |req, next| {
                authorize_roles(allowed, req, next)
            }))
            .layer(Extension(id))
    }

    fn admin_router(id: Identity) -> Router {
        Router::new()
            .route("/", get(ok_handler))
            .route_layer(middleware::from_fn(require_admin))
            .layer(Extension(id))
    }

    async fn status_of(router: Router) -> StatusCode {
        let response = router
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        response.status()
    }

    #[tokio::test]
    async fn test_authorize_roles_respects_allow_list() {
        let router = allow_list_router(&[Role::Supervisor], identity(Role::Picker, None));
        assert_eq!(status_of(router).await, StatusCode::FORBIDDEN);

        let router = allow_list_router(&[Role::Supervisor], identity(Role::Supervisor, None));
        assert_eq!(status_of(router).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_authorize_roles_admin_override() {
        let router = allow_list_router(&[Role::Supervisor], identity(Role::Admin, Some(Role::Picker)));
        assert_eq!(status_of(router).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_require_admin_wrapper() {
        let router = admin_router(identity(Role::Admin, Some(Role::Picker)));
        assert_eq!(status_of(router).await, StatusCode::OK);

        let router = admin_router(identity(Role::Supervisor, None));
        assert_eq!(status_of(router).await, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_require_supervisor_has_no_base_role_override() {
        let router = Router::new()
            .route("/", get(ok_handler))
            .route_layer(middleware::from_fn(require_supervisor))
            .layer(Extension(identity(Role::Admin, Some(Role::Picker))));
        assert_eq!(status_of(router).await, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_missing_identity_is_unauthorized() {
        // Route wired without authenticate upstream
        let router = Router::new()
            .route("/", get(ok_handler))
            .route_layer(middleware::from_fn(require_picker));
        assert_eq!(status_of(router).await, StatusCode::UNAUTHORIZED);
    }
}
