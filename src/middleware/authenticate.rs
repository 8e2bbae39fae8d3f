use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::roles::Role;
use crate::auth::token::{self, TokenError};
use crate::auth::Identity;
use crate::config::{self, Environment, TestBypassPolicy};
use crate::error::ApiError;

/// Header carrying the shared secret for the secret-gated test bypass
pub const TEST_BYPASS_HEADER: &str = "x-test-auth-secret";

/// Gate inputs that normally come from the config singleton, split out so
/// the branch logic is testable without process-wide environment state.
#[derive(Debug, Clone)]
pub(crate) struct GateSettings {
    pub environment: Environment,
    pub bypass_policy: TestBypassPolicy,
    pub bypass_secret: String,
    pub jwt_secret: String,
}

impl GateSettings {
    fn from_config() -> Self {
        let cfg = config::config();
        Self {
            environment: cfg.environment,
            bypass_policy: cfg.security.test_bypass,
            bypass_secret: cfg.security.test_bypass_secret.clone(),
            jwt_secret: cfg.security.jwt_secret.clone(),
        }
    }
}

/// Authentication middleware: resolves an `Identity` from the request and
/// injects it for downstream handlers, or halts with 401.
pub async fn authenticate(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = resolve_identity(&GateSettings::from_config(), &headers)?;
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Two terminal branches: the test bypass (never in production, enforced by
/// an explicit environment check) and the normal bearer-token path.
pub(crate) fn resolve_identity(
    settings: &GateSettings,
    headers: &HeaderMap,
) -> Result<Identity, ApiError> {
    if bypass_active(settings) {
        match settings.bypass_policy {
            TestBypassPolicy::Unconditional => {
                tracing::warn!("test bypass: synthesizing admin identity unconditionally");
                return Ok(test_identity());
            }
            TestBypassPolicy::SecretGated => {
                let presented = headers
                    .get(TEST_BYPASS_HEADER)
                    .and_then(|v| v.to_str().ok());
                match presented {
                    Some(secret)
                        if !settings.bypass_secret.is_empty()
                            && secret == settings.bypass_secret =>
                    {
                        tracing::warn!("test bypass: admin identity granted via shared secret");
                        return Ok(test_identity());
                    }
                    Some(_) => {
                        tracing::warn!("test bypass header present with wrong secret");
                    }
                    None => {}
                }
                // Fall through to the normal branch
            }
            TestBypassPolicy::Disabled => {}
        }
    }

    let token = extract_bearer(headers)
        .ok_or_else(|| ApiError::unauthorized("Missing or invalid Authorization header"))?;

    let claims = token::verify(&token, &settings.jwt_secret).map_err(|e| match e {
        TokenError::Expired => ApiError::unauthorized("Token expired"),
        TokenError::Invalid(msg) => {
            tracing::warn!("rejected bearer token: {}", msg);
            ApiError::unauthorized("Invalid token")
        }
        TokenError::MissingSecret => {
            tracing::error!("bearer token presented but no JWT secret is configured");
            ApiError::internal_server_error("Token verification is not configured")
        }
    })?;

    Ok(Identity::from(claims))
}

/// The bypass never activates in production, whatever the policy says
fn bypass_active(settings: &GateSettings) -> bool {
    settings.bypass_policy != TestBypassPolicy::Disabled
        && settings.environment != Environment::Production
}

fn test_identity() -> Identity {
    Identity {
        user_id: Uuid::nil(),
        email: "test-admin@localhost".to_string(),
        base_role: Role::Admin,
        active_role: None,
    }
}

/// Extract the token from `Authorization: Bearer <token>`. Any shortfall
/// (missing header, wrong scheme, empty token) reads as the same missing/
/// invalid-header failure.
fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let value = headers.get("authorization")?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?;
    if token.trim().is_empty() {
        return None;
    }
    Some(token.to_string())
}
