use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::auth::roles::Role;
use crate::config;

/// Signed session token payload. `effective_role` is redundant (derivable
/// from `role` and `active_role`) and exists for readers that do not
/// recompute it; the gate itself always recomputes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    /// Base role: the user's permanent assignment
    pub role: Role,
    /// Temporary role the user has switched into, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_role: Option<Role>,
    pub effective_role: Role,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn effective_role(&self) -> Role {
        self.active_role.unwrap_or(self.role)
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    /// Signature checked out but `exp <= now`
    #[error("token expired")]
    Expired,
    /// Bad signature or malformed payload
    #[error("invalid token: {0}")]
    Invalid(String),
    #[error("JWT secret is not configured")]
    MissingSecret,
}

/// Mint a signed token. Pure: encodes the payload with HMAC-SHA256 over the
/// given secret and touches nothing else.
pub fn issue(
    user_id: Uuid,
    email: &str,
    role: Role,
    active_role: Option<Role>,
    ttl: Duration,
    secret: &str,
) -> Result<String, TokenError> {
    if secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }

    let now = Utc::now();
    let claims = Claims {
        sub: user_id,
        email: email.to_string(),
        role,
        active_role,
        effective_role: active_role.unwrap_or(role),
        iat: now.timestamp(),
        exp: (now + ttl).timestamp(),
    };

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), &claims, &encoding_key)
        .map_err(|e| TokenError::Invalid(e.to_string()))
}

/// Verify signature and expiry against the current clock.
pub fn verify(token: &str, secret: &str) -> Result<Claims, TokenError> {
    verify_at(token, secret, Utc::now().timestamp())
}

/// Expiry is exclusive: a token with `exp == now` is already expired. The
/// library's own exp handling is disabled (it applies leeway) so the
/// boundary stays deterministic.
pub fn verify_at(token: &str, secret: &str, now: i64) -> Result<Claims, TokenError> {
    if secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::default();
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| TokenError::Invalid(e.to_string()))?;

    if token_data.claims.exp <= now {
        return Err(TokenError::Expired);
    }

    Ok(token_data.claims)
}

/// Issue an access token using the configured secret and TTL.
pub fn issue_access_token(
    user_id: Uuid,
    email: &str,
    role: Role,
    active_role: Option<Role>,
) -> Result<String, TokenError> {
    let security = &config::config().security;
    issue(
        user_id,
        email,
        role,
        active_role,
        Duration::hours(security.jwt_expiry_hours as i64),
        &security.jwt_secret,
    )
}

/// Issue a refresh token: same encoding and signing key, longer TTL.
/// Intended for exchange at the refresh endpoint rather than direct API use.
pub fn issue_refresh_token(
    user_id: Uuid,
    email: &str,
    role: Role,
    active_role: Option<Role>,
) -> Result<String, TokenError> {
    let security = &config::config().security;
    issue(
        user_id,
        email,
        role,
        active_role,
        Duration::hours(security.refresh_expiry_hours as i64),
        &security.jwt_secret,
    )
}

/// Verify a token using the configured secret.
pub fn verify_token(token: &str) -> Result<Claims, TokenError> {
    verify(token, &config::config().security.jwt_secret)
}

/// Access-token lifetime in seconds, for `expiresIn` response fields.
pub fn access_expiry_secs() -> i64 {
    config::config().security.jwt_expiry_hours as i64 * 3600
}
