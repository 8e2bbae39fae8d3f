use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

/// How the test-only authentication bypass behaves. `SecretGated` is the
/// only variant that should ever be enabled outside local development:
/// it still demands a shared secret in a dedicated header before it will
/// synthesize an admin identity. `Unconditional` exists for parity with
/// older deployments and is logged loudly at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestBypassPolicy {
    Disabled,
    SecretGated,
    Unconditional,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    pub refresh_expiry_hours: u64,
    pub test_bypass: TestBypassPolicy,
    pub test_bypass_secret: String,
    pub enable_cors: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("SECURITY_JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Ok(v) = env::var("SECURITY_REFRESH_EXPIRY_HOURS") {
            self.security.refresh_expiry_hours =
                v.parse().unwrap_or(self.security.refresh_expiry_hours);
        }
        if let Ok(v) = env::var("TEST_BYPASS") {
            self.security.test_bypass = match v.to_ascii_lowercase().as_str() {
                "secret" | "secret-gated" => TestBypassPolicy::SecretGated,
                "unconditional" => TestBypassPolicy::Unconditional,
                _ => TestBypassPolicy::Disabled,
            };
        }
        if let Ok(v) = env::var("TEST_BYPASS_SECRET") {
            self.security.test_bypass_secret = v;
        }
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 24 * 7, // 1 week
                refresh_expiry_hours: 24 * 30,
                test_bypass: TestBypassPolicy::Disabled,
                test_bypass_secret: String::new(),
                enable_cors: true,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 24,
                refresh_expiry_hours: 24 * 14,
                test_bypass: TestBypassPolicy::Disabled,
                test_bypass_secret: String::new(),
                enable_cors: true,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 4,
                refresh_expiry_hours: 24 * 7,
                test_bypass: TestBypassPolicy::Disabled,
                test_bypass_secret: String::new(),
                enable_cors: true,
            },
        }
    }

    /// Startup validation of the security section. A secret-gated bypass
    /// without its companion secret is fatal; a bypass requested in
    /// production is refused with a loud log line rather than silently
    /// honored or silently dropped.
    pub fn validate(&self) -> Result<(), String> {
        if self.security.jwt_secret.is_empty() {
            tracing::error!("JWT_SECRET is empty; every token operation will fail");
        }

        match self.security.test_bypass {
            TestBypassPolicy::Disabled => {}
            policy if self.environment == Environment::Production => {
                tracing::error!(
                    ?policy,
                    "test bypass requested in production; the bypass branch will never activate"
                );
            }
            TestBypassPolicy::SecretGated => {
                if self.security.test_bypass_secret.is_empty() {
                    return Err(
                        "TEST_BYPASS=secret requires TEST_BYPASS_SECRET to be set".to_string()
                    );
                }
                tracing::warn!("secret-gated test bypass is active");
            }
            TestBypassPolicy::Unconditional => {
                tracing::warn!(
                    "unconditional test bypass is active; any request can assume an admin identity"
                );
            }
        }

        Ok(())
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
