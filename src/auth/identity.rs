use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use uuid::Uuid;

use crate::auth::roles::Role;
use crate::auth::token::Claims;
use crate::error::ApiError;

/// Request-scoped identity resolved from a verified token. Built fresh per
/// request by the authenticate middleware, attached as a request extension,
/// never cached or shared across requests.
#[derive(Clone, Debug)]
pub struct Identity {
    pub user_id: Uuid,
    pub email: String,
    pub base_role: Role,
    pub active_role: Option<Role>,
}

impl Identity {
    /// Active role if the user has switched, else the base role. This is
    /// the role ordinary authorization checks run against.
    pub fn effective_role(&self) -> Role {
        self.active_role.unwrap_or(self.base_role)
    }

    /// Alias of `effective_role` kept for call sites that read `role`
    pub fn role(&self) -> Role {
        self.effective_role()
    }

    /// Allow-list check with the admin override: a base-role admin passes
    /// regardless of the list, everyone else needs their effective role in
    /// it.
    pub fn authorize(&self, allowed: &[Role]) -> Result<(), ApiError> {
        if self.base_role == Role::Admin {
            return Ok(());
        }
        if allowed.contains(&self.effective_role()) {
            return Ok(());
        }
        Err(ApiError::forbidden(format!(
            "Role '{}' is not permitted to access this resource",
            self.effective_role()
        )))
    }

    /// Base role must be admin. Deliberately not the effective role: an
    /// admin who has switched into a floor role keeps admin access.
    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.base_role == Role::Admin {
            return Ok(());
        }
        Err(ApiError::forbidden(format!(
            "Role '{}' is not permitted to access this resource",
            self.base_role
        )))
    }

    /// Effective role must be supervisor or admin. Unlike `authorize` and
    /// `require_admin` there is no base-role override here: a base-admin
    /// switched to PICKER is rejected. Pending product sign-off either way;
    /// the tests pin this behavior.
    pub fn require_supervisor(&self) -> Result<(), ApiError> {
        match self.effective_role() {
            Role::Supervisor | Role::Admin => Ok(()),
            role => Err(ApiError::forbidden(format!(
                "Role '{}' is not permitted to access this resource",
                role
            ))),
        }
    }

    /// Effective role must be picker or admin; same no-override rule as
    /// `require_supervisor`.
    pub fn require_picker(&self) -> Result<(), ApiError> {
        match self.effective_role() {
            Role::Picker | Role::Admin => Ok(()),
            role => Err(ApiError::forbidden(format!(
                "Role '{}' is not permitted to access this resource",
                role
            ))),
        }
    }
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        // The redundant effective_role claim is recomputed, never trusted
        Self {
            user_id: claims.sub,
            email: claims.email,
            base_role: claims.role,
            active_role: claims.active_role,
        }
    }
}

impl Serialize for Identity {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("Identity", 6)?;
        state.serialize_field("userId", &self.user_id)?;
        state.serialize_field("email", &self.email)?;
        state.serialize_field("role", &self.effective_role())?;
        state.serialize_field("baseRole", &self.base_role)?;
        state.serialize_field("activeRole", &self.active_role)?;
        state.serialize_field("effectiveRole", &self.effective_role())?;
        state.end()
    }
}
