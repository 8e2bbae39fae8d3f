use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of warehouse roles. Tokens carry these as uppercase strings;
/// anything outside the set fails at decode time instead of leaking through
/// role checks as an unrecognized string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Supervisor,
    Picker,
    Receiver,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Supervisor => "SUPERVISOR",
            Role::Picker => "PICKER",
            Role::Receiver => "RECEIVER",
        }
    }

    /// Issuance-time entitlement rule for active-role switching. Admins may
    /// operate under any role; supervisors may step down into the floor
    /// roles they oversee; everyone else is limited to their own base role.
    pub fn may_assume(self, target: Role) -> bool {
        match self {
            Role::Admin => true,
            Role::Supervisor => {
                matches!(target, Role::Supervisor | Role::Picker | Role::Receiver)
            }
            other => target == other,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ADMIN" => Ok(Role::Admin),
            "SUPERVISOR" => Ok(Role::Supervisor),
            "PICKER" => Ok(Role::Picker),
            "RECEIVER" => Ok(Role::Receiver),
            other => Err(format!("Unknown role '{}'", other)),
        }
    }
}
