//! Account roles

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Role of the person using the system
///
/// Ordered from least to most privileged. Unknown role strings decode as
/// `Guest` so a malformed profile never grants access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    /// Not signed in
    #[default]
    Guest,
    /// Signed-in organizer, read-mostly
    User,
    /// Sabha administrator
    Admin,
    /// Full access including import and user management
    SuperAdmin,
}

impl Role {
    /// All roles, least privileged first
    pub const ALL: [Role; 4] = [Role::Guest, Role::User, Role::Admin, Role::SuperAdmin];

    /// Stored string form
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Guest => "guest",
            Role::User => "user",
            Role::Admin => "admin",
            Role::SuperAdmin => "super_admin",
        }
    }

    /// Admin or super admin
    #[inline]
    #[must_use]
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin | Role::SuperAdmin)
    }

    /// Parse strictly, rejecting unknown names
    #[must_use]
    pub fn parse_strict(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == value.trim())
    }
}

impl FromStr for Role {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse_strict(s).unwrap_or(Role::Guest))
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        Self::parse_strict(&value).unwrap_or(Role::Guest)
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_role_is_guest() {
        assert_eq!("root".parse::<Role>().unwrap(), Role::Guest);
        let role: Role = serde_json::from_str("\"wizard\"").unwrap();
        assert_eq!(role, Role::Guest);
    }

    #[test]
    fn round_trips_stored_names() {
        for role in Role::ALL {
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{}\"", role.as_str()));
            let back: Role = serde_json::from_str(&json).unwrap();
            assert_eq!(back, role);
        }
    }

    #[test]
    fn admin_classification() {
        assert!(Role::SuperAdmin.is_admin());
        assert!(Role::Admin.is_admin());
        assert!(!Role::User.is_admin());
        assert!(Role::Guest < Role::SuperAdmin);
    }
}
