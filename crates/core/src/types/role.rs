//! Portal roles.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a string is not one of the four role names.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid role: {0}")]
pub struct RoleParseError(pub String);

/// The role of an authenticated portal user.
///
/// A role decides which dashboard a session lands on and which route trees
/// it may enter. The wire names (`systemAdmin`, `schoolAdmin`, `teacher`,
/// `parent`) are what gets persisted in session storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    /// Platform operator managing every school.
    SystemAdmin,
    /// Administrator of a single school.
    SchoolAdmin,
    /// Teacher of one or more courses.
    Teacher,
    /// Parent or guardian of enrolled students.
    Parent,
}

impl Role {
    /// Every role, in navigation order.
    pub const ALL: [Self; 4] = [
        Self::SystemAdmin,
        Self::SchoolAdmin,
        Self::Teacher,
        Self::Parent,
    ];

    /// The persisted wire name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SystemAdmin => "systemAdmin",
            Self::SchoolAdmin => "schoolAdmin",
            Self::Teacher => "teacher",
            Self::Parent => "parent",
        }
    }

    /// Route prefix of the role's page tree, which is also its landing route.
    #[must_use]
    pub const fn landing_route(self) -> &'static str {
        match self {
            Self::SystemAdmin => "/system-admin",
            Self::SchoolAdmin => "/school-admin",
            Self::Teacher => "/teacher",
            Self::Parent => "/parent",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| RoleParseError(s.to_owned()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_round_trip() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let json = serde_json::to_string(&Role::SchoolAdmin).unwrap();
        assert_eq!(json, "\"schoolAdmin\"");
        let role: Role = serde_json::from_str("\"systemAdmin\"").unwrap();
        assert_eq!(role, Role::SystemAdmin);
    }

    #[test]
    fn test_unknown_role_rejected() {
        assert_eq!(
            "guest".parse::<Role>(),
            Err(RoleParseError("guest".to_string()))
        );
        // Case matters for persisted values
        assert!("Teacher".parse::<Role>().is_err());
    }

    #[test]
    fn test_landing_routes_are_distinct() {
        let routes: std::collections::HashSet<_> =
            Role::ALL.iter().map(|r| r.landing_route()).collect();
        assert_eq!(routes.len(), Role::ALL.len());
        assert_eq!(Role::Parent.landing_route(), "/parent");
    }
}
