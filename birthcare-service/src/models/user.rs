//! User model and the closed role set.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Caller role. A closed enum rather than free-form role ids: every
/// capability check is an explicit match, and unknown tokens fail parsing
/// instead of silently mapping to a default privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Owner,
    Staff,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Owner => "owner",
            Role::Staff => "staff",
        }
    }

    pub fn from_string(s: &str) -> Self {
        Self::parse(s).unwrap_or(Role::Staff)
    }

    /// Strict parse for token claims and the role-administration endpoint.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Role::Admin),
            "owner" => Some(Role::Owner),
            "staff" => Some(Role::Staff),
            _ => None,
        }
    }

    /// Only platform admins review facility applications.
    pub fn can_review_applications(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Admins are not tenants; the subscription gate does not apply to them.
    pub fn bypasses_subscription_gate(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// User record. Credentials live with the external identity provider; this
/// table carries only what billing and review need.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub user_id: Uuid,
    pub email: String,
    pub display_name: String,
    pub role: String,
    pub created_utc: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_round_trip_through_strings() {
        for role in [Role::Admin, Role::Owner, Role::Staff] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
    }

    #[test]
    fn unknown_role_fails_strict_parse_and_defaults_to_staff() {
        assert_eq!(Role::parse("superuser"), None);
        assert_eq!(Role::from_string("superuser"), Role::Staff);
    }

    #[test]
    fn only_admin_reviews_and_bypasses_the_gate() {
        assert!(Role::Admin.can_review_applications());
        assert!(Role::Admin.bypasses_subscription_gate());
        for role in [Role::Owner, Role::Staff] {
            assert!(!role.can_review_applications());
            assert!(!role.bypasses_subscription_gate());
        }
    }
}
