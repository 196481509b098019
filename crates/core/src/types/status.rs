//! Status and role enums for shops and users.
//!
//! Both shops and member accounts move through the same moderation lifecycle:
//! they start `pending`, and an admin either approves or rejects them.
//! Re-review is allowed (an admin may approve a previously rejected record and
//! vice versa) but is always an explicit action.

use serde::{Deserialize, Serialize};

/// Moderation status of a shop listing.
///
/// Only `Approved` shops are visible through public read paths; owners see
/// their own shops regardless of status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "shop_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum ShopStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ShopStatus {
    /// Whether an admin may move a shop into this status.
    ///
    /// `pending` is the creation-time status only; moderation never moves a
    /// shop back to it. Approve/reject are valid from any current status,
    /// which covers both first review and explicit re-review.
    #[must_use]
    pub const fn is_valid_review_target(self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

impl std::fmt::Display for ShopStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

impl std::str::FromStr for ShopStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(format!("invalid shop status: {s}")),
        }
    }
}

/// Moderation status of a member account.
///
/// Gates whether the member may create shops: only `Approved` accounts can
/// submit listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "user_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl UserStatus {
    /// Whether an admin may move an account into this status.
    #[must_use]
    pub const fn is_valid_review_target(self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

impl std::str::FromStr for UserStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(format!("invalid user status: {s}")),
        }
    }
}

/// User role with different permission levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "user_role", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Regular member: may submit and manage their own shops.
    #[default]
    Member,
    /// Admin: moderates shops and accounts, sees everything.
    Admin,
}

impl UserRole {
    /// Whether this role carries admin privileges.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Member => write!(f, "member"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "member" => Ok(Self::Member),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("invalid user role: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_shop_status_default_is_pending() {
        assert_eq!(ShopStatus::default(), ShopStatus::Pending);
    }

    #[test]
    fn test_shop_status_review_targets() {
        assert!(ShopStatus::Approved.is_valid_review_target());
        assert!(ShopStatus::Rejected.is_valid_review_target());
        // Moderation never moves a shop back to pending.
        assert!(!ShopStatus::Pending.is_valid_review_target());
    }

    #[test]
    fn test_shop_status_roundtrip() {
        for status in [ShopStatus::Pending, ShopStatus::Approved, ShopStatus::Rejected] {
            let parsed = ShopStatus::from_str(&status.to_string()).expect("parse");
            assert_eq!(parsed, status);
        }
        assert!(ShopStatus::from_str("bogus").is_err());
    }

    #[test]
    fn test_shop_status_serde_snake_case() {
        let json = serde_json::to_string(&ShopStatus::Approved).expect("serialize");
        assert_eq!(json, "\"approved\"");
    }

    #[test]
    fn test_user_role_parse() {
        assert_eq!(UserRole::from_str("admin").expect("parse"), UserRole::Admin);
        assert_eq!(UserRole::from_str("member").expect("parse"), UserRole::Member);
        assert!(UserRole::from_str("superuser").is_err());
        assert!(UserRole::Admin.is_admin());
        assert!(!UserRole::Member.is_admin());
    }
}
