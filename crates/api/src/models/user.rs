//! User domain types.
//!
//! Authentication itself lives upstream (the identity provider); these types
//! carry the role and moderation status that gate what a caller may do.

use chrono::{DateTime, Utc};
use serde::Serialize;

use shopdex_core::{UserId, UserRole, UserStatus};

/// A registered user (domain type).
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Subject identifier from the upstream identity provider.
    pub subject: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    /// `member` or `admin`.
    pub role: UserRole,
    /// Account moderation status; only approved members may create shops.
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Whether this account may create shop listings.
    #[must_use]
    pub fn may_create_shops(&self) -> bool {
        self.role.is_admin() || self.status == UserStatus::Approved
    }
}
