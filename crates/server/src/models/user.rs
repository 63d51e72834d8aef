//! Admin user model and session keys.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use alto_core::UserId;

/// An admin user. The password hash never leaves the storage layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// The admin identity stored in the session after login.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrentAdmin {
    pub user_id: UserId,
    pub username: String,
}

impl From<&User> for CurrentAdmin {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
        }
    }
}

/// Session storage keys.
pub mod session_keys {
    /// Key for the logged-in admin ([`super::CurrentAdmin`]).
    pub const CURRENT_ADMIN: &str = "current_admin";
}
