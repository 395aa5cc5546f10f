//! User model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use parceltrack_core::{Email, UserId, UserRole};

/// A registered user.
///
/// The password hash is deliberately not part of this model; repositories
/// return it separately only where verification needs it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The authenticated caller, as resolved by the auth middleware.
///
/// Loaded fresh from the database on each request so that deactivated
/// accounts and role changes take effect immediately, not at token expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub email: Email,
    pub role: UserRole,
}

impl CurrentUser {
    /// Returns true if the caller holds the admin role.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            role: user.role,
        }
    }
}
