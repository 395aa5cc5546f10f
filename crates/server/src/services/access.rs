//! Access policy: who may see and mutate which parcels.
//!
//! Pure functions over the caller and parcel; the rules here are also what
//! the list queries encode as owner scoping. Callers that fail a read or
//! append check receive `NotFound` at the API boundary, never `Forbidden`,
//! so the existence of other users' parcels does not leak.

use parceltrack_core::UserId;

use crate::models::{CurrentUser, Parcel};

/// Visibility scope for parcel listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListScope {
    /// Every parcel (admin).
    All,
    /// Only parcels owned by this user.
    Owner(UserId),
}

/// May the caller read this parcel? Admins and the owner may.
#[must_use]
pub fn can_read(user: &CurrentUser, parcel: &Parcel) -> bool {
    user.is_admin() || parcel.owner_id == user.id
}

/// May the caller append a status update? Same rule as reading.
#[must_use]
pub fn can_append(user: &CurrentUser, parcel: &Parcel) -> bool {
    can_read(user, parcel)
}

/// May the caller create brand-new parcels? Admins only.
#[must_use]
pub fn can_create(user: &CurrentUser) -> bool {
    user.is_admin()
}

/// The listing scope for this caller: admins see everything, everyone else
/// sees only their own parcels.
#[must_use]
pub fn list_scope(user: &CurrentUser) -> ListScope {
    if user.is_admin() {
        ListScope::All
    } else {
        ListScope::Owner(user.id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use parceltrack_core::{Email, ParcelId, ParcelStatus, TrackingNumber, UserRole};

    fn user(id: i32, role: UserRole) -> CurrentUser {
        CurrentUser {
            id: UserId::new(id),
            email: Email::parse(&format!("user{id}@example.com")).unwrap(),
            role,
        }
    }

    fn parcel_owned_by(owner: i32) -> Parcel {
        Parcel {
            id: ParcelId::new(1),
            tracking_number: TrackingNumber::parse("TRK0012345").unwrap(),
            owner_id: UserId::new(owner),
            status: ParcelStatus::PickedUp,
            history: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_owner_can_read_and_append() {
        let owner = user(1, UserRole::User);
        let parcel = parcel_owned_by(1);
        assert!(can_read(&owner, &parcel));
        assert!(can_append(&owner, &parcel));
    }

    #[test]
    fn test_stranger_cannot_read_or_append() {
        let stranger = user(2, UserRole::User);
        let parcel = parcel_owned_by(1);
        assert!(!can_read(&stranger, &parcel));
        assert!(!can_append(&stranger, &parcel));
    }

    #[test]
    fn test_admin_can_read_any() {
        let admin = user(99, UserRole::Admin);
        let parcel = parcel_owned_by(1);
        assert!(can_read(&admin, &parcel));
        assert!(can_append(&admin, &parcel));
    }

    #[test]
    fn test_only_admin_can_create() {
        assert!(can_create(&user(1, UserRole::Admin)));
        assert!(!can_create(&user(1, UserRole::User)));
    }

    #[test]
    fn test_list_scope() {
        assert_eq!(list_scope(&user(1, UserRole::Admin)), ListScope::All);
        assert_eq!(
            list_scope(&user(7, UserRole::User)),
            ListScope::Owner(UserId::new(7))
        );
    }
}
