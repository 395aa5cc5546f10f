//! Parcel lifecycle manager.
//!
//! Owns the two invariants of the data model:
//! - a parcel's history is append-only and never empty
//! - a parcel's `status` always equals the status of its last history entry
//!
//! Status derivation is an explicit pure function ([`derive_status`]) applied
//! around each mutation, not a storage-side hook, so the invariant is visible
//! and independently testable.
//!
//! There is intentionally no transition graph: any status may follow any
//! other (a `delivered` parcel may go back to `picked_up`). Concurrent
//! appends to the same parcel are not serialized by a version token; each
//! append is atomic in the store, but callers must not assume a global order
//! across racing requests.

mod error;

pub use error::ParcelError;

use parceltrack_core::{Location, ParcelId, ParcelStatus, TrackingNumber, UserId};

use crate::db::{ParcelStore, RepositoryError};
use crate::models::{CurrentUser, NewHistoryEntry, NewParcel, Pagination, Parcel, derive_status};
use crate::services::access;

/// Default page size for listings.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Parcel lifecycle service over a [`ParcelStore`].
pub struct ParcelService<'a, S> {
    store: &'a S,
}

impl<'a, S: ParcelStore> ParcelService<'a, S> {
    /// Create a new parcel service.
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Create a parcel with exactly one seed history entry.
    ///
    /// Admin-only. The tracking number arrives already normalized to
    /// uppercase by [`TrackingNumber::parse`], so the duplicate check is
    /// case-insensitive by construction.
    ///
    /// # Errors
    ///
    /// Returns `ParcelError::AdminRequired` if the caller is not an admin.
    /// Returns `ParcelError::DuplicateTrackingNumber` on a collision.
    pub async fn create(
        &self,
        actor: &CurrentUser,
        tracking_number: TrackingNumber,
        owner_id: UserId,
        status: ParcelStatus,
        initial_location: Location,
    ) -> Result<Parcel, ParcelError> {
        if !access::can_create(actor) {
            return Err(ParcelError::AdminRequired);
        }

        if self
            .store
            .exists_by_tracking_number(&tracking_number)
            .await?
        {
            return Err(ParcelError::DuplicateTrackingNumber);
        }

        let created = self
            .store
            .create(NewParcel {
                tracking_number,
                owner_id,
                status,
                initial_location,
            })
            .await
            .map_err(|e| match e {
                // The unique constraint closes the check-then-create race.
                RepositoryError::Conflict(_) => ParcelError::DuplicateTrackingNumber,
                other => ParcelError::Repository(other),
            })?;

        verify_derived_status(&created)?;
        Ok(created)
    }

    /// Append a status observation to a parcel's history.
    ///
    /// The entry's timestamp is server-assigned by the store. Callers that
    /// cannot see the parcel get `NotFound`, indistinguishable from a parcel
    /// that does not exist.
    ///
    /// # Errors
    ///
    /// Returns `ParcelError::NotFound` if the parcel is absent or invisible
    /// to the caller.
    pub async fn append_status(
        &self,
        actor: &CurrentUser,
        parcel_id: ParcelId,
        status: ParcelStatus,
        location: Location,
    ) -> Result<Parcel, ParcelError> {
        let parcel = self
            .store
            .find_by_id(parcel_id)
            .await?
            .ok_or(ParcelError::NotFound)?;

        if !access::can_append(actor, &parcel) {
            return Err(ParcelError::NotFound);
        }

        let entry = NewHistoryEntry { location, status };
        let updated = self.store.append_entry(parcel.id, entry, status).await?;

        verify_derived_status(&updated)?;
        Ok(updated)
    }

    /// Fetch a parcel by tracking number, subject to the access policy.
    ///
    /// # Errors
    ///
    /// Returns `ParcelError::NotFound` if the parcel is absent or invisible
    /// to the caller.
    pub async fn get_by_tracking_number(
        &self,
        actor: &CurrentUser,
        tracking_number: &TrackingNumber,
    ) -> Result<Parcel, ParcelError> {
        let parcel = self
            .store
            .find_by_tracking_number(tracking_number)
            .await?
            .ok_or(ParcelError::NotFound)?;

        if !access::can_read(actor, &parcel) {
            return Err(ParcelError::NotFound);
        }

        Ok(parcel)
    }

    /// List parcels visible to the caller, newest update first.
    ///
    /// # Errors
    ///
    /// Returns `ParcelError::Repository` if the store fails.
    pub async fn list(
        &self,
        actor: &CurrentUser,
        status: Option<ParcelStatus>,
        page: u32,
        page_size: u32,
    ) -> Result<(Vec<Parcel>, Pagination), ParcelError> {
        let page = page.max(1);
        let page_size = page_size.max(1);
        let scope = access::list_scope(actor);

        let (parcels, total) = self.store.list(scope, status, page, page_size).await?;
        let pagination = Pagination::compute(page, page_size, total);

        Ok((parcels, pagination))
    }
}

/// Check the derived-status invariant on a parcel coming back from storage.
fn verify_derived_status(parcel: &Parcel) -> Result<(), ParcelError> {
    let derived = derive_status(&parcel.history).ok_or_else(|| {
        ParcelError::Repository(RepositoryError::DataCorruption(format!(
            "parcel {} has empty history",
            parcel.id
        )))
    })?;

    if derived != parcel.status {
        return Err(ParcelError::Repository(RepositoryError::DataCorruption(
            format!(
                "parcel {} status {} does not match last history entry {}",
                parcel.id, parcel.status, derived
            ),
        )));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use parceltrack_core::{Email, UserRole};

    use crate::db::memory::MemoryParcelStore;

    fn admin() -> CurrentUser {
        CurrentUser {
            id: UserId::new(1),
            email: Email::parse("admin@example.com").unwrap(),
            role: UserRole::Admin,
        }
    }

    fn owner() -> CurrentUser {
        CurrentUser {
            id: UserId::new(2),
            email: Email::parse("owner@example.com").unwrap(),
            role: UserRole::User,
        }
    }

    fn stranger() -> CurrentUser {
        CurrentUser {
            id: UserId::new(3),
            email: Email::parse("stranger@example.com").unwrap(),
            role: UserRole::User,
        }
    }

    fn location(name: &str) -> Location {
        Location::new(name, 48.8566, 2.3522).unwrap()
    }

    fn tn(s: &str) -> TrackingNumber {
        TrackingNumber::parse(s).unwrap()
    }

    async fn create_parcel(store: &MemoryParcelStore, tracking: &str) -> Parcel {
        ParcelService::new(store)
            .create(
                &admin(),
                tn(tracking),
                owner().id,
                ParcelStatus::PickedUp,
                location("Warehouse A"),
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_seeds_single_history_entry() {
        let store = MemoryParcelStore::default();
        let parcel = create_parcel(&store, "TRK0012345").await;

        assert_eq!(parcel.history.len(), 1);
        assert_eq!(parcel.status, ParcelStatus::PickedUp);
        assert_eq!(parcel.history[0].status, ParcelStatus::PickedUp);
        assert_eq!(parcel.history[0].location.description(), "Warehouse A");
    }

    #[tokio::test]
    async fn test_create_requires_admin() {
        let store = MemoryParcelStore::default();
        let result = ParcelService::new(&store)
            .create(
                &owner(),
                tn("TRK0012345"),
                owner().id,
                ParcelStatus::PickedUp,
                location("Warehouse A"),
            )
            .await;

        assert!(matches!(result, Err(ParcelError::AdminRequired)));
    }

    #[tokio::test]
    async fn test_duplicate_tracking_number_case_insensitive() {
        let store = MemoryParcelStore::default();
        create_parcel(&store, "TRK0012345").await;

        let result = ParcelService::new(&store)
            .create(
                &admin(),
                tn("trk0012345"),
                owner().id,
                ParcelStatus::InTransit,
                location("Warehouse B"),
            )
            .await;

        assert!(matches!(result, Err(ParcelError::DuplicateTrackingNumber)));
    }

    #[tokio::test]
    async fn test_append_grows_history_and_tracks_status() {
        let store = MemoryParcelStore::default();
        let parcel = create_parcel(&store, "TRK0012345").await;
        let service = ParcelService::new(&store);

        let sequence = [
            ParcelStatus::InTransit,
            ParcelStatus::OutForDelivery,
            ParcelStatus::Delivered,
        ];
        let mut updated = parcel;
        for (i, status) in sequence.iter().enumerate() {
            updated = service
                .append_status(&owner(), updated.id, *status, location("Hub"))
                .await
                .unwrap();
            assert_eq!(updated.history.len(), i + 2);
            assert_eq!(updated.status, *status);
        }
    }

    #[tokio::test]
    async fn test_racing_appends_return_consistent_snapshots() {
        // Each append must hand back a snapshot whose status matches its own
        // history even when other appends land around it.
        let store = MemoryParcelStore::default();
        let parcel = create_parcel(&store, "TRK0012345").await;
        let service = ParcelService::new(&store);

        let current = owner();
        let (a, b, c) = tokio::join!(
            service.append_status(&current, parcel.id, ParcelStatus::InTransit, location("Hub A")),
            service.append_status(&current, parcel.id, ParcelStatus::Exception, location("Hub B")),
            service.append_status(&current, parcel.id, ParcelStatus::InTransit, location("Hub C")),
        );

        for snapshot in [a.unwrap(), b.unwrap(), c.unwrap()] {
            assert_eq!(derive_status(&snapshot.history), Some(snapshot.status));
        }

        let latest = service
            .get_by_tracking_number(&owner(), &tn("TRK0012345"))
            .await
            .unwrap();
        assert_eq!(latest.history.len(), 4);
        assert_eq!(derive_status(&latest.history), Some(latest.status));
    }

    #[tokio::test]
    async fn test_any_transition_is_allowed() {
        // No transition graph: delivered may be followed by picked_up.
        let store = MemoryParcelStore::default();
        let parcel = create_parcel(&store, "TRK0012345").await;
        let service = ParcelService::new(&store);

        let delivered = service
            .append_status(&owner(), parcel.id, ParcelStatus::Delivered, location("Door"))
            .await
            .unwrap();
        let reopened = service
            .append_status(
                &owner(),
                delivered.id,
                ParcelStatus::PickedUp,
                location("Depot"),
            )
            .await
            .unwrap();

        assert_eq!(reopened.status, ParcelStatus::PickedUp);
        assert_eq!(reopened.history.len(), 3);
    }

    #[tokio::test]
    async fn test_stranger_append_is_not_found() {
        let store = MemoryParcelStore::default();
        let parcel = create_parcel(&store, "TRK0012345").await;

        let result = ParcelService::new(&store)
            .append_status(
                &stranger(),
                parcel.id,
                ParcelStatus::Exception,
                location("Nowhere"),
            )
            .await;

        assert!(matches!(result, Err(ParcelError::NotFound)));
    }

    #[tokio::test]
    async fn test_visibility_owner_admin_stranger() {
        let store = MemoryParcelStore::default();
        create_parcel(&store, "TRK0012345").await;
        let service = ParcelService::new(&store);
        let tracking = tn("TRK0012345");

        assert!(service.get_by_tracking_number(&owner(), &tracking).await.is_ok());
        assert!(service.get_by_tracking_number(&admin(), &tracking).await.is_ok());
        assert!(matches!(
            service.get_by_tracking_number(&stranger(), &tracking).await,
            Err(ParcelError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_round_trip_create_then_read() {
        let store = MemoryParcelStore::default();
        let created = create_parcel(&store, "TRK0012345").await;

        let fetched = ParcelService::new(&store)
            .get_by_tracking_number(&owner(), &tn("TRK0012345"))
            .await
            .unwrap();

        assert_eq!(fetched.tracking_number, created.tracking_number);
        assert_eq!(fetched.status, created.status);
        assert_eq!(fetched.history.len(), 1);
    }

    #[tokio::test]
    async fn test_pagination_envelope() {
        let store = MemoryParcelStore::default();
        for i in 0..25 {
            create_parcel(&store, &format!("TRK{i:07}")).await;
        }

        let (items, pagination) = ParcelService::new(&store)
            .list(&owner(), None, 2, 10)
            .await
            .unwrap();

        assert_eq!(items.len(), 10);
        assert_eq!(pagination.current_page, 2);
        assert_eq!(pagination.total_pages, 3);
        assert_eq!(pagination.total_parcels, 25);
        assert!(pagination.has_next);
        assert!(pagination.has_prev);
    }

    #[tokio::test]
    async fn test_list_scoped_to_owner() {
        let store = MemoryParcelStore::default();
        create_parcel(&store, "TRK0012345").await;
        let service = ParcelService::new(&store);

        let (mine, _) = service.list(&owner(), None, 1, 10).await.unwrap();
        assert_eq!(mine.len(), 1);

        let (theirs, pagination) = service.list(&stranger(), None, 1, 10).await.unwrap();
        assert!(theirs.is_empty());
        assert_eq!(pagination.total_parcels, 0);

        let (all, _) = service.list(&admin(), None, 1, 10).await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn test_list_status_filter() {
        let store = MemoryParcelStore::default();
        let parcel = create_parcel(&store, "TRK0012345").await;
        create_parcel(&store, "TRK0012346").await;
        let service = ParcelService::new(&store);

        service
            .append_status(&owner(), parcel.id, ParcelStatus::Delivered, location("Door"))
            .await
            .unwrap();

        let (delivered, _) = service
            .list(&admin(), Some(ParcelStatus::Delivered), 1, 10)
            .await
            .unwrap();
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].status, ParcelStatus::Delivered);
    }
}
