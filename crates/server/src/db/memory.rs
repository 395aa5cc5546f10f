//! In-memory [`ParcelStore`] used by service unit tests.
//!
//! Mirrors the Postgres implementation's observable behavior: server-assigned
//! timestamps, unique tracking numbers, newest-update-first listing.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use parceltrack_core::{HistoryEntryId, ParcelId, ParcelStatus, TrackingNumber};

use super::{ParcelStore, RepositoryError};
use crate::models::{HistoryEntry, NewHistoryEntry, NewParcel, Parcel};
use crate::services::access::ListScope;

/// Test-only store over a mutex-guarded vector.
#[derive(Default)]
pub struct MemoryParcelStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    parcels: Vec<Parcel>,
    next_parcel_id: i32,
    next_entry_id: i32,
}

impl Inner {
    fn next_parcel_id(&mut self) -> ParcelId {
        self.next_parcel_id += 1;
        ParcelId::new(self.next_parcel_id)
    }

    fn next_entry_id(&mut self) -> HistoryEntryId {
        self.next_entry_id += 1;
        HistoryEntryId::new(self.next_entry_id)
    }
}

impl MemoryParcelStore {
    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        #[allow(clippy::unwrap_used)] // test helper; poisoned lock means a test already failed
        self.inner.lock().unwrap()
    }
}

#[async_trait]
impl ParcelStore for MemoryParcelStore {
    async fn create(&self, new: NewParcel) -> Result<Parcel, RepositoryError> {
        let mut inner = self.lock();

        if inner
            .parcels
            .iter()
            .any(|p| p.tracking_number == new.tracking_number)
        {
            return Err(RepositoryError::Conflict(
                "tracking number already exists".to_owned(),
            ));
        }

        let now = Utc::now();
        let id = inner.next_parcel_id();
        let entry = HistoryEntry {
            id: inner.next_entry_id(),
            location: new.initial_location,
            status: new.status,
            timestamp: now,
        };
        let parcel = Parcel {
            id,
            tracking_number: new.tracking_number,
            owner_id: new.owner_id,
            status: new.status,
            history: vec![entry],
            created_at: now,
            updated_at: now,
        };

        inner.parcels.push(parcel.clone());
        Ok(parcel)
    }

    async fn append_entry(
        &self,
        parcel_id: ParcelId,
        entry: NewHistoryEntry,
        derived_status: ParcelStatus,
    ) -> Result<Parcel, RepositoryError> {
        let mut inner = self.lock();
        let entry_id = inner.next_entry_id();

        let parcel = inner
            .parcels
            .iter_mut()
            .find(|p| p.id == parcel_id)
            .ok_or(RepositoryError::NotFound)?;

        parcel.history.push(HistoryEntry {
            id: entry_id,
            location: entry.location,
            status: entry.status,
            timestamp: Utc::now(),
        });
        parcel.status = derived_status;
        parcel.updated_at = Utc::now();

        Ok(parcel.clone())
    }

    async fn find_by_tracking_number(
        &self,
        tracking_number: &TrackingNumber,
    ) -> Result<Option<Parcel>, RepositoryError> {
        Ok(self
            .lock()
            .parcels
            .iter()
            .find(|p| &p.tracking_number == tracking_number)
            .cloned())
    }

    async fn find_by_id(&self, id: ParcelId) -> Result<Option<Parcel>, RepositoryError> {
        Ok(self.lock().parcels.iter().find(|p| p.id == id).cloned())
    }

    async fn list(
        &self,
        scope: ListScope,
        status: Option<ParcelStatus>,
        page: u32,
        page_size: u32,
    ) -> Result<(Vec<Parcel>, u64), RepositoryError> {
        let inner = self.lock();

        let mut matching: Vec<Parcel> = inner
            .parcels
            .iter()
            .filter(|p| match scope {
                ListScope::All => true,
                ListScope::Owner(owner_id) => p.owner_id == owner_id,
            })
            .filter(|p| status.is_none_or(|s| p.status == s))
            .cloned()
            .collect();

        matching.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

        let total = matching.len() as u64;
        let offset = page.saturating_sub(1) as usize * page_size as usize;
        let items: Vec<Parcel> = matching
            .into_iter()
            .skip(offset)
            .take(page_size as usize)
            .collect();

        Ok((items, total))
    }

    async fn exists_by_tracking_number(
        &self,
        tracking_number: &TrackingNumber,
    ) -> Result<bool, RepositoryError> {
        Ok(self
            .lock()
            .parcels
            .iter()
            .any(|p| &p.tracking_number == tracking_number))
    }
}
