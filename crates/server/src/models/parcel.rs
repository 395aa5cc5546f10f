//! Parcel and history models.
//!
//! A parcel owns an ordered, append-only sequence of history entries. The
//! parcel's `status` is derived state: it always equals the status of the
//! last history entry, recomputed through [`derive_status`] by the lifecycle
//! service after every mutation rather than by a storage-side hook.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use parceltrack_core::{HistoryEntryId, Location, ParcelId, ParcelStatus, TrackingNumber, UserId};

/// One immutable status observation at a location.
///
/// Entries are never edited or removed once appended. The sequence order of
/// a parcel's history is append order; `timestamp` is server-assigned at
/// append time and is not what the ordering is based on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: HistoryEntryId,
    pub location: Location,
    pub status: ParcelStatus,
    pub timestamp: DateTime<Utc>,
}

/// A tracked parcel.
///
/// Invariants:
/// - `history` is never empty (creation seeds exactly one entry)
/// - `status` equals the status of the last history entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parcel {
    pub id: ParcelId,
    pub tracking_number: TrackingNumber,
    pub owner_id: UserId,
    pub status: ParcelStatus,
    pub history: Vec<HistoryEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Parcel {
    /// The location of the most recent history entry.
    ///
    /// Returns `None` on an empty history, which the creation invariant
    /// rules out.
    #[must_use]
    pub fn current_location(&self) -> Option<&Location> {
        self.history.last().map(|entry| &entry.location)
    }

    /// The most recent history entry.
    #[must_use]
    pub fn latest_entry(&self) -> Option<&HistoryEntry> {
        self.history.last()
    }

    /// Cosmetic tracking number form, grouped into 4-character blocks.
    #[must_use]
    pub fn formatted_tracking_number(&self) -> String {
        self.tracking_number.formatted()
    }
}

/// Derive a parcel's status from its history: the last entry wins.
///
/// Returns `None` for an empty history, which the creation invariant rules
/// out; callers treat that as corruption rather than a normal state.
#[must_use]
pub fn derive_status(history: &[HistoryEntry]) -> Option<ParcelStatus> {
    history.last().map(|entry| entry.status)
}

/// Input for creating a parcel with its seed history entry.
#[derive(Debug, Clone)]
pub struct NewParcel {
    pub tracking_number: TrackingNumber,
    pub owner_id: UserId,
    pub status: ParcelStatus,
    pub initial_location: Location,
}

/// Input for appending one history entry.
///
/// The timestamp is assigned by the store at insert time, keeping the audit
/// order trustworthy regardless of caller clocks.
#[derive(Debug, Clone)]
pub struct NewHistoryEntry {
    pub location: Location,
    pub status: ParcelStatus,
}
