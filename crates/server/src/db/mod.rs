//! Database operations for the parcel tracker.
//!
//! ## Tables
//!
//! - `users` - Accounts and password hashes
//! - `parcels` - One row per parcel; `status` mirrors the latest history row
//! - `parcel_history` - Append-only status observations
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p parceltrack-cli -- migrate
//! ```

pub mod parcels;
pub mod users;

#[cfg(test)]
pub mod memory;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use parceltrack_core::{ParcelId, ParcelStatus, TrackingNumber};

use crate::models::{NewHistoryEntry, NewParcel, Parcel};
use crate::services::access::ListScope;

pub use parcels::PgParcelStore;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique tracking number).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Persistence boundary for parcels.
///
/// The lifecycle service consumes this trait rather than a concrete
/// repository so its invariants can be exercised against an in-memory store
/// in tests. [`PgParcelStore`] is the production implementation.
#[async_trait]
pub trait ParcelStore: Send + Sync {
    /// Persist a new parcel together with its seed history entry.
    ///
    /// The entry's timestamp is assigned by the store at insert time.
    async fn create(&self, new: NewParcel) -> Result<Parcel, RepositoryError>;

    /// Append one history entry and set the parcel's derived status.
    ///
    /// Both writes happen atomically; returns the updated parcel.
    async fn append_entry(
        &self,
        parcel_id: ParcelId,
        entry: NewHistoryEntry,
        derived_status: ParcelStatus,
    ) -> Result<Parcel, RepositoryError>;

    /// Look a parcel up by its (already normalized) tracking number.
    async fn find_by_tracking_number(
        &self,
        tracking_number: &TrackingNumber,
    ) -> Result<Option<Parcel>, RepositoryError>;

    /// Look a parcel up by id.
    async fn find_by_id(&self, id: ParcelId) -> Result<Option<Parcel>, RepositoryError>;

    /// Page through parcels within a visibility scope, newest update first.
    ///
    /// Returns the page of parcels and the total match count.
    async fn list(
        &self,
        scope: ListScope,
        status: Option<ParcelStatus>,
        page: u32,
        page_size: u32,
    ) -> Result<(Vec<Parcel>, u64), RepositoryError>;

    /// Whether a parcel with this tracking number already exists.
    async fn exists_by_tracking_number(
        &self,
        tracking_number: &TrackingNumber,
    ) -> Result<bool, RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
