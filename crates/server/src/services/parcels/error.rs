//! Parcel service error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during parcel lifecycle operations.
#[derive(Debug, Error)]
pub enum ParcelError {
    /// A parcel with this tracking number already exists.
    #[error("parcel with this tracking number already exists")]
    DuplicateTrackingNumber,

    /// Parcel absent, or not visible to the caller.
    #[error("parcel not found")]
    NotFound,

    /// Caller lacks the role for this operation (parcel creation).
    #[error("admin access required")]
    AdminRequired,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}
