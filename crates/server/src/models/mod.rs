//! Domain models for the parcel tracking service.

pub mod pagination;
pub mod parcel;
pub mod user;

pub use pagination::Pagination;
pub use parcel::{HistoryEntry, NewHistoryEntry, NewParcel, Parcel, derive_status};
pub use user::{CurrentUser, User};
