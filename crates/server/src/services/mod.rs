//! Business services for the parcel tracker.
//!
//! - [`access`] - Pure authorization rules
//! - [`auth`] - Registration, login, password hashing, JWT issuance
//! - [`parcels`] - Parcel lifecycle manager (create, append, read, list)

pub mod access;
pub mod auth;
pub mod parcels;

pub use auth::{AuthError, AuthService};
pub use parcels::{ParcelError, ParcelService};
