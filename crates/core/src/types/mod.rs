//! Core types for Parceltrack.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod location;
pub mod status;
pub mod tracking;

pub use email::{Email, EmailError};
pub use id::*;
pub use location::{Location, LocationError};
pub use status::{ParcelStatus, UserRole};
pub use tracking::{TrackingNumber, TrackingNumberError};
