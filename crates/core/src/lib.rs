//! Parceltrack Core - Shared types library.
//!
//! This crate provides common types used across all Parceltrack components:
//! - `server` - REST API serving parcel tracking data
//! - `cli` - Command-line tools for migrations, admin bootstrap, and seeding
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, tracking
//!   numbers, statuses, and locations

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
