//! Parceltrack server library.
//!
//! The REST API behind the parcel tracking frontend, exposed as a library so
//! the CLI and integration tests can reuse the repositories and services.
//!
//! # Architecture
//!
//! - Axum web framework serving a JSON API
//! - `PostgreSQL` via sqlx for users, parcels, and history
//! - JWT bearer tokens for authentication, argon2 for password storage
//!
//! # Modules
//!
//! - [`config`] - Environment configuration
//! - [`db`] - Connection pool, repositories, and the [`db::ParcelStore`] trait
//! - [`models`] - Domain models (`Parcel`, `HistoryEntry`, `User`, pagination)
//! - [`services`] - Parcel lifecycle manager, access policy, authentication
//! - [`middleware`] - Auth extractors and request-id propagation
//! - [`routes`] - HTTP handlers
//! - [`validation`] - Request payload validation with field-level errors

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod validation;
