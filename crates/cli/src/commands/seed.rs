//! Seed the database with demo users and parcels.
//!
//! Creates one admin, two regular users, and a handful of parcels in varied
//! lifecycle states, so a fresh deployment has something to look at. Refuses
//! to run against a database that already has users.

use rand::Rng;
use thiserror::Error;
use tracing::info;

use parceltrack_core::{Email, Location, ParcelStatus, TrackingNumber, UserRole};
use parceltrack_server::db::parcels::PgParcelStore;
use parceltrack_server::db::users::UserRepository;
use parceltrack_server::db::{ParcelStore, RepositoryError};
use parceltrack_server::models::{NewHistoryEntry, NewParcel};
use parceltrack_server::services::auth;

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    /// Connection setup failed.
    #[error(transparent)]
    Connect(#[from] super::ConnectError),

    /// The database already holds data.
    #[error("Database is not empty; refusing to seed")]
    NotEmpty,

    /// Generated seed data failed its own validation.
    #[error("Invalid seed data: {0}")]
    InvalidData(String),

    /// Database error.
    #[error("Database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Query error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Demo locations a parcel can move through.
const WAYPOINTS: &[(&str, f64, f64)] = &[
    ("Lagos Sorting Facility", 6.5244, 3.3792),
    ("Abuja Distribution Center", 9.0765, 7.3986),
    ("Kano Regional Hub", 12.0022, 8.5920),
    ("Port Harcourt Depot", 4.8156, 7.0498),
    ("Ibadan Transit Station", 7.3775, 3.9470),
];

/// Seed demo users and parcels.
///
/// # Errors
///
/// Returns `SeedError::NotEmpty` if any user exists already.
pub async fn run() -> Result<(), SeedError> {
    let pool = super::connect().await?;

    let user_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&pool)
        .await?;
    if user_count > 0 {
        return Err(SeedError::NotEmpty);
    }

    let users = UserRepository::new(&pool);
    let hash = |password: &str| {
        auth::hash_password(password).map_err(|e| SeedError::InvalidData(e.to_string()))
    };

    users
        .create(&parse_email("admin@parceltrack.test")?, &hash("admin-password")?, UserRole::Admin)
        .await?;
    let alice = users
        .create(&parse_email("alice@parceltrack.test")?, &hash("alice-password")?, UserRole::User)
        .await?;
    let bob = users
        .create(&parse_email("bob@parceltrack.test")?, &hash("bob-password")?, UserRole::User)
        .await?;
    info!("Created admin and 2 demo users");

    let store = PgParcelStore::new(pool);
    let mut rng = rand::rng();

    for (i, owner) in [alice.id, bob.id, alice.id, bob.id, alice.id]
        .into_iter()
        .enumerate()
    {
        let tracking_number = parse_tracking(&format!(
            "TRK{:07}",
            rng.random_range(0..10_000_000u32)
        ))?;
        let (name, lat, lon) = WAYPOINTS[i % WAYPOINTS.len()];
        let origin = Location::new(name, lat, lon)
            .map_err(|e| SeedError::InvalidData(e.to_string()))?;

        let parcel = store
            .create(NewParcel {
                tracking_number,
                owner_id: owner,
                status: ParcelStatus::PickedUp,
                initial_location: origin,
            })
            .await?;

        // Walk the first few parcels further through the lifecycle
        let hops = i.min(3);
        let mut status = ParcelStatus::PickedUp;
        for hop in 0..hops {
            status = match hop {
                0 => ParcelStatus::InTransit,
                1 => ParcelStatus::OutForDelivery,
                _ => ParcelStatus::Delivered,
            };
            let (name, lat, lon) = WAYPOINTS[(i + hop + 1) % WAYPOINTS.len()];
            let location = Location::new(name, lat, lon)
                .map_err(|e| SeedError::InvalidData(e.to_string()))?;
            store
                .append_entry(parcel.id, NewHistoryEntry { location, status }, status)
                .await?;
        }

        info!(
            tracking_number = %parcel.tracking_number,
            status = %status,
            "Seeded parcel"
        );
    }

    info!("Seeding complete; admin login: admin@parceltrack.test / admin-password");
    Ok(())
}

fn parse_email(raw: &str) -> Result<Email, SeedError> {
    Email::parse(raw).map_err(|e| SeedError::InvalidData(e.to_string()))
}

fn parse_tracking(raw: &str) -> Result<TrackingNumber, SeedError> {
    TrackingNumber::parse(raw).map_err(|e| SeedError::InvalidData(e.to_string()))
}
