//! Parcel route handlers.
//!
//! JSON API over the parcel lifecycle manager. Payload fields are camelCase
//! to match the frontend; every create/update payload is validated field by
//! field before any service call, and all failures come back at once.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use parceltrack_core::{
    Location, ParcelId, ParcelStatus, TrackingNumber, UserId,
};

use crate::db::users::UserRepository;
use crate::error::{AppError, Result};
use crate::middleware::{RequireAdmin, RequireAuth};
use crate::models::{HistoryEntry, Pagination, Parcel};
use crate::services::parcels::{DEFAULT_PAGE_SIZE, ParcelError, ParcelService};
use crate::state::AppState;
use crate::validation::Validator;

use super::ApiResponse;

/// Largest page size a client may request.
const MAX_PAGE_SIZE: u32 = 100;

// =============================================================================
// Response types
// =============================================================================

/// A parcel as the API presents it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParcelData {
    pub id: ParcelId,
    pub tracking_number: String,
    pub formatted_tracking_number: String,
    pub owner_id: UserId,
    pub status: ParcelStatus,
    pub current_location: Option<LocationData>,
    pub history: Vec<HistoryEntryData>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A point in a parcel's history, flattened for the client.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntryData {
    pub id: i32,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub status: ParcelStatus,
    pub timestamp: DateTime<Utc>,
}

/// The most recent location, with the time it was observed.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationData {
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: DateTime<Utc>,
}

impl From<&HistoryEntry> for HistoryEntryData {
    fn from(entry: &HistoryEntry) -> Self {
        Self {
            id: entry.id.as_i32(),
            location: entry.location.description().to_owned(),
            latitude: entry.location.latitude(),
            longitude: entry.location.longitude(),
            status: entry.status,
            timestamp: entry.timestamp,
        }
    }
}

impl From<&Parcel> for ParcelData {
    fn from(parcel: &Parcel) -> Self {
        let current_location = parcel.latest_entry().map(|entry| LocationData {
            location: entry.location.description().to_owned(),
            latitude: entry.location.latitude(),
            longitude: entry.location.longitude(),
            timestamp: entry.timestamp,
        });

        Self {
            id: parcel.id,
            tracking_number: parcel.tracking_number.to_string(),
            formatted_tracking_number: parcel.formatted_tracking_number(),
            owner_id: parcel.owner_id,
            status: parcel.status,
            current_location,
            history: parcel.history.iter().map(HistoryEntryData::from).collect(),
            created_at: parcel.created_at,
            updated_at: parcel.updated_at,
        }
    }
}

/// Listing payload: one page of parcels plus the pagination envelope.
#[derive(Debug, Serialize)]
pub struct ParcelListData {
    pub parcels: Vec<ParcelData>,
    pub pagination: Pagination,
}

// =============================================================================
// Create
// =============================================================================

/// Request to create a parcel.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateParcelRequest {
    pub tracking_number: Option<String>,
    pub status: Option<String>,
    pub initial_history: Option<LocationRequest>,
    /// Owner to assign. Defaults to the creating admin.
    pub user_id: Option<i32>,
}

/// A location as clients send it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRequest {
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Validate a location payload, attributing failures to `prefix`-ed fields.
fn validate_location(v: &mut Validator, prefix: &str, raw: &LocationRequest) -> Option<Location> {
    let description = v.require(&format!("{prefix}location"), raw.location.as_deref());
    let latitude = v.require(&format!("{prefix}latitude"), raw.latitude);
    let longitude = v.require(&format!("{prefix}longitude"), raw.longitude);

    let (description, latitude, longitude) = (description?, latitude?, longitude?);

    match Location::new(description, latitude, longitude) {
        Ok(location) => Some(location),
        Err(e) => {
            use parceltrack_core::LocationError;
            let field = match e {
                LocationError::EmptyDescription => format!("{prefix}location"),
                LocationError::LatitudeOutOfRange => format!("{prefix}latitude"),
                LocationError::LongitudeOutOfRange => format!("{prefix}longitude"),
            };
            v.fail(&field, e.to_string());
            None
        }
    }
}

/// `POST /api/parcels`
///
/// Admin-only. Creates a parcel with its first history entry. A missing
/// `userId` assigns the parcel to the creating admin.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(payload): Json<CreateParcelRequest>,
) -> Result<impl IntoResponse> {
    let mut v = Validator::new();

    let tracking_number = v
        .require("trackingNumber", payload.tracking_number.as_deref())
        .and_then(|raw| v.check("trackingNumber", TrackingNumber::parse(raw)));
    let status = v
        .require("status", payload.status.as_deref())
        .and_then(|raw| v.check("status", raw.parse::<ParcelStatus>()));
    let location = match payload.initial_history.as_ref() {
        Some(raw) => validate_location(&mut v, "initialHistory.", raw),
        None => {
            v.fail("initialHistory", "initialHistory is required");
            None
        }
    };

    v.finish().map_err(AppError::Validation)?;
    let (Some(tracking_number), Some(status), Some(location)) = (tracking_number, status, location)
    else {
        return Err(AppError::Internal("validation passed with missing fields".to_owned()));
    };

    // A missing userId assigns the parcel to the creating admin; an unknown
    // one is a 404, matching the owner-assignment flow in the admin UI.
    let owner_id = match payload.user_id {
        Some(id) => {
            UserRepository::new(state.pool())
                .get_by_id(UserId::new(id))
                .await?
                .ok_or_else(|| AppError::NotFound("User".to_owned()))?
                .id
        }
        None => admin.id,
    };

    let parcel = ParcelService::new(state.parcels())
        .create(&admin, tracking_number, owner_id, status, location)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Parcel created successfully",
            ParcelData::from(&parcel),
        )),
    ))
}

// =============================================================================
// Read
// =============================================================================

/// `GET /api/parcels/{trackingNumber}`
///
/// Fetch a single parcel. An unparseable tracking number cannot name any
/// parcel, so it reads as not found rather than a validation failure.
pub async fn get_by_tracking_number(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(raw): Path<String>,
) -> Result<Json<ApiResponse<ParcelData>>> {
    let tracking_number =
        TrackingNumber::parse(&raw).map_err(|_| AppError::Parcel(ParcelError::NotFound))?;

    let parcel = ParcelService::new(state.parcels())
        .get_by_tracking_number(&user, &tracking_number)
        .await?;

    Ok(Json(ApiResponse::ok(ParcelData::from(&parcel))))
}

// =============================================================================
// Status update
// =============================================================================

/// Request to append a status update to a parcel.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub status: Option<String>,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// `PUT /api/parcels/{id}/status`
///
/// Append a history entry; the parcel's status follows it. Owner or admin
/// only, with invisible parcels reading as 404.
pub async fn update_status(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<ApiResponse<ParcelData>>> {
    let mut v = Validator::new();

    let status = v
        .require("status", payload.status.as_deref())
        .and_then(|raw| v.check("status", raw.parse::<ParcelStatus>()));
    let location = validate_location(
        &mut v,
        "",
        &LocationRequest {
            location: payload.location,
            latitude: payload.latitude,
            longitude: payload.longitude,
        },
    );

    v.finish().map_err(AppError::Validation)?;
    let (Some(status), Some(location)) = (status, location) else {
        return Err(AppError::Internal("validation passed with missing fields".to_owned()));
    };

    let parcel = ParcelService::new(state.parcels())
        .append_status(&user, ParcelId::new(id), status, location)
        .await?;

    Ok(Json(ApiResponse::with_message(
        "Parcel status updated",
        ParcelData::from(&parcel),
    )))
}

// =============================================================================
// List
// =============================================================================

/// Query parameters for the parcel listing.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<String>,
}

/// `GET /api/parcels?page&limit&status`
///
/// Admins see every parcel; everyone else sees their own. Sorted by most
/// recent update.
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<ParcelListData>>> {
    let mut v = Validator::new();
    let status = query
        .status
        .as_deref()
        .and_then(|raw| v.check("status", raw.parse::<ParcelStatus>()));
    v.finish().map_err(AppError::Validation)?;

    let page = query.page.unwrap_or(1);
    let page_size = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE);

    let (parcels, pagination) = ParcelService::new(state.parcels())
        .list(&user, status, page, page_size)
        .await?;

    Ok(Json(ApiResponse::ok(ParcelListData {
        parcels: parcels.iter().map(ParcelData::from).collect(),
        pagination,
    })))
}
