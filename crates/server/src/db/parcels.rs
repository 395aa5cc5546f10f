//! Parcel store backed by `PostgreSQL`.
//!
//! Queries are runtime-checked (`query_as` with binds) so the workspace
//! builds without a live database. Row values are parsed back into domain
//! types on read; anything unparseable is surfaced as `DataCorruption`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::collections::HashMap;

use parceltrack_core::{
    HistoryEntryId, Location, ParcelId, ParcelStatus, TrackingNumber, UserId,
};

use super::{ParcelStore, RepositoryError};
use crate::models::{HistoryEntry, NewHistoryEntry, NewParcel, Parcel};
use crate::services::access::ListScope;

/// Production [`ParcelStore`] implementation over a connection pool.
#[derive(Clone)]
pub struct PgParcelStore {
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct ParcelRow {
    id: i32,
    tracking_number: String,
    owner_id: i32,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct HistoryRow {
    id: i32,
    parcel_id: i32,
    description: String,
    latitude: f64,
    longitude: f64,
    status: String,
    recorded_at: DateTime<Utc>,
}

impl HistoryRow {
    fn into_entry(self) -> Result<HistoryEntry, RepositoryError> {
        let location =
            Location::new(self.description, self.latitude, self.longitude).map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid location in database: {e}"))
            })?;
        let status: ParcelStatus = self.status.parse().map_err(|_| {
            RepositoryError::DataCorruption(format!("invalid status in database: {}", self.status))
        })?;

        Ok(HistoryEntry {
            id: HistoryEntryId::new(self.id),
            location,
            status,
            timestamp: self.recorded_at,
        })
    }
}

impl ParcelRow {
    fn into_parcel(self, history: Vec<HistoryEntry>) -> Result<Parcel, RepositoryError> {
        let tracking_number = TrackingNumber::parse(&self.tracking_number).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid tracking number in database: {e}"))
        })?;
        let status: ParcelStatus = self.status.parse().map_err(|_| {
            RepositoryError::DataCorruption(format!("invalid status in database: {}", self.status))
        })?;

        Ok(Parcel {
            id: ParcelId::new(self.id),
            tracking_number,
            owner_id: UserId::new(self.owner_id),
            status,
            history,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl PgParcelStore {
    /// Create a new parcel store over a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// History rows for a batch of parcels, grouped by parcel id.
    async fn load_history_batch(
        &self,
        parcel_ids: &[i32],
    ) -> Result<HashMap<i32, Vec<HistoryEntry>>, RepositoryError> {
        let rows = sqlx::query_as::<_, HistoryRow>(
            r"
            SELECT id, parcel_id, description, latitude, longitude, status, recorded_at
            FROM parcel_history
            WHERE parcel_id = ANY($1)
            ORDER BY parcel_id, id ASC
            ",
        )
        .bind(parcel_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: HashMap<i32, Vec<HistoryEntry>> = HashMap::new();
        for row in rows {
            let parcel_id = row.parcel_id;
            grouped
                .entry(parcel_id)
                .or_default()
                .push(row.into_entry()?);
        }

        Ok(grouped)
    }

    async fn assemble(&self, row: ParcelRow) -> Result<Parcel, RepositoryError> {
        let history = fetch_history(&self.pool, row.id).await?;
        row.into_parcel(history)
    }
}

/// History rows for one parcel, in append order.
///
/// Generic over the executor so callers inside a transaction see their own
/// uncommitted writes.
async fn fetch_history<'e, E>(
    executor: E,
    parcel_id: i32,
) -> Result<Vec<HistoryEntry>, RepositoryError>
where
    E: sqlx::PgExecutor<'e>,
{
    let rows = sqlx::query_as::<_, HistoryRow>(
        r"
        SELECT id, parcel_id, description, latitude, longitude, status, recorded_at
        FROM parcel_history
        WHERE parcel_id = $1
        ORDER BY id ASC
        ",
    )
    .bind(parcel_id)
    .fetch_all(executor)
    .await?;

    rows.into_iter().map(HistoryRow::into_entry).collect()
}

#[async_trait]
impl ParcelStore for PgParcelStore {
    async fn create(&self, new: NewParcel) -> Result<Parcel, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let parcel_row = sqlx::query_as::<_, ParcelRow>(
            r"
            INSERT INTO parcels (tracking_number, owner_id, status)
            VALUES ($1, $2, $3)
            RETURNING id, tracking_number, owner_id, status, created_at, updated_at
            ",
        )
        .bind(new.tracking_number.as_str())
        .bind(new.owner_id.as_i32())
        .bind(new.status.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("tracking number already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        let history_row = sqlx::query_as::<_, HistoryRow>(
            r"
            INSERT INTO parcel_history (parcel_id, description, latitude, longitude, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, parcel_id, description, latitude, longitude, status, recorded_at
            ",
        )
        .bind(parcel_row.id)
        .bind(new.initial_location.description())
        .bind(new.initial_location.latitude())
        .bind(new.initial_location.longitude())
        .bind(new.status.as_str())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        let history = vec![history_row.into_entry()?];
        parcel_row.into_parcel(history)
    }

    async fn append_entry(
        &self,
        parcel_id: ParcelId,
        entry: NewHistoryEntry,
        derived_status: ParcelStatus,
    ) -> Result<Parcel, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r"
            INSERT INTO parcel_history (parcel_id, description, latitude, longitude, status)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(parcel_id.as_i32())
        .bind(entry.location.description())
        .bind(entry.location.latitude())
        .bind(entry.location.longitude())
        .bind(entry.status.as_str())
        .execute(&mut *tx)
        .await?;

        let parcel_row = sqlx::query_as::<_, ParcelRow>(
            r"
            UPDATE parcels
            SET status = $1, updated_at = now()
            WHERE id = $2
            RETURNING id, tracking_number, owner_id, status, created_at, updated_at
            ",
        )
        .bind(derived_status.as_str())
        .bind(parcel_id.as_i32())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        // Read the history before committing so a racing append can't slip
        // between the write and the returned snapshot.
        let history = fetch_history(&mut *tx, parcel_id.as_i32()).await?;

        tx.commit().await?;

        parcel_row.into_parcel(history)
    }

    async fn find_by_tracking_number(
        &self,
        tracking_number: &TrackingNumber,
    ) -> Result<Option<Parcel>, RepositoryError> {
        let row = sqlx::query_as::<_, ParcelRow>(
            r"
            SELECT id, tracking_number, owner_id, status, created_at, updated_at
            FROM parcels
            WHERE tracking_number = $1
            ",
        )
        .bind(tracking_number.as_str())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(self.assemble(row).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_id(&self, id: ParcelId) -> Result<Option<Parcel>, RepositoryError> {
        let row = sqlx::query_as::<_, ParcelRow>(
            r"
            SELECT id, tracking_number, owner_id, status, created_at, updated_at
            FROM parcels
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(self.assemble(row).await?)),
            None => Ok(None),
        }
    }

    async fn list(
        &self,
        scope: ListScope,
        status: Option<ParcelStatus>,
        page: u32,
        page_size: u32,
    ) -> Result<(Vec<Parcel>, u64), RepositoryError> {
        let owner_filter: Option<i32> = match scope {
            ListScope::All => None,
            ListScope::Owner(owner_id) => Some(owner_id.as_i32()),
        };
        let status_filter: Option<&str> = status.map(|s| s.as_str());
        let limit = i64::from(page_size);
        let offset = i64::from(page.saturating_sub(1)) * i64::from(page_size);

        let rows = sqlx::query_as::<_, ParcelRow>(
            r"
            SELECT id, tracking_number, owner_id, status, created_at, updated_at
            FROM parcels
            WHERE ($1::int4 IS NULL OR owner_id = $1)
              AND ($2::text IS NULL OR status = $2)
            ORDER BY updated_at DESC
            LIMIT $3 OFFSET $4
            ",
        )
        .bind(owner_filter)
        .bind(status_filter)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r"
            SELECT COUNT(*)
            FROM parcels
            WHERE ($1::int4 IS NULL OR owner_id = $1)
              AND ($2::text IS NULL OR status = $2)
            ",
        )
        .bind(owner_filter)
        .bind(status_filter)
        .fetch_one(&self.pool)
        .await?;

        let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
        let mut histories = self.load_history_batch(&ids).await?;

        let mut parcels = Vec::with_capacity(rows.len());
        for row in rows {
            let history = histories.remove(&row.id).unwrap_or_default();
            parcels.push(row.into_parcel(history)?);
        }

        Ok((parcels, u64::try_from(total).unwrap_or(0)))
    }

    async fn exists_by_tracking_number(
        &self,
        tracking_number: &TrackingNumber,
    ) -> Result<bool, RepositoryError> {
        let exists: bool =
            sqlx::query_scalar(r"SELECT EXISTS (SELECT 1 FROM parcels WHERE tracking_number = $1)")
                .bind(tracking_number.as_str())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }
}
