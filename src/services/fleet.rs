//! Bulk operations behind the `freight-admin` commands: replacing the
//! location table from a CSV export, generating a fleet and shuffling
//! vehicle positions.

use crate::{
    db::DbPool,
    entities::{
        location,
        vehicle::{self, MAX_PAYLOAD_CAPACITY, MIN_PAYLOAD_CAPACITY},
    },
    errors::ServiceError,
};
use rand::{seq::SliceRandom, Rng};
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, EntityTrait, PaginatorTrait, QueryOrder, QuerySelect,
    Set, TransactionTrait,
};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, instrument, warn};

const INSERT_CHUNK_SIZE: usize = 500;

#[derive(Error, Debug)]
pub enum CsvImportError {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),
}

impl From<CsvImportError> for ServiceError {
    fn from(err: CsvImportError) -> Self {
        match err {
            CsvImportError::Io(e) => ServiceError::InternalError(e.to_string()),
            CsvImportError::Csv(e) => ServiceError::BadRequest(format!("Failed to parse CSV: {e}")),
        }
    }
}

/// One row of the zip code export. Extra columns are ignored.
#[derive(Debug, Deserialize)]
struct LocationRecord {
    city: String,
    state_name: String,
    zip: String,
    lat: f64,
    lng: f64,
}

impl From<LocationRecord> for location::ActiveModel {
    fn from(record: LocationRecord) -> Self {
        location::ActiveModel {
            id: NotSet,
            city: Set(record.city),
            state: Set(record.state_name),
            zip_code: Set(record.zip),
            latitude: Set(record.lat),
            longitude: Set(record.lng),
        }
    }
}

/// Parses location rows from a CSV with `city,state_name,zip,lat,lng` headers.
pub fn read_location_records<R: Read>(reader: R) -> Result<Vec<location::ActiveModel>, CsvImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for result in reader.deserialize::<LocationRecord>() {
        rows.push(result?.into());
    }
    Ok(rows)
}

#[derive(Clone)]
pub struct FleetService {
    db_pool: Arc<DbPool>,
}

impl FleetService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Replaces every location with the rows of the CSV file at `path`.
    pub async fn load_locations_from_csv(&self, path: impl AsRef<Path>) -> Result<usize, ServiceError> {
        let path = path.as_ref().to_path_buf();
        info!(path = %path.display(), "Reading locations");
        let rows = tokio::task::spawn_blocking(move || {
            let file = std::fs::File::open(&path)?;
            read_location_records(file)
        })
        .await
        .map_err(|e| ServiceError::InternalError(format!("CSV import task failed: {e}")))??;
        self.replace_locations(rows).await
    }

    /// Deletes all locations (cascading to vehicles and cargo) and inserts
    /// `rows` in a single transaction.
    #[instrument(skip(self, rows), fields(rows = rows.len()))]
    pub async fn replace_locations(
        &self,
        rows: Vec<location::ActiveModel>,
    ) -> Result<usize, ServiceError> {
        let count = rows.len();
        let txn = self.db_pool.begin().await.map_err(ServiceError::db_error)?;

        let deleted = location::Entity::delete_many()
            .exec(&txn)
            .await
            .map_err(ServiceError::db_error)?;

        let mut rows = rows.into_iter().peekable();
        while rows.peek().is_some() {
            let chunk: Vec<_> = rows.by_ref().take(INSERT_CHUNK_SIZE).collect();
            location::Entity::insert_many(chunk)
                .exec(&txn)
                .await
                .map_err(ServiceError::db_error)?;
        }

        txn.commit().await.map_err(ServiceError::db_error)?;
        info!(
            removed = deleted.rows_affected,
            loaded = count,
            "Location table replaced"
        );
        Ok(count)
    }

    /// Creates `count` vehicles at random locations with random payload
    /// capacities. Refuses when fewer than `count` locations exist.
    #[instrument(skip(self))]
    pub async fn create_fleet(&self, count: usize) -> Result<Vec<vehicle::Model>, ServiceError> {
        let db = &*self.db_pool;
        let available = location::Entity::find()
            .count(db)
            .await
            .map_err(ServiceError::db_error)? as usize;
        if available < count {
            return Err(ServiceError::BadRequest(format!(
                "Need at least {count} locations to place {count} vehicles, found {available}"
            )));
        }

        let location_ids = self.location_ids().await?;
        let placements: Vec<(i32, i32)> = {
            let mut rng = rand::thread_rng();
            (0..count)
                .filter_map(|_| {
                    let id = *location_ids.choose(&mut rng)?;
                    let capacity = rng.gen_range(MIN_PAYLOAD_CAPACITY..=MAX_PAYLOAD_CAPACITY);
                    Some((id, capacity))
                })
                .collect()
        };

        let mut created = Vec::with_capacity(count);
        for (location_id, capacity) in placements {
            let model = vehicle::ActiveModel {
                id: NotSet,
                unique_number: NotSet,
                current_location_id: Set(location_id),
                payload_capacity: Set(capacity),
            }
            .insert(db)
            .await
            .map_err(ServiceError::db_error)?;
            created.push(model);
        }

        info!(created = created.len(), "Fleet created");
        Ok(created)
    }

    /// Moves every vehicle to a uniformly random location. Returns how many
    /// vehicles were moved.
    #[instrument(skip(self))]
    pub async fn randomize_locations(&self) -> Result<usize, ServiceError> {
        let db = &*self.db_pool;
        let location_ids = self.location_ids().await?;
        if location_ids.is_empty() {
            warn!("No locations loaded; vehicles stay where they are");
            return Ok(0);
        }

        let vehicles = vehicle::Entity::find()
            .order_by_asc(vehicle::Column::Id)
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        let moves: Vec<(vehicle::Model, i32)> = {
            let mut rng = rand::thread_rng();
            vehicles
                .into_iter()
                .filter_map(|v| location_ids.choose(&mut rng).map(|id| (v, *id)))
                .collect()
        };

        let moved = moves.len();
        for (vehicle, location_id) in moves {
            let mut active: vehicle::ActiveModel = vehicle.into();
            active.current_location_id = Set(location_id);
            active.update(db).await.map_err(ServiceError::db_error)?;
        }

        info!(moved, "Vehicle locations randomized");
        Ok(moved)
    }

    async fn location_ids(&self) -> Result<Vec<i32>, ServiceError> {
        location::Entity::find()
            .select_only()
            .column(location::Column::Id)
            .order_by_asc(location::Column::Id)
            .into_tuple()
            .all(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)
    }
}
