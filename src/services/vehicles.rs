use crate::{
    db::DbPool,
    entities::vehicle::{self, is_valid_unique_number, MAX_PAYLOAD_CAPACITY, MIN_PAYLOAD_CAPACITY},
    errors::ServiceError,
    services::locations::require_location,
};
use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, EntityTrait, IntoActiveModel, QueryOrder, Set};
use std::sync::Arc;
use tracing::{info, instrument};

/// Input for registering a vehicle. A `None` identifier is generated on insert.
#[derive(Debug, Clone)]
pub struct NewVehicle {
    pub unique_number: Option<String>,
    pub current_location_id: i32,
    pub payload_capacity: i32,
}

/// Partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct VehicleChanges {
    pub current_location_id: Option<i32>,
    pub payload_capacity: Option<i32>,
}

/// Service for managing vehicles
#[derive(Clone)]
pub struct VehicleService {
    db_pool: Arc<DbPool>,
}

impl VehicleService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Lists vehicles in id order
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<vehicle::Model>, ServiceError> {
        vehicle::Entity::find()
            .order_by_asc(vehicle::Column::Id)
            .all(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<vehicle::Model, ServiceError> {
        vehicle::Entity::find_by_id(id)
            .one(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Vehicle {id} does not exist")))
    }

    /// Registers a vehicle at an existing location
    #[instrument(skip(self))]
    pub async fn create(&self, input: NewVehicle) -> Result<vehicle::Model, ServiceError> {
        check_capacity(input.payload_capacity)?;
        if let Some(number) = &input.unique_number {
            if !is_valid_unique_number(number) {
                return Err(ServiceError::invalid_field(
                    "unique_number",
                    "unique_number must be four digits (1000-9999) followed by an uppercase letter",
                ));
            }
        }
        let db = &*self.db_pool;
        require_location(db, "current_location", input.current_location_id).await?;

        let model = vehicle::ActiveModel {
            id: NotSet,
            unique_number: input.unique_number.map_or(NotSet, Set),
            current_location_id: Set(input.current_location_id),
            payload_capacity: Set(input.payload_capacity),
        }
        .insert(db)
        .await
        .map_err(ServiceError::db_error)?;

        info!(
            vehicle_id = model.id,
            unique_number = %model.unique_number,
            "Vehicle created"
        );
        Ok(model)
    }

    /// Applies the supplied fields, leaving the rest untouched
    #[instrument(skip(self))]
    pub async fn update(
        &self,
        id: i32,
        changes: VehicleChanges,
    ) -> Result<vehicle::Model, ServiceError> {
        let db = &*self.db_pool;
        let existing = self.get(id).await?;

        if let Some(capacity) = changes.payload_capacity {
            check_capacity(capacity)?;
        }
        if let Some(location_id) = changes.current_location_id {
            require_location(db, "current_location", location_id).await?;
        }

        if changes.payload_capacity.is_none() && changes.current_location_id.is_none() {
            return Ok(existing);
        }

        let mut active = existing.into_active_model();
        if let Some(capacity) = changes.payload_capacity {
            active.payload_capacity = Set(capacity);
        }
        if let Some(location_id) = changes.current_location_id {
            active.current_location_id = Set(location_id);
        }

        let updated = active.update(db).await.map_err(ServiceError::db_error)?;
        info!(vehicle_id = id, "Vehicle updated");
        Ok(updated)
    }
}

fn check_capacity(capacity: i32) -> Result<(), ServiceError> {
    if (MIN_PAYLOAD_CAPACITY..=MAX_PAYLOAD_CAPACITY).contains(&capacity) {
        Ok(())
    } else {
        Err(ServiceError::invalid_field(
            "payload_capacity",
            format!(
                "payload_capacity must be between {MIN_PAYLOAD_CAPACITY} and {MAX_PAYLOAD_CAPACITY}"
            ),
        ))
    }
}
