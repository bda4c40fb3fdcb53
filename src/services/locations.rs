use crate::{db::DbPool, entities::location, errors::ServiceError};
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use std::sync::Arc;
use tracing::{info, instrument};

/// Fields for a new location row.
#[derive(Debug, Clone)]
pub struct NewLocation {
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Read access to the location table, plus ad hoc inserts for seeding.
#[derive(Clone)]
pub struct LocationService {
    db_pool: Arc<DbPool>,
}

impl LocationService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// All locations in id order.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<location::Model>, ServiceError> {
        location::Entity::find()
            .order_by_asc(location::Column::Id)
            .all(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<location::Model, ServiceError> {
        location::Entity::find_by_id(id)
            .one(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Location {id} does not exist")))
    }

    #[instrument(skip(self))]
    pub async fn create(&self, input: NewLocation) -> Result<location::Model, ServiceError> {
        let model = location::ActiveModel {
            city: Set(input.city),
            state: Set(input.state),
            zip_code: Set(input.zip_code),
            latitude: Set(input.latitude),
            longitude: Set(input.longitude),
            ..Default::default()
        }
        .insert(&*self.db_pool)
        .await
        .map_err(ServiceError::db_error)?;

        info!(location_id = model.id, "Location created");
        Ok(model)
    }
}

/// Resolves a referenced location id, reporting a miss against `field`.
pub(crate) async fn require_location(
    db: &DbPool,
    field: &str,
    id: i32,
) -> Result<location::Model, ServiceError> {
    location::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(ServiceError::db_error)?
        .ok_or_else(|| ServiceError::invalid_field(field, format!("Location {id} does not exist")))
}
