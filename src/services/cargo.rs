use crate::{
    db::DbPool,
    entities::{
        cargo::{self, MAX_WEIGHT, MIN_WEIGHT},
        location, vehicle,
    },
    errors::ServiceError,
    services::{
        locations::require_location,
        proximity::{Measured, ProximityMatcher},
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, Set,
};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone)]
pub struct NewCargo {
    pub pick_up_location_id: i32,
    pub delivery_location_id: i32,
    pub weight: i32,
    pub description: String,
}

/// Editable cargo fields; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct CargoChanges {
    pub weight: Option<i32>,
    pub description: Option<String>,
}

/// A cargo row joined with both of its locations and the number of
/// vehicles currently near the pick-up point.
#[derive(Debug, Clone)]
pub struct CargoSummary {
    pub cargo: cargo::Model,
    pub pick_up_location: location::Model,
    pub delivery_location: location::Model,
    pub cars_near_cargo: usize,
}

/// A cargo row with every vehicle and its distance to the pick-up point.
#[derive(Debug, Clone)]
pub struct CargoDetail {
    pub cargo: cargo::Model,
    pub vehicles: Vec<Measured<vehicle::Model>>,
}

/// Service for managing cargo and matching it against the fleet
#[derive(Clone)]
pub struct CargoService {
    db_pool: Arc<DbPool>,
    matcher: ProximityMatcher,
}

impl CargoService {
    pub fn new(db_pool: Arc<DbPool>, matcher: ProximityMatcher) -> Self {
        Self { db_pool, matcher }
    }

    #[instrument(skip(self))]
    pub async fn create(&self, input: NewCargo) -> Result<cargo::Model, ServiceError> {
        check_weight(input.weight)?;
        check_description(&input.description)?;

        let db = &*self.db_pool;
        require_location(db, "pick_up_location", input.pick_up_location_id).await?;
        require_location(db, "delivery_location", input.delivery_location_id).await?;

        let model = cargo::ActiveModel {
            pick_up_location_id: Set(input.pick_up_location_id),
            delivery_location_id: Set(input.delivery_location_id),
            weight: Set(input.weight),
            description: Set(input.description),
            ..Default::default()
        }
        .insert(db)
        .await
        .map_err(ServiceError::db_error)?;

        info!(cargo_id = model.id, "Cargo created");
        Ok(model)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<cargo::Model, ServiceError> {
        cargo::Entity::find_by_id(id)
            .one(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Cargo {id} does not exist")))
    }

    /// Lists cargo in id order, each with its nearby vehicle count.
    ///
    /// Locations are fetched in a single batched query; every vehicle
    /// position is then checked against every pick-up point.
    #[instrument(skip(self))]
    pub async fn list_with_counts(&self) -> Result<Vec<CargoSummary>, ServiceError> {
        let db = &*self.db_pool;
        let cargo_rows = cargo::Entity::find()
            .order_by_asc(cargo::Column::Id)
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        if cargo_rows.is_empty() {
            return Ok(Vec::new());
        }

        let location_ids: BTreeSet<i32> = cargo_rows
            .iter()
            .flat_map(|c| [c.pick_up_location_id, c.delivery_location_id])
            .collect();
        let locations: HashMap<i32, location::Model> = location::Entity::find()
            .filter(location::Column::Id.is_in(location_ids))
            .all(db)
            .await
            .map_err(ServiceError::db_error)?
            .into_iter()
            .map(|l| (l.id, l))
            .collect();

        let positions: Vec<_> = self
            .fleet_with_locations()
            .await?
            .into_iter()
            .map(|(_, location)| location.coordinates())
            .collect();

        let mut summaries = Vec::with_capacity(cargo_rows.len());
        for cargo in cargo_rows {
            let (Some(pick_up), Some(delivery)) = (
                locations.get(&cargo.pick_up_location_id),
                locations.get(&cargo.delivery_location_id),
            ) else {
                return Err(ServiceError::InternalError(format!(
                    "Cargo {} references a missing location",
                    cargo.id
                )));
            };

            let cars_near_cargo = self
                .matcher
                .count_nearby(pick_up.coordinates(), positions.iter().copied());

            summaries.push(CargoSummary {
                pick_up_location: pick_up.clone(),
                delivery_location: delivery.clone(),
                cars_near_cargo,
                cargo,
            });
        }

        Ok(summaries)
    }

    /// Fetches a cargo and annotates every vehicle with its distance to the
    /// pick-up location.
    #[instrument(skip(self))]
    pub async fn detail_with_distances(&self, id: i32) -> Result<CargoDetail, ServiceError> {
        let cargo = self.get(id).await?;
        let pick_up = location::Entity::find_by_id(cargo.pick_up_location_id)
            .one(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "Location {} does not exist",
                    cargo.pick_up_location_id
                ))
            })?;

        let vehicles = self.matcher.annotate(
            pick_up.coordinates(),
            self.fleet_with_locations().await?,
            |(_, location)| location.coordinates(),
        );

        Ok(CargoDetail {
            cargo,
            vehicles: vehicles
                .into_iter()
                .map(|m| Measured {
                    item: m.item.0,
                    distance_miles: m.distance_miles,
                })
                .collect(),
        })
    }

    /// Updates weight and description only
    #[instrument(skip(self))]
    pub async fn update(&self, id: i32, changes: CargoChanges) -> Result<cargo::Model, ServiceError> {
        let existing = self.get(id).await?;

        if let Some(weight) = changes.weight {
            check_weight(weight)?;
        }
        if let Some(description) = &changes.description {
            check_description(description)?;
        }
        if changes.weight.is_none() && changes.description.is_none() {
            return Ok(existing);
        }

        let mut active = existing.into_active_model();
        if let Some(weight) = changes.weight {
            active.weight = Set(weight);
        }
        if let Some(description) = changes.description {
            active.description = Set(description);
        }

        let updated = active
            .update(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)?;
        info!(cargo_id = id, "Cargo updated");
        Ok(updated)
    }

    /// Every vehicle in id order with its current location.
    async fn fleet_with_locations(
        &self,
    ) -> Result<Vec<(vehicle::Model, location::Model)>, ServiceError> {
        let rows = vehicle::Entity::find()
            .find_also_related(location::Entity)
            .order_by_asc(vehicle::Column::Id)
            .all(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(rows
            .into_iter()
            .filter_map(|(vehicle, location)| match location {
                Some(location) => Some((vehicle, location)),
                None => {
                    warn!(vehicle_id = vehicle.id, "Vehicle has no current location");
                    None
                }
            })
            .collect())
    }
}

fn check_weight(weight: i32) -> Result<(), ServiceError> {
    if (MIN_WEIGHT..=MAX_WEIGHT).contains(&weight) {
        Ok(())
    } else {
        Err(ServiceError::invalid_field(
            "weight",
            format!("weight must be between {MIN_WEIGHT} and {MAX_WEIGHT}"),
        ))
    }
}

fn check_description(description: &str) -> Result<(), ServiceError> {
    if description.trim().is_empty() {
        Err(ServiceError::invalid_field(
            "description",
            "description must not be empty",
        ))
    } else {
        Ok(())
    }
}
