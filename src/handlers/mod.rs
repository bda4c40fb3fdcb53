pub mod cargo;
pub mod cars;
pub mod common;
pub mod locations;

use crate::{
    db::DbPool,
    services::{
        cargo::CargoService, locations::LocationService, proximity::ProximityMatcher,
        vehicles::VehicleService,
    },
};
use std::sync::Arc;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub vehicles: Arc<VehicleService>,
    pub locations: Arc<LocationService>,
    pub cargo: Arc<CargoService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self::with_matcher(db_pool, ProximityMatcher::default())
    }

    /// Builds the services with a custom distance matcher.
    pub fn with_matcher(db_pool: Arc<DbPool>, matcher: ProximityMatcher) -> Self {
        Self {
            vehicles: Arc::new(VehicleService::new(db_pool.clone())),
            locations: Arc::new(LocationService::new(db_pool.clone())),
            cargo: Arc::new(CargoService::new(db_pool, matcher)),
        }
    }
}
