use super::common::{
    created_response, success_response, HandlerResult, ResourcePath, ValidatedJson,
};
use crate::{
    entities::vehicle,
    services::vehicles::{NewVehicle, VehicleChanges},
    AppState,
};
use axum::extract::State;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Vehicle as exposed over HTTP. `current_location` is the location id.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VehicleResponse {
    pub id: i32,
    #[schema(example = "4821Q")]
    pub unique_number: String,
    pub current_location: i32,
    pub payload_capacity: i32,
}

impl From<vehicle::Model> for VehicleResponse {
    fn from(model: vehicle::Model) -> Self {
        Self {
            id: model.id,
            unique_number: model.unique_number,
            current_location: model.current_location_id,
            payload_capacity: model.payload_capacity,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateVehicleRequest {
    pub current_location: i32,
    #[validate(range(
        min = 1,
        max = 1000,
        message = "payload_capacity must be between 1 and 1000"
    ))]
    pub payload_capacity: i32,
}

/// Partial vehicle update. The identifier cannot be changed.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateVehicleRequest {
    #[serde(default)]
    pub current_location: Option<i32>,
    #[serde(default)]
    #[validate(range(
        min = 1,
        max = 1000,
        message = "payload_capacity must be between 1 and 1000"
    ))]
    pub payload_capacity: Option<i32>,
}

#[utoipa::path(
    get,
    path = "/cars/",
    responses(
        (status = 200, description = "Vehicles listed", body = [VehicleResponse])
    ),
    tag = "cars"
)]
pub async fn list_cars(State(state): State<AppState>) -> HandlerResult {
    let vehicles = state.services.vehicles.list().await?;
    Ok(success_response(
        vehicles
            .into_iter()
            .map(VehicleResponse::from)
            .collect::<Vec<_>>(),
    ))
}

#[utoipa::path(
    post,
    path = "/cars/",
    request_body = CreateVehicleRequest,
    responses(
        (status = 201, description = "Vehicle created", body = VehicleResponse),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "cars"
)]
pub async fn create_car(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateVehicleRequest>,
) -> HandlerResult {
    let vehicle = state
        .services
        .vehicles
        .create(NewVehicle {
            unique_number: None,
            current_location_id: payload.current_location,
            payload_capacity: payload.payload_capacity,
        })
        .await?;
    Ok(created_response(VehicleResponse::from(vehicle)))
}

#[utoipa::path(
    get,
    path = "/cars/:id/",
    params(("id" = i32, Path, description = "Vehicle ID")),
    responses(
        (status = 200, description = "Vehicle fetched", body = VehicleResponse),
        (status = 404, description = "Vehicle not found", body = crate::errors::ErrorResponse)
    ),
    tag = "cars"
)]
pub async fn get_car(
    State(state): State<AppState>,
    ResourcePath(id): ResourcePath<i32>,
) -> HandlerResult {
    let vehicle = state.services.vehicles.get(id).await?;
    Ok(success_response(VehicleResponse::from(vehicle)))
}

#[utoipa::path(
    put,
    path = "/cars/:id/",
    params(("id" = i32, Path, description = "Vehicle ID")),
    request_body = UpdateVehicleRequest,
    responses(
        (status = 200, description = "Vehicle updated", body = VehicleResponse),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Vehicle not found", body = crate::errors::ErrorResponse)
    ),
    tag = "cars"
)]
pub async fn update_car(
    State(state): State<AppState>,
    ResourcePath(id): ResourcePath<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateVehicleRequest>,
) -> HandlerResult {
    let vehicle = state
        .services
        .vehicles
        .update(
            id,
            VehicleChanges {
                current_location_id: payload.current_location,
                payload_capacity: payload.payload_capacity,
            },
        )
        .await?;
    Ok(success_response(VehicleResponse::from(vehicle)))
}
