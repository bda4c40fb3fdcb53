use super::{
    cars::VehicleResponse,
    common::{
        created_response, success_response, HandlerResult, ResourcePath, ValidatedJson,
    },
};
use crate::{
    entities::cargo,
    services::cargo::{CargoChanges, CargoDetail, CargoSummary, NewCargo},
    AppState,
};
use axum::extract::State;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Cargo as stored; location fields carry location ids.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CargoResponse {
    pub id: i32,
    pub pick_up_location: i32,
    pub delivery_location: i32,
    pub weight: i32,
    pub description: String,
}

impl From<cargo::Model> for CargoResponse {
    fn from(model: cargo::Model) -> Self {
        Self {
            id: model.id,
            pick_up_location: model.pick_up_location_id,
            delivery_location: model.delivery_location_id,
            weight: model.weight,
            description: model.description,
        }
    }
}

/// List entry: locations rendered as `"City, State Zip"` plus the number of
/// vehicles within range of the pick-up point.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CargoListItem {
    pub id: i32,
    #[schema(example = "Los Angeles, California 90001")]
    pub pick_up_location: String,
    #[schema(example = "San Francisco, California 94102")]
    pub delivery_location: String,
    pub weight: i32,
    pub description: String,
    pub cars_near_cargo: usize,
}

impl From<CargoSummary> for CargoListItem {
    fn from(summary: CargoSummary) -> Self {
        Self {
            id: summary.cargo.id,
            pick_up_location: summary.pick_up_location.to_string(),
            delivery_location: summary.delivery_location.to_string(),
            weight: summary.cargo.weight,
            description: summary.cargo.description,
            cars_near_cargo: summary.cars_near_cargo,
        }
    }
}

/// A vehicle and its distance in miles from the cargo pick-up point.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VehicleDistance {
    #[serde(flatten)]
    pub vehicle: VehicleResponse,
    pub distance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CargoDetailResponse {
    pub cargo: CargoResponse,
    pub cars_near_cargo: Vec<VehicleDistance>,
}

impl From<CargoDetail> for CargoDetailResponse {
    fn from(detail: CargoDetail) -> Self {
        Self {
            cargo: detail.cargo.into(),
            cars_near_cargo: detail
                .vehicles
                .into_iter()
                .map(|measured| VehicleDistance {
                    vehicle: measured.item.into(),
                    distance: measured.distance_miles,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCargoRequest {
    pub pick_up_location: i32,
    pub delivery_location: i32,
    #[validate(range(min = 1, max = 1000, message = "weight must be between 1 and 1000"))]
    pub weight: i32,
    #[validate(length(min = 1, message = "description must not be empty"))]
    pub description: String,
}

/// Only weight and description are editable; other fields are ignored.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCargoRequest {
    #[serde(default)]
    #[validate(range(min = 1, max = 1000, message = "weight must be between 1 and 1000"))]
    pub weight: Option<i32>,
    #[serde(default)]
    #[validate(length(min = 1, message = "description must not be empty"))]
    pub description: Option<String>,
}

#[utoipa::path(
    get,
    path = "/cargo/",
    responses(
        (status = 200, description = "Cargo listed with nearby vehicle counts", body = [CargoListItem])
    ),
    tag = "cargo"
)]
pub async fn list_cargo(State(state): State<AppState>) -> HandlerResult {
    let summaries = state.services.cargo.list_with_counts().await?;
    Ok(success_response(
        summaries
            .into_iter()
            .map(CargoListItem::from)
            .collect::<Vec<_>>(),
    ))
}

#[utoipa::path(
    post,
    path = "/cargo/",
    request_body = CreateCargoRequest,
    responses(
        (status = 201, description = "Cargo created", body = CargoResponse),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "cargo"
)]
pub async fn create_cargo(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateCargoRequest>,
) -> HandlerResult {
    let cargo = state
        .services
        .cargo
        .create(NewCargo {
            pick_up_location_id: payload.pick_up_location,
            delivery_location_id: payload.delivery_location,
            weight: payload.weight,
            description: payload.description,
        })
        .await?;
    Ok(created_response(CargoResponse::from(cargo)))
}

#[utoipa::path(
    get,
    path = "/cargo/:id/",
    params(("id" = i32, Path, description = "Cargo ID")),
    responses(
        (status = 200, description = "Cargo with every vehicle's distance", body = CargoDetailResponse),
        (status = 404, description = "Cargo not found", body = crate::errors::ErrorResponse)
    ),
    tag = "cargo"
)]
pub async fn get_cargo(
    State(state): State<AppState>,
    ResourcePath(id): ResourcePath<i32>,
) -> HandlerResult {
    let detail = state.services.cargo.detail_with_distances(id).await?;
    Ok(success_response(CargoDetailResponse::from(detail)))
}

#[utoipa::path(
    put,
    path = "/cargo/:id/",
    params(("id" = i32, Path, description = "Cargo ID")),
    request_body = UpdateCargoRequest,
    responses(
        (status = 200, description = "Cargo updated", body = CargoResponse),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Cargo not found", body = crate::errors::ErrorResponse)
    ),
    tag = "cargo"
)]
pub async fn update_cargo(
    State(state): State<AppState>,
    ResourcePath(id): ResourcePath<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateCargoRequest>,
) -> HandlerResult {
    let cargo = state
        .services
        .cargo
        .update(
            id,
            CargoChanges {
                weight: payload.weight,
                description: payload.description,
            },
        )
        .await?;
    Ok(success_response(CargoResponse::from(cargo)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weight_outside_bounds_is_rejected() {
        let request = |weight| CreateCargoRequest {
            pick_up_location: 1,
            delivery_location: 2,
            weight,
            description: "pallets".into(),
        };
        assert!(request(1).validate().is_ok());
        assert!(request(1000).validate().is_ok());
        assert!(request(0).validate().is_err());
        assert!(request(1001).validate().is_err());
    }

    #[test]
    fn empty_description_is_rejected() {
        let request = CreateCargoRequest {
            pick_up_location: 1,
            delivery_location: 2,
            weight: 10,
            description: String::new(),
        };
        let errors = request.validate().expect_err("empty description");
        assert!(errors.field_errors().contains_key("description"));
    }

    #[test]
    fn update_ignores_location_fields() {
        let update: UpdateCargoRequest = serde_json::from_value(serde_json::json!({
            "pick_up_location": 99,
            "weight": 12
        }))
        .expect("deserialize");
        assert_eq!(update.weight, Some(12));
        assert!(update.description.is_none());
    }
}
