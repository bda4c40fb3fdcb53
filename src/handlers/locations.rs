use super::common::{success_response, HandlerResult, ResourcePath};
use crate::{entities::location, AppState};
use axum::extract::State;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LocationResponse {
    pub id: i32,
    #[schema(example = "Los Angeles")]
    pub city: String,
    #[schema(example = "California")]
    pub state: String,
    #[schema(example = "90001")]
    pub zip_code: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<location::Model> for LocationResponse {
    fn from(model: location::Model) -> Self {
        Self {
            id: model.id,
            city: model.city,
            state: model.state,
            zip_code: model.zip_code,
            latitude: model.latitude,
            longitude: model.longitude,
        }
    }
}

#[utoipa::path(
    get,
    path = "/locations/",
    responses(
        (status = 200, description = "Locations listed", body = [LocationResponse])
    ),
    tag = "locations"
)]
pub async fn list_locations(State(state): State<AppState>) -> HandlerResult {
    let locations = state.services.locations.list().await?;
    Ok(success_response(
        locations
            .into_iter()
            .map(LocationResponse::from)
            .collect::<Vec<_>>(),
    ))
}

#[utoipa::path(
    get,
    path = "/locations/:id/",
    params(("id" = i32, Path, description = "Location ID")),
    responses(
        (status = 200, description = "Location fetched", body = LocationResponse),
        (status = 404, description = "Location not found", body = crate::errors::ErrorResponse)
    ),
    tag = "locations"
)]
pub async fn get_location(
    State(state): State<AppState>,
    ResourcePath(id): ResourcePath<i32>,
) -> HandlerResult {
    let location = state.services.locations.get(id).await?;
    Ok(success_response(LocationResponse::from(location)))
}
