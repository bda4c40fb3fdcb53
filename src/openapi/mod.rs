use axum::Json;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "FreightMatch API",
        version = "0.1.0",
        description = r#"
# FreightMatch API

Locations, vehicles and cargo, with a proximity view that pairs each cargo
pick-up point with the vehicles currently within 455 miles.

## Wire format

Field names and types differ from the earlier Django service this API
replaces. Clients migrating from it should note:

- `GET /cargo/` reports `cars_near_cargo` as an integer count; the old
  service sent the count as a string.
- `GET /cargo/{id}/` lists nearby vehicles under `cars_near_cargo`; the old
  service used the key `machines_near_cargo`.
- Each nearby vehicle carries its distance in miles under `distance`; the
  old service spelled the key `distanse`.

## Error Handling

Errors share one JSON shape:

```json
{
  "error": "Bad Request",
  "message": "Validation failed",
  "fields": { "weight": ["weight must be between 1 and 1000"] },
  "request_id": "6c1b0c8e-7d4a-4e0f-9a53-0b5e2f1f3c11",
  "timestamp": "2024-01-01T00:00:00Z"
}
```
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8000", description = "Local development")
    ),
    tags(
        (name = "cars", description = "Vehicle endpoints"),
        (name = "locations", description = "Read-only location endpoints"),
        (name = "cargo", description = "Cargo endpoints with nearby vehicle matching")
    ),
    paths(
        crate::handlers::cars::list_cars,
        crate::handlers::cars::create_car,
        crate::handlers::cars::get_car,
        crate::handlers::cars::update_car,
        crate::handlers::locations::list_locations,
        crate::handlers::locations::get_location,
        crate::handlers::cargo::list_cargo,
        crate::handlers::cargo::create_cargo,
        crate::handlers::cargo::get_cargo,
        crate::handlers::cargo::update_cargo,
    ),
    components(
        schemas(
            crate::handlers::cars::VehicleResponse,
            crate::handlers::cars::CreateVehicleRequest,
            crate::handlers::cars::UpdateVehicleRequest,
            crate::handlers::locations::LocationResponse,
            crate::handlers::cargo::CargoResponse,
            crate::handlers::cargo::CargoListItem,
            crate::handlers::cargo::CargoDetailResponse,
            crate::handlers::cargo::VehicleDistance,
            crate::handlers::cargo::CreateCargoRequest,
            crate::handlers::cargo::UpdateCargoRequest,

            // Error types
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDocV1;

/// Serves the generated document at `/api-docs/openapi.json`.
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDocV1::openapi())
}
