#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{header::CONTENT_TYPE, Method, Request},
    response::Response,
    Router,
};
use freightmatch_api::{
    config::AppConfig,
    db::{self, DbPool},
    entities::{location, vehicle},
    services::{
        fleet::FleetService,
        locations::NewLocation,
        vehicles::NewVehicle,
    },
    AppState,
};
use serde_json::Value;
use tower::ServiceExt;

/// Helper harness for spinning up an application state backed by an in-memory SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        cfg.cors_allow_any_origin = true;
        // A single connection keeps every query on the same in-memory database.
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let cors = freightmatch_api::cors_layer(&cfg).expect("cors layer");
        let state = AppState::new(Arc::new(pool), cfg);
        let router = freightmatch_api::app_router(state.clone(), cors);

        Self { router, state }
    }

    pub fn db(&self) -> Arc<DbPool> {
        self.state.db.clone()
    }

    pub fn fleet(&self) -> FleetService {
        FleetService::new(self.db())
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router response")
    }

    pub async fn get(&self, uri: &str) -> Response {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> Response {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn put_json(&self, uri: &str, body: Value) -> Response {
        self.request(Method::PUT, uri, Some(body)).await
    }

    pub async fn seed_location(
        &self,
        city: &str,
        state: &str,
        zip_code: &str,
        latitude: f64,
        longitude: f64,
    ) -> location::Model {
        self.state
            .services
            .locations
            .create(NewLocation {
                city: city.to_string(),
                state: state.to_string(),
                zip_code: zip_code.to_string(),
                latitude,
                longitude,
            })
            .await
            .expect("seed location")
    }

    pub async fn seed_vehicle(&self, location_id: i32, payload_capacity: i32) -> vehicle::Model {
        self.state
            .services
            .vehicles
            .create(NewVehicle {
                unique_number: None,
                current_location_id: location_id,
                payload_capacity,
            })
            .await
            .expect("seed vehicle")
    }

    pub async fn seed_los_angeles(&self) -> location::Model {
        self.seed_location("Los Angeles", "California", "90001", 34.0522, -118.2437)
            .await
    }

    pub async fn seed_san_francisco(&self) -> location::Model {
        self.seed_location("San Francisco", "California", "94102", 37.7749, -122.4194)
            .await
    }

    pub async fn seed_new_york(&self) -> location::Model {
        self.seed_location("New York", "New York", "10001", 40.7128, -74.0060)
            .await
    }
}

pub async fn response_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}
