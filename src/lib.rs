//! FreightMatch API Library
//!
//! Locations, vehicles and cargo over HTTP, plus the proximity matching
//! that pairs cargo pick-up points with nearby vehicles.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod health;
pub mod middleware_helpers;
pub mod migrator;
pub mod openapi;
pub mod services;
pub mod tracing;

use axum::{
    http::HeaderValue,
    routing::get,
    Router,
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub services: handlers::AppServices,
}

impl AppState {
    pub fn new(db: Arc<DatabaseConnection>, config: config::AppConfig) -> Self {
        let services = handlers::AppServices::new(db.clone());
        Self {
            db,
            config,
            services,
        }
    }
}

/// Resource routes. Paths keep their trailing slash.
pub fn api_routes() -> Router<AppState> {
    use handlers::{cargo, cars, locations};

    Router::new()
        .route("/cars/", get(cars::list_cars).post(cars::create_car))
        .route("/cars/:id/", get(cars::get_car).put(cars::update_car))
        .route("/locations/", get(locations::list_locations))
        .route("/locations/:id/", get(locations::get_location))
        .route("/cargo/", get(cargo::list_cargo).post(cargo::create_cargo))
        .route("/cargo/:id/", get(cargo::get_cargo).put(cargo::update_cargo))
}

/// Builds the CORS layer from configuration.
///
/// Explicit origins win; otherwise permissive CORS is used only when the
/// configuration allows it.
pub fn cors_layer(cfg: &config::AppConfig) -> Result<CorsLayer, errors::ServiceError> {
    let configured_origins: Option<Vec<HeaderValue>> = cfg
        .cors_allowed_origins
        .as_ref()
        .map(|raw| {
            raw.split(',')
                .filter_map(|origin| {
                    let trimmed = origin.trim();
                    if trimmed.is_empty() {
                        None
                    } else {
                        HeaderValue::from_str(trimmed).ok()
                    }
                })
                .collect::<Vec<_>>()
        })
        .filter(|origins| !origins.is_empty());

    if let Some(origins) = configured_origins {
        Ok(CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any))
    } else if cfg.should_allow_permissive_cors() {
        ::tracing::info!(
            "Using permissive CORS because explicit origins were not configured ({})",
            if cfg.is_development() {
                "development environment"
            } else {
                "explicit override enabled"
            }
        );
        Ok(CorsLayer::permissive())
    } else {
        Err(errors::ServiceError::InternalError(
            "Missing CORS configuration: set APP__CORS_ALLOWED_ORIGINS or APP__CORS_ALLOW_ANY_ORIGIN=true".into(),
        ))
    }
}

/// Full application router: health, OpenAPI document and resource routes,
/// wrapped in tracing, CORS and request-id middleware.
pub fn app_router(state: AppState, cors: CorsLayer) -> Router {
    Router::<AppState>::new()
        .route("/", get(|| async { "freightmatch-api up" }))
        .route("/health", get(health::simple_health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/api-docs/openapi.json", get(openapi::openapi_json))
        .merge(api_routes())
        // HTTP tracing layer for consistent request/response telemetry
        .layer(tracing::configure_http_tracing())
        .layer(cors)
        // Ensure every request carries a request id for traceability
        .layer(axum::middleware::from_fn(
            middleware_helpers::request_id::request_id_middleware,
        ))
        .with_state(state)
}
