mod common;

use assert_matches::assert_matches;
use axum::http::StatusCode;
use common::{response_json, TestApp};
use freightmatch_api::{
    entities::vehicle::is_valid_unique_number, errors::ServiceError, services::vehicles::NewVehicle,
};
use serde_json::json;

#[tokio::test]
async fn create_car_generates_identifier() {
    let app = TestApp::new().await;
    let la = app.seed_los_angeles().await;

    let response = app
        .post_json(
            "/cars/",
            json!({ "current_location": la.id, "payload_capacity": 800 }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = response_json(response).await;
    let number = body["unique_number"].as_str().expect("unique_number");
    assert!(is_valid_unique_number(number), "bad identifier {number}");
    assert_eq!(body["current_location"], la.id);
    assert_eq!(body["payload_capacity"], 800);
}

#[tokio::test]
async fn identifier_in_request_body_is_ignored() {
    let app = TestApp::new().await;
    let la = app.seed_los_angeles().await;

    let response = app
        .post_json(
            "/cars/",
            json!({
                "unique_number": "not-an-id",
                "current_location": la.id,
                "payload_capacity": 10
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    assert_ne!(body["unique_number"], "not-an-id");
}

#[tokio::test]
async fn explicit_identifier_is_kept() {
    let app = TestApp::new().await;
    let la = app.seed_los_angeles().await;

    let vehicle = app
        .state
        .services
        .vehicles
        .create(NewVehicle {
            unique_number: Some("1234Z".into()),
            current_location_id: la.id,
            payload_capacity: 50,
        })
        .await
        .expect("create");
    assert_eq!(vehicle.unique_number, "1234Z");

    let body = response_json(app.get(&format!("/cars/{}/", vehicle.id)).await).await;
    assert_eq!(body["unique_number"], "1234Z");
}

#[tokio::test]
async fn duplicate_identifier_is_a_database_error() {
    let app = TestApp::new().await;
    let la = app.seed_los_angeles().await;
    let vehicles = &app.state.services.vehicles;

    let new = || NewVehicle {
        unique_number: Some("5555K".into()),
        current_location_id: la.id,
        payload_capacity: 100,
    };
    vehicles.create(new()).await.expect("first insert");

    let err = vehicles.create(new()).await.expect_err("duplicate");
    assert_matches!(err, ServiceError::DatabaseError(_));
    assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn capacity_out_of_range_is_rejected() {
    let app = TestApp::new().await;
    let la = app.seed_los_angeles().await;

    for capacity in [0, 1001] {
        let response = app
            .post_json(
                "/cars/",
                json!({ "current_location": la.id, "payload_capacity": capacity }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = response_json(response).await;
        assert!(body["fields"]["payload_capacity"].is_array(), "{body}");
    }
}

#[tokio::test]
async fn unknown_location_is_rejected() {
    let app = TestApp::new().await;

    let response = app
        .post_json(
            "/cars/",
            json!({ "current_location": 999, "payload_capacity": 10 }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert!(body["fields"]["current_location"].is_array());
}

#[tokio::test]
async fn malformed_body_is_rejected() {
    let app = TestApp::new().await;

    let response = app
        .post_json("/cars/", json!({ "payload_capacity": "heavy" }))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["error"], "Bad Request");
}

#[tokio::test]
async fn list_cars_is_ordered_by_id() {
    let app = TestApp::new().await;
    let la = app.seed_los_angeles().await;
    let first = app.seed_vehicle(la.id, 100).await;
    let second = app.seed_vehicle(la.id, 200).await;

    let response = app.get("/cars/").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    let ids: Vec<i64> = body
        .as_array()
        .expect("array")
        .iter()
        .map(|v| v["id"].as_i64().expect("id"))
        .collect();
    assert_eq!(ids, vec![first.id as i64, second.id as i64]);
}

#[tokio::test]
async fn partial_update_keeps_location() {
    let app = TestApp::new().await;
    let la = app.seed_los_angeles().await;
    let vehicle = app.seed_vehicle(la.id, 800).await;

    let response = app
        .put_json(
            &format!("/cars/{}/", vehicle.id),
            json!({ "payload_capacity": 500 }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["payload_capacity"], 500);
    assert_eq!(body["current_location"], la.id);
    assert_eq!(body["unique_number"], vehicle.unique_number);

    let stored = app.state.services.vehicles.get(vehicle.id).await.expect("get");
    assert_eq!(stored.current_location_id, la.id);
    assert_eq!(stored.payload_capacity, 500);
}

#[tokio::test]
async fn update_moves_vehicle() {
    let app = TestApp::new().await;
    let la = app.seed_los_angeles().await;
    let sf = app.seed_san_francisco().await;
    let vehicle = app.seed_vehicle(la.id, 800).await;

    let response = app
        .put_json(
            &format!("/cars/{}/", vehicle.id),
            json!({ "current_location": sf.id }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["current_location"], sf.id);
    assert_eq!(body["payload_capacity"], 800);
}

#[tokio::test]
async fn update_rejects_bad_capacity() {
    let app = TestApp::new().await;
    let la = app.seed_los_angeles().await;
    let vehicle = app.seed_vehicle(la.id, 800).await;

    let response = app
        .put_json(
            &format!("/cars/{}/", vehicle.id),
            json!({ "payload_capacity": 1001 }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let stored = app.state.services.vehicles.get(vehicle.id).await.expect("get");
    assert_eq!(stored.payload_capacity, 800);
}

#[tokio::test]
async fn missing_car_is_not_found() {
    let app = TestApp::new().await;

    let response = app.get("/cars/42/").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(response.headers().contains_key("x-request-id"));
    let body = response_json(response).await;
    assert_eq!(body["error"], "Not Found");
    assert_eq!(body["message"], "Not found: Vehicle 42 does not exist");
    assert!(body["request_id"].is_string());

    let response = app
        .put_json("/cars/42/", json!({ "payload_capacity": 5 }))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unparseable_car_id_is_not_found() {
    let app = TestApp::new().await;

    let response = app.get("/cars/abc/").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = response_json(response).await;
    assert_eq!(body["error"], "Not Found");
    assert_eq!(body["message"], "Not found: /cars/abc/ does not exist");

    let response = app
        .put_json("/cars/abc/", json!({ "payload_capacity": 5 }))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_explicit_identifier_is_rejected() {
    let app = TestApp::new().await;
    let la = app.seed_los_angeles().await;

    for number in ["12345", "1234a", "0999A", "1234AB", ""] {
        let err = app
            .state
            .services
            .vehicles
            .create(NewVehicle {
                unique_number: Some(number.into()),
                current_location_id: la.id,
                payload_capacity: 50,
            })
            .await
            .expect_err("malformed identifier");
        assert_matches!(err, ServiceError::FieldErrors(ref fields) if fields.contains_key("unique_number"));
    }

    assert!(app.state.services.vehicles.list().await.expect("list").is_empty());
}
