use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use billing_cell::router::paid_appointment_routes;
use shared_utils::test_utils::{JwtTestUtils, TestConfig, TestUser};

fn paid_row(id: &str, doctor_id: &str, status: &str, qr_code: Value) -> Value {
    json!({
        "id": id,
        "doctor_id": doctor_id,
        "patient_id": "p1",
        "patient_name": "Pat Doe",
        "scheduled_at": "2025-02-01T08:45:00Z",
        "notes": null,
        "status": status,
        "amount": 45.0,
        "payment_date": null,
        "payment_method": "card",
        "qr_code": qr_code,
        "created_at": "2024-01-01T00:00:00Z",
        "updated_at": "2024-01-01T00:00:00Z"
    })
}

async fn create_test_app(mock_server: &MockServer) -> (Router, TestConfig) {
    let config = TestConfig::with_store_url(&mock_server.uri());
    let app = paid_appointment_routes(Arc::new(config.to_app_config()));
    (app, config)
}

#[tokio::test]
async fn create_with_unknown_doctor_is_not_found() {
    let mock_server = MockServer::start().await;
    let (app, _) = create_test_app(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "doctor_id": Uuid::new_v4(),
                "patient_id": "p1",
                "patient_name": "Pat Doe"
            })
            .to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn created_paid_appointment_starts_in_progress() {
    let mock_server = MockServer::start().await;
    let (app, _) = create_test_app(&mock_server).await;

    let doctor_id = Uuid::new_v4().to_string();
    let appointment_id = Uuid::new_v4().to_string();

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("id", format!("eq.{}", doctor_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": doctor_id}])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/paid_appointments"))
        .and(body_partial_json(json!({"status": "IN_PROGRESS"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            paid_row(&appointment_id, &doctor_id, "IN_PROGRESS", json!(null))
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "doctor_id": doctor_id,
                "patient_id": "p1",
                "patient_name": "Pat Doe",
                "amount": 45.0,
                "payment_method": "card"
            })
            .to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn finish_sets_status_and_a_fresh_completion_proof() {
    let mock_server = MockServer::start().await;
    let (app, _) = create_test_app(&mock_server).await;

    let appointment_id = Uuid::new_v4().to_string();
    let doctor_id = Uuid::new_v4().to_string();
    let previous_proof = "data:image/png;base64,T0xEUFJPT0Y=";

    Mock::given(method("GET"))
        .and(path("/rest/v1/paid_appointments"))
        .and(query_param("id", format!("eq.{}", appointment_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            paid_row(&appointment_id, &doctor_id, "IN_PROGRESS", json!(previous_proof))
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/paid_appointments"))
        .and(body_partial_json(json!({"status": "FINISHED"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            paid_row(&appointment_id, &doctor_id, "FINISHED", json!("placeholder"))
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("PATCH")
        .uri(&format!("/{}/finish", appointment_id))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Inspect what was actually written: FINISHED plus a non-empty proof
    // that differs from the previous artifact.
    let requests = mock_server.received_requests().await.unwrap();
    let patch = requests
        .iter()
        .find(|r| r.method.as_str() == "PATCH")
        .expect("a PATCH must have been issued");
    let written: Value = serde_json::from_slice(&patch.body).unwrap();

    assert_eq!(written["status"], "FINISHED");
    let proof = written["qr_code"].as_str().unwrap();
    assert!(proof.starts_with("data:image/png;base64,"));
    assert_ne!(proof, previous_proof);
}

#[tokio::test]
async fn finish_for_missing_appointment_is_not_found() {
    let mock_server = MockServer::start().await;
    let (app, _) = create_test_app(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/paid_appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("PATCH")
        .uri(&format!("/{}/finish", Uuid::new_v4()))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn generic_update_moves_finished_back_to_in_progress() {
    let mock_server = MockServer::start().await;
    let (app, _) = create_test_app(&mock_server).await;

    let appointment_id = Uuid::new_v4().to_string();
    let doctor_id = Uuid::new_v4().to_string();

    // No transition guard: a FINISHED row accepts IN_PROGRESS again.
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/paid_appointments"))
        .and(query_param("id", format!("eq.{}", appointment_id)))
        .and(body_partial_json(json!({"status": "IN_PROGRESS"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            paid_row(&appointment_id, &doctor_id, "IN_PROGRESS", json!(null))
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("PATCH")
        .uri(&format!("/{}", appointment_id))
        .header("content-type", "application/json")
        .body(Body::from(json!({"status": "IN_PROGRESS"}).to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let appointment: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(appointment["status"], "IN_PROGRESS");
}

#[tokio::test]
async fn remove_missing_row_is_not_found() {
    let mock_server = MockServer::start().await;
    let (app, _) = create_test_app(&mock_server).await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/paid_appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("DELETE")
        .uri(&format!("/{}", Uuid::new_v4()))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn remove_deletes_the_row() {
    let mock_server = MockServer::start().await;
    let (app, _) = create_test_app(&mock_server).await;

    let appointment_id = Uuid::new_v4().to_string();
    let doctor_id = Uuid::new_v4().to_string();

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/paid_appointments"))
        .and(query_param("id", format!("eq.{}", appointment_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            paid_row(&appointment_id, &doctor_id, "IN_PROGRESS", json!(null))
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("DELETE")
        .uri(&format!("/{}", appointment_id))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn my_finished_filters_by_status_for_the_linked_doctor() {
    let mock_server = MockServer::start().await;
    let (app, config) = create_test_app(&mock_server).await;

    let user = TestUser::default();
    let token = JwtTestUtils::create_test_token(&user, &config.jwt_access_secret, Some(1));
    let doctor_id = Uuid::new_v4().to_string();

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("user_id", format!("eq.{}", user.id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": doctor_id}])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/paid_appointments"))
        .and(query_param("doctor_id", format!("eq.{}", doctor_id)))
        .and(query_param("status", "eq.FINISHED"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            paid_row(&Uuid::new_v4().to_string(), &doctor_id, "FINISHED", json!("data:image/png;base64,QQ=="))
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("GET")
        .uri("/my/finished")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let listing: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(listing.as_array().unwrap().len(), 1);
    assert_eq!(listing[0]["status"], "FINISHED");
    // List projections apply the minute-precision formatting to both
    // timestamps.
    assert_eq!(listing[0]["scheduled_at"], "2025-02-01 08:45");
    assert_eq!(listing[0]["payment_date"], "");
}

#[tokio::test]
async fn my_listing_without_linked_profile_is_empty() {
    let mock_server = MockServer::start().await;
    let (app, config) = create_test_app(&mock_server).await;

    let user = TestUser::default();
    let token = JwtTestUtils::create_test_token(&user, &config.jwt_access_secret, Some(1));

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("GET")
        .uri("/my")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let listing: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(listing, json!([]));
}

#[tokio::test]
async fn unfiltered_listing_is_enriched_with_doctor_names() {
    let mock_server = MockServer::start().await;
    let (app, _) = create_test_app(&mock_server).await;

    let doctor_id = Uuid::new_v4().to_string();

    Mock::given(method("GET"))
        .and(path("/rest/v1/paid_appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            paid_row(&Uuid::new_v4().to_string(), &doctor_id, "IN_PROGRESS", json!(null))
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("id", format!("in.({})", doctor_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": doctor_id, "name": "Dr. Who"}
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("GET")
        .uri("/")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let listing: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(listing[0]["doctor_name"], "Dr. Who");
}
