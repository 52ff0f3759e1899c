use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use patient_cell::router::patient_routes;
use shared_utils::test_utils::{JwtTestUtils, TestConfig, TestUser};

async fn create_test_app(mock_server: &MockServer) -> (Router, TestConfig) {
    let config = TestConfig::with_store_url(&mock_server.uri());
    let app = patient_routes(Arc::new(config.to_app_config()));
    (app, config)
}

fn patient_row(id: &str, name: &str, email: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "email": email,
        "contact_number": "0770000000",
        "address": "1 Clinic Road",
        "date_of_birth": "1990-01-01",
        "gender": "female"
    })
}

#[tokio::test]
async fn roster_has_one_entry_per_distinct_patient_across_both_tables() {
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

    // p1 appears in the free table, p1 and p2 in the paid table: the union
    // must collapse to exactly two ids.
    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("doctor_id", format!("eq.{}", doctor_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"patient_id": "p1", "patient_name": "Pat One"}
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/paid_appointments"))
        .and(query_param("doctor_id", format!("eq.{}", doctor_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"patient_id": "p1", "patient_name": "Pat One"},
            {"patient_id": "p2", "patient_name": "Pat Two"}
        ])))
        .mount(&mock_server)
        .await;

    // p1 resolves to a formal record; p2 does not.
    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .and(query_param("id", "eq.p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            patient_row("p1", "Pat One", "pat.one@example.com")
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .and(query_param("id", "eq.p2"))
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
    let roster: Value = serde_json::from_slice(&body).unwrap();
    let entries = roster.as_array().unwrap();

    // Ordering is unspecified: compare as a set of ids.
    assert_eq!(entries.len(), 2);
    let ids: HashSet<&str> = entries.iter().map(|e| e["id"].as_str().unwrap()).collect();
    assert_eq!(ids, HashSet::from(["p1", "p2"]));

    let registered = entries.iter().find(|e| e["id"] == "p1").unwrap();
    assert_eq!(registered["email"], "pat.one@example.com");

    // The unresolved id synthesizes a placeholder: captured name, "N/A"
    // email, nulls everywhere else.
    let placeholder = entries.iter().find(|e| e["id"] == "p2").unwrap();
    assert_eq!(placeholder["name"], "Pat Two");
    assert_eq!(placeholder["email"], "N/A");
    assert!(placeholder["contact_number"].is_null());
    assert!(placeholder["date_of_birth"].is_null());
}

#[tokio::test]
async fn roster_for_user_without_profile_is_not_found() {
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
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn get_unknown_patient_is_not_found() {
    let mock_server = MockServer::start().await;
    let (app, _) = create_test_app(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("GET")
        .uri("/p-missing")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_patient_returns_created_row() {
    let mock_server = MockServer::start().await;
    let (app, _) = create_test_app(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/patients"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            patient_row("p1", "Pat One", "pat.one@example.com")
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({"name": "Pat One", "email": "pat.one@example.com"}).to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let patient: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(patient["id"], "p1");
}
