use axum::{body::Body, http::Request, http::StatusCode, middleware, routing::get, Router};
use serde_json::Value;
use tower::ServiceExt;

use shared_models::error::AppError;
use shared_utils::envelope::error_envelope_middleware;

async fn missing_handler() -> Result<String, AppError> {
    Err(AppError::NotFound("Doctor not found".to_string()))
}

fn test_app() -> Router {
    Router::new()
        .route("/ok", get(|| async { "all good" }))
        .route("/missing", get(missing_handler))
        .layer(middleware::from_fn(error_envelope_middleware))
}

#[tokio::test]
async fn errors_leave_through_the_uniform_envelope() {
    let app = test_app();

    let response = app
        .oneshot(Request::builder().uri("/missing").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let envelope: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(envelope["statusCode"], 404);
    assert_eq!(envelope["path"], "/missing");
    assert_eq!(envelope["message"], "Doctor not found");
    assert!(envelope["timestamp"].is_string());
}

#[tokio::test]
async fn successful_responses_pass_through_untouched() {
    let app = test_app();

    let response = app
        .oneshot(Request::builder().uri("/ok").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"all good");
}

#[tokio::test]
async fn router_fallbacks_are_wrapped_too() {
    let app = test_app();

    let response = app
        .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let envelope: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(envelope["statusCode"], 404);
    assert_eq!(envelope["path"], "/nope");
}
