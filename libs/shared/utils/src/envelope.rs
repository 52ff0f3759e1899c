use axum::{
    body::{to_bytes, Body},
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};

/// Boundary middleware that reshapes every error-status response into the
/// uniform failure envelope `{statusCode, timestamp, path, message}`.
/// Handler errors carry their text in a `message` body field; anything else
/// (extractor rejections, plain-text bodies) is wrapped as-is.
pub async fn error_envelope_middleware(request: Request<Body>, next: Next) -> Response {
    let path = request.uri().path().to_string();

    let response = next.run(request).await;
    let status = response.status();

    if !status.is_client_error() && !status.is_server_error() {
        return response;
    }

    let (_, body) = response.into_parts();
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(_) => return status.into_response(),
    };

    let message = serde_json::from_slice::<Value>(&bytes)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| String::from_utf8_lossy(&bytes).trim().to_string());

    let envelope = json!({
        "statusCode": status.as_u16(),
        "timestamp": Utc::now().to_rfc3339(),
        "path": path,
        "message": message,
    });

    (status, Json(envelope)).into_response()
}
