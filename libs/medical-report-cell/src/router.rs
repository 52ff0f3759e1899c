use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

/// Headroom for ten 5 MB attachments plus the metadata fields.
const MAX_UPLOAD_BYTES: usize = 55 * 1024 * 1024;

pub fn medical_report_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", post(handlers::create_report))
        .route("/patient/{patient_id}", get(handlers::find_by_patient))
        .route("/appointment/{appointment_id}", get(handlers::find_by_appointment))
        .route("/{id}", get(handlers::find_one))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}
