use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn appointment_routes(state: Arc<AppConfig>) -> Router {
    let public_routes = Router::new()
        .route("/", post(handlers::create_appointment))
        .route("/doctor/{doctor_id}", get(handlers::find_by_doctor))
        .route("/{id}/accept", patch(handlers::accept_appointment))
        .route("/{id}/reject", patch(handlers::reject_appointment))
        .route("/{id}/status", patch(handlers::update_status));

    let protected_routes = Router::new()
        .route("/my", get(handlers::my_appointments))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
