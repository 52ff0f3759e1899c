use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn paid_appointment_routes(state: Arc<AppConfig>) -> Router {
    let public_routes = Router::new()
        .route("/", post(handlers::create_paid_appointment).get(handlers::find_all))
        .route("/doctor/{doctor_id}", get(handlers::find_by_doctor))
        .route(
            "/doctor/{doctor_id}/status/{status}",
            get(handlers::find_by_doctor_and_status),
        )
        .route(
            "/{id}",
            get(handlers::find_one)
                .patch(handlers::update_paid_appointment)
                .delete(handlers::remove),
        )
        .route("/{id}/finish", patch(handlers::mark_as_finished))
        .route("/{id}/in-progress", patch(handlers::mark_as_in_progress))
        .route("/{id}/cancel", patch(handlers::cancel));

    let protected_routes = Router::new()
        .route("/my", get(handlers::my_paid_appointments))
        .route("/my/finished", get(handlers::my_finished_appointments))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
