use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn doctor_routes(state: Arc<AppConfig>) -> Router {
    let public_routes = Router::new()
        .route("/", get(handlers::find_all))
        .route("/user/{user_id}", get(handlers::find_by_user_id))
        .route(
            "/{id}",
            post(handlers::create_doctor)
                .get(handlers::find_one)
                .patch(handlers::update_doctor)
                .delete(handlers::remove_doctor),
        )
        .route("/{id}/time-slots", get(handlers::get_time_slots));

    let protected_routes = Router::new()
        .route(
            "/me/time-slots",
            get(handlers::get_my_time_slots).post(handlers::update_my_time_slots),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
