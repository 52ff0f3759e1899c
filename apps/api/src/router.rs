use std::sync::Arc;

use axum::{middleware, routing::get, Router};

use appointment_cell::router::appointment_routes;
use auth_cell::router::auth_routes;
use billing_cell::router::paid_appointment_routes;
use doctor_cell::router::doctor_routes;
use medical_report_cell::router::medical_report_routes;
use patient_cell::router::patient_routes;
use shared_config::AppConfig;
use shared_utils::envelope::error_envelope_middleware;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Clinic Admin API is running!" }))
        .nest("/auth", auth_routes(state.clone()))
        .nest("/doctor", doctor_routes(state.clone()))
        .nest("/appointment", appointment_routes(state.clone()))
        .nest("/paid-appointment", paid_appointment_routes(state.clone()))
        .nest("/patient", patient_routes(state.clone()))
        .nest("/medical-reports", medical_report_routes(state))
        // Every failure leaves through the uniform error envelope.
        .layer(middleware::from_fn(error_envelope_middleware))
}
