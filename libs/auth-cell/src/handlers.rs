use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::StatusCode,
};
use tracing::debug;

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{AccountResponse, LoginRequest, LoginResponse, RegisterRequest, UserSummary};
use crate::services::credential::CredentialService;

#[axum::debug_handler]
pub async fn register(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AccountResponse>), AppError> {
    debug!("Registration requested for: {}", request.email);

    let service = CredentialService::new(&state);
    let account = service.register(request).await?;

    Ok((StatusCode::CREATED, Json(account)))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    debug!("Login requested for: {}", request.email);

    let service = CredentialService::new(&state);
    let account = service.authenticate(&request.email, &request.password).await?;
    let tokens = service.issue_token_pair(&account)?;

    Ok(Json(LoginResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        user: UserSummary {
            id: account.id,
            email: account.email,
            name: account.name,
        },
    }))
}
