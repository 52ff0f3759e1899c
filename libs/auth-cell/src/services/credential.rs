use std::sync::OnceLock;

use regex::Regex;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, warn};

use shared_config::AppConfig;
use shared_database::{StoreError, SupabaseClient};
use shared_models::auth::TokenPair;
use shared_models::error::AppError;
use shared_utils::jwt;

use crate::models::{Account, AccountResponse, RegisterRequest};
use crate::services::password;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"))
}

fn representation_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("Prefer", HeaderValue::from_static("return=representation"));
    headers
}

pub struct CredentialService {
    supabase: SupabaseClient,
    config: AppConfig,
}

impl CredentialService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            config: config.clone(),
        }
    }

    /// Create the account and its linked doctor profile. The store's unique
    /// email constraint is the only duplicate check. If the profile insert
    /// fails, the freshly created account row is deleted again so no
    /// credential is left behind without a profile.
    pub async fn register(&self, request: RegisterRequest) -> Result<AccountResponse, AppError> {
        Self::validate_registration(&request)?;

        debug!("Registering account for: {}", request.email);

        let hash = password::hash_password(&request.password)
            .map_err(|e| AppError::Internal(e.to_string()))?;

        let now = chrono::Utc::now().to_rfc3339();
        let account_data = json!({
            "name": request.name,
            "email": request.email,
            "password_hash": hash,
            "created_at": now,
            "updated_at": now,
        });

        let created: Vec<Account> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/users",
                Some(account_data),
                Some(representation_headers()),
            )
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => AppError::Conflict("Email already registered".to_string()),
                other => other.into(),
            })?;

        let account = created
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Database("Failed to create account".to_string()))?;

        let profile_data = json!({
            "name": request.name,
            "email": request.email,
            "specialization": request.specialization,
            "contact_number": request.contact_number,
            "nic": request.nic,
            "gender": request.gender,
            "available_time_slots": request.available_time_slots,
            "user_id": account.id,
        });

        let profile: Result<Vec<Value>, StoreError> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/doctors",
                Some(profile_data),
                Some(representation_headers()),
            )
            .await;

        if let Err(err) = profile {
            warn!("Doctor profile creation failed, rolling back account {}", account.id);
            let rollback: Result<Vec<Value>, StoreError> = self
                .supabase
                .request_with_headers(
                    Method::DELETE,
                    &format!("/rest/v1/users?id=eq.{}", account.id),
                    None,
                    Some(representation_headers()),
                )
                .await;
            if rollback.is_err() {
                warn!("Rollback of account {} failed", account.id);
            }
            return Err(err.into());
        }

        debug!("Account registered with id: {}", account.id);
        Ok(AccountResponse::from(account))
    }

    /// Verify credentials. An unknown email and a wrong password produce the
    /// identical error so callers cannot tell which one failed.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Account, AppError> {
        let rows: Vec<Account> = self
            .supabase
            .request(Method::GET, &format!("/rest/v1/users?email=eq.{}", email), None)
            .await
            .map_err(AppError::from)?;

        match rows.into_iter().next() {
            Some(account)
                if password::verify_password(password, &account.password_hash).unwrap_or(false) =>
            {
                Ok(account)
            }
            _ => Err(AppError::Auth("Invalid credentials".to_string())),
        }
    }

    /// Access and refresh tokens are signed with independent secrets and
    /// expirations. There is no revocation; refresh tokens live until expiry.
    pub fn issue_token_pair(&self, account: &Account) -> Result<TokenPair, AppError> {
        let subject = account.id.to_string();

        let access_token = jwt::issue_token(
            &subject,
            Some(&account.email),
            &self.config.jwt_access_secret,
            self.config.jwt_access_expiration_secs,
        )
        .map_err(AppError::Internal)?;

        let refresh_token = jwt::issue_token(
            &subject,
            Some(&account.email),
            &self.config.jwt_refresh_secret,
            self.config.jwt_refresh_expiration_secs,
        )
        .map_err(AppError::Internal)?;

        Ok(TokenPair { access_token, refresh_token })
    }

    fn validate_registration(request: &RegisterRequest) -> Result<(), AppError> {
        if request.name.trim().is_empty() {
            return Err(AppError::ValidationError("name must not be empty".to_string()));
        }
        if !email_pattern().is_match(&request.email) {
            return Err(AppError::ValidationError("email must be a valid address".to_string()));
        }
        if request.password.len() < 6 {
            return Err(AppError::ValidationError(
                "password must be at least 6 characters".to_string(),
            ));
        }
        Ok(())
    }
}
