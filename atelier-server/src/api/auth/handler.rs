//! Authentication Handlers
//!
//! Handles admin login and identity lookup.

use std::time::Duration;

use axum::{Form, Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentAdmin;
use crate::core::ServerState;
use crate::services::AuthService;
use crate::utils::{AppError, AppResult};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// Login request payload (form body; `username` carries the admin email)
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response with bearer token
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

/// Admin identity returned by `/admin/me`
#[derive(Debug, Serialize)]
pub struct AdminInfo {
    pub id: i64,
    pub email: String,
    pub is_active: bool,
}

/// Login handler
///
/// Authenticates admin credentials and returns a JWT token
pub async fn login(
    State(state): State<ServerState>,
    Form(req): Form<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let auth = AuthService::new(state.store(), state.config.clone());
    let admin = auth.authenticate(&req.username, &req.password).await?;

    // Fixed delay before reporting the outcome (timing attacks)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let admin = admin.ok_or(AppError::InvalidCredentials)?;

    let token = state
        .jwt_service()
        .issue_token(&admin.email)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    tracing::info!(admin_id = admin.id, email = %admin.email, "Admin logged in");

    Ok(Json(TokenResponse {
        access_token: token,
        token_type: "bearer",
    }))
}

/// Get current admin info
///
/// The extractor already re-read the record from the store, so this reflects
/// current state rather than the token payload.
pub async fn me(CurrentAdmin(admin): CurrentAdmin) -> Json<AdminInfo> {
    Json(AdminInfo {
        id: admin.id,
        email: admin.email,
        is_active: admin.is_active,
    })
}
