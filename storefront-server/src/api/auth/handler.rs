//! Authentication Handlers
//!
//! Admin login against the single shared credential.

use std::time::Duration;

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
}

/// Login handler
///
/// Verifies the shared admin password against the stored argon2 hash and
/// issues a short-lived bearer token.
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    if req.password.is_empty() {
        return Err(AppError::Validation("Password is required".to_string()));
    }

    let config = state.admin_repository().find().await?;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let config = match config {
        Some(c) => c,
        None => {
            tracing::warn!("Login attempt but admin config is not provisioned");
            return Err(AppError::invalid_credentials());
        }
    };

    let password_valid = config
        .verify_password(&req.password)
        .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))?;

    if !password_valid {
        tracing::warn!("Login failed - invalid password");
        return Err(AppError::invalid_credentials());
    }

    let token = state
        .jwt_service
        .generate_admin_token()
        .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))?;

    tracing::info!("Admin logged in successfully");

    Ok(Json(LoginResponse {
        token,
        expires_in: state.jwt_service.expires_in_seconds(),
    }))
}
