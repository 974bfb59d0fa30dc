use crate::constants::{ADMIN_ROLE, ADMIN_USER_ID};
use crate::error::{HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use wora_core::AppError;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthUser {
    pub id: u64,
    pub username: String,
    pub role: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub message: String,
    pub user: AuthUser,
}

/// Exchange the admin credentials for a bearer token
#[tracing::instrument(skip(state, request), fields(username = %request.username))]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, HttpAppError> {
    if !state
        .auth
        .check_credentials(&request.username, &request.password)
    {
        tracing::warn!("Login rejected");
        return Err(AppError::Unauthorized("Invalid credentials".to_string()).into());
    }

    let token = state
        .auth
        .jwt
        .issue(&request.username, ADMIN_USER_ID, ADMIN_ROLE)?;

    tracing::info!("Admin logged in");
    Ok(Json(LoginResponse {
        success: true,
        token,
        message: "Login successful".to_string(),
        user: AuthUser {
            id: ADMIN_USER_ID,
            username: request.username,
            role: ADMIN_ROLE.to_string(),
        },
    }))
}
