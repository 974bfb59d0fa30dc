//! Admin gate: a Bearer JWT or Basic credentials matching the configured admin.

use crate::auth::jwt::JwtService;
use crate::auth::models::AdminIdentity;
use crate::constants::ADMIN_ROLE;
use crate::error::HttpAppError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::sync::Arc;
use subtle::ConstantTimeEq;
use wora_core::{AppError, Config};

#[derive(Clone)]
pub struct AuthState {
    pub jwt: JwtService,
    admin_username: String,
    admin_password: String,
}

fn secure_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

impl AuthState {
    pub fn new(jwt: JwtService, admin_username: &str, admin_password: &str) -> Self {
        Self {
            jwt,
            admin_username: admin_username.to_string(),
            admin_password: admin_password.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            JwtService::new(config.jwt_secret(), config.jwt_expiry_hours()),
            &config.base.admin_username,
            &config.base.admin_password,
        )
    }

    pub fn admin_username(&self) -> &str {
        &self.admin_username
    }

    /// Constant-time check against the configured admin credentials
    pub fn check_credentials(&self, username: &str, password: &str) -> bool {
        // Both comparisons always run
        let user_ok = secure_compare(username, &self.admin_username);
        let pass_ok = secure_compare(password, &self.admin_password);
        user_ok & pass_ok
    }

    /// Resolve an `Authorization` header value to the admin identity
    pub fn authenticate(&self, auth_header: &str) -> Result<AdminIdentity, AppError> {
        if let Some(token) = auth_header.strip_prefix("Bearer ") {
            let claims = self.jwt.verify(token.trim())?;
            return Ok(AdminIdentity {
                username: claims.username,
                role: claims.role,
            });
        }

        if let Some(encoded) = auth_header.strip_prefix("Basic ") {
            let decoded = STANDARD
                .decode(encoded.trim())
                .map_err(|_| AppError::Unauthorized("Invalid basic credentials".to_string()))?;
            let decoded = String::from_utf8(decoded)
                .map_err(|_| AppError::Unauthorized("Invalid basic credentials".to_string()))?;
            let (username, password) = decoded
                .split_once(':')
                .ok_or_else(|| AppError::Unauthorized("Invalid basic credentials".to_string()))?;

            if !self.check_credentials(username, password) {
                return Err(AppError::Unauthorized("Invalid credentials".to_string()));
            }
            return Ok(AdminIdentity {
                username: username.to_string(),
                role: ADMIN_ROLE.to_string(),
            });
        }

        Err(AppError::Unauthorized(
            "Invalid authorization header format".to_string(),
        ))
    }
}

pub async fn admin_auth_middleware(
    State(auth_state): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = match request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
    {
        Some(h) => h,
        None => {
            return HttpAppError(AppError::Unauthorized(
                "Authorization header is required".to_string(),
            ))
            .into_response();
        }
    };

    match auth_state.authenticate(auth_header) {
        Ok(identity) => {
            tracing::debug!(username = %identity.username, "Admin authenticated");
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        Err(e) => {
            tracing::warn!(error = %e, "Admin authentication failed");
            HttpAppError(e).into_response()
        }
    }
}
