use crate::error::HttpAppError;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde::{Deserialize, Serialize};
use wora_core::AppError;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JwtClaims {
    pub username: String,
    pub user_id: u64,
    pub role: String,
    pub exp: i64, // expiration timestamp
    pub iat: i64, // issued at timestamp
    pub nbf: i64, // not-before timestamp
}

/// Authenticated administrator, stored in request extensions by the auth middleware
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminIdentity {
    pub username: String,
    pub role: String,
}

// Read directly from parts so it composes with Multipart
impl<S> FromRequestParts<S> for AdminIdentity
where
    S: Send + Sync,
{
    type Rejection = HttpAppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AdminIdentity>()
            .cloned()
            .ok_or_else(|| {
                HttpAppError(AppError::Unauthorized(
                    "Missing admin identity".to_string(),
                ))
            })
    }
}
