//! HS256 token issuing and verification.

use crate::auth::models::JwtClaims;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use wora_core::AppError;

#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_hours: i64,
}

impl JwtService {
    pub fn new(secret: &str, expiry_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiry_hours,
        }
    }

    pub fn issue(&self, username: &str, user_id: u64, role: &str) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = JwtClaims {
            username: username.to_string(),
            user_id,
            role: role.to_string(),
            exp: (now + Duration::hours(self.expiry_hours)).timestamp(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
    }

    pub fn verify(&self, token: &str) -> Result<JwtClaims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_nbf = true;

        let token_data = decode::<JwtClaims>(token, &self.decoding_key, &validation).map_err(|e| {
            let reason = match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => "Token has expired",
                jsonwebtoken::errors::ErrorKind::ImmatureSignature => "Token is not yet valid",
                _ => "Invalid or expired token",
            };
            AppError::Unauthorized(reason.to_string())
        })?;

        Ok(token_data.claims)
    }
}
