//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`. Any `AppError` (or
//! type convertible into one) becomes an `HttpAppError` through `?` and renders
//! with a consistent status, body and log line.

use axum::{
    extract::rejection::JsonRejection,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Serialize};
use wora_core::{AppError, ErrorMetadata, LogLevel};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether retrying the same request can succeed
    pub recoverable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

/// Wrapper so `IntoResponse` can be implemented for the core error type
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

impl From<JsonRejection> for HttpAppError {
    fn from(rejection: JsonRejection) -> Self {
        HttpAppError(AppError::InvalidInput(format!(
            "Invalid request body: {}",
            rejection.body_text()
        )))
    }
}

/// JSON body extractor that rejects with our `ErrorResponse` shape
#[derive(Debug, Clone, Copy)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = HttpAppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(inner) = Json::<T>::from_request(req, state)
            .await
            .map_err(HttpAppError::from)?;
        Ok(ValidatedJson(inner))
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Error occurred");
        }
    }
}

fn is_production_env() -> bool {
    std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .map(|env| env.to_lowercase() == "production" || env.to_lowercase() == "prod")
        .unwrap_or(false)
}

fn error_body(app_error: &AppError, hide_details: bool) -> ErrorResponse {
    let (details, error_type) = if hide_details {
        (None, None)
    } else {
        (
            Some(app_error.detailed_message()),
            Some(app_error.error_type().to_string()),
        )
    };

    ErrorResponse {
        error: app_error.client_message(),
        details,
        error_type,
        code: app_error.error_code().to_string(),
        recoverable: app_error.is_recoverable(),
        suggested_action: app_error.suggested_action().map(String::from),
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        // Details never leave the process in production or for sensitive errors
        let hide_details = is_production_env() || app_error.is_sensitive();
        (status, Json(error_body(app_error, hide_details))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensitive_error_hides_details() {
        let err = AppError::StorageWrite("bucket yaro-wora-images: access denied".to_string());
        let body = error_body(&err, err.is_sensitive());

        assert_eq!(body.code, "STORAGE_WRITE_ERROR");
        assert!(body.details.is_none());
        assert!(body.error_type.is_none());
        assert!(!body.error.contains("access denied"));
    }

    #[test]
    fn test_quota_error_body() {
        let err = AppError::QuotaExceeded {
            current_bytes: 1_070_000_000,
            candidate_bytes: 5_000_000,
            limit_bytes: 1024 * 1024 * 1024,
        };
        let body = error_body(&err, false);

        assert_eq!(body.code, "STORAGE_LIMIT_EXCEEDED");
        assert!(body.error.contains("Limit: 1.00 GB"));
        assert!(body.details.is_some());
    }

    #[test]
    fn test_status_codes() {
        let response = HttpAppError(AppError::FileTooLarge {
            size: 5_000_000,
            max: 4_194_304,
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

        let response = HttpAppError(AppError::Unauthorized("no token".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = HttpAppError(AppError::InvalidUrl("x".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_from_anyhow_is_internal() {
        let HttpAppError(app_err) = anyhow::anyhow!("boom").into();
        assert_eq!(app_err.error_code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_error_response_shape() {
        let body = error_body(&AppError::InvalidInput("bad folder".to_string()), false);
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["code"], "INVALID_INPUT");
        assert_eq!(json["recoverable"], false);
        assert!(json["error"].is_string());
        assert!(json.get("details").is_some());
    }
}
