//! Configuration module
//!
//! This module provides the configuration structures for the API and the media
//! services: server settings, admin credentials, object storage and upload limits.

use std::env;

use crate::storage_types::StorageBackend;

// Common constants
const SERVER_PORT: u16 = 3000;
const JWT_EXPIRY_HOURS: i64 = 24;
const MAX_FILE_UPLOAD_SIZE_BYTES: u64 = 4 * 1024 * 1024;
const STORAGE_LIMIT_GB: f64 = 1.0;
const MAX_IMAGE_DIMENSION: u32 = 2048;
const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Server and authentication settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub api_version: String,
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
    pub admin_username: String,
    pub admin_password: String,
}

/// Object storage settings (S3-compatible bucket or local directory)
#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub bucket: String,
    pub region: String,
    /// Custom endpoint for S3-compatible providers (Cloudflare R2, MinIO, ...)
    pub endpoint: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    /// Public base URL under which stored objects are served. No trailing slash.
    pub public_url: String,
    pub local_storage_path: Option<String>,
}

/// Upload limits
#[derive(Clone, Debug)]
pub struct UploadConfig {
    pub max_file_size_bytes: u64,
    pub storage_limit_gb: f64,
    pub max_image_dimension: u32,
}

impl UploadConfig {
    /// Storage ceiling converted from GB to bytes.
    pub fn storage_limit_bytes(&self) -> u64 {
        (self.storage_limit_gb * BYTES_PER_GB) as u64
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size_bytes: MAX_FILE_UPLOAD_SIZE_BYTES,
            storage_limit_gb: STORAGE_LIMIT_GB,
            max_image_dimension: MAX_IMAGE_DIMENSION,
        }
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub base: BaseConfig,
    pub storage: StorageConfig,
    pub upload: UploadConfig,
}

impl Config {
    /// Load configuration from the process environment (and `.env` when present).
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|s| !s.trim().is_empty());

        let environment = var("ENVIRONMENT")
            .or_else(|| var("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins_str = var("CORS_ORIGINS").unwrap_or_else(|| "*".to_string());
        if is_production_name(&environment) && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }
        let cors_origins = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        let base = BaseConfig {
            server_port: var("PORT")
                .unwrap_or_else(|| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            environment,
            api_version: var("API_VERSION").unwrap_or_else(|| "v1".to_string()),
            jwt_secret: var("JWT_SECRET")
                .ok_or_else(|| anyhow::anyhow!("JWT_SECRET must be set for authentication"))?,
            jwt_expiry_hours: var("JWT_EXPIRY_HOURS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(JWT_EXPIRY_HOURS),
            admin_username: var("ADMIN_USERNAME")
                .ok_or_else(|| anyhow::anyhow!("ADMIN_USERNAME must be set"))?,
            admin_password: var("ADMIN_PASSWORD")
                .ok_or_else(|| anyhow::anyhow!("ADMIN_PASSWORD must be set"))?,
        };

        let backend = match var("STORAGE_BACKEND") {
            Some(s) => s.parse()?,
            None => StorageBackend::S3,
        };

        let public_url = match backend {
            StorageBackend::S3 => var("R2_PUBLIC_URL"),
            StorageBackend::Local => var("LOCAL_STORAGE_BASE_URL"),
        }
        .unwrap_or_default()
        .trim_end_matches('/')
        .to_string();

        let storage = StorageConfig {
            backend,
            bucket: var("R2_BUCKET_NAME").unwrap_or_else(|| "yaro-wora-images".to_string()),
            region: var("R2_REGION").unwrap_or_else(|| "auto".to_string()),
            endpoint: var("R2_ENDPOINT"),
            access_key: var("R2_ACCESS_KEY"),
            secret_key: var("R2_SECRET_KEY"),
            public_url,
            local_storage_path: var("LOCAL_STORAGE_PATH"),
        };

        let upload = UploadConfig {
            max_file_size_bytes: var("MAX_FILE_UPLOAD_SIZE_IN_BYTES")
                .and_then(|s| s.parse().ok())
                .unwrap_or(MAX_FILE_UPLOAD_SIZE_BYTES),
            storage_limit_gb: var("STORAGE_LIMIT_GB")
                .and_then(|s| s.parse().ok())
                .unwrap_or(STORAGE_LIMIT_GB),
            max_image_dimension: var("MAX_IMAGE_DIMENSION")
                .and_then(|s| s.parse().ok())
                .unwrap_or(MAX_IMAGE_DIMENSION),
        };

        let config = Config {
            base,
            storage,
            upload,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.base.jwt_secret.len() < 32 {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least 32 characters long"
            ));
        }

        if self.upload.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!(
                "MAX_FILE_UPLOAD_SIZE_IN_BYTES must be greater than zero"
            ));
        }

        if !(self.upload.storage_limit_gb > 0.0) {
            return Err(anyhow::anyhow!("STORAGE_LIMIT_GB must be greater than zero"));
        }

        if self.upload.max_image_dimension == 0 {
            return Err(anyhow::anyhow!(
                "MAX_IMAGE_DIMENSION must be greater than zero"
            ));
        }

        match self.storage.backend {
            StorageBackend::S3 => {
                if self.storage.public_url.is_empty() {
                    return Err(anyhow::anyhow!(
                        "R2_PUBLIC_URL must be set when using S3 storage backend"
                    ));
                }
                if self.storage.access_key.is_some() != self.storage.secret_key.is_some() {
                    return Err(anyhow::anyhow!(
                        "R2_ACCESS_KEY and R2_SECRET_KEY must be set together"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.storage.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
                if self.storage.public_url.is_empty() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_BASE_URL must be set when using local storage backend"
                    ));
                }
            }
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_name(&self.base.environment)
    }

    // Convenience getters for common fields
    pub fn server_port(&self) -> u16 {
        self.base.server_port
    }

    pub fn environment(&self) -> &str {
        &self.base.environment
    }

    pub fn api_version(&self) -> &str {
        &self.base.api_version
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.base.cors_origins
    }

    pub fn jwt_secret(&self) -> &str {
        &self.base.jwt_secret
    }

    pub fn jwt_expiry_hours(&self) -> i64 {
        self.base.jwt_expiry_hours
    }

    pub fn public_url(&self) -> &str {
        &self.storage.public_url
    }

    pub fn max_file_size_bytes(&self) -> u64 {
        self.upload.max_file_size_bytes
    }

    pub fn storage_limit_bytes(&self) -> u64 {
        self.upload.storage_limit_bytes()
    }

    pub fn max_image_dimension(&self) -> u32 {
        self.upload.max_image_dimension
    }
}

fn is_production_name(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}
