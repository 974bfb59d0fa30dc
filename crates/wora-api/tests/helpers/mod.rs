//! Test helpers: build AppState and router over an in-memory store.
//!
//! Run from workspace root: `cargo test -p wora-api --test api_test`.

#![allow(dead_code)]

use axum_test::TestServer;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;
use std::sync::Arc;
use wora_api::setup::{routes, services};
use wora_core::{BaseConfig, Config, StorageBackend, StorageConfig, UploadConfig};
use wora_storage::test_helpers::MockStorage;

pub const TEST_JWT_SECRET: &str = "test-jwt-secret-at-least-32-characters-long";
pub const TEST_ADMIN_USERNAME: &str = "admin";
pub const TEST_ADMIN_PASSWORD: &str = "correct-horse-battery";
pub const PUBLIC_URL: &str = "https://cdn.example.com";

/// API path prefix for tests
pub fn api_path(path: &str) -> String {
    format!("/api/v1{}", path)
}

pub fn test_config() -> Config {
    Config {
        base: BaseConfig {
            server_port: 0,
            cors_origins: vec!["*".to_string()],
            environment: "test".to_string(),
            api_version: "v1".to_string(),
            jwt_secret: TEST_JWT_SECRET.to_string(),
            jwt_expiry_hours: 24,
            admin_username: TEST_ADMIN_USERNAME.to_string(),
            admin_password: TEST_ADMIN_PASSWORD.to_string(),
        },
        storage: StorageConfig {
            backend: StorageBackend::S3,
            bucket: "test-bucket".to_string(),
            region: "auto".to_string(),
            endpoint: None,
            access_key: None,
            secret_key: None,
            public_url: PUBLIC_URL.to_string(),
            local_storage_path: None,
        },
        upload: UploadConfig::default(),
    }
}

/// Test application: server plus a handle on the store behind it.
pub struct TestApp {
    pub server: TestServer,
    pub store: MockStorage,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub fn setup_test_app() -> TestApp {
    setup_test_app_with(test_config(), MockStorage::with_base_url(PUBLIC_URL))
}

pub fn setup_test_app_with(config: Config, store: MockStorage) -> TestApp {
    let state = services::initialize_services(config, Arc::new(store.clone()));
    let router = routes::setup_routes(&state.config, state.clone()).expect("routes");
    let server = TestServer::new(router).expect("test server");
    TestApp { server, store }
}

pub fn basic_auth_header(username: &str, password: &str) -> String {
    format!(
        "Basic {}",
        STANDARD.encode(format!("{}:{}", username, password))
    )
}

pub fn admin_basic_auth() -> String {
    basic_auth_header(TEST_ADMIN_USERNAME, TEST_ADMIN_PASSWORD)
}

/// Log in with the test admin and return the bearer token
pub async fn login_token(server: &TestServer) -> String {
    let response = server
        .post(&api_path("/auth/login"))
        .json(&serde_json::json!({
            "username": TEST_ADMIN_USERNAME,
            "password": TEST_ADMIN_PASSWORD,
        }))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    body["token"].as_str().expect("token").to_string()
}

pub fn png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba([30, 144, 255, 255]));
    let mut cursor = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(img)
        .write_to(&mut cursor, ImageFormat::Png)
        .expect("encode png");
    cursor.into_inner()
}
