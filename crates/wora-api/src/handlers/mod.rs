pub mod analytics;
pub mod auth;
pub mod cleanup;
pub mod health;
pub mod upload;
