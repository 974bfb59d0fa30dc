//! Wora API Library
//!
//! HTTP handlers, authentication and application setup for the image backend.

pub mod auth;
pub mod constants;
pub mod error;
mod handlers;
pub mod setup;
pub mod state;
pub mod telemetry;
mod utils;

pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
