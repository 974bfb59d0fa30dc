//! Data models shared between the services and the HTTP layer.

mod asset;
mod storage;

pub use asset::*;
pub use storage::*;
