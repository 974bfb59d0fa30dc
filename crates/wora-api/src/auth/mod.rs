pub mod jwt;
pub mod middleware;
pub mod models;

pub use jwt::JwtService;
pub use middleware::{admin_auth_middleware, AuthState};
pub use models::{AdminIdentity, JwtClaims};
