pub mod auth;

pub use auth::{AdminAuthMiddleware, AuthMiddleware};
