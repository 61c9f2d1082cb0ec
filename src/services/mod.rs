//! Typed operations over the authenticated pipeline.

pub mod admin_service;
pub mod anime_service;
pub mod auth_service;
pub mod validation;

pub use admin_service::AdminService;
pub use anime_service::AnimeService;
pub use auth_service::AuthService;
