//! Authenticated HTTP pipeline.
//!
//! Every request goes through [`ApiClient::send`], which attaches the bearer
//! token on the way out and performs at most one refresh-and-retry when the
//! backend answers 401.

mod api_client;
mod error;
mod request;

pub use api_client::{ApiClient, HealthStatus, SessionListener};
pub use error::ClientError;
pub use request::{ApiRequest, Payload};
