use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Connection settings for the backend REST service.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_in_ms")]
    pub timeout_in_ms: u64,
    /// How login credentials are sent to the login endpoint.
    #[serde(default = "default_login_encoding")]
    pub login_encoding: PayloadEncoding,
    /// How the refresh token is sent to the refresh endpoint.
    #[serde(default = "default_refresh_encoding")]
    pub refresh_encoding: PayloadEncoding,
    #[serde(default)]
    pub endpoints: EndpointsConfig,
    /// Registrations below this age are rejected locally.
    #[serde(default = "default_minimum_age")]
    pub minimum_age: u32,
}

/// Body encodings understood by the login and refresh endpoints.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PayloadEncoding {
    /// `application/json` body.
    Json,
    /// `application/x-www-form-urlencoded` body (OAuth2 password flow).
    Form,
    /// Values travel in the query string, the body stays empty.
    Query,
}

/// Paths of the auth endpoints, relative to `base_url`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
pub struct EndpointsConfig {
    #[serde(default = "default_login")]
    pub login: String,
    #[serde(default = "default_register")]
    pub register: String,
    #[serde(default = "default_refresh")]
    pub refresh: String,
    #[serde(default = "default_profile")]
    pub profile: String,
}

fn default_timeout_in_ms() -> u64 {
    10_000
}

fn default_login_encoding() -> PayloadEncoding {
    PayloadEncoding::Form
}

fn default_refresh_encoding() -> PayloadEncoding {
    PayloadEncoding::Query
}

fn default_minimum_age() -> u32 {
    13
}

fn default_login() -> String {
    "/token".to_string()
}

fn default_register() -> String {
    "/users".to_string()
}

fn default_refresh() -> String {
    "/refresh".to_string()
}

fn default_profile() -> String {
    "/users/me".to_string()
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        EndpointsConfig {
            login: default_login(),
            register: default_register(),
            refresh: default_refresh(),
            profile: default_profile(),
        }
    }
}

impl ApiConfig {
    /// A config with every optional field at its default.
    pub fn new(base_url: impl Into<String>) -> Self {
        ApiConfig {
            base_url: base_url.into(),
            timeout_in_ms: default_timeout_in_ms(),
            login_encoding: default_login_encoding(),
            refresh_encoding: default_refresh_encoding(),
            endpoints: EndpointsConfig::default(),
            minimum_age: default_minimum_age(),
        }
    }
}
