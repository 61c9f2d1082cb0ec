use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Where the token store keeps its two slots, and under which key names.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct StoreConfig {
    #[serde(flatten)]
    pub backend: StoreBackend,
    #[serde(default)]
    pub keys: TokenKeys,
}

/// The existing store backends. We differentiate them via a "type" tag in the YAML.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
#[serde(tag = "type")]
pub enum StoreBackend {
    /// Tokens live as long as the process.
    #[serde(rename = "memory")]
    Memory,
    /// Tokens persist in a JSON document on disk.
    #[serde(rename = "file")]
    File { path: PathBuf },
}

/// Key names for the access and refresh slots. Deployments have used both
/// "token" and "access_token" for the access slot, so this is configurable.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
pub struct TokenKeys {
    #[serde(default = "default_access_key")]
    pub access: String,
    #[serde(default = "default_refresh_key")]
    pub refresh: String,
}

fn default_access_key() -> String {
    "access_token".to_string()
}

fn default_refresh_key() -> String {
    "refresh_token".to_string()
}

impl Default for TokenKeys {
    fn default() -> Self {
        TokenKeys {
            access: default_access_key(),
            refresh: default_refresh_key(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            backend: StoreBackend::Memory,
            keys: TokenKeys::default(),
        }
    }
}
