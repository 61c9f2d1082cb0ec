use std::path::Path;

use figment::providers::{Env, Format, Yaml};
use figment::Figment;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};

use super::api::ApiConfig;
use super::logging::LoggingConfig;
use super::store::StoreConfig;
use crate::guard::GuardPolicy;

/// A top-level enum for versioned configurations.
#[derive(Deserialize, Serialize, JsonSchema)]
#[serde(tag = "version")]
pub enum Config {
    #[serde(rename = "1.0.0")]
    ConfigV1(ConfigV1),
}

/// Main config for v1.0.0: backend connection, token store, guard policy and logging.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct ConfigV1 {
    pub api: ApiConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub guard: GuardPolicy,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Default location of the config file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "./config.yaml";

/// Prefix of environment variables that override file values,
/// e.g. `ANIMEREC_API__BASE_URL`.
pub const ENV_PREFIX: &str = "ANIMEREC_";

/// Load config from a YAML file, with `ANIMEREC_*` environment overrides on top.
pub fn load_config_from(path: impl AsRef<Path>) -> Result<ConfigV1, figment::Error> {
    let figment = Figment::new()
        .merge(Yaml::file(path.as_ref()))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));
    match figment.extract::<Config>()? {
        Config::ConfigV1(c) => Ok(c),
    }
}

/// Parse a config from an in-memory YAML document.
pub fn parse_config(yaml: &str) -> Result<ConfigV1, figment::Error> {
    match Figment::new().merge(Yaml::string(yaml)).extract::<Config>()? {
        Config::ConfigV1(c) => Ok(c),
    }
}

/// Load config from "config.yaml" in the current directory, exiting on error.
pub fn load_config() -> ConfigV1 {
    match load_config_from(DEFAULT_CONFIG_PATH) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            std::process::exit(1);
        }
    }
}

/// Render the JSON schema for the configuration.
pub fn config_schema() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&schema_for!(Config))
}
