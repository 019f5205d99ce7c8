//! Process configuration.
//!
//! Credentials and location of the TOS service come from environment
//! variables:
//!
//! | Variable | Required | Default |
//! |----------|----------|---------|
//! | `TOS_ACCESS_KEY` | yes | |
//! | `TOS_SECRET_KEY` | yes | |
//! | `TOS_REGION` | no | `cn-beijing` |
//! | `TOS_ENDPOINT` | no | `https://tos-s3-{region}.volces.com` |
//!
//! Empty values count as unset.

use std::collections::HashMap;
use std::fmt;

use ::config::{Config, Environment};
use serde::Deserialize;
use thiserror::Error;

/// Prefix shared by every variable.
pub const ENV_PREFIX: &str = "TOS";

pub const ENV_ACCESS_KEY: &str = "TOS_ACCESS_KEY";
pub const ENV_SECRET_KEY: &str = "TOS_SECRET_KEY";
pub const ENV_REGION: &str = "TOS_REGION";
pub const ENV_ENDPOINT: &str = "TOS_ENDPOINT";

/// Region used when `TOS_REGION` is unset.
pub const DEFAULT_REGION: &str = "cn-beijing";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A mandatory credential variable is unset or empty
    #[error("{0} must be set")]
    MissingCredential(&'static str),

    /// The environment could not be read
    #[error("failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),
}

/// Result type alias for configuration loading.
pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    access_key: Option<String>,
    secret_key: Option<String>,
    region: Option<String>,
    endpoint: Option<String>,
}

/// Credentials and service location.
#[derive(Clone, PartialEq, Eq)]
pub struct TosConfig {
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
    pub endpoint: String,
}

impl TosConfig {
    /// Config for `region` with the default endpoint.
    pub fn new(
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        let region = region.into();
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            endpoint: default_endpoint(&region),
            region,
        }
    }

    /// Overrides the endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Loads from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::load(Environment::with_prefix(ENV_PREFIX))
    }

    /// Loads from an explicit variable map, e.g. `{"TOS_ACCESS_KEY": ..}`.
    pub fn from_map(vars: HashMap<String, String>) -> Result<Self> {
        Self::load(Environment::with_prefix(ENV_PREFIX).source(Some(vars.into_iter().collect())))
    }

    fn load(environment: Environment) -> Result<Self> {
        let raw: RawConfig = Config::builder()
            .add_source(environment.ignore_empty(true))
            .build()?
            .try_deserialize()?;

        let access_key = non_empty(raw.access_key).ok_or(ConfigError::MissingCredential(ENV_ACCESS_KEY))?;
        let secret_key = non_empty(raw.secret_key).ok_or(ConfigError::MissingCredential(ENV_SECRET_KEY))?;
        let region = non_empty(raw.region).unwrap_or_else(|| DEFAULT_REGION.to_string());

        let config = Self::new(access_key, secret_key, region);
        Ok(match non_empty(raw.endpoint) {
            Some(endpoint) => config.with_endpoint(endpoint),
            None => config,
        })
    }
}

impl fmt::Debug for TosConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TosConfig")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

/// S3-compatible endpoint of a region.
pub fn default_endpoint(region: &str) -> String {
    format!("https://tos-s3-{region}.volces.com")
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = TosConfig::from_map(vars(&[
            (ENV_ACCESS_KEY, "AK"),
            (ENV_SECRET_KEY, "SK"),
        ]))
        .unwrap();

        assert_eq!(config.access_key, "AK");
        assert_eq!(config.secret_key, "SK");
        assert_eq!(config.region, "cn-beijing");
        assert_eq!(config.endpoint, "https://tos-s3-cn-beijing.volces.com");
    }

    #[test]
    fn test_endpoint_follows_region() {
        let config = TosConfig::from_map(vars(&[
            (ENV_ACCESS_KEY, "AK"),
            (ENV_SECRET_KEY, "SK"),
            (ENV_REGION, "cn-shanghai"),
        ]))
        .unwrap();
        assert_eq!(config.endpoint, "https://tos-s3-cn-shanghai.volces.com");

        let config = TosConfig::from_map(vars(&[
            (ENV_ACCESS_KEY, "AK"),
            (ENV_SECRET_KEY, "SK"),
            (ENV_REGION, "cn-shanghai"),
            (ENV_ENDPOINT, "http://localhost:9000"),
        ]))
        .unwrap();
        assert_eq!(config.endpoint, "http://localhost:9000");
    }

    #[test]
    fn test_missing_credentials() {
        let err = TosConfig::from_map(vars(&[(ENV_SECRET_KEY, "SK")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredential(ENV_ACCESS_KEY)));
        assert_eq!(err.to_string(), "TOS_ACCESS_KEY must be set");

        let err = TosConfig::from_map(vars(&[(ENV_ACCESS_KEY, "AK")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredential(ENV_SECRET_KEY)));
    }

    #[test]
    fn test_empty_values_count_as_absent() {
        let err = TosConfig::from_map(vars(&[
            (ENV_ACCESS_KEY, ""),
            (ENV_SECRET_KEY, "SK"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredential(ENV_ACCESS_KEY)));

        let config = TosConfig::from_map(vars(&[
            (ENV_ACCESS_KEY, "AK"),
            (ENV_SECRET_KEY, "SK"),
            (ENV_REGION, ""),
        ]))
        .unwrap();
        assert_eq!(config.region, DEFAULT_REGION);
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = TosConfig::new("AK", "super-secret", "cn-beijing");
        let rendered = format!("{config:?}");
        assert!(rendered.contains("AK"));
        assert!(!rendered.contains("super-secret"));
    }
}
