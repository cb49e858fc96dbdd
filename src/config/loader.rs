//! Load provider config from the environment or from a JSON file.

use crate::config::types::{ProviderConfig, DEFAULT_ADMIN_URL};
use crate::config::validate;
use crate::error::ConfigError;
use std::path::Path;

pub const ENV_ADMIN_ADDR: &str = "KONG_ADMIN_ADDR";
pub const ENV_TIMEOUT_SECS: &str = "KONG_TIMEOUT_SECS";
pub const ENV_USER_AGENT: &str = "KONG_USER_AGENT";

impl ProviderConfig {
    /// `KONG_ADMIN_ADDR` (default `http://localhost:8001`), `KONG_TIMEOUT_SECS`, `KONG_USER_AGENT`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let admin_url = lookup(ENV_ADMIN_ADDR)
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ADMIN_URL.into());
        let timeout_secs = match lookup(ENV_TIMEOUT_SECS).filter(|s| !s.trim().is_empty()) {
            Some(s) => Some(s.trim().parse::<u64>().map_err(|e| {
                ConfigError::Load(format!("{}: {} ({})", ENV_TIMEOUT_SECS, s, e))
            })?),
            None => None,
        };
        let config = ProviderConfig {
            admin_url,
            timeout_secs,
            user_agent: lookup(ENV_USER_AGENT).filter(|s| !s.is_empty()),
            ..Default::default()
        };
        validate(&config)?;
        Ok(config)
    }
}

/// Read a JSON provider config file and validate it.
pub async fn load_from_path(path: impl AsRef<Path>) -> Result<ProviderConfig, ConfigError> {
    let path = path.as_ref();
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))?;
    let config: ProviderConfig =
        serde_json::from_str(&raw).map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))?;
    tracing::debug!(path = %path.display(), admin_url = %config.admin_url, "loaded provider config");
    validate(&config)?;
    Ok(config)
}
