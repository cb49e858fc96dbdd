//! Provider config validation.

use crate::config::ProviderConfig;
use crate::error::ConfigError;
use url::Url;

pub fn validate(config: &ProviderConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.admin_url).map_err(|e| ConfigError::InvalidUrl {
        value: config.admin_url.clone(),
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl {
            value: config.admin_url.clone(),
            reason: format!("unsupported scheme '{}' (expected http or https)", url.scheme()),
        });
    }
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidUrl {
            value: config.admin_url.clone(),
            reason: "not a base url".into(),
        });
    }
    if config.timeout_secs == Some(0) {
        return Err(ConfigError::Validation("timeout_secs must be greater than 0".into()));
    }
    for name in config.headers.keys() {
        if name.trim().is_empty() {
            return Err(ConfigError::Validation("header names must not be empty".into()));
        }
    }
    Ok(())
}
