//! Provider configuration: where the Admin API lives and how the transport talks to it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

pub const DEFAULT_ADMIN_URL: &str = "http://localhost:8001";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the Kong Admin API, e.g. `http://localhost:8001`.
    #[serde(default = "default_admin_url")]
    pub admin_url: String,
    /// Per-request timeout enforced by the transport. None means no timeout.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Static headers sent with every request.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

fn default_admin_url() -> String {
    DEFAULT_ADMIN_URL.to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig {
            admin_url: default_admin_url(),
            timeout_secs: None,
            user_agent: None,
            headers: BTreeMap::new(),
        }
    }
}

impl ProviderConfig {
    pub fn new(admin_url: impl Into<String>) -> Self {
        ProviderConfig {
            admin_url: admin_url.into(),
            ..Default::default()
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
