//! reqwest-backed transport against a live Admin API.

use crate::config::{validate, ProviderConfig};
use crate::error::{ConfigError, TransportError};
use crate::transport::{ApiRequest, ApiResponse, Transport};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use url::Url;

/// Cheap to clone; the underlying client pools connections and is safe for concurrent use.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(config: &ProviderConfig) -> Result<Self, ConfigError> {
        validate(config)?;
        let mut base = config.admin_url.trim_end_matches('/').to_string();
        base.push('/');
        let base_url = Url::parse(&base).map_err(|e| ConfigError::InvalidUrl {
            value: config.admin_url.clone(),
            reason: e.to_string(),
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        for (name, value) in &config.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ConfigError::Validation(format!("header '{}': {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ConfigError::Validation(format!("header '{}': {}", name, e)))?;
            headers.insert(name, value);
        }

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        if let Some(agent) = &config.user_agent {
            builder = builder.user_agent(agent.clone());
        }
        let http = builder
            .build()
            .map_err(|e| ConfigError::Load(format!("http client: {}", e)))?;
        Ok(HttpTransport { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = self.base_url.join(request.path.as_str())?;
        tracing::debug!(method = %request.method, url = %url, "admin request");
        let mut req = self.http.request(request.method.clone(), url);
        if let Some(body) = &request.body {
            req = req.json(body);
        }
        let resp = req.send().await?;
        let status = resp.status();
        let body = resp.bytes().await?;
        tracing::debug!(method = %request.method, path = %request.path, status = status.as_u16(), "admin response");
        Ok(ApiResponse::new(status, body.to_vec()))
    }
}
