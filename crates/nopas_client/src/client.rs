//! HTTP transport for the policy service.

use crate::error::{Error, Result};
use crate::transport::{Transport, PREDEFINED_PATH, STATE_PATH, UPDATE_PATH};
use async_trait::async_trait;
use nopas_policy::PolicyDocument;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};

/// Environment variable holding the policy service base URL.
pub const ENDPOINT_ENV: &str = "NOPAS_ENDPOINT";

/// Configuration for the policy service client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the policy service.
    pub endpoint: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8080".to_string(),
            timeout_seconds: 30,
        }
    }
}

/// [`Transport`] over HTTP.
///
/// Paths are joined onto the endpoint as absolute paths, so any path on the
/// configured endpoint is replaced: `http://host/api` resolves `/state` to
/// `http://host/state`.
pub struct HttpTransport {
    base: Url,
    http: reqwest::Client,
}

impl HttpTransport {
    /// Creates a new HTTP transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not an absolute URL or the HTTP
    /// client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let endpoint = config.endpoint.trim();
        if endpoint.is_empty() {
            return Err(Error::InvalidEndpoint("endpoint is empty".to_string()));
        }

        let base = Url::parse(endpoint)
            .map_err(|e| Error::InvalidEndpoint(format!("{endpoint}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(Error::InvalidEndpoint(format!(
                "{endpoint}: not a base URL"
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()?;

        info!("Using policy service at {}", base);
        Ok(Self { base, http })
    }

    /// Returns the configured base URL.
    pub const fn base(&self) -> &Url {
        &self.base
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .map_err(|e| Error::InvalidEndpoint(format!("{}{path}: {e}", self.base)))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path)?;
        debug!("GET {}", url);

        let response = self.http.get(url).send().await?;
        let response = check_status(path, response).await?;

        response
            .json()
            .await
            .map_err(|e| Error::ParseError(format!("{path}: {e}")))
    }
}

async fn check_status(path: &str, response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    debug!("{} answered {}", path, status);

    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(Error::Status {
        endpoint: path.to_string(),
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch_defaults(&self) -> Result<Value> {
        self.get_json(PREDEFINED_PATH).await
    }

    async fn fetch_state(&self) -> Result<PolicyDocument> {
        self.get_json(STATE_PATH).await
    }

    async fn push_update(&self, document: &PolicyDocument) -> Result<()> {
        let url = self.url(UPDATE_PATH)?;
        debug!("POST {}", url);

        let response = self.http.post(url).json(document).send().await?;
        check_status(UPDATE_PATH, response).await?;
        Ok(())
    }
}
