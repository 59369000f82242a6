use super::constants::{self, headers};
use super::error::ApiError;
use super::models::{Case, PluginDescriptor, PluginList};
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Response, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Outbound calls the client makes against the AetherOne server.
///
/// The trait is the seam between the UI controllers and the network; tests
/// substitute in-process fakes.
#[async_trait]
pub trait AetherApi: Send + Sync {
    /// Liveness check. Only success or failure matters, the body is ignored.
    async fn ping(&self) -> Result<(), ApiError>;

    /// Persist a case and return the stored version (with server id)
    async fn save_case(&self, case: &Case) -> Result<Case, ApiError>;

    /// Fetch every case. No paging or caching.
    async fn load_all_cases(&self) -> Result<Vec<Case>, ApiError>;

    /// Fetch the registered plugins
    async fn load_plugins(&self) -> Result<Vec<PluginDescriptor>, ApiError>;
}

/// HTTP client for the AetherOne REST API with connection pooling
#[derive(Clone)]
pub struct AetherClient {
    base_url: Url,
    http_client: reqwest::Client,
}

impl AetherClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, constants::DEFAULT_REQUEST_TIMEOUT)
    }

    /// Create a client whose requests give up after `timeout`
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(90))
            .timeout(timeout)
            .connect_timeout(constants::DEFAULT_CONNECT_TIMEOUT.min(timeout))
            .user_agent(constants::USER_AGENT)
            .build()
            .map_err(ApiError::ClientBuild)?;

        Self::with_custom_client(base_url, http_client)
    }

    /// Create a client around a preconfigured reqwest client
    pub fn with_custom_client(base_url: &str, http_client: reqwest::Client) -> Result<Self, ApiError> {
        let normalized = constants::normalize_base_url(base_url);
        let base_url = Url::parse(&normalized)
            .map_err(|e| ApiError::invalid_base_url(&normalized, e))?;

        if base_url.cannot_be_a_base() {
            return Err(ApiError::invalid_base_url(normalized, "URL cannot be used as a base"));
        }

        Ok(Self { base_url, http_client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Shared HTTP client (cheap clone)
    pub fn http_client(&self) -> reqwest::Client {
        self.http_client.clone()
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::invalid_base_url(self.base_url.as_str(), e))
    }

    async fn dispatch(&self, url: &Url, request: reqwest::RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await.map_err(|source| ApiError::Transport {
            endpoint: url.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!("{} responded with {}", url, status);
            return Err(ApiError::Status {
                endpoint: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(url: &Url, response: Response) -> Result<T, ApiError> {
        let body = response.text().await.map_err(|source| ApiError::Transport {
            endpoint: url.to_string(),
            source,
        })?;

        serde_json::from_str(&body).map_err(|e| ApiError::Decode {
            endpoint: url.to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl AetherApi for AetherClient {
    async fn ping(&self) -> Result<(), ApiError> {
        let url = self.endpoint(constants::PING_ENDPOINT)?;
        let request = self
            .http_client
            .get(url.clone())
            .header("Accept", headers::ACCEPT_TEXT);

        let response = self.dispatch(&url, request).await?;
        // Drain the body so the pooled connection can be reused
        let _ = response.text().await;
        debug!("Ping to {} succeeded", url);
        Ok(())
    }

    async fn save_case(&self, case: &Case) -> Result<Case, ApiError> {
        let url = self.endpoint(constants::CASE_ENDPOINT)?;
        let request = self
            .http_client
            .post(url.clone())
            .header("Content-Type", headers::CONTENT_TYPE_JSON)
            .header("Accept", headers::CONTENT_TYPE_JSON)
            .json(case);

        let response = self.dispatch(&url, request).await?;
        let saved: Case = Self::decode(&url, response).await?;
        debug!("Saved case {:?}", saved.id);
        Ok(saved)
    }

    async fn load_all_cases(&self) -> Result<Vec<Case>, ApiError> {
        let url = self.endpoint(constants::CASE_ENDPOINT)?;
        let request = self
            .http_client
            .get(url.clone())
            .header("Accept", headers::CONTENT_TYPE_JSON);

        let response = self.dispatch(&url, request).await?;
        let cases: Vec<Case> = Self::decode(&url, response).await?;
        debug!("Loaded {} cases", cases.len());
        Ok(cases)
    }

    async fn load_plugins(&self) -> Result<Vec<PluginDescriptor>, ApiError> {
        let url = self.endpoint(constants::PLUGINS_ENDPOINT)?;
        let request = self
            .http_client
            .get(url.clone())
            .header("Accept", headers::CONTENT_TYPE_JSON);

        let response = self.dispatch(&url, request).await?;
        let list: PluginList = Self::decode(&url, response).await?;
        debug!("Discovered {} plugins", list.plugins.len());
        Ok(list.plugins)
    }
}
