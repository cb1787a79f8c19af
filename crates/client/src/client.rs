//! Portal API client

use crate::error::ClientError;
use arc_swap::ArcSwapOption;
use reqwest::{Client, ClientBuilder, header};
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// CareLink API client
///
/// The bearer credential is held in an [`ArcSwapOption`] shared by all
/// clones, so swapping the token is atomic with respect to request
/// construction: a request either carries the previous credential or the
/// new one, never a torn value.
#[derive(Clone)]
pub struct PortalClient {
    client: Client,
    base_url: String,
    bearer_token: Arc<ArcSwapOption<String>>,
}

impl PortalClient {
    /// Create a new client with default configuration
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::builder().base_url(base_url).build()
    }

    /// Create a new client builder
    pub fn builder() -> PortalClientBuilder {
        PortalClientBuilder::default()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Install or clear the bearer credential for subsequent requests
    pub fn set_bearer_token(&self, token: Option<&str>) {
        self.bearer_token
            .store(token.map(|t| Arc::new(t.to_string())));
    }

    /// The currently installed bearer credential, if any
    pub fn bearer_token(&self) -> Option<String> {
        self.bearer_token.load_full().map(|t| (*t).clone())
    }

    /// Create a request builder with authentication
    pub fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.request(method, url);

        if let Some(token) = self.bearer_token.load_full() {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        request
    }

    /// Execute a request and handle common errors
    pub async fn execute<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let message = response.text().await.unwrap_or_else(|_| status.to_string());
            Err(ClientError::from_status(status, message))
        }
    }
}

/// Builder for PortalClient
#[derive(Default)]
pub struct PortalClientBuilder {
    base_url: Option<String>,
    bearer_token: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl PortalClientBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set an initial bearer token
    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Set the request timeout (defaults to 30s)
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client
    pub fn build(self) -> Result<PortalClient, ClientError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::Configuration("base_url is required".into()))?;

        // Ensure base_url ends without a trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();

        let mut client_builder =
            ClientBuilder::new().timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT));

        if let Some(user_agent) = self.user_agent {
            client_builder = client_builder.user_agent(user_agent);
        } else {
            client_builder = client_builder.user_agent("carelink-client/0.1.0");
        }

        let client = client_builder.build()?;

        Ok(PortalClient {
            client,
            base_url,
            bearer_token: Arc::new(ArcSwapOption::from_pointee(self.bearer_token)),
        })
    }
}
