use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client};

use super::exchange::{ApiRequest, Exchange};
use crate::app::ServerConfig;
use crate::utils::BankingError;

/// One HTTP exchange with the banking gateway
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Perform the request and return whatever the server answered.
    ///
    /// Statuses of 400 and above are not errors here; only failures to
    /// encode the body or to reach the server are.
    async fn send(&self, request: &ApiRequest) -> Result<Exchange, BankingError>;
}

/// Gateway backed by a default `reqwest` client (no timeout, no retries)
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(config: ServerConfig) -> Result<Self, BankingError> {
        let client = Client::builder()
            .user_agent(concat!("mifos/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| BankingError::InvalidConfig(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self::with_client(client, config))
    }

    /// Use a pre-configured client
    pub fn with_client(client: Client, config: ServerConfig) -> Self {
        Self {
            client,
            base_url: config.server,
        }
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn transport_failure(&self, source: reqwest::Error) -> BankingError {
        BankingError::TransportFailure {
            base_url: self.base_url.clone(),
            source,
        }
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn send(&self, request: &ApiRequest) -> Result<Exchange, BankingError> {
        // Encode before touching the network
        let body = request
            .encoded_body()
            .map_err(|e| BankingError::EncodingFailure(e.to_string()))?;

        let url = self.url(&request.path);
        let mut builder = self.client.request(request.method.into(), &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(bytes) = body {
            builder = builder.header(CONTENT_TYPE, "application/json").body(bytes);
        }

        tracing::debug!("{} {}", request.method, url);
        let response = builder
            .send()
            .await
            .map_err(|e| self.transport_failure(e))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_failure(e))?;
        tracing::debug!("HTTP {} ({} bytes)", status, body.len());

        Ok(Exchange { status, body })
    }
}
