//! HTTP transport used by the configuration client.
//!
//! [`HttpClient`] is the seam the client is written against; it knows nothing
//! about configuration domains. [`ReqwestHttpClient`] is the production
//! implementation: JSON over `reqwest`, paths joined onto a base URL.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_USER_AGENT: &str = concat!("raybot-cli/", env!("CARGO_PKG_VERSION"));

/// Generic JSON request/response transport.
///
/// Implementations own every failure mode (network, status, decoding) and
/// report it through [`HttpClient::Error`]; callers are expected to pass
/// those errors on untouched.
#[async_trait]
pub trait HttpClient: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// GET `path` and decode the response body.
    async fn get<T>(&self, path: &str) -> Result<T, Self::Error>
    where
        T: DeserializeOwned + Send;

    /// PUT `body` as JSON to `path`. The response body is ignored.
    async fn put<B>(&self, path: &str, body: &B) -> Result<(), Self::Error>
    where
        B: Serialize + Sync + ?Sized;
}

#[derive(Error, Debug)]
pub enum HttpError {
    #[error("invalid base url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("{method} {path} failed: {source}")]
    Request {
        method: Method,
        path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{method} {path} returned {status}: {body}")]
    Status {
        method: Method,
        path: String,
        status: StatusCode,
        body: String,
    },

    #[error("failed to decode response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl HttpError {
    /// HTTP status of the response, when the server answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Request { source, .. } => source.status(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestHttpClient {
    pub fn new(base_url: &str) -> Result<Self, HttpError> {
        Self::builder(base_url).build()
    }

    pub fn builder(base_url: impl Into<String>) -> ReqwestHttpClientBuilder {
        ReqwestHttpClientBuilder {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, HttpError> {
        tracing::debug!(%method, path, "Sending request");

        let response = request.send().await.map_err(|source| HttpError::Request {
            method: method.clone(),
            path: path.to_string(),
            source,
        })?;

        let status = response.status();
        tracing::debug!(%method, path, status = status.as_u16(), "Received response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HttpError::Status {
                method,
                path: path.to_string(),
                status,
                body,
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    type Error = HttpError;

    async fn get<T>(&self, path: &str) -> Result<T, HttpError>
    where
        T: DeserializeOwned + Send,
    {
        let request = self.client.get(self.url(path));
        let response = self.send(Method::GET, path, request).await?;

        let bytes = response.bytes().await.map_err(|source| HttpError::Request {
            method: Method::GET,
            path: path.to_string(),
            source,
        })?;

        serde_json::from_slice(&bytes).map_err(|source| HttpError::Decode {
            path: path.to_string(),
            source,
        })
    }

    async fn put<B>(&self, path: &str, body: &B) -> Result<(), HttpError>
    where
        B: Serialize + Sync + ?Sized,
    {
        let request = self.client.put(self.url(path)).json(body);
        self.send(Method::PUT, path, request).await?;
        Ok(())
    }
}

pub struct ReqwestHttpClientBuilder {
    base_url: String,
    timeout: Duration,
    user_agent: String,
}

impl ReqwestHttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn build(self) -> Result<ReqwestHttpClient, HttpError> {
        let parsed = Url::parse(&self.base_url).map_err(|e| HttpError::InvalidUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(HttpError::InvalidUrl {
                url: self.base_url,
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent)
            .build()
            .map_err(HttpError::Client)?;

        let base_url = self.base_url.trim_end_matches('/').to_string();
        tracing::trace!(base_url = %base_url, timeout = ?self.timeout, "HTTP client ready");

        Ok(ReqwestHttpClient { client, base_url })
    }
}
