//! Network seam used for cache population and pass-through fetches.

use std::time::Duration;

use async_trait::async_trait;

use crate::GatewayError;

/// A fetched asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// HTTP status code.
    pub status: u16,
    /// `Content-Type` header, if the origin sent one.
    pub content_type: Option<String>,
    /// Response body.
    pub body: Vec<u8>,
}

impl Response {
    /// Builds a `200 OK` response.
    #[must_use]
    pub fn ok(content_type: Option<&str>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            content_type: content_type.map(str::to_string),
            body: body.into(),
        }
    }

    /// Returns `true` for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Fetches assets by path.
#[async_trait]
pub trait Network: Send + Sync {
    /// Fetches `path` from the origin.
    ///
    /// Non-2xx statuses are returned as responses, not errors.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] if the request could not be completed.
    async fn fetch(&self, path: &str) -> Result<Response, GatewayError>;
}

/// Upper bound on a whole request to the origin, body included.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound on establishing the connection.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetches assets over HTTP from a fixed origin.
pub struct HttpNetwork {
    client: reqwest::Client,
    origin: String,
}

impl HttpNetwork {
    /// Creates a network rooted at `origin`, e.g. `http://localhost:5173`,
    /// with the default timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Http`] if the HTTP client can't be built.
    pub fn new(origin: &str) -> Result<Self, GatewayError> {
        Self::with_timeout(origin, DEFAULT_FETCH_TIMEOUT)
    }

    /// Creates a network whose requests give up after `timeout`. A stalled
    /// origin then surfaces as an error instead of a pending request.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Http`] if the HTTP client can't be built.
    pub fn with_timeout(origin: &str, timeout: Duration) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT.min(timeout))
            .build()?;

        Ok(Self {
            client,
            origin: origin.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl Network for HttpNetwork {
    async fn fetch(&self, path: &str) -> Result<Response, GatewayError> {
        let url = format!("{}{path}", self.origin);
        log::debug!("GET {url}");

        let resp = self.client.get(&url).send().await?;
        let status = resp.status().as_u16();
        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = resp.bytes().await?.to_vec();

        Ok(Response {
            status,
            content_type,
            body,
        })
    }
}
