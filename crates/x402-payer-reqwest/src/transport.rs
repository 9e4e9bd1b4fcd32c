//! The abstract HTTP capability the negotiation engine runs over.

use async_trait::async_trait;
use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use url::Url;

/// Transport-layer failures. These are faults, not business outcomes: a
/// timeout or connection error is terminal for the call and surfaces as an
/// `Err`, unlike the negotiation outcomes in [`crate::outcome`].
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("transport failure: {0}")]
    Other(String),
}

/// One HTTP request as the caller supplied it.
///
/// The engine re-issues this verbatim on the paid retry, with only the
/// payment-proof header added.
#[derive(Debug, Clone)]
pub struct ResourceRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<String>,
}

impl ResourceRequest {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: Url, body: impl Into<String>) -> Self {
        Self::new(Method::POST, url).with_body(body)
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// One HTTP response: status, headers, body.
#[derive(Debug, Clone)]
pub struct ResourceResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl ResourceResponse {
    /// A header value as a string, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}

/// Capability to send one request and receive status, headers, and body.
///
/// The engine guarantees strictly sequential use within one negotiation
/// (initial request, then at most one paid retry).
#[async_trait]
pub trait PaymentTransport: Send + Sync {
    async fn execute(&self, request: &ResourceRequest) -> Result<ResourceResponse, TransportError>;
}

#[async_trait]
impl<T: PaymentTransport + ?Sized> PaymentTransport for std::sync::Arc<T> {
    async fn execute(&self, request: &ResourceRequest) -> Result<ResourceResponse, TransportError> {
        (**self).execute(request).await
    }
}

#[async_trait]
impl PaymentTransport for reqwest::Client {
    async fn execute(&self, request: &ResourceRequest) -> Result<ResourceResponse, TransportError> {
        let mut builder = self
            .request(request.method.clone(), request.url.clone())
            .headers(request.headers.clone());
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }
        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await?;
        Ok(ResourceResponse {
            status,
            headers,
            body,
        })
    }
}
