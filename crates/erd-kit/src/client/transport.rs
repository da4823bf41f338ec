//! HTTP transport.
//!
//! The [`Transport`] trait is the only place the client touches the network.
//! [`HttpTransport`] implements it with `reqwest`; tests and embedders can
//! supply their own implementation through
//! [`ProxyBuilder::transport`](crate::ProxyBuilder::transport).

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};
use tracing::debug;

use crate::error::ProxyError;

/// User agent sent with every request.
pub const HTTP_USER_AGENT: &str = "Elrond go SDK / 1.0.0 <Posting to nodes>";

const JSON_CONTENT_TYPE: &str = "application/json";

/// Raw HTTP response: status code and body bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// A response with the given status and body.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns true for HTTP 200.
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Boxed future returned by [`Transport`] methods.
pub type TransportFuture<'a> =
    Pin<Box<dyn Future<Output = Result<HttpResponse, ProxyError>> + Send + 'a>>;

/// Minimal GET/POST primitive against a base URL.
///
/// Endpoints are relative routes such as `network/config`. Dropping the
/// returned future aborts the request.
pub trait Transport: Send + Sync {
    /// GET `{base}/{endpoint}`.
    fn get<'a>(&'a self, endpoint: &'a str) -> TransportFuture<'a>;

    /// POST `body` as JSON to `{base}/{endpoint}`.
    fn post<'a>(&'a self, endpoint: &'a str, body: Vec<u8>) -> TransportFuture<'a>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn get<'a>(&'a self, endpoint: &'a str) -> TransportFuture<'a> {
        (**self).get(endpoint)
    }

    fn post<'a>(&'a self, endpoint: &'a str, body: Vec<u8>) -> TransportFuture<'a> {
        (**self).post(endpoint, body)
    }
}

/// [`Transport`] over HTTP(S) with fixed headers and a request timeout.
#[derive(Clone)]
pub struct HttpTransport {
    base_url: String,
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport for `base_url` with the given request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ProxyError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(base_url, client))
    }

    /// Create a transport reusing an existing `reqwest` client.
    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client }
    }

    /// The base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<HttpResponse, ProxyError> {
        let response = request
            .header(ACCEPT, JSON_CONTENT_TYPE)
            .header(USER_AGENT, HTTP_USER_AGENT)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        Ok(HttpResponse { status, body })
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Transport for HttpTransport {
    fn get<'a>(&'a self, endpoint: &'a str) -> TransportFuture<'a> {
        Box::pin(async move {
            let url = self.url(endpoint);
            debug!(method = "GET", %url, "Sending request");
            self.send(self.client.get(url)).await
        })
    }

    fn post<'a>(&'a self, endpoint: &'a str, body: Vec<u8>) -> TransportFuture<'a> {
        Box::pin(async move {
            let url = self.url(endpoint);
            debug!(method = "POST", %url, bytes = body.len(), "Sending request");
            let request = self
                .client
                .post(url)
                .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
                .body(body);
            self.send(request).await
        })
    }
}
