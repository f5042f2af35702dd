// src/core/fetcher.rs

use async_trait::async_trait;
use reqwest::redirect::Policy;
use std::borrow::Cow;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMethod {
    Get,
    Head,
}

/// Why a single request produced no response.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("failed to read response body: {0}")]
    Body(String),
    #[error("request failed: {0}")]
    Request(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if e.is_connect() {
            FetchError::Connect(e.to_string())
        } else if e.is_builder() {
            FetchError::InvalidUrl(e.to_string())
        } else if e.is_body() || e.is_decode() {
            FetchError::Body(e.to_string())
        } else {
            FetchError::Request(e.to_string())
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FetchResponse {
    pub status: u16,
    /// Header names are lower-cased.
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl FetchResponse {
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }
}

/// A single bounded-timeout HTTP request. Every other component goes through this.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str, method: FetchMethod, timeout: Duration) -> Result<FetchResponse, FetchError>;
}

/// `reqwest`-backed fetcher. Redirects are never followed.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .redirect(Policy::none())
            .build()
            .map_err(|e| FetchError::Request(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str, method: FetchMethod, timeout: Duration) -> Result<FetchResponse, FetchError> {
        let request = match method {
            FetchMethod::Get => self.client.get(url),
            FetchMethod::Head => self.client.head(url),
        };
        let response = request.timeout(timeout).send().await?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value.to_str().ok().map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
            })
            .collect();
        let body = response.bytes().await?.to_vec();
        trace!(url, status, bytes = body.len(), "Fetched.");

        Ok(FetchResponse { status, headers, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn returns_status_headers_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(
                ResponseTemplate::new(404)
                    .insert_header("X-Frame-Options", "DENY")
                    .set_body_string("missing"),
            )
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new("test-agent").unwrap();
        let response = fetcher
            .fetch(&format!("{}/page", server.uri()), FetchMethod::Get, Duration::from_secs(2))
            .await
            .unwrap();

        assert_eq!(response.status, 404);
        assert_eq!(response.header("x-frame-options"), Some("DENY"));
        assert_eq!(response.header("X-Frame-Options"), Some("DENY"));
        assert_eq!(response.text(), "missing");
    }

    #[tokio::test]
    async fn does_not_follow_redirects() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(302).insert_header("Location", "/elsewhere"))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new("test-agent").unwrap();
        let response = fetcher
            .fetch(&server.uri(), FetchMethod::Get, Duration::from_secs(2))
            .await
            .unwrap();
        assert_eq!(response.status, 302);
    }

    #[tokio::test]
    async fn refused_connection_is_an_error() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let fetcher = HttpFetcher::new("test-agent").unwrap();
        let result = fetcher
            .fetch(&format!("http://127.0.0.1:{}/", port), FetchMethod::Get, Duration::from_secs(2))
            .await;
        assert!(result.is_err());
    }
}
