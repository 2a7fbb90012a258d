//! Transport abstraction for the GraphQL API.
//!
//! Everything the client sends goes through [`HttpTransport::post_json`], so
//! tests can substitute canned responses without touching the network:
//! - [`ReqwestTransport`] performs real HTTPS requests
//! - `mocks::ScriptedTransport` replays queued responses in unit tests

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::time::Duration;

use crate::error::ApiError;

/// A raw HTTP answer: status code and body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// A request that produced no HTTP answer at all.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,
    #[error("{0}")]
    Connection(String),
}

/// Minimal surface the GitHub client needs from an HTTP stack.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// POST `body` as JSON to `url` with the given extra headers.
    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
        headers: &[(String, String)],
    ) -> Result<HttpResponse, TransportError>;
}

/// Real transport backed by a `reqwest::Client`.
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build the HTTPS client.
    ///
    /// This is the startup capability check: if the TLS backend or the client
    /// cannot be initialized the run stops here, before any request is made.
    pub fn new(timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("boardlink/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::ClientInit {
                message: e.to_string(),
            })?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
        headers: &[(String, String)],
    ) -> Result<HttpResponse, TransportError> {
        let mut header_map = HeaderMap::new();
        for (name, value) in headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| TransportError::Connection(format!("bad header name: {}", e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|_| TransportError::Connection(format!("bad value for header {}", name)))?;
            header_map.insert(name, value);
        }

        let response = self
            .client
            .post(url)
            .headers(header_map)
            .json(body)
            .send()
            .await
            .map_err(classify_reqwest_error)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(classify_reqwest_error)?;

        Ok(HttpResponse { status, body })
    }
}

fn classify_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Connection(err.to_string())
    }
}

#[cfg(test)]
pub mod mocks {
    //! Mock implementations for testing.

    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// A request captured by [`ScriptedTransport`].
    #[derive(Debug, Clone)]
    pub struct RecordedRequest {
        pub url: String,
        pub body: serde_json::Value,
        pub headers: Vec<(String, String)>,
    }

    impl RecordedRequest {
        pub fn query(&self) -> &str {
            self.body["query"].as_str().unwrap_or_default()
        }
    }

    /// Replays queued responses in order and records every request.
    ///
    /// Once the queue is drained every further call answers with a
    /// connection error.
    #[derive(Default, Clone)]
    pub struct ScriptedTransport {
        responses: Arc<Mutex<VecDeque<Result<HttpResponse, TransportError>>>>,
        requests: Arc<Mutex<Vec<RecordedRequest>>>,
    }

    impl ScriptedTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn push_json(&self, status: u16, body: serde_json::Value) -> &Self {
            self.push(Ok(HttpResponse::new(status, body.to_string())))
        }

        pub fn push(&self, response: Result<HttpResponse, TransportError>) -> &Self {
            self.responses.lock().unwrap().push_back(response);
            self
        }

        pub fn requests(&self) -> Vec<RecordedRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HttpTransport for ScriptedTransport {
        async fn post_json(
            &self,
            url: &str,
            body: &serde_json::Value,
            headers: &[(String, String)],
        ) -> Result<HttpResponse, TransportError> {
            self.requests.lock().unwrap().push(RecordedRequest {
                url: url.to_string(),
                body: body.clone(),
                headers: headers.to_vec(),
            });
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::Connection("no scripted response".into())))
        }
    }
}
