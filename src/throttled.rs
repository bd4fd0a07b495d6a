//! HTTP client whose every call is paced by a shared [`RateLimiter`].

use std::time::Instant;

use reqwest::blocking::Client;
use serde_json::Value;
use tracing::debug;

use crate::config::RoutesApiConfig;
use crate::error::{MatrixError, TransportError};
use crate::rate_limiter::RateLimiter;

/// A JSON POST request.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Value,
}

/// Raw response: status code and undecoded body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonResponse {
    pub status: u16,
    pub body: String,
}

impl JsonResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Something that can deliver a [`JsonRequest`].
///
/// Non-success statuses are returned as responses, not errors; only a failure
/// to get any response at all is a [`TransportError`].
pub trait Transport {
    fn post_json(&self, request: &JsonRequest) -> Result<JsonResponse, TransportError>;
}

/// [`Transport`] backed by a blocking `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(config: &RoutesApiConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()?;

        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    fn post_json(&self, request: &JsonRequest) -> Result<JsonResponse, TransportError> {
        let mut builder = self.client.post(&request.url).json(&request.body);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder
            .send()
            .map_err(|err| convert_reqwest_error(&err, &request.url))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|err| convert_reqwest_error(&err, &request.url))?;

        Ok(JsonResponse { status, body })
    }
}

fn convert_reqwest_error(error: &reqwest::Error, url: &str) -> TransportError {
    if error.is_timeout() {
        return TransportError::Timeout {
            url: url.to_owned(),
        };
    }
    TransportError::Network {
        url: url.to_owned(),
        message: error.to_string(),
    }
}

/// Wraps a [`Transport`] so that every call first waits on the limiter.
///
/// Build all clients for one external API family from clones of the same
/// limiter.
#[derive(Debug, Clone)]
pub struct ThrottledClient<T = ReqwestTransport> {
    transport: T,
    limiter: RateLimiter,
}

impl<T: Transport> ThrottledClient<T> {
    pub fn new(transport: T, limiter: RateLimiter) -> Self {
        Self { transport, limiter }
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Wait for a slot, then send. The slot is recycled once the call returns.
    pub fn post_json(
        &self,
        request: &JsonRequest,
        deadline: Option<Instant>,
    ) -> Result<JsonResponse, MatrixError> {
        let permit = self.limiter.acquire(deadline)?;
        let result = self.transport.post_json(request);
        debug!(
            family = self.limiter.family(),
            url = %request.url,
            elapsed_ms = permit.started_at().elapsed().as_millis() as u64,
            "throttled call finished"
        );
        drop(permit);
        Ok(result?)
    }
}
