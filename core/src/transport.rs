//! Execution of `HttpRequest` values.
//!
//! The client core never performs I/O itself; a `Transport` turns a request
//! into a response. `UreqTransport` is the blocking implementation used by
//! the CLI and the integration tests. A transport only fails when no complete
//! response arrived. 4xx/5xx statuses are returned as data so the client can
//! map them.

use std::time::Duration;

use thiserror::Error;
use ureq::{Agent, RequestBuilder};

use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// No response was received for a request.
#[derive(Debug, Error)]
#[error("{method} {url}: {cause}")]
pub struct TransportError {
    pub method: HttpMethod,
    pub url: String,
    pub cause: String,
}

/// Something that can execute an HTTP round-trip.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

/// Blocking transport backed by a `ureq::Agent`.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(Duration::from_secs(10))
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = request.path.as_str();
        let sent = match (request.method, request.body.as_deref()) {
            (HttpMethod::Get, _) => decorate(self.agent.get(url), request).call(),
            (HttpMethod::Delete, _) => decorate(self.agent.delete(url), request).call(),
            (HttpMethod::Post, Some(body)) => decorate(self.agent.post(url), request).send(body.as_bytes()),
            (HttpMethod::Post, None) => decorate(self.agent.post(url), request).send_empty(),
            (HttpMethod::Put, Some(body)) => decorate(self.agent.put(url), request).send(body.as_bytes()),
            (HttpMethod::Put, None) => decorate(self.agent.put(url), request).send_empty(),
            (HttpMethod::Patch, Some(body)) => decorate(self.agent.patch(url), request).send(body.as_bytes()),
            (HttpMethod::Patch, None) => decorate(self.agent.patch(url), request).send_empty(),
        };

        let failed = |e: ureq::Error| TransportError {
            method: request.method,
            url: request.path.clone(),
            cause: e.to_string(),
        };
        let mut response = sent.map_err(failed)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        // A body cut short counts as no response.
        let body = response.body_mut().read_to_string().map_err(failed)?;

        Ok(HttpResponse { status, headers, body })
    }
}

fn decorate<B>(mut builder: RequestBuilder<B>, request: &HttpRequest) -> RequestBuilder<B> {
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    for (key, value) in &request.query {
        builder = builder.query(key.as_str(), value.as_str());
    }
    builder
}
