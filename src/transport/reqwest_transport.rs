//! `reqwest` blocking client transport
//!
//! Runs on the remote provider's worker thread, never on the caller of
//! `log`. Must not be driven from inside an async runtime's executor thread.

use super::{HttpRequest, HttpResponse, HttpTransport};
use crate::core::{LoggerError, Result};
use std::time::Duration;

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    /// Build a transport with a shared connection pool
    ///
    /// # Errors
    ///
    /// Returns `LoggerError::TransportError` if the HTTP client cannot be
    /// built (e.g. TLS backend unavailable).
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .user_agent(concat!("pettrack-logger/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| LoggerError::transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl HttpTransport for ReqwestTransport {
    fn post(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let mut builder = self
            .client
            .post(&request.url)
            .timeout(request.timeout)
            .body(request.body.clone());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        match builder.send() {
            Ok(response) => Ok(HttpResponse {
                status: response.status().as_u16(),
            }),
            Err(e) if e.is_timeout() => Err(LoggerError::timeout(request.timeout)),
            Err(e) => Err(LoggerError::transport(e.to_string())),
        }
    }
}
