//! HTTP transport used by the remote shipping provider

#[cfg(feature = "network")]
pub mod reqwest_transport;

#[cfg(feature = "network")]
pub use reqwest_transport::ReqwestTransport;

use crate::core::Result;
use std::time::Duration;

/// A single outbound POST
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    /// Client-side bound on the whole exchange
    pub timeout: Duration,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Blocking POST capability.
///
/// Implementations must honour `request.timeout` and report it as
/// [`LoggerError::Timeout`](crate::core::LoggerError::Timeout). Any status
/// code is an `Ok` response; interpreting it is the caller's job.
pub trait HttpTransport: Send + Sync {
    fn post(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let request = HttpRequest {
            url: "https://logs.example.com".to_string(),
            headers: vec![("Authorization".to_string(), "Bearer t".to_string())],
            body: Vec::new(),
            timeout: Duration::from_secs(1),
        };
        assert_eq!(request.header("authorization"), Some("Bearer t"));
        assert_eq!(request.header("x-missing"), None);
    }

    #[test]
    fn test_success_range() {
        assert!(HttpResponse { status: 200 }.is_success());
        assert!(HttpResponse { status: 204 }.is_success());
        assert!(!HttpResponse { status: 301 }.is_success());
        assert!(!HttpResponse { status: 500 }.is_success());
    }
}
