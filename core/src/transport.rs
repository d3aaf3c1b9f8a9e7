//! Executes `HttpRequest` values against the network.
//!
//! # Design
//! `Transport` is the seam between the deterministic client core and I/O.
//! `UreqTransport` is the default blocking implementation. Closures with the
//! right signature are transports too, which keeps test doubles one-liners.

use std::time::Duration;

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse};

/// Performs one HTTP round trip.
///
/// Implementations must return every response the server sends, including
/// 3xx/4xx/5xx, as `Ok`. `Err` is reserved for calls that produced no
/// response at all, or, via [`TransportError::body_unreadable`], whose body
/// could not be read after the status arrived.
pub trait Transport: Send + Sync {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<F> Transport for F
where
    F: Fn(HttpRequest) -> Result<HttpResponse, TransportError> + Send + Sync,
{
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self(request)
    }
}

/// Largest response body read before giving up. Raw search results can be
/// far bigger than ureq's own 10 MB default.
pub const MAX_BODY_BYTES: u64 = 64 * 1024 * 1024;

/// Blocking transport backed by a ureq agent.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl std::fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UreqTransport").finish_non_exhaustive()
    }
}

impl UreqTransport {
    /// Creates a transport whose calls are bounded by `timeout`, if given.
    ///
    /// ureq's status-as-error behavior and redirect following are disabled,
    /// so 3xx/4xx/5xx responses come back as data, each call is exactly one
    /// POST, and the client does the classification.
    pub fn new(timeout: Option<Duration>) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .max_redirects(0)
            .max_redirects_will_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self.agent.post(request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let mut response = builder
            .send(request.body.as_bytes())
            .map_err(|e| TransportError::with_source(format!("POST {} failed", request.url), e))?;

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
        // A status line was received, so failures from here on must not
        // read as "no response".
        let bytes = response
            .body_mut()
            .with_config()
            .limit(MAX_BODY_BYTES)
            .read_to_vec()
            .map_err(|e| TransportError::body_unreadable(status, e))?;
        let body = match String::from_utf8(bytes) {
            Ok(body) => body,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        };

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_transports() {
        let transport = |req: HttpRequest| -> Result<HttpResponse, TransportError> {
            Ok(HttpResponse {
                status: 200,
                headers: Vec::new(),
                body: req.url,
            })
        };
        let resp = transport
            .execute(HttpRequest {
                url: "http://localhost/search".to_string(),
                headers: Vec::new(),
                body: "{}".to_string(),
            })
            .unwrap();
        assert_eq!(resp.body, "http://localhost/search");
    }

    #[test]
    fn connection_refused_is_a_transport_error() {
        // Bind then drop to get a port nothing listens on.
        let addr = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap();
        let transport = UreqTransport::new(Some(Duration::from_secs(5)));
        let err = transport
            .execute(HttpRequest {
                url: format!("http://{addr}/search"),
                headers: vec![("content-type".to_string(), "application/json".to_string())],
                body: "{}".to_string(),
            })
            .unwrap_err();
        assert!(err.message().contains("/search"));
    }
}
