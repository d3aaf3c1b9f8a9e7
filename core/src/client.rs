//! Request builder, response classifier and the blocking client facade.
//!
//! # Design
//! `AiveneClient` holds only the immutable config and never touches the
//! network. Each endpoint has a `build_*` method producing an `HttpRequest`;
//! every endpoint shares one `parse_response` classification. `Aivene`
//! wires a `Transport` between the two so callers get one blocking call per
//! operation. Neither type carries mutable state, so both can be shared
//! across threads freely.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::{ClientConfig, ClientConfigBuilder};
use crate::error::{Error, Result, GENERIC_ERROR_DETAIL};
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::{Transport, UreqTransport};
use crate::types::{GenerateQueries, Search, SearchQueries};

/// The remote operations exposed by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    GenerateQueries,
    Search,
    SearchQueries,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::GenerateQueries => "generate_queries",
            Endpoint::Search => "search",
            Endpoint::SearchQueries => "search_queries",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Stateless request builder and response classifier.
#[derive(Debug, Clone)]
pub struct AiveneClient {
    config: Arc<ClientConfig>,
}

impl AiveneClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn build_generate_queries(&self, input: &GenerateQueries) -> Result<HttpRequest> {
        require("user_content", &input.user_content)?;
        self.build(Endpoint::GenerateQueries, input)
    }

    pub fn build_search(&self, input: &Search) -> Result<HttpRequest> {
        require("keyword", &input.keyword)?;
        self.build(Endpoint::Search, input)
    }

    pub fn build_search_queries(&self, input: &SearchQueries) -> Result<HttpRequest> {
        require("user_content", &input.user_content)?;
        self.build(Endpoint::SearchQueries, input)
    }

    fn build<T: Serialize>(&self, endpoint: Endpoint, input: &T) -> Result<HttpRequest> {
        let body = serde_json::to_string(input)?;
        Ok(HttpRequest {
            url: format!("{}/{}", self.config.base_url, endpoint.path()),
            headers: vec![
                ("content-type".to_string(), "application/json".to_string()),
                (
                    "authorization".to_string(),
                    format!("Bearer {}", self.config.api_key),
                ),
            ],
            body,
        })
    }

    /// Classify a response by status code.
    ///
    /// 2xx is handed back untouched. 4xx/5xx become `Error::Api` with the
    /// body's `detail` field, or a generic message when there is none.
    pub fn parse_response(&self, response: HttpResponse) -> Result<HttpResponse> {
        match response.status {
            200..=299 => Ok(response),
            300..=399 => Err(Error::UnexpectedRedirect {
                status: response.status,
                location: response.header("location").map(str::to_string),
            }),
            400..=u16::MAX => Err(Error::Api {
                status: response.status,
                detail: error_detail(&response.body),
            }),
            status => Err(Error::UnexpectedStatus(status)),
        }
    }
}

fn require(field: &'static str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::EmptyField(field));
    }
    Ok(())
}

/// Extract `detail` from an error body, falling back to the generic message
/// for bodies that are not JSON objects or lack the field.
fn error_detail(body: &str) -> String {
    let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) else {
        return GENERIC_ERROR_DETAIL.to_string();
    };
    match map.get("detail") {
        Some(Value::String(detail)) => detail.clone(),
        None | Some(Value::Null) => GENERIC_ERROR_DETAIL.to_string(),
        // FastAPI validation errors carry a list here.
        Some(other) => other.to_string(),
    }
}

/// Blocking client for the Aivene service.
///
/// ```no_run
/// use aivene_core::{Aivene, ClientConfigBuilder, Search};
///
/// let config = ClientConfigBuilder::with_api_key("zpka_...").build()?;
/// let aivene = Aivene::new(config);
/// let response = aivene.search(&Search::new("nvidia stock"))?;
/// println!("{}", response.text());
/// # Ok::<(), aivene_core::Error>(())
/// ```
#[derive(Clone)]
pub struct Aivene {
    client: AiveneClient,
    transport: Arc<dyn Transport>,
}

impl Aivene {
    /// Creates a client using the ureq transport.
    pub fn new(config: ClientConfig) -> Self {
        let transport = UreqTransport::new(config.timeout());
        Self::with_transport(config, transport)
    }

    pub fn with_transport(config: ClientConfig, transport: impl Transport + 'static) -> Self {
        Self {
            client: AiveneClient::new(config),
            transport: Arc::new(transport),
        }
    }

    /// Creates a client configured from `AIVENE_API_KEY` / `AIVENE_BASE_URL`.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(ClientConfigBuilder::from_env()?.build()?))
    }

    pub fn client(&self) -> &AiveneClient {
        &self.client
    }

    /// Generate search queries from free text.
    pub fn generate_queries(&self, input: &GenerateQueries) -> Result<HttpResponse> {
        let request = self.client.build_generate_queries(input)?;
        self.send(Endpoint::GenerateQueries, request)
    }

    /// Search the web for a keyword.
    pub fn search(&self, input: &Search) -> Result<HttpResponse> {
        let request = self.client.build_search(input)?;
        self.send(Endpoint::Search, request)
    }

    /// Generate queries from free text and search for each of them.
    pub fn search_queries(&self, input: &SearchQueries) -> Result<HttpResponse> {
        let request = self.client.build_search_queries(input)?;
        self.send(Endpoint::SearchQueries, request)
    }

    fn send(&self, endpoint: Endpoint, request: HttpRequest) -> Result<HttpResponse> {
        debug!(%endpoint, url = %request.url, "sending request");
        let response = self.transport.execute(request).map_err(|err| {
            warn!(%endpoint, error = %err, "no response received");
            Error::from(err)
        })?;
        debug!(%endpoint, status = response.status, "received response");
        self.client.parse_response(response).inspect_err(|err| {
            warn!(%endpoint, error = %err, "request rejected");
        })
    }
}

impl fmt::Debug for Aivene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Aivene")
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}
