//! Error types for the Aivene client.
//!
//! # Design
//! A call fails in one of three ways: the request never got a response
//! (`NoResponse`), the service rejected it with a 4xx/5xx (`Api`), or it
//! answered with a status that is neither success nor failure (`3xx`, `1xx`).
//! Once a status has been received the error always carries it, even when
//! the body could not be read.
//! `Api` displays as `HTTP error {status}: {detail}`, the exact text callers
//! of the service already match on.

use thiserror::Error;

/// Substituted for `detail` when an error body carries no usable one.
pub const GENERIC_ERROR_DETAIL: &str =
    "An unexpected error occurred. Please try again or contact support.";

/// Errors returned by the Aivene client.
#[derive(Debug, Error)]
pub enum Error {
    /// No response was obtained (DNS, connection refused, timeout).
    #[error("No response received from the server")]
    NoResponse {
        #[source]
        source: TransportError,
    },

    /// A status line arrived but the body could not be read (connection
    /// dropped mid-body, or the body exceeded the size limit).
    #[error("HTTP error {status}: response body could not be read")]
    ResponseBody {
        status: u16,
        #[source]
        source: TransportError,
    },

    /// The service answered with a status >= 400.
    #[error("HTTP error {status}: {detail}")]
    Api { status: u16, detail: String },

    /// The service answered with a 3xx that the transport did not follow.
    #[error("HTTP error {status}: unexpected redirect")]
    UnexpectedRedirect {
        status: u16,
        location: Option<String>,
    },

    /// A status outside every classified range (e.g. 1xx).
    #[error("HTTP error {0}: unexpected status")]
    UnexpectedStatus(u16),

    /// A required field was empty.
    #[error("`{0}` must not be empty")]
    EmptyField(&'static str),

    /// A tool call carried arguments that do not match its schema.
    #[error("invalid tool arguments: {0}")]
    ToolArguments(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The client could not be configured.
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// HTTP status carried by the error, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } | Error::UnexpectedRedirect { status, .. } => Some(*status),
            Error::UnexpectedStatus(status) | Error::ResponseBody { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_no_response(&self) -> bool {
        matches!(self, Error::NoResponse { .. })
    }

    pub fn is_auth_error(&self) -> bool {
        matches!(self, Error::Api { status: 401 | 403, .. })
    }

    /// Whether repeating the same call could succeed. The client never
    /// retries on its own; this is for callers that want to.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::NoResponse { .. } | Error::ResponseBody { .. } => true,
            Error::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Failure reported by a [`Transport`](crate::Transport) when no response
/// could be obtained.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
    status: Option<u16>,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            message: message.into(),
            status: None,
            source: Some(source.into()),
        }
    }

    /// The response head with `status` arrived, but reading its body failed.
    pub fn body_unreadable(
        status: u16,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            message: format!("reading body of {status} response failed"),
            status: Some(status),
            source: Some(source.into()),
        }
    }

    /// Status of the response whose body failed, if one was received.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<TransportError> for Error {
    fn from(source: TransportError) -> Self {
        match source.status {
            Some(status) => Error::ResponseBody { status, source },
            None => Error::NoResponse { source },
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;
