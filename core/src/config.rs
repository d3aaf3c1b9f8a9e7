//! Client configuration: API key, base URL and an optional per-call timeout.
//!
//! The key is only ever written into the `authorization` header; every
//! `Debug` impl here prints it as `<redacted>`.

use std::fmt::{self, Debug};
use std::time::Duration;

use crate::error::{Error, Result};

/// Base address of the hosted Aivene gateway.
pub const DEFAULT_BASE_URL: &str = "https://aivene-main-72f6e2d.d2.zuplo.dev";

pub const API_KEY_ENV: &str = "AIVENE_API_KEY";
pub const BASE_URL_ENV: &str = "AIVENE_BASE_URL";

/// Builder for [`ClientConfig`].
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfigBuilder {
    api_key: String,
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl ClientConfigBuilder {
    /// Creates a builder with the given API key.
    #[inline]
    pub fn with_api_key<S: Into<String>>(api_key: S) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
            timeout: None,
        }
    }

    /// Creates a builder from `AIVENE_API_KEY` and, if set, `AIVENE_BASE_URL`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV)
            .map_err(|_| Error::Config(format!("{API_KEY_ENV} is not set")))?;
        let mut builder = Self::with_api_key(api_key);
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            builder = builder.with_base_url(base_url);
        }
        Ok(builder)
    }

    /// Sets a custom base URL.
    #[inline]
    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Bounds each call, from connect to the last byte of the body.
    #[inline]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> Result<ClientConfig> {
        if self.api_key.trim().is_empty() {
            return Err(Error::Config("API key must not be empty".to_string()));
        }
        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        if base_url.is_empty() {
            return Err(Error::Config("base URL must not be empty".to_string()));
        }
        Ok(ClientConfig {
            api_key: self.api_key,
            base_url,
            timeout: self.timeout,
        })
    }
}

impl Debug for ClientConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfigBuilder")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Immutable client configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub(crate) api_key: String,
    pub(crate) base_url: String,
    pub(crate) timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}
