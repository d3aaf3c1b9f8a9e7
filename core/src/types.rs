//! Request payloads for the three Aivene endpoints.
//!
//! # Design
//! Every optional parameter is an `Option`. `None` means "not supplied" and
//! the key is left out of the JSON body entirely; `Some` is always sent, even
//! for `0`, `false` or an empty string, since `depth: 0` and an omitted depth
//! mean different things to the service. Constructors fill in the service's
//! documented defaults, so opting out of one is an explicit `None`:
//!
//! ```
//! use aivene_core::{Search, SearchOptions};
//!
//! let req = Search::new("nvidia stock").with_options(SearchOptions {
//!     depth: None,
//!     device: Some("mobile".to_string()),
//!     ..SearchOptions::default()
//! });
//! assert!(req.options.depth.is_none());
//! ```

use serde::{Deserialize, Serialize};

pub const DEFAULT_N_QUERIES: u32 = 1;
pub const DEFAULT_DEPTH: u32 = 50;
pub const DEFAULT_MAX_CRAWL_PAGES: u32 = 1;
/// Region code for the United States.
pub const DEFAULT_LOCATION_CODE: u32 = 2840;
pub const DEFAULT_LANGUAGE_NAME: &str = "English";
pub const DEFAULT_LANGUAGE_CODE: &str = "en";
pub const DEFAULT_DEVICE: &str = "desktop";
pub const DEFAULT_OS: &str = "windows";

/// Payload for `POST /generate_queries`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateQueries {
    pub user_content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n_queries: Option<u32>,
}

impl GenerateQueries {
    pub fn new(user_content: impl Into<String>) -> Self {
        Self {
            user_content: user_content.into(),
            n_queries: Some(DEFAULT_N_QUERIES),
        }
    }

    pub fn with_n_queries(mut self, n_queries: u32) -> Self {
        self.n_queries = Some(n_queries);
        self
    }
}

/// Crawl, locale and device parameters shared by `/search` and
/// `/search_queries`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Restrict results to this URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_crawl_pages: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_code: Option<u32>,
    /// `"latitude,longitude,zoom"` as accepted by the service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_coordinate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
    /// Search engine domain, e.g. `google.co.uk`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub se_domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os: Option<String>,
    /// Ask the service for the unprocessed upstream result.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<bool>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            url: None,
            depth: Some(DEFAULT_DEPTH),
            max_crawl_pages: Some(DEFAULT_MAX_CRAWL_PAGES),
            location_name: None,
            location_code: Some(DEFAULT_LOCATION_CODE),
            location_coordinate: None,
            language_name: Some(DEFAULT_LANGUAGE_NAME.to_string()),
            language_code: Some(DEFAULT_LANGUAGE_CODE.to_string()),
            se_domain: None,
            device: Some(DEFAULT_DEVICE.to_string()),
            os: Some(DEFAULT_OS.to_string()),
            raw_response: Some(false),
        }
    }
}

impl SearchOptions {
    /// Options with every parameter unset, so only the required field is sent.
    pub fn none() -> Self {
        Self {
            url: None,
            depth: None,
            max_crawl_pages: None,
            location_name: None,
            location_code: None,
            location_coordinate: None,
            language_name: None,
            language_code: None,
            se_domain: None,
            device: None,
            os: None,
            raw_response: None,
        }
    }
}

/// Payload for `POST /search`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Search {
    pub keyword: String,
    #[serde(flatten)]
    pub options: SearchOptions,
}

impl Search {
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            options: SearchOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }
}

/// Payload for `POST /search_queries`: query generation followed by a
/// search for each generated query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQueries {
    pub user_content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n_queries: Option<u32>,
    #[serde(flatten)]
    pub options: SearchOptions,
}

impl SearchQueries {
    pub fn new(user_content: impl Into<String>) -> Self {
        Self {
            user_content: user_content.into(),
            n_queries: Some(DEFAULT_N_QUERIES),
            options: SearchOptions::default(),
        }
    }

    pub fn with_n_queries(mut self, n_queries: u32) -> Self {
        self.n_queries = Some(n_queries);
        self
    }

    pub fn with_options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }
}
