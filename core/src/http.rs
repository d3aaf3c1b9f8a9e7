//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The
//! client builds `HttpRequest` values and classifies `HttpResponse` values;
//! executing the round trip is the job of a [`Transport`](crate::Transport).
//! Keeping the wire exchange as data makes the request contract testable
//! without a network.
//!
//! Every request to the Aivene service is a POST with a JSON body, so the
//! method is implied rather than stored.

use serde::de::DeserializeOwned;

/// An HTTP POST request described as plain data.
///
/// Built by `AiveneClient::build_*` methods. The `authorization` header
/// carries the bearer token, so avoid logging `headers` verbatim.
#[derive(Clone)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpRequest {
    /// Look up a header by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

impl std::fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let headers: Vec<(&str, &str)> = self
            .headers
            .iter()
            .map(|(k, v)| {
                if k.eq_ignore_ascii_case("authorization") {
                    (k.as_str(), "<redacted>")
                } else {
                    (k.as_str(), v.as_str())
                }
            })
            .collect();
        f.debug_struct("HttpRequest")
            .field("url", &self.url)
            .field("headers", &headers)
            .field("body", &self.body)
            .finish()
    }
}

/// An HTTP response described as plain data.
///
/// Returned unmodified to the caller on a 2xx status. The client never
/// interprets the body of a successful response; `text` and `json` are
/// conveniences for callers that want to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    pub fn text(&self) -> &str {
        &self.body
    }

    /// Deserialize the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_debug_hides_authorization() {
        let req = HttpRequest {
            url: "http://localhost/search".to_string(),
            headers: vec![
                ("content-type".to_string(), "application/json".to_string()),
                ("authorization".to_string(), "Bearer secret-token".to_string()),
            ],
            body: "{}".to_string(),
        };
        let printed = format!("{req:?}");
        assert!(!printed.contains("secret-token"));
        assert!(printed.contains("<redacted>"));
        assert!(printed.contains("application/json"));
    }

    #[test]
    fn header_lookup_ignores_case() {
        let resp = HttpResponse {
            status: 200,
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: String::new(),
        };
        assert_eq!(resp.header("content-type"), Some("application/json"));
        assert_eq!(resp.header("location"), None);
    }

    #[test]
    fn json_decodes_body() {
        let resp = HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: r#"{"queries":["a","b"]}"#.to_string(),
        };
        let value: serde_json::Value = resp.json().unwrap();
        assert_eq!(value["queries"][1], "b");
        assert_eq!(resp.text(), r#"{"queries":["a","b"]}"#);
    }
}
