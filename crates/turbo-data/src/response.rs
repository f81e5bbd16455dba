//! HTTP response handling.

use crate::FetchError;
use serde::de::DeserializeOwned;
use std::collections::HashMap;

/// Longest body excerpt carried in an [`FetchError::HttpError`] message.
const ERROR_EXCERPT_LEN: usize = 200;

/// An HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// The HTTP status code.
    pub status: u16,
    /// The response headers.
    pub headers: HashMap<String, String>,
    /// The response body.
    pub body: Vec<u8>,
}

impl Response {
    /// Create a new response.
    pub fn new(status: u16, headers: HashMap<String, String>, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Check if the response was successful (2xx status).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get the response body as text.
    pub fn text(&self) -> Result<String, FetchError> {
        String::from_utf8(self.body.clone())
            .map_err(|e| FetchError::ParseError(format!("Invalid UTF-8: {}", e)))
    }

    /// Parse the response body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, FetchError> {
        serde_json::from_slice(&self.body).map_err(|e| FetchError::ParseError(e.to_string()))
    }

    /// Get the raw response body.
    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    /// Get a header value (case-insensitive).
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Get the Content-Type header.
    pub fn content_type(&self) -> Option<&str> {
        self.header("Content-Type")
    }

    /// Media type without parameters, lowercased (`text/html; charset=utf-8` ⇒ `text/html`).
    pub fn media_type(&self) -> Option<String> {
        self.content_type()
            .and_then(|ct| ct.split(';').next())
            .map(|mt| mt.trim().to_ascii_lowercase())
            .filter(|mt| !mt.is_empty())
    }

    /// Check if the body is declared as JSON (`application/json` or `+json`).
    pub fn is_json(&self) -> bool {
        self.media_type()
            .map(|mt| mt == "application/json" || mt.ends_with("+json"))
            .unwrap_or(false)
    }

    /// Convert to a Result, returning an error for non-2xx status codes.
    pub fn error_for_status(self) -> Result<Self, FetchError> {
        if self.is_success() {
            return Ok(self);
        }

        let body = String::from_utf8_lossy(&self.body);
        let message = match body.trim() {
            "" => "empty response".to_string(),
            text => text.chars().take(ERROR_EXCERPT_LEN).collect(),
        };
        Err(FetchError::HttpError {
            status: self.status,
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_response(status: u16, headers: Vec<(&str, &str)>, body: &[u8]) -> Response {
        let headers: HashMap<String, String> = headers
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Response::new(status, headers, body.to_vec())
    }

    #[test]
    fn test_response_is_success() {
        assert!(make_response(200, vec![], b"").is_success());
        assert!(make_response(204, vec![], b"").is_success());
        assert!(!make_response(302, vec![], b"").is_success());
        assert!(!make_response(404, vec![], b"").is_success());
    }

    #[test]
    fn test_response_text() {
        let resp = make_response(200, vec![], b"<div class=\"quick-view\"></div>");
        assert_eq!(resp.text().unwrap(), "<div class=\"quick-view\"></div>");
        assert!(make_response(200, vec![], &[0xff, 0xfe]).text().is_err());
    }

    #[test]
    fn test_response_json() {
        use serde::Deserialize;

        #[derive(Deserialize, Debug, PartialEq)]
        struct Count {
            cart_count: u32,
        }

        let resp = make_response(200, vec![], br#"{"cart_count": 3}"#);
        assert_eq!(resp.json::<Count>().unwrap(), Count { cart_count: 3 });

        let resp = make_response(200, vec![], b"<html>");
        assert!(matches!(
            resp.json::<Count>(),
            Err(FetchError::ParseError(_))
        ));
    }

    #[test]
    fn test_header_case_insensitive() {
        let resp = make_response(200, vec![("content-type", "text/html")], b"");
        assert_eq!(resp.header("Content-Type"), Some("text/html"));
        assert_eq!(resp.content_type(), Some("text/html"));
        assert_eq!(resp.header("X-Missing"), None);
    }

    #[test]
    fn test_is_json() {
        let json = |ct: &str| make_response(200, vec![("Content-Type", ct)], b"").is_json();
        assert!(json("application/json"));
        assert!(json("Application/JSON; charset=utf-8"));
        assert!(json("application/problem+json"));
        assert!(!json("text/html; charset=utf-8"));
        assert!(!make_response(200, vec![], b"{}").is_json());
    }

    #[test]
    fn test_media_type() {
        let resp = make_response(200, vec![("Content-Type", "Text/HTML; charset=utf-8")], b"");
        assert_eq!(resp.media_type().as_deref(), Some("text/html"));
    }

    #[test]
    fn test_error_for_status() {
        assert!(make_response(200, vec![], b"OK").error_for_status().is_ok());

        let err = make_response(404, vec![], b"Not Found")
            .error_for_status()
            .unwrap_err();
        assert_eq!(
            err,
            FetchError::HttpError {
                status: 404,
                message: "Not Found".to_string()
            }
        );

        let err = make_response(502, vec![], b"  ").error_for_status().unwrap_err();
        assert_eq!(err.status(), Some(502));
        assert!(err.to_string().contains("empty response"));
    }

    #[test]
    fn test_error_message_is_truncated() {
        let body = "x".repeat(1000);
        let err = make_response(500, vec![], body.as_bytes())
            .error_for_status()
            .unwrap_err();
        match err {
            FetchError::HttpError { message, .. } => assert_eq!(message.len(), ERROR_EXCERPT_LEN),
            other => panic!("unexpected {:?}", other),
        }
    }
}
