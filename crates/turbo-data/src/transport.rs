//! Pluggable HTTP transports.
//!
//! [`FetchClient`](crate::FetchClient) only builds requests; a [`Transport`]
//! performs them. Native builds get [`ReqwestTransport`], tests use the
//! in-memory `MockTransport` behind the `mock` feature.

use crate::{FetchError, RequestBuilder, Response};
use async_trait::async_trait;

/// Sends requests and exposes the cookies the transport holds.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one request. Non-2xx statuses are returned as responses, not errors.
    async fn send(&self, request: RequestBuilder) -> Result<Response, FetchError>;

    /// The `Cookie` header value the transport would send to `url`.
    fn cookie_header(&self, url: &str) -> Option<String> {
        let _ = url;
        None
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use native::ReqwestTransport;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use super::Transport;
    use crate::{FetchError, Method, RequestBuilder, Response};
    use async_trait::async_trait;
    use reqwest::cookie::{CookieStore, Jar};
    use reqwest::Url;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;
    use tracing::debug;

    /// reqwest-backed transport with a shared cookie jar.
    pub struct ReqwestTransport {
        client: reqwest::Client,
        jar: Arc<Jar>,
    }

    impl ReqwestTransport {
        /// Create a transport with a request timeout.
        pub fn new(timeout: Duration) -> Result<Self, FetchError> {
            let jar = Arc::new(Jar::default());
            let client = reqwest::Client::builder()
                .timeout(timeout)
                .cookie_provider(Arc::clone(&jar))
                .build()
                .map_err(|e| FetchError::RequestError(e.to_string()))?;

            Ok(Self { client, jar })
        }

        /// Seed the jar with a `Set-Cookie` style string for `url`.
        pub fn add_cookie(&self, cookie: &str, url: &str) -> Result<(), FetchError> {
            let url = parse_url(url)?;
            self.jar.add_cookie_str(cookie, &url);
            Ok(())
        }
    }

    fn parse_url(url: &str) -> Result<Url, FetchError> {
        Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", url, e)))
    }

    #[async_trait]
    impl Transport for ReqwestTransport {
        async fn send(&self, request: RequestBuilder) -> Result<Response, FetchError> {
            let method = match request.method() {
                Method::Get => reqwest::Method::GET,
                Method::Post => reqwest::Method::POST,
            };
            let url = parse_url(request.url())?;

            let mut builder = self.client.request(method, url);
            for (key, value) in request.headers() {
                builder = builder.header(key, value);
            }
            if let Some(body) = request.body_bytes() {
                builder = builder.body(body.to_vec());
            }

            let response = builder.send().await?;
            let status = response.status().as_u16();
            let headers: HashMap<String, String> = response
                .headers()
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
                .collect();
            let body = response.bytes().await?.to_vec();

            debug!(
                method = request.method().as_str(),
                url = request.url(),
                status,
                bytes = body.len(),
                "response received"
            );

            Ok(Response::new(status, headers, body))
        }

        fn cookie_header(&self, url: &str) -> Option<String> {
            let url = Url::parse(url).ok()?;
            let value = self.jar.cookies(&url)?;
            value.to_str().ok().map(str::to_string)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_cookie_jar_roundtrip() {
            let transport = ReqwestTransport::new(Duration::from_secs(5)).unwrap();
            transport
                .add_cookie("csrftoken=abc123; Path=/", "https://shop.test/")
                .unwrap();

            assert_eq!(
                transport.cookie_header("https://shop.test/cart/add/1").as_deref(),
                Some("csrftoken=abc123")
            );
            assert!(transport.cookie_header("https://other.test/").is_none());
            assert!(transport.cookie_header("not a url").is_none());
        }

        #[test]
        fn test_invalid_cookie_url() {
            let transport = ReqwestTransport::new(Duration::from_secs(5)).unwrap();
            assert!(matches!(
                transport.add_cookie("a=b", "/relative"),
                Err(FetchError::InvalidUrl(_))
            ));
        }
    }
}
