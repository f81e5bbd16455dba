//! HTTP client utilities for TurboCommerce storefront panels.
//!
//! Provides a small builder API over a pluggable [`Transport`], so the panel
//! logic can fetch fragments and post cart actions the same way against a real
//! server, an in-memory mock, or a browser shim.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use turbo_data::{FetchClient, ReqwestTransport};
//!
//! let client = FetchClient::new(ReqwestTransport::new(Duration::from_secs(10))?)
//!     .with_base_url("https://shop.example.com")
//!     .with_default_header("X-Requested-With", "XMLHttpRequest");
//!
//! // Fetch an HTML fragment
//! let html = client
//!     .get("/fragment/quick-view/42")
//!     .accept("text/html")
//!     .send()
//!     .await?
//!     .error_for_status()?
//!     .text()?;
//!
//! // Post a form
//! let response = client
//!     .post("/cart/add/42")
//!     .form(&payload)?
//!     .send()
//!     .await?;
//! ```

mod error;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod request;
mod response;
mod transport;

pub use error::FetchError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockTransport;
pub use request::{encode_form_component, encode_path_segment, Method, RequestBuilder};
pub use response::Response;
pub use transport::Transport;
#[cfg(not(target_arch = "wasm32"))]
pub use transport::ReqwestTransport;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// HTTP client for making outbound requests.
#[derive(Clone)]
pub struct FetchClient {
    base_url: Option<String>,
    default_headers: HashMap<String, String>,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for FetchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchClient")
            .field("base_url", &self.base_url)
            .field("default_headers", &self.default_headers)
            .finish_non_exhaustive()
    }
}

impl FetchClient {
    /// Create a client over a transport.
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self::from_shared(Arc::new(transport))
    }

    /// Create a client over an already shared transport.
    pub fn from_shared(transport: Arc<dyn Transport>) -> Self {
        Self {
            base_url: None,
            default_headers: HashMap::new(),
            transport,
        }
    }

    /// Create a client with a base URL that will be prepended to relative paths.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Add a default header that will be included in all requests.
    pub fn with_default_header(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Create a GET request.
    pub fn get(&self, url: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Get, url)
    }

    /// Create a POST request.
    pub fn post(&self, url: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Post, url)
    }

    /// Create a request with a custom method.
    pub fn request(&self, method: Method, url: impl Into<String>) -> ClientRequestBuilder {
        let mut builder = RequestBuilder::new(method, self.resolve_url(&url.into()));
        for (key, value) in &self.default_headers {
            builder = builder.header(key.clone(), value.clone());
        }

        ClientRequestBuilder {
            builder,
            transport: Arc::clone(&self.transport),
        }
    }

    /// Prepend the base URL to a relative path.
    pub fn resolve_url(&self, url: &str) -> String {
        match &self.base_url {
            Some(base) if !is_absolute(url) => {
                let base = base.trim_end_matches('/');
                if url.starts_with('/') {
                    format!("{}{}", base, url)
                } else {
                    format!("{}/{}", base, url)
                }
            }
            _ => url.to_string(),
        }
    }

    /// The `Cookie` header the transport holds for `url`.
    pub fn cookie_header(&self, url: &str) -> Option<String> {
        self.transport.cookie_header(&self.resolve_url(url))
    }
}

fn is_absolute(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// A request builder bound to a client.
///
/// Holds its own handle on the transport, so it can be sent after the client
/// (or whatever owns it) is borrowed elsewhere.
pub struct ClientRequestBuilder {
    builder: RequestBuilder,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for ClientRequestBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientRequestBuilder")
            .field("builder", &self.builder)
            .finish_non_exhaustive()
    }
}

impl ClientRequestBuilder {
    /// Add a header to the request.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.builder = self.builder.header(key, value);
        self
    }

    /// Set the Accept header.
    pub fn accept(mut self, content_type: impl Into<String>) -> Self {
        self.builder = self.builder.accept(content_type);
        self
    }

    /// Set the request body as a string.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.builder = self.builder.text(text);
        self
    }

    /// Set the request body as JSON.
    pub fn json<T: serde::Serialize>(mut self, value: &T) -> Result<Self, FetchError> {
        self.builder = self.builder.json(value)?;
        Ok(self)
    }

    /// Set the request body as a url-encoded form.
    pub fn form<T: serde::Serialize>(mut self, value: &T) -> Result<Self, FetchError> {
        self.builder = self.builder.form(value)?;
        Ok(self)
    }

    /// The request as built so far.
    pub fn request(&self) -> &RequestBuilder {
        &self.builder
    }

    /// Send the request and return the response.
    pub async fn send(self) -> Result<Response, FetchError> {
        debug!(
            method = self.builder.method().as_str(),
            url = self.builder.url(),
            "sending request"
        );
        self.transport.send(self.builder).await
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{FetchClient, FetchError, Method, Response, Transport};
}
