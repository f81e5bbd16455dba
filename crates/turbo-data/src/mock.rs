//! In-memory transport for tests and offline demos.

use crate::{FetchError, RequestBuilder, Response, Transport};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone)]
enum Reply {
    Respond(Response),
    Fail(FetchError),
}

#[derive(Debug, Default)]
struct MockState {
    routes: HashMap<String, Reply>,
    cookies: Vec<(String, String)>,
    requests: Vec<RequestBuilder>,
}

/// Canned responses keyed by URL path.
///
/// Routes match on the path (scheme and host are ignored). Unrouted requests
/// get a 404. Clones share state, so a test can keep a handle while the client
/// owns another.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Reply to `path` with a full response.
    pub fn respond(&self, path: &str, response: Response) -> &Self {
        self.state()
            .routes
            .insert(path.to_string(), Reply::Respond(response));
        self
    }

    /// Reply to `path` with an HTML body.
    pub fn respond_html(&self, path: &str, status: u16, html: &str) -> &Self {
        self.respond(
            path,
            response(status, "text/html; charset=utf-8", html.as_bytes().to_vec()),
        )
    }

    /// Reply to `path` with a JSON body.
    pub fn respond_json(&self, path: &str, status: u16, body: &serde_json::Value) -> &Self {
        self.respond(
            path,
            response(status, "application/json", body.to_string().into_bytes()),
        )
    }

    /// Fail requests to `path` at the transport level.
    pub fn fail(&self, path: &str, error: FetchError) -> &Self {
        self.state()
            .routes
            .insert(path.to_string(), Reply::Fail(error));
        self
    }

    /// Add a cookie reported by [`Transport::cookie_header`].
    pub fn with_cookie(&self, name: &str, value: &str) -> &Self {
        self.state()
            .cookies
            .push((name.to_string(), value.to_string()));
        self
    }

    /// Every request sent so far, oldest first.
    pub fn requests(&self) -> Vec<RequestBuilder> {
        self.state().requests.clone()
    }

    /// Requests sent to `path`.
    pub fn requests_to(&self, path: &str) -> Vec<RequestBuilder> {
        self.state()
            .requests
            .iter()
            .filter(|r| path_of(r.url()) == path)
            .cloned()
            .collect()
    }
}

fn response(status: u16, content_type: &str, body: Vec<u8>) -> Response {
    let mut headers = HashMap::new();
    headers.insert("Content-Type".to_string(), content_type.to_string());
    Response::new(status, headers, body)
}

/// `https://shop.test/a/b?c` ⇒ `/a/b?c`.
fn path_of(url: &str) -> &str {
    match url.split_once("://") {
        Some((_, rest)) => rest.find('/').map(|i| &rest[i..]).unwrap_or("/"),
        None => url,
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: RequestBuilder) -> Result<Response, FetchError> {
        let mut state = self.state();
        let reply = state.routes.get(path_of(request.url())).cloned();
        state.requests.push(request);

        match reply {
            Some(Reply::Respond(response)) => Ok(response),
            Some(Reply::Fail(error)) => Err(error),
            None => Ok(response(404, "text/plain", b"no route".to_vec())),
        }
    }

    fn cookie_header(&self, _url: &str) -> Option<String> {
        let state = self.state();
        if state.cookies.is_empty() {
            return None;
        }
        Some(
            state
                .cookies
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Method;

    #[test]
    fn test_path_of() {
        assert_eq!(path_of("https://shop.test/cart/add/1"), "/cart/add/1");
        assert_eq!(path_of("http://shop.test"), "/");
        assert_eq!(path_of("/cart/snapshot"), "/cart/snapshot");
    }

    #[tokio::test]
    async fn test_routes_and_recording() {
        let mock = MockTransport::new();
        mock.respond_html("/fragment/quick-view/1", 200, "<div></div>")
            .fail("/cart/snapshot", FetchError::Timeout);

        let ok = mock
            .send(RequestBuilder::new(Method::Get, "https://shop.test/fragment/quick-view/1"))
            .await
            .unwrap();
        assert_eq!(ok.text().unwrap(), "<div></div>");

        let err = mock
            .send(RequestBuilder::new(Method::Get, "/cart/snapshot"))
            .await
            .unwrap_err();
        assert_eq!(err, FetchError::Timeout);

        let missing = mock
            .send(RequestBuilder::new(Method::Get, "/nowhere"))
            .await
            .unwrap();
        assert_eq!(missing.status, 404);

        assert_eq!(mock.requests().len(), 3);
        assert_eq!(mock.requests_to("/fragment/quick-view/1").len(), 1);
    }

    #[test]
    fn test_cookie_header() {
        let mock = MockTransport::new();
        assert!(mock.cookie_header("/").is_none());
        mock.with_cookie("sessionid", "s1").with_cookie("csrftoken", "t1");
        assert_eq!(
            mock.cookie_header("/").as_deref(),
            Some("sessionid=s1; csrftoken=t1")
        );
    }
}
