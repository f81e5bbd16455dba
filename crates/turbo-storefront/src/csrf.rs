//! CSRF token lookup.
//!
//! The token is read from the cookie the server set; this crate never writes it.

use crate::config::CsrfConfig;
use turbo_data::FetchClient;

/// Value of cookie `name` in a `Cookie` header.
pub fn cookie_value(header: &str, name: &str) -> Option<String> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim().trim_matches('"').to_string())
        .filter(|value| !value.is_empty())
}

/// The CSRF token the client's cookie store holds for `url`.
pub fn csrf_token(client: &FetchClient, url: &str, config: &CsrfConfig) -> Option<String> {
    client
        .cookie_header(url)
        .and_then(|header| cookie_value(&header, &config.cookie_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use turbo_data::MockTransport;

    #[test]
    fn test_cookie_value() {
        let header = "sessionid=abc; csrftoken=tok123; theme=dark";
        assert_eq!(cookie_value(header, "csrftoken").as_deref(), Some("tok123"));
        assert_eq!(cookie_value(header, "theme").as_deref(), Some("dark"));
        assert_eq!(cookie_value(header, "csrf"), None);
        assert_eq!(cookie_value("csrftoken=", "csrftoken"), None);
        assert_eq!(cookie_value("csrftoken=\"q\"", "csrftoken").as_deref(), Some("q"));
        assert_eq!(cookie_value("", "csrftoken"), None);
    }

    #[test]
    fn test_token_from_client_cookies() {
        let mock = MockTransport::new();
        mock.with_cookie("sessionid", "s").with_cookie("csrftoken", "t");
        let client = FetchClient::new(mock);

        assert_eq!(
            csrf_token(&client, "/cart/add/1", &CsrfConfig::default()).as_deref(),
            Some("t")
        );

        let custom = CsrfConfig {
            cookie_name: "XSRF-TOKEN".to_string(),
            ..CsrfConfig::default()
        };
        assert_eq!(csrf_token(&client, "/cart/add/1", &custom), None);
    }
}
