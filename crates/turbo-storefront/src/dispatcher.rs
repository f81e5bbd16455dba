//! Cart action requests.

use crate::cart::{decode_json, CartResponse, CartSnapshot};
use crate::config::StorefrontConfig;
use crate::csrf::csrf_token;
use crate::error::StorefrontError;
use tracing::{debug, warn};
use turbo_data::{ClientRequestBuilder, FetchClient, FetchError, Response};
use turbo_variants::{CartItemKey, ProductId, SubmissionPayload};

/// Handle on one in-flight add-to-cart request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartTicket {
    product_id: ProductId,
    /// Generation of the panel session that submitted.
    session: u64,
}

impl CartTicket {
    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    pub fn session(&self) -> u64 {
        self.session
    }
}

/// Builds cart requests and guards against double submission.
#[derive(Debug, Clone, Default)]
pub struct CartDispatcher {
    in_flight: bool,
}

impl CartDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Claim the single add-to-cart slot.
    pub fn begin(
        &mut self,
        product_id: ProductId,
        session: u64,
    ) -> Result<CartTicket, StorefrontError> {
        if self.in_flight {
            warn!(product_id = %product_id, "add-to-cart refused, one already in flight");
            return Err(StorefrontError::SubmissionInFlight);
        }
        self.in_flight = true;
        Ok(CartTicket {
            product_id,
            session,
        })
    }

    /// Release the slot.
    pub fn finish(&mut self) {
        self.in_flight = false;
    }

    /// POST the payload as a form, with the CSRF header when a token cookie exists.
    pub fn add_request(
        client: &FetchClient,
        config: &StorefrontConfig,
        product_id: &ProductId,
        payload: &SubmissionPayload,
    ) -> Result<ClientRequestBuilder, StorefrontError> {
        let url = config.endpoints.cart_add_url(product_id.as_str());
        let mut request = client
            .post(url.as_str())
            .accept("application/json")
            .header("X-Requested-With", "XMLHttpRequest");

        match csrf_token(client, &url, &config.csrf) {
            Some(token) => request = request.header(config.csrf.header_name.as_str(), token),
            None => warn!(
                cookie = %config.csrf.cookie_name,
                "no CSRF cookie, posting without token"
            ),
        }

        debug!(
            product_id = %product_id,
            quantity = payload.quantity,
            size = %payload.size,
            color = %payload.color,
            "add-to-cart request built"
        );

        Ok(request.form(payload)?)
    }

    pub fn remove_request(
        client: &FetchClient,
        config: &StorefrontConfig,
        key: &CartItemKey,
    ) -> ClientRequestBuilder {
        client
            .get(config.endpoints.cart_remove_url(key.as_str()))
            .accept("application/json")
            .header("X-Requested-With", "XMLHttpRequest")
    }

    pub fn snapshot_request(
        client: &FetchClient,
        config: &StorefrontConfig,
    ) -> ClientRequestBuilder {
        client
            .get(config.endpoints.cart_snapshot.as_str())
            .accept("application/json")
            .header("X-Requested-With", "XMLHttpRequest")
    }

    /// Decode a cart mutation response; an `error` status is a rejection.
    pub fn read_cart_response(
        result: Result<Response, FetchError>,
    ) -> Result<CartResponse, StorefrontError> {
        decode_json::<CartResponse>(result)?.into_result()
    }

    pub fn read_snapshot(
        result: Result<Response, FetchError>,
    ) -> Result<CartSnapshot, StorefrontError> {
        decode_json(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use turbo_data::{Method, MockTransport};

    fn payload() -> SubmissionPayload {
        SubmissionPayload {
            quantity: 1,
            size: "M".to_string(),
            color: "Navy Blue".to_string(),
            media_url: "/media/navy.jpg".to_string(),
        }
    }

    #[test]
    fn test_single_flight() {
        let mut dispatcher = CartDispatcher::new();
        let ticket = dispatcher.begin("1".into(), 3).unwrap();
        assert_eq!(ticket.session(), 3);
        assert!(dispatcher.is_in_flight());

        assert_eq!(
            dispatcher.begin("2".into(), 3).unwrap_err(),
            StorefrontError::SubmissionInFlight
        );

        dispatcher.finish();
        assert!(dispatcher.begin("2".into(), 4).is_ok());
    }

    #[test]
    fn test_add_request_with_csrf() {
        let mock = MockTransport::new();
        mock.with_cookie("csrftoken", "tok");
        let client = FetchClient::new(mock).with_base_url("https://shop.test");
        let config = StorefrontConfig::default();

        let request =
            CartDispatcher::add_request(&client, &config, &"42".into(), &payload()).unwrap();
        let request = request.request();

        assert_eq!(request.method(), Method::Post);
        assert_eq!(request.url(), "https://shop.test/cart/add/42");
        assert_eq!(request.header_value("X-CSRFToken"), Some("tok"));
        assert_eq!(request.header_value("X-Requested-With"), Some("XMLHttpRequest"));
        let mut fields: Vec<_> = request.body_text().unwrap().split('&').collect();
        fields.sort_unstable();
        assert_eq!(
            fields,
            vec!["color=Navy+Blue", "mediaUrl=%2Fmedia%2Fnavy.jpg", "quantity=1", "size=M"]
        );
    }

    #[test]
    fn test_add_request_without_cookie() {
        let client = FetchClient::new(MockTransport::new());
        let request = CartDispatcher::add_request(
            &client,
            &StorefrontConfig::default(),
            &"42".into(),
            &payload(),
        )
        .unwrap();
        assert_eq!(request.request().header_value("X-CSRFToken"), None);
    }

    #[test]
    fn test_remove_and_snapshot_requests() {
        let client = FetchClient::new(MockTransport::new());
        let config = StorefrontConfig::default();

        let remove = CartDispatcher::remove_request(&client, &config, &"7|M|Red".into());
        assert_eq!(remove.request().url(), "/cart/remove/7%7CM%7CRed");

        let snapshot = CartDispatcher::snapshot_request(&client, &config);
        assert_eq!(snapshot.request().url(), "/cart/snapshot");
        assert_eq!(snapshot.request().method(), Method::Get);
    }
}
