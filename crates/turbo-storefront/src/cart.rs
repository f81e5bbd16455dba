//! Cart state as the server reports it.
//!
//! The storefront never computes cart contents; it renders what the cart
//! endpoints return. Field names are camelCase on the wire, with the
//! snake_case spellings accepted as aliases.

use crate::error::StorefrontError;
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use turbo_data::{FetchError, Response};
use turbo_variants::{CartItemKey, ProductId};

/// One line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    #[serde(alias = "item_key")]
    pub key: CartItemKey,
    #[serde(alias = "product_id", deserialize_with = "string_or_number")]
    pub product_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub color: String,
    pub quantity: u32,
    /// Display price, as the server formats it.
    #[serde(default, alias = "unit_price", deserialize_with = "string_or_number")]
    pub unit_price: String,
    #[serde(default, alias = "image_url", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl CartLine {
    pub fn product(&self) -> ProductId {
        ProductId::new(self.product_id.clone())
    }
}

/// Cart contents for rendering the drawer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    #[serde(default, alias = "cart_items")]
    pub cart_items: Vec<CartLine>,
    #[serde(default, alias = "cart_total", deserialize_with = "string_or_number")]
    pub cart_total: String,
}

impl CartSnapshot {
    /// Total quantity across lines, saturating at `u32::MAX`.
    pub fn item_count(&self) -> u32 {
        self.cart_items
            .iter()
            .fold(0u32, |count, line| count.saturating_add(line.quantity))
    }

    pub fn is_empty(&self) -> bool {
        self.cart_items.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CartStatus {
    #[default]
    Ok,
    Error,
}

/// Answer to a cart mutation (add or remove).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    #[serde(default)]
    pub status: CartStatus,
    #[serde(default, alias = "cart_count")]
    pub cart_count: u32,
    #[serde(default, alias = "cart_items")]
    pub cart_items: Vec<CartLine>,
    #[serde(default, alias = "cart_total", deserialize_with = "string_or_number")]
    pub cart_total: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CartResponse {
    /// The cart contents carried by the response.
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            cart_items: self.cart_items.clone(),
            cart_total: self.cart_total.clone(),
        }
    }

    /// Turn an `error` status into [`StorefrontError::CartRejected`].
    pub fn into_result(self) -> Result<Self, StorefrontError> {
        match self.status {
            CartStatus::Ok => Ok(self),
            CartStatus::Error => Err(StorefrontError::CartRejected(
                self.error
                    .unwrap_or_else(|| "the server refused the change".to_string()),
            )),
        }
    }
}

/// Decode a JSON response body, insisting on a 2xx status and a JSON content type.
pub fn decode_json<T: DeserializeOwned>(
    result: Result<Response, FetchError>,
) -> Result<T, StorefrontError> {
    let response = result?.error_for_status()?;
    if !response.is_json() {
        return Err(StorefrontError::MalformedResponse(format!(
            "expected JSON, got {}",
            response.content_type().unwrap_or("no content type")
        )));
    }
    response
        .json()
        .map_err(|e| StorefrontError::MalformedResponse(e.to_string()))
}

/// Accept a JSON string or number (ids and prices arrive as either); `null` is empty.
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(D::Error::custom(format!(
            "expected a string or number, got {}",
            other
        ))),
    }
}
