//! Storefront configuration.

use crate::carousel::CarouselConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use turbo_data::encode_path_segment;
use turbo_fragment::FragmentMarkup;

/// Errors loading or saving a config file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read or written.
    #[error("Config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML or JSON for this schema.
    #[error("Failed to parse config {path}: {message}")]
    Parse { path: String, message: String },

    /// The config could not be rendered.
    #[error("Failed to serialize config: {0}")]
    Serialize(String),
}

/// Everything the storefront glue needs to know about one shop.
///
/// Every field has a default, so an empty file is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorefrontConfig {
    /// Origin of the shop (`https://shop.example.com`).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// How long toasts stay visible, in milliseconds.
    #[serde(default = "default_toast_ttl_ms")]
    pub toast_ttl_ms: u64,

    #[serde(default)]
    pub endpoints: EndpointConfig,

    #[serde(default)]
    pub csrf: CsrfConfig,

    #[serde(default)]
    pub messages: MessageConfig,

    /// Class and attribute names in product fragments.
    #[serde(default)]
    pub markup: FragmentMarkup,

    #[serde(default)]
    pub carousels: CarouselConfig,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_toast_ttl_ms() -> u64 {
    3_000
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: default_request_timeout_ms(),
            toast_ttl_ms: default_toast_ttl_ms(),
            endpoints: EndpointConfig::default(),
            csrf: CsrfConfig::default(),
            messages: MessageConfig::default(),
            markup: FragmentMarkup::default(),
            carousels: CarouselConfig::default(),
        }
    }
}

impl StorefrontConfig {
    /// Load config from a `.json` file, or TOML for any other extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content, is_json(path)).map_err(|message| ConfigError::Parse {
            path: path.display().to_string(),
            message,
        })
    }

    /// Parse config text.
    pub fn parse(content: &str, json: bool) -> Result<Self, String> {
        if json {
            serde_json::from_str(content).map_err(|e| e.to_string())
        } else {
            toml::from_str(content).map_err(|e| e.to_string())
        }
    }

    /// Render the config in the format implied by `path`.
    pub fn render(&self, path: impl AsRef<Path>) -> Result<String, ConfigError> {
        if is_json(path.as_ref()) {
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
        } else {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = self.render(path)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

/// Endpoint templates. `{id}` is a product id, `{key}` a cart item key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub quick_view: String,
    pub cart_modal: String,
    pub cart_add: String,
    pub cart_remove: String,
    pub cart_snapshot: String,
    pub checkout: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            quick_view: "/fragment/quick-view/{id}".to_string(),
            cart_modal: "/fragment/cart-modal/{id}".to_string(),
            cart_add: "/cart/add/{id}".to_string(),
            cart_remove: "/cart/remove/{key}".to_string(),
            cart_snapshot: "/cart/snapshot".to_string(),
            checkout: "/checkout/{id}".to_string(),
        }
    }
}

impl EndpointConfig {
    pub fn quick_view_url(&self, product_id: &str) -> String {
        expand(&self.quick_view, "{id}", product_id)
    }

    pub fn cart_modal_url(&self, product_id: &str) -> String {
        expand(&self.cart_modal, "{id}", product_id)
    }

    pub fn cart_add_url(&self, product_id: &str) -> String {
        expand(&self.cart_add, "{id}", product_id)
    }

    pub fn cart_remove_url(&self, key: &str) -> String {
        expand(&self.cart_remove, "{key}", key)
    }

    pub fn checkout_url(&self, product_id: &str) -> String {
        expand(&self.checkout, "{id}", product_id)
    }
}

fn expand(template: &str, placeholder: &str, value: &str) -> String {
    template.replace(placeholder, &encode_path_segment(value))
}

/// Where the CSRF token lives and how it is sent back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsrfConfig {
    /// Cookie the server sets the token in.
    pub cookie_name: String,
    /// Request header that carries it on cart posts.
    pub header_name: String,
}

impl Default for CsrfConfig {
    fn default() -> Self {
        Self {
            cookie_name: "csrftoken".to_string(),
            header_name: "X-CSRFToken".to_string(),
        }
    }
}

/// User-facing text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageConfig {
    pub loading: String,
    pub load_failed: String,
    pub added: String,
    pub add_failed: String,
    pub removed: String,
    pub remove_failed: String,
    pub select_options: String,
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            loading: "Loading options...".to_string(),
            load_failed: "Could not load this product.".to_string(),
            added: "Added to cart".to_string(),
            add_failed: "Could not add this product to the cart.".to_string(),
            removed: "Removed from cart".to_string(),
            remove_failed: "Could not remove this item.".to_string(),
            select_options: "Please select your options first.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_is_default() {
        let config = StorefrontConfig::parse("", false).unwrap();
        assert_eq!(config, StorefrontConfig::default());
        assert_eq!(config.toast_ttl_ms, 3000);
        assert_eq!(config.csrf.header_name, "X-CSRFToken");
    }

    #[test]
    fn test_partial_toml() {
        let config = StorefrontConfig::parse(
            r#"
            base_url = "https://shop.test"

            [endpoints]
            cart_add = "/store/add/{id}/"

            [markup]
            color_chip_class = "swatch"
            "#,
            false,
        )
        .unwrap();

        assert_eq!(config.base_url, "https://shop.test");
        assert_eq!(config.endpoints.cart_add_url("9"), "/store/add/9/");
        assert_eq!(config.endpoints.cart_snapshot, "/cart/snapshot");
        assert_eq!(config.markup.color_chip_class, "swatch");
        assert_eq!(config.markup.size_chip_class, "size-chip");
    }

    #[test]
    fn test_json_config() {
        let json = r#"{ "toast_ttl_ms": 1500, "csrf": { "cookie_name": "xsrf" } }"#;
        let config = StorefrontConfig::parse(json, true).unwrap();
        assert_eq!(config.toast_ttl_ms, 1500);
        assert_eq!(config.csrf.cookie_name, "xsrf");
        assert_eq!(config.csrf.header_name, "X-CSRFToken");
    }

    #[test]
    fn test_invalid_config() {
        assert!(StorefrontConfig::parse("base_url = ", false).is_err());
        assert!(StorefrontConfig::parse("{", true).is_err());
    }

    #[test]
    fn test_endpoint_expansion_encodes() {
        let endpoints = EndpointConfig::default();
        assert_eq!(endpoints.quick_view_url("42"), "/fragment/quick-view/42");
        assert_eq!(endpoints.cart_modal_url("a b"), "/fragment/cart-modal/a%20b");
        assert_eq!(endpoints.cart_remove_url("7|M|Red"), "/cart/remove/7%7CM%7CRed");
        assert_eq!(endpoints.checkout_url("42"), "/checkout/42");
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = std::env::temp_dir().join(format!("storefront-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let mut config = StorefrontConfig::default();
        config.base_url = "https://shop.test".to_string();

        for name in ["storefront.toml", "storefront.json"] {
            let path = dir.join(name);
            config.save(&path).unwrap();
            assert_eq!(StorefrontConfig::load(&path).unwrap(), config);
        }

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_file() {
        let err = StorefrontConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
