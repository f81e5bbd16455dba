//! Storefront panel glue for TurboCommerce.
//!
//! Ties the variant selector to the page:
//!
//! - **Panels**: quick view, cart modal and cart drawer, one open at a time,
//!   with scroll lock while any is open
//! - **Loader**: fetches product fragments and drops responses that arrive
//!   after the user moved on
//! - **Cart**: add, remove and refresh through the cart endpoints, with a
//!   single add-to-cart in flight
//! - **Grid and carousels**: hover video on product cards, slider presets
//!
//! The page is reached only through [`PageHost`], [`CardSurface`] and
//! [`CarouselHost`]. [`HeadlessPage`] records everything it is asked to show,
//! which is what the tests and the terminal driver use.
//!
//! # Example
//!
//! ```rust,ignore
//! use turbo_storefront::prelude::*;
//!
//! let config = StorefrontConfig::load("storefront.toml")?;
//! let mut shop = Storefront::from_config(config, HeadlessPage::new())?;
//!
//! shop.load(FragmentKind::QuickView, "42").await;
//! shop.select_size("M")?;
//! shop.select_color("Red")?;
//! let response = shop.add_to_cart().await?;
//! println!("{} items in cart", response.cart_count);
//! ```

pub mod carousel;
pub mod cart;
pub mod config;
pub mod csrf;
pub mod dispatcher;
pub mod error;
pub mod grid;
pub mod host;
pub mod loader;
pub mod storefront;
pub mod visibility;

pub use carousel::{mount_carousels, CarouselConfig, CarouselHost, CarouselOptions, CarouselPreset};
pub use cart::{CartLine, CartResponse, CartSnapshot, CartStatus};
pub use config::{ConfigError, CsrfConfig, EndpointConfig, MessageConfig, StorefrontConfig};
pub use dispatcher::{CartDispatcher, CartTicket};
pub use error::StorefrontError;
pub use grid::{CardEvent, CardSurface, HoverVideo};
pub use host::{HeadlessPage, Notification, NotificationLevel, PageHost, PanelContent};
pub use loader::{FragmentKind, FragmentLoader, FragmentTicket, LoadOutcome};
pub use storefront::Storefront;
pub use visibility::{PanelKind, VisibilityController};

/// Carried by [`StorefrontError::NetworkFailure`].
pub use turbo_data::FetchError;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::cart::{CartLine, CartResponse, CartSnapshot};
    pub use crate::config::StorefrontConfig;
    pub use crate::error::StorefrontError;
    pub use crate::host::{HeadlessPage, Notification, NotificationLevel, PageHost, PanelContent};
    pub use crate::loader::{FragmentKind, LoadOutcome};
    pub use crate::storefront::Storefront;
    pub use crate::visibility::PanelKind;
    pub use turbo_variants::prelude::*;
}
