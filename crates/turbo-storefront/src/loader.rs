//! Remote fragment loading.
//!
//! Every load is stamped with a generation. Opening or closing a product panel
//! starts a new generation, so a response that arrives after the user moved on
//! is recognized and dropped instead of overwriting the newer panel.

use crate::config::StorefrontConfig;
use crate::error::StorefrontError;
use crate::visibility::PanelKind;
use turbo_data::{ClientRequestBuilder, FetchClient, FetchError, Response};
use turbo_fragment::parse_fragment;
use turbo_variants::{ProductDescriptor, ProductId, SelectorPhase};

/// Which fragment a product panel loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FragmentKind {
    /// Gallery plus options.
    QuickView,
    /// Options-only "choose before adding" modal.
    CartModal,
}

impl FragmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FragmentKind::QuickView => "quick_view",
            FragmentKind::CartModal => "cart_modal",
        }
    }

    /// The panel the fragment renders into.
    pub fn panel(&self) -> PanelKind {
        match self {
            FragmentKind::QuickView => PanelKind::QuickView,
            FragmentKind::CartModal => PanelKind::CartModal,
        }
    }
}

/// Handle on one in-flight fragment request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentTicket {
    kind: FragmentKind,
    product_id: ProductId,
    generation: u64,
}

impl FragmentTicket {
    pub fn kind(&self) -> FragmentKind {
        self.kind
    }

    pub fn panel(&self) -> PanelKind {
        self.kind.panel()
    }

    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// How a fragment response was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Rendered and bound to a selector.
    Bound { phase: SelectorPhase },
    /// Error text rendered into the panel.
    Failed(StorefrontError),
    /// Superseded by a newer load or a close; nothing rendered.
    Stale,
}

/// Generation counter and request/response plumbing for fragment loads.
#[derive(Debug, Clone, Default)]
pub struct FragmentLoader {
    generation: u64,
}

impl FragmentLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a load, superseding any earlier one.
    pub fn begin(&mut self, kind: FragmentKind, product_id: ProductId) -> FragmentTicket {
        self.generation += 1;
        FragmentTicket {
            kind,
            product_id,
            generation: self.generation,
        }
    }

    /// Supersede in-flight loads without starting a new one.
    pub fn invalidate(&mut self) {
        self.generation += 1;
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self, ticket: &FragmentTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Fragment URL for a ticket.
    pub fn url(config: &StorefrontConfig, ticket: &FragmentTicket) -> String {
        let id = ticket.product_id.as_str();
        match ticket.kind {
            FragmentKind::QuickView => config.endpoints.quick_view_url(id),
            FragmentKind::CartModal => config.endpoints.cart_modal_url(id),
        }
    }

    /// The GET request for a ticket's fragment.
    pub fn request(
        client: &FetchClient,
        config: &StorefrontConfig,
        ticket: &FragmentTicket,
    ) -> ClientRequestBuilder {
        client
            .get(Self::url(config, ticket))
            .accept("text/html")
            .header("X-Requested-With", "XMLHttpRequest")
    }

    /// Check the response and parse its markup.
    pub fn read(
        config: &StorefrontConfig,
        result: Result<Response, FetchError>,
    ) -> Result<(String, ProductDescriptor), StorefrontError> {
        let html = result?.error_for_status()?.text()?;
        let descriptor = parse_fragment(&html, &config.markup)?;
        Ok((html, descriptor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_generations_supersede() {
        let mut loader = FragmentLoader::new();
        let a = loader.begin(FragmentKind::QuickView, "A".into());
        assert!(loader.is_current(&a));

        let b = loader.begin(FragmentKind::CartModal, "B".into());
        assert!(!loader.is_current(&a));
        assert!(loader.is_current(&b));
        assert_eq!(b.panel(), PanelKind::CartModal);

        loader.invalidate();
        assert!(!loader.is_current(&b));
    }

    #[test]
    fn test_urls() {
        let config = StorefrontConfig::default();
        let mut loader = FragmentLoader::new();

        let ticket = loader.begin(FragmentKind::QuickView, "42".into());
        assert_eq!(FragmentLoader::url(&config, &ticket), "/fragment/quick-view/42");

        let ticket = loader.begin(FragmentKind::CartModal, "42".into());
        assert_eq!(FragmentLoader::url(&config, &ticket), "/fragment/cart-modal/42");
    }

    #[test]
    fn test_read_errors() {
        let config = StorefrontConfig::default();

        let not_found = Response::new(404, HashMap::new(), b"missing".to_vec());
        assert!(matches!(
            FragmentLoader::read(&config, Ok(not_found)),
            Err(StorefrontError::NetworkFailure(FetchError::HttpError { status: 404, .. }))
        ));

        assert_eq!(
            FragmentLoader::read(&config, Err(FetchError::Timeout)).unwrap_err(),
            StorefrontError::NetworkFailure(FetchError::Timeout)
        );

        let garbage = Response::new(200, HashMap::new(), b"<div class=\"size-chip".to_vec());
        assert!(matches!(
            FragmentLoader::read(&config, Ok(garbage)),
            Err(StorefrontError::Fragment(_))
        ));

        let binary = Response::new(200, HashMap::new(), vec![0xff, 0xfe]);
        assert!(matches!(
            FragmentLoader::read(&config, Ok(binary)),
            Err(StorefrontError::MalformedResponse(_))
        ));
    }
}
