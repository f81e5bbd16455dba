//! The storefront facade.
//!
//! [`Storefront`] owns the page host, the HTTP client and the per-panel
//! selector session, and wires the loader, dispatcher and visibility
//! controller together.
//!
//! Long operations come in two halves. `open_fragment` / `begin_add_to_cart`
//! update the page and hand back a ticket plus a request that is not tied to
//! the storefront borrow; `apply_fragment` / `finish_add_to_cart` take the
//! ticket and the result. Callers that need several requests in flight drive
//! the halves themselves; everyone else uses the `async` wrappers.

use crate::cart::{CartResponse, CartSnapshot};
use crate::config::StorefrontConfig;
use crate::dispatcher::{CartDispatcher, CartTicket};
use crate::error::StorefrontError;
use crate::host::{Notification, NotificationLevel, PageHost, PanelContent};
use crate::loader::{FragmentKind, FragmentLoader, FragmentTicket, LoadOutcome};
use crate::visibility::{PanelKind, VisibilityController};
use std::time::Duration;
use tracing::{debug, info, warn};
use turbo_data::{ClientRequestBuilder, FetchClient, FetchError, Response};
use turbo_variants::{CartItemKey, ChipView, ProductId, SelectOutcome, VariantSelector};

/// The product panel currently open, and its selector once bound.
struct PanelSession<V> {
    panel: PanelKind,
    product_id: ProductId,
    generation: u64,
    selector: Option<VariantSelector<V>>,
}

/// Product panels, cart drawer and cart actions for one page.
pub struct Storefront<H: PageHost> {
    config: StorefrontConfig,
    client: FetchClient,
    host: H,
    visibility: VisibilityController,
    loader: FragmentLoader,
    dispatcher: CartDispatcher,
    session: Option<PanelSession<H::View>>,
    cart_count: u32,
}

impl<H: PageHost> Storefront<H> {
    pub fn new(config: StorefrontConfig, client: FetchClient, host: H) -> Self {
        Self {
            config,
            client,
            host,
            visibility: VisibilityController::new(),
            loader: FragmentLoader::new(),
            dispatcher: CartDispatcher::new(),
            session: None,
            cart_count: 0,
        }
    }

    /// Build a storefront talking to `config.base_url` over reqwest.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_config(config: StorefrontConfig, host: H) -> Result<Self, StorefrontError> {
        let transport =
            turbo_data::ReqwestTransport::new(Duration::from_millis(config.request_timeout_ms))?;
        let client = FetchClient::new(transport).with_base_url(config.base_url.clone());
        Ok(Self::new(config, client, host))
    }

    pub fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    pub fn client(&self) -> &FetchClient {
        &self.client
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// The badge count as last reported by the server.
    pub fn cart_count(&self) -> u32 {
        self.cart_count
    }

    pub fn open_panel(&self) -> Option<PanelKind> {
        self.visibility.current()
    }

    /// Product of the open product panel.
    pub fn open_product(&self) -> Option<&ProductId> {
        self.session.as_ref().map(|s| &s.product_id)
    }

    pub fn is_submitting(&self) -> bool {
        self.dispatcher.is_in_flight()
    }

    // -- Fragment panels --

    /// Open the panel for `kind`, show the loading text and start a load.
    pub fn open_fragment(
        &mut self,
        kind: FragmentKind,
        product_id: impl Into<ProductId>,
    ) -> (FragmentTicket, ClientRequestBuilder) {
        let panel = kind.panel();
        self.show_panel(panel);

        let ticket = self.loader.begin(kind, product_id.into());
        self.host
            .render_panel(panel, PanelContent::Loading(self.config.messages.loading.clone()));
        self.session = Some(PanelSession {
            panel,
            product_id: ticket.product_id().clone(),
            generation: ticket.generation(),
            selector: None,
        });

        debug!(
            kind = ticket.kind().as_str(),
            product_id = %ticket.product_id(),
            generation = ticket.generation(),
            "fragment load started"
        );

        let request = FragmentLoader::request(&self.client, &self.config, &ticket);
        (ticket, request)
    }

    /// Render a fragment response and bind its selector, unless the ticket is stale.
    pub fn apply_fragment(
        &mut self,
        ticket: &FragmentTicket,
        result: Result<Response, FetchError>,
    ) -> LoadOutcome {
        let panel = ticket.panel();
        if !self.loader.is_current(ticket) || !self.visibility.is_open(panel) {
            debug!(
                panel = panel.as_str(),
                product_id = %ticket.product_id(),
                generation = ticket.generation(),
                current = self.loader.generation(),
                "stale fragment response dropped"
            );
            return LoadOutcome::Stale;
        }

        match FragmentLoader::read(&self.config, result) {
            Ok((html, descriptor)) => {
                self.host.render_panel(panel, PanelContent::Fragment(html.clone()));
                let view = self.host.bind_view(panel, &html, &descriptor);
                let selector = VariantSelector::bind(descriptor, view);
                let phase = selector.phase();

                let session = self.session.get_or_insert_with(|| PanelSession {
                    panel,
                    product_id: ticket.product_id().clone(),
                    generation: ticket.generation(),
                    selector: None,
                });
                session.selector = Some(selector);

                debug!(
                    panel = panel.as_str(),
                    product_id = %ticket.product_id(),
                    phase = phase.as_str(),
                    "fragment bound"
                );
                LoadOutcome::Bound { phase }
            }
            Err(e) => {
                warn!(
                    kind = ticket.kind().as_str(),
                    product_id = %ticket.product_id(),
                    status = ?e.status(),
                    transport = e.is_transport(),
                    error = %e,
                    "fragment load failed"
                );
                self.host.render_panel(
                    panel,
                    PanelContent::Error(self.config.messages.load_failed.clone()),
                );
                LoadOutcome::Failed(e)
            }
        }
    }

    /// Open a panel and load its fragment.
    pub async fn load(
        &mut self,
        kind: FragmentKind,
        product_id: impl Into<ProductId>,
    ) -> LoadOutcome {
        let (ticket, request) = self.open_fragment(kind, product_id);
        let result = request.send().await;
        self.apply_fragment(&ticket, result)
    }

    /// Close `panel` if it is open.
    pub fn close_panel(&mut self, panel: PanelKind) -> bool {
        if !self.visibility.close(&mut self.host, panel) {
            return false;
        }
        if panel.is_product_panel() {
            self.discard_session();
        }
        true
    }

    /// Close whatever panel is open.
    pub fn close(&mut self) -> Option<PanelKind> {
        let panel = self.visibility.close_all(&mut self.host)?;
        if panel.is_product_panel() {
            self.discard_session();
        }
        Some(panel)
    }

    fn show_panel(&mut self, panel: PanelKind) {
        if let Some(closed) = self.visibility.open(&mut self.host, panel) {
            if closed.is_product_panel() {
                self.discard_session();
            }
        }
    }

    fn discard_session(&mut self) {
        if let Some(session) = self.session.take() {
            debug!(
                panel = session.panel.as_str(),
                product_id = %session.product_id,
                "panel session discarded"
            );
        }
        self.loader.invalidate();
    }

    // -- Selection --

    /// The bound selector of the open product panel.
    pub fn selector(&self) -> Option<&VariantSelector<H::View>> {
        self.session.as_ref().and_then(|s| s.selector.as_ref())
    }

    pub fn selector_mut(&mut self) -> Option<&mut VariantSelector<H::View>> {
        self.session.as_mut().and_then(|s| s.selector.as_mut())
    }

    fn bound_selector(&mut self) -> Result<&mut VariantSelector<H::View>, StorefrontError> {
        self.selector_mut().ok_or(StorefrontError::NoOpenPanel)
    }

    pub fn select_size(&mut self, value: &str) -> Result<SelectOutcome, StorefrontError> {
        Ok(self.bound_selector()?.select_size(value))
    }

    pub fn select_color(&mut self, value: &str) -> Result<SelectOutcome, StorefrontError> {
        Ok(self.bound_selector()?.select_color(value))
    }

    pub fn select_thumbnail(&mut self, index: usize) -> Result<SelectOutcome, StorefrontError> {
        Ok(self.bound_selector()?.select_thumbnail(index))
    }

    pub fn set_quantity(&mut self, quantity: u32) -> Result<(), StorefrontError> {
        self.bound_selector()?.set_quantity(quantity);
        Ok(())
    }

    /// Checkout link for the open product, once every required chip is chosen.
    pub fn checkout_url(&self) -> Result<String, StorefrontError> {
        let session = self.session.as_ref().ok_or(StorefrontError::NoOpenPanel)?;
        let selector = session.selector.as_ref().ok_or(StorefrontError::NoOpenPanel)?;
        selector.build_submission_payload()?;
        Ok(self
            .client
            .resolve_url(&self.config.endpoints.checkout_url(session.product_id.as_str())))
    }

    // -- Cart --

    /// Validate the selection, disable the submit control and build the add request.
    pub fn begin_add_to_cart(
        &mut self,
    ) -> Result<(CartTicket, ClientRequestBuilder), StorefrontError> {
        let session = self.session.as_mut().ok_or(StorefrontError::NoOpenPanel)?;
        let selector = session.selector.as_mut().ok_or(StorefrontError::NoOpenPanel)?;

        let payload = match selector.build_submission_payload() {
            Ok(payload) => payload,
            Err(e) => {
                warn!(product_id = %session.product_id, error = %e, "add-to-cart blocked");
                self.host.notify(Notification::new(
                    NotificationLevel::Info,
                    self.config.messages.select_options.clone(),
                    Duration::from_millis(self.config.toast_ttl_ms),
                ));
                return Err(e.into());
            }
        };

        let request =
            CartDispatcher::add_request(&self.client, &self.config, &session.product_id, &payload)?;
        let ticket = self
            .dispatcher
            .begin(session.product_id.clone(), session.generation)?;
        selector.view_mut().set_submit_enabled(false);

        Ok((ticket, request))
    }

    /// Apply an add-to-cart response.
    ///
    /// On success the badge and drawer are updated and the drawer replaces
    /// whatever product panel is open. On failure an error toast is shown and
    /// the submit control of the submitting panel, if still open, is restored.
    pub fn finish_add_to_cart(
        &mut self,
        ticket: CartTicket,
        result: Result<Response, FetchError>,
    ) -> Result<CartResponse, StorefrontError> {
        self.dispatcher.finish();
        let origin_open = self
            .session
            .as_ref()
            .map(|s| s.generation == ticket.session())
            .unwrap_or(false);

        match CartDispatcher::read_cart_response(result) {
            Ok(response) => {
                self.apply_cart(response.cart_count, &response.snapshot());
                self.show_panel(PanelKind::CartDrawer);
                self.toast(NotificationLevel::Success, self.config.messages.added.clone());

                info!(
                    product_id = %ticket.product_id(),
                    cart_count = response.cart_count,
                    "added to cart"
                );
                Ok(response)
            }
            Err(e) => {
                warn!(
                    product_id = %ticket.product_id(),
                    status = ?e.status(),
                    error = %e,
                    "add-to-cart failed"
                );
                let message = match &e {
                    StorefrontError::CartRejected(reason) => reason.clone(),
                    _ => self.config.messages.add_failed.clone(),
                };
                self.toast(NotificationLevel::Error, message);

                if origin_open {
                    if let Some(selector) = self.selector_mut() {
                        selector.sync_submit_control();
                    }
                }
                Err(e)
            }
        }
    }

    /// Add the open product to the cart.
    pub async fn add_to_cart(&mut self) -> Result<CartResponse, StorefrontError> {
        let (ticket, request) = self.begin_add_to_cart()?;
        let result = request.send().await;
        self.finish_add_to_cart(ticket, result)
    }

    /// Remove one cart line.
    pub async fn remove_item(
        &mut self,
        key: &CartItemKey,
    ) -> Result<CartResponse, StorefrontError> {
        let request = CartDispatcher::remove_request(&self.client, &self.config, key);
        let result = request.send().await;

        match CartDispatcher::read_cart_response(result) {
            Ok(response) => {
                self.apply_cart(response.cart_count, &response.snapshot());
                self.toast(NotificationLevel::Success, self.config.messages.removed.clone());
                info!(key = %key, cart_count = response.cart_count, "removed from cart");
                Ok(response)
            }
            Err(e) => {
                warn!(key = %key, error = %e, "cart removal failed");
                self.toast(NotificationLevel::Error, self.config.messages.remove_failed.clone());
                Err(e)
            }
        }
    }

    /// Fetch the cart and re-render the drawer.
    pub async fn refresh_cart(&mut self) -> Result<CartSnapshot, StorefrontError> {
        let request = CartDispatcher::snapshot_request(&self.client, &self.config);
        let result = request.send().await;

        match CartDispatcher::read_snapshot(result) {
            Ok(snapshot) => {
                self.apply_cart(snapshot.item_count(), &snapshot);
                Ok(snapshot)
            }
            Err(e) => {
                warn!(error = %e, "cart refresh failed");
                Err(e)
            }
        }
    }

    /// Open the cart drawer and refresh its contents.
    pub async fn open_cart_drawer(&mut self) -> Result<CartSnapshot, StorefrontError> {
        self.show_panel(PanelKind::CartDrawer);
        self.refresh_cart().await
    }

    fn apply_cart(&mut self, count: u32, snapshot: &CartSnapshot) {
        self.cart_count = count;
        self.host.set_cart_count(count);
        self.host.render_cart(snapshot);
    }

    fn toast(&mut self, level: NotificationLevel, message: String) {
        let ttl = Duration::from_millis(self.config.toast_ttl_ms);
        self.host.notify(Notification::new(level, message, ttl));
    }
}
