//! The terminal as a storefront page.

use turbo_fragment::FragmentDocument;
use turbo_storefront::{
    CartSnapshot, HeadlessPage, Notification, PageHost, PanelContent, PanelKind,
};
use turbo_variants::ProductDescriptor;

use crate::output::Output;

/// Records page state like [`HeadlessPage`] and prints toasts as they arrive.
pub struct TerminalPage {
    page: HeadlessPage,
    output: Output,
}

impl TerminalPage {
    pub fn new(output: Output) -> Self {
        Self {
            // A terminal cannot play video.
            page: HeadlessPage::new().without_autoplay(),
            output,
        }
    }

    pub fn state(&self) -> &HeadlessPage {
        &self.page
    }
}

impl PageHost for TerminalPage {
    type View = FragmentDocument;

    fn set_panel_visible(&mut self, panel: PanelKind, visible: bool) {
        self.output.debug(&format!(
            "{} {}",
            if visible { "open" } else { "close" },
            panel.as_str()
        ));
        self.page.set_panel_visible(panel, visible);
    }

    fn set_scroll_locked(&mut self, locked: bool) {
        self.page.set_scroll_locked(locked);
    }

    fn render_panel(&mut self, panel: PanelKind, content: PanelContent) {
        if let PanelContent::Error(message) = &content {
            self.output.warn(message);
        }
        self.page.render_panel(panel, content);
    }

    fn bind_view(
        &mut self,
        panel: PanelKind,
        html: &str,
        descriptor: &ProductDescriptor,
    ) -> FragmentDocument {
        self.page.bind_view(panel, html, descriptor)
    }

    fn set_cart_count(&mut self, count: u32) {
        self.output.debug(&format!("cart badge: {}", count));
        self.page.set_cart_count(count);
    }

    fn render_cart(&mut self, cart: &CartSnapshot) {
        self.page.render_cart(cart);
    }

    fn notify(&mut self, notification: Notification) {
        self.output.notification(&notification);
        self.page.notify(notification);
    }
}
