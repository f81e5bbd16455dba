//! Panel and modal visibility.
//!
//! At most one of the quick view, the cart modal and the cart drawer is visible.
//! The page is scroll-locked while any of them is.

use crate::host::{PageHost, PanelContent};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The overlay panels a storefront page has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelKind {
    QuickView,
    CartModal,
    CartDrawer,
}

impl PanelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PanelKind::QuickView => "quick_view",
            PanelKind::CartModal => "cart_modal",
            PanelKind::CartDrawer => "cart_drawer",
        }
    }

    /// Panels that show a product fragment and own a selection.
    pub fn is_product_panel(&self) -> bool {
        matches!(self, PanelKind::QuickView | PanelKind::CartModal)
    }
}

/// Tracks which panel is open and keeps the page in sync.
#[derive(Debug, Clone, Default)]
pub struct VisibilityController {
    open: Option<PanelKind>,
}

impl VisibilityController {
    pub fn new() -> Self {
        Self::default()
    }

    /// The open panel, if any.
    pub fn current(&self) -> Option<PanelKind> {
        self.open
    }

    pub fn is_open(&self, panel: PanelKind) -> bool {
        self.open == Some(panel)
    }

    pub fn scroll_locked(&self) -> bool {
        self.open.is_some()
    }

    /// Show `panel`, closing whichever other panel is open first.
    ///
    /// Returns the panel that was closed to make room.
    pub fn open<H: PageHost + ?Sized>(
        &mut self,
        host: &mut H,
        panel: PanelKind,
    ) -> Option<PanelKind> {
        if self.open == Some(panel) {
            return None;
        }

        let closed = self.open.take();
        if let Some(previous) = closed {
            hide(host, previous);
        }

        host.set_panel_visible(panel, true);
        self.open = Some(panel);
        host.set_scroll_locked(true);

        debug!(panel = panel.as_str(), closed = ?closed, "panel opened");
        closed
    }

    /// Hide `panel` if it is the open one.
    pub fn close<H: PageHost + ?Sized>(&mut self, host: &mut H, panel: PanelKind) -> bool {
        if self.open != Some(panel) {
            return false;
        }

        hide(host, panel);
        self.open = None;
        host.set_scroll_locked(false);

        debug!(panel = panel.as_str(), "panel closed");
        true
    }

    /// Hide whatever is open.
    pub fn close_all<H: PageHost + ?Sized>(&mut self, host: &mut H) -> Option<PanelKind> {
        let panel = self.open?;
        self.close(host, panel);
        Some(panel)
    }
}

fn hide<H: PageHost + ?Sized>(host: &mut H, panel: PanelKind) {
    host.set_panel_visible(panel, false);
    if panel.is_product_panel() {
        host.render_panel(panel, PanelContent::Empty);
    }
}
