//! Page capabilities the storefront drives.

use crate::cart::CartSnapshot;
use crate::visibility::PanelKind;
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use turbo_fragment::FragmentDocument;
use turbo_variants::{FragmentView, ProductDescriptor};

/// What a product panel shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelContent {
    /// Nothing (closed panel).
    Empty,
    /// Loading placeholder text.
    Loading(String),
    /// Fragment markup from the server.
    Fragment(String),
    /// Inline error text.
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationLevel {
    Success,
    Error,
    Info,
}

impl NotificationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationLevel::Success => "success",
            NotificationLevel::Error => "error",
            NotificationLevel::Info => "info",
        }
    }
}

/// A transient toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    /// How long the toast stays up.
    pub ttl: Duration,
}

impl Notification {
    pub fn new(level: NotificationLevel, message: impl Into<String>, ttl: Duration) -> Self {
        Self {
            level,
            message: message.into(),
            ttl,
        }
    }
}

/// Everything the storefront needs from the page.
///
/// A browser shim, the terminal driver and [`HeadlessPage`] all implement it.
pub trait PageHost {
    /// The per-panel view a variant selector drives.
    type View: FragmentView;

    fn set_panel_visible(&mut self, panel: PanelKind, visible: bool);

    fn set_scroll_locked(&mut self, locked: bool);

    /// Replace a product panel's content.
    fn render_panel(&mut self, panel: PanelKind, content: PanelContent);

    /// Build the view over a fragment just rendered into `panel`.
    fn bind_view(&mut self, panel: PanelKind, html: &str, descriptor: &ProductDescriptor)
        -> Self::View;

    /// Update the cart badge.
    fn set_cart_count(&mut self, count: u32);

    /// Re-render the cart drawer.
    fn render_cart(&mut self, cart: &CartSnapshot);

    fn notify(&mut self, notification: Notification);
}

/// A page that only records what it was asked to show.
#[derive(Debug, Clone, Default)]
pub struct HeadlessPage {
    visible: HashSet<PanelKind>,
    scroll_locked: bool,
    contents: HashMap<PanelKind, PanelContent>,
    cart_count: Option<u32>,
    cart: Option<CartSnapshot>,
    notifications: Vec<Notification>,
    block_autoplay: bool,
}

impl HeadlessPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Views created from now on refuse video autoplay.
    pub fn without_autoplay(mut self) -> Self {
        self.block_autoplay = true;
        self
    }

    pub fn is_visible(&self, panel: PanelKind) -> bool {
        self.visible.contains(&panel)
    }

    pub fn visible_panels(&self) -> Vec<PanelKind> {
        self.visible.iter().copied().collect()
    }

    pub fn scroll_locked(&self) -> bool {
        self.scroll_locked
    }

    pub fn content(&self, panel: PanelKind) -> Option<&PanelContent> {
        self.contents.get(&panel)
    }

    pub fn cart_count(&self) -> Option<u32> {
        self.cart_count
    }

    /// The cart as last rendered into the drawer.
    pub fn cart(&self) -> Option<&CartSnapshot> {
        self.cart.as_ref()
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn last_notification(&self) -> Option<&Notification> {
        self.notifications.last()
    }

    /// Drop recorded notifications (a terminal prints and forgets them).
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }
}

impl PageHost for HeadlessPage {
    type View = FragmentDocument;

    fn set_panel_visible(&mut self, panel: PanelKind, visible: bool) {
        if visible {
            self.visible.insert(panel);
        } else {
            self.visible.remove(&panel);
        }
    }

    fn set_scroll_locked(&mut self, locked: bool) {
        self.scroll_locked = locked;
    }

    fn render_panel(&mut self, panel: PanelKind, content: PanelContent) {
        self.contents.insert(panel, content);
    }

    fn bind_view(
        &mut self,
        _panel: PanelKind,
        html: &str,
        descriptor: &ProductDescriptor,
    ) -> FragmentDocument {
        let document = FragmentDocument::new(html, descriptor);
        if self.block_autoplay {
            document.without_autoplay()
        } else {
            document
        }
    }

    fn set_cart_count(&mut self, count: u32) {
        self.cart_count = Some(count);
    }

    fn render_cart(&mut self, cart: &CartSnapshot) {
        self.cart = Some(cart.clone());
    }

    fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }
}
