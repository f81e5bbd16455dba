//! In-memory model of a rendered fragment.

use turbo_variants::{
    ChipView, MediaElement, OptionKind, PlaybackBlocked, ProductDescriptor, ViewerSlot,
};

/// One chip as the page shows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChipState {
    pub kind: OptionKind,
    pub value: String,
    pub selected: bool,
    pub available: bool,
}

/// A rendered fragment held in memory.
///
/// Implements the selector's page capabilities by recording what a browser
/// would show: which chips carry the selected marker, the hidden input values,
/// the submit control state and the viewer slot content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentDocument {
    html: String,
    chips: Vec<ChipState>,
    hidden_size: String,
    hidden_color: String,
    submit_enabled: bool,
    viewer: Option<MediaElement>,
    thumbnails: usize,
    active_thumbnail: Option<usize>,
    autoplay_allowed: bool,
    playing: bool,
}

impl FragmentDocument {
    /// Model the fragment `html` that `descriptor` was parsed from.
    ///
    /// Chips start unmarked; the selector marks the preselected ones when it binds.
    pub fn new(html: impl Into<String>, descriptor: &ProductDescriptor) -> Self {
        let chips = OptionKind::ALL
            .into_iter()
            .flat_map(|kind| descriptor.options(kind).iter())
            .map(|option| ChipState {
                kind: option.kind,
                value: option.value.clone(),
                selected: false,
                available: option.is_available,
            })
            .collect();

        Self {
            html: html.into(),
            chips,
            hidden_size: String::new(),
            hidden_color: String::new(),
            submit_enabled: false,
            viewer: None,
            thumbnails: descriptor.media().len(),
            active_thumbnail: None,
            autoplay_allowed: true,
            playing: false,
        }
    }

    /// Refuse video playback, like a browser with autoplay disabled.
    pub fn without_autoplay(mut self) -> Self {
        self.autoplay_allowed = false;
        self
    }

    /// The fragment markup as received.
    pub fn html(&self) -> &str {
        &self.html
    }

    /// Chips of one kind, in markup order.
    pub fn chips(&self, kind: OptionKind) -> impl Iterator<Item = &ChipState> {
        self.chips.iter().filter(move |c| c.kind == kind)
    }

    /// Value of the chip carrying the selected marker.
    pub fn selected_chip(&self, kind: OptionKind) -> Option<&str> {
        self.chips(kind)
            .find(|c| c.selected)
            .map(|c| c.value.as_str())
    }

    /// Current value of a hidden input.
    pub fn hidden_field(&self, kind: OptionKind) -> &str {
        match kind {
            OptionKind::Size => &self.hidden_size,
            OptionKind::Color => &self.hidden_color,
        }
    }

    pub fn submit_enabled(&self) -> bool {
        self.submit_enabled
    }

    /// What the viewer slot shows.
    pub fn viewer(&self) -> Option<&MediaElement> {
        self.viewer.as_ref()
    }

    pub fn active_thumbnail(&self) -> Option<usize> {
        self.active_thumbnail
    }

    /// True while an inserted video is playing.
    pub fn is_playing(&self) -> bool {
        self.playing
    }
}

impl ChipView for FragmentDocument {
    fn mark_chip(&mut self, kind: OptionKind, value: &str) {
        for chip in self.chips.iter_mut().filter(|c| c.kind == kind) {
            chip.selected = chip.value == value;
        }
    }

    fn set_hidden_field(&mut self, kind: OptionKind, value: &str) {
        match kind {
            OptionKind::Size => self.hidden_size = value.to_string(),
            OptionKind::Color => self.hidden_color = value.to_string(),
        }
    }

    fn set_submit_enabled(&mut self, enabled: bool) {
        self.submit_enabled = enabled;
    }
}

impl ViewerSlot for FragmentDocument {
    fn clear_viewer(&mut self) {
        self.viewer = None;
        self.playing = false;
    }

    fn insert_media(&mut self, element: MediaElement) {
        self.viewer = Some(element);
    }

    fn mark_thumbnail(&mut self, index: usize) {
        self.active_thumbnail = (index < self.thumbnails).then_some(index);
    }

    fn play_video(&mut self) -> Result<(), PlaybackBlocked> {
        if !self.autoplay_allowed {
            return Err(PlaybackBlocked);
        }
        self.playing = self.viewer.as_ref().map(|v| v.is_video()).unwrap_or(false);
        Ok(())
    }
}
