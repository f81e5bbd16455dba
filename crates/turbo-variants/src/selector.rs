//! Variant selection state machine.
//!
//! One [`VariantSelector`] exists per open product panel. It owns the panel's
//! [`SelectionState`], mirrors every change into the page through the panel's
//! view, and derives a single gate, [`VariantSelector::can_submit`].
//!
//! Color chips and thumbnails drive each other: picking a color shows its
//! thumbnail, picking a thumbnail selects its color. Every selection carries a
//! [`SelectionSource`] so a color chosen *because of* a thumbnail never goes
//! back and re-picks a thumbnail.

use crate::descriptor::ProductDescriptor;
use crate::error::SelectionError;
use crate::media::{colors_equal, MediaViewer, ViewerSlot};
use crate::option::OptionKind;
use crate::payload::SubmissionPayload;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Page capability: chips, hidden form fields and the submit control.
pub trait ChipView {
    /// Mark one chip selected, clearing every other chip of the same kind.
    fn mark_chip(&mut self, kind: OptionKind, value: &str);

    /// Write the hidden form field for a kind.
    fn set_hidden_field(&mut self, kind: OptionKind, value: &str);

    /// Enable or disable the submit control(s).
    fn set_submit_enabled(&mut self, enabled: bool);
}

/// Everything a selector needs from a rendered panel.
pub trait FragmentView: ChipView + ViewerSlot {}

impl<T: ChipView + ViewerSlot + ?Sized> FragmentView for T {}

/// Current selection for one open panel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    pub selected_size: Option<String>,
    pub selected_color: Option<String>,
    pub selected_media_url: Option<String>,
}

impl SelectionState {
    /// Selected value for a kind.
    pub fn get(&self, kind: OptionKind) -> Option<&str> {
        match kind {
            OptionKind::Size => self.selected_size.as_deref(),
            OptionKind::Color => self.selected_color.as_deref(),
        }
    }

    fn set(&mut self, kind: OptionKind, value: String) {
        match kind {
            OptionKind::Size => self.selected_size = Some(value),
            OptionKind::Color => self.selected_color = Some(value),
        }
    }
}

/// Selector lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelectorPhase {
    /// No fragment bound yet (loading, or load failed).
    Unbound,
    /// Bound, at least one required kind still unselected.
    Incomplete,
    /// Bound and submittable.
    Complete,
}

impl SelectorPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectorPhase::Unbound => "unbound",
            SelectorPhase::Incomplete => "incomplete",
            SelectorPhase::Complete => "complete",
        }
    }
}

/// What triggered a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionSource {
    /// The user clicked a chip.
    Chip,
    /// Derived from a thumbnail's associated color.
    Thumbnail,
}

/// Result of a selection event.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectOutcome {
    /// State or active media changed.
    Changed,
    /// Valid event that changed nothing (reselection).
    Unchanged,
    /// Invalid event, ignored.
    Rejected(SelectionError),
}

impl SelectOutcome {
    pub fn is_changed(&self) -> bool {
        matches!(self, SelectOutcome::Changed)
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, SelectOutcome::Rejected(_))
    }
}

/// Selection state machine bound to one rendered panel.
#[derive(Debug)]
pub struct VariantSelector<V> {
    descriptor: ProductDescriptor,
    state: SelectionState,
    quantity: u32,
    viewer: MediaViewer,
    view: V,
}

impl<V: FragmentView> VariantSelector<V> {
    /// Bind to a rendered panel.
    ///
    /// Seeds the state from server-preselected chips, shows the initial media
    /// (preselected color's thumbnail, then the marked-active thumbnail, then the
    /// first one) and sets the submit control.
    pub fn bind(descriptor: ProductDescriptor, view: V) -> Self {
        let mut selector = Self {
            descriptor,
            state: SelectionState::default(),
            quantity: 1,
            viewer: MediaViewer::new(),
            view,
        };

        for kind in OptionKind::ALL {
            let seeded = selector
                .descriptor
                .preselected(kind)
                .map(|o| o.value.clone());
            if let Some(value) = seeded {
                selector.apply_value(kind, value);
            }
        }

        let initial = selector
            .state
            .selected_color
            .as_deref()
            .and_then(|color| selector.descriptor.media_index_for_color(color))
            .or(selector.descriptor.initial_media())
            .or_else(|| (!selector.descriptor.media().is_empty()).then_some(0));
        if let Some(index) = initial {
            selector.activate_media(index);
        }

        selector.sync_submit_control();

        debug!(
            sizes = selector.descriptor.sizes().len(),
            colors = selector.descriptor.colors().len(),
            media = selector.descriptor.media().len(),
            phase = selector.phase().as_str(),
            "variant selector bound"
        );

        selector
    }

    /// Select a size chip.
    pub fn select_size(&mut self, value: &str) -> SelectOutcome {
        self.select_option(OptionKind::Size, value, SelectionSource::Chip)
    }

    /// Select a color chip and show its thumbnail, if it has one.
    pub fn select_color(&mut self, value: &str) -> SelectOutcome {
        self.select_option(OptionKind::Color, value, SelectionSource::Chip)
    }

    /// Select a chip of either kind.
    pub fn select(&mut self, kind: OptionKind, value: &str) -> SelectOutcome {
        self.select_option(kind, value, SelectionSource::Chip)
    }

    /// Show a thumbnail; its associated color (if any) becomes the selected color.
    pub fn select_thumbnail(&mut self, index: usize) -> SelectOutcome {
        let associated = match self.descriptor.media().get(index) {
            Some(asset) => asset.associated_color.clone(),
            None => return reject(SelectionError::UnknownThumbnail(index)),
        };

        let media_changed = self.viewer.active() != Some(index);
        if media_changed {
            self.activate_media(index);
        }

        let color_changed = match associated {
            Some(color) if !self.color_is_selected(&color) => {
                self.select_color_for_thumbnail(&color)
            }
            _ => false,
        };

        if media_changed || color_changed {
            SelectOutcome::Changed
        } else {
            SelectOutcome::Unchanged
        }
    }

    /// Set the quantity to submit. Values below 1 are raised to 1.
    pub fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity.max(1);
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// True iff every kind the product offers has a selection.
    pub fn can_submit(&self) -> bool {
        OptionKind::ALL.iter().all(|kind| self.is_satisfied(*kind))
    }

    /// Kinds that still need a selection.
    pub fn missing(&self) -> Vec<OptionKind> {
        OptionKind::ALL
            .into_iter()
            .filter(|kind| !self.is_satisfied(*kind))
            .collect()
    }

    pub fn phase(&self) -> SelectorPhase {
        if self.can_submit() {
            SelectorPhase::Complete
        } else {
            SelectorPhase::Incomplete
        }
    }

    /// Build the add-to-cart payload.
    pub fn build_submission_payload(&self) -> Result<SubmissionPayload, SelectionError> {
        let missing = self.missing();
        if !missing.is_empty() {
            return Err(SelectionError::IncompleteSelection(missing));
        }

        Ok(SubmissionPayload {
            quantity: self.quantity,
            size: self.state.selected_size.clone().unwrap_or_default(),
            color: self.state.selected_color.clone().unwrap_or_default(),
            media_url: self.state.selected_media_url.clone().unwrap_or_default(),
        })
    }

    /// Set the submit control to match `can_submit`.
    pub fn sync_submit_control(&mut self) {
        let enabled = self.can_submit();
        self.view.set_submit_enabled(enabled);
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn descriptor(&self) -> &ProductDescriptor {
        &self.descriptor
    }

    /// Index of the thumbnail currently shown.
    pub fn active_media(&self) -> Option<usize> {
        self.viewer.active()
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    fn is_satisfied(&self, kind: OptionKind) -> bool {
        self.descriptor.options(kind).is_empty() || self.state.get(kind).is_some()
    }

    fn select_option(
        &mut self,
        kind: OptionKind,
        value: &str,
        source: SelectionSource,
    ) -> SelectOutcome {
        let available = match self.descriptor.option(kind, value) {
            Some(option) => option.is_available,
            None => {
                return reject(SelectionError::UnknownOption {
                    kind,
                    value: value.to_string(),
                })
            }
        };
        if !available {
            return reject(SelectionError::UnavailableOption {
                kind,
                value: value.to_string(),
            });
        }

        if self.state.get(kind) == Some(value) {
            return SelectOutcome::Unchanged;
        }

        let before = self.phase();
        self.apply_value(kind, value.to_string());

        // Thumbnail-driven colors must not drive the thumbnail again.
        if kind == OptionKind::Color && source == SelectionSource::Chip {
            self.show_media_for_color(value);
        }

        self.sync_submit_control();

        let after = self.phase();
        if before != after {
            debug!(from = before.as_str(), to = after.as_str(), "selector phase changed");
        }

        SelectOutcome::Changed
    }

    fn select_color_for_thumbnail(&mut self, color: &str) -> bool {
        let value = match self.descriptor.color_matching(color) {
            Some(option) if option.is_available => option.value.clone(),
            Some(option) => {
                debug!(color = %option.value, "thumbnail color is unavailable");
                return false;
            }
            None => {
                debug!(color, "thumbnail color has no chip");
                return false;
            }
        };

        self.select_option(OptionKind::Color, &value, SelectionSource::Thumbnail)
            .is_changed()
    }

    fn show_media_for_color(&mut self, color: &str) {
        match self.descriptor.media_index_for_color(color) {
            Some(index) if self.viewer.active() != Some(index) => self.activate_media(index),
            Some(_) => {}
            None => debug!(color, "no thumbnail for color"),
        }
    }

    fn color_is_selected(&self, color: &str) -> bool {
        self.state
            .selected_color
            .as_deref()
            .map(|selected| colors_equal(selected, color))
            .unwrap_or(false)
    }

    fn apply_value(&mut self, kind: OptionKind, value: String) {
        self.view.mark_chip(kind, &value);
        self.view.set_hidden_field(kind, &value);
        self.state.set(kind, value);
    }

    fn activate_media(&mut self, index: usize) {
        let Some(asset) = self.descriptor.media().get(index) else {
            return;
        };
        self.viewer.set_active_media(&mut self.view, index, asset);
        self.state.selected_media_url = Some(asset.source_url.clone());
    }
}

fn reject(error: SelectionError) -> SelectOutcome {
    warn!(error = %error, "selection ignored");
    SelectOutcome::Rejected(error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::{MediaAsset, MediaElement, PlaybackBlocked};
    use crate::option::VariantOption;

    /// Records everything the selector does to the page.
    #[derive(Debug, Default)]
    struct RecordingView {
        chip_marks: Vec<(OptionKind, String)>,
        hidden_size: String,
        hidden_color: String,
        submit_enabled: Option<bool>,
        viewer: Option<MediaElement>,
        thumbnail_marks: Vec<usize>,
    }

    impl RecordingView {
        fn color_marks(&self) -> Vec<&str> {
            self.chip_marks
                .iter()
                .filter(|(k, _)| *k == OptionKind::Color)
                .map(|(_, v)| v.as_str())
                .collect()
        }
    }

    impl ChipView for RecordingView {
        fn mark_chip(&mut self, kind: OptionKind, value: &str) {
            self.chip_marks.push((kind, value.to_string()));
        }

        fn set_hidden_field(&mut self, kind: OptionKind, value: &str) {
            match kind {
                OptionKind::Size => self.hidden_size = value.to_string(),
                OptionKind::Color => self.hidden_color = value.to_string(),
            }
        }

        fn set_submit_enabled(&mut self, enabled: bool) {
            self.submit_enabled = Some(enabled);
        }
    }

    impl ViewerSlot for RecordingView {
        fn clear_viewer(&mut self) {
            self.viewer = None;
        }

        fn insert_media(&mut self, element: MediaElement) {
            self.viewer = Some(element);
        }

        fn mark_thumbnail(&mut self, index: usize) {
            self.thumbnail_marks.push(index);
        }

        fn play_video(&mut self) -> Result<(), PlaybackBlocked> {
            Ok(())
        }
    }

    fn apparel() -> ProductDescriptor {
        ProductDescriptor::new(
            vec![
                VariantOption::size("S"),
                VariantOption::size("M"),
                VariantOption::size("L"),
            ],
            vec![VariantOption::color("Red"), VariantOption::color("Blue")],
            vec![
                MediaAsset::image("/front.jpg"),
                MediaAsset::image("/red.jpg").with_color("red"),
                MediaAsset::video("/blue.mp4").with_color("Blue"),
            ],
        )
        .unwrap()
    }

    fn bind(descriptor: ProductDescriptor) -> VariantSelector<RecordingView> {
        VariantSelector::bind(descriptor, RecordingView::default())
    }

    #[test]
    fn test_sizes_and_colors_scenario() {
        let mut selector = bind(apparel());
        assert!(!selector.can_submit());
        assert_eq!(selector.phase(), SelectorPhase::Incomplete);
        assert_eq!(selector.view().submit_enabled, Some(false));

        assert!(selector.select_size("M").is_changed());
        assert!(!selector.can_submit());

        assert!(selector.select_color("Red").is_changed());
        assert!(selector.can_submit());
        assert_eq!(selector.view().submit_enabled, Some(true));

        let payload = selector.build_submission_payload().unwrap();
        assert_eq!(payload.size, "M");
        assert_eq!(payload.color, "Red");
        assert_eq!(payload.media_url, "/red.jpg");
        assert_eq!(payload.quantity, 1);
    }

    #[test]
    fn test_no_variants_submittable_on_bind() {
        let descriptor =
            ProductDescriptor::new(vec![], vec![], vec![MediaAsset::image("/only.jpg")]).unwrap();
        let selector = bind(descriptor);

        assert!(selector.can_submit());
        assert_eq!(selector.phase(), SelectorPhase::Complete);
        assert_eq!(selector.view().submit_enabled, Some(true));

        let payload = selector.build_submission_payload().unwrap();
        assert_eq!(payload.size, "");
        assert_eq!(payload.color, "");
        assert_eq!(payload.media_url, "/only.jpg");
    }

    #[test]
    fn test_no_variants_no_media_payload_is_empty() {
        let selector = bind(ProductDescriptor::empty());
        let payload = selector.build_submission_payload().unwrap();
        assert_eq!(payload.media_url, "");
        assert!(selector.view().viewer.is_none());
    }

    #[test]
    fn test_completion_is_monotonic() {
        let mut selector = bind(apparel());
        let _ = selector.select_size("S");
        let _ = selector.select_color("Blue");
        assert!(selector.can_submit());

        for (kind, value) in [
            (OptionKind::Size, "L"),
            (OptionKind::Color, "Red"),
            (OptionKind::Size, "L"),
            (OptionKind::Color, "Nope"),
            (OptionKind::Size, "XXL"),
        ] {
            let _ = selector.select(kind, value);
            assert!(selector.can_submit(), "lost completion after {} {}", kind, value);
        }
        let _ = selector.select_thumbnail(0);
        let _ = selector.select_thumbnail(99);
        assert!(selector.can_submit());
    }

    #[test]
    fn test_single_dimension_products() {
        let colors_only = ProductDescriptor::new(
            vec![],
            vec![VariantOption::color("Red")],
            vec![],
        )
        .unwrap();
        let mut selector = bind(colors_only);
        assert!(!selector.can_submit());
        assert_eq!(selector.missing(), vec![OptionKind::Color]);
        let _ = selector.select_color("Red");
        assert!(selector.can_submit());

        let sizes_only =
            ProductDescriptor::new(vec![VariantOption::size("M")], vec![], vec![]).unwrap();
        let mut selector = bind(sizes_only);
        assert!(!selector.can_submit());
        let _ = selector.select_size("M");
        assert!(selector.can_submit());
    }

    #[test]
    fn test_thumbnail_selects_color_without_oscillation() {
        let descriptor = ProductDescriptor::new(
            vec![],
            vec![VariantOption::color("red"), VariantOption::color("blue")],
            vec![
                MediaAsset::image("/front.jpg"),
                MediaAsset::image("/red.jpg").with_color("red"),
                MediaAsset::image("/red-back.jpg").with_color("red"),
                MediaAsset::image("/blue.jpg").with_color("blue"),
            ],
        )
        .unwrap();
        let mut selector = bind(descriptor);
        assert_eq!(selector.view().thumbnail_marks, vec![0]);

        // The second red thumbnail: the derived color must not jump to the first.
        assert!(selector.select_thumbnail(2).is_changed());

        assert_eq!(selector.state().selected_color.as_deref(), Some("red"));
        assert_eq!(selector.view().color_marks(), vec!["red"]);
        assert_eq!(selector.view().thumbnail_marks, vec![0, 2]);
        assert_eq!(selector.active_media(), Some(2));
        assert_eq!(
            selector.state().selected_media_url.as_deref(),
            Some("/red-back.jpg")
        );
        assert_eq!(selector.view().hidden_color, "red");
    }

    #[test]
    fn test_thumbnail_with_selected_color_keeps_color() {
        let mut selector = bind(apparel());
        let _ = selector.select_color("Red");
        let marks_before = selector.view().color_marks().len();

        // "red" on the asset, "Red" on the chip.
        assert_eq!(selector.select_thumbnail(1), SelectOutcome::Unchanged);
        assert_eq!(selector.view().color_marks().len(), marks_before);
    }

    #[test]
    fn test_color_drives_thumbnail() {
        let mut selector = bind(apparel());
        assert_eq!(
            selector.state().selected_media_url.as_deref(),
            Some("/front.jpg")
        );

        let _ = selector.select_color("Blue");
        assert_eq!(
            selector.state().selected_media_url.as_deref(),
            Some("/blue.mp4")
        );
        assert_eq!(selector.active_media(), Some(2));
        assert!(selector.view().viewer.as_ref().unwrap().is_video());
    }

    #[test]
    fn test_color_without_thumbnail_keeps_media() {
        let descriptor = ProductDescriptor::new(
            vec![],
            vec![VariantOption::color("Red"), VariantOption::color("Green")],
            vec![
                MediaAsset::image("/front.jpg"),
                MediaAsset::image("/red.jpg").with_color("red"),
            ],
        )
        .unwrap();
        let mut selector = bind(descriptor);
        let _ = selector.select_color("Red");
        assert_eq!(
            selector.state().selected_media_url.as_deref(),
            Some("/red.jpg")
        );

        assert!(selector.select_color("Green").is_changed());
        assert_eq!(
            selector.state().selected_media_url.as_deref(),
            Some("/red.jpg")
        );
    }

    #[test]
    fn test_payload_rejected_for_partial_states() {
        let selector = bind(apparel());
        assert_eq!(
            selector.build_submission_payload().unwrap_err(),
            SelectionError::IncompleteSelection(vec![OptionKind::Size, OptionKind::Color])
        );

        let mut selector = bind(apparel());
        let _ = selector.select_size("L");
        assert_eq!(
            selector.build_submission_payload().unwrap_err(),
            SelectionError::IncompleteSelection(vec![OptionKind::Color])
        );

        let mut selector = bind(apparel());
        let _ = selector.select_color("Blue");
        assert_eq!(
            selector.build_submission_payload().unwrap_err(),
            SelectionError::IncompleteSelection(vec![OptionKind::Size])
        );
    }

    #[test]
    fn test_invalid_selections_are_no_ops() {
        let descriptor = ProductDescriptor::new(
            vec![VariantOption::size("S"), VariantOption::size("XL").unavailable()],
            vec![],
            vec![],
        )
        .unwrap();
        let mut selector = bind(descriptor);

        assert_eq!(
            selector.select_size("M"),
            SelectOutcome::Rejected(SelectionError::UnknownOption {
                kind: OptionKind::Size,
                value: "M".to_string()
            })
        );
        assert!(selector.select_size("XL").is_rejected());
        assert!(selector.select_thumbnail(0).is_rejected());
        assert!(selector.state().selected_size.is_none());
        assert!(selector.view().chip_marks.is_empty());
    }

    #[test]
    fn test_reselection_is_unchanged() {
        let mut selector = bind(apparel());
        let _ = selector.select_size("M");
        let marks = selector.view().chip_marks.len();

        assert_eq!(selector.select_size("M"), SelectOutcome::Unchanged);
        assert_eq!(selector.view().chip_marks.len(), marks);
    }

    #[test]
    fn test_preselection_seeds_state() {
        let descriptor = ProductDescriptor::new(
            vec![VariantOption::size("S"), VariantOption::size("M").preselected()],
            vec![VariantOption::color("Red"), VariantOption::color("Blue").preselected()],
            vec![
                MediaAsset::image("/front.jpg"),
                MediaAsset::image("/blue.jpg").with_color("blue"),
            ],
        )
        .unwrap()
        .with_initial_media(0);
        let selector = bind(descriptor);

        assert!(selector.can_submit());
        assert_eq!(selector.state().selected_size.as_deref(), Some("M"));
        assert_eq!(selector.view().hidden_size, "M");
        assert_eq!(selector.view().hidden_color, "Blue");
        // Preselected color wins over the marked-active thumbnail.
        assert_eq!(selector.active_media(), Some(1));
    }

    #[test]
    fn test_marked_thumbnail_is_initial_media() {
        let descriptor = apparel().with_initial_media(2);
        let selector = bind(descriptor);
        assert_eq!(selector.active_media(), Some(2));
        assert_eq!(
            selector.state().selected_media_url.as_deref(),
            Some("/blue.mp4")
        );
        assert!(selector.state().selected_color.is_none());
    }

    #[test]
    fn test_quantity_is_at_least_one() {
        let mut selector = bind(ProductDescriptor::empty());
        selector.set_quantity(0);
        assert_eq!(selector.quantity(), 1);
        selector.set_quantity(3);
        assert_eq!(selector.build_submission_payload().unwrap().quantity, 3);
    }
}
