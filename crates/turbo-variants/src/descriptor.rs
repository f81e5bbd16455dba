//! Product descriptor: everything a rendered panel offers.

use crate::error::DescriptorError;
use crate::media::{colors_equal, MediaAsset};
use crate::option::{OptionKind, VariantOption};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The submit controls found in a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SubmitControl {
    /// An add-to-cart control is present.
    pub present: bool,
    /// A buy-now control is present.
    pub buy_now: bool,
}

/// Validated options and media for one product panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDescriptor {
    sizes: Vec<VariantOption>,
    colors: Vec<VariantOption>,
    media: Vec<MediaAsset>,
    initial_media: Option<usize>,
    submit: SubmitControl,
}

impl ProductDescriptor {
    /// Build a descriptor, checking option and media invariants.
    ///
    /// Options are routed by their own `kind`, so a color passed in `sizes`
    /// still lands with the colors.
    pub fn new(
        sizes: Vec<VariantOption>,
        colors: Vec<VariantOption>,
        media: Vec<MediaAsset>,
    ) -> Result<Self, DescriptorError> {
        let (sizes, colors): (Vec<_>, Vec<_>) = sizes
            .into_iter()
            .chain(colors)
            .partition(|o| o.kind == OptionKind::Size);

        validate_options(OptionKind::Size, &sizes)?;
        validate_options(OptionKind::Color, &colors)?;

        if let Some(index) = media.iter().position(|m| m.source_url.trim().is_empty()) {
            return Err(DescriptorError::EmptyMediaSource(index));
        }

        Ok(Self {
            sizes,
            colors,
            media,
            initial_media: None,
            submit: SubmitControl::default(),
        })
    }

    /// A product with no chips and no media.
    pub fn empty() -> Self {
        Self {
            sizes: Vec::new(),
            colors: Vec::new(),
            media: Vec::new(),
            initial_media: None,
            submit: SubmitControl::default(),
        }
    }

    /// Set the thumbnail the server marked active. Out-of-range indexes are ignored.
    pub fn with_initial_media(mut self, index: usize) -> Self {
        if index < self.media.len() {
            self.initial_media = Some(index);
        }
        self
    }

    pub fn with_submit(mut self, submit: SubmitControl) -> Self {
        self.submit = submit;
        self
    }

    /// Options of one kind, in markup order.
    pub fn options(&self, kind: OptionKind) -> &[VariantOption] {
        match kind {
            OptionKind::Size => &self.sizes,
            OptionKind::Color => &self.colors,
        }
    }

    pub fn sizes(&self) -> &[VariantOption] {
        &self.sizes
    }

    pub fn colors(&self) -> &[VariantOption] {
        &self.colors
    }

    pub fn media(&self) -> &[MediaAsset] {
        &self.media
    }

    pub fn initial_media(&self) -> Option<usize> {
        self.initial_media
    }

    pub fn submit(&self) -> SubmitControl {
        self.submit
    }

    /// Check if the product has any chips at all.
    pub fn has_variants(&self) -> bool {
        !self.sizes.is_empty() || !self.colors.is_empty()
    }

    /// Find an option by exact value.
    pub fn option(&self, kind: OptionKind, value: &str) -> Option<&VariantOption> {
        self.options(kind).iter().find(|o| o.value == value)
    }

    /// Find a color option by case-insensitive value.
    pub fn color_matching(&self, color: &str) -> Option<&VariantOption> {
        self.colors.iter().find(|o| colors_equal(&o.value, color))
    }

    /// The first chip of a kind the server rendered as selected.
    pub fn preselected(&self, kind: OptionKind) -> Option<&VariantOption> {
        self.options(kind)
            .iter()
            .find(|o| o.preselected && o.is_available)
    }

    /// Index of the first asset associated with `color`.
    pub fn media_index_for_color(&self, color: &str) -> Option<usize> {
        self.media.iter().position(|m| m.matches_color(color))
    }
}

fn validate_options(kind: OptionKind, options: &[VariantOption]) -> Result<(), DescriptorError> {
    let mut seen = HashSet::new();
    for option in options {
        if option.value.trim().is_empty() {
            return Err(DescriptorError::EmptyOptionValue(kind));
        }
        if !seen.insert(option.value.as_str()) {
            return Err(DescriptorError::DuplicateOption {
                kind,
                value: option.value.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_duplicate_option() {
        let result = ProductDescriptor::new(
            vec![VariantOption::size("M"), VariantOption::size("M")],
            vec![],
            vec![],
        );
        assert_eq!(
            result.unwrap_err(),
            DescriptorError::DuplicateOption {
                kind: OptionKind::Size,
                value: "M".to_string()
            }
        );
    }

    #[test]
    fn test_same_value_across_kinds_is_fine() {
        let descriptor = ProductDescriptor::new(
            vec![VariantOption::size("One")],
            vec![VariantOption::color("One")],
            vec![],
        )
        .unwrap();
        assert_eq!(descriptor.sizes().len(), 1);
        assert_eq!(descriptor.colors().len(), 1);
    }

    #[test]
    fn test_rejects_empty_values() {
        let result = ProductDescriptor::new(vec![], vec![VariantOption::color("  ")], vec![]);
        assert_eq!(
            result.unwrap_err(),
            DescriptorError::EmptyOptionValue(OptionKind::Color)
        );

        let result = ProductDescriptor::new(
            vec![],
            vec![],
            vec![MediaAsset::image("/a.jpg"), MediaAsset::image("")],
        );
        assert_eq!(result.unwrap_err(), DescriptorError::EmptyMediaSource(1));
    }

    #[test]
    fn test_options_routed_by_kind() {
        let descriptor =
            ProductDescriptor::new(vec![VariantOption::color("Red")], vec![], vec![]).unwrap();
        assert!(descriptor.sizes().is_empty());
        assert_eq!(descriptor.colors()[0].value, "Red");
    }

    #[test]
    fn test_lookups() {
        let descriptor = ProductDescriptor::new(
            vec![VariantOption::size("S"), VariantOption::size("M").preselected()],
            vec![VariantOption::color("Navy Blue")],
            vec![
                MediaAsset::image("/front.jpg"),
                MediaAsset::image("/navy.jpg").with_color("navy blue"),
            ],
        )
        .unwrap()
        .with_initial_media(0)
        .with_initial_media(7);

        assert_eq!(descriptor.initial_media(), Some(0));
        assert_eq!(descriptor.preselected(OptionKind::Size).unwrap().value, "M");
        assert!(descriptor.preselected(OptionKind::Color).is_none());
        assert_eq!(descriptor.color_matching("NAVY BLUE").unwrap().value, "Navy Blue");
        assert_eq!(descriptor.media_index_for_color("Navy Blue"), Some(1));
        assert!(descriptor.option(OptionKind::Size, "m").is_none());
        assert!(descriptor.has_variants());
        assert!(!ProductDescriptor::empty().has_variants());
    }
}
