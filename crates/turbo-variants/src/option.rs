//! Variant option chips.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The dimension a chip selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    Size,
    Color,
}

impl OptionKind {
    /// Both kinds, in submission order.
    pub const ALL: [OptionKind; 2] = [OptionKind::Size, OptionKind::Color];

    pub fn as_str(&self) -> &'static str {
        match self {
            OptionKind::Size => "size",
            OptionKind::Color => "color",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            OptionKind::Size => "Size",
            OptionKind::Color => "Color",
        }
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One selectable chip (e.g., Size: M).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantOption {
    /// Which dimension this chip belongs to.
    pub kind: OptionKind,
    /// Chip value, unique within its kind.
    pub value: String,
    /// Whether the chip can be selected.
    pub is_available: bool,
    /// Whether the server rendered this chip as already selected.
    pub preselected: bool,
}

impl VariantOption {
    pub fn new(kind: OptionKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
            is_available: true,
            preselected: false,
        }
    }

    /// Create an available size chip.
    pub fn size(value: impl Into<String>) -> Self {
        Self::new(OptionKind::Size, value)
    }

    /// Create an available color chip.
    pub fn color(value: impl Into<String>) -> Self {
        Self::new(OptionKind::Color, value)
    }

    /// Mark the chip as unavailable (out of stock).
    pub fn unavailable(mut self) -> Self {
        self.is_available = false;
        self
    }

    /// Mark the chip as selected by the server.
    pub fn preselected(mut self) -> Self {
        self.preselected = true;
        self
    }
}
