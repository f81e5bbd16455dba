//! Selection and descriptor error types.

use crate::option::OptionKind;
use thiserror::Error;

/// Errors raised by selection events and payload construction.
///
/// Selection events never abort the caller: the selector logs the error and
/// returns it inside [`crate::SelectOutcome::Rejected`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    /// The value is not one of the panel's options.
    #[error("Unknown {kind} option: {value}")]
    UnknownOption { kind: OptionKind, value: String },

    /// The option exists but is marked unavailable.
    #[error("Unavailable {kind} option: {value}")]
    UnavailableOption { kind: OptionKind, value: String },

    /// Thumbnail index out of range.
    #[error("Unknown thumbnail: {0}")]
    UnknownThumbnail(usize),

    /// Submission attempted before every required chip was chosen.
    #[error("Incomplete selection: missing {}", format_kinds(.0))]
    IncompleteSelection(Vec<OptionKind>),
}

/// Errors raised while assembling a product descriptor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    /// An option with an empty value.
    #[error("Empty {0} option value")]
    EmptyOptionValue(OptionKind),

    /// Two options of the same kind share a value.
    #[error("Duplicate {kind} option: {value}")]
    DuplicateOption { kind: OptionKind, value: String },

    /// A media asset without a source URL.
    #[error("Media asset {0} has no source URL")]
    EmptyMediaSource(usize),
}

fn format_kinds(kinds: &[OptionKind]) -> String {
    kinds
        .iter()
        .map(|k| k.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
