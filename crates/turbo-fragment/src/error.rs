//! Fragment adapter errors.

use thiserror::Error;
use turbo_variants::DescriptorError;

/// Errors raised while turning fragment markup into a descriptor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FragmentError {
    /// The markup could not be tokenized.
    #[error("Unreadable fragment markup: {0}")]
    Markup(String),

    /// The markup parsed but describes an invalid product.
    #[error("Invalid product fragment: {0}")]
    Descriptor(#[from] DescriptorError),
}

impl From<quick_xml::Error> for FragmentError {
    fn from(e: quick_xml::Error) -> Self {
        FragmentError::Markup(e.to_string())
    }
}
