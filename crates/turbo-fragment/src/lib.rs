//! Server-rendered product fragments for TurboCommerce panels.
//!
//! The quick-view and cart-modal panels are filled with HTML rendered by the
//! server. This crate reads that markup once into a
//! [`ProductDescriptor`](turbo_variants::ProductDescriptor) and provides an
//! in-memory [`FragmentDocument`] the variant selector can drive.
//!
//! Which classes and attributes mark chips, thumbnails and controls is
//! described by [`FragmentMarkup`], so a storefront with different templates
//! only changes configuration.

mod document;
mod error;
mod markup;
mod parse;

pub use document::{ChipState, FragmentDocument};
pub use error::FragmentError;
pub use markup::FragmentMarkup;
pub use parse::parse_fragment;
