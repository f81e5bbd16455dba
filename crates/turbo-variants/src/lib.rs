//! Variant selection for TurboCommerce product panels.
//!
//! A product panel (quick view or cart modal) shows size chips, color chips and
//! a gallery of thumbnails. This crate keeps those three in sync and decides
//! when the panel may be submitted:
//!
//! - **Options**: size and color chips, with availability and preselection
//! - **Media**: gallery assets and the single-slot media viewer
//! - **Descriptor**: everything a panel offers, validated once at bind time
//! - **Selector**: the selection state machine and its submission payload
//!
//! The selector never touches markup directly. It talks to the page through the
//! [`ChipView`] and [`ViewerSlot`] capability traits, so the same state machine
//! runs behind a browser shim, a headless recorder or a terminal driver.
//!
//! # Example
//!
//! ```rust,ignore
//! use turbo_variants::prelude::*;
//!
//! let descriptor = ProductDescriptor::new(
//!     vec![VariantOption::size("S"), VariantOption::size("M")],
//!     vec![VariantOption::color("Red")],
//!     vec![MediaAsset::image("/media/red.jpg").with_color("red")],
//! )?;
//!
//! let mut selector = VariantSelector::bind(descriptor, view);
//! assert!(!selector.can_submit());
//!
//! selector.select_size("M");
//! selector.select_color("Red");
//! let payload = selector.build_submission_payload()?;
//! ```

pub mod descriptor;
pub mod error;
pub mod ids;
pub mod media;
pub mod option;
pub mod payload;
pub mod selector;

pub use descriptor::{ProductDescriptor, SubmitControl};
pub use error::{DescriptorError, SelectionError};
pub use ids::*;
pub use media::{MediaAsset, MediaElement, MediaKind, MediaViewer, PlaybackBlocked, ViewerSlot};
pub use option::{OptionKind, VariantOption};
pub use payload::SubmissionPayload;
pub use selector::{
    ChipView, FragmentView, SelectOutcome, SelectionSource, SelectionState, SelectorPhase,
    VariantSelector,
};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::descriptor::{ProductDescriptor, SubmitControl};
    pub use crate::error::{DescriptorError, SelectionError};
    pub use crate::ids::*;
    pub use crate::media::{MediaAsset, MediaElement, MediaKind, MediaViewer, ViewerSlot};
    pub use crate::option::{OptionKind, VariantOption};
    pub use crate::payload::SubmissionPayload;
    pub use crate::selector::{
        ChipView, FragmentView, SelectOutcome, SelectionSource, SelectionState, SelectorPhase,
        VariantSelector,
    };
}
