//! Add-to-cart submission payload.

use serde::{Deserialize, Serialize};

/// The completed selection, as posted to the cart endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    /// Quantity to add (at least 1).
    pub quantity: u32,
    /// Selected size, or empty when the product has no sizes.
    pub size: String,
    /// Selected color, or empty when the product has no colors.
    pub color: String,
    /// Active media URL, or empty when the product has no media.
    #[serde(rename = "mediaUrl")]
    pub media_url: String,
}
