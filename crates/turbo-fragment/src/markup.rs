//! Class and attribute names the adapter looks for.

use serde::{Deserialize, Serialize};

/// Where each piece of a product fragment lives in the markup.
///
/// One description per storefront; the adapter never guesses between
/// alternative names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FragmentMarkup {
    /// Class on each gallery thumbnail.
    pub thumbnail_class: String,
    /// Class on the thumbnail currently shown.
    pub active_class: String,
    /// Thumbnail attribute holding `image` or `video`.
    pub media_type_attr: String,
    /// Thumbnail attribute holding the full-size media URL.
    pub media_src_attr: String,
    /// Thumbnail attribute holding a video poster URL.
    pub media_poster_attr: String,
    /// Thumbnail attribute naming the color it illustrates.
    pub media_color_attr: String,

    pub size_chip_class: String,
    pub color_chip_class: String,
    /// Chip attribute holding its value. Falls back to `value`, then the chip text.
    pub chip_value_attr: String,
    /// Class on server-selected chips.
    pub selected_class: String,
    /// Class on out-of-stock chips.
    pub unavailable_class: String,
    /// Chip attribute that is `"false"` on out-of-stock chips.
    pub available_attr: String,

    /// `name` of the hidden size input.
    pub hidden_size_name: String,
    /// `name` of the hidden color input.
    pub hidden_color_name: String,

    /// `id` of the viewer slot.
    pub viewer_id: String,
    /// Class on the add-to-cart control.
    pub submit_class: String,
    /// Class on the buy-now control.
    pub buy_now_class: String,
}

impl Default for FragmentMarkup {
    fn default() -> Self {
        Self {
            thumbnail_class: "thumbnail".to_string(),
            active_class: "is-active".to_string(),
            media_type_attr: "data-type".to_string(),
            media_src_attr: "data-src".to_string(),
            media_poster_attr: "data-poster".to_string(),
            media_color_attr: "data-color".to_string(),
            size_chip_class: "size-chip".to_string(),
            color_chip_class: "color-chip".to_string(),
            chip_value_attr: "data-value".to_string(),
            selected_class: "is-selected".to_string(),
            unavailable_class: "is-unavailable".to_string(),
            available_attr: "data-available".to_string(),
            hidden_size_name: "selected_size".to_string(),
            hidden_color_name: "selected_color".to_string(),
            viewer_id: "media-viewer".to_string(),
            submit_class: "add-to-cart".to_string(),
            buy_now_class: "buy-now".to_string(),
        }
    }
}
