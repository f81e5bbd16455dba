//! Banner and featured-product sliders.
//!
//! The slider itself is a page library; this module only decides which
//! sliders to mount and with which options. Options serialize to the
//! library's camelCase JSON.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Where the sliders live in the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarouselConfig {
    /// Mount sliders at all.
    pub enabled: bool,
    /// Selector of the hero banner slider.
    pub banner_selector: String,
    /// Selector of the featured products slider.
    pub featured_selector: String,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            banner_selector: ".banner-carousel".to_string(),
            featured_selector: ".featured-carousel".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Autoplay {
    /// Milliseconds between slides.
    pub delay: u64,
    pub disable_on_interaction: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pagination {
    pub el: String,
    pub clickable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Navigation {
    pub next_el: String,
    pub prev_el: String,
}

impl Default for Navigation {
    fn default() -> Self {
        Self {
            next_el: ".carousel-button-next".to_string(),
            prev_el: ".carousel-button-prev".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Breakpoint {
    pub slides_per_view: f64,
}

/// Slider options.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarouselOptions {
    #[serde(rename = "loop", skip_serializing_if = "std::ops::Not::not")]
    pub looped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slides_per_view: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space_between: Option<u32>,
    /// Minimum viewport width ⇒ overrides.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub breakpoints: BTreeMap<u32, Breakpoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autoplay: Option<Autoplay>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub navigation: Option<Navigation>,
}

/// The two sliders a storefront page carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CarouselPreset {
    /// Full-width hero banner.
    Banner,
    /// Featured products strip.
    Featured,
}

impl CarouselPreset {
    pub const ALL: [CarouselPreset; 2] = [CarouselPreset::Banner, CarouselPreset::Featured];

    pub fn as_str(&self) -> &'static str {
        match self {
            CarouselPreset::Banner => "banner",
            CarouselPreset::Featured => "featured",
        }
    }

    pub fn selector<'a>(&self, config: &'a CarouselConfig) -> &'a str {
        match self {
            CarouselPreset::Banner => &config.banner_selector,
            CarouselPreset::Featured => &config.featured_selector,
        }
    }

    pub fn options(&self) -> CarouselOptions {
        match self {
            CarouselPreset::Banner => CarouselOptions {
                looped: true,
                autoplay: Some(Autoplay {
                    delay: 5000,
                    disable_on_interaction: false,
                }),
                pagination: Some(Pagination {
                    el: ".carousel-pagination".to_string(),
                    clickable: true,
                }),
                navigation: Some(Navigation::default()),
                ..CarouselOptions::default()
            },
            CarouselPreset::Featured => CarouselOptions {
                slides_per_view: Some(1.2),
                space_between: Some(15),
                breakpoints: BTreeMap::from([
                    (768, Breakpoint { slides_per_view: 3.0 }),
                    (1200, Breakpoint { slides_per_view: 5.0 }),
                ]),
                autoplay: Some(Autoplay {
                    delay: 4000,
                    disable_on_interaction: false,
                }),
                navigation: Some(Navigation::default()),
                ..CarouselOptions::default()
            },
        }
    }
}

/// Page capability: the slider library and the elements it binds to.
pub trait CarouselHost {
    /// Whether the slider library is loaded.
    fn library_available(&self) -> bool;

    fn element_exists(&self, selector: &str) -> bool;

    fn mount(&mut self, selector: &str, options: &CarouselOptions);
}

/// Mount every configured slider whose element exists. Returns the presets mounted.
pub fn mount_carousels<H: CarouselHost + ?Sized>(
    host: &mut H,
    config: &CarouselConfig,
) -> Vec<CarouselPreset> {
    if !config.enabled {
        return Vec::new();
    }
    if !host.library_available() {
        warn!("slider library not loaded, carousels skipped");
        return Vec::new();
    }

    let mut mounted = Vec::new();
    for preset in CarouselPreset::ALL {
        let selector = preset.selector(config);
        if !host.element_exists(selector) {
            debug!(carousel = preset.as_str(), selector, "no element, carousel skipped");
            continue;
        }
        host.mount(selector, &preset.options());
        mounted.push(preset);
    }

    debug!(count = mounted.len(), "carousels mounted");
    mounted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Page {
        library: bool,
        elements: Vec<String>,
        mounted: Vec<(String, CarouselOptions)>,
    }

    impl CarouselHost for Page {
        fn library_available(&self) -> bool {
            self.library
        }

        fn element_exists(&self, selector: &str) -> bool {
            self.elements.iter().any(|e| e == selector)
        }

        fn mount(&mut self, selector: &str, options: &CarouselOptions) {
            self.mounted.push((selector.to_string(), options.clone()));
        }
    }

    #[test]
    fn test_banner_options_json() {
        let json = serde_json::to_value(CarouselPreset::Banner.options()).unwrap();
        assert_eq!(json["loop"], true);
        assert_eq!(json["autoplay"]["delay"], 5000);
        assert_eq!(json["autoplay"]["disableOnInteraction"], false);
        assert_eq!(json["pagination"]["clickable"], true);
        assert!(json["navigation"]["nextEl"].is_string());
        assert!(json.get("slidesPerView").is_none());
    }

    #[test]
    fn test_featured_options_json() {
        let json = serde_json::to_value(CarouselPreset::Featured.options()).unwrap();
        assert!(json.get("loop").is_none());
        assert_eq!(json["spaceBetween"], 15);
        assert_eq!(json["breakpoints"]["768"]["slidesPerView"], 3.0);
        assert_eq!(json["breakpoints"]["1200"]["slidesPerView"], 5.0);
        assert_eq!(json["autoplay"]["delay"], 4000);
        assert!(json.get("pagination").is_none());
    }

    #[test]
    fn test_mounts_only_present_elements() {
        let config = CarouselConfig::default();
        let mut page = Page {
            library: true,
            elements: vec![config.featured_selector.clone()],
            ..Page::default()
        };

        let mounted = mount_carousels(&mut page, &config);

        assert_eq!(mounted, vec![CarouselPreset::Featured]);
        assert_eq!(page.mounted.len(), 1);
        assert_eq!(page.mounted[0].0, ".featured-carousel");
        assert_eq!(page.mounted[0].1.space_between, Some(15));
    }

    #[test]
    fn test_missing_library_mounts_nothing() {
        let config = CarouselConfig::default();
        let mut page = Page {
            library: false,
            elements: vec![config.banner_selector.clone(), config.featured_selector.clone()],
            ..Page::default()
        };
        assert!(mount_carousels(&mut page, &config).is_empty());
        assert!(page.mounted.is_empty());

        page.library = true;
        let disabled = CarouselConfig {
            enabled: false,
            ..CarouselConfig::default()
        };
        assert!(mount_carousels(&mut page, &disabled).is_empty());
    }
}
