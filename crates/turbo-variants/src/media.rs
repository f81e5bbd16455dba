//! Gallery media and the single-slot media viewer.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Media type for gallery entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    #[default]
    Image,
    Video,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }

    /// Parse a media type attribute. Anything that is not a video is an image.
    pub fn parse_lenient(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("video") {
            MediaKind::Video
        } else {
            MediaKind::Image
        }
    }
}

/// One thumbnail / gallery entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaAsset {
    /// Image or video.
    pub kind: MediaKind,
    /// URL of the full-size media (never empty).
    pub source_url: String,
    /// Poster frame for videos.
    pub poster_url: Option<String>,
    /// Color this asset illustrates, if any.
    pub associated_color: Option<String>,
}

impl MediaAsset {
    /// Create an image asset.
    pub fn image(source_url: impl Into<String>) -> Self {
        Self {
            kind: MediaKind::Image,
            source_url: source_url.into(),
            poster_url: None,
            associated_color: None,
        }
    }

    /// Create a video asset.
    pub fn video(source_url: impl Into<String>) -> Self {
        Self {
            kind: MediaKind::Video,
            ..Self::image(source_url)
        }
    }

    pub fn with_poster(mut self, poster_url: impl Into<String>) -> Self {
        self.poster_url = Some(poster_url.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.associated_color = Some(color.into());
        self
    }

    /// Case-insensitive match against the associated color.
    pub fn matches_color(&self, color: &str) -> bool {
        self.associated_color
            .as_deref()
            .map(|c| colors_equal(c, color))
            .unwrap_or(false)
    }
}

/// Compare two color names ignoring case and surrounding whitespace.
pub(crate) fn colors_equal(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// The element the viewer slot should display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaElement {
    Image {
        src: String,
        alt: String,
    },
    Video {
        src: String,
        poster: Option<String>,
        muted: bool,
        looped: bool,
        autoplay: bool,
        plays_inline: bool,
        controls: bool,
    },
}

impl MediaElement {
    /// Build the viewer element for an asset.
    pub fn for_asset(asset: &MediaAsset) -> Self {
        match asset.kind {
            MediaKind::Image => MediaElement::Image {
                src: asset.source_url.clone(),
                alt: "Product image".to_string(),
            },
            MediaKind::Video => MediaElement::Video {
                src: asset.source_url.clone(),
                poster: asset.poster_url.clone(),
                muted: true,
                looped: true,
                autoplay: true,
                plays_inline: true,
                controls: true,
            },
        }
    }

    /// Muted, looping background video (grid cards use this, without controls).
    pub fn background_video(src: impl Into<String>, poster: Option<String>) -> Self {
        MediaElement::Video {
            src: src.into(),
            poster,
            muted: true,
            looped: true,
            autoplay: true,
            plays_inline: true,
            controls: false,
        }
    }

    pub fn src(&self) -> &str {
        match self {
            MediaElement::Image { src, .. } | MediaElement::Video { src, .. } => src,
        }
    }

    pub fn is_video(&self) -> bool {
        matches!(self, MediaElement::Video { .. })
    }
}

/// The page refused to start playback (autoplay policy).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("autoplay was blocked")]
pub struct PlaybackBlocked;

/// Page capability: the viewer slot and its thumbnail strip.
pub trait ViewerSlot {
    /// Remove whatever the slot currently shows.
    fn clear_viewer(&mut self);

    /// Insert an element into the (empty) slot.
    fn insert_media(&mut self, element: MediaElement);

    /// Put the active marker on one thumbnail, removing it from all others.
    fn mark_thumbnail(&mut self, index: usize);

    /// Start playback of the inserted video.
    fn play_video(&mut self) -> Result<(), PlaybackBlocked>;
}

/// Renders exactly one active media element.
#[derive(Debug, Clone, Default)]
pub struct MediaViewer {
    active: Option<usize>,
}

impl MediaViewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the active thumbnail.
    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// Replace the slot content with `asset` and mark its thumbnail.
    pub fn set_active_media<S: ViewerSlot + ?Sized>(
        &mut self,
        slot: &mut S,
        index: usize,
        asset: &MediaAsset,
    ) {
        slot.mark_thumbnail(index);
        slot.clear_viewer();

        let element = MediaElement::for_asset(asset);
        let is_video = element.is_video();
        slot.insert_media(element);

        if is_video {
            if let Err(e) = slot.play_video() {
                debug!(src = %asset.source_url, error = %e, "video left on poster");
            }
        }

        self.active = Some(index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Slot {
        content: Vec<MediaElement>,
        marked: Option<usize>,
        block_autoplay: bool,
        plays: usize,
    }

    impl ViewerSlot for Slot {
        fn clear_viewer(&mut self) {
            self.content.clear();
        }

        fn insert_media(&mut self, element: MediaElement) {
            self.content.push(element);
        }

        fn mark_thumbnail(&mut self, index: usize) {
            self.marked = Some(index);
        }

        fn play_video(&mut self) -> Result<(), PlaybackBlocked> {
            self.plays += 1;
            if self.block_autoplay {
                Err(PlaybackBlocked)
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn test_image_replaces_slot_content() {
        let mut slot = Slot::default();
        let mut viewer = MediaViewer::new();

        viewer.set_active_media(&mut slot, 0, &MediaAsset::image("/a.jpg"));
        viewer.set_active_media(&mut slot, 1, &MediaAsset::image("/b.jpg"));

        assert_eq!(slot.content.len(), 1);
        assert_eq!(slot.content[0].src(), "/b.jpg");
        assert_eq!(slot.marked, Some(1));
        assert_eq!(viewer.active(), Some(1));
        assert_eq!(slot.plays, 0);
    }

    #[test]
    fn test_video_element_flags() {
        let asset = MediaAsset::video("/clip.mp4").with_poster("/clip.jpg");
        match MediaElement::for_asset(&asset) {
            MediaElement::Video {
                poster,
                muted,
                looped,
                autoplay,
                ..
            } => {
                assert_eq!(poster.as_deref(), Some("/clip.jpg"));
                assert!(muted && looped && autoplay);
            }
            other => panic!("expected video, got {:?}", other),
        }
    }

    #[test]
    fn test_blocked_autoplay_is_swallowed() {
        let mut slot = Slot {
            block_autoplay: true,
            ..Slot::default()
        };
        let mut viewer = MediaViewer::new();

        viewer.set_active_media(&mut slot, 2, &MediaAsset::video("/clip.mp4"));

        assert_eq!(slot.plays, 1);
        assert_eq!(viewer.active(), Some(2));
        assert!(slot.content[0].is_video());
    }

    #[test]
    fn test_color_match_ignores_case() {
        let asset = MediaAsset::image("/red.jpg").with_color("Red");
        assert!(asset.matches_color("red"));
        assert!(asset.matches_color(" RED "));
        assert!(!asset.matches_color("blue"));
        assert!(!MediaAsset::image("/plain.jpg").matches_color("red"));
    }

    #[test]
    fn test_media_kind_parse() {
        assert_eq!(MediaKind::parse_lenient("VIDEO"), MediaKind::Video);
        assert_eq!(MediaKind::parse_lenient("image"), MediaKind::Image);
        assert_eq!(MediaKind::parse_lenient(""), MediaKind::Image);
    }
}
