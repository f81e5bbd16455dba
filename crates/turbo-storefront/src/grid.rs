//! Hover-to-play video on product grid cards.

use tracing::debug;
use turbo_variants::{MediaElement, PlaybackBlocked};

/// Pointer and focus events on a grid card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardEvent {
    PointerEnter,
    PointerLeave,
    FocusIn,
    FocusOut,
}

impl CardEvent {
    fn activates(&self) -> bool {
        matches!(self, CardEvent::PointerEnter | CardEvent::FocusIn)
    }
}

/// Page capability: the media area of one grid card.
pub trait CardSurface {
    fn attach_video(&mut self, element: MediaElement);

    fn play(&mut self) -> Result<(), PlaybackBlocked>;

    fn pause(&mut self);

    fn detach_video(&mut self);
}

/// Hover video controller for one card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoverVideo {
    src: String,
    poster: Option<String>,
    attached: bool,
}

impl HoverVideo {
    /// A controller for a card, or `None` when the card has no video.
    pub fn for_card(video_src: Option<&str>, poster: Option<&str>) -> Option<Self> {
        let src = video_src.map(str::trim).filter(|s| !s.is_empty())?;
        Some(Self {
            src: src.to_string(),
            poster: poster
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string),
            attached: false,
        })
    }

    pub fn src(&self) -> &str {
        &self.src
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// React to a card event. Returns whether the surface changed.
    pub fn handle<S: CardSurface + ?Sized>(&mut self, surface: &mut S, event: CardEvent) -> bool {
        if event.activates() {
            if self.attached {
                return false;
            }
            surface.attach_video(MediaElement::background_video(
                self.src.clone(),
                self.poster.clone(),
            ));
            self.attached = true;
            if let Err(e) = surface.play() {
                debug!(src = %self.src, error = %e, "hover video left on poster");
            }
            true
        } else {
            if !self.attached {
                return false;
            }
            surface.pause();
            surface.detach_video();
            self.attached = false;
            true
        }
    }
}
