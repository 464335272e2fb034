//=========================================================================
// Input Events
//
// Defines the page interactions the experience reacts to.
//
// The platform layer translates DOM listeners into these events; the
// scene manager routes each one to the scene that owns it.
//
// Event Flow:
// ```text
// DOM listener (click / mouseover)
//         ↓
//    InputEvent (this module)
//         ↓
//    PlatformEvent::Input ── channel ──→ EventCollector
//         ↓
//    SceneManager::dispatch_input → owning Scene
// ```
//
//=========================================================================

//=== Internal Modules ====================================================

use crate::core::render::StarId;
use crate::core::scene::SceneId;

//=== InputEvent ==========================================================

/// A user interaction with the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// Any click anywhere on the page body.
    PageClick,

    /// Click on the catch button.
    CatchClick,

    /// Pointer entered the catch button.
    CatchHover,

    /// Dismiss control of the letter modal (shown over the catch scene).
    CloseLetter,

    /// Click on a star.
    ///
    /// `star` identifies the element that was clicked; `order` is the rank
    /// parsed from its `data-order` attribute.
    StarClicked { star: StarId, order: u32 },

    /// The "next" control under the finished constellation.
    NextToJar,

    /// Wish submission with the raw (untrimmed) input text.
    SubmitWish { text: String },
}

impl InputEvent {
    /// Scene that handles this event, or `None` for page-wide events.
    pub fn scene(&self) -> Option<SceneId> {
        match self {
            Self::PageClick => None,
            Self::CatchClick | Self::CatchHover => Some(SceneId::Catch),
            Self::CloseLetter => Some(SceneId::Catch),
            Self::StarClicked { .. } | Self::NextToJar => Some(SceneId::Constellation),
            Self::SubmitWish { .. } => Some(SceneId::WishingJar),
        }
    }

    /// Builds the click event for star `star` from its `data-order`
    /// attribute.
    ///
    /// Ranks start at 1; anything else is not a star.
    pub fn star_from_attribute(star: StarId, value: &str) -> Option<Self> {
        match value.trim().parse::<u32>() {
            Ok(order) if order >= 1 => Some(Self::StarClicked { star, order }),
            _ => None,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
