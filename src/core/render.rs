//=========================================================================
// Render Commands
//=========================================================================
//
// View-side vocabulary shared by the scenes and the platform.
//
// Scenes never touch the DOM. They emit `Command`s against `Target`s and
// read geometry through the `Layout` trait; the platform layer applies
// commands and answers layout queries from the live page.
//
// Flow:
//   Scene ── emit(Command) ──→ MessageBus ──→ Experience ──→ Platform
//   Scene ←─ Layout::rect(Target) ←──────────────────────── Platform
//
//=========================================================================

//=== External Dependencies ===============================================

use std::borrow::Cow;
use std::fmt;

//=== Internal Dependencies ===============================================

use crate::core::scene::SceneId;

//=== Identifiers =========================================================

/// Index of a drawn constellation line, in drawing order.
pub type LineId = u32;

/// Index of a wish orb, in creation order.
pub type OrbId = u32;

/// Position of a star among the page's `.star` elements, in document order.
///
/// Distinct from its rank: ranks come from markup and may repeat.
pub type StarId = u32;

//=== Geometry ============================================================

/// Screen-space point in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width and height in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle, as reported by `getBoundingClientRect`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }
}

//=== Layout Trait ========================================================

/// Read-only view of the current page geometry.
///
/// Queried at the moment a handler needs it, never cached, so handlers
/// follow viewport resizes between interactions.
pub trait Layout {
    /// Size of the visible viewport.
    fn viewport(&self) -> Size;

    /// Bounding rectangle of an element, or `None` if it is not on the page.
    fn rect(&self, target: Target) -> Option<Rect>;
}

//=== Target ==============================================================

/// Elements the experience reads from or writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Scene(SceneId),
    TapCounter,
    CatchButton,
    LetterModal,
    Star(StarId),
    ConstellationCanvas,
    ConstellationLine(LineId),
    ConstellationInstruction,
    ConstellationReveal,
    NextButton,
    WishInput,
    SendButton,
    Jar,
    Orb(OrbId),
    FinalMessage,
    Music,
}

/// How the platform finds a target in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    Id(Cow<'static, str>),

    /// The `index`-th match of `selector`, in document order.
    Nth { selector: &'static str, index: u32 },
}

impl Target {
    /// Document locator for this target.
    pub fn locator(&self) -> Locator {
        let id: &'static str = match self {
            Self::Scene(scene) => scene.dom_id(),
            Self::TapCounter => "tap-counter",
            Self::CatchButton => "catch-btn",
            Self::LetterModal => "letter-modal",
            Self::Star(star) => {
                return Locator::Nth {
                    selector: STAR_SELECTOR,
                    index: *star,
                };
            }
            Self::ConstellationCanvas => "constellation-svg",
            Self::ConstellationLine(line) => {
                return Locator::Id(Cow::Owned(format!("constellation-line-{line}")));
            }
            Self::ConstellationInstruction => "constellation-instruction",
            Self::ConstellationReveal => "constellation-reveal",
            Self::NextButton => "next-to-wishing-jar",
            Self::WishInput => "wish-input",
            Self::SendButton => "send-to-jar-btn",
            Self::Jar => "jar-container",
            Self::Orb(orb) => return Locator::Id(Cow::Owned(format!("wish-orb-{orb}"))),
            Self::FinalMessage => "final-message",
            Self::Music => "bg-music",
        };
        Locator::Id(Cow::Borrowed(id))
    }
}

/// Selector matching every star element.
pub const STAR_SELECTOR: &str = ".star";

//=== CSS Class Names =====================================================

pub const CLASS_ACTIVE: &str = "active";
pub const CLASS_HIDDEN: &str = "hidden";
pub const CLASS_CONNECTED: &str = "connected";
pub const CLASS_WISH_ORB: &str = "wish-orb";

//=== Command =============================================================

/// A single view mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    AddClass { target: Target, class: &'static str },
    RemoveClass { target: Target, class: &'static str },
    SetText { target: Target, text: String },
    SetStyle { target: Target, property: &'static str, value: String },

    /// Append an SVG line to the constellation canvas, initially transparent.
    DrawLine { line: LineId, from: Point, to: Point },

    /// Create an orb element at the given page position.
    SpawnOrb { orb: OrbId, left: f64, top: f64 },
    RemoveOrb(OrbId),

    /// Blocking user-facing warning.
    Alert(String),

    /// Best-effort start of the background music.
    PlayMusic,
}

impl Command {
    pub fn add_class(target: Target, class: &'static str) -> Self {
        Self::AddClass { target, class }
    }

    pub fn remove_class(target: Target, class: &'static str) -> Self {
        Self::RemoveClass { target, class }
    }

    pub fn set_style(target: Target, property: &'static str, value: impl Into<String>) -> Self {
        Self::SetStyle {
            target,
            property,
            value: value.into(),
        }
    }

    pub fn set_text(target: Target, text: impl Into<String>) -> Self {
        Self::SetText {
            target,
            text: text.into(),
        }
    }
}

/// Formats a pixel length the way inline styles expect it.
pub fn px(value: f64) -> String {
    format!("{value}px")
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.locator() {
            Locator::Id(id) => write!(f, "#{id}"),
            Locator::Nth { selector, index } => write!(f, "{selector}:nth({index})"),
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
