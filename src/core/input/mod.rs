//=========================================================================
// Input
//
// Page interaction events and the per-scene handling result.
//
// Responsibilities:
// - Describe every interaction the DOM contract can produce
// - Route interactions to their owning scene
// - Make "ignored" an explicit, logged outcome instead of a fallthrough
//
//=========================================================================

//=== Submodules ==========================================================

pub mod event;

//=== Public API ==========================================================

pub use event::InputEvent;

//=== Handled =============================================================

/// Result of offering an input event to a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    /// The event changed scene state or produced commands.
    Consumed,

    /// The event was valid but had no effect.
    Ignored(IgnoreReason),
}

impl Handled {
    pub fn is_consumed(&self) -> bool {
        matches!(self, Self::Consumed)
    }
}

/// Why an event produced no effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The owning scene is not the active one.
    SceneInactive,

    /// The scene already reached its success condition.
    AlreadyComplete,

    /// A star was clicked out of rank order.
    OutOfOrder { expected: u32, got: u32 },

    /// Hover repositioning is disabled on narrow viewports.
    HoverDisabled,

    /// The control is not yet available.
    NotReady,

    /// A wish was submitted with no visible text.
    EmptyWish,

    /// The event does not belong to this scene.
    Unrelated,
}

//=========================================================================
// Unit Tests
//=========================================================================
