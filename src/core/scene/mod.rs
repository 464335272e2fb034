//=========================================================================
// Scene System
//=========================================================================
//
// Scene identifiers, visibility states and the handler trait.
//
// Architecture:
//   SceneManager
//     ├─ scenes: HashMap<SceneId, Box<dyn Scene>>
//     ├─ visibility: BTreeMap<SceneId, SceneVisibility>
//     └─ active: Option<SceneId>
//
// Flow:
//   dispatch_input() → Scene::handle_input() → SceneTransition request
//   process_transitions() → transition_to() → on_exit()/on_enter()
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::str::FromStr;

//=== Internal Dependencies ===============================================

use crate::core::error::SequenceError;
use crate::core::globals::GlobalContext;
use crate::core::input::{Handled, InputEvent};
use crate::core::render::Layout;
use crate::core::timeline::{Millis, SceneStep};

//=== Module Declarations =================================================

mod scene_manager;

//=== Public API ==========================================================

pub use scene_manager::{SceneManager, TransitionOutcome};

//=== SceneId =============================================================

/// Scene containers on the page, in sequence order.
///
/// The letter has no container of its own: it is a modal opened over the
/// catch scene, which stays active until the letter is dismissed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SceneId {
    Catch,
    Constellation,
    WishingJar,
}

impl SceneId {
    /// Every scene in sequence order.
    pub const ALL: [SceneId; 3] = [SceneId::Catch, SceneId::Constellation, SceneId::WishingJar];

    /// Id of the scene's container element.
    pub const fn dom_id(&self) -> &'static str {
        match self {
            Self::Catch => "scene1",
            Self::Constellation => "scene3",
            Self::WishingJar => "scene4",
        }
    }

    /// The scene that follows this one, if any.
    pub fn next(&self) -> Option<SceneId> {
        match self {
            Self::Catch => Some(Self::Constellation),
            Self::Constellation => Some(Self::WishingJar),
            Self::WishingJar => None,
        }
    }
}

impl FromStr for SceneId {
    type Err = SequenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|scene| scene.dom_id() == s)
            .ok_or_else(|| SequenceError::UnknownScene(s.to_string()))
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dom_id())
    }
}

//=== SceneVisibility =====================================================

/// Visual state of a scene container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneVisibility {
    /// Visible and interactive.
    Active,

    /// Inactive but still on screen until `hidden_at`.
    FadingOut { hidden_at: Millis },

    /// Fully hidden.
    Hidden,
}

impl SceneVisibility {
    pub fn is_hidden(&self) -> bool {
        matches!(self, Self::Hidden)
    }
}

//=== SceneTransition =====================================================

/// Request to make a scene the active one.
///
/// Scenes push these onto the message bus; the scene manager applies them
/// once the current handler has returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneTransition {
    To(SceneId),
}

//=== Scene Trait =========================================================

/// Per-scene interaction handler.
///
/// Each scene owns its state; all view changes go through the context's
/// message bus and all delays through its timeline.
///
/// Only `handle_input()` is required:
///
/// ```rust
/// # use wishing_stars::prelude::*;
/// struct Idle;
///
/// impl Scene for Idle {
///     fn handle_input(
///         &mut self,
///         _input: &InputEvent,
///         _ctx: &mut GlobalContext,
///         _layout: &dyn Layout,
///     ) -> Handled {
///         Handled::Ignored(IgnoreReason::Unrelated)
///     }
/// }
/// ```
pub trait Scene {
    /// Called when the scene becomes active.
    fn on_enter(&mut self, _ctx: &mut GlobalContext, _layout: &dyn Layout) {}

    /// Called when another scene becomes active.
    fn on_exit(&mut self, _ctx: &mut GlobalContext, _layout: &dyn Layout) {}

    /// Handles an input event routed to this scene while it is active.
    fn handle_input(
        &mut self,
        input: &InputEvent,
        ctx: &mut GlobalContext,
        layout: &dyn Layout,
    ) -> Handled;

    /// Runs an animation step this scene scheduled earlier.
    ///
    /// Steps fire whether or not the scene is still active.
    fn on_step(&mut self, _step: SceneStep, _ctx: &mut GlobalContext, _layout: &dyn Layout) {}
}

//=========================================================================
// Unit Tests
//=========================================================================
