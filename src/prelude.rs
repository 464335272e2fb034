//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use wishing_stars::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Experience facade
pub use crate::engine::{Driver, Experience, ExperienceBuilder, Pump};

// Global systems and context
pub use crate::core::globals::{GlobalContext, GlobalSystems};

// Input
pub use crate::core::input::{Handled, IgnoreReason, InputEvent};

// Scenes
pub use crate::core::scene::{Scene, SceneId, SceneTransition, SceneVisibility};

// Page model
pub use crate::core::render::{Command, Layout, Point, Rect, Size, Target};

// Timing
pub use crate::core::timeline::{Clock, Millis, SceneStep, VirtualClock};

// Page events
pub use crate::core::platform_bridge::{PlatformEvent, TickControl};

// Message bus
pub use crate::core::message_bus::MessageBus;

// Errors
pub use crate::core::error::SequenceError;
