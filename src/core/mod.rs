//=========================================================================
// Core Systems
//
// Platform-independent heart of the experience.
//
// Responsibilities:
// - Sequence the scenes and track their visibility
// - Route page interactions to the scene that owns them
// - Schedule delayed effects on a timeline instead of raw timers
// - Describe every page mutation as a `Command`
//
// Notes:
// Nothing in here touches the DOM. The platform layer feeds events in
// through the bridge and applies the commands that come out, so the whole
// core runs under native unit tests with a virtual clock.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod audio;
pub mod error;
pub mod globals;
pub mod input;
pub mod message_bus;
pub mod platform_bridge;
pub mod render;
pub mod scene;
pub mod timeline;

//=== Public API ==========================================================

pub use error::SequenceError;
pub use globals::{GlobalContext, GlobalSystems};
pub use input::{Handled, IgnoreReason, InputEvent};
pub use render::{Command, Layout, Target};
pub use scene::{Scene, SceneId, SceneManager, SceneTransition, SceneVisibility};
pub use timeline::{Clock, Millis, VirtualClock};
