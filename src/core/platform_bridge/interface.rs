//=========================================================================
// Platform Bridge Interface
//=========================================================================
//
// Platform-to-core interface types (events and errors).
//
// Defines the contract between the page binding and the experience.
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::input::InputEvent;

//=== PlatformEvent =======================================================

/// Events sent from the page binding to the experience.
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformEvent {
    /// A user interaction.
    Input(InputEvent),

    /// A timer armed for the next deadline fired.
    Tick,

    /// The browser refused to start the background music.
    AudioRejected(String),

    /// The page is going away.
    Unload,
}

impl From<InputEvent> for PlatformEvent {
    fn from(input: InputEvent) -> Self {
        Self::Input(input)
    }
}

//=== PlatformError =======================================================

/// Page binding errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    /// No global `window` (not running in a browser main thread).
    #[error("no global window")]
    NoWindow,

    /// The window has no document.
    #[error("window has no document")]
    NoDocument,

    /// A required element of the page contract is missing.
    #[error("missing element `{0}`")]
    MissingElement(String),

    /// A DOM call threw.
    #[error("DOM call failed: {0}")]
    Js(String),
}

//=========================================================================
// Unit Tests
//=========================================================================
