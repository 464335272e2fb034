//=========================================================================
// Background Music Gate
//=========================================================================
//
// Starts the background track on the first page click, exactly once.
//
// Playback itself is best-effort: the platform reports a rejected
// `play()` back through `audio_rejected`, which only logs.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{info, warn};

//=== Internal Dependencies ===============================================

use crate::core::render::Command;

//=== AudioGate ===========================================================

/// One-shot trigger for the background music.
#[derive(Debug, Default)]
pub struct AudioGate {
    requested: bool,
}

impl AudioGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the play command on the first call, `None` afterwards.
    pub fn on_page_click(&mut self) -> Option<Command> {
        if self.requested {
            return None;
        }
        self.requested = true;
        info!("First interaction, starting background music");
        Some(Command::PlayMusic)
    }

    /// Records a playback failure. Never surfaced to the user.
    pub fn audio_rejected(&self, reason: &str) {
        warn!("Audio autoplay was blocked: {}", reason);
    }

    pub fn requested(&self) -> bool {
        self.requested
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
