//=========================================================================
// Global Systems
//=========================================================================
//
// Container for the logic systems that operate on `GlobalContext`.
//
// Contains the scene manager (sequencer + handlers) and the background
// music gate, and defines the order in which input and timeline steps
// are processed.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;

//=== Internal Dependencies ===============================================

use super::GlobalContext;
use crate::core::audio::AudioGate;
use crate::core::input::{Handled, IgnoreReason, InputEvent};
use crate::core::render::Layout;
use crate::core::scene::SceneManager;
use crate::core::timeline::{Millis, Step};

//=== GlobalSystems =======================================================

/// Experience-level logic systems.
///
/// # Available Systems
///
/// - `scene_manager`: scene registry, sequencer and handlers
/// - `audio`: first-interaction music trigger
pub struct GlobalSystems {
    pub scene_manager: SceneManager,
    pub audio: AudioGate,
}

impl GlobalSystems {
    /// Creates the systems; scenes fade out over `fade_out` ms.
    pub(crate) fn new(fade_out: Millis) -> Self {
        Self {
            scene_manager: SceneManager::new(fade_out),
            audio: AudioGate::new(),
        }
    }

    //--- Input Pipeline ---------------------------------------------------

    /// Handles one input event to completion.
    ///
    /// # Processing Pipeline
    ///
    /// 1. **Page-wide input**: first click starts the music
    /// 2. **Scene dispatch**: the owning scene handles the event if active
    /// 3. **Transitions**: requested scene changes are applied
    pub(crate) fn handle_input(
        &mut self,
        input: &InputEvent,
        ctx: &mut GlobalContext,
        layout: &dyn Layout,
    ) -> Handled {
        if let InputEvent::PageClick = input {
            return match self.audio.on_page_click() {
                Some(command) => {
                    ctx.emit(command);
                    Handled::Consumed
                }
                None => Handled::Ignored(IgnoreReason::AlreadyComplete),
            };
        }

        let handled = self.scene_manager.dispatch_input(input, ctx, layout);
        if let Handled::Ignored(reason) = handled {
            debug!("Input {:?} ignored: {:?}", input, reason);
        }

        self.scene_manager.process_transitions(ctx, layout);
        handled
    }

    //--- Timeline Pipeline ------------------------------------------------

    /// Fires every step due at or before `now`, earliest first.
    ///
    /// Each step runs with the context clock set to its own due time, so a
    /// step scheduled by another step lands exactly where a real timer
    /// would, even when the caller jumps far ahead. Returns the number of
    /// steps fired.
    pub(crate) fn run_due_steps(
        &mut self,
        now: Millis,
        ctx: &mut GlobalContext,
        layout: &dyn Layout,
    ) -> usize {
        let mut fired = 0;

        while let Some(scheduled) = ctx.timeline.pop_due(now) {
            ctx.set_now(scheduled.due);
            debug!("Firing {:?} at {}ms", scheduled.step, scheduled.due);

            match scheduled.step {
                Step::HideScene(scene) => self.scene_manager.hide_scene(scene, ctx),
                Step::Scene(step) => self.scene_manager.dispatch_step(step, ctx, layout),
            }
            self.scene_manager.process_transitions(ctx, layout);
            fired += 1;
        }

        ctx.set_now(now);
        fired
    }
}
