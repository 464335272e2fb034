//=========================================================================
// Global Context
//=========================================================================
//
// Shared data container handed to scenes.
//
// Contains the state scenes read/write while handling input:
// - message_bus: outgoing commands and transition requests
// - timeline: deferred animation steps
// - now: time of the event being handled
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::message_bus::MessageBus;
use crate::core::render::Command;
use crate::core::scene::{SceneId, SceneTransition};
use crate::core::timeline::{Millis, Step, Timeline};

//=== GlobalContext =======================================================

/// Context passed to every scene callback.
///
/// Scenes only produce data here; the engine decides when commands reach
/// the page and when scheduled steps fire.
#[derive(Default)]
pub struct GlobalContext {
    /// Typed queues for `Command` and `SceneTransition`.
    pub message_bus: MessageBus,

    /// Pending animation steps.
    pub timeline: Timeline,

    now: Millis,
}

impl GlobalContext {
    /// Creates an empty context at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Time of the input or step currently being handled.
    pub fn now(&self) -> Millis {
        self.now
    }

    pub(crate) fn set_now(&mut self, now: Millis) {
        self.now = now;
    }

    /// Queues a view command.
    pub fn emit(&mut self, command: Command) {
        self.message_bus.push(command);
    }

    /// Schedules a step `delay` ms from now; returns its due time.
    pub fn schedule(&mut self, delay: Millis, step: impl Into<Step>) -> Millis {
        self.timeline.schedule(self.now, delay, step)
    }

    /// Asks the scene manager to activate `scene` after the current handler.
    pub fn request_transition(&mut self, scene: SceneId) {
        self.message_bus.push(SceneTransition::To(scene));
    }

    /// Drains queued view commands in emission order.
    pub fn take_commands(&mut self) -> Vec<Command> {
        self.message_bus.take::<Command>()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::timeline::SceneStep;

    #[test]
    fn schedule_is_relative_to_now() {
        let mut ctx = GlobalContext::new();
        ctx.set_now(1_000);
        assert_eq!(ctx.schedule(500, SceneStep::OpenLetter), 1_500);
        assert_eq!(ctx.timeline.next_deadline(), Some(1_500));
    }

    #[test]
    fn commands_drain_in_order() {
        let mut ctx = GlobalContext::new();
        ctx.emit(Command::PlayMusic);
        ctx.emit(Command::Alert("hi".to_string()));

        assert_eq!(
            ctx.take_commands(),
            vec![Command::PlayMusic, Command::Alert("hi".to_string())]
        );
        assert!(ctx.take_commands().is_empty());
    }

    #[test]
    fn transition_requests_go_on_the_bus() {
        let mut ctx = GlobalContext::new();
        ctx.request_transition(SceneId::Constellation);
        assert_eq!(
            ctx.message_bus.read::<SceneTransition>(),
            &[SceneTransition::To(SceneId::Constellation)]
        );
    }
}
