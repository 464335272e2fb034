//=========================================================================
// Letter Modal
//
// Stage two: the letter, shown as a modal over the catch scene. Its only
// interaction is the dismiss control; once dismissed, the constellation
// follows after the modal's closing transition.
//
// The catch scene stays active (and on screen) while the letter is open,
// so opening the letter is not a scene transition. Dismissing it is the
// only way out of scene 1.
//
//=========================================================================

//=== External Crates =====================================================
use log::{debug, info};

//=== Internal Modules ====================================================
use crate::core::globals::GlobalContext;
use crate::core::input::{Handled, IgnoreReason, InputEvent};
use crate::core::render::{Command, Target, CLASS_ACTIVE};
use crate::core::scene::SceneId;
use crate::core::timeline::{Millis, SceneStep};

//=== LetterState =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LetterState {
    /// Not opened yet; the dismiss control is not on screen.
    Sealed,
    Open,
    Dismissed,
}

//=== LetterModal =========================================================

/// Handler for the letter modal.
#[derive(Debug)]
pub struct LetterModal {
    close_delay: Millis,
    state: LetterState,
}

impl LetterModal {
    /// After dismissal, the constellation follows by `close_delay` ms.
    pub fn new(close_delay: Millis) -> Self {
        Self {
            close_delay,
            state: LetterState::Sealed,
        }
    }

    pub fn state(&self) -> LetterState {
        self.state
    }

    /// Shows the modal. Only the first call has any effect.
    pub fn open(&mut self, ctx: &mut GlobalContext) {
        if self.state != LetterState::Sealed {
            debug!("Letter already {:?}", self.state);
            return;
        }
        self.state = LetterState::Open;
        ctx.emit(Command::add_class(Target::LetterModal, CLASS_ACTIVE));
        info!("Letter opened");
    }

    pub fn handle_input(&mut self, input: &InputEvent, ctx: &mut GlobalContext) -> Handled {
        match (input, self.state) {
            (InputEvent::CloseLetter, LetterState::Sealed) => {
                Handled::Ignored(IgnoreReason::NotReady)
            }
            (InputEvent::CloseLetter, LetterState::Dismissed) => {
                Handled::Ignored(IgnoreReason::AlreadyComplete)
            }
            (InputEvent::CloseLetter, LetterState::Open) => {
                self.state = LetterState::Dismissed;
                ctx.emit(Command::remove_class(Target::LetterModal, CLASS_ACTIVE));
                ctx.schedule(self.close_delay, SceneStep::LeaveLetter);
                Handled::Consumed
            }
            _ => Handled::Ignored(IgnoreReason::Unrelated),
        }
    }

    pub fn on_step(&mut self, step: SceneStep, ctx: &mut GlobalContext) {
        match step {
            SceneStep::LeaveLetter => ctx.request_transition(SceneId::Constellation),
            other => debug!("Letter ignoring step {:?}", other),
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scene::SceneTransition;

    fn opened(close_delay: Millis) -> (LetterModal, GlobalContext) {
        let mut letter = LetterModal::new(close_delay);
        let mut ctx = GlobalContext::new();
        letter.open(&mut ctx);
        (letter, ctx)
    }

    #[test]
    fn open_shows_modal_once() {
        let (mut letter, mut ctx) = opened(500);
        assert_eq!(letter.state(), LetterState::Open);
        assert_eq!(
            ctx.take_commands(),
            vec![Command::add_class(Target::LetterModal, CLASS_ACTIVE)]
        );

        letter.open(&mut ctx);
        assert!(ctx.take_commands().is_empty());
        assert!(!ctx.message_bus.has_messages::<SceneTransition>());
    }

    #[test]
    fn dismiss_before_open_is_not_ready() {
        let mut letter = LetterModal::new(500);
        let mut ctx = GlobalContext::new();

        let handled = letter.handle_input(&InputEvent::CloseLetter, &mut ctx);
        assert_eq!(handled, Handled::Ignored(IgnoreReason::NotReady));
        assert_eq!(letter.state(), LetterState::Sealed);
        assert!(ctx.timeline.is_empty());
    }

    #[test]
    fn dismiss_closes_then_leaves_after_delay() {
        let (mut letter, mut ctx) = opened(500);
        ctx.take_commands();
        ctx.set_now(2_000);

        let handled = letter.handle_input(&InputEvent::CloseLetter, &mut ctx);
        assert_eq!(handled, Handled::Consumed);
        assert_eq!(letter.state(), LetterState::Dismissed);
        assert_eq!(
            ctx.take_commands(),
            vec![Command::remove_class(Target::LetterModal, CLASS_ACTIVE)]
        );
        assert_eq!(ctx.timeline.next_deadline(), Some(2_500));
        assert!(!ctx.message_bus.has_messages::<SceneTransition>());

        letter.on_step(SceneStep::LeaveLetter, &mut ctx);
        assert_eq!(
            ctx.message_bus.read::<SceneTransition>(),
            &[SceneTransition::To(SceneId::Constellation)]
        );
    }

    #[test]
    fn second_dismiss_is_ignored() {
        let (mut letter, mut ctx) = opened(500);
        letter.handle_input(&InputEvent::CloseLetter, &mut ctx);

        let handled = letter.handle_input(&InputEvent::CloseLetter, &mut ctx);
        assert_eq!(handled, Handled::Ignored(IgnoreReason::AlreadyComplete));
        assert_eq!(ctx.timeline.len(), 1);
    }
}
