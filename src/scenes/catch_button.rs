//=========================================================================
// Catch Scene
//
// Scene 1: a button that jumps away until it has been tapped enough.
//
// Responsibilities:
// - Draw the required tap count once, from the configured range
// - Count clicks and show the running total
// - Jump the button to a random on-screen position after each click
//   (and on hover, on wide viewports)
// - Freeze at the threshold and open the letter after a short delay
// - Stay active behind the letter; leave once it is dismissed
//
//=========================================================================

//=== Standard Library Imports ============================================
use std::ops::RangeInclusive;

//=== External Crates =====================================================
use log::{debug, info};
use rand::rngs::StdRng;
use rand::Rng;

//=== Internal Modules ====================================================
use crate::core::globals::GlobalContext;
use crate::core::input::{Handled, IgnoreReason, InputEvent};
use crate::core::render::{px, Command, Layout, Point, Size, Target, CLASS_HIDDEN};
use crate::core::scene::Scene;
use crate::core::timeline::{Millis, SceneStep};
use crate::scenes::letter::LetterModal;

/// Label shown on the frozen button.
pub const CAUGHT_LABEL: &str = "✅";

//=== TapCounter ==========================================================
//
// Monotonic click counter with a fixed threshold. Once the threshold is
// reached the counter is frozen and further taps are rejected.
//
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TapCounter {
    count: u32,
    required: u32,
}

/// Effect of a single tap on the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapProgress {
    /// Counted; threshold not yet reached.
    Counting(u32),

    /// This tap reached the threshold.
    Reached(u32),

    /// Threshold was already reached; nothing counted.
    Frozen,
}

impl TapCounter {
    /// Creates a counter requiring `required` taps (at least one).
    pub fn new(required: u32) -> Self {
        Self {
            count: 0,
            required: required.max(1),
        }
    }

    /// Creates a counter with a threshold drawn uniformly from `range`.
    pub fn random(range: RangeInclusive<u32>, rng: &mut impl Rng) -> Self {
        Self::new(rng.gen_range(range))
    }

    pub fn register_tap(&mut self) -> TapProgress {
        if self.is_complete() {
            return TapProgress::Frozen;
        }

        self.count += 1;
        if self.is_complete() {
            TapProgress::Reached(self.count)
        } else {
            TapProgress::Counting(self.count)
        }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn required(&self) -> u32 {
        self.required
    }

    pub fn is_complete(&self) -> bool {
        self.count >= self.required
    }
}

//--- place_button() ------------------------------------------------------
//
// Picks a top-left position for the button from two unit samples.
//
// The position is inset by the button's own size on each axis. When the
// viewport is too small for the inset, the span collapses to zero and the
// result is clamped so the button never starts off-screen.
//
pub fn place_button(viewport: Size, button: Size, sample_x: f64, sample_y: f64) -> Point {
    fn axis(extent: f64, size: f64, sample: f64) -> f64 {
        let span = (extent - size * 2.0).max(0.0);
        let max = (extent - size).max(0.0);
        (size + sample.clamp(0.0, 1.0) * span).clamp(0.0, max)
    }

    Point::new(
        axis(viewport.width, button.width, sample_x),
        axis(viewport.height, button.height, sample_y),
    )
}

//=== CatchScene ==========================================================

/// Handler for scene 1 and the letter opened over it.
pub struct CatchScene {
    counter: TapCounter,
    rng: StdRng,
    hover_enabled: bool,
    wide_viewport_min: f64,
    letter_delay: Millis,
    letter: LetterModal,
}

impl CatchScene {
    //--- Construction -----------------------------------------------------
    pub fn new(
        tap_range: RangeInclusive<u32>,
        wide_viewport_min: f64,
        letter_delay: Millis,
        letter: LetterModal,
        mut rng: StdRng,
    ) -> Self {
        let counter = TapCounter::random(tap_range, &mut rng);
        info!("Catch scene needs {} taps", counter.required());
        Self {
            counter,
            rng,
            hover_enabled: false,
            wide_viewport_min,
            letter_delay,
            letter,
        }
    }

    pub fn counter(&self) -> &TapCounter {
        &self.counter
    }

    pub fn letter(&self) -> &LetterModal {
        &self.letter
    }

    //--- Internal Helpers -------------------------------------------------

    fn move_button(&mut self, ctx: &mut GlobalContext, layout: &dyn Layout) {
        let button = layout
            .rect(Target::CatchButton)
            .map(|r| r.size())
            .unwrap_or_default();
        let sample_x: f64 = self.rng.gen();
        let sample_y: f64 = self.rng.gen();
        let position = place_button(layout.viewport(), button, sample_x, sample_y);

        ctx.emit(Command::set_style(Target::CatchButton, "top", px(position.y)));
        ctx.emit(Command::set_style(Target::CatchButton, "left", px(position.x)));
    }

    fn show_count(&self, ctx: &mut GlobalContext, count: u32) {
        ctx.emit(Command::remove_class(Target::TapCounter, CLASS_HIDDEN));
        ctx.emit(Command::set_text(Target::TapCounter, format!("Taps: {count}")));
    }
}

impl Scene for CatchScene {
    fn on_enter(&mut self, ctx: &mut GlobalContext, layout: &dyn Layout) {
        self.hover_enabled = layout.viewport().width > self.wide_viewport_min;
        ctx.emit(Command::add_class(Target::TapCounter, CLASS_HIDDEN));
        self.move_button(ctx, layout);
    }

    fn handle_input(
        &mut self,
        input: &InputEvent,
        ctx: &mut GlobalContext,
        layout: &dyn Layout,
    ) -> Handled {
        match input {
            InputEvent::CatchClick => match self.counter.register_tap() {
                TapProgress::Frozen => Handled::Ignored(IgnoreReason::AlreadyComplete),
                TapProgress::Counting(count) => {
                    self.show_count(ctx, count);
                    self.move_button(ctx, layout);
                    Handled::Consumed
                }
                TapProgress::Reached(count) => {
                    self.show_count(ctx, count);
                    ctx.emit(Command::set_text(Target::CatchButton, CAUGHT_LABEL));
                    ctx.emit(Command::set_style(Target::CatchButton, "cursor", "default"));
                    ctx.schedule(self.letter_delay, SceneStep::OpenLetter);
                    info!("Button caught after {} taps", count);
                    Handled::Consumed
                }
            },
            InputEvent::CatchHover => {
                if !self.hover_enabled {
                    Handled::Ignored(IgnoreReason::HoverDisabled)
                } else if self.counter.is_complete() {
                    Handled::Ignored(IgnoreReason::AlreadyComplete)
                } else {
                    self.move_button(ctx, layout);
                    Handled::Consumed
                }
            }
            InputEvent::CloseLetter => self.letter.handle_input(input, ctx),
            _ => Handled::Ignored(IgnoreReason::Unrelated),
        }
    }

    fn on_step(&mut self, step: SceneStep, ctx: &mut GlobalContext, _layout: &dyn Layout) {
        match step {
            SceneStep::OpenLetter => self.letter.open(ctx),
            SceneStep::LeaveLetter => self.letter.on_step(step, ctx),
            other => debug!("Catch scene ignoring step {:?}", other),
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::render::{Rect, CLASS_ACTIVE};
    use crate::core::scene::{SceneId, SceneTransition};
    use crate::scenes::letter::LetterState;
    use rand::SeedableRng;

    //--- Test Helpers -----------------------------------------------------
    struct FixedLayout {
        viewport: Size,
        button: Rect,
    }

    impl Layout for FixedLayout {
        fn viewport(&self) -> Size {
            self.viewport
        }
        fn rect(&self, target: Target) -> Option<Rect> {
            (target == Target::CatchButton).then_some(self.button)
        }
    }

    fn desktop() -> FixedLayout {
        FixedLayout {
            viewport: Size::new(1280.0, 720.0),
            button: Rect::new(0.0, 0.0, 120.0, 48.0),
        }
    }

    fn scene(required: u32, seed: u64) -> CatchScene {
        CatchScene::new(
            required..=required,
            768.0,
            500,
            LetterModal::new(500),
            StdRng::seed_from_u64(seed),
        )
    }

    fn button_position(commands: &[Command]) -> Option<Point> {
        let mut top = None;
        let mut left = None;
        for command in commands {
            if let Command::SetStyle {
                target: Target::CatchButton,
                property,
                value,
            } = command
            {
                let parsed = value.trim_end_matches("px").parse::<f64>().ok();
                match *property {
                    "top" => top = parsed,
                    "left" => left = parsed,
                    _ => {}
                }
            }
        }
        Some(Point::new(left?, top?))
    }

    //--- TapCounter -------------------------------------------------------

    #[test]
    fn threshold_is_always_in_range() {
        for seed in 0..500 {
            let mut rng = StdRng::seed_from_u64(seed);
            let counter = TapCounter::random(5..=9, &mut rng);
            assert!((5..=9).contains(&counter.required()));
        }
    }

    #[test]
    fn counter_freezes_at_threshold() {
        let mut counter = TapCounter::new(3);
        assert_eq!(counter.register_tap(), TapProgress::Counting(1));
        assert_eq!(counter.register_tap(), TapProgress::Counting(2));
        assert_eq!(counter.register_tap(), TapProgress::Reached(3));
        assert_eq!(counter.register_tap(), TapProgress::Frozen);
        assert_eq!(counter.count(), 3);
    }

    //--- place_button() ---------------------------------------------------

    #[test]
    fn placement_stays_inside_viewport() {
        let viewport = Size::new(800.0, 600.0);
        let button = Size::new(100.0, 40.0);
        for (sx, sy) in [(0.0, 0.0), (0.5, 0.5), (0.999, 0.999), (1.0, 1.0)] {
            let p = place_button(viewport, button, sx, sy);
            assert!(p.x >= 0.0 && p.x + button.width <= viewport.width);
            assert!(p.y >= 0.0 && p.y + button.height <= viewport.height);
        }
    }

    #[test]
    fn placement_is_inset_by_button_size() {
        let p = place_button(Size::new(800.0, 600.0), Size::new(100.0, 40.0), 0.0, 0.0);
        assert_eq!(p, Point::new(100.0, 40.0));
    }

    #[test]
    fn tiny_viewport_clamps_to_zero_span() {
        let viewport = Size::new(150.0, 50.0);
        let button = Size::new(100.0, 40.0);
        let p = place_button(viewport, button, 0.7, 0.7);
        assert!(p.x >= 0.0 && p.y >= 0.0);
        assert_eq!(p, Point::new(50.0, 10.0));

        let p = place_button(Size::new(50.0, 20.0), button, 0.3, 0.3);
        assert_eq!(p, Point::new(0.0, 0.0));
    }

    //--- CatchScene -------------------------------------------------------

    #[test]
    fn clicks_below_threshold_reposition_within_bounds() {
        let layout = desktop();
        let mut scene = scene(9, 7);
        let mut ctx = GlobalContext::new();
        scene.on_enter(&mut ctx, &layout);
        ctx.take_commands();

        for tap in 1..9 {
            let handled = scene.handle_input(&InputEvent::CatchClick, &mut ctx, &layout);
            assert_eq!(handled, Handled::Consumed);

            let commands = ctx.take_commands();
            assert!(commands.contains(&Command::set_text(Target::TapCounter, format!("Taps: {tap}"))));
            let p = button_position(&commands).expect("button moved");
            assert!(p.x >= 0.0 && p.x + 120.0 <= 1280.0);
            assert!(p.y >= 0.0 && p.y + 48.0 <= 720.0);
        }
        assert!(ctx.timeline.is_empty());
    }

    #[test]
    fn threshold_freezes_button_and_schedules_letter() {
        let layout = desktop();
        let mut scene = scene(7, 1);
        let mut ctx = GlobalContext::new();
        scene.on_enter(&mut ctx, &layout);

        for _ in 0..6 {
            scene.handle_input(&InputEvent::CatchClick, &mut ctx, &layout);
        }
        ctx.take_commands();

        scene.handle_input(&InputEvent::CatchClick, &mut ctx, &layout);
        let commands = ctx.take_commands();
        assert!(commands.contains(&Command::set_text(Target::CatchButton, CAUGHT_LABEL)));
        assert!(button_position(&commands).is_none());
        assert_eq!(ctx.timeline.next_deadline(), Some(500));

        let after = scene.handle_input(&InputEvent::CatchClick, &mut ctx, &layout);
        assert_eq!(after, Handled::Ignored(IgnoreReason::AlreadyComplete));
        assert_eq!(scene.counter().count(), 7);
        assert_eq!(ctx.timeline.len(), 1);

        let hover = scene.handle_input(&InputEvent::CatchHover, &mut ctx, &layout);
        assert_eq!(hover, Handled::Ignored(IgnoreReason::AlreadyComplete));
    }

    #[test]
    fn hover_moves_without_counting_on_wide_viewports() {
        let layout = desktop();
        let mut scene = scene(5, 3);
        let mut ctx = GlobalContext::new();
        scene.on_enter(&mut ctx, &layout);
        ctx.take_commands();

        let handled = scene.handle_input(&InputEvent::CatchHover, &mut ctx, &layout);
        assert_eq!(handled, Handled::Consumed);
        assert!(button_position(&ctx.take_commands()).is_some());
        assert_eq!(scene.counter().count(), 0);
    }

    #[test]
    fn hover_is_disabled_on_narrow_viewports() {
        let layout = FixedLayout {
            viewport: Size::new(390.0, 844.0),
            button: Rect::new(0.0, 0.0, 120.0, 48.0),
        };
        let mut scene = scene(5, 3);
        let mut ctx = GlobalContext::new();
        scene.on_enter(&mut ctx, &layout);

        let handled = scene.handle_input(&InputEvent::CatchHover, &mut ctx, &layout);
        assert_eq!(handled, Handled::Ignored(IgnoreReason::HoverDisabled));
    }

    #[test]
    fn enter_hides_counter_and_places_button() {
        let layout = desktop();
        let mut scene = scene(5, 11);
        let mut ctx = GlobalContext::new();
        scene.on_enter(&mut ctx, &layout);

        let commands = ctx.take_commands();
        assert_eq!(commands[0], Command::add_class(Target::TapCounter, CLASS_HIDDEN));
        assert!(button_position(&commands).is_some());
    }

    #[test]
    fn letter_opens_over_the_scene_without_a_transition() {
        let layout = desktop();
        let mut scene = scene(5, 0);
        let mut ctx = GlobalContext::new();
        scene.on_step(SceneStep::OpenLetter, &mut ctx, &layout);

        assert_eq!(scene.letter().state(), LetterState::Open);
        assert_eq!(
            ctx.take_commands(),
            vec![Command::add_class(Target::LetterModal, CLASS_ACTIVE)]
        );
        assert!(!ctx.message_bus.has_messages::<SceneTransition>());
    }

    #[test]
    fn dismissing_the_letter_leaves_for_the_constellation() {
        let layout = desktop();
        let mut scene = scene(1, 0);
        let mut ctx = GlobalContext::new();

        let early = scene.handle_input(&InputEvent::CloseLetter, &mut ctx, &layout);
        assert_eq!(early, Handled::Ignored(IgnoreReason::NotReady));

        scene.handle_input(&InputEvent::CatchClick, &mut ctx, &layout);
        scene.on_step(SceneStep::OpenLetter, &mut ctx, &layout);
        ctx.take_commands();

        let handled = scene.handle_input(&InputEvent::CloseLetter, &mut ctx, &layout);
        assert_eq!(handled, Handled::Consumed);
        assert_eq!(ctx.timeline.len(), 2);

        scene.on_step(SceneStep::LeaveLetter, &mut ctx, &layout);
        assert_eq!(
            ctx.message_bus.read::<SceneTransition>(),
            &[SceneTransition::To(SceneId::Constellation)]
        );
    }
}
