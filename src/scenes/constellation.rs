//=========================================================================
// Constellation Scene
//
// Scene 3: connect the stars in rank order.
//
// Responsibilities:
// - Accept only the next expected rank; ignore everything else
// - Measure the clicked star element's center at click time
// - Draw a line from the previous match to the current one
// - Reveal the finished constellation and the "next" control once
//
// Notes:
// Out-of-order clicks are inert. They never reset progress.
//
//=========================================================================

//=== External Crates =====================================================
use log::{debug, info, warn};

//=== Internal Modules ====================================================
use crate::core::globals::GlobalContext;
use crate::core::input::{Handled, IgnoreReason, InputEvent};
use crate::core::render::{
    Command, Layout, LineId, Point, StarId, Target, CLASS_CONNECTED, CLASS_HIDDEN,
};
use crate::core::scene::{Scene, SceneId};
use crate::core::timeline::{Millis, SceneStep};

//=== StarSequence ========================================================
//
// Ordered-rank cursor over `total` stars. Ranks start at 1; the sequence
// is complete once the cursor has moved past `total`.
//
#[derive(Debug, Clone, PartialEq)]
pub struct StarSequence {
    total: u32,
    cursor: u32,
    last_center: Option<Point>,
    lines: u32,
}

/// A connecting segment between two matched stars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub line: LineId,
    pub from: Point,
    pub to: Point,
}

/// Progress made by a matching click.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarAdvance {
    /// Line to draw; `None` for the first star.
    pub segment: Option<Segment>,

    /// This click completed the sequence.
    pub completed: bool,
}

impl StarSequence {
    pub fn new(total: u32) -> Self {
        Self {
            total,
            cursor: 1,
            last_center: None,
            lines: 0,
        }
    }

    /// Offers a click on star `order` whose center is `center`.
    ///
    /// Mismatched ranks leave the sequence untouched.
    pub fn select(&mut self, order: u32, center: Point) -> Result<StarAdvance, IgnoreReason> {
        if self.is_complete() {
            return Err(IgnoreReason::AlreadyComplete);
        }
        if order != self.cursor {
            return Err(IgnoreReason::OutOfOrder {
                expected: self.cursor,
                got: order,
            });
        }

        let segment = self.last_center.map(|from| {
            let line = self.lines;
            self.lines += 1;
            Segment {
                line,
                from,
                to: center,
            }
        });

        self.last_center = Some(center);
        self.cursor += 1;

        Ok(StarAdvance {
            segment,
            completed: self.is_complete(),
        })
    }

    /// Next rank that will be accepted.
    pub fn cursor(&self) -> u32 {
        self.cursor
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    /// Number of stars matched so far.
    pub fn connected(&self) -> u32 {
        self.cursor - 1
    }

    pub fn lines_drawn(&self) -> u32 {
        self.lines
    }

    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.cursor > self.total
    }
}

//=== ConstellationScene ==================================================

/// Handler for scene 3.
pub struct ConstellationScene {
    stars: StarSequence,
    line_fade_delay: Millis,
    line_fade: Millis,
    reveal_delay: Millis,
    revealed: bool,
}

impl ConstellationScene {
    /// Lines start fading in `line_fade_delay` ms after they are drawn;
    /// the reveal follows the last star by `reveal_delay` ms.
    pub fn new(
        star_count: u32,
        line_fade_delay: Millis,
        line_fade: Millis,
        reveal_delay: Millis,
    ) -> Self {
        Self {
            stars: StarSequence::new(star_count),
            line_fade_delay,
            line_fade,
            reveal_delay,
            revealed: false,
        }
    }

    pub fn stars(&self) -> &StarSequence {
        &self.stars
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    fn select_star(
        &mut self,
        star: StarId,
        order: u32,
        ctx: &mut GlobalContext,
        layout: &dyn Layout,
    ) -> Handled {
        let target = Target::Star(star);
        let center = match layout.rect(target) {
            Some(rect) => rect.center(),
            None => {
                warn!("{} (rank {}) has no layout; using origin", target, order);
                Point::default()
            }
        };

        let advance = match self.stars.select(order, center) {
            Ok(advance) => advance,
            Err(reason) => {
                debug!("Star {} ignored: {:?}", order, reason);
                return Handled::Ignored(reason);
            }
        };

        ctx.emit(Command::add_class(target, CLASS_CONNECTED));

        if let Some(Segment { line, from, to }) = advance.segment {
            ctx.emit(Command::DrawLine { line, from, to });
            ctx.schedule(self.line_fade_delay, SceneStep::FadeInLine(line));
        }

        if advance.completed {
            info!("Constellation complete ({} stars)", self.stars.total());
            ctx.schedule(self.reveal_delay, SceneStep::RevealConstellation);
        }

        Handled::Consumed
    }

    fn reveal(&mut self, ctx: &mut GlobalContext) {
        if self.revealed {
            return;
        }
        self.revealed = true;

        ctx.emit(Command::set_style(Target::ConstellationInstruction, "opacity", "0"));
        ctx.emit(Command::remove_class(Target::ConstellationReveal, CLASS_HIDDEN));
        ctx.emit(Command::set_style(Target::ConstellationReveal, "opacity", "1"));
        ctx.emit(Command::remove_class(Target::NextButton, CLASS_HIDDEN));
    }
}

impl Scene for ConstellationScene {
    fn handle_input(
        &mut self,
        input: &InputEvent,
        ctx: &mut GlobalContext,
        layout: &dyn Layout,
    ) -> Handled {
        match input {
            InputEvent::StarClicked { star, order } => self.select_star(*star, *order, ctx, layout),
            InputEvent::NextToJar if self.revealed => {
                ctx.request_transition(SceneId::WishingJar);
                Handled::Consumed
            }
            InputEvent::NextToJar => Handled::Ignored(IgnoreReason::NotReady),
            _ => Handled::Ignored(IgnoreReason::Unrelated),
        }
    }

    fn on_step(&mut self, step: SceneStep, ctx: &mut GlobalContext, _layout: &dyn Layout) {
        match step {
            SceneStep::FadeInLine(line) => {
                let target = Target::ConstellationLine(line);
                ctx.emit(Command::set_style(
                    target,
                    "transition",
                    format!("opacity {}ms", self.line_fade),
                ));
                ctx.emit(Command::set_style(target, "opacity", "1"));
            }
            SceneStep::RevealConstellation => self.reveal(ctx),
            other => debug!("Constellation scene ignoring step {:?}", other),
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
