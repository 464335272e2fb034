//=========================================================================
// Wishing Jar Scene
//
// Scene 4: the wish is typed, turned into an orb and sent into the jar.
//
// Flow:
//   SubmitWish ── empty ──→ Alert, nothing else
//       │
//       └─ text ──→ SpawnOrb over the input, hide input + send button
//                        │ +orb_launch
//                        ↓
//                   LaunchOrb: orb moves to jar center and fades
//                        │ +orb_land
//                        ↓
//                   LandOrb: orb removed, final message shown
//
//=========================================================================

//=== External Crates =====================================================
use log::{debug, info, warn};

//=== Internal Modules ====================================================
use crate::core::globals::GlobalContext;
use crate::core::input::{Handled, IgnoreReason, InputEvent};
use crate::core::render::{px, Command, Layout, OrbId, Rect, Target, CLASS_HIDDEN};
use crate::core::scene::Scene;
use crate::core::timeline::{Millis, SceneStep};

/// Shown when the wish text is empty after trimming.
pub const EMPTY_WISH_ALERT: &str = "Please write a wish first!";

//=== WishFlight ==========================================================

/// Where the submitted wish currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WishFlight {
    /// Nothing submitted yet.
    Idle,

    /// Orb created and travelling toward the jar.
    InFlight(OrbId),

    /// Orb removed; final message shown.
    Landed,
}

//=== WishingJarScene =====================================================

/// Handler for scene 4.
pub struct WishingJarScene {
    flight: WishFlight,
    next_orb: OrbId,
    launch_delay: Millis,
    land_delay: Millis,
    orb_half_width: f64,
}

impl WishingJarScene {
    /// `land_delay` is measured from submission, like `launch_delay`.
    pub fn new(launch_delay: Millis, land_delay: Millis, orb_half_width: f64) -> Self {
        Self {
            flight: WishFlight::Idle,
            next_orb: 0,
            launch_delay,
            land_delay,
            orb_half_width,
        }
    }

    pub fn flight(&self) -> WishFlight {
        self.flight
    }

    fn submit(&mut self, text: &str, ctx: &mut GlobalContext, layout: &dyn Layout) -> Handled {
        if self.flight != WishFlight::Idle {
            return Handled::Ignored(IgnoreReason::AlreadyComplete);
        }

        if text.trim().is_empty() {
            ctx.emit(Command::Alert(EMPTY_WISH_ALERT.to_string()));
            return Handled::Ignored(IgnoreReason::EmptyWish);
        }

        let input = layout.rect(Target::WishInput).unwrap_or_else(|| {
            warn!("Wish input has no layout; spawning orb at origin");
            Rect::default()
        });

        let orb = self.next_orb;
        self.next_orb += 1;
        self.flight = WishFlight::InFlight(orb);

        ctx.emit(Command::SpawnOrb {
            orb,
            left: input.left + input.width / 2.0 - self.orb_half_width,
            top: input.top,
        });
        ctx.emit(Command::set_style(Target::WishInput, "display", "none"));
        ctx.emit(Command::set_style(Target::SendButton, "display", "none"));

        ctx.schedule(self.launch_delay, SceneStep::LaunchOrb(orb));
        ctx.schedule(self.land_delay, SceneStep::LandOrb(orb));

        info!("Wish submitted ({} chars)", text.trim().chars().count());
        Handled::Consumed
    }

    fn launch(&self, orb: OrbId, ctx: &mut GlobalContext, layout: &dyn Layout) {
        if self.flight != WishFlight::InFlight(orb) {
            debug!("Launch for stale orb {}", orb);
            return;
        }

        let jar = layout.rect(Target::Jar).unwrap_or_else(|| {
            warn!("Jar has no layout; orb falls to the top edge");
            Rect::default()
        });

        ctx.emit(Command::set_style(Target::Orb(orb), "top", px(jar.top + jar.height / 2.0)));
        ctx.emit(Command::set_style(Target::Orb(orb), "opacity", "0"));
    }

    fn land(&mut self, orb: OrbId, ctx: &mut GlobalContext) {
        if self.flight != WishFlight::InFlight(orb) {
            debug!("Landing for stale orb {}", orb);
            return;
        }
        self.flight = WishFlight::Landed;

        ctx.emit(Command::RemoveOrb(orb));
        ctx.emit(Command::remove_class(Target::FinalMessage, CLASS_HIDDEN));
        ctx.emit(Command::set_style(Target::FinalMessage, "opacity", "1"));
    }
}

impl Scene for WishingJarScene {
    fn handle_input(
        &mut self,
        input: &InputEvent,
        ctx: &mut GlobalContext,
        layout: &dyn Layout,
    ) -> Handled {
        match input {
            InputEvent::SubmitWish { text } => self.submit(text, ctx, layout),
            _ => Handled::Ignored(IgnoreReason::Unrelated),
        }
    }

    fn on_step(&mut self, step: SceneStep, ctx: &mut GlobalContext, layout: &dyn Layout) {
        match step {
            SceneStep::LaunchOrb(orb) => self.launch(orb, ctx, layout),
            SceneStep::LandOrb(orb) => self.land(orb, ctx),
            other => debug!("Wishing jar ignoring step {:?}", other),
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
