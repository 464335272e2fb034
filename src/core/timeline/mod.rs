//=========================================================================
// Timeline
//=========================================================================
//
// Animation-sequencing helper.
//
// Every delayed effect in the experience is a named `Step` with a due
// time. Handlers schedule steps instead of chaining timers; the engine
// fires due steps after the current input has been fully handled.
//
// Architecture:
//   Scene ── schedule(now, delay, step) ──→ Timeline
//                                              ↓
//   Experience ──────── pop_due(now) ←─────────┘
//                           ↓
//   SceneManager::dispatch_step() / hide_scene()
//
// Ordering: steps fire by due time, ties broken by scheduling order.
// There is no cancellation; stale steps are filtered by their owners.
//
//=========================================================================

//=== Module Declarations =================================================

mod clock;

//=== Public API ==========================================================

pub use clock::{Clock, Millis, VirtualClock};

//=== Internal Dependencies ===============================================

use crate::core::render::{LineId, OrbId};
use crate::core::scene::SceneId;

//=== SceneStep ===========================================================

/// Named animation steps owned by a single scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneStep {
    /// Catch scene finished; bring up the letter over it.
    OpenLetter,

    /// Letter dismissed; move on to the constellation.
    LeaveLetter,

    /// Start the opacity transition of a freshly drawn line.
    FadeInLine(LineId),

    /// All stars connected; show the finished constellation.
    RevealConstellation,

    /// Send the orb toward the jar.
    LaunchOrb(OrbId),

    /// Orb arrived; remove it and show the final message.
    LandOrb(OrbId),
}

impl SceneStep {
    /// Scene whose handler receives this step.
    pub fn owner(&self) -> SceneId {
        match self {
            Self::OpenLetter | Self::LeaveLetter => SceneId::Catch,
            Self::FadeInLine(_) | Self::RevealConstellation => SceneId::Constellation,
            Self::LaunchOrb(_) | Self::LandOrb(_) => SceneId::WishingJar,
        }
    }
}

//=== Step ================================================================

/// A scheduled unit of deferred work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// Fade-out window elapsed; hide the scene completely.
    HideScene(SceneId),

    /// Scene-specific animation step.
    Scene(SceneStep),
}

impl From<SceneStep> for Step {
    fn from(step: SceneStep) -> Self {
        Self::Scene(step)
    }
}

//=== Scheduled ===========================================================

/// A step together with the time it becomes due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scheduled {
    pub due: Millis,
    pub seq: u64,
    pub step: Step,
}

//=== Timeline ============================================================

/// Ordered set of pending steps.
#[derive(Debug, Default)]
pub struct Timeline {
    pending: Vec<Scheduled>,
    next_seq: u64,
}

impl Timeline {
    /// Creates an empty timeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `step` to fire `delay` milliseconds after `now`.
    ///
    /// Returns the absolute due time.
    pub fn schedule(&mut self, now: Millis, delay: Millis, step: impl Into<Step>) -> Millis {
        let due = now.saturating_add(delay);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Scheduled {
            due,
            seq,
            step: step.into(),
        });
        due
    }

    /// Removes and returns every step due at or before `now`, in firing order.
    #[cfg(test)]
    pub(crate) fn take_due(&mut self, now: Millis) -> Vec<Scheduled> {
        let (mut due, rest): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|s| s.due <= now);
        self.pending = rest;
        due.sort_by_key(|s| (s.due, s.seq));
        due
    }

    /// Removes and returns the earliest step due at or before `now`.
    ///
    /// Steps scheduled while earlier ones fire are picked up in order.
    pub fn pop_due(&mut self, now: Millis) -> Option<Scheduled> {
        let (index, _) = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, s)| s.due <= now)
            .min_by_key(|(_, s)| (s.due, s.seq))?;
        Some(self.pending.swap_remove(index))
    }

    /// Earliest pending due time, if any.
    pub fn next_deadline(&self) -> Option<Millis> {
        self.pending.iter().map(|s| s.due).min()
    }

    /// Number of pending steps.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns true if nothing is scheduled.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
