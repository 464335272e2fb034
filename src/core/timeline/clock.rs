//=========================================================================
// Clock
//=========================================================================
//
// Time source for the timeline.
//
// The experience never reads wall-clock time directly. Every deadline is
// computed against a `Clock`, so tests can drive animation steps with a
// `VirtualClock` instead of waiting on real timers.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::Cell;
use std::rc::Rc;

//=== Millis ==============================================================

/// Milliseconds since the clock's origin.
pub type Millis = u64;

//=== Clock Trait =========================================================

/// Monotonic millisecond time source.
pub trait Clock {
    /// Returns the current time in milliseconds.
    fn now(&self) -> Millis;
}

//=== VirtualClock ========================================================

/// Manually advanced clock.
///
/// Clones share the same underlying time, so a test can keep one handle
/// while the experience owns another.
///
/// ```
/// use wishing_stars::core::timeline::{Clock, VirtualClock};
///
/// let clock = VirtualClock::new();
/// let handle = clock.clone();
/// handle.advance(250);
/// assert_eq!(clock.now(), 250);
/// ```
#[derive(Debug, Clone, Default)]
pub struct VirtualClock {
    now: Rc<Cell<Millis>>,
}

impl VirtualClock {
    /// Creates a clock starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves time forward by `delta` milliseconds.
    pub fn advance(&self, delta: Millis) {
        self.now.set(self.now.get().saturating_add(delta));
    }

    /// Jumps to an absolute time. Time never moves backwards.
    pub fn set(&self, at: Millis) {
        if at > self.now.get() {
            self.now.set(at);
        }
    }
}

impl Clock for VirtualClock {
    fn now(&self) -> Millis {
        self.now.get()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero() {
        assert_eq!(VirtualClock::new().now(), 0);
    }

    #[test]
    fn clones_share_time() {
        let clock = VirtualClock::new();
        let other = clock.clone();
        other.advance(800);
        assert_eq!(clock.now(), 800);
    }

    #[test]
    fn set_never_moves_backwards() {
        let clock = VirtualClock::new();
        clock.set(500);
        clock.set(100);
        assert_eq!(clock.now(), 500);
    }
}
