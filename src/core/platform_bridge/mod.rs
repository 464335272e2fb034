//=========================================================================
// Platform Bridge
//=========================================================================
//
// Bridges the page binding (DOM listeners, timers, audio) with the
// experience.
//
// The binding only ever sends `PlatformEvent`s into a channel and applies
// the `Command`s it gets back, so the experience runs unchanged under
// native tests and in the browser.
//
// Components:
// - `interface`: Event types and error definitions (the contract)
// - `event_collector`: Experience-side draining of the channel
//
//=========================================================================

//=== Module Declarations =================================================

pub mod event_collector;
pub mod interface;

//=== Public API ==========================================================

pub use event_collector::{EventCollector, TickControl, MAX_EVENTS_PER_FRAME};
pub use interface::{PlatformError, PlatformEvent};
