//=========================================================================
// Message Bus
//=========================================================================
//
// Typed queues connecting scenes to the engine.
//
// Scenes push `Command`s and `SceneTransition`s while handling input or
// animation steps; the engine takes them at the dispatch boundary.
//
//=========================================================================

//=== Module Declarations =================================================

mod message_bus;
mod message_queue;

//=== Public API ==========================================================

pub use message_bus::{Message, MessageBus};
