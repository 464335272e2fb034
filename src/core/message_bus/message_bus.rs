//=========================================================================
// Message Bus
//=========================================================================
//
// One queue per message type, keyed by `TypeId`.
//
// Architecture:
//   Scenes → push<M>() → HashMap<TypeId, Vec<M>>
//                              ↓
//   Experience ←── take<M>() at the dispatch boundary
//
// Pattern: push (N producers) → take → repeat
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::TypeId;
use std::collections::HashMap;

use log::error;

//=== Internal Dependencies ===============================================

use super::message_queue::MessageQueue;

//=== Public API ==========================================================

/// Marker trait for types carried by the bus.
pub trait Message: 'static {}

impl<T: 'static> Message for T {}

//=========================================================================

/// Type-keyed message queues.
#[derive(Default)]
pub struct MessageBus {
    queues: HashMap<TypeId, Box<dyn MessageQueue>>,
}

impl MessageBus {
    /// Creates an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    //--- Producers --------------------------------------------------------

    /// Appends a message to the queue for its type.
    pub fn push<M: Message>(&mut self, msg: M) {
        match self.queue_mut::<M>() {
            Some(queue) => queue.push(msg),
            None => error!(
                "MessageBus queue for {} has the wrong type",
                std::any::type_name::<M>()
            ),
        }
    }

    //--- Consumers --------------------------------------------------------

    /// Messages of type `M` currently queued, oldest first.
    pub fn read<M: Message>(&self) -> &[M] {
        self.queues
            .get(&TypeId::of::<M>())
            .and_then(|q| q.as_any().downcast_ref::<Vec<M>>())
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Removes and returns all messages of type `M`.
    pub fn take<M: Message>(&mut self) -> Vec<M> {
        self.queues
            .get_mut(&TypeId::of::<M>())
            .and_then(|q| q.as_any_mut().downcast_mut::<Vec<M>>())
            .map(std::mem::take)
            .unwrap_or_default()
    }

    //--- Query API --------------------------------------------------------

    pub fn has_messages<M: Message>(&self) -> bool {
        self.count::<M>() > 0
    }

    pub fn count<M: Message>(&self) -> usize {
        self.queues
            .get(&TypeId::of::<M>())
            .map(|q| q.len())
            .unwrap_or(0)
    }

    //--- Internal Helpers -------------------------------------------------

    fn queue_mut<M: Message>(&mut self) -> Option<&mut Vec<M>> {
        self.queues
            .entry(TypeId::of::<M>())
            .or_insert_with(|| Box::new(Vec::<M>::new()))
            .as_any_mut()
            .downcast_mut::<Vec<M>>()
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::render::{Command, Target, CLASS_HIDDEN};
    use crate::core::scene::{SceneId, SceneTransition};

    #[test]
    fn new_bus_is_empty() {
        let bus = MessageBus::new();
        assert!(!bus.has_messages::<Command>());
        assert!(bus.read::<Command>().is_empty());
    }

    #[test]
    fn queues_are_separate_per_type() {
        let mut bus = MessageBus::new();
        bus.push(Command::PlayMusic);
        bus.push(SceneTransition::To(SceneId::Constellation));
        bus.push(Command::add_class(Target::TapCounter, CLASS_HIDDEN));

        assert_eq!(bus.count::<Command>(), 2);
        assert_eq!(bus.count::<SceneTransition>(), 1);
        assert_eq!(bus.read::<Command>()[0], Command::PlayMusic);
    }

    #[test]
    fn take_drains_in_push_order() {
        let mut bus = MessageBus::new();
        bus.push(SceneTransition::To(SceneId::Constellation));
        bus.push(SceneTransition::To(SceneId::WishingJar));

        let taken = bus.take::<SceneTransition>();
        assert_eq!(
            taken,
            vec![
                SceneTransition::To(SceneId::Constellation),
                SceneTransition::To(SceneId::WishingJar),
            ]
        );
        assert!(!bus.has_messages::<SceneTransition>());
        assert!(bus.take::<SceneTransition>().is_empty());
    }

    #[test]
    fn take_of_unknown_type_is_empty() {
        let mut bus = MessageBus::new();
        assert!(bus.take::<u32>().is_empty());
    }

    #[test]
    fn take_leaves_other_types_queued() {
        let mut bus = MessageBus::new();
        bus.push(Command::PlayMusic);
        bus.push(7u32);

        assert_eq!(bus.take::<Command>(), vec![Command::PlayMusic]);
        assert_eq!(bus.read::<u32>(), &[7]);
    }
}
