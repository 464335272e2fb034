//=========================================================================
// Event Collector
//=========================================================================
//
// Page event collector with bounded polling and shutdown detection.
//
// Architecture:
//   Receiver<PlatformEvent> → collect_frame() → inputs + audio failures
//                                             → TickControl
//
// Bounded polling keeps a burst of events from monopolising one pump;
// whatever is left over is picked up on the next one.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{Receiver, TryRecvError};
use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::PlatformEvent;
use crate::core::input::InputEvent;

/// Upper bound on events drained per pump.
pub const MAX_EVENTS_PER_FRAME: usize = 100;

//=== TickControl =========================================================

/// Update loop control signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    Continue,
    Exit,
}

//=== EventCollector ======================================================

/// Collects page events with bounded polling.
pub struct EventCollector {
    receiver: Receiver<PlatformEvent>,
    inputs: Vec<InputEvent>,
    audio_failures: Vec<String>,
    ticks: usize,
}

impl EventCollector {
    pub fn new(receiver: Receiver<PlatformEvent>) -> Self {
        Self {
            receiver,
            inputs: Vec::with_capacity(8),
            audio_failures: Vec::new(),
            ticks: 0,
        }
    }

    /// Collects pending events (bounded to prevent starvation).
    ///
    /// Events received before an `Unload` are still collected.
    pub fn collect_frame(&mut self) -> TickControl {
        self.inputs.clear();
        self.audio_failures.clear();
        self.ticks = 0;
        let mut drained = 0;

        while drained < MAX_EVENTS_PER_FRAME {
            match self.receiver.try_recv() {
                Ok(event) => {
                    drained += 1;
                    if self.handle_event(event) == TickControl::Exit {
                        return TickControl::Exit;
                    }
                }
                Err(TryRecvError::Disconnected) => return TickControl::Exit,
                Err(TryRecvError::Empty) => break,
            }
        }

        if drained >= MAX_EVENTS_PER_FRAME {
            warn!("Event queue backlog: drained {} events this frame", drained);
        }

        TickControl::Continue
    }

    /// Inputs collected this frame, in arrival order.
    pub fn inputs(&self) -> &[InputEvent] {
        &self.inputs
    }

    /// Takes ownership of the collected inputs, leaving an empty vec.
    pub fn take_inputs(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.inputs)
    }

    /// Takes the audio rejection messages collected this frame.
    pub fn take_audio_failures(&mut self) -> Vec<String> {
        std::mem::take(&mut self.audio_failures)
    }

    /// Number of timer wake-ups collected this frame.
    pub fn ticks(&self) -> usize {
        self.ticks
    }

    fn handle_event(&mut self, event: PlatformEvent) -> TickControl {
        match event {
            PlatformEvent::Input(input) => self.inputs.push(input),
            PlatformEvent::Tick => self.ticks += 1,
            PlatformEvent::AudioRejected(reason) => self.audio_failures.push(reason),
            PlatformEvent::Unload => {
                debug!("Unload received");
                return TickControl::Exit;
            }
        }
        TickControl::Continue
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    #[test]
    fn collect_handles_empty_queue() {
        let (_tx, rx) = unbounded::<PlatformEvent>();
        let mut collector = EventCollector::new(rx);

        assert_eq!(collector.collect_frame(), TickControl::Continue);
        assert!(collector.inputs().is_empty());
        assert_eq!(collector.ticks(), 0);
    }

    #[test]
    fn collect_sorts_events_by_kind() {
        let (tx, rx) = unbounded();
        let mut collector = EventCollector::new(rx);

        tx.send(PlatformEvent::Input(InputEvent::PageClick)).unwrap();
        tx.send(PlatformEvent::Tick).unwrap();
        tx.send(PlatformEvent::AudioRejected("NotAllowedError".into())).unwrap();
        tx.send(PlatformEvent::Input(InputEvent::CatchClick)).unwrap();

        assert_eq!(collector.collect_frame(), TickControl::Continue);
        assert_eq!(
            collector.inputs(),
            &[InputEvent::PageClick, InputEvent::CatchClick]
        );
        assert_eq!(collector.ticks(), 1);
        assert_eq!(collector.take_audio_failures(), vec!["NotAllowedError".to_string()]);
    }

    #[test]
    fn collect_clears_previous_frame() {
        let (tx, rx) = unbounded();
        let mut collector = EventCollector::new(rx);

        tx.send(PlatformEvent::Input(InputEvent::CloseLetter)).unwrap();
        collector.collect_frame();
        assert_eq!(collector.inputs().len(), 1);

        collector.collect_frame();
        assert!(collector.inputs().is_empty());
    }

    #[test]
    fn collect_is_bounded_per_frame() {
        let (tx, rx) = unbounded();
        let mut collector = EventCollector::new(rx);

        for _ in 0..MAX_EVENTS_PER_FRAME + 5 {
            tx.send(PlatformEvent::Input(InputEvent::CatchHover)).unwrap();
        }

        collector.collect_frame();
        assert_eq!(collector.inputs().len(), MAX_EVENTS_PER_FRAME);

        collector.collect_frame();
        assert_eq!(collector.inputs().len(), 5);
    }

    #[test]
    fn collect_returns_exit_on_unload() {
        let (tx, rx) = unbounded();
        let mut collector = EventCollector::new(rx);

        tx.send(PlatformEvent::Input(InputEvent::NextToJar)).unwrap();
        tx.send(PlatformEvent::Unload).unwrap();

        assert_eq!(collector.collect_frame(), TickControl::Exit);
        assert_eq!(collector.take_inputs(), vec![InputEvent::NextToJar]);
    }

    #[test]
    fn collect_returns_exit_on_disconnect() {
        let (tx, rx) = unbounded::<PlatformEvent>();
        let mut collector = EventCollector::new(rx);

        drop(tx);

        assert_eq!(collector.collect_frame(), TickControl::Exit);
    }
}
