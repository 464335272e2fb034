//=========================================================================
// Wishing Stars Library Root
//
// A four-scene greeting page: catch the button, read the letter, connect
// the constellation, send a wish into the jar.
//
// Responsibilities:
// - Expose the experience facade (`ExperienceBuilder`, `Experience`)
// - Keep the browser binding (`platform`) out of the public API
// - Separate the DOM-free core from the page it drives
//
// Typical usage (native, with a virtual clock):
// ```
// use wishing_stars::prelude::*;
//
// struct Page;
//
// impl Layout for Page {
//     fn viewport(&self) -> Size {
//         Size::new(1024.0, 768.0)
//     }
//     fn rect(&self, _target: Target) -> Option<Rect> {
//         Some(Rect::new(0.0, 0.0, 100.0, 40.0))
//     }
// }
//
// let clock = VirtualClock::new();
// let mut experience = ExperienceBuilder::new()
//     .with_tap_range(1..=1)
//     .build(clock.clone());
//
// experience.start(&Page).unwrap();
// experience.handle_input(&InputEvent::CatchClick, &Page);
//
// clock.advance(500);
// experience.advance(&Page);
//
// // The letter opens over the catch scene.
// let opened = experience.take_commands();
// assert!(opened.contains(&Command::add_class(Target::LetterModal, "active")));
// assert_eq!(experience.active_scene(), Some(SceneId::Catch));
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the sequencer, timeline, input routing and command model.
// `scenes` holds the four interaction handlers.
//
pub mod core;
pub mod prelude;
pub mod scenes;

//--- Internal Modules ----------------------------------------------------
//
// `platform` binds the experience to a real page (DOM listeners, timers,
// audio) and only exists on wasm32.
//
// `engine` defines the builder, the experience facade and the driver.
//
mod engine;
#[cfg(target_arch = "wasm32")]
mod platform;

//--- Public Exports ------------------------------------------------------

pub use crate::core::timeline::{Clock, VirtualClock};
pub use engine::{Driver, Experience, ExperienceBuilder, Pump};
