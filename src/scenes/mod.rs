//=========================================================================
// Scenes
//=========================================================================
//
// The four interaction handlers, in sequence order.
//
// Three of them are scenes with their own container. The letter modal is
// owned by the catch scene and opens over it.
//
// Each handler owns its progress state (tap counter, letter state, star
// cursor, orb flight) and talks to the page only through `Command`s and
// scheduled `SceneStep`s on the `GlobalContext`.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod catch_button;
pub mod constellation;
pub mod letter;
pub mod wishing_jar;

//=== Public API ==========================================================

pub use catch_button::{CatchScene, TapCounter};
pub use constellation::{ConstellationScene, StarSequence};
pub use letter::{LetterModal, LetterState};
pub use wishing_jar::{WishFlight, WishingJarScene};
