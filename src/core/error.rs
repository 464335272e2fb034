//=========================================================================
// Core Errors
//=========================================================================
//
// Validation failures of the scene sequencer.
//
// Each failure leaves scene state untouched; callers log it and carry on,
// which keeps the page's observable "silently ignore" behaviour.
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::scene::SceneId;

//=== SequenceError =======================================================

/// Rejected scene transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequenceError {
    /// The identifier does not name any scene.
    #[error("unknown scene identifier `{0}`")]
    UnknownScene(String),

    /// The scene exists but was never registered with the manager.
    #[error("scene `{0}` is not registered")]
    SceneNotRegistered(SceneId),
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_scene() {
        let unknown = SequenceError::UnknownScene("scene9".to_string());
        assert_eq!(unknown.to_string(), "unknown scene identifier `scene9`");

        let missing = SequenceError::SceneNotRegistered(SceneId::WishingJar);
        assert_eq!(missing.to_string(), "scene `scene4` is not registered");
    }
}
