//=========================================================================
// Scene Errors
//=========================================================================
//
// Every variant is a programming error: registration mistakes or a
// request for a scene that was never registered. None are retryable.
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== SceneError ==========================================================

/// Fatal scene-system errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError<K> {
    /// A factory was registered twice under the same key.
    #[error("scene {0:?} is already registered")]
    DuplicateKey(K),

    /// A request or swap named a key with no registered factory.
    #[error("scene {0:?} is not registered")]
    UnknownScene(K),

    /// The director was started with an empty registry.
    #[error("no scenes are registered")]
    NoScenes,
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Key {
        Title,
    }

    #[test]
    fn display_names_the_key() {
        let err = SceneError::UnknownScene(Key::Title);
        assert_eq!(err.to_string(), "scene Title is not registered");

        let err = SceneError::DuplicateKey(Key::Title);
        assert_eq!(err.to_string(), "scene Title is already registered");
    }

    #[test]
    fn is_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<SceneError<Key>>();
    }
}
