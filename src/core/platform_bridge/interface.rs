//=========================================================================
// Platform Bridge Interface
//=========================================================================
//
// Messages crossing the thread boundary, and platform failures.
//
//   platform ──PlatformEvent──> core     (bounded)
//   platform <──CoreEvent─────  core     (unbounded, rare)
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;
use winit::error::{EventLoopError, OsError};

//=== Internal Dependencies ===============================================

use crate::core::input::InputEvent;

//=== PlatformEvent =======================================================

/// Platform → core.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PlatformEvent {
    /// Input gathered since the previous redraw, in arrival order.
    Inputs(Vec<InputEvent>),

    /// The user or the OS closed the window.
    WindowClosed,
}

//=== CoreEvent ===========================================================

/// Core → platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CoreEvent {
    /// The stage exited on its own; the window should close.
    Exited,
}

//=== PlatformError =======================================================

/// Windowing failures. All are fatal for the run.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("event loop creation failed: {0}")]
    EventLoopCreation(#[source] EventLoopError),

    #[error("event loop error: {0}")]
    EventLoopExecution(#[source] EventLoopError),

    #[error("window creation failed: {0}")]
    WindowCreation(#[from] OsError),
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_error_is_std_error() {
        fn assert_error<T: std::error::Error + 'static>() {}
        assert_error::<PlatformError>();
    }

    #[test]
    fn events_compare_by_payload() {
        let a = PlatformEvent::Inputs(vec![InputEvent::mouse_moved(1.0, 2.0)]);
        assert_eq!(a.clone(), a);
        assert_ne!(a, PlatformEvent::WindowClosed);
    }
}
