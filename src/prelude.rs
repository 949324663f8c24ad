//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use aetheric_stage::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine
pub use crate::engine::{Engine, EngineBuilder};
pub use crate::core::PlatformError;

// Scene system
pub use crate::core::scene::{
    DrawContext, Phase, RequestOutcome, RequestPolicy, Scene, SceneContext, SceneError, SceneKey,
    StageConfig, StageDirector, Target, Transition,
};

// Input
pub use crate::core::input::{InputEvent, KeyCode, Modifiers, MouseButton, StateTracker};

// Rendering
pub use crate::core::render::{Canvas, Color, DrawCommand, DrawList, Rect};

// Time
pub use crate::core::time::{Clock, ManualClock, Stopwatch, SystemClock};

// Effects
pub use crate::core::effect::{Easing, Effect, EffectScheduler};
