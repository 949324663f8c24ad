//=========================================================================
// Scene System
//=========================================================================
//
// Scene lifecycle, registry and fade transitions.
//
// Architecture:
//   StageDirector
//     ├─ registry: SceneRegistry<K, D>     (key → factory)
//     ├─ orchestrator: TransitionOrchestrator<K>
//     │     └─ queue: TransitionQueue<K>   (RequestPolicy::Queue only)
//     ├─ data: D                           (shared across scenes)
//     └─ active: Box<dyn Scene<K, D>>      (one at a time)
//
// Flow (one call per frame):
//   drive_frame() ─┬─ Running   → update() + draw()
//                  ├─ FadingOut → draw() + overlay ↑
//                  ├─ Swapping  → dispose() old, factory + init() new
//                  ├─ Holding   → draw() + opaque overlay
//                  └─ FadingIn  → update() + draw() + overlay ↓
//
//=========================================================================

//=== Module Declarations =================================================

mod context;
mod director;
mod error;
mod registry;
mod transition;
mod transition_queue;

//=== External Dependencies ===============================================

use std::fmt::Debug;
use std::hash::Hash;

//=== Public API ==========================================================

pub use context::{DrawContext, SceneContext};
pub use director::{StageConfig, StageDirector};
pub use error::SceneError;
pub use registry::{SceneFactory, SceneRegistry};
pub use transition::{
    fade_in_opacity, fade_out_opacity, Phase, RequestOutcome, RequestPolicy, SceneTransition,
    Target, Transition,
};
pub use transition_queue::TransitionQueue;

//=== Scene Key Trait =====================================================

/// Marker trait for scene identifiers.
///
/// Keys identify factories in the registry and name transition targets.
/// Typically implemented by a game-specific enum.
pub trait SceneKey: Clone + Copy + Eq + Hash + Debug + Send + 'static {}

//=== Scene Trait =========================================================

/// One screen of the game.
///
/// A fresh instance is built by the scene's factory on every activation
/// and dropped after `dispose`, so scene-local state never leaks from one
/// visit to the next.
///
/// # Lifecycle
///
/// ```text
/// factory() → init() → [update() + draw()]* → dispose() → drop
/// ```
///
/// `update` is frozen while the scene fades out; `draw` keeps running so
/// the last image stays on screen under the overlay.
///
/// # Minimal Implementation
///
/// ```rust
/// # use aetheric_stage::prelude::*;
/// # #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// # enum Screen { Title, Game }
/// # impl SceneKey for Screen {}
/// struct Title;
///
/// impl Scene<Screen, u32> for Title {
///     fn update(&mut self, ctx: &mut SceneContext<'_, Screen, u32>) {
///         if ctx.input.is_key_pressed(KeyCode::Enter) {
///             ctx.change_scene(Screen::Game);
///         }
///     }
///
///     fn draw(&mut self, ctx: &mut DrawContext<'_, u32>) {
///         ctx.canvas.text((640.0, 200.0), 72.0, "Title", Color::WHITE);
///     }
/// }
/// ```
pub trait Scene<K: SceneKey, D>: Send {
    /// Called once, right after construction and before the first update.
    fn init(&mut self, _ctx: &mut SceneContext<'_, K, D>) {}

    /// Per-frame logic. May request a scene change.
    fn update(&mut self, ctx: &mut SceneContext<'_, K, D>);

    /// Per-frame drawing.
    ///
    /// Takes `&mut self` so cosmetic state (effects, animations) can
    /// advance while `update` is frozen during a fade-out.
    fn draw(&mut self, ctx: &mut DrawContext<'_, D>);

    /// Called exactly once when the scene is left, on every exit path.
    ///
    /// Release anything acquired in `init` here.
    fn dispose(&mut self, _ctx: &mut SceneContext<'_, K, D>) {}
}
