//=========================================================================
// Scene Contexts
//=========================================================================
//
// What a scene can see and do during one call.
//
// SceneContext (init / update / dispose):
//   data: &mut D, input, now, change_scene(), exit()
//
// DrawContext (draw):
//   data: &D, input, now, canvas
//
// Both are rebuilt by the director for every call and borrow its state
// for that call only.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use log::warn;

//=== Internal Dependencies ===============================================

use super::registry::SceneRegistry;
use super::transition::TransitionOrchestrator;
use super::{Phase, RequestOutcome, SceneError, SceneKey, SceneTransition, Target, Transition};
use crate::core::input::StateTracker;
use crate::core::render::Canvas;

//=== SceneContext ========================================================

/// Mutable view of the stage handed to `init`, `update` and `dispose`.
pub struct SceneContext<'a, K: SceneKey, D> {
    /// Shared game data, alive for the whole run.
    pub data: &'a mut D,
    /// Input state for this frame.
    pub input: &'a StateTracker,
    now: Duration,
    current: Option<K>,
    orchestrator: &'a mut TransitionOrchestrator<K>,
    registry: &'a SceneRegistry<K, D>,
    fault: &'a mut Option<SceneError<K>>,
}

impl<'a, K: SceneKey, D> SceneContext<'a, K, D> {
    pub(crate) fn new(
        data: &'a mut D,
        input: &'a StateTracker,
        now: Duration,
        current: Option<K>,
        orchestrator: &'a mut TransitionOrchestrator<K>,
        registry: &'a SceneRegistry<K, D>,
        fault: &'a mut Option<SceneError<K>>,
    ) -> Self {
        Self {
            data,
            input,
            now,
            current,
            orchestrator,
            registry,
            fault,
        }
    }

    /// Frame time, identical for every call within a frame.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Key of the scene being called.
    pub fn current(&self) -> Option<K> {
        self.current
    }

    pub fn phase(&self) -> Phase {
        self.orchestrator.phase()
    }

    pub fn is_transitioning(&self) -> bool {
        self.orchestrator.is_transitioning()
    }

    /// Requests a fade to `key` with the stage's default timing.
    ///
    /// An unregistered key is reported as an error from the current
    /// frame's `drive_frame` and the request is discarded.
    pub fn change_scene(&mut self, key: K) -> RequestOutcome {
        let transition = self.orchestrator.default_transition();
        self.change_scene_with(key, transition)
    }

    pub fn change_scene_with(&mut self, key: K, transition: Transition) -> RequestOutcome {
        if !self.registry.contains(&key) {
            warn!(target: "stage", "Scene {:?} requested an unregistered scene {:?}", self.current, key);
            self.fault.get_or_insert(SceneError::UnknownScene(key));
            return RequestOutcome::Dropped;
        }

        self.orchestrator
            .request(SceneTransition::new(Target::Scene(key), transition), self.now)
    }

    /// Ends the run once the current scene has been disposed.
    pub fn exit(&mut self) -> RequestOutcome {
        self.orchestrator
            .request(SceneTransition::new(Target::Exit, Transition::instant()), self.now)
    }
}

//=== DrawContext =========================================================

/// Read-only view of the stage plus the canvas, handed to `draw`.
pub struct DrawContext<'a, D> {
    pub data: &'a D,
    pub input: &'a StateTracker,
    pub canvas: &'a mut dyn Canvas,
    now: Duration,
}

impl<'a, D> DrawContext<'a, D> {
    pub(crate) fn new(
        data: &'a D,
        input: &'a StateTracker,
        canvas: &'a mut dyn Canvas,
        now: Duration,
    ) -> Self {
        Self {
            data,
            input,
            canvas,
            now,
        }
    }

    /// Frame time, same value the frame's `update` saw.
    pub fn now(&self) -> Duration {
        self.now
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
