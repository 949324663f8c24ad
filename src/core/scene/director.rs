//=========================================================================
// Stage Director
//=========================================================================
//
// Owns the registry, the shared data and the one active scene, and runs
// exactly one step of the scene state machine per frame.
//
// Architecture:
//   StageDirector
//     ├─ stage: Stage { registry, orchestrator, data, fault }
//     ├─ active: Option<ActiveScene>    (None before start / after exit)
//     └─ clock: Box<dyn Clock>          (sampled per frame and per request)
//
// Frame step:
//   drive_frame(input, canvas)
//     ├─ lazily start the initial scene
//     ├─ run the step for the current phase
//     ├─ surface any fault a scene recorded this frame
//     └─ Ok(false) once the stage has exited
//
// Teardown:
//   Every scene that was `init`ed gets exactly one `dispose`, whether it
//   leaves through a transition, an exit request, `shutdown` or `Drop`.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use log::{debug, error, info, trace};

//=== Internal Dependencies ===============================================

use super::context::{DrawContext, SceneContext};
use super::registry::SceneRegistry;
use super::transition::TransitionOrchestrator;
use super::{
    Phase, RequestOutcome, RequestPolicy, Scene, SceneError, SceneKey, SceneTransition, Target,
    Transition,
};
use crate::core::input::StateTracker;
use crate::core::render::{Canvas, Color};
use crate::core::time::Clock;

//=== StageConfig =========================================================

/// Stage-wide transition settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageConfig {
    /// Overlay colour for every fade.
    pub fade_color: Color,
    /// Timing used by `change_scene` without an explicit transition.
    pub default_transition: Transition,
    pub request_policy: RequestPolicy,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            fade_color: Color::WHITE,
            default_transition: Transition::default(),
            request_policy: RequestPolicy::Drop,
        }
    }
}

//=== Stage ===============================================================

/// Everything a scene call may borrow, kept apart from the active scene
/// so both can be borrowed at once.
struct Stage<K: SceneKey, D> {
    registry: SceneRegistry<K, D>,
    orchestrator: TransitionOrchestrator<K>,
    data: D,
    fault: Option<SceneError<K>>,
}

impl<K: SceneKey, D> Stage<K, D> {
    fn context<'a>(
        &'a mut self,
        input: &'a StateTracker,
        now: Duration,
        current: Option<K>,
    ) -> SceneContext<'a, K, D> {
        SceneContext::new(
            &mut self.data,
            input,
            now,
            current,
            &mut self.orchestrator,
            &self.registry,
            &mut self.fault,
        )
    }

    fn draw_context<'a>(
        &'a self,
        input: &'a StateTracker,
        canvas: &'a mut dyn Canvas,
        now: Duration,
    ) -> DrawContext<'a, D> {
        DrawContext::new(&self.data, input, canvas, now)
    }
}

struct ActiveScene<K: SceneKey, D> {
    key: K,
    scene: Box<dyn Scene<K, D>>,
}

//=== StageDirector =======================================================

/// Scene state machine with fade transitions.
///
/// # Example
///
/// ```rust
/// # use aetheric_stage::prelude::*;
/// # use std::time::Duration;
/// # #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// # enum Screen { Title, Game }
/// # impl SceneKey for Screen {}
/// # struct Blank;
/// # impl Scene<Screen, ()> for Blank {
/// #     fn update(&mut self, _ctx: &mut SceneContext<'_, Screen, ()>) {}
/// #     fn draw(&mut self, _ctx: &mut DrawContext<'_, ()>) {}
/// # }
/// let clock = ManualClock::new();
/// let mut director = StageDirector::new((), clock.clone());
/// director.register_default(Screen::Title, || Blank).unwrap();
/// director.register(Screen::Game, || Blank).unwrap();
///
/// let input = StateTracker::new();
/// let mut canvas = DrawList::new();
///
/// director.drive_frame(&input, &mut canvas).unwrap();
/// director.change_scene(Screen::Game).unwrap();
///
/// // Fade out until 1s, swap, then fade in until 2s.
/// for _ in 0..3 {
///     clock.advance(Duration::from_secs(1));
///     director.drive_frame(&input, &mut canvas).unwrap();
/// }
/// assert_eq!(director.current(), Some(Screen::Game));
/// assert_eq!(director.phase(), Phase::Running);
/// ```
pub struct StageDirector<K: SceneKey, D> {
    stage: Stage<K, D>,
    active: Option<ActiveScene<K, D>>,
    clock: Box<dyn Clock>,
    exited: bool,
    frames: u64,
}

impl<K: SceneKey, D> StageDirector<K, D> {
    //--- Construction -----------------------------------------------------

    /// Creates a director with the default [`StageConfig`].
    pub fn new<C>(data: D, clock: C) -> Self
    where
        C: Clock + 'static,
    {
        Self::with_config(data, clock, StageConfig::default())
    }

    pub fn with_config<C>(data: D, clock: C, config: StageConfig) -> Self
    where
        C: Clock + 'static,
    {
        Self {
            stage: Stage {
                registry: SceneRegistry::new(),
                orchestrator: TransitionOrchestrator::new(
                    config.request_policy,
                    config.default_transition,
                    config.fade_color,
                ),
                data,
                fault: None,
            },
            active: None,
            clock: Box::new(clock),
            exited: false,
            frames: 0,
        }
    }

    //--- Configuration ----------------------------------------------------

    pub fn set_fade_color(&mut self, color: Color) {
        self.stage.orchestrator.set_fade_color(color);
    }

    pub fn set_default_transition(&mut self, transition: Transition) {
        self.stage.orchestrator.set_default_transition(transition);
    }

    pub fn set_request_policy(&mut self, policy: RequestPolicy) {
        self.stage.orchestrator.set_policy(policy);
    }

    pub fn config(&self) -> StageConfig {
        let orchestrator = &self.stage.orchestrator;
        StageConfig {
            fade_color: orchestrator.fade_color(),
            default_transition: orchestrator.default_transition(),
            request_policy: orchestrator.policy(),
        }
    }

    //--- Registration -----------------------------------------------------

    /// Registers a scene factory under `key`.
    pub fn register<F, S>(&mut self, key: K, factory: F) -> Result<(), SceneError<K>>
    where
        F: Fn() -> S + Send + 'static,
        S: Scene<K, D> + 'static,
    {
        self.stage.registry.register(key, factory)
    }

    /// Registers `key` and makes it the initial scene.
    pub fn register_default<F, S>(&mut self, key: K, factory: F) -> Result<(), SceneError<K>>
    where
        F: Fn() -> S + Send + 'static,
        S: Scene<K, D> + 'static,
    {
        self.stage.registry.register(key, factory)?;
        self.stage.registry.set_initial(key)
    }

    //--- Starting ---------------------------------------------------------

    /// Activates the initial scene. Does nothing if a scene is already
    /// active.
    ///
    /// # Errors
    ///
    /// [`SceneError::NoScenes`] with an empty registry.
    pub fn start(&mut self) -> Result<(), SceneError<K>> {
        if self.active.is_some() || self.exited {
            return Ok(());
        }
        let key = self.stage.registry.initial().ok_or(SceneError::NoScenes)?;
        self.start_with(key)
    }

    /// Activates `key` immediately, without a fade.
    ///
    /// Any active scene is disposed first and any pending transition is
    /// cancelled.
    pub fn start_with(&mut self, key: K) -> Result<(), SceneError<K>> {
        if !self.stage.registry.contains(&key) {
            return Err(SceneError::UnknownScene(key));
        }

        let now = self.clock.now();
        let input = StateTracker::new();

        self.dispose_active(&input, now);
        self.stage.orchestrator.reset();
        self.exited = false;

        self.activate(key, now, &input)?;
        self.take_fault()
    }

    //--- Requests ---------------------------------------------------------

    /// Requests a fade to `key` with the default transition.
    ///
    /// # Errors
    ///
    /// [`SceneError::UnknownScene`] if `key` is not registered.
    pub fn change_scene(&mut self, key: K) -> Result<RequestOutcome, SceneError<K>> {
        let transition = self.stage.orchestrator.default_transition();
        self.change_scene_with(key, transition)
    }

    pub fn change_scene_with(
        &mut self,
        key: K,
        transition: Transition,
    ) -> Result<RequestOutcome, SceneError<K>> {
        if !self.stage.registry.contains(&key) {
            return Err(SceneError::UnknownScene(key));
        }
        if self.exited {
            return Ok(RequestOutcome::Dropped);
        }

        let now = self.clock.now();
        Ok(self
            .stage
            .orchestrator
            .request(SceneTransition::new(Target::Scene(key), transition), now))
    }

    /// Requests the stage to stop after disposing the active scene.
    pub fn request_exit(&mut self) -> RequestOutcome {
        if self.exited {
            return RequestOutcome::Dropped;
        }
        let now = self.clock.now();
        self.stage
            .orchestrator
            .request(SceneTransition::new(Target::Exit, Transition::instant()), now)
    }

    //--- Frame Step -------------------------------------------------------

    /// Runs one frame. Returns `Ok(false)` once the stage has exited.
    ///
    /// # Errors
    ///
    /// - [`SceneError::NoScenes`] if nothing is registered.
    /// - [`SceneError::UnknownScene`] if a scene asked for an unregistered
    ///   key during this frame.
    pub fn drive_frame(
        &mut self,
        input: &StateTracker,
        canvas: &mut dyn Canvas,
    ) -> Result<bool, SceneError<K>> {
        if self.exited {
            return Ok(false);
        }

        let now = self.clock.now();
        self.frames += 1;

        if self.active.is_none() {
            let key = self.stage.registry.initial().ok_or(SceneError::NoScenes)?;
            self.activate(key, now, input)?;
        }

        let phase = self.stage.orchestrator.phase();
        trace!(target: "stage", "Frame {} at {:?} in {:?}", self.frames, now, phase);

        match phase {
            Phase::Running => self.running_step(input, canvas, now),
            Phase::FadingOut => self.fade_out_step(input, canvas, now)?,
            Phase::Swapping => self.swap(input, now)?,
            Phase::Holding => self.hold_step(input, canvas, now),
            Phase::FadingIn => self.fade_in_step(input, canvas, now),
        }

        self.take_fault()?;
        Ok(!self.exited)
    }

    fn running_step(&mut self, input: &StateTracker, canvas: &mut dyn Canvas, now: Duration) {
        self.update_active(input, now);
        self.draw_active(input, canvas, now);
    }

    fn fade_out_step(
        &mut self,
        input: &StateTracker,
        canvas: &mut dyn Canvas,
        now: Duration,
    ) -> Result<(), SceneError<K>> {
        let opacity = self.stage.orchestrator.fade_out_opacity(now);

        self.draw_active(input, canvas, now);
        self.draw_overlay(canvas, opacity);

        if opacity >= 1.0 {
            self.swap(input, now)?;
        }
        Ok(())
    }

    fn hold_step(&mut self, input: &StateTracker, canvas: &mut dyn Canvas, now: Duration) {
        self.draw_active(input, canvas, now);
        self.draw_overlay(canvas, 1.0);
        self.stage.orchestrator.advance_hold(now);
    }

    fn fade_in_step(&mut self, input: &StateTracker, canvas: &mut dyn Canvas, now: Duration) {
        let opacity = self.stage.orchestrator.fade_in_opacity(now);

        self.update_active(input, now);
        self.draw_active(input, canvas, now);
        self.draw_overlay(canvas, opacity);

        if opacity <= 0.0 {
            debug!(target: "stage", "Transition to {:?} complete", self.current());
            if let Some(next) = self.stage.orchestrator.complete(now) {
                debug!(target: "stage", "Starting queued transition to {:?}", next.target);
            }
        }
    }

    /// Disposes the outgoing scene and brings in the target.
    ///
    /// A failed swap is fatal: the stage stops and the error is returned.
    fn swap(&mut self, input: &StateTracker, now: Duration) -> Result<(), SceneError<K>> {
        let Some(request) = self.stage.orchestrator.active().copied() else {
            self.stage.orchestrator.reset();
            return Ok(());
        };

        self.stage.orchestrator.begin_swap();
        self.dispose_active(input, now);

        match request.target {
            Target::Exit => {
                self.stage.orchestrator.reset();
                self.exited = true;
                info!(target: "stage", "Stage exited after {} frames", self.frames);
                Ok(())
            }
            Target::Scene(key) => {
                if let Err(err) = self.activate(key, now, input) {
                    error!(target: "stage", "Swap to {:?} failed: {}", key, err);
                    self.stage.orchestrator.reset();
                    self.exited = true;
                    return Err(err);
                }
                self.stage.orchestrator.finish_swap(now);
                Ok(())
            }
        }
    }

    //--- Scene Calls ------------------------------------------------------

    fn activate(
        &mut self,
        key: K,
        now: Duration,
        input: &StateTracker,
    ) -> Result<(), SceneError<K>> {
        let scene = self.stage.registry.instantiate(&key)?;
        let mut active = ActiveScene { key, scene };

        active.scene.init(&mut self.stage.context(input, now, Some(key)));
        self.active = Some(active);

        info!(target: "stage", "Scene {:?} activated", key);
        Ok(())
    }

    fn dispose_active(&mut self, input: &StateTracker, now: Duration) {
        if let Some(mut active) = self.active.take() {
            active
                .scene
                .dispose(&mut self.stage.context(input, now, Some(active.key)));
            info!(target: "stage", "Scene {:?} disposed", active.key);
        }
    }

    fn update_active(&mut self, input: &StateTracker, now: Duration) {
        if let Some(active) = self.active.as_mut() {
            active
                .scene
                .update(&mut self.stage.context(input, now, Some(active.key)));
        }
    }

    fn draw_active(&mut self, input: &StateTracker, canvas: &mut dyn Canvas, now: Duration) {
        if let Some(active) = self.active.as_mut() {
            active
                .scene
                .draw(&mut self.stage.draw_context(input, canvas, now));
        }
    }

    fn draw_overlay(&self, canvas: &mut dyn Canvas, opacity: f32) {
        if opacity > 0.0 {
            canvas.fill_overlay(self.stage.orchestrator.fade_color(), opacity);
        }
    }

    fn take_fault(&mut self) -> Result<(), SceneError<K>> {
        match self.stage.fault.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    //--- Shutdown ---------------------------------------------------------

    /// Disposes the active scene and stops the stage.
    ///
    /// Safe to call more than once. Also runs on drop.
    pub fn shutdown(&mut self) {
        if self.active.is_some() {
            let now = self.clock.now();
            self.dispose_active(&StateTracker::new(), now);
            info!(target: "stage", "Stage shut down after {} frames", self.frames);
        }
        self.stage.orchestrator.reset();
        self.stage.fault = None;
        self.exited = true;
    }

    //--- Accessors --------------------------------------------------------

    pub fn data(&self) -> &D {
        &self.stage.data
    }

    pub fn data_mut(&mut self) -> &mut D {
        &mut self.stage.data
    }

    /// Key of the active scene.
    pub fn current(&self) -> Option<K> {
        self.active.as_ref().map(|active| active.key)
    }

    pub fn phase(&self) -> Phase {
        self.stage.orchestrator.phase()
    }

    pub fn is_transitioning(&self) -> bool {
        self.stage.orchestrator.is_transitioning()
    }

    /// Overlay opacity drawn on the last frame.
    pub fn fade_opacity(&self) -> f32 {
        self.stage.orchestrator.opacity()
    }

    /// `false` once the stage has exited or been shut down.
    pub fn is_running(&self) -> bool {
        !self.exited
    }

    /// Number of `drive_frame` calls that ran a step.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Requests waiting under [`RequestPolicy::Queue`].
    pub fn queued_transitions(&self) -> usize {
        self.stage.orchestrator.queued()
    }

    pub fn registry(&self) -> &SceneRegistry<K, D> {
        &self.stage.registry
    }
}

impl<K: SceneKey, D> Drop for StageDirector<K, D> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::render::{DrawCommand, DrawList};
    use crate::core::time::ManualClock;
    use std::sync::{Arc, Mutex};

    //--- Test Helpers -----------------------------------------------------

    #[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
    enum Key {
        A,
        B,
        C,
        Missing,
    }

    impl SceneKey for Key {}

    /// Lifecycle log shared between the test and the scenes.
    #[derive(Clone, Default)]
    struct Journal(Arc<Mutex<Vec<String>>>);

    impl Journal {
        fn push(&self, entry: String) {
            self.0.lock().unwrap().push(entry);
        }

        fn entries(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }

        fn count(&self, prefix: &str) -> usize {
            self.entries().iter().filter(|e| e.starts_with(prefix)).count()
        }
    }

    struct Recorder {
        name: &'static str,
        request: Option<Key>,
    }

    impl Recorder {
        fn new(name: &'static str) -> Self {
            Self {
                name,
                request: None,
            }
        }

        fn requesting(name: &'static str, key: Key) -> Self {
            Self {
                name,
                request: Some(key),
            }
        }
    }

    impl Scene<Key, Journal> for Recorder {
        fn init(&mut self, ctx: &mut SceneContext<'_, Key, Journal>) {
            ctx.data
                .push(format!("init {} @{}", self.name, ctx.now().as_millis()));
        }

        fn update(&mut self, ctx: &mut SceneContext<'_, Key, Journal>) {
            ctx.data.push(format!("update {}", self.name));
            if let Some(key) = self.request {
                ctx.change_scene(key);
            }
        }

        fn draw(&mut self, ctx: &mut DrawContext<'_, Journal>) {
            ctx.canvas.text((0.0, 0.0), 10.0, self.name, Color::BLACK);
        }

        fn dispose(&mut self, ctx: &mut SceneContext<'_, Key, Journal>) {
            ctx.data
                .push(format!("dispose {} @{}", self.name, ctx.now().as_millis()));
        }
    }

    fn director(clock: &ManualClock) -> (StageDirector<Key, Journal>, Journal) {
        let journal = Journal::default();
        let config = StageConfig {
            default_transition: Transition::symmetric(Duration::from_millis(500)),
            ..StageConfig::default()
        };
        let mut director = StageDirector::with_config(journal.clone(), clock.clone(), config);
        director.register(Key::A, || Recorder::new("A")).unwrap();
        director.register(Key::B, || Recorder::new("B")).unwrap();
        director.register(Key::C, || Recorder::new("C")).unwrap();
        (director, journal)
    }

    fn frame(director: &mut StageDirector<Key, Journal>) -> DrawList {
        let mut canvas = DrawList::new();
        let input = StateTracker::new();
        director.drive_frame(&input, &mut canvas).unwrap();
        canvas
    }

    fn texts(canvas: &DrawList) -> Vec<String> {
        canvas
            .commands()
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    //--- Starting ---------------------------------------------------------

    #[test]
    fn first_frame_starts_initial_scene_before_update() {
        let clock = ManualClock::new();
        let (mut director, journal) = director(&clock);

        frame(&mut director);

        assert_eq!(director.current(), Some(Key::A));
        assert_eq!(journal.entries(), vec!["init A @0", "update A"]);
    }

    #[test]
    fn register_default_picks_initial() {
        let clock = ManualClock::new();
        let journal = Journal::default();
        let mut director = StageDirector::new(journal.clone(), clock);
        director.register(Key::A, || Recorder::new("A")).unwrap();
        director.register_default(Key::C, || Recorder::new("C")).unwrap();

        director.start().unwrap();

        assert_eq!(director.current(), Some(Key::C));
        assert_eq!(journal.count("init"), 1);
    }

    #[test]
    fn start_twice_is_noop() {
        let clock = ManualClock::new();
        let (mut director, journal) = director(&clock);

        director.start().unwrap();
        director.start().unwrap();

        assert_eq!(journal.count("init A"), 1);
    }

    #[test]
    fn empty_registry_reports_no_scenes() {
        let mut director = StageDirector::<Key, ()>::new((), ManualClock::new());
        let mut canvas = DrawList::new();

        assert_eq!(director.start(), Err(SceneError::NoScenes));
        assert_eq!(
            director.drive_frame(&StateTracker::new(), &mut canvas),
            Err(SceneError::NoScenes)
        );
    }

    #[test]
    fn duplicate_registration_fails() {
        let clock = ManualClock::new();
        let (mut director, _) = director(&clock);

        assert_eq!(
            director.register(Key::A, || Recorder::new("again")),
            Err(SceneError::DuplicateKey(Key::A))
        );
    }

    //--- Requests ---------------------------------------------------------

    #[test]
    fn unknown_target_is_rejected() {
        let clock = ManualClock::new();
        let (mut director, _) = director(&clock);
        frame(&mut director);

        assert_eq!(
            director.change_scene(Key::Missing),
            Err(SceneError::UnknownScene(Key::Missing))
        );
        assert_eq!(director.phase(), Phase::Running);
    }

    #[test]
    fn scene_side_unknown_target_surfaces_from_frame() {
        let clock = ManualClock::new();
        let journal = Journal::default();
        let mut director = StageDirector::new(journal, clock);
        director
            .register(Key::A, || Recorder::requesting("A", Key::Missing))
            .unwrap();

        let mut canvas = DrawList::new();
        let result = director.drive_frame(&StateTracker::new(), &mut canvas);

        assert_eq!(result, Err(SceneError::UnknownScene(Key::Missing)));
        assert_eq!(texts(&canvas), vec!["A"], "frame still drew");
        assert_eq!(director.phase(), Phase::Running);
    }

    //--- Transition Scenario ----------------------------------------------

    #[test]
    fn fade_scenario_with_500ms_fades() {
        let clock = ManualClock::new();
        let (mut director, journal) = director(&clock);

        frame(&mut director);
        assert_eq!(director.change_scene(Key::B), Ok(RequestOutcome::Armed));

        for t in (0..500).step_by(100) {
            clock.set_millis(t);
            let canvas = frame(&mut director);
            assert_eq!(director.phase(), Phase::FadingOut, "at {}ms", t);
            let overlay = canvas.last_overlay().unwrap_or(0.0);
            assert!((overlay - t as f32 / 500.0).abs() < 1e-6, "{} at {}ms", overlay, t);
            assert_eq!(texts(&canvas), vec!["A"]);
        }

        clock.set_millis(500);
        let canvas = frame(&mut director);
        assert_eq!(canvas.last_overlay(), Some(1.0));
        assert_eq!(director.phase(), Phase::FadingIn);
        assert_eq!(director.current(), Some(Key::B));

        for t in (600..1000).step_by(100) {
            clock.set_millis(t);
            frame(&mut director);
            assert_eq!(director.phase(), Phase::FadingIn, "at {}ms", t);
        }

        clock.set_millis(1000);
        frame(&mut director);
        assert_eq!(director.phase(), Phase::Running);

        clock.set_millis(1100);
        let canvas = frame(&mut director);
        assert_eq!(canvas.last_overlay(), None);
        assert_eq!(texts(&canvas), vec!["B"]);

        assert_eq!(journal.count("dispose A"), 1);
        assert_eq!(journal.count("init B"), 1);
        let entries = journal.entries();
        let dispose = entries.iter().position(|e| e == "dispose A @500");
        let init = entries.iter().position(|e| e == "init B @500");
        assert!(dispose.is_some() && init.is_some());
        assert!(dispose < init, "dispose before init: {:?}", entries);
    }

    #[test]
    fn scene_request_fades_from_the_requesting_frame() {
        let clock = ManualClock::new();
        let config = StageConfig {
            default_transition: Transition::symmetric(Duration::from_millis(500)),
            ..StageConfig::default()
        };
        let mut director = StageDirector::with_config(Journal::default(), clock.clone(), config);
        director
            .register_default(Key::A, || Recorder::requesting("A", Key::B))
            .unwrap();
        director.register(Key::B, || Recorder::new("B")).unwrap();

        for t in (0..500).step_by(100) {
            clock.set_millis(t);
            let canvas = frame(&mut director);
            assert_eq!(director.phase(), Phase::FadingOut, "at {}ms", t);
            assert_eq!(director.current(), Some(Key::A));
            let overlay = canvas.last_overlay().unwrap_or(0.0);
            assert!((overlay - t as f32 / 500.0).abs() < 1e-6, "{} at {}ms", overlay, t);
        }

        clock.set_millis(500);
        frame(&mut director);
        assert_eq!(director.phase(), Phase::FadingIn);
        assert_eq!(director.current(), Some(Key::B));

        clock.set_millis(900);
        frame(&mut director);
        assert_eq!(director.phase(), Phase::FadingIn);

        clock.set_millis(1000);
        frame(&mut director);
        assert_eq!(director.phase(), Phase::Running);
    }

    #[test]
    fn update_is_frozen_during_fade_out() {
        let clock = ManualClock::new();
        let (mut director, journal) = director(&clock);
        frame(&mut director);
        director.change_scene(Key::B).unwrap();

        frame(&mut director);
        clock.set_millis(100);
        let canvas = frame(&mut director);
        clock.set_millis(200);
        frame(&mut director);

        assert_eq!(journal.count("update A"), 1);
        assert!(matches!(
            canvas.commands(),
            [DrawCommand::Text { .. }, DrawCommand::Overlay { .. }]
        ));
    }

    #[test]
    fn repeated_requests_behave_like_one() {
        let clock = ManualClock::new();
        let (mut director, journal) = director(&clock);
        frame(&mut director);

        assert_eq!(director.change_scene(Key::B), Ok(RequestOutcome::Armed));
        assert_eq!(director.change_scene(Key::B), Ok(RequestOutcome::Dropped));
        assert_eq!(director.change_scene(Key::C), Ok(RequestOutcome::Dropped));

        for t in (0..=2000).step_by(50) {
            clock.set_millis(t);
            frame(&mut director);
        }

        assert_eq!(director.current(), Some(Key::B));
        assert_eq!(journal.count("init"), 2);
        assert_eq!(journal.count("dispose"), 1);
    }

    #[test]
    fn zero_durations_swap_on_next_frame_in_order() {
        let clock = ManualClock::new();
        let (mut director, journal) = director(&clock);
        frame(&mut director);

        director
            .change_scene_with(Key::B, Transition::instant())
            .unwrap();

        frame(&mut director);
        assert_eq!(director.current(), Some(Key::B));
        assert_eq!(director.phase(), Phase::FadingIn);

        frame(&mut director);
        assert_eq!(director.phase(), Phase::Running);

        let entries = journal.entries();
        assert_eq!(&entries[2..], &["dispose A @0", "init B @0", "update B"]);
    }

    #[test]
    fn hold_draws_new_scene_without_update() {
        let clock = ManualClock::new();
        let (mut director, journal) = director(&clock);
        frame(&mut director);

        let transition = Transition::symmetric(Duration::from_millis(100))
            .with_hold(Duration::from_millis(1000));
        director.change_scene_with(Key::B, transition).unwrap();

        frame(&mut director);
        clock.set_millis(100);
        frame(&mut director);
        assert_eq!(director.phase(), Phase::Holding);
        assert_eq!(director.current(), Some(Key::B));

        clock.set_millis(600);
        let canvas = frame(&mut director);
        assert_eq!(texts(&canvas), vec!["B"]);
        assert_eq!(canvas.last_overlay(), Some(1.0));
        assert_eq!(journal.count("update B"), 0);

        clock.set_millis(1100);
        frame(&mut director);
        assert_eq!(director.phase(), Phase::FadingIn);

        clock.set_millis(1150);
        let canvas = frame(&mut director);
        assert_eq!(canvas.last_overlay(), Some(0.5));
        assert_eq!(journal.count("update B"), 1);
    }

    #[test]
    fn fade_uses_configured_color() {
        let clock = ManualClock::new();
        let (mut director, _) = director(&clock);
        director.set_fade_color(Color::BLACK);
        frame(&mut director);
        director.change_scene(Key::B).unwrap();

        clock.set_millis(250);
        frame(&mut director);
        clock.set_millis(300);
        let canvas = frame(&mut director);

        assert!(canvas.commands().iter().any(|command| matches!(
            command,
            DrawCommand::Overlay { color, .. } if *color == Color::BLACK
        )));
    }

    //--- Queue Policy -----------------------------------------------------

    #[test]
    fn queue_policy_runs_requests_in_order() {
        let clock = ManualClock::new();
        let (mut director, journal) = director(&clock);
        director.set_request_policy(RequestPolicy::Queue);
        frame(&mut director);

        assert_eq!(director.change_scene(Key::B), Ok(RequestOutcome::Armed));
        assert_eq!(director.change_scene(Key::C), Ok(RequestOutcome::Queued));
        assert_eq!(director.change_scene(Key::A), Ok(RequestOutcome::Queued));
        assert_eq!(director.queued_transitions(), 2);

        for t in (0..=4000).step_by(50) {
            clock.set_millis(t);
            frame(&mut director);
        }

        let inits: Vec<String> = journal
            .entries()
            .into_iter()
            .filter(|e| e.starts_with("init"))
            .map(|e| e.split(" @").next().unwrap_or_default().to_owned())
            .collect();
        assert_eq!(inits, vec!["init A", "init B", "init C", "init A"]);
        assert_eq!(director.phase(), Phase::Running);
        assert_eq!(director.queued_transitions(), 0);
    }

    //--- Exit & Teardown --------------------------------------------------

    #[test]
    fn exit_disposes_and_stops() {
        let clock = ManualClock::new();
        let (mut director, journal) = director(&clock);
        frame(&mut director);

        assert_eq!(director.request_exit(), RequestOutcome::Armed);

        let mut canvas = DrawList::new();
        let input = StateTracker::new();
        assert_eq!(director.drive_frame(&input, &mut canvas), Ok(false));
        assert_eq!(director.drive_frame(&input, &mut canvas), Ok(false));

        assert!(!director.is_running());
        assert_eq!(director.current(), None);
        assert_eq!(journal.count("dispose A"), 1);
    }

    #[test]
    fn requests_after_exit_are_dropped() {
        let clock = ManualClock::new();
        let (mut director, _) = director(&clock);
        director.shutdown();

        assert_eq!(director.change_scene(Key::B), Ok(RequestOutcome::Dropped));
        assert_eq!(director.request_exit(), RequestOutcome::Dropped);
    }

    #[test]
    fn drop_disposes_active_scene() {
        let clock = ManualClock::new();
        let (mut director, journal) = director(&clock);
        frame(&mut director);

        drop(director);

        assert_eq!(journal.count("dispose A"), 1);
    }

    #[test]
    fn shutdown_is_idempotent() {
        let clock = ManualClock::new();
        let (mut director, journal) = director(&clock);
        frame(&mut director);

        director.shutdown();
        director.shutdown();
        drop(director);

        assert_eq!(journal.count("dispose"), 1);
    }

    #[test]
    fn start_with_replaces_active_scene() {
        let clock = ManualClock::new();
        let (mut director, journal) = director(&clock);
        director.start().unwrap();

        director.start_with(Key::C).unwrap();

        assert_eq!(director.current(), Some(Key::C));
        assert_eq!(
            journal.entries(),
            vec!["init A @0", "dispose A @0", "init C @0"]
        );
    }

    //--- Accessors --------------------------------------------------------

    #[test]
    fn data_is_shared_across_scenes() {
        let mut director = StageDirector::<Key, u32>::new(5, ManualClock::new());
        *director.data_mut() += 1;
        assert_eq!(*director.data(), 6);
    }
}
