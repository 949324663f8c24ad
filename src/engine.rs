//=========================================================================
// Aetheric Stage Engine
//
// Entry point that wires a stage director to a window.
//
// Architecture:
// ```text
//     EngineBuilder  ──build(data)──>  Engine  ──init()──>  Engine  ──run()──>  [Runtime]
//         │                              │                                     │
//         ├─ with_tps()                  └─ owns StageDirector                 ├─ core thread
//         ├─ with_channel_capacity()                                           │   (director @ TPS)
//         ├─ with_window_title/size()                                          └─ platform
//         └─ with_fade_color() ...                                                 (winit, main thread)
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::marker::PhantomData;

use crossbeam_channel::{bounded, unbounded};
use log::{error, info};

//=== Internal Dependencies ===============================================

use crate::core::platform_bridge::{EventCollector, PlatformError};
use crate::core::render::{Canvas, Color, DrawList};
use crate::core::scene::{RequestPolicy, SceneError, SceneKey, StageConfig, StageDirector, Transition};
use crate::core::time::{Clock, SystemClock};
use crate::core::CoreSystemsOrchestrator;
use crate::platform::{Platform, WindowSettings};

//=== EngineBuilder =======================================================

/// Fluent configuration for an [`Engine`].
///
/// # Default Values
///
/// - **TPS**: 60.0
/// - **Channel capacity**: 128 batches
/// - **Window**: "Aetheric Stage", 1280×720
/// - **Stage**: white fade, 1000 ms out / 1000 ms in, [`RequestPolicy::Drop`]
/// - **Canvas**: a [`DrawList`]
///
/// # Examples
///
/// ```no_run
/// use aetheric_stage::prelude::*;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum Screen { Title }
/// impl SceneKey for Screen {}
///
/// struct Title;
/// impl Scene<Screen, ()> for Title {
///     fn update(&mut self, _ctx: &mut SceneContext<'_, Screen, ()>) {}
///     fn draw(&mut self, _ctx: &mut DrawContext<'_, ()>) {}
/// }
///
/// EngineBuilder::<Screen, ()>::new()
///     .with_tps(120.0)
///     .with_window_title("Title")
///     .with_fade_color(Color::BLACK)
///     .build(())
///     .init(|stage| stage.register_default(Screen::Title, || Title))?
///     .run()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct EngineBuilder<K: SceneKey, D> {
    tps: f64,
    channel_capacity: usize,
    window: WindowSettings,
    stage: StageConfig,
    canvas: Option<Box<dyn Canvas>>,
    _phantom: PhantomData<(K, D)>,
}

impl<K: SceneKey, D> EngineBuilder<K, D> {
    pub fn new() -> Self {
        Self {
            tps: 60.0,
            channel_capacity: 128,
            window: WindowSettings::default(),
            stage: StageConfig::default(),
            canvas: None,
            _phantom: PhantomData,
        }
    }

    //--- Runtime ----------------------------------------------------------

    /// Sets the core thread's ticks per second.
    ///
    /// # Panics
    ///
    /// Panics if `tps <= 0.0`.
    pub fn with_tps(mut self, tps: f64) -> Self {
        assert!(tps > 0.0, "TPS must be positive, got {}", tps);
        self.tps = tps;
        self
    }

    /// Sets how many input batches may wait between platform and core.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    //--- Window -----------------------------------------------------------

    pub fn with_window_title(mut self, title: impl Into<String>) -> Self {
        self.window.title = title.into();
        self
    }

    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        assert!(
            width > 0 && height > 0,
            "Window size must be positive, got {}x{}",
            width,
            height
        );
        self.window.width = width;
        self.window.height = height;
        self
    }

    //--- Stage ------------------------------------------------------------

    pub fn with_fade_color(mut self, color: Color) -> Self {
        self.stage.fade_color = color;
        self
    }

    pub fn with_default_transition(mut self, transition: Transition) -> Self {
        self.stage.default_transition = transition;
        self
    }

    pub fn with_request_policy(mut self, policy: RequestPolicy) -> Self {
        self.stage.request_policy = policy;
        self
    }

    /// Replaces the default [`DrawList`] with a real rendering backend.
    pub fn with_canvas<C>(mut self, canvas: C) -> Self
    where
        C: Canvas + 'static,
    {
        self.canvas = Some(Box::new(canvas));
        self
    }

    //--- Build ------------------------------------------------------------

    /// Builds an engine on the wall clock with `data` as the shared state.
    pub fn build(self, data: D) -> Engine<K, D> {
        self.build_with_clock(data, SystemClock::new())
    }

    /// Builds an engine driven by `clock`.
    pub fn build_with_clock<C>(self, data: D, clock: C) -> Engine<K, D>
    where
        C: Clock + 'static,
    {
        info!(
            "Building engine (TPS: {}, channel: {}, window: {}x{})",
            self.tps, self.channel_capacity, self.window.width, self.window.height
        );

        let canvas = self
            .canvas
            .unwrap_or_else(|| Box::new(DrawList::new()));

        Engine {
            orchestrator: CoreSystemsOrchestrator::new(
                StageDirector::with_config(data, clock, self.stage),
                canvas,
            ),
            tps: self.tps,
            channel_capacity: self.channel_capacity,
            window: self.window,
        }
    }
}

impl<K: SceneKey, D> Default for EngineBuilder<K, D> {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// A configured stage ready to run in a window.
///
/// ```text
/// Engine (Main Thread)
///   ├─► CoreSystemsOrchestrator (Core Thread @ TPS)
///   │     └─► StateTracker → StageDirector → Canvas
///   │
///   └─► Platform (winit event loop)
///         └─► Window, input batching
///
/// Channels: PlatformEvent (bounded) ──►   ◄── CoreEvent (unbounded)
/// ```
pub struct Engine<K: SceneKey, D> {
    orchestrator: CoreSystemsOrchestrator<K, D>,
    tps: f64,
    channel_capacity: usize,
    window: WindowSettings,
}

impl<K: SceneKey, D> Engine<K, D> {
    //--- Initialization ---------------------------------------------------

    /// Registers scenes and adjusts the director before running.
    ///
    /// # Errors
    ///
    /// Passes through whatever `init_fn` returns, typically
    /// [`SceneError::DuplicateKey`].
    pub fn init<F>(mut self, init_fn: F) -> Result<Self, SceneError<K>>
    where
        F: FnOnce(&mut StageDirector<K, D>) -> Result<(), SceneError<K>>,
    {
        info!("Initializing stage");
        init_fn(self.orchestrator.director_mut())?;
        info!(
            "Stage initialization complete ({} scenes)",
            self.orchestrator.director_mut().registry().len()
        );
        Ok(self)
    }

    pub fn director(&self) -> &StageDirector<K, D> {
        self.orchestrator.director()
    }

    //--- Execution --------------------------------------------------------

    /// Opens the window and blocks until it closes or the stage exits.
    ///
    /// # Lifecycle
    ///
    /// 1. Creates the platform → core and core → platform channels
    /// 2. Spawns the core thread at the configured TPS
    /// 3. Runs the platform event loop on this thread
    /// 4. Joins the core thread, which disposes the last scene
    ///
    /// # Errors
    ///
    /// [`PlatformError`] if the event loop or window could not be created.
    pub fn run(self) -> Result<(), PlatformError>
    where
        D: Send + 'static,
    {
        info!("Starting engine runtime (TPS: {})", self.tps);

        //--- 1. Create communication channels ----------------------------
        let (platform_tx, platform_rx) = bounded(self.channel_capacity);
        let (core_tx, core_rx) = unbounded();

        info!("Channels created (capacity: {})", self.channel_capacity);

        //--- 2. Spawn the core thread --------------------------------------
        let core_handle = self.orchestrator.spawn_core_thread(
            EventCollector::new(platform_rx),
            core_tx,
            self.tps,
        );
        info!("Core thread spawned");

        //--- 3. Launch the platform subsystem ------------------------------
        let result = Platform::new(self.window, platform_tx, core_rx).run();
        if let Err(err) = &result {
            error!("Platform error: {}", err);
        }

        info!("Platform event loop exited");

        //--- 4. Wait for the core thread -----------------------------------
        match core_handle.join() {
            Ok(()) => info!("Core thread terminated cleanly"),
            Err(panic) => error!("Core thread panicked: {:?}", panic),
        }

        info!("Engine shutdown complete");
        result
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
