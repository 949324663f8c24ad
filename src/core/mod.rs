//=========================================================================
// Core Systems Orchestrator
//=========================================================================
//
// Everything that runs on the logic (non-platform) thread.
//
// Architecture:
//   EventCollector ─batches─> StateTracker ─&input─> StageDirector
//                                                      │
//                                        Canvas <──────┘ drive_frame()
//
// Tick:
//   1. Drain platform events (exit on WindowClosed / disconnect)
//   2. Fold input batches into the state tracker
//   3. Drive one stage frame onto the canvas
//   4. Sleep out the rest of the tick
//
// The platform hears about a stage-initiated exit through `CoreEvent`,
// so the window closes when the game says so.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod effect;
pub mod input;
pub(crate) mod platform_bridge;
pub mod render;
pub mod scene;
pub mod time;

//=== External Dependencies ===============================================

use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::Sender;
use log::{debug, error, info};

//=== Internal Dependencies ===============================================

use input::StateTracker;
use platform_bridge::{CoreEvent, EventCollector, TickControl};
use render::Canvas;
use scene::{SceneKey, StageDirector};

//=== Public API ==========================================================

pub use platform_bridge::PlatformError;

//=== CoreSystemsOrchestrator =============================================

/// Owns the director, the input state and the canvas on the core thread.
pub(crate) struct CoreSystemsOrchestrator<K: SceneKey, D> {
    director: StageDirector<K, D>,
    input: StateTracker,
    canvas: Box<dyn Canvas>,
}

impl<K: SceneKey, D> CoreSystemsOrchestrator<K, D> {
    //--- Construction -----------------------------------------------------

    pub fn new(director: StageDirector<K, D>, canvas: Box<dyn Canvas>) -> Self {
        Self {
            director,
            input: StateTracker::new(),
            canvas,
        }
    }

    pub fn director_mut(&mut self) -> &mut StageDirector<K, D> {
        &mut self.director
    }

    pub fn director(&self) -> &StageDirector<K, D> {
        &self.director
    }

    //--- tick() -----------------------------------------------------------

    /// Runs one frame with the given input batches.
    pub fn tick(&mut self, batches: &[Vec<input::InputEvent>]) -> TickControl {
        self.input.advance_frame(batches);
        self.canvas.begin_frame();

        let outcome = self.director.drive_frame(&self.input, self.canvas.as_mut());
        self.canvas.end_frame();

        match outcome {
            Ok(true) => TickControl::Continue,
            Ok(false) => {
                info!(target: "core", "Stage finished");
                TickControl::Exit
            }
            Err(err) => {
                error!(target: "core", "Stage frame failed: {}", err);
                self.director.shutdown();
                TickControl::Exit
            }
        }
    }

    //--- spawn_core_thread() ----------------------------------------------

    /// Moves the orchestrator onto its own thread ticking at `tps`.
    ///
    /// The thread ends when the window closes or the stage exits. In the
    /// latter case `CoreEvent::Exited` is sent before returning.
    pub fn spawn_core_thread(
        mut self,
        mut collector: EventCollector,
        core_events: Sender<CoreEvent>,
        tps: f64,
    ) -> thread::JoinHandle<()>
    where
        D: Send + 'static,
    {
        let frame_duration = Duration::from_secs_f64(1.0 / tps);

        thread::spawn(move || {
            debug!(target: "core", "Core thread running at {} TPS", tps);

            loop {
                let frame_start = Instant::now();

                //--- Step 1: Gather platform events ------------------------
                if collector.collect_frame() == TickControl::Exit {
                    self.director.shutdown();
                    break;
                }

                //--- Step 2: Drive the stage -------------------------------
                if self.tick(collector.batches()) == TickControl::Exit {
                    if core_events.send(CoreEvent::Exited).is_err() {
                        debug!(target: "core", "Platform already gone");
                    }
                    break;
                }

                //--- Step 3: Maintain fixed pacing -------------------------
                let elapsed = frame_start.elapsed();
                if elapsed < frame_duration {
                    thread::sleep(frame_duration - elapsed);
                }
            }

            info!(
                target: "core",
                "Core thread exiting after {} frames",
                self.director.frame_count()
            );
        })
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
