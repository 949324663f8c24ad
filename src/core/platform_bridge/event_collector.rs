//=========================================================================
// Event Collector
//=========================================================================
//
// Core-side drain of the platform channel, once per tick.
//
// Architecture:
//   Receiver<PlatformEvent> → collect_frame() → batches → TickControl
//
// Polling is bounded so a flood of input cannot starve the tick. The
// core loop does its own pacing, so an empty channel returns at once.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{Receiver, TryRecvError};
use log::{info, warn};

//=== Internal Dependencies ===============================================

use super::PlatformEvent;
use crate::core::input::InputEvent;

//=== TickControl =========================================================

/// Whether the core loop should run another tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TickControl {
    Continue,
    Exit,
}

//=== EventCollector ======================================================

pub(crate) struct EventCollector {
    receiver: Receiver<PlatformEvent>,
    batches: Vec<Vec<InputEvent>>,
}

impl EventCollector {
    const MAX_EVENTS_PER_FRAME: usize = 100;

    pub(crate) fn new(receiver: Receiver<PlatformEvent>) -> Self {
        Self {
            receiver,
            batches: Vec::with_capacity(4),
        }
    }

    /// Drains pending platform events into this tick's batches.
    ///
    /// Returns `Exit` when the window closed or the platform is gone.
    pub(crate) fn collect_frame(&mut self) -> TickControl {
        self.batches.clear();
        let mut drained = 0;

        while drained < Self::MAX_EVENTS_PER_FRAME {
            match self.receiver.try_recv() {
                Ok(PlatformEvent::Inputs(batch)) => {
                    if !batch.is_empty() {
                        self.batches.push(batch);
                    }
                    drained += 1;
                }
                Ok(PlatformEvent::WindowClosed) => {
                    info!(target: "core", "Window closed");
                    return TickControl::Exit;
                }
                Err(TryRecvError::Disconnected) => {
                    warn!(target: "core", "Platform channel disconnected");
                    return TickControl::Exit;
                }
                Err(TryRecvError::Empty) => break,
            }
        }

        if drained >= Self::MAX_EVENTS_PER_FRAME {
            warn!(target: "core", "Event backlog: drained {} batches this tick", drained);
        }

        TickControl::Continue
    }

    /// Batches collected by the last `collect_frame`.
    pub(crate) fn batches(&self) -> &[Vec<InputEvent>] {
        &self.batches
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
