//=========================================================================
// Time
//=========================================================================
//
// Monotonic time sources for the stage.
//
// Architecture:
//   Clock::now() ──(once per frame)──> StageDirector ──> ctx.now()
//                                                          ↓
//                                     Stopwatch / EffectScheduler
//
// All stage timing is "elapsed since clock origin" as a Duration. The
// director samples its clock exactly once per frame and hands that value
// to every scene and effect, so readings within a frame never disagree.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

//=== Clock Trait =========================================================

/// Monotonic elapsed-time source.
///
/// Implementations must never go backwards. `Send` so the director can be
/// moved onto the core thread.
pub trait Clock: Send {
    /// Time elapsed since this clock's origin.
    fn now(&self) -> Duration;
}

//=== SystemClock =========================================================

/// Wall-clock time source backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Creates a clock whose origin is the moment of construction.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

//=== ManualClock =========================================================

/// Deterministic clock advanced by hand.
///
/// Clones share the same underlying time, so a test can keep one handle
/// while the director owns another.
///
/// ```rust
/// # use aetheric_stage::core::time::{Clock, ManualClock};
/// # use std::time::Duration;
/// let clock = ManualClock::new();
/// let handle = clock.clone();
///
/// handle.advance(Duration::from_millis(250));
/// assert_eq!(clock.now(), Duration::from_millis(250));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    micros: Arc<AtomicU64>,
}

impl ManualClock {
    /// Creates a clock at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the clock forward by `delta`.
    pub fn advance(&self, delta: Duration) {
        self.micros.fetch_add(delta.as_micros() as u64, Ordering::SeqCst);
    }

    /// Jumps to an absolute time.
    ///
    /// # Panics
    ///
    /// Panics if `at` lies before the current time.
    pub fn set(&self, at: Duration) {
        let target = at.as_micros() as u64;
        let previous = self.micros.swap(target, Ordering::SeqCst);
        assert!(
            target >= previous,
            "ManualClock cannot go backwards ({}us -> {}us)",
            previous,
            target
        );
    }

    /// Jumps to an absolute time given in milliseconds.
    pub fn set_millis(&self, millis: u64) {
        self.set(Duration::from_millis(millis));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_micros(self.micros.load(Ordering::SeqCst))
    }
}

//=== Stopwatch ===========================================================

/// Frame-time stopwatch for scene-local timers.
///
/// Holds no clock of its own: every query takes the frame time from
/// `ctx.now()`. A stopwatch that was never started reads zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stopwatch {
    started_at: Option<Duration>,
}

impl Stopwatch {
    /// Creates a stopped stopwatch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a stopwatch already running from `now`.
    pub fn started(now: Duration) -> Self {
        Self {
            started_at: Some(now),
        }
    }

    /// Starts the stopwatch if it is not running yet.
    pub fn start(&mut self, now: Duration) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    /// Restarts from zero at `now`.
    pub fn restart(&mut self, now: Duration) {
        self.started_at = Some(now);
    }

    /// Stops and resets to zero.
    pub fn reset(&mut self) {
        self.started_at = None;
    }

    /// Returns `true` once started.
    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Elapsed time at `now` (zero if stopped).
    pub fn elapsed(&self, now: Duration) -> Duration {
        self.started_at
            .map(|start| now.saturating_sub(start))
            .unwrap_or(Duration::ZERO)
    }

    /// Elapsed whole milliseconds at `now`.
    pub fn millis(&self, now: Duration) -> u64 {
        self.elapsed(now).as_millis() as u64
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
