//=========================================================================
// Transition Orchestrator
//=========================================================================
//
// Phase bookkeeping for fade transitions between scenes.
//
// Architecture:
//   request() ──Running──> arm() ──> FadingOut
//       │
//       └─(busy)─> Drop: discarded   Queue: TransitionQueue
//
//   FadingOut ─(opacity 1)─> Swapping ─┬─(hold > 0)─> Holding ─> FadingIn
//                                      └────────────────────────> FadingIn
//   FadingIn ─(opacity 0)─> Running ─> next queued request, if any
//
// The orchestrator only tracks phases, timing and opacity. It never
// touches scenes; the director reads the phase, calls into the scene and
// reports back (`begin_swap`, `finish_swap`, `complete`).
//
// Every phase is timed from a known instant: a fade-out from the frame
// time of its request, the hold or fade-in from the swap, a queued
// fade-out from the completion that armed it.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use log::{debug, trace};

//=== Internal Dependencies ===============================================

use super::{SceneKey, TransitionQueue};
use crate::core::render::Color;

//=== Phase ===============================================================

/// Where the stage is in the transition cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    /// Active scene updates and draws normally.
    #[default]
    Running,
    /// Update frozen; overlay rising towards opaque.
    FadingOut,
    /// Outgoing scene disposed, incoming built and initialised.
    Swapping,
    /// New scene drawn under an opaque overlay, not updated.
    Holding,
    /// New scene running; overlay falling towards transparent.
    FadingIn,
}

//=== Transition ==========================================================

/// Timing of one scene change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Transition {
    pub fade_out: Duration,
    pub hold: Duration,
    pub fade_in: Duration,
}

impl Transition {
    /// Fade out over `fade_out`, then in over `fade_in`, no hold.
    pub const fn fade(fade_out: Duration, fade_in: Duration) -> Self {
        Self {
            fade_out,
            hold: Duration::ZERO,
            fade_in,
        }
    }

    /// Same duration both ways.
    pub const fn symmetric(duration: Duration) -> Self {
        Self::fade(duration, duration)
    }

    /// Swap on the next frame with no visible fade.
    pub const fn instant() -> Self {
        Self::fade(Duration::ZERO, Duration::ZERO)
    }

    /// Keeps the screen covered for `hold` after the swap.
    pub const fn with_hold(mut self, hold: Duration) -> Self {
        self.hold = hold;
        self
    }
}

impl Default for Transition {
    fn default() -> Self {
        Self::symmetric(Duration::from_millis(1000))
    }
}

//=== Requests ============================================================

/// What to do with a request that arrives mid-transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestPolicy {
    /// First request wins; later ones are discarded.
    #[default]
    Drop,
    /// Later requests wait in FIFO order.
    Queue,
}

/// Where a transition leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target<K> {
    Scene(K),
    /// Tear down the active scene and stop.
    Exit,
}

/// A pending or in-flight scene change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneTransition<K> {
    pub target: Target<K>,
    pub transition: Transition,
}

impl<K> SceneTransition<K> {
    pub fn new(target: Target<K>, transition: Transition) -> Self {
        Self { target, transition }
    }
}

/// Result of a `change_scene` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// Transition started.
    Armed,
    /// Waiting behind the in-flight transition.
    Queued,
    /// Discarded because a transition is already in flight.
    Dropped,
}

//=== Opacity =============================================================

/// Overlay opacity `elapsed` into a fade-out of `duration`.
///
/// `clamp(elapsed / duration, 0, 1)`; a zero duration is already opaque.
pub fn fade_out_opacity(elapsed: Duration, duration: Duration) -> f32 {
    if duration.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f64() / duration.as_secs_f64()).clamp(0.0, 1.0) as f32
}

/// Overlay opacity `elapsed` into a fade-in of `duration`.
pub fn fade_in_opacity(elapsed: Duration, duration: Duration) -> f32 {
    1.0 - fade_out_opacity(elapsed, duration)
}

//=== TransitionOrchestrator ==============================================

pub(crate) struct TransitionOrchestrator<K: SceneKey> {
    phase: Phase,
    active: Option<SceneTransition<K>>,
    phase_started: Option<Duration>,
    queue: TransitionQueue<K>,
    policy: RequestPolicy,
    default_transition: Transition,
    fade_color: Color,
    opacity: f32,
}

impl<K: SceneKey> TransitionOrchestrator<K> {
    //--- Construction -----------------------------------------------------

    pub fn new(policy: RequestPolicy, default_transition: Transition, fade_color: Color) -> Self {
        Self {
            phase: Phase::Running,
            active: None,
            phase_started: None,
            queue: TransitionQueue::new(),
            policy,
            default_transition,
            fade_color,
            opacity: 0.0,
        }
    }

    //--- Accessors --------------------------------------------------------

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_transitioning(&self) -> bool {
        self.phase != Phase::Running
    }

    pub fn active(&self) -> Option<&SceneTransition<K>> {
        self.active.as_ref()
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    pub fn fade_color(&self) -> Color {
        self.fade_color
    }

    pub fn set_fade_color(&mut self, color: Color) {
        self.fade_color = color;
    }

    pub fn default_transition(&self) -> Transition {
        self.default_transition
    }

    pub fn set_default_transition(&mut self, transition: Transition) {
        self.default_transition = transition;
    }

    pub fn policy(&self) -> RequestPolicy {
        self.policy
    }

    /// Switching to `Drop` discards anything already queued.
    pub fn set_policy(&mut self, policy: RequestPolicy) {
        self.policy = policy;
        if policy == RequestPolicy::Drop {
            self.queue.clear();
        }
    }

    //--- Requests ---------------------------------------------------------

    /// Arms `request` if idle, otherwise applies the request policy.
    ///
    /// An armed fade-out is timed from `now`, the frame time of the call.
    pub fn request(&mut self, request: SceneTransition<K>, now: Duration) -> RequestOutcome {
        if !self.is_transitioning() {
            self.arm(request, now);
            return RequestOutcome::Armed;
        }

        match self.policy {
            RequestPolicy::Drop => {
                debug!(target: "stage", "Dropped {:?}: transition in flight", request.target);
                RequestOutcome::Dropped
            }
            RequestPolicy::Queue => {
                self.queue.push(request);
                debug!(
                    target: "stage",
                    "Queued {:?} ({} waiting)",
                    request.target,
                    self.queue.len()
                );
                RequestOutcome::Queued
            }
        }
    }

    fn arm(&mut self, request: SceneTransition<K>, now: Duration) {
        debug!(
            target: "stage",
            "Transition to {:?} armed (out {:?}, hold {:?}, in {:?})",
            request.target,
            request.transition.fade_out,
            request.transition.hold,
            request.transition.fade_in
        );
        self.active = Some(request);
        self.enter(Phase::FadingOut, Some(now));
    }

    //--- Phase Stepping ---------------------------------------------------

    /// Fade-out opacity at `now`.
    pub fn fade_out_opacity(&mut self, now: Duration) -> f32 {
        let duration = self.timing().fade_out;
        let elapsed = self.elapsed(now);
        self.opacity = fade_out_opacity(elapsed, duration);
        self.opacity
    }

    /// Marks the swap as started. Scene teardown and setup happen next.
    pub fn begin_swap(&mut self) {
        self.opacity = 1.0;
        self.enter(Phase::Swapping, None);
    }

    /// New scene is live. Moves on to `Holding` or `FadingIn` from `now`.
    pub fn finish_swap(&mut self, now: Duration) {
        if self.timing().hold.is_zero() {
            self.enter(Phase::FadingIn, Some(now));
        } else {
            self.enter(Phase::Holding, Some(now));
        }
    }

    /// Ends the hold once it has lasted its full duration.
    ///
    /// The fade-in is timed from the exact end of the hold, not from the
    /// frame that noticed it.
    pub fn advance_hold(&mut self, now: Duration) {
        let hold = self.timing().hold;
        let started = *self.phase_started.get_or_insert(now);
        self.opacity = 1.0;

        if now.saturating_sub(started) >= hold {
            self.enter(Phase::FadingIn, Some(started + hold));
        }
    }

    /// Fade-in opacity at `now`.
    pub fn fade_in_opacity(&mut self, now: Duration) -> f32 {
        let duration = self.timing().fade_in;
        let elapsed = self.elapsed(now);
        self.opacity = fade_in_opacity(elapsed, duration);
        self.opacity
    }

    /// Back to `Running`. Under the queue policy the next waiting request
    /// is armed at `now` and returned.
    pub fn complete(&mut self, now: Duration) -> Option<SceneTransition<K>> {
        self.active = None;
        self.opacity = 0.0;
        self.enter(Phase::Running, None);

        let next = self.queue.pop_front()?;
        self.arm(next, now);
        Some(next)
    }

    /// Forgets the in-flight transition and anything queued.
    pub fn reset(&mut self) {
        self.active = None;
        self.queue.clear();
        self.opacity = 0.0;
        self.enter(Phase::Running, None);
    }

    //--- Internal Helpers -------------------------------------------------

    fn enter(&mut self, phase: Phase, started: Option<Duration>) {
        trace!(target: "stage", "Phase {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
        self.phase_started = started;
    }

    fn elapsed(&mut self, now: Duration) -> Duration {
        let started = *self.phase_started.get_or_insert(now);
        now.saturating_sub(started)
    }

    fn timing(&self) -> Transition {
        self.active
            .map(|request| request.transition)
            .unwrap_or_else(Transition::instant)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
