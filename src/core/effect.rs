//=========================================================================
// Effect Scheduler
//=========================================================================
//
// Fire-and-forget, self-expiring visual effects.
//
// Architecture:
//   add(now, effect) → Vec<(started_at, Box<dyn Effect>)>
//                              ↓
//   update(now, canvas) → effect.update(now - started_at, canvas)
//                              ↓
//                      false → removed this frame
//
// Effects draw inside their own update call, so draw order is insertion
// order and cannot be re-sorted. Every effect sees its own age, never the
// global time.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use log::trace;

//=== Internal Dependencies ===============================================

use crate::core::render::Canvas;

//=== Effect Trait ========================================================

/// A short-lived cosmetic animation.
///
/// `update` receives the seconds elapsed since the effect was added, draws
/// the effect for that instant and returns whether it should keep running.
///
/// Closures of the shape `FnMut(f64, &mut dyn Canvas) -> bool` are effects:
///
/// ```rust
/// # use aetheric_stage::core::effect::EffectScheduler;
/// # use aetheric_stage::core::render::{Color, DrawList};
/// # use std::time::Duration;
/// let mut effects = EffectScheduler::new();
/// effects.add(Duration::ZERO, |t: f64, canvas: &mut dyn aetheric_stage::core::render::Canvas| {
///     canvas.circle((100.0, 100.0), 10.0 + t as f32 * 40.0, Color::WHITE);
///     t < 0.5
/// });
///
/// let mut canvas = DrawList::new();
/// effects.update(Duration::from_millis(100), &mut canvas);
/// assert_eq!(effects.len(), 1);
/// ```
pub trait Effect: Send {
    fn update(&mut self, elapsed_secs: f64, canvas: &mut dyn Canvas) -> bool;
}

impl<F> Effect for F
where
    F: FnMut(f64, &mut dyn Canvas) -> bool + Send,
{
    fn update(&mut self, elapsed_secs: f64, canvas: &mut dyn Canvas) -> bool {
        self(elapsed_secs, canvas)
    }
}

//=== EffectScheduler =====================================================

struct ScheduledEffect {
    started_at: Duration,
    effect: Box<dyn Effect>,
}

/// Owns a scene's running effects and retires them once they finish.
///
/// Unbounded and unpooled: each effect is boxed on `add` and dropped on
/// the frame it reports completion.
#[derive(Default)]
pub struct EffectScheduler {
    effects: Vec<ScheduledEffect>,
}

impl EffectScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts `effect` at frame time `now`.
    pub fn add<E>(&mut self, now: Duration, effect: E)
    where
        E: Effect + 'static,
    {
        self.effects.push(ScheduledEffect {
            started_at: now,
            effect: Box::new(effect),
        });
    }

    /// Advances and draws every effect, dropping the finished ones.
    ///
    /// Survivors keep their relative order.
    pub fn update(&mut self, now: Duration, canvas: &mut dyn Canvas) {
        let before = self.effects.len();

        self.effects.retain_mut(|scheduled| {
            let elapsed = now.saturating_sub(scheduled.started_at).as_secs_f64();
            scheduled.effect.update(elapsed, canvas)
        });

        let retired = before - self.effects.len();
        if retired > 0 {
            trace!(target: "stage::effect", "Retired {} effects, {} active", retired, self.effects.len());
        }
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Drops every effect without a final update.
    pub fn clear(&mut self) {
        self.effects.clear();
    }
}

impl std::fmt::Debug for EffectScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectScheduler")
            .field("active", &self.effects.len())
            .finish()
    }
}

//=== Easing ==============================================================

/// Easing curves for effect animation.
///
/// Input and output are both normalised progress in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Easing {
    #[default]
    Linear,
    QuadIn,
    QuadOut,
    ExpoIn,
    ExpoOut,
}

impl Easing {
    /// Applies the curve to `t` (clamped to `[0, 1]`).
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadIn => t * t,
            Easing::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::ExpoIn => {
                if t == 0.0 {
                    0.0
                } else {
                    2f64.powf(10.0 * (t - 1.0))
                }
            }
            Easing::ExpoOut => {
                if t == 1.0 {
                    1.0
                } else {
                    1.0 - 2f64.powf(-10.0 * t)
                }
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::render::{Color, DrawList};
    use std::sync::{Arc, Mutex};

    //--- Test Helpers -----------------------------------------------------

    /// Effect that logs every update it receives and ends at `lifetime`.
    struct Tracer {
        id: u32,
        lifetime: f64,
        log: Arc<Mutex<Vec<(u32, f64)>>>,
    }

    impl Effect for Tracer {
        fn update(&mut self, elapsed_secs: f64, canvas: &mut dyn Canvas) -> bool {
            self.log.lock().unwrap().push((self.id, elapsed_secs));
            canvas.circle((0.0, 0.0), 1.0, Color::WHITE);
            elapsed_secs < self.lifetime
        }
    }

    fn tracer(id: u32, lifetime: f64, log: &Arc<Mutex<Vec<(u32, f64)>>>) -> Tracer {
        Tracer {
            id,
            lifetime,
            log: Arc::clone(log),
        }
    }

    fn at(secs: f64) -> Duration {
        Duration::from_secs_f64(secs)
    }

    //--- Scheduler --------------------------------------------------------

    #[test]
    fn effect_runs_until_it_reports_completion() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut effects = EffectScheduler::new();
        let mut canvas = DrawList::new();

        effects.add(at(0.0), tracer(1, 2.0, &log));

        for frame in 0..=5 {
            effects.update(at(frame as f64 * 0.5), &mut canvas);
        }

        let updates = log.lock().unwrap();
        assert_eq!(updates.len(), 5, "updated at 0.0, 0.5, 1.0, 1.5 and 2.0");
        assert_eq!(updates.last().map(|(_, t)| *t), Some(2.0));
        assert!(effects.is_empty());
    }

    #[test]
    fn each_effect_sees_its_own_age() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut effects = EffectScheduler::new();
        let mut canvas = DrawList::new();

        effects.add(at(0.0), tracer(1, 10.0, &log));
        effects.add(at(1.0), tracer(2, 10.0, &log));
        effects.update(at(1.5), &mut canvas);

        let updates = log.lock().unwrap();
        assert_eq!(*updates, vec![(1, 1.5), (2, 0.5)]);
    }

    #[test]
    fn removal_preserves_order_of_survivors() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut effects = EffectScheduler::new();
        let mut canvas = DrawList::new();

        effects.add(at(0.0), tracer(1, 5.0, &log));
        effects.add(at(0.0), tracer(2, 0.1, &log));
        effects.add(at(0.0), tracer(3, 5.0, &log));

        effects.update(at(1.0), &mut canvas);
        assert_eq!(effects.len(), 2);

        log.lock().unwrap().clear();
        effects.update(at(2.0), &mut canvas);

        let ids: Vec<u32> = log.lock().unwrap().iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn removed_effect_is_never_updated_again() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut effects = EffectScheduler::new();
        let mut canvas = DrawList::new();

        effects.add(at(0.0), tracer(7, 0.0, &log));
        effects.update(at(0.0), &mut canvas);
        effects.update(at(0.1), &mut canvas);
        effects.update(at(0.2), &mut canvas);

        assert_eq!(log.lock().unwrap().len(), 1);
    }

    #[test]
    fn effects_draw_in_insertion_order() {
        let mut effects = EffectScheduler::new();
        let mut canvas = DrawList::new();

        effects.add(at(0.0), |_: f64, c: &mut dyn Canvas| {
            c.text((0.0, 0.0), 10.0, "first", Color::WHITE);
            true
        });
        effects.add(at(0.0), |_: f64, c: &mut dyn Canvas| {
            c.text((0.0, 0.0), 10.0, "second", Color::WHITE);
            true
        });

        effects.update(at(0.1), &mut canvas);

        let texts: Vec<&str> = canvas
            .commands()
            .iter()
            .filter_map(|command| match command {
                crate::core::render::DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec!["first", "second"]);
    }

    #[test]
    fn clear_drops_everything() {
        let mut effects = EffectScheduler::new();
        effects.add(at(0.0), |_: f64, _: &mut dyn Canvas| true);
        effects.clear();
        assert!(effects.is_empty());
    }

    //--- Easing -----------------------------------------------------------

    #[test]
    fn easing_endpoints_are_fixed() {
        for easing in [
            Easing::Linear,
            Easing::QuadIn,
            Easing::QuadOut,
            Easing::ExpoIn,
            Easing::ExpoOut,
        ] {
            assert_eq!(easing.apply(0.0), 0.0, "{:?} at 0", easing);
            assert_eq!(easing.apply(1.0), 1.0, "{:?} at 1", easing);
        }
    }

    #[test]
    fn easing_clamps_input() {
        assert_eq!(Easing::QuadOut.apply(3.0), 1.0);
        assert_eq!(Easing::QuadIn.apply(-1.0), 0.0);
    }

    #[test]
    fn quad_out_leads_linear() {
        assert!(Easing::QuadOut.apply(0.5) > Easing::Linear.apply(0.5));
        assert!(Easing::QuadIn.apply(0.5) < Easing::Linear.apply(0.5));
    }
}
