//! Keyframe animator
//!
//! Binds a [`KeyframeTimeline`] to a value and a scheduler clock. Without a
//! trigger the timeline loops for as long as the animator lives. With one, the
//! value rests at its initial state until the trigger changes, then the value
//! resets and the whole timeline plays once, holding its final values.

use crate::keyframe::KeyframeTimeline;
use crate::scheduler::{ClockId, SchedulerHandle};
use crate::timeline::{Clock, ClockLimit};
use crate::trigger::Trigger;

/// Drives a value through a keyframe timeline
pub struct KeyframeAnimator<V, T = ()> {
    handle: SchedulerHandle,
    initial: V,
    timeline: KeyframeTimeline<V>,
    trigger: Option<Trigger<T>>,
    started: bool,
    clock: Option<ClockId>,
}

impl<V: Clone + 'static> KeyframeAnimator<V, ()> {
    /// Loop `timeline` continuously starting from `initial`
    pub fn new(handle: SchedulerHandle, initial: V, timeline: KeyframeTimeline<V>) -> Self {
        let duration = timeline.duration_ms();
        let clock = if timeline.is_empty() || duration <= 0.0 {
            None
        } else {
            handle.register_clock(Clock::looping(duration))
        };
        tracing::debug!(duration_ms = duration, "keyframe animator looping");
        Self {
            handle,
            initial,
            timeline,
            trigger: None,
            started: true,
            clock,
        }
    }
}

impl<V: Clone + 'static, T: PartialEq> KeyframeAnimator<V, T> {
    /// Play `timeline` once on every change of `trigger`
    pub fn triggered(
        handle: SchedulerHandle,
        initial: V,
        timeline: KeyframeTimeline<V>,
        trigger: T,
    ) -> Self {
        let duration = timeline.duration_ms();
        let clock = if timeline.is_empty() || duration <= 0.0 {
            None
        } else {
            handle.register_clock(Clock::idle(ClockLimit::Finite(duration)))
        };
        Self {
            handle,
            initial,
            timeline,
            trigger: Some(Trigger::new(trigger)),
            started: false,
            clock,
        }
    }

    pub fn initial(&self) -> &V {
        &self.initial
    }

    pub fn duration_ms(&self) -> f32 {
        self.timeline.duration_ms()
    }

    /// Time into the current run
    pub fn elapsed_ms(&self) -> f32 {
        self.clock
            .and_then(|id| self.handle.clock_state(id))
            .map(|state| state.elapsed_ms)
            .unwrap_or(0.0)
    }

    pub fn is_playing(&self) -> bool {
        self.clock
            .and_then(|id| self.handle.clock_state(id))
            .map(|state| state.playing)
            .unwrap_or(false)
    }

    /// The animated value at the scheduler's current time
    pub fn value(&self) -> V {
        if !self.started || self.timeline.is_empty() {
            return self.initial.clone();
        }
        self.timeline.sample(&self.initial, self.elapsed_ms())
    }

    /// Render the animated value with `content`, `None` for an empty timeline
    pub fn render<R>(&self, content: impl FnOnce(&V) -> R) -> Option<R> {
        if self.timeline.is_empty() {
            return None;
        }
        Some(content(&self.value()))
    }

    /// Observe a new trigger value
    ///
    /// A change resets the value and replays the timeline from the start,
    /// abandoning any run in progress. Returns true when the animator restarted.
    pub fn set_trigger(&mut self, value: T) -> bool {
        let changed = match self.trigger.as_mut() {
            Some(trigger) => trigger.update(value),
            None => {
                tracing::trace!("set_trigger on a looping keyframe animator");
                false
            }
        };
        if !changed {
            return false;
        }
        self.started = true;
        if let Some(id) = self.clock {
            self.handle.restart_clock(id);
        }
        tracing::debug!(duration_ms = self.duration_ms(), "keyframe animator triggered");
        true
    }
}

impl<V, T> Drop for KeyframeAnimator<V, T> {
    fn drop(&mut self) {
        if let Some(id) = self.clock.take() {
            self.handle.remove_clock(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyframe::KeyframeTrack;
    use crate::scheduler::AnimationScheduler;

    fn one_to_two() -> KeyframeTimeline<f32> {
        KeyframeTimeline::new().track(KeyframeTrack::whole().linear(2.0, 1000.0))
    }

    #[test]
    fn test_linear_keyframe_reaches_midpoint() {
        let scheduler = AnimationScheduler::new();
        let animator = KeyframeAnimator::new(scheduler.handle(), 1.0_f32, one_to_two());

        assert_eq!(animator.value(), 1.0);
        scheduler.tick_by(500.0);
        assert!((animator.value() - 1.5).abs() < 1e-5);
        scheduler.tick_by(250.0);
        assert!((animator.value() - 1.75).abs() < 1e-5);
    }

    #[test]
    fn test_continuous_loops() {
        let scheduler = AnimationScheduler::new();
        let animator = KeyframeAnimator::new(scheduler.handle(), 1.0_f32, one_to_two());

        scheduler.tick_by(1250.0);
        assert!((animator.value() - 1.25).abs() < 1e-4);
        assert!(animator.is_playing());
    }

    #[test]
    fn test_triggered_waits_for_change() {
        let scheduler = AnimationScheduler::new();
        let mut animator =
            KeyframeAnimator::triggered(scheduler.handle(), 1.0_f32, one_to_two(), 0);

        scheduler.tick_by(500.0);
        assert_eq!(animator.value(), 1.0);
        assert!(!animator.is_playing());

        assert!(animator.set_trigger(1));
        scheduler.tick_by(500.0);
        assert!((animator.value() - 1.5).abs() < 1e-5);

        // Holds the end value once finished
        scheduler.tick_by(2000.0);
        assert_eq!(animator.value(), 2.0);
        assert!(!animator.is_playing());
    }

    #[test]
    fn test_retrigger_resets_to_initial() {
        let scheduler = AnimationScheduler::new();
        let mut animator =
            KeyframeAnimator::triggered(scheduler.handle(), 1.0_f32, one_to_two(), "a");

        animator.set_trigger("b");
        scheduler.tick_by(800.0);
        assert!(animator.value() > 1.7);

        assert!(animator.set_trigger("c"));
        assert_eq!(animator.value(), 1.0);
        assert!(!animator.set_trigger("c"));
        assert_eq!(scheduler.clock_count(), 1);
    }

    #[test]
    fn test_empty_timeline_renders_nothing() {
        let scheduler = AnimationScheduler::new();
        let animator = KeyframeAnimator::new(scheduler.handle(), 4.0_f32, KeyframeTimeline::new());

        assert_eq!(scheduler.timer_count(), 0);
        assert!(animator.render(|v| *v).is_none());
        assert_eq!(animator.value(), 4.0);
    }

    #[test]
    fn test_zero_length_timeline_jumps() {
        let scheduler = AnimationScheduler::new();
        let timeline = KeyframeTimeline::new().track(KeyframeTrack::whole().move_to(9.0_f32));
        let mut animator = KeyframeAnimator::triggered(scheduler.handle(), 0.0, timeline, false);

        assert_eq!(scheduler.clock_count(), 0);
        assert_eq!(animator.value(), 0.0);
        animator.set_trigger(true);
        assert_eq!(animator.render(|v| *v), Some(9.0));
    }

    #[test]
    fn test_drop_cancels_clock() {
        let scheduler = AnimationScheduler::new();
        {
            let _animator = KeyframeAnimator::new(scheduler.handle(), 1.0_f32, one_to_two());
            assert_eq!(scheduler.clock_count(), 1);
        }
        assert_eq!(scheduler.clock_count(), 0);
    }
}
