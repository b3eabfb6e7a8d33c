//! Phase animator
//!
//! Steps a piece of view state through an ordered list of phases. Without a
//! trigger the phases cycle forever; with one, every change of the trigger
//! jumps back to the first phase and plays forward once, stopping on the last.
//!
//! Each phase is held for the duration of the animation that brings it in
//! (`animation(phase)`, the standard tween when the closure returns `None`,
//! 350 ms when the animation carries no explicit duration). Without a
//! closure every phase enters with [`Animation::Default`].
//!
//! ```ignore
//! let pulse = PhaseAnimator::new(scheduler.handle(), [1.0_f32, 1.4, 1.0])
//!     .with_animation(|_| Some(Animation::ease_in_out(200.0)));
//!
//! // Each frame
//! if let Some(frame) = pulse.current() {
//!     draw_dot(*frame.phase, frame.progress);
//! }
//! ```

use crate::animation::Animation;
use crate::scheduler::{PhaseTimelineId, SchedulerHandle};
use crate::timeline::{PhaseTimeline, PlaybackMode};
use crate::trigger::Trigger;

type AnimationFn<P> = Box<dyn Fn(&P) -> Option<Animation> + Send + Sync>;

/// The phase an animator currently displays
#[derive(Debug)]
pub struct PhaseFrame<'a, P> {
    pub phase: &'a P,
    pub index: usize,
    /// Animation bringing this phase in
    pub animation: Animation,
    /// Eased progress of that animation
    pub progress: f32,
}

/// Drives view state through a list of phases
pub struct PhaseAnimator<P, T = ()> {
    handle: SchedulerHandle,
    phases: Vec<P>,
    animation: AnimationFn<P>,
    trigger: Option<Trigger<T>>,
    timeline: Option<PhaseTimelineId>,
}

impl<P> PhaseAnimator<P, ()> {
    /// Cycle through `phases` continuously
    pub fn new(handle: SchedulerHandle, phases: impl IntoIterator<Item = P>) -> Self {
        Self::build(handle, phases.into_iter().collect(), None)
    }
}

impl<P, T: PartialEq> PhaseAnimator<P, T> {
    /// Play through `phases` once now and again on every change of `trigger`
    pub fn triggered(
        handle: SchedulerHandle,
        phases: impl IntoIterator<Item = P>,
        trigger: T,
    ) -> Self {
        Self::build(
            handle,
            phases.into_iter().collect(),
            Some(Trigger::new(trigger)),
        )
    }

    fn build(handle: SchedulerHandle, phases: Vec<P>, trigger: Option<Trigger<T>>) -> Self {
        let mut animator = Self {
            handle,
            phases,
            animation: Box::new(|_| Some(Animation::Default)),
            trigger,
            timeline: None,
        };
        animator.schedule();
        animator
    }

    /// Animation used to enter each phase
    pub fn with_animation<F>(mut self, animation: F) -> Self
    where
        F: Fn(&P) -> Option<Animation> + Send + Sync + 'static,
    {
        self.animation = Box::new(animation);
        self.schedule();
        self
    }

    pub fn phases(&self) -> &[P] {
        &self.phases
    }

    fn resolved_animation(&self, phase: &P) -> Animation {
        (self.animation)(phase).unwrap_or_else(Animation::tween)
    }

    /// Replace any registered timeline with one built from the current phases
    fn schedule(&mut self) {
        if let Some(id) = self.timeline.take() {
            self.handle.remove_phases(id);
        }
        if self.phases.is_empty() {
            return;
        }
        let durations: Vec<f32> = self
            .phases
            .iter()
            .map(|p| self.resolved_animation(p).effective_duration_ms())
            .collect();
        let mode = if self.trigger.is_some() {
            PlaybackMode::Once
        } else {
            PlaybackMode::Continuous
        };
        self.timeline = self
            .handle
            .register_phases(PhaseTimeline::new(durations, mode));
    }

    /// Observe a new trigger value
    ///
    /// A change restarts from the first phase, abandoning the current run.
    /// Returns true when the animator restarted.
    pub fn set_trigger(&mut self, value: T) -> bool {
        let changed = match self.trigger.as_mut() {
            Some(trigger) => trigger.update(value),
            None => {
                tracing::trace!("set_trigger on a continuous phase animator");
                false
            }
        };
        if !changed {
            return false;
        }
        if let Some(id) = self.timeline {
            self.handle.restart_phases(id);
        }
        true
    }

    /// Index of the displayed phase, `None` when there are no phases
    pub fn current_index(&self) -> Option<usize> {
        if self.phases.is_empty() {
            return None;
        }
        let index = self
            .timeline
            .and_then(|id| self.handle.phase_state(id))
            .map(|state| state.index)
            .unwrap_or(0);
        Some(index.min(self.phases.len() - 1))
    }

    /// Whether the timeline is still advancing
    pub fn is_playing(&self) -> bool {
        self.timeline
            .and_then(|id| self.handle.phase_state(id))
            .map(|state| state.playing)
            .unwrap_or(false)
    }

    /// The displayed phase with its animation progress
    pub fn current(&self) -> Option<PhaseFrame<'_, P>> {
        let state = self.timeline.and_then(|id| self.handle.phase_state(id));
        let index = self.current_index()?;
        let phase = &self.phases[index];
        let animation = self.resolved_animation(phase);
        let progress = match state {
            Some(state) if state.playing => animation.progress(state.elapsed_ms),
            _ => 1.0,
        };
        Some(PhaseFrame {
            phase,
            index,
            animation,
            progress,
        })
    }

    /// Render the displayed phase with `content`, `None` when there are no phases
    pub fn render<R>(&self, content: impl FnOnce(&P) -> R) -> Option<R> {
        self.current_index().map(|index| content(&self.phases[index]))
    }
}

impl<P, T> Drop for PhaseAnimator<P, T> {
    fn drop(&mut self) {
        if let Some(id) = self.timeline.take() {
            self.handle.remove_phases(id);
        }
    }
}
