//! Symbol effect drivers
//!
//! Stateful owners of a symbol effect's clock:
//!
//! - [`IndefiniteEffect`] loops while `set_active(true)` and sits at the
//!   identity transform otherwise (`Idle <-> Looping`).
//! - [`DiscreteEffect`] plays once each time its trigger value changes and
//!   returns to identity when done (`Idle -> Animating -> Idle`). A change
//!   mid-animation restarts from the beginning.
//!
//! Both can be switched off with `set_effects_removed`, which forces the
//! identity transform without touching the schedule.

use crate::scheduler::{ClockId, SchedulerHandle};
use crate::symbol_effect::{
    apply, AnimationDescriptor, EffectTransform, SymbolEffect, SymbolEffectOptions,
};
use crate::timeline::{Clock, ClockLimit};
use crate::trigger::Trigger;

/// Where an effect driver is in its lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectState {
    Idle,
    /// A discrete effect playing its cycle
    Animating,
    /// An indefinite effect running while active
    Looping,
}

// ============================================================================
// Indefinite Effect
// ============================================================================

/// An effect that runs while active
pub struct IndefiniteEffect {
    handle: SchedulerHandle,
    effect: SymbolEffect,
    options: SymbolEffectOptions,
    active: bool,
    removed: bool,
    descriptor: AnimationDescriptor,
    clock: Option<ClockId>,
}

impl IndefiniteEffect {
    /// Create an inactive driver
    pub fn new(handle: SchedulerHandle, effect: SymbolEffect, options: SymbolEffectOptions) -> Self {
        if !effect.is_indefinite() {
            tracing::debug!(?effect, "effect has no indefinite form, looping its single run");
        }
        Self {
            handle,
            effect,
            options,
            active: false,
            removed: false,
            descriptor: AnimationDescriptor::IDLE,
            clock: None,
        }
    }

    pub fn effect(&self) -> SymbolEffect {
        self.effect
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Start or stop the effect
    pub fn set_active(&mut self, active: bool) {
        if self.active == active {
            return;
        }
        self.active = active;
        if active {
            self.start();
        } else {
            self.stop();
        }
    }

    /// Replace the options, restarting a running effect
    pub fn set_options(&mut self, options: SymbolEffectOptions) {
        if self.options == options {
            return;
        }
        self.options = options;
        if self.active {
            self.stop();
            self.start();
        }
    }

    /// Force the identity transform while `removed`
    pub fn set_effects_removed(&mut self, removed: bool) {
        self.removed = removed;
    }

    pub fn state(&self) -> EffectState {
        if self.clock.is_some() {
            EffectState::Looping
        } else {
            EffectState::Idle
        }
    }

    /// Visual state at the scheduler's current time
    pub fn transform(&self) -> EffectTransform {
        if self.removed {
            return EffectTransform::IDENTITY;
        }
        match self.clock.and_then(|id| self.handle.clock_state(id)) {
            Some(state) => EffectTransform::sample(&self.descriptor, state.elapsed_ms),
            None => EffectTransform::IDENTITY,
        }
    }

    fn start(&mut self) {
        self.descriptor = apply(self.effect, true, &self.options);
        if self.descriptor.is_idle() {
            return;
        }
        // Finite effects repeat their whole run while active
        let period = self
            .descriptor
            .total_duration_ms()
            .unwrap_or_else(|| self.descriptor.cycle_duration_ms());
        if period <= 0.0 {
            return;
        }
        self.clock = self.handle.register_clock(Clock::looping(period));
        tracing::debug!(effect = ?self.effect, period_ms = period, "indefinite effect started");
    }

    fn stop(&mut self) {
        if let Some(id) = self.clock.take() {
            self.handle.remove_clock(id);
        }
        self.descriptor = AnimationDescriptor::IDLE;
    }
}

impl Drop for IndefiniteEffect {
    fn drop(&mut self) {
        if let Some(id) = self.clock.take() {
            self.handle.remove_clock(id);
        }
    }
}

// ============================================================================
// Discrete Effect
// ============================================================================

/// An effect that plays once per change of a trigger value
pub struct DiscreteEffect<T> {
    handle: SchedulerHandle,
    effect: SymbolEffect,
    options: SymbolEffectOptions,
    trigger: Trigger<T>,
    removed: bool,
    descriptor: AnimationDescriptor,
    clock: Option<ClockId>,
}

impl<T: PartialEq> DiscreteEffect<T> {
    /// Create an idle driver observing `value`
    pub fn new(
        handle: SchedulerHandle,
        effect: SymbolEffect,
        options: SymbolEffectOptions,
        value: T,
    ) -> Self {
        if !effect.is_discrete() {
            tracing::debug!(?effect, "effect has no discrete form, playing one cycle per change");
        }
        Self {
            handle,
            effect,
            options,
            trigger: Trigger::new(value),
            removed: false,
            descriptor: apply(effect, true, &options),
            clock: None,
        }
    }

    pub fn effect(&self) -> SymbolEffect {
        self.effect
    }

    /// Length of one play-through
    pub fn duration_ms(&self) -> f32 {
        self.descriptor
            .total_duration_ms()
            .unwrap_or_else(|| self.descriptor.cycle_duration_ms())
    }

    /// Observe a new trigger value, playing the effect if it changed
    ///
    /// Returns true when the effect (re)started.
    pub fn set_value(&mut self, value: T) -> bool {
        if !self.trigger.update(value) {
            return false;
        }
        self.play()
    }

    /// Replace the options used by the next play-through
    pub fn set_options(&mut self, options: SymbolEffectOptions) {
        self.options = options;
        self.descriptor = apply(self.effect, true, &options);
        if let Some(id) = self.clock.take() {
            self.handle.remove_clock(id);
        }
    }

    /// Force the identity transform while `removed`
    pub fn set_effects_removed(&mut self, removed: bool) {
        self.removed = removed;
    }

    pub fn state(&self) -> EffectState {
        match self.clock.and_then(|id| self.handle.clock_state(id)) {
            Some(state) if state.playing => EffectState::Animating,
            _ => EffectState::Idle,
        }
    }

    /// Visual state at the scheduler's current time
    pub fn transform(&self) -> EffectTransform {
        if self.removed {
            return EffectTransform::IDENTITY;
        }
        match self.clock.and_then(|id| self.handle.clock_state(id)) {
            Some(state) if state.playing => {
                EffectTransform::sample(&self.descriptor, state.elapsed_ms)
            }
            _ => EffectTransform::IDENTITY,
        }
    }

    fn play(&mut self) -> bool {
        let duration = self.duration_ms();
        if self.descriptor.is_idle() || duration <= 0.0 {
            tracing::trace!(effect = ?self.effect, "discrete effect has nothing to play");
            return false;
        }
        match self.clock {
            Some(id) => self.handle.restart_clock(id),
            None => {
                self.clock = self
                    .handle
                    .register_clock(Clock::new(ClockLimit::Finite(duration)));
            }
        }
        tracing::debug!(effect = ?self.effect, duration_ms = duration, "discrete effect triggered");
        self.clock.is_some()
    }
}

impl<T> Drop for DiscreteEffect<T> {
    fn drop(&mut self) {
        if let Some(id) = self.clock.take() {
            self.handle.remove_clock(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::AnimationScheduler;

    #[test]
    fn test_indefinite_loops_while_active() {
        let scheduler = AnimationScheduler::new();
        let mut pulse = IndefiniteEffect::new(
            scheduler.handle(),
            SymbolEffect::Pulse,
            SymbolEffectOptions::DEFAULT,
        );
        assert_eq!(pulse.state(), EffectState::Idle);
        assert_eq!(scheduler.timer_count(), 0);

        pulse.set_active(true);
        assert_eq!(pulse.state(), EffectState::Looping);

        scheduler.tick_by(1000.0);
        assert!((pulse.transform().opacity - 0.3).abs() < 1e-3);

        // Keeps looping past the first cycle
        scheduler.tick_by(2000.0);
        assert!((pulse.transform().opacity - 0.3).abs() < 1e-3);
        assert!(scheduler.has_active_animations());

        pulse.set_active(false);
        assert_eq!(pulse.state(), EffectState::Idle);
        assert!(pulse.transform().is_identity());
        assert_eq!(scheduler.timer_count(), 0);
    }

    #[test]
    fn test_effects_removed_forces_identity() {
        let scheduler = AnimationScheduler::new();
        let mut rotate = IndefiniteEffect::new(
            scheduler.handle(),
            SymbolEffect::Rotate,
            SymbolEffectOptions::DEFAULT,
        );
        rotate.set_active(true);
        scheduler.tick_by(500.0);
        assert!(!rotate.transform().is_identity());

        rotate.set_effects_removed(true);
        assert!(rotate.transform().is_identity());

        rotate.set_effects_removed(false);
        assert!(!rotate.transform().is_identity());
    }

    #[test]
    fn test_discrete_plays_once_per_change() {
        let scheduler = AnimationScheduler::new();
        let mut bounce = DiscreteEffect::new(
            scheduler.handle(),
            SymbolEffect::Bounce,
            SymbolEffectOptions::DEFAULT,
            0,
        );
        assert_eq!(bounce.state(), EffectState::Idle);
        assert_eq!(scheduler.timer_count(), 0);

        assert!(!bounce.set_value(0));
        assert!(bounce.set_value(1));
        assert_eq!(bounce.state(), EffectState::Animating);

        scheduler.tick_by(250.0);
        assert!((bounce.transform().scale - 1.2).abs() < 0.01);

        scheduler.tick_by(250.0);
        assert_eq!(bounce.state(), EffectState::Idle);
        assert!(bounce.transform().is_identity());
    }

    #[test]
    fn test_discrete_scale_reaches_target_at_end() {
        let scheduler = AnimationScheduler::new();
        let mut scale = DiscreteEffect::new(
            scheduler.handle(),
            SymbolEffect::Scale(2.0),
            SymbolEffectOptions::DEFAULT,
            0,
        );
        assert_eq!(scale.duration_ms(), 300.0);

        scale.set_value(1);
        scheduler.tick_by(150.0);
        let mid = scale.transform().scale;
        assert!(mid > 1.0 && mid < 2.0);

        scheduler.tick_by(145.0);
        assert!(scale.transform().scale > 1.9);
        assert_eq!(scale.state(), EffectState::Animating);

        scheduler.tick_by(5.0);
        assert_eq!(scale.state(), EffectState::Idle);
        assert!(scale.transform().is_identity());
    }

    #[test]
    fn test_discrete_restart_mid_animation() {
        let scheduler = AnimationScheduler::new();
        let mut appear = DiscreteEffect::new(
            scheduler.handle(),
            SymbolEffect::Appear,
            SymbolEffectOptions::DEFAULT,
            "a",
        );
        appear.set_value("b");
        scheduler.tick_by(300.0);
        let late = appear.transform().opacity;

        appear.set_value("c");
        assert_eq!(appear.transform().opacity, 0.0);
        assert!(late > 0.5);
        assert_eq!(scheduler.clock_count(), 1);
    }

    #[test]
    fn test_bounce_repeat_count() {
        let scheduler = AnimationScheduler::new();
        let mut bounce = DiscreteEffect::new(
            scheduler.handle(),
            SymbolEffect::Bounce,
            SymbolEffectOptions::repeat(3).with_speed(2.0),
            false,
        );
        assert_eq!(bounce.duration_ms(), 750.0);

        bounce.set_value(true);
        scheduler.tick_by(700.0);
        assert_eq!(bounce.state(), EffectState::Animating);
        scheduler.tick_by(50.0);
        assert_eq!(bounce.state(), EffectState::Idle);

        let mut never = DiscreteEffect::new(
            scheduler.handle(),
            SymbolEffect::Bounce,
            SymbolEffectOptions::repeat(0),
            false,
        );
        assert!(!never.set_value(true));
        assert_eq!(never.state(), EffectState::Idle);
    }

    #[test]
    fn test_drop_cancels_clock() {
        let scheduler = AnimationScheduler::new();
        {
            let mut wiggle = IndefiniteEffect::new(
                scheduler.handle(),
                SymbolEffect::Wiggle,
                SymbolEffectOptions::DEFAULT,
            );
            wiggle.set_active(true);
            assert_eq!(scheduler.clock_count(), 1);
        }
        assert_eq!(scheduler.clock_count(), 0);
    }
}
