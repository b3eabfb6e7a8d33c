//! Veneer Animation System
//!
//! Time-driven view state for the Veneer graphics layer.
//!
//! # Features
//!
//! - **Animation Specs**: timing curves and springs, with durations for scheduling
//! - **Spring Physics**: closed-form step response and an RK4 integrator
//! - **Phase Animators**: step through ordered phases, looping or once per trigger
//! - **Keyframe Animators**: concurrent per-property keyframe tracks
//! - **Symbol Effects**: bounce, pulse, variable colour and friends, as indefinite
//!   or discrete effects
//! - **Cancellable Scheduling**: every timeline is owned by its component and
//!   removed when the component drops
//!
//! All times are milliseconds as `f32`.

pub mod animation;
pub mod config;
pub mod easing;
pub mod effect_driver;
pub mod error;
pub mod keyframe;
pub mod keyframe_animator;
pub mod phase;
pub mod scheduler;
pub mod spring;
pub mod symbol_effect;
pub mod timeline;
pub mod trigger;
pub mod values;

pub use animation::{Animation, DEFAULT_PHASE_DURATION_MS, TWEEN_DURATION_MS};
pub use config::SchedulerConfig;
pub use easing::Easing;
pub use effect_driver::{DiscreteEffect, EffectState, IndefiniteEffect};
pub use error::{AnimationError, Result};
pub use keyframe::{AnyTrack, Keyframe, KeyframeTimeline, KeyframeTrack};
pub use keyframe_animator::KeyframeAnimator;
pub use phase::{PhaseAnimator, PhaseFrame};
pub use scheduler::{
    get_scheduler, is_scheduler_initialized, set_global_scheduler, try_get_scheduler,
    try_set_global_scheduler, AnimationScheduler, ClockId, ClockState, PhaseState,
    PhaseTimelineId, SchedulerHandle, WakeCallback,
};
pub use spring::{Spring, SpringConfig};
pub use symbol_effect::{
    apply, AnimationDescriptor, EffectCurve, EffectProperty, EffectRepeat, EffectTransform,
    SymbolEffect, SymbolEffectOptions,
};
pub use timeline::{Clock, ClockLimit, PhaseTimeline, PlaybackMode};
pub use trigger::Trigger;
pub use values::Interpolate;
