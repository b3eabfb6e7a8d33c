//! Animation specs
//!
//! An [`Animation`] describes how a change is timed: a fixed-duration timing
//! curve or a spring. Phase animators ask it for a duration to hold each phase,
//! content reads `progress` to blend toward the new phase.

use crate::easing::Easing;
use crate::spring::SpringConfig;

/// Hold time used when an animation has no explicit duration
pub const DEFAULT_PHASE_DURATION_MS: f32 = 350.0;

/// Duration of [`Animation::tween`]
pub const TWEEN_DURATION_MS: f32 = 300.0;

/// How a state change animates
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Animation {
    /// The platform default animation; carries no explicit duration
    #[default]
    Default,
    /// A timing curve over a fixed duration
    Timing { easing: Easing, duration_ms: f32 },
    /// A spring, optionally retimed to settle by `duration_ms`
    Spring {
        config: SpringConfig,
        duration_ms: Option<f32>,
    },
}

impl Animation {
    pub fn linear(duration_ms: f32) -> Self {
        Animation::Timing {
            easing: Easing::Linear,
            duration_ms,
        }
    }

    pub fn ease_in(duration_ms: f32) -> Self {
        Animation::Timing {
            easing: Easing::EaseIn,
            duration_ms,
        }
    }

    pub fn ease_out(duration_ms: f32) -> Self {
        Animation::Timing {
            easing: Easing::EaseOut,
            duration_ms,
        }
    }

    pub fn ease_in_out(duration_ms: f32) -> Self {
        Animation::Timing {
            easing: Easing::EaseInOut,
            duration_ms,
        }
    }

    pub fn timing(easing: Easing, duration_ms: f32) -> Self {
        Animation::Timing {
            easing,
            duration_ms,
        }
    }

    /// The standard animation: ease-in-out over 300 ms
    pub fn tween() -> Self {
        Self::ease_in_out(TWEEN_DURATION_MS)
    }

    pub fn spring(config: SpringConfig) -> Self {
        Animation::Spring {
            config,
            duration_ms: None,
        }
    }

    pub fn bouncy() -> Self {
        Self::spring(SpringConfig::bouncy())
    }

    /// Explicit duration, if this animation carries one
    pub fn duration_ms(&self) -> Option<f32> {
        match self {
            Animation::Default => None,
            Animation::Timing { duration_ms, .. } => Some(*duration_ms),
            Animation::Spring { duration_ms, .. } => *duration_ms,
        }
    }

    /// Duration used to schedule this animation
    pub fn effective_duration_ms(&self) -> f32 {
        self.duration_ms()
            .filter(|d| d.is_finite() && *d > 0.0)
            .unwrap_or(DEFAULT_PHASE_DURATION_MS)
    }

    /// Eased progress `elapsed_ms` after the animation started
    pub fn progress(&self, elapsed_ms: f32) -> f32 {
        match self {
            Animation::Default => {
                Easing::EaseInOut.apply(elapsed_ms / DEFAULT_PHASE_DURATION_MS)
            }
            Animation::Timing {
                easing,
                duration_ms,
            } => {
                if *duration_ms <= 0.0 {
                    return 1.0;
                }
                easing.apply(elapsed_ms / duration_ms)
            }
            Animation::Spring {
                config,
                duration_ms,
            } => spring_progress(config, *duration_ms, elapsed_ms),
        }
    }
}

/// Spring step response, time-scaled so it settles by `duration_ms` when given
pub(crate) fn spring_progress(
    config: &SpringConfig,
    duration_ms: Option<f32>,
    elapsed_ms: f32,
) -> f32 {
    match duration_ms {
        Some(duration) if duration > 0.0 => {
            if elapsed_ms >= duration {
                return 1.0;
            }
            let settle = config.settling_duration_ms();
            if !settle.is_finite() || settle <= 0.0 {
                return (elapsed_ms / duration).clamp(0.0, 1.0);
            }
            config.progress(elapsed_ms * settle / duration)
        }
        Some(_) => 1.0,
        None => config.progress(elapsed_ms),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_durations() {
        assert_eq!(Animation::tween().duration_ms(), Some(300.0));
        assert_eq!(Animation::Default.duration_ms(), None);
        assert_eq!(Animation::bouncy().duration_ms(), None);
        assert_eq!(Animation::Default.effective_duration_ms(), 350.0);
        assert_eq!(Animation::linear(-5.0).effective_duration_ms(), 350.0);
        assert_eq!(Animation::linear(120.0).effective_duration_ms(), 120.0);
    }

    #[test]
    fn test_timing_progress() {
        let anim = Animation::linear(200.0);
        assert_eq!(anim.progress(0.0), 0.0);
        assert!((anim.progress(50.0) - 0.25).abs() < 1e-5);
        assert_eq!(anim.progress(400.0), 1.0);
        assert_eq!(Animation::linear(0.0).progress(0.0), 1.0);
    }

    #[test]
    fn test_retimed_spring_finishes_on_time() {
        let anim = Animation::Spring {
            config: SpringConfig::bouncy(),
            duration_ms: Some(250.0),
        };
        assert!(anim.progress(0.0).abs() < 1e-4);
        assert_eq!(anim.progress(250.0), 1.0);
        assert!((anim.progress(249.0) - 1.0).abs() < 0.01);
    }
}
