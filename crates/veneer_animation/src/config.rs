//! Scheduler configuration

use serde::{Deserialize, Serialize};

use crate::error::{AnimationError, Result};

/// Frame pacing for an [`AnimationScheduler`](crate::AnimationScheduler)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Frame rate of the background thread
    #[serde(default = "default_target_fps")]
    pub target_fps: u32,

    /// Upper bound on the wall-clock delta a single `tick()` advances by
    #[serde(default = "default_max_frame_delta_ms")]
    pub max_frame_delta_ms: f32,
}

fn default_target_fps() -> u32 {
    120
}

fn default_max_frame_delta_ms() -> f32 {
    100.0
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            target_fps: default_target_fps(),
            max_frame_delta_ms: default_max_frame_delta_ms(),
        }
    }
}

impl SchedulerConfig {
    /// Check that every field is usable
    pub fn validate(&self) -> Result<()> {
        if self.target_fps == 0 || self.target_fps > 1000 {
            return Err(AnimationError::InvalidConfig(format!(
                "target_fps must be in 1..=1000, got {}",
                self.target_fps
            )));
        }
        if !self.max_frame_delta_ms.is_finite() || self.max_frame_delta_ms <= 0.0 {
            return Err(AnimationError::InvalidConfig(format!(
                "max_frame_delta_ms must be positive, got {}",
                self.max_frame_delta_ms
            )));
        }
        Ok(())
    }

    /// Duration of one background frame
    pub fn frame_duration(&self) -> std::time::Duration {
        std::time::Duration::from_micros(1_000_000 / u64::from(self.target_fps.max(1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SchedulerConfig::default();
        assert_eq!(config.target_fps, 120);
        assert_eq!(config.max_frame_delta_ms, 100.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: SchedulerConfig = toml::from_str("target_fps = 60").unwrap();
        assert_eq!(config.target_fps, 60);
        assert_eq!(config.max_frame_delta_ms, 100.0);
    }

    #[test]
    fn test_validate_rejects_zero_fps() {
        let config = SchedulerConfig {
            target_fps: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(AnimationError::InvalidConfig(_))
        ));
    }
}
