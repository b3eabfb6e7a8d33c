//! Veneer configuration file handling
//!
//! Runtime settings live in `veneer.toml`:
//!
//! ```toml
//! [scheduler]
//! target_fps = 120
//! max_frame_delta_ms = 100
//!
//! [canvas]
//! density = 2.0
//! opaque = false
//! color_mode = "non-linear"
//! foreground = "#1c1c1e"
//!
//! [effects]
//! enabled = true
//! ```
//!
//! Every section and field is optional.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use veneer_animation::SchedulerConfig;
use veneer_core::Color;
use veneer_paint::{ColorRenderingMode, RenderEnvironment};

/// File name looked up by [`VeneerConfig::load_from_dir`]
pub const CONFIG_FILE_NAME: &str = "veneer.toml";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct VeneerConfig {
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub canvas: CanvasConfig,
    #[serde(default)]
    pub effects: EffectsConfig,
}

/// Canvas rendering defaults
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CanvasConfig {
    /// Device pixels per point
    #[serde(default = "default_density")]
    pub density: f32,
    #[serde(default)]
    pub opaque: bool,
    #[serde(default)]
    pub color_mode: ColorModeSetting,
    /// Hex colour used for foreground shading
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreground: Option<String>,
}

fn default_density() -> f32 {
    1.0
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            density: default_density(),
            opaque: false,
            color_mode: ColorModeSetting::default(),
            foreground: None,
        }
    }
}

/// Serialized form of [`ColorRenderingMode`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorModeSetting {
    #[default]
    NonLinear,
    Linear,
    ExtendedLinear,
}

impl From<ColorModeSetting> for ColorRenderingMode {
    fn from(setting: ColorModeSetting) -> Self {
        match setting {
            ColorModeSetting::NonLinear => ColorRenderingMode::NonLinear,
            ColorModeSetting::Linear => ColorRenderingMode::Linear,
            ColorModeSetting::ExtendedLinear => ColorRenderingMode::ExtendedLinear,
        }
    }
}

/// Symbol effect settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EffectsConfig {
    /// When false, every symbol effect draws at its identity transform
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl VeneerConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: VeneerConfig =
            toml::from_str(content).context("Failed to parse veneer config")?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to load {}", path.display()))
    }

    /// Load `veneer.toml` from a directory, using defaults when it is absent
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            tracing::debug!(dir = %dir.display(), "no veneer.toml, using defaults");
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    /// Serialize to a TOML string
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize veneer config")
    }

    /// Check that every value is usable
    pub fn validate(&self) -> Result<()> {
        self.scheduler.validate()?;
        if !self.canvas.density.is_finite() || self.canvas.density <= 0.0 {
            anyhow::bail!(
                "canvas.density must be a positive number, got {}",
                self.canvas.density
            );
        }
        self.foreground_color()?;
        Ok(())
    }

    /// The configured foreground colour, if any
    pub fn foreground_color(&self) -> Result<Option<Color>> {
        self.canvas
            .foreground
            .as_deref()
            .map(|hex| {
                Color::parse_hex(hex)
                    .with_context(|| format!("canvas.foreground is not a hex colour: {hex}"))
            })
            .transpose()
    }

    /// Render environment for canvases drawn under this configuration
    pub fn render_environment(&self) -> Result<RenderEnvironment> {
        let mut env = RenderEnvironment::new()
            .with_density(self.canvas.density)
            .with_color_mode(self.canvas.color_mode.into());
        if let Some(foreground) = self.foreground_color()? {
            env = env.with_foreground(foreground);
        }
        Ok(env)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = VeneerConfig::from_toml_str("").unwrap();
        assert_eq!(config, VeneerConfig::default());
        assert_eq!(config.canvas.density, 1.0);
        assert!(config.effects.enabled);
        assert_eq!(config.scheduler.target_fps, 120);
    }

    #[test]
    fn test_full_document() {
        let config = VeneerConfig::from_toml_str(
            r##"
            [scheduler]
            target_fps = 60

            [canvas]
            density = 2.0
            opaque = true
            color_mode = "extended-linear"
            foreground = "#ff0000"

            [effects]
            enabled = false
            "##,
        )
        .unwrap();

        assert_eq!(config.scheduler.target_fps, 60);
        assert_eq!(config.scheduler.max_frame_delta_ms, 100.0);
        assert!(config.canvas.opaque);
        assert_eq!(config.canvas.color_mode, ColorModeSetting::ExtendedLinear);
        assert!(!config.effects.enabled);

        let env = config.render_environment().unwrap();
        assert_eq!(env.density, 2.0);
        assert_eq!(env.shading.foreground, Color::RED);
        assert_eq!(env.shading.color_mode, ColorRenderingMode::ExtendedLinear);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(VeneerConfig::from_toml_str("[canvas]\ndensity = 0.0").is_err());
        assert!(VeneerConfig::from_toml_str("[canvas]\nforeground = \"blue\"").is_err());
        assert!(VeneerConfig::from_toml_str("[scheduler]\ntarget_fps = 0").is_err());
        assert!(VeneerConfig::from_toml_str("[canvas]\ncolor_mode = \"hdr\"").is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = VeneerConfig::default();
        config.canvas.foreground = Some("#336699".to_string());
        config.canvas.color_mode = ColorModeSetting::Linear;
        let text = config.to_toml_string().unwrap();
        assert!(text.contains("color_mode = \"linear\""));
        assert_eq!(VeneerConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_load_from_dir() {
        let dir = std::env::temp_dir().join(format!("veneer-config-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let _ = fs::remove_file(dir.join(CONFIG_FILE_NAME));

        assert_eq!(
            VeneerConfig::load_from_dir(&dir).unwrap(),
            VeneerConfig::default()
        );

        fs::write(dir.join(CONFIG_FILE_NAME), "[effects]\nenabled = false\n").unwrap();
        let config = VeneerConfig::load_from_dir(&dir).unwrap();
        assert!(!config.effects.enabled);

        fs::remove_dir_all(&dir).unwrap();
    }
}
