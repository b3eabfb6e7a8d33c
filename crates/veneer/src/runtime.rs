//! Veneer runtime bundle
//!
//! Owns the animation scheduler and the canvas render environment built from
//! a [`VeneerConfig`], and hands out animators and effect drivers bound to
//! that scheduler.

use anyhow::Result;
use tracing::debug;
use veneer_animation::{
    try_set_global_scheduler, AnimationError, AnimationScheduler, DiscreteEffect,
    IndefiniteEffect, KeyframeAnimator, KeyframeTimeline, PhaseAnimator, SchedulerHandle,
    SymbolEffect, SymbolEffectOptions,
};
use veneer_core::{DrawContext, Size};
use veneer_paint::{Canvas, GraphicsContext, RasterCanvas, RenderEnvironment};

use crate::config::VeneerConfig;

/// The scheduler and render environment a set of views share
pub struct Veneer {
    config: VeneerConfig,
    scheduler: AnimationScheduler,
    environment: RenderEnvironment,
}

impl Default for Veneer {
    fn default() -> Self {
        Self {
            config: VeneerConfig::default(),
            scheduler: AnimationScheduler::new(),
            environment: RenderEnvironment::default(),
        }
    }
}

impl Veneer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a runtime from a validated configuration
    pub fn from_config(config: VeneerConfig) -> Result<Self> {
        config.validate()?;
        let environment = config.render_environment()?;
        let scheduler = AnimationScheduler::with_config(config.scheduler.clone());
        debug!(
            density = config.canvas.density,
            effects = config.effects.enabled,
            "veneer runtime created"
        );
        Ok(Self {
            config,
            scheduler,
            environment,
        })
    }

    pub fn config(&self) -> &VeneerConfig {
        &self.config
    }

    pub fn scheduler(&self) -> &AnimationScheduler {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut AnimationScheduler {
        &mut self.scheduler
    }

    pub fn handle(&self) -> SchedulerHandle {
        self.scheduler.handle()
    }

    /// Make this runtime's scheduler the process-wide one
    pub fn install_global(&self) -> std::result::Result<(), AnimationError> {
        try_set_global_scheduler(self.handle())
    }

    pub fn environment(&self) -> &RenderEnvironment {
        &self.environment
    }

    pub fn environment_mut(&mut self) -> &mut RenderEnvironment {
        &mut self.environment
    }

    pub fn effects_enabled(&self) -> bool {
        self.config.effects.enabled
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Animation
    // ─────────────────────────────────────────────────────────────────────────

    pub fn phase_animator<P>(&self, phases: impl IntoIterator<Item = P>) -> PhaseAnimator<P> {
        PhaseAnimator::new(self.handle(), phases)
    }

    pub fn keyframe_animator<V: Clone + 'static>(
        &self,
        initial: V,
        timeline: KeyframeTimeline<V>,
    ) -> KeyframeAnimator<V> {
        KeyframeAnimator::new(self.handle(), initial, timeline)
    }

    /// An effect that runs while active, honouring `effects.enabled`
    pub fn indefinite_effect(
        &self,
        effect: SymbolEffect,
        options: SymbolEffectOptions,
    ) -> IndefiniteEffect {
        let mut driver = IndefiniteEffect::new(self.handle(), effect, options);
        driver.set_effects_removed(!self.effects_enabled());
        driver
    }

    /// An effect that plays when `value` changes, honouring `effects.enabled`
    pub fn discrete_effect<T: PartialEq>(
        &self,
        effect: SymbolEffect,
        options: SymbolEffectOptions,
        value: T,
    ) -> DiscreteEffect<T> {
        let mut driver = DiscreteEffect::new(self.handle(), effect, options, value);
        driver.set_effects_removed(!self.effects_enabled());
        driver
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Canvas
    // ─────────────────────────────────────────────────────────────────────────

    /// A canvas using the configured opacity and colour mode
    pub fn canvas(
        &self,
        renderer: impl FnMut(&mut GraphicsContext<'_>, Size) + 'static,
    ) -> Canvas {
        Canvas::new(renderer)
            .with_opaque(self.config.canvas.opaque)
            .with_color_mode(self.environment.shading.color_mode)
    }

    pub fn render(&self, canvas: &mut Canvas, host: &mut dyn DrawContext) {
        canvas.render(host, &self.environment);
    }

    pub fn render_to_raster(&self, canvas: &mut Canvas, size: Size) -> Result<RasterCanvas> {
        Ok(canvas.render_to_raster(size, &self.environment)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veneer_animation::{EffectState, EffectTransform};

    #[test]
    fn test_from_config_applies_canvas_settings() {
        let config = VeneerConfig::from_toml_str(
            "[canvas]\ndensity = 2.0\nopaque = true\ncolor_mode = \"linear\"",
        )
        .unwrap();
        let veneer = Veneer::from_config(config).unwrap();
        assert_eq!(veneer.environment().density, 2.0);

        let canvas = veneer.canvas(|_, _| {});
        assert!(canvas.is_opaque());
        assert_eq!(
            canvas.color_mode(),
            veneer_paint::ColorRenderingMode::Linear
        );
    }

    #[test]
    fn test_disabled_effects_stay_identity() {
        let config = VeneerConfig::from_toml_str("[effects]\nenabled = false").unwrap();
        let veneer = Veneer::from_config(config).unwrap();
        let mut pulse = veneer.indefinite_effect(SymbolEffect::Pulse, SymbolEffectOptions::DEFAULT);
        pulse.set_active(true);
        veneer.scheduler().tick_by(200.0);

        assert_eq!(pulse.state(), EffectState::Looping);
        assert_eq!(pulse.transform(), EffectTransform::IDENTITY);
    }

    #[test]
    fn test_animators_share_scheduler() {
        let veneer = Veneer::new();
        let phases = veneer.phase_animator([0, 1]);
        assert_eq!(veneer.scheduler().phase_count(), 1);
        drop(phases);
        assert_eq!(veneer.scheduler().phase_count(), 0);
    }
}
