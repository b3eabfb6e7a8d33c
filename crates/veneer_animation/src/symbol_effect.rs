//! Symbol effects
//!
//! A closed set of icon effects (bounce, pulse, variable color, scale, replace,
//! appear, disappear, breathe, rotate, wiggle). [`apply`] turns an effect, its
//! activity flag and [`SymbolEffectOptions`] into an [`AnimationDescriptor`]:
//! a pure description of one animated property that can be sampled at any
//! elapsed time. The drivers in [`crate::effect_driver`] own the clocks.

use veneer_core::{Affine2D, Angle, Color, Point};

use crate::animation::spring_progress;
use crate::easing::Easing;
use crate::spring::SpringConfig;
use crate::values::Interpolate;

// ─────────────────────────────────────────────────────────────────────────────
// Effects and Options
// ─────────────────────────────────────────────────────────────────────────────

/// An icon effect
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SymbolEffect {
    Bounce,
    Pulse,
    VariableColor,
    /// Scale from 1.0 up to the given factor
    Scale(f32),
    /// Content swap; animated by the caller as a crossfade
    Replace,
    Appear,
    Disappear,
    Breathe,
    Rotate,
    Wiggle,
}

impl SymbolEffect {
    /// Scale factor of [`SymbolEffect::scale`]
    pub const DEFAULT_SCALE: f32 = 1.5;

    /// Every effect, with the default scale factor
    pub const ALL: [SymbolEffect; 10] = [
        SymbolEffect::Bounce,
        SymbolEffect::Pulse,
        SymbolEffect::VariableColor,
        SymbolEffect::Scale(Self::DEFAULT_SCALE),
        SymbolEffect::Replace,
        SymbolEffect::Appear,
        SymbolEffect::Disappear,
        SymbolEffect::Breathe,
        SymbolEffect::Rotate,
        SymbolEffect::Wiggle,
    ];

    pub fn scale() -> Self {
        SymbolEffect::Scale(Self::DEFAULT_SCALE)
    }

    /// Runs continuously while active
    pub fn is_indefinite(&self) -> bool {
        matches!(
            self,
            SymbolEffect::Bounce
                | SymbolEffect::Pulse
                | SymbolEffect::VariableColor
                | SymbolEffect::Breathe
                | SymbolEffect::Rotate
                | SymbolEffect::Wiggle
        )
    }

    /// Plays once per trigger change
    pub fn is_discrete(&self) -> bool {
        matches!(
            self,
            SymbolEffect::Bounce
                | SymbolEffect::Scale(_)
                | SymbolEffect::Replace
                | SymbolEffect::Appear
                | SymbolEffect::Disappear
        )
    }

    /// Duration of one leg at speed 1.0
    pub fn base_duration_ms(&self) -> f32 {
        match self {
            SymbolEffect::Bounce => 500.0,
            SymbolEffect::Pulse => 1000.0,
            SymbolEffect::VariableColor => 1500.0,
            SymbolEffect::Scale(_) => 300.0,
            SymbolEffect::Replace => 0.0,
            SymbolEffect::Appear | SymbolEffect::Disappear => 400.0,
            SymbolEffect::Breathe | SymbolEffect::Rotate => 2000.0,
            SymbolEffect::Wiggle => 200.0,
        }
    }
}

/// Speed and repetition for an effect
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SymbolEffectOptions {
    /// Divides every duration
    pub speed: f32,
    /// Number of cycles for repeatable effects
    pub repeat_count: Option<u32>,
    pub repeating: bool,
}

impl Default for SymbolEffectOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl SymbolEffectOptions {
    pub const DEFAULT: SymbolEffectOptions = SymbolEffectOptions {
        speed: 1.0,
        repeat_count: None,
        repeating: false,
    };

    pub const REPEATING: SymbolEffectOptions = SymbolEffectOptions {
        speed: 1.0,
        repeat_count: None,
        repeating: true,
    };

    pub const NON_REPEATING: SymbolEffectOptions = SymbolEffectOptions {
        speed: 1.0,
        repeat_count: None,
        repeating: false,
    };

    pub fn speed(speed: f32) -> Self {
        Self::DEFAULT.with_speed(speed)
    }

    /// Repeat `count` times; `repeating` is true unless `count == 1`
    pub fn repeat(count: u32) -> Self {
        Self::DEFAULT.with_repeat(count)
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_repeat(mut self, count: u32) -> Self {
        self.repeat_count = Some(count);
        self.repeating = count != 1;
        self
    }

    /// Speed usable as a divisor
    fn effective_speed(&self) -> f32 {
        if self.speed.is_finite() && self.speed > 0.0 {
            self.speed
        } else {
            tracing::warn!(speed = self.speed, "non-positive effect speed, using 1.0");
            1.0
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Animation Descriptor
// ─────────────────────────────────────────────────────────────────────────────

/// Visual property an effect animates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectProperty {
    Scale,
    Opacity,
    /// Rotation in degrees
    Rotation,
    /// Hue rotation in degrees
    Hue,
    /// Nothing animates
    None,
}

/// Timing of one leg
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EffectCurve {
    Tween(Easing),
    /// Spring retimed to settle within the leg
    Spring(SpringConfig),
}

/// How legs repeat
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectRepeat {
    /// One leg from `from` to `to`, then hold `to`
    Once,
    /// `n` cycles, each going out to `to` and back to `from`
    Bounce(u32),
    /// Loop forever, reversing direction every leg when `autoreverse`
    Forever { autoreverse: bool },
}

/// A sampled description of one effect animation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationDescriptor {
    pub property: EffectProperty,
    pub from: f32,
    pub to: f32,
    /// Duration of one leg (one full bounce cycle for `Bounce`)
    pub duration_ms: f32,
    pub curve: EffectCurve,
    pub repeat: EffectRepeat,
}

impl AnimationDescriptor {
    /// Descriptor that animates nothing
    pub const IDLE: AnimationDescriptor = AnimationDescriptor {
        property: EffectProperty::None,
        from: 0.0,
        to: 0.0,
        duration_ms: 0.0,
        curve: EffectCurve::Tween(Easing::Linear),
        repeat: EffectRepeat::Once,
    };

    fn tween(property: EffectProperty, from: f32, to: f32, duration_ms: f32) -> Self {
        Self {
            property,
            from,
            to,
            duration_ms,
            curve: EffectCurve::Tween(Easing::EaseInOut),
            repeat: EffectRepeat::Once,
        }
    }

    fn repeating(mut self, repeat: EffectRepeat) -> Self {
        self.repeat = repeat;
        self
    }

    fn with_curve(mut self, curve: EffectCurve) -> Self {
        self.curve = curve;
        self
    }

    pub fn is_idle(&self) -> bool {
        self.property == EffectProperty::None
    }

    /// Length of one repeating cycle
    pub fn cycle_duration_ms(&self) -> f32 {
        match self.repeat {
            EffectRepeat::Forever { autoreverse: true } => self.duration_ms * 2.0,
            _ => self.duration_ms,
        }
    }

    /// Length of the whole animation, `None` when it never ends
    pub fn total_duration_ms(&self) -> Option<f32> {
        match self.repeat {
            EffectRepeat::Once => Some(self.duration_ms),
            EffectRepeat::Bounce(n) => Some(self.duration_ms * n as f32),
            EffectRepeat::Forever { .. } => None,
        }
    }

    fn leg_progress(&self, elapsed_ms: f32, leg_ms: f32) -> f32 {
        match self.curve {
            EffectCurve::Tween(easing) => {
                if leg_ms <= 0.0 {
                    return 1.0;
                }
                easing.apply(elapsed_ms / leg_ms)
            }
            EffectCurve::Spring(config) => spring_progress(&config, Some(leg_ms), elapsed_ms),
        }
    }

    /// Property value `elapsed_ms` after the animation started
    pub fn value_at(&self, elapsed_ms: f32) -> f32 {
        let elapsed_ms = elapsed_ms.max(0.0);
        match self.repeat {
            EffectRepeat::Once => self
                .from
                .lerp(&self.to, self.leg_progress(elapsed_ms, self.duration_ms)),
            EffectRepeat::Bounce(n) => {
                let cycle = self.duration_ms;
                if n == 0 || cycle <= 0.0 || elapsed_ms >= cycle * n as f32 {
                    return self.from;
                }
                let local = elapsed_ms % cycle;
                let half = cycle / 2.0;
                if local < half {
                    self.from.lerp(&self.to, self.leg_progress(local, half))
                } else {
                    let peak = self.from.lerp(&self.to, self.leg_progress(half, half));
                    peak.lerp(&self.from, self.leg_progress(local - half, half))
                }
            }
            EffectRepeat::Forever { autoreverse } => {
                let leg = self.duration_ms;
                if leg <= 0.0 {
                    return self.to;
                }
                let local = elapsed_ms % self.cycle_duration_ms();
                if autoreverse && local >= leg {
                    self.to.lerp(&self.from, self.leg_progress(local - leg, leg))
                } else {
                    self.from.lerp(&self.to, self.leg_progress(local, leg))
                }
            }
        }
    }
}

/// Describe the animation `effect` performs
///
/// Inactive effects are idle. Repeat counts apply to bounce only; on every
/// other effect they are ignored.
pub fn apply(
    effect: SymbolEffect,
    is_active: bool,
    options: &SymbolEffectOptions,
) -> AnimationDescriptor {
    if !is_active {
        return AnimationDescriptor::IDLE;
    }

    let duration = effect.base_duration_ms() / options.effective_speed();

    if options.repeat_count.is_some() && effect != SymbolEffect::Bounce {
        tracing::trace!(?effect, "repeat count ignored for non-repeatable effect");
    }

    let reverse = EffectRepeat::Forever { autoreverse: true };
    let forward = EffectRepeat::Forever { autoreverse: false };

    match effect {
        SymbolEffect::Bounce => {
            AnimationDescriptor::tween(EffectProperty::Scale, 1.0, 1.2, duration)
                .with_curve(EffectCurve::Spring(SpringConfig::bouncy()))
                .repeating(EffectRepeat::Bounce(options.repeat_count.unwrap_or(1)))
        }
        SymbolEffect::Pulse => {
            AnimationDescriptor::tween(EffectProperty::Opacity, 1.0, 0.3, duration)
                .repeating(reverse)
        }
        SymbolEffect::VariableColor => {
            AnimationDescriptor::tween(EffectProperty::Hue, 0.0, 360.0, duration)
                .with_curve(EffectCurve::Tween(Easing::Linear))
                .repeating(forward)
        }
        SymbolEffect::Scale(factor) => {
            AnimationDescriptor::tween(EffectProperty::Scale, 1.0, factor, duration)
        }
        SymbolEffect::Replace => AnimationDescriptor::IDLE,
        SymbolEffect::Appear => {
            AnimationDescriptor::tween(EffectProperty::Opacity, 0.0, 1.0, duration)
        }
        SymbolEffect::Disappear => {
            AnimationDescriptor::tween(EffectProperty::Opacity, 1.0, 0.0, duration)
        }
        SymbolEffect::Breathe => {
            AnimationDescriptor::tween(EffectProperty::Scale, 1.0, 1.1, duration)
                .repeating(reverse)
        }
        SymbolEffect::Rotate => {
            AnimationDescriptor::tween(EffectProperty::Rotation, 0.0, 360.0, duration)
                .with_curve(EffectCurve::Tween(Easing::Linear))
                .repeating(forward)
        }
        SymbolEffect::Wiggle => {
            AnimationDescriptor::tween(EffectProperty::Rotation, -5.0, 5.0, duration)
                .repeating(reverse)
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Effect Transform
// ─────────────────────────────────────────────────────────────────────────────

/// Visual state an effect leaves a symbol in
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EffectTransform {
    pub scale: f32,
    pub opacity: f32,
    pub rotation_degrees: f32,
    pub hue_degrees: f32,
}

impl Default for EffectTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl EffectTransform {
    pub const IDENTITY: EffectTransform = EffectTransform {
        scale: 1.0,
        opacity: 1.0,
        rotation_degrees: 0.0,
        hue_degrees: 0.0,
    };

    /// Sample `descriptor` into a transform
    pub fn sample(descriptor: &AnimationDescriptor, elapsed_ms: f32) -> Self {
        let mut transform = Self::IDENTITY;
        let value = descriptor.value_at(elapsed_ms);
        match descriptor.property {
            EffectProperty::Scale => transform.scale = value,
            EffectProperty::Opacity => transform.opacity = value,
            EffectProperty::Rotation => transform.rotation_degrees = value,
            EffectProperty::Hue => transform.hue_degrees = value,
            EffectProperty::None => {}
        }
        transform
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Scale and rotation about `center`
    pub fn affine_about(&self, center: Point) -> Affine2D {
        Affine2D::translation(center.x, center.y)
            .rotated_by(Angle::degrees(self.rotation_degrees))
            .scaled_by(self.scale, self.scale)
            .translated_by(-center.x, -center.y)
    }

    /// `color` with the hue rotation and opacity applied
    pub fn tint(&self, color: Color) -> Color {
        let rotated = if self.hue_degrees == 0.0 {
            color
        } else {
            color.hue_rotated(Angle::degrees(self.hue_degrees))
        };
        rotated.fade(self.opacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_divides_base_duration() {
        for effect in SymbolEffect::ALL {
            if effect == SymbolEffect::Replace {
                continue;
            }
            for speed in [0.5_f32, 1.0, 2.0, 3.0] {
                let descriptor = apply(effect, true, &SymbolEffectOptions::speed(speed));
                assert_eq!(descriptor.duration_ms, effect.base_duration_ms() / speed);
            }
        }
    }

    #[test]
    fn test_repeat_options() {
        for n in 0..6 {
            let options = SymbolEffectOptions::repeat(n);
            assert_eq!(options.repeat_count, Some(n));
            assert_eq!(options.repeating, n != 1);
        }
        assert!(SymbolEffectOptions::REPEATING.repeating);
        assert!(!SymbolEffectOptions::NON_REPEATING.repeating);
        assert_eq!(SymbolEffectOptions::default(), SymbolEffectOptions::DEFAULT);
    }

    #[test]
    fn test_non_positive_speed_falls_back() {
        let descriptor = apply(SymbolEffect::Pulse, true, &SymbolEffectOptions::speed(0.0));
        assert_eq!(descriptor.duration_ms, 1000.0);
    }

    #[test]
    fn test_inactive_is_idle() {
        for effect in SymbolEffect::ALL {
            assert!(apply(effect, false, &SymbolEffectOptions::DEFAULT).is_idle());
        }
        assert!(apply(SymbolEffect::Replace, true, &SymbolEffectOptions::DEFAULT).is_idle());
    }

    #[test]
    fn test_effect_table() {
        let d = apply(SymbolEffect::Pulse, true, &SymbolEffectOptions::DEFAULT);
        assert_eq!(d.property, EffectProperty::Opacity);
        assert_eq!((d.from, d.to), (1.0, 0.3));
        assert_eq!(d.repeat, EffectRepeat::Forever { autoreverse: true });

        let d = apply(SymbolEffect::Rotate, true, &SymbolEffectOptions::DEFAULT);
        assert_eq!(d.property, EffectProperty::Rotation);
        assert_eq!(d.repeat, EffectRepeat::Forever { autoreverse: false });

        let d = apply(SymbolEffect::Scale(2.0), true, &SymbolEffectOptions::DEFAULT);
        assert_eq!((d.from, d.to), (1.0, 2.0));

        let d = apply(SymbolEffect::Bounce, true, &SymbolEffectOptions::repeat(3));
        assert_eq!(d.repeat, EffectRepeat::Bounce(3));
        assert_eq!(d.total_duration_ms(), Some(1500.0));
    }

    #[test]
    fn test_scale_tweens_over_full_duration() {
        let d = apply(SymbolEffect::scale(), true, &SymbolEffectOptions::DEFAULT);
        assert_eq!(d.property, EffectProperty::Scale);
        assert_eq!((d.from, d.to), (1.0, 1.5));
        assert_eq!(d.repeat, EffectRepeat::Once);
        assert_eq!(d.duration_ms, 300.0);
        assert_eq!(d.total_duration_ms(), Some(300.0));

        // Still rising at the midpoint, at the target by the end
        let mid = d.value_at(150.0);
        assert!(mid > 1.0 && mid < 1.5);
        assert!((d.value_at(300.0) - 1.5).abs() < 1e-4);

        let fast = apply(
            SymbolEffect::scale(),
            true,
            &SymbolEffectOptions::DEFAULT.with_speed(2.0),
        );
        assert_eq!(fast.total_duration_ms(), Some(150.0));
    }

    #[test]
    fn test_repeat_ignored_on_other_effects() {
        let d = apply(SymbolEffect::Appear, true, &SymbolEffectOptions::repeat(4));
        assert_eq!(d.repeat, EffectRepeat::Once);
        assert_eq!(d.total_duration_ms(), Some(400.0));
    }

    #[test]
    fn test_autoreverse_sampling() {
        let d = apply(SymbolEffect::Pulse, true, &SymbolEffectOptions::DEFAULT);
        assert!((d.value_at(0.0) - 1.0).abs() < 1e-4);
        assert!((d.value_at(1000.0) - 0.3).abs() < 1e-4);
        assert!((d.value_at(2000.0) - 1.0).abs() < 1e-4);
        // Reverse leg mirrors the forward leg
        assert!((d.value_at(500.0) - d.value_at(1500.0)).abs() < 1e-4);
    }

    #[test]
    fn test_bounce_returns_to_rest() {
        let d = apply(SymbolEffect::Bounce, true, &SymbolEffectOptions::repeat(2));
        assert_eq!(d.value_at(0.0), 1.0);
        assert!((d.value_at(250.0) - 1.2).abs() < 0.01);
        assert!((d.value_at(499.0) - 1.0).abs() < 0.01);
        assert!((d.value_at(750.0) - 1.2).abs() < 0.01);
        assert_eq!(d.value_at(1000.0), 1.0);

        let none = apply(SymbolEffect::Bounce, true, &SymbolEffectOptions::repeat(0));
        assert_eq!(none.total_duration_ms(), Some(0.0));
        assert_eq!(none.value_at(100.0), 1.0);
    }

    #[test]
    fn test_transform_sampling() {
        let d = apply(SymbolEffect::Rotate, true, &SymbolEffectOptions::DEFAULT);
        let t = EffectTransform::sample(&d, 1000.0);
        assert!((t.rotation_degrees - 180.0).abs() < 1e-3);
        assert_eq!(t.scale, 1.0);
        assert!(EffectTransform::sample(&AnimationDescriptor::IDLE, 50.0).is_identity());
    }

    #[test]
    fn test_affine_about_keeps_center_fixed() {
        let t = EffectTransform {
            scale: 2.0,
            rotation_degrees: 45.0,
            ..EffectTransform::IDENTITY
        };
        let center = Point::new(12.0, 12.0);
        let mapped = t.affine_about(center).transform_point(center);
        assert!((mapped.x - center.x).abs() < 1e-4);
        assert!((mapped.y - center.y).abs() < 1e-4);
    }

    #[test]
    fn test_tint_applies_opacity() {
        let t = EffectTransform {
            opacity: 0.5,
            ..EffectTransform::IDENTITY
        };
        assert_eq!(t.tint(Color::RED).a, 0.5);
        assert_eq!(EffectTransform::IDENTITY.tint(Color::RED), Color::RED);
    }
}
