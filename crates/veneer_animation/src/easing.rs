//! Easing curves
//!
//! Timing curves map linear progress in `[0, 1]` onto eased progress. The named
//! curves are the CSS cubic-bezier presets; `CubicBezier` takes arbitrary
//! control points.

use serde::{Deserialize, Serialize};

/// A timing curve
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    /// Cubic bezier through (0,0), (x1,y1), (x2,y2), (1,1)
    CubicBezier { x1: f32, y1: f32, x2: f32, y2: f32 },
}

impl Easing {
    /// Control points used by cubic keyframes when none are given
    pub const DEFAULT_CUBIC: [f32; 4] = [0.42, 0.0, 0.58, 1.0];

    pub fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Easing::CubicBezier { x1, y1, x2, y2 }
    }

    pub fn from_control_points(points: [f32; 4]) -> Self {
        Self::cubic_bezier(points[0], points[1], points[2], points[3])
    }

    /// Eased progress for linear progress `t` (clamped to `[0, 1]`)
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Easing::Linear => t,
            Easing::EaseIn => cubic_bezier_ease(t, 0.42, 0.0, 1.0, 1.0),
            Easing::EaseOut => cubic_bezier_ease(t, 0.0, 0.0, 0.58, 1.0),
            Easing::EaseInOut => cubic_bezier_ease(t, 0.42, 0.0, 0.58, 1.0),
            Easing::CubicBezier { x1, y1, x2, y2 } => cubic_bezier_ease(t, x1, y1, x2, y2),
        }
    }
}

fn cubic_bezier_ease(x: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }

    fn sample_curve(a1: f32, a2: f32, t: f32) -> f32 {
        let omt = 1.0 - t;
        3.0 * omt * omt * t * a1 + 3.0 * omt * t * t * a2 + t * t * t
    }

    fn sample_curve_derivative(a1: f32, a2: f32, t: f32) -> f32 {
        let omt = 1.0 - t;
        3.0 * omt * omt * a1 + 6.0 * omt * t * (a2 - a1) + 3.0 * t * t * (1.0 - a2)
    }

    // Solve bx(u) = x with Newton steps, then tighten the bracket by bisection.
    let mut u = x;
    for _ in 0..8 {
        let err = sample_curve(x1, x2, u) - x;
        let d = sample_curve_derivative(x1, x2, u);
        if d.abs() < 1e-6 {
            break;
        }
        u = (u - err / d).clamp(0.0, 1.0);
    }

    let mut lo = 0.0_f32;
    let mut hi = 1.0_f32;
    for _ in 0..12 {
        if (sample_curve(x1, x2, u) - x).abs() < 1e-6 {
            break;
        }
        if sample_curve(x1, x2, u) < x {
            lo = u;
        } else {
            hi = u;
        }
        u = 0.5 * (lo + hi);
    }

    sample_curve(y1, y2, u)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        for easing in [
            Easing::Linear,
            Easing::EaseIn,
            Easing::EaseOut,
            Easing::EaseInOut,
            Easing::cubic_bezier(0.25, 0.1, 0.25, 1.0),
        ] {
            assert!(easing.apply(0.0).abs() < 1e-4);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_ease_in_out_is_symmetric() {
        let e = Easing::EaseInOut;
        assert!((e.apply(0.5) - 0.5).abs() < 1e-3);
        assert!((e.apply(0.25) + e.apply(0.75) - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_ease_in_starts_slow() {
        assert!(Easing::EaseIn.apply(0.25) < 0.25);
        assert!(Easing::EaseOut.apply(0.25) > 0.25);
    }

    #[test]
    fn test_linear_bezier_is_identity() {
        let e = Easing::cubic_bezier(1.0 / 3.0, 1.0 / 3.0, 2.0 / 3.0, 2.0 / 3.0);
        for i in 0..=10 {
            let t = i as f32 / 10.0;
            assert!((e.apply(t) - t).abs() < 1e-3);
        }
    }

    #[test]
    fn test_input_is_clamped() {
        assert_eq!(Easing::Linear.apply(-1.0), 0.0);
        assert_eq!(Easing::EaseOut.apply(2.0), 1.0);
    }
}
