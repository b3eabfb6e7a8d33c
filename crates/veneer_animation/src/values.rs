//! Animatable value types
//!
//! Provides the interpolation trait keyframe tracks are generic over, with
//! implementations for scalars, geometry and colors.

use veneer_core::{Angle, Color, Point, Size, Vec2};

/// Trait for values that can be linearly interpolated
pub trait Interpolate: Clone {
    /// Linearly interpolate between self and other by factor t
    ///
    /// `t` is not clamped: spring segments overshoot past 1.0.
    fn lerp(&self, other: &Self, t: f32) -> Self;

    /// Check if two values are approximately equal
    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool;
}

// ============================================================================
// Scalars
// ============================================================================

impl Interpolate for f32 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        (self - other).abs() < epsilon
    }
}

impl Interpolate for f64 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t as f64
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        (self - other).abs() < epsilon as f64
    }
}

// ============================================================================
// Geometry
// ============================================================================

impl Interpolate for Point {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Point::new(self.x.lerp(&other.x, t), self.y.lerp(&other.y, t))
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.x.approx_eq(&other.x, epsilon) && self.y.approx_eq(&other.y, epsilon)
    }
}

impl Interpolate for Vec2 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Vec2::new(self.x.lerp(&other.x, t), self.y.lerp(&other.y, t))
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.x.approx_eq(&other.x, epsilon) && self.y.approx_eq(&other.y, epsilon)
    }
}

impl Interpolate for Size {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Size::new(
            self.width.lerp(&other.width, t),
            self.height.lerp(&other.height, t),
        )
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.width.approx_eq(&other.width, epsilon)
            && self.height.approx_eq(&other.height, epsilon)
    }
}

impl Interpolate for Angle {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Angle::radians(self.as_radians().lerp(&other.as_radians(), t))
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.as_radians().approx_eq(&other.as_radians(), epsilon)
    }
}

// ============================================================================
// Color Implementation
// ============================================================================

impl Interpolate for Color {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        // Component-wise so spring overshoot is not clamped away
        Color::rgba(
            self.r.lerp(&other.r, t),
            self.g.lerp(&other.g, t),
            self.b.lerp(&other.b, t),
            self.a.lerp(&other.a, t),
        )
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        (self.r - other.r).abs() < epsilon
            && (self.g - other.g).abs() < epsilon
            && (self.b - other.b).abs() < epsilon
            && (self.a - other.a).abs() < epsilon
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_f32_interpolation() {
        assert_eq!(0.0_f32.lerp(&100.0, 0.5), 50.0);
        assert_eq!(1.0_f32.lerp(&2.0, 1.5), 2.5);
    }

    #[test]
    fn test_point_interpolation() {
        let p = Point::new(0.0, 10.0).lerp(&Point::new(10.0, 20.0), 0.5);
        assert!(p.approx_eq(&Point::new(5.0, 15.0), 1e-5));
    }

    #[test]
    fn test_color_interpolation() {
        let mid = Color::BLACK.lerp(&Color::WHITE, 0.5);
        assert!(mid.approx_eq(&Color::rgb(0.5, 0.5, 0.5), 1e-5));
    }
}
