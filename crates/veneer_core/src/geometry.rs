//! Geometry primitives
//!
//! Points, sizes, rectangles, unit-space anchors, angles and the 2D affine
//! matrix used by the graphics context. All coordinates are `f32` in a
//! y-down coordinate space (origin at the top-left).

use std::ops::{Add, Mul, Sub};

// ─────────────────────────────────────────────────────────────────────────────
// Points and Sizes
// ─────────────────────────────────────────────────────────────────────────────

/// 2D point
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Distance to another point
    pub fn distance(&self, other: Point) -> f32 {
        (*self - other).length()
    }
}

impl Add<Vec2> for Point {
    type Output = Point;

    fn add(self, rhs: Vec2) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Vec2;

    fn sub(self, rhs: Point) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// 2D size
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Convert to a Rect at the origin (0, 0)
    pub const fn to_rect(self) -> Rect {
        Rect {
            origin: Point::ZERO,
            size: self,
        }
    }

    /// True when either dimension is zero, negative or NaN
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Scale both dimensions by a factor
    pub fn scaled(&self, factor: f32) -> Size {
        Size::new(self.width * factor, self.height * factor)
    }
}

impl From<Size> for Rect {
    /// Convert Size to Rect at origin (0, 0)
    fn from(size: Size) -> Self {
        size.to_rect()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rectangles
// ─────────────────────────────────────────────────────────────────────────────

/// 2D rectangle
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        origin: Point::ZERO,
        size: Size::ZERO,
    };

    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    /// Rectangle of `size` placed so that `anchor` (in unit space of the
    /// rectangle) lands on `point`.
    ///
    /// The origin is `point - size * anchor`: `UnitPoint::CENTER` centers the
    /// rectangle on the point, `UnitPoint::TOP_LEADING` puts its origin there.
    pub fn anchored(point: Point, size: Size, anchor: UnitPoint) -> Self {
        Self::from_origin_size(
            Point::new(
                point.x - size.width * anchor.x,
                point.y - size.height * anchor.y,
            ),
            size,
        )
    }

    pub fn x(&self) -> f32 {
        self.origin.x
    }

    pub fn y(&self) -> f32 {
        self.origin.y
    }

    pub fn width(&self) -> f32 {
        self.size.width
    }

    pub fn height(&self) -> f32 {
        self.size.height
    }

    pub fn max_x(&self) -> f32 {
        self.origin.x + self.size.width
    }

    pub fn max_y(&self) -> f32 {
        self.origin.y + self.size.height
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width / 2.0,
            self.origin.y + self.size.height / 2.0,
        )
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.origin.x
            && point.x <= self.max_x()
            && point.y >= self.origin.y
            && point.y <= self.max_y()
    }

    /// Get the size of this rect
    pub fn size(&self) -> Size {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size.is_empty()
    }

    /// Offset the rect by (dx, dy)
    pub fn offset(&self, dx: f32, dy: f32) -> Self {
        Rect::new(
            self.origin.x + dx,
            self.origin.y + dy,
            self.size.width,
            self.size.height,
        )
    }

    /// Create a rect centered on a point
    pub fn from_center(center: Point, size: Size) -> Self {
        Self::anchored(center, size, UnitPoint::CENTER)
    }

    /// Smallest rect containing both points
    pub fn from_points(p1: Point, p2: Point) -> Self {
        let min_x = p1.x.min(p2.x);
        let min_y = p1.y.min(p2.y);
        Rect::new(
            min_x,
            min_y,
            p1.x.max(p2.x) - min_x,
            p1.y.max(p2.y) - min_y,
        )
    }

    /// Smallest rect containing both rects
    pub fn union(&self, other: &Rect) -> Self {
        let min_x = self.x().min(other.x());
        let min_y = self.y().min(other.y());
        let max_x = self.max_x().max(other.max_x());
        let max_y = self.max_y().max(other.max_y());
        Rect::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    /// Overlapping region of two rects, if any
    pub fn intersection(&self, other: &Rect) -> Option<Self> {
        let min_x = self.x().max(other.x());
        let min_y = self.y().max(other.y());
        let max_x = self.max_x().min(other.max_x());
        let max_y = self.max_y().min(other.max_y());

        if max_x > min_x && max_y > min_y {
            Some(Rect::new(min_x, min_y, max_x - min_x, max_y - min_y))
        } else {
            None
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Vectors, Anchors and Angles
// ─────────────────────────────────────────────────────────────────────────────

/// 2D vector
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// A point in the unit square of some box: (0, 0) is the top-leading corner,
/// (1, 1) the bottom-trailing one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnitPoint {
    pub x: f32,
    pub y: f32,
}

impl UnitPoint {
    pub const ZERO: UnitPoint = UnitPoint::new(0.0, 0.0);
    pub const CENTER: UnitPoint = UnitPoint::new(0.5, 0.5);
    pub const LEADING: UnitPoint = UnitPoint::new(0.0, 0.5);
    pub const TRAILING: UnitPoint = UnitPoint::new(1.0, 0.5);
    pub const TOP: UnitPoint = UnitPoint::new(0.5, 0.0);
    pub const BOTTOM: UnitPoint = UnitPoint::new(0.5, 1.0);
    pub const TOP_LEADING: UnitPoint = UnitPoint::new(0.0, 0.0);
    pub const TOP_TRAILING: UnitPoint = UnitPoint::new(1.0, 0.0);
    pub const BOTTOM_LEADING: UnitPoint = UnitPoint::new(0.0, 1.0);
    pub const BOTTOM_TRAILING: UnitPoint = UnitPoint::new(1.0, 1.0);

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Resolve this unit point inside a concrete rect
    pub fn in_rect(&self, rect: Rect) -> Point {
        Point::new(
            rect.x() + rect.width() * self.x,
            rect.y() + rect.height() * self.y,
        )
    }
}

impl Default for UnitPoint {
    fn default() -> Self {
        Self::CENTER
    }
}

/// A planar angle
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Angle {
    radians: f32,
}

impl Angle {
    pub const ZERO: Angle = Angle { radians: 0.0 };

    pub const fn radians(radians: f32) -> Self {
        Self { radians }
    }

    pub fn degrees(degrees: f32) -> Self {
        Self {
            radians: degrees.to_radians(),
        }
    }

    pub fn as_radians(&self) -> f32 {
        self.radians
    }

    pub fn as_degrees(&self) -> f32 {
        self.radians.to_degrees()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Affine Transform
// ─────────────────────────────────────────────────────────────────────────────

/// 2D affine transformation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Affine2D {
    /// Matrix elements [a, b, c, d, tx, ty]
    /// | a  c  tx |
    /// | b  d  ty |
    /// | 0  0   1 |
    pub elements: [f32; 6],
}

impl Default for Affine2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine2D {
    pub const IDENTITY: Affine2D = Affine2D {
        elements: [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
    };

    pub const fn new(a: f32, b: f32, c: f32, d: f32, tx: f32, ty: f32) -> Self {
        Self {
            elements: [a, b, c, d, tx, ty],
        }
    }

    pub fn translation(x: f32, y: f32) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, x, y)
    }

    pub fn scale(sx: f32, sy: f32) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    pub fn rotation(angle: Angle) -> Self {
        let (s, c) = angle.as_radians().sin_cos();
        Self::new(c, s, -s, c, 0.0, 0.0)
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    pub fn transform_point(&self, point: Point) -> Point {
        let [a, b, c, d, tx, ty] = self.elements;
        Point::new(
            a * point.x + c * point.y + tx,
            b * point.x + d * point.y + ty,
        )
    }

    /// Axis-aligned bounds of a transformed rect
    pub fn transform_rect(&self, rect: Rect) -> Rect {
        let corners = [
            self.transform_point(rect.origin),
            self.transform_point(Point::new(rect.max_x(), rect.y())),
            self.transform_point(Point::new(rect.x(), rect.max_y())),
            self.transform_point(Point::new(rect.max_x(), rect.max_y())),
        ];
        let mut bounds = Rect::from_points(corners[0], corners[1]);
        for corner in &corners[2..] {
            bounds = bounds.union(&Rect::from_origin_size(*corner, Size::ZERO));
        }
        bounds
    }

    /// Concatenate this transform with another (self * other)
    /// The resulting transform first applies `other`, then `self`.
    pub fn then(&self, other: &Affine2D) -> Affine2D {
        let [a1, b1, c1, d1, tx1, ty1] = self.elements;
        let [a2, b2, c2, d2, tx2, ty2] = other.elements;

        Affine2D {
            elements: [
                a1 * a2 + c1 * b2,
                b1 * a2 + d1 * b2,
                a1 * c2 + c1 * d2,
                b1 * c2 + d1 * d2,
                a1 * tx2 + c1 * ty2 + tx1,
                b1 * tx2 + d1 * ty2 + ty1,
            ],
        }
    }

    /// Translate in this transform's local space (right-multiplication)
    pub fn translated_by(&self, x: f32, y: f32) -> Affine2D {
        self.then(&Affine2D::translation(x, y))
    }

    /// Scale in this transform's local space (right-multiplication)
    pub fn scaled_by(&self, sx: f32, sy: f32) -> Affine2D {
        self.then(&Affine2D::scale(sx, sy))
    }

    /// Rotate in this transform's local space (right-multiplication)
    pub fn rotated_by(&self, angle: Angle) -> Affine2D {
        self.then(&Affine2D::rotation(angle))
    }

    pub fn determinant(&self) -> f32 {
        let [a, b, c, d, _, _] = self.elements;
        a * d - b * c
    }

    /// Inverse transform, or `None` when the matrix is singular
    pub fn invert(&self) -> Option<Affine2D> {
        let det = self.determinant();
        if det.abs() <= f32::EPSILON || !det.is_finite() {
            return None;
        }
        let [a, b, c, d, tx, ty] = self.elements;
        let inv = 1.0 / det;
        Some(Affine2D::new(
            d * inv,
            -b * inv,
            -c * inv,
            a * inv,
            (c * ty - d * tx) * inv,
            (b * tx - a * ty) * inv,
        ))
    }
}
