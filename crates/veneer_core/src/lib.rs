//! Veneer Core
//!
//! Host-facing primitives shared by the Veneer graphics and animation crates:
//!
//! - **Geometry**: points, sizes, rects, unit-space anchors, angles and affine transforms
//! - **Paint**: colors, gradients, brushes and native blend modes
//! - **Draw**: paths, strokes, clip shapes and the [`DrawContext`] host trait

pub mod draw;
pub mod geometry;
pub mod paint;

pub use draw::{
    replay, ClipShape, DrawCommand, DrawContext, FillRule, FillStyle, FontWeight,
    ImageId, ImageOptions, LayerConfig, LineCap, LineJoin, Path, PathCommand, RecordingContext,
    Stroke, TextStyle,
};
pub use geometry::{Affine2D, Angle, Point, Rect, Size, UnitPoint, Vec2};
pub use paint::{
    even_stops, sample_stops, BlendMode, Brush, Color, CornerRadius, Gradient, GradientSpread,
    GradientStop,
};
