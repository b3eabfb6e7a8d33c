//! Draw Context - host rendering API
//!
//! The `DrawContext` trait is the contract between the graphics layer and the
//! host toolkit's immediate-mode canvas. It maintains transform, clip, opacity
//! and blend-mode stacks and exposes primitive path, text and image drawing.
//!
//! Two hosts implement it in this workspace: [`RecordingContext`], which
//! records [`DrawCommand`]s for later replay, and the tiny-skia raster canvas
//! in `veneer_paint`.
//!
//! # Example
//!
//! ```ignore
//! fn paint(ctx: &mut dyn DrawContext) {
//!     ctx.push_transform(Affine2D::translation(10.0, 20.0));
//!     ctx.fill_rect(Rect::new(0.0, 0.0, 100.0, 50.0), 8.0.into(), Color::BLUE.into());
//!     ctx.pop_transform();
//! }
//! ```

use smallvec::{smallvec, SmallVec};

use crate::geometry::{Affine2D, Point, Rect, Size};
use crate::paint::{BlendMode, Brush, Color, CornerRadius};

// ─────────────────────────────────────────────────────────────────────────────
// Fill and Stroke Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Rule deciding which regions of a self-intersecting path are inside
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FillRule {
    #[default]
    NonZero,
    EvenOdd,
}

/// Fill configuration for paths and clips
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FillStyle {
    pub rule: FillRule,
    pub antialiased: bool,
}

impl Default for FillStyle {
    fn default() -> Self {
        Self {
            rule: FillRule::NonZero,
            antialiased: true,
        }
    }
}

impl FillStyle {
    pub fn even_odd() -> Self {
        Self {
            rule: FillRule::EvenOdd,
            ..Default::default()
        }
    }

    pub fn with_antialiasing(mut self, antialiased: bool) -> Self {
        self.antialiased = antialiased;
        self
    }
}

/// Line cap style
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineCap {
    /// Flat cap at the endpoint
    #[default]
    Butt,
    /// Rounded cap extending past the endpoint
    Round,
    /// Square cap extending past the endpoint
    Square,
}

/// Line join style
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineJoin {
    /// Miter join (sharp corner)
    #[default]
    Miter,
    /// Round join
    Round,
    /// Bevel join (flat corner)
    Bevel,
}

/// Stroke style configuration
#[derive(Clone, Debug, PartialEq)]
pub struct Stroke {
    /// Line width
    pub width: f32,
    /// Line cap style
    pub cap: LineCap,
    /// Line join style
    pub join: LineJoin,
    /// Miter limit (for Miter joins)
    pub miter_limit: f32,
    /// Dash pattern (empty for solid line)
    pub dash: Vec<f32>,
    /// Dash offset
    pub dash_offset: f32,
}

impl Default for Stroke {
    fn default() -> Self {
        Self {
            width: 1.0,
            cap: LineCap::Butt,
            join: LineJoin::Miter,
            miter_limit: 10.0,
            dash: Vec::new(),
            dash_offset: 0.0,
        }
    }
}

impl Stroke {
    /// Create a new stroke with the given width
    pub fn new(width: f32) -> Self {
        Self {
            width,
            ..Default::default()
        }
    }

    /// Set line cap style
    pub fn with_cap(mut self, cap: LineCap) -> Self {
        self.cap = cap;
        self
    }

    /// Set line join style
    pub fn with_join(mut self, join: LineJoin) -> Self {
        self.join = join;
        self
    }

    pub fn with_miter_limit(mut self, limit: f32) -> Self {
        self.miter_limit = limit;
        self
    }

    /// Set dash pattern
    pub fn with_dash(mut self, pattern: Vec<f32>, offset: f32) -> Self {
        self.dash = pattern;
        self.dash_offset = offset;
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Text Types
// ─────────────────────────────────────────────────────────────────────────────

/// Font weight
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FontWeight {
    Light,
    #[default]
    Regular,
    Medium,
    Bold,
}

/// Text style
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    /// Font family name, empty for the system font
    pub family: String,
    /// Font size in points
    pub size: f32,
    pub weight: FontWeight,
    pub color: Color,
    /// Line height multiplier
    pub line_height: f32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            family: String::new(),
            size: 17.0,
            weight: FontWeight::Regular,
            color: Color::BLACK,
            line_height: 1.2,
        }
    }
}

impl TextStyle {
    /// Create a text style with the given font size
    pub fn new(size: f32) -> Self {
        Self {
            size,
            ..Default::default()
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_weight(mut self, weight: FontWeight) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = family.into();
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Path Types
// ─────────────────────────────────────────────────────────────────────────────

/// Path command for building vector paths
#[derive(Clone, Debug, PartialEq)]
pub enum PathCommand {
    /// Move to a point
    MoveTo(Point),
    /// Line to a point
    LineTo(Point),
    /// Quadratic Bézier curve
    QuadTo { control: Point, end: Point },
    /// Cubic Bézier curve
    CubicTo {
        control1: Point,
        control2: Point,
        end: Point,
    },
    /// Close the current subpath
    Close,
}

/// A vector path
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    commands: Vec<PathCommand>,
}

// Cubic Bézier circle approximation constant
const KAPPA: f32 = 0.552_284_8;

impl Path {
    /// Create a new empty path
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Move to a point
    pub fn move_to(mut self, x: f32, y: f32) -> Self {
        self.commands.push(PathCommand::MoveTo(Point::new(x, y)));
        self
    }

    /// Line to a point
    pub fn line_to(mut self, x: f32, y: f32) -> Self {
        self.commands.push(PathCommand::LineTo(Point::new(x, y)));
        self
    }

    /// Quadratic Bézier curve
    pub fn quad_to(mut self, cx: f32, cy: f32, x: f32, y: f32) -> Self {
        self.commands.push(PathCommand::QuadTo {
            control: Point::new(cx, cy),
            end: Point::new(x, y),
        });
        self
    }

    /// Cubic Bézier curve
    pub fn cubic_to(mut self, cx1: f32, cy1: f32, cx2: f32, cy2: f32, x: f32, y: f32) -> Self {
        self.commands.push(PathCommand::CubicTo {
            control1: Point::new(cx1, cy1),
            control2: Point::new(cx2, cy2),
            end: Point::new(x, y),
        });
        self
    }

    /// Close the path
    pub fn close(mut self) -> Self {
        self.commands.push(PathCommand::Close);
        self
    }

    /// Append every subpath of `other`
    pub fn append(mut self, other: &Path) -> Self {
        self.commands.extend(other.commands.iter().cloned());
        self
    }

    /// Create a rectangle path
    pub fn rect(rect: Rect) -> Self {
        Self::new()
            .move_to(rect.x(), rect.y())
            .line_to(rect.max_x(), rect.y())
            .line_to(rect.max_x(), rect.max_y())
            .line_to(rect.x(), rect.max_y())
            .close()
    }

    /// Create an ellipse path inscribed in `rect`
    pub fn ellipse(rect: Rect) -> Self {
        let rx = rect.width() / 2.0;
        let ry = rect.height() / 2.0;
        let Point { x: cx, y: cy } = rect.center();
        let (kx, ky) = (rx * KAPPA, ry * KAPPA);

        Self::new()
            .move_to(cx + rx, cy)
            .cubic_to(cx + rx, cy + ky, cx + kx, cy + ry, cx, cy + ry)
            .cubic_to(cx - kx, cy + ry, cx - rx, cy + ky, cx - rx, cy)
            .cubic_to(cx - rx, cy - ky, cx - kx, cy - ry, cx, cy - ry)
            .cubic_to(cx + kx, cy - ry, cx + rx, cy - ky, cx + rx, cy)
            .close()
    }

    /// Create a circle path
    pub fn circle(center: Point, radius: f32) -> Self {
        Self::ellipse(Rect::from_center(
            center,
            Size::new(radius * 2.0, radius * 2.0),
        ))
    }

    /// Create a rounded rectangle path
    pub fn rounded_rect(rect: Rect, corner_radius: impl Into<CornerRadius>) -> Self {
        let r = corner_radius.into();
        let x = rect.x();
        let y = rect.y();
        let w = rect.width();
        let h = rect.height();

        // Clamp radii to half the minimum dimension
        let max_r = (w.min(h) / 2.0).max(0.0);
        let tl = r.top_left.min(max_r);
        let tr = r.top_right.min(max_r);
        let br = r.bottom_right.min(max_r);
        let bl = r.bottom_left.min(max_r);
        let k = 1.0 - KAPPA;

        let mut path = Self::new().move_to(x + tl, y).line_to(x + w - tr, y);
        if tr > 0.0 {
            path = path.cubic_to(x + w - tr * k, y, x + w, y + tr * k, x + w, y + tr);
        }
        path = path.line_to(x + w, y + h - br);
        if br > 0.0 {
            path = path.cubic_to(x + w, y + h - br * k, x + w - br * k, y + h, x + w - br, y + h);
        }
        path = path.line_to(x + bl, y + h);
        if bl > 0.0 {
            path = path.cubic_to(x + bl * k, y + h, x, y + h - bl * k, x, y + h - bl);
        }
        path = path.line_to(x, y + tl);
        if tl > 0.0 {
            path = path.cubic_to(x, y + tl * k, x + tl * k, y, x + tl, y);
        }
        path.close()
    }

    /// Get the path commands
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    /// Check if the path is empty
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Map every point of the path through `transform`
    pub fn transformed(&self, transform: &Affine2D) -> Path {
        if transform.is_identity() {
            return self.clone();
        }
        let map = |p: &Point| transform.transform_point(*p);
        let commands = self
            .commands
            .iter()
            .map(|cmd| match cmd {
                PathCommand::MoveTo(p) => PathCommand::MoveTo(map(p)),
                PathCommand::LineTo(p) => PathCommand::LineTo(map(p)),
                PathCommand::QuadTo { control, end } => PathCommand::QuadTo {
                    control: map(control),
                    end: map(end),
                },
                PathCommand::CubicTo {
                    control1,
                    control2,
                    end,
                } => PathCommand::CubicTo {
                    control1: map(control1),
                    control2: map(control2),
                    end: map(end),
                },
                PathCommand::Close => PathCommand::Close,
            })
            .collect();
        Path { commands }
    }

    /// Calculate the bounding rectangle of this path (control points included)
    pub fn bounds(&self) -> Rect {
        let mut min_x = f32::INFINITY;
        let mut min_y = f32::INFINITY;
        let mut max_x = f32::NEG_INFINITY;
        let mut max_y = f32::NEG_INFINITY;

        let mut include = |p: &Point| {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        };

        for cmd in &self.commands {
            match cmd {
                PathCommand::MoveTo(p) | PathCommand::LineTo(p) => include(p),
                PathCommand::QuadTo { control, end } => {
                    include(control);
                    include(end);
                }
                PathCommand::CubicTo {
                    control1,
                    control2,
                    end,
                } => {
                    include(control1);
                    include(control2);
                    include(end);
                }
                PathCommand::Close => {}
            }
        }

        if min_x.is_finite() && min_y.is_finite() && max_x.is_finite() && max_y.is_finite() {
            Rect::new(min_x, min_y, max_x - min_x, max_y - min_y)
        } else {
            Rect::ZERO
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Image and Layer Types
// ─────────────────────────────────────────────────────────────────────────────

/// Handle to an image registered with the host
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ImageId(pub u64);

/// Image rendering options
#[derive(Clone, Debug, PartialEq)]
pub struct ImageOptions {
    /// Tint color replacing the image's color channels, alpha preserved
    pub tint: Option<Color>,
    /// Opacity (1.0 = fully opaque)
    pub opacity: f32,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageOptions {
    pub fn new() -> Self {
        Self {
            tint: None,
            opacity: 1.0,
        }
    }

    pub fn with_tint(mut self, color: Color) -> Self {
        self.tint = Some(color);
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }
}

/// Configuration of an offscreen compositing layer
#[derive(Clone, Debug, PartialEq)]
pub struct LayerConfig {
    /// Opacity the layer is composited with
    pub opacity: f32,
    /// Blend mode the layer is composited with
    pub blend_mode: BlendMode,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            blend_mode: BlendMode::Normal,
        }
    }
}

impl LayerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn blend_mode(mut self, mode: BlendMode) -> Self {
        self.blend_mode = mode;
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Clip Shape
// ─────────────────────────────────────────────────────────────────────────────

/// Shape used for clipping, interpreted in the host's current transform
#[derive(Clone, Debug, PartialEq)]
pub enum ClipShape {
    /// Axis-aligned rectangle clip
    Rect(Rect),
    /// Rounded rectangle clip
    RoundedRect {
        rect: Rect,
        corner_radius: CornerRadius,
    },
    /// Circular clip
    Circle { center: Point, radius: f32 },
    /// Arbitrary path clip
    Path { path: Path, style: FillStyle },
}

impl ClipShape {
    pub fn rect(rect: Rect) -> Self {
        ClipShape::Rect(rect)
    }

    pub fn path(path: Path, style: FillStyle) -> Self {
        ClipShape::Path { path, style }
    }

    /// Outline of the clip as a path plus its fill style
    pub fn to_path(&self) -> (Path, FillStyle) {
        match self {
            ClipShape::Rect(rect) => (Path::rect(*rect), FillStyle::default()),
            ClipShape::RoundedRect {
                rect,
                corner_radius,
            } => (Path::rounded_rect(*rect, *corner_radius), FillStyle::default()),
            ClipShape::Circle { center, radius } => {
                (Path::circle(*center, *radius), FillStyle::default())
            }
            ClipShape::Path { path, style } => (path.clone(), *style),
        }
    }

    /// Get the bounding rect of this clip shape
    pub fn bounds(&self) -> Rect {
        match self {
            ClipShape::Rect(rect) => *rect,
            ClipShape::RoundedRect { rect, .. } => *rect,
            ClipShape::Circle { center, radius } => {
                Rect::from_center(*center, Size::new(*radius * 2.0, *radius * 2.0))
            }
            ClipShape::Path { path, .. } => path.bounds(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Draw Context Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Immediate-mode drawing surface provided by the host toolkit
///
/// Every push must be balanced by the matching pop. Pushed transforms compose
/// with the current one; pushed clips intersect with the current clip; pushed
/// opacities multiply.
pub trait DrawContext {
    // ─────────────────────────────────────────────────────────────────────────
    // Transform Stack
    // ─────────────────────────────────────────────────────────────────────────

    /// Push a transform, composed after the current one
    fn push_transform(&mut self, transform: Affine2D);

    /// Pop the top transform from the stack
    fn pop_transform(&mut self);

    /// Get the current combined transform
    fn current_transform(&self) -> Affine2D;

    // ─────────────────────────────────────────────────────────────────────────
    // State Stack
    // ─────────────────────────────────────────────────────────────────────────

    /// Push a clip shape, intersected with the current clip
    fn push_clip(&mut self, shape: ClipShape);

    /// Pop the top clip from the stack
    fn pop_clip(&mut self);

    /// Push an opacity value (multiplied with parent)
    fn push_opacity(&mut self, opacity: f32);

    /// Pop the top opacity from the stack
    fn pop_opacity(&mut self);

    /// Push a blend mode
    fn push_blend_mode(&mut self, mode: BlendMode);

    /// Pop the top blend mode from the stack
    fn pop_blend_mode(&mut self);

    // ─────────────────────────────────────────────────────────────────────────
    // 2D Drawing Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Fill a path with a brush
    fn fill_path(&mut self, path: &Path, style: FillStyle, brush: Brush);

    /// Stroke a path
    fn stroke_path(&mut self, path: &Path, stroke: &Stroke, brush: Brush);

    /// Fill a rectangle (convenience method)
    fn fill_rect(&mut self, rect: Rect, corner_radius: CornerRadius, brush: Brush) {
        let path = if corner_radius.is_zero() {
            Path::rect(rect)
        } else {
            Path::rounded_rect(rect, corner_radius)
        };
        self.fill_path(&path, FillStyle::default(), brush);
    }

    /// Draw text laid out inside `bounds`
    fn draw_text(&mut self, text: &str, bounds: Rect, style: &TextStyle);

    /// Draw an image scaled into `rect`
    fn draw_image(&mut self, image: ImageId, rect: Rect, options: &ImageOptions);

    // ─────────────────────────────────────────────────────────────────────────
    // Layers
    // ─────────────────────────────────────────────────────────────────────────

    /// Begin an offscreen compositing group
    fn push_layer(&mut self, config: LayerConfig);

    /// Composite the top layer onto the one below
    fn pop_layer(&mut self);

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// Size of the drawing surface in device pixels
    fn viewport_size(&self) -> Size;

    fn current_opacity(&self) -> f32;

    fn current_blend_mode(&self) -> BlendMode;
}

// ─────────────────────────────────────────────────────────────────────────────
// Recording Draw Context
// ─────────────────────────────────────────────────────────────────────────────

/// A draw command that can be recorded and replayed
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    // State
    PushTransform(Affine2D),
    PopTransform,
    PushClip(ClipShape),
    PopClip,
    PushOpacity(f32),
    PopOpacity,
    PushBlendMode(BlendMode),
    PopBlendMode,

    // 2D Drawing
    FillPath {
        path: Path,
        style: FillStyle,
        brush: Brush,
    },
    StrokePath {
        path: Path,
        stroke: Stroke,
        brush: Brush,
    },
    DrawText {
        text: String,
        bounds: Rect,
        style: TextStyle,
    },
    DrawImage {
        image: ImageId,
        rect: Rect,
        options: ImageOptions,
    },

    // Layer
    PushLayer(LayerConfig),
    PopLayer,
}

/// Replay recorded commands onto another context
pub fn replay(commands: &[DrawCommand], ctx: &mut dyn DrawContext) {
    for command in commands {
        match command {
            DrawCommand::PushTransform(t) => ctx.push_transform(*t),
            DrawCommand::PopTransform => ctx.pop_transform(),
            DrawCommand::PushClip(shape) => ctx.push_clip(shape.clone()),
            DrawCommand::PopClip => ctx.pop_clip(),
            DrawCommand::PushOpacity(o) => ctx.push_opacity(*o),
            DrawCommand::PopOpacity => ctx.pop_opacity(),
            DrawCommand::PushBlendMode(m) => ctx.push_blend_mode(*m),
            DrawCommand::PopBlendMode => ctx.pop_blend_mode(),
            DrawCommand::FillPath { path, style, brush } => {
                ctx.fill_path(path, *style, brush.clone())
            }
            DrawCommand::StrokePath {
                path,
                stroke,
                brush,
            } => ctx.stroke_path(path, stroke, brush.clone()),
            DrawCommand::DrawText {
                text,
                bounds,
                style,
            } => ctx.draw_text(text, *bounds, style),
            DrawCommand::DrawImage {
                image,
                rect,
                options,
            } => ctx.draw_image(*image, *rect, options),
            DrawCommand::PushLayer(config) => ctx.push_layer(config.clone()),
            DrawCommand::PopLayer => ctx.pop_layer(),
        }
    }
}

/// A draw context that records commands for later execution
#[derive(Debug)]
pub struct RecordingContext {
    commands: Vec<DrawCommand>,
    transform_stack: SmallVec<[Affine2D; 4]>,
    opacity_stack: SmallVec<[f32; 4]>,
    blend_mode_stack: SmallVec<[BlendMode; 4]>,
    clip_depth: usize,
    viewport: Size,
}

impl RecordingContext {
    /// Create a new recording context
    pub fn new(viewport: Size) -> Self {
        Self {
            commands: Vec::new(),
            transform_stack: smallvec![Affine2D::IDENTITY],
            opacity_stack: smallvec![1.0],
            blend_mode_stack: smallvec![BlendMode::Normal],
            clip_depth: 0,
            viewport,
        }
    }

    /// Get the recorded commands
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Take the recorded commands
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Number of clips currently pushed
    pub fn clip_depth(&self) -> usize {
        self.clip_depth
    }

    /// Clear all recorded commands
    pub fn clear(&mut self) {
        self.commands.clear();
        self.transform_stack = smallvec![Affine2D::IDENTITY];
        self.opacity_stack = smallvec![1.0];
        self.blend_mode_stack = smallvec![BlendMode::Normal];
        self.clip_depth = 0;
    }
}

impl DrawContext for RecordingContext {
    fn push_transform(&mut self, transform: Affine2D) {
        self.commands.push(DrawCommand::PushTransform(transform));
        let combined = self.current_transform().then(&transform);
        self.transform_stack.push(combined);
    }

    fn pop_transform(&mut self) {
        self.commands.push(DrawCommand::PopTransform);
        if self.transform_stack.len() > 1 {
            self.transform_stack.pop();
        } else {
            tracing::warn!("pop_transform called on the root transform");
        }
    }

    fn current_transform(&self) -> Affine2D {
        self.transform_stack.last().copied().unwrap_or_default()
    }

    fn push_clip(&mut self, shape: ClipShape) {
        self.commands.push(DrawCommand::PushClip(shape));
        self.clip_depth += 1;
    }

    fn pop_clip(&mut self) {
        self.commands.push(DrawCommand::PopClip);
        self.clip_depth = self.clip_depth.saturating_sub(1);
    }

    fn push_opacity(&mut self, opacity: f32) {
        self.commands.push(DrawCommand::PushOpacity(opacity));
        let current = self.current_opacity();
        self.opacity_stack.push(current * opacity);
    }

    fn pop_opacity(&mut self) {
        self.commands.push(DrawCommand::PopOpacity);
        if self.opacity_stack.len() > 1 {
            self.opacity_stack.pop();
        }
    }

    fn push_blend_mode(&mut self, mode: BlendMode) {
        self.commands.push(DrawCommand::PushBlendMode(mode));
        self.blend_mode_stack.push(mode);
    }

    fn pop_blend_mode(&mut self) {
        self.commands.push(DrawCommand::PopBlendMode);
        if self.blend_mode_stack.len() > 1 {
            self.blend_mode_stack.pop();
        }
    }

    fn fill_path(&mut self, path: &Path, style: FillStyle, brush: Brush) {
        self.commands.push(DrawCommand::FillPath {
            path: path.clone(),
            style,
            brush,
        });
    }

    fn stroke_path(&mut self, path: &Path, stroke: &Stroke, brush: Brush) {
        self.commands.push(DrawCommand::StrokePath {
            path: path.clone(),
            stroke: stroke.clone(),
            brush,
        });
    }

    fn draw_text(&mut self, text: &str, bounds: Rect, style: &TextStyle) {
        self.commands.push(DrawCommand::DrawText {
            text: text.to_string(),
            bounds,
            style: style.clone(),
        });
    }

    fn draw_image(&mut self, image: ImageId, rect: Rect, options: &ImageOptions) {
        self.commands.push(DrawCommand::DrawImage {
            image,
            rect,
            options: options.clone(),
        });
    }

    fn push_layer(&mut self, config: LayerConfig) {
        self.commands.push(DrawCommand::PushLayer(config));
    }

    fn pop_layer(&mut self) {
        self.commands.push(DrawCommand::PopLayer);
    }

    fn viewport_size(&self) -> Size {
        self.viewport
    }

    fn current_opacity(&self) -> f32 {
        self.opacity_stack.last().copied().unwrap_or(1.0)
    }

    fn current_blend_mode(&self) -> BlendMode {
        self.blend_mode_stack.last().copied().unwrap_or_default()
    }
}
