//! Raster draw context backed by tiny-skia
//!
//! [`RasterCanvas`] implements [`DrawContext`] over an RGBA pixmap so canvases
//! can be rendered without a host toolkit, for snapshots and tests. Clips are
//! coverage masks, layers are offscreen pixmaps composited on pop. Text needs a
//! font backend and is skipped.

use std::f32::consts::TAU;
use std::path::Path as FsPath;

use rustc_hash::FxHashMap;
use smallvec::{smallvec, SmallVec};
use tiny_skia::{
    FilterQuality, LinearGradient, Mask, Paint, PathBuilder, PathStroker, Pattern, Pixmap,
    PixmapPaint, PremultipliedColorU8, RadialGradient, Shader, SpreadMode, StrokeDash, Transform,
};
use tracing::{trace, warn};
use veneer_core::{
    sample_stops, Affine2D, Angle, BlendMode, Brush, ClipShape, Color, DrawContext, FillRule,
    FillStyle, Gradient, GradientSpread, GradientStop, ImageId, ImageOptions, LayerConfig,
    LineCap, LineJoin, Path, PathCommand, Point, Rect, Size, Stroke, TextStyle,
};

use crate::error::{PaintError, Result};

struct Layer {
    pixmap: Pixmap,
    config: LayerConfig,
}

/// A pixel surface that can be drawn to like a host context
pub struct RasterCanvas {
    width: u32,
    height: u32,
    layers: Vec<Layer>,
    /// Coverage of the current clip; `None` draws everywhere
    clips: Vec<Option<Mask>>,
    transforms: SmallVec<[Affine2D; 8]>,
    opacities: SmallVec<[f32; 8]>,
    blend_modes: SmallVec<[BlendMode; 8]>,
    images: FxHashMap<ImageId, Pixmap>,
    next_image: u64,
}

impl std::fmt::Debug for RasterCanvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterCanvas")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("layers", &self.layers.len())
            .field("images", &self.images.len())
            .finish()
    }
}

impl RasterCanvas {
    /// Create a transparent surface of `width` x `height` pixels
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let pixmap = Pixmap::new(width, height)
            .ok_or(PaintError::InvalidDimensions { width, height })?;
        Ok(Self {
            width,
            height,
            layers: vec![Layer {
                pixmap,
                config: LayerConfig::new(),
            }],
            clips: vec![None],
            transforms: smallvec![Affine2D::IDENTITY],
            opacities: smallvec![1.0],
            blend_modes: smallvec![BlendMode::Normal],
            images: FxHashMap::default(),
            next_image: 0,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The composited surface
    pub fn pixmap(&self) -> &Pixmap {
        &self.layers[0].pixmap
    }

    /// Fill the whole surface with `color`, ignoring clips and layers
    pub fn clear(&mut self, color: Color) {
        self.layers[0].pixmap.fill(skia_color(color));
    }

    /// Straight-alpha color of the composited pixel at (x, y)
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let px = self.pixmap().pixel(x, y)?.demultiply();
        Some(Color::rgba(
            px.red() as f32 / 255.0,
            px.green() as f32 / 255.0,
            px.blue() as f32 / 255.0,
            px.alpha() as f32 / 255.0,
        ))
    }

    /// Register a rasterized image for `draw_image`
    pub fn register_image(&mut self, pixmap: Pixmap) -> ImageId {
        let id = ImageId(self.next_image);
        self.next_image += 1;
        self.images.insert(id, pixmap);
        id
    }

    /// Register straight-alpha RGBA8 pixels as an image
    pub fn register_rgba(&mut self, width: u32, height: u32, rgba: &[u8]) -> Result<ImageId> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected || expected == 0 {
            return Err(PaintError::InvalidImageData {
                width,
                height,
                actual: rgba.len(),
            });
        }
        let mut pixmap = Pixmap::new(width, height)
            .ok_or(PaintError::InvalidDimensions { width, height })?;
        for (px, src) in pixmap.pixels_mut().iter_mut().zip(rgba.chunks_exact(4)) {
            let color = tiny_skia::ColorU8::from_rgba(src[0], src[1], src[2], src[3]);
            *px = color.premultiply();
        }
        Ok(self.register_image(pixmap))
    }

    /// Encode the composited surface as PNG
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        self.pixmap()
            .encode_png()
            .map_err(|e| PaintError::Encode(e.to_string()))
    }

    pub fn save_png(&self, path: impl AsRef<FsPath>) -> Result<()> {
        let bytes = self.encode_png()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Painting
    // ─────────────────────────────────────────────────────────────────────────

    fn paint_for(&self, brush: &Brush, anti_alias: bool) -> Option<Paint<'static>> {
        let shader = shader_for(brush, self.current_opacity())?;
        Some(Paint {
            shader,
            blend_mode: skia_blend(self.current_blend_mode()),
            anti_alias,
            ..Default::default()
        })
    }

    fn fill_skia_path(
        &mut self,
        path: &tiny_skia::Path,
        rule: tiny_skia::FillRule,
        anti_alias: bool,
        brush: &Brush,
    ) {
        if let Brush::Gradient(Gradient::Conic {
            center,
            start_angle,
            stops,
        }) = brush
        {
            self.fill_conic(path, rule, anti_alias, *center, *start_angle, stops);
            return;
        }
        let Some(paint) = self.paint_for(brush, anti_alias) else {
            return;
        };
        let ts = skia_transform(self.current_transform());
        let mask = self.clips.last().and_then(Option::as_ref);
        if let Some(layer) = self.layers.last_mut() {
            layer.pixmap.fill_path(path, &paint, rule, ts, mask);
        }
    }

    /// Sweep gradients are shaded per pixel under the path's coverage
    fn fill_conic(
        &mut self,
        path: &tiny_skia::Path,
        rule: tiny_skia::FillRule,
        anti_alias: bool,
        center: Point,
        start_angle: Angle,
        stops: &[GradientStop],
    ) {
        let transform = self.current_transform();
        let Some(inverse) = transform.invert() else {
            trace!("conic gradient under singular transform skipped");
            return;
        };
        let Some(mut coverage) = Mask::new(self.width, self.height) else {
            return;
        };
        coverage.fill_path(path, rule, anti_alias, skia_transform(transform));
        if let Some(Some(clip)) = self.clips.last() {
            intersect_coverage(coverage.data_mut(), clip.data());
        }
        let Some(mut shade) = Pixmap::new(self.width, self.height) else {
            return;
        };

        let start = start_angle.as_radians();
        let width = self.width as usize;
        for (i, (px, cov)) in shade
            .pixels_mut()
            .iter_mut()
            .zip(coverage.data())
            .enumerate()
        {
            if *cov == 0 {
                continue;
            }
            let device = Point::new((i % width) as f32 + 0.5, (i / width) as f32 + 0.5);
            let p = inverse.transform_point(device);
            let turn = ((p.y - center.y).atan2(p.x - center.x) - start).rem_euclid(TAU) / TAU;
            *px = premultiplied(sample_stops(stops, turn));
        }

        let paint = PixmapPaint {
            opacity: self.current_opacity(),
            blend_mode: skia_blend(self.current_blend_mode()),
            quality: FilterQuality::Nearest,
        };
        if let Some(layer) = self.layers.last_mut() {
            layer.pixmap.draw_pixmap(
                0,
                0,
                shade.as_ref(),
                &paint,
                Transform::identity(),
                Some(&coverage),
            );
        }
    }
}

impl DrawContext for RasterCanvas {
    fn push_transform(&mut self, transform: Affine2D) {
        let combined = self.current_transform().then(&transform);
        self.transforms.push(combined);
    }

    fn pop_transform(&mut self) {
        if self.transforms.len() > 1 {
            self.transforms.pop();
        } else {
            warn!("pop_transform called on the root transform");
        }
    }

    fn current_transform(&self) -> Affine2D {
        self.transforms.last().copied().unwrap_or_default()
    }

    fn push_clip(&mut self, shape: ClipShape) {
        let current = self.clips.last().cloned().flatten();
        let Some(mut mask) = Mask::new(self.width, self.height) else {
            self.clips.push(current);
            return;
        };
        let (path, style) = shape.to_path();
        // An empty clip path leaves the mask empty and hides everything
        if let Some(path) = skia_path(&path) {
            mask.fill_path(
                &path,
                skia_fill_rule(style.rule),
                style.antialiased,
                skia_transform(self.current_transform()),
            );
        }
        if let Some(current) = &current {
            intersect_coverage(mask.data_mut(), current.data());
        }
        self.clips.push(Some(mask));
    }

    fn pop_clip(&mut self) {
        if self.clips.len() > 1 {
            self.clips.pop();
        } else {
            warn!("pop_clip called without a matching push_clip");
        }
    }

    fn push_opacity(&mut self, opacity: f32) {
        let combined = self.current_opacity() * opacity.clamp(0.0, 1.0);
        self.opacities.push(combined);
    }

    fn pop_opacity(&mut self) {
        if self.opacities.len() > 1 {
            self.opacities.pop();
        }
    }

    fn push_blend_mode(&mut self, mode: BlendMode) {
        self.blend_modes.push(mode);
    }

    fn pop_blend_mode(&mut self) {
        if self.blend_modes.len() > 1 {
            self.blend_modes.pop();
        }
    }

    fn fill_path(&mut self, path: &Path, style: FillStyle, brush: Brush) {
        let Some(sk_path) = skia_path(path) else {
            trace!("fill of empty path skipped");
            return;
        };
        self.fill_skia_path(
            &sk_path,
            skia_fill_rule(style.rule),
            style.antialiased,
            &brush,
        );
    }

    fn stroke_path(&mut self, path: &Path, stroke: &Stroke, brush: Brush) {
        let Some(sk_path) = skia_path(path) else {
            trace!("stroke of empty path skipped");
            return;
        };
        let sk_stroke = skia_stroke(stroke);
        let ts = skia_transform(self.current_transform());

        if matches!(brush, Brush::Gradient(Gradient::Conic { .. })) {
            let scale = PathStroker::compute_resolution_scale(&ts);
            if let Some(outline) = sk_path.stroke(&sk_stroke, scale) {
                self.fill_skia_path(&outline, tiny_skia::FillRule::Winding, true, &brush);
            }
            return;
        }
        let Some(paint) = self.paint_for(&brush, true) else {
            return;
        };
        let mask = self.clips.last().and_then(Option::as_ref);
        if let Some(layer) = self.layers.last_mut() {
            layer.pixmap.stroke_path(&sk_path, &paint, &sk_stroke, ts, mask);
        }
    }

    fn draw_text(&mut self, text: &str, bounds: Rect, _style: &TextStyle) {
        trace!(text, ?bounds, "text needs a font backend, skipped");
    }

    fn draw_image(&mut self, image: ImageId, rect: Rect, options: &ImageOptions) {
        if rect.is_empty() {
            return;
        }
        let Some(source) = self.images.get(&image) else {
            warn!(?image, "draw_image with unregistered image");
            return;
        };
        let tinted;
        let source = match options.tint {
            Some(tint) => {
                let mut copy = source.clone();
                apply_tint(&mut copy, tint);
                tinted = copy;
                &tinted
            }
            None => source,
        };
        let bounds = tiny_skia::Rect::from_xywh(rect.x(), rect.y(), rect.width(), rect.height());
        let Some(bounds) = bounds else {
            return;
        };

        let image_to_rect = Transform::from_row(
            rect.width() / source.width() as f32,
            0.0,
            0.0,
            rect.height() / source.height() as f32,
            rect.x(),
            rect.y(),
        );
        let opacity = (options.opacity * self.current_opacity()).clamp(0.0, 1.0);
        let paint = Paint {
            shader: Pattern::new(
                source.as_ref(),
                SpreadMode::Pad,
                FilterQuality::Bilinear,
                opacity,
                image_to_rect,
            ),
            blend_mode: skia_blend(self.current_blend_mode()),
            anti_alias: true,
            ..Default::default()
        };
        let path = PathBuilder::from_rect(bounds);
        let ts = skia_transform(self.current_transform());
        let mask = self.clips.last().and_then(Option::as_ref);
        if let Some(layer) = self.layers.last_mut() {
            layer
                .pixmap
                .fill_path(&path, &paint, tiny_skia::FillRule::Winding, ts, mask);
        }
    }

    fn push_layer(&mut self, config: LayerConfig) {
        match Pixmap::new(self.width, self.height) {
            Some(pixmap) => self.layers.push(Layer { pixmap, config }),
            None => warn!("layer allocation failed"),
        }
    }

    fn pop_layer(&mut self) {
        if self.layers.len() <= 1 {
            warn!("pop_layer called without a matching push_layer");
            return;
        }
        let Some(layer) = self.layers.pop() else {
            return;
        };
        let paint = PixmapPaint {
            opacity: layer.config.opacity.clamp(0.0, 1.0),
            blend_mode: skia_blend(layer.config.blend_mode),
            quality: FilterQuality::Nearest,
        };
        if let Some(parent) = self.layers.last_mut() {
            parent.pixmap.draw_pixmap(
                0,
                0,
                layer.pixmap.as_ref(),
                &paint,
                Transform::identity(),
                None,
            );
        }
    }

    fn viewport_size(&self) -> Size {
        Size::new(self.width as f32, self.height as f32)
    }

    fn current_opacity(&self) -> f32 {
        self.opacities.last().copied().unwrap_or(1.0)
    }

    fn current_blend_mode(&self) -> BlendMode {
        self.blend_modes.last().copied().unwrap_or_default()
    }
}

// ============================================================================
// Conversions
// ============================================================================

fn skia_color(color: Color) -> tiny_skia::Color {
    tiny_skia::Color::from_rgba(
        color.r.clamp(0.0, 1.0),
        color.g.clamp(0.0, 1.0),
        color.b.clamp(0.0, 1.0),
        color.a.clamp(0.0, 1.0),
    )
    .unwrap_or(tiny_skia::Color::TRANSPARENT)
}

fn premultiplied(color: Color) -> PremultipliedColorU8 {
    skia_color(color).premultiply().to_color_u8()
}

fn skia_point(point: Point) -> tiny_skia::Point {
    tiny_skia::Point::from_xy(point.x, point.y)
}

fn skia_transform(transform: Affine2D) -> Transform {
    let [a, b, c, d, tx, ty] = transform.elements;
    Transform::from_row(a, b, c, d, tx, ty)
}

fn skia_fill_rule(rule: FillRule) -> tiny_skia::FillRule {
    match rule {
        FillRule::NonZero => tiny_skia::FillRule::Winding,
        FillRule::EvenOdd => tiny_skia::FillRule::EvenOdd,
    }
}

fn skia_spread(spread: GradientSpread) -> SpreadMode {
    match spread {
        GradientSpread::Pad => SpreadMode::Pad,
        GradientSpread::Reflect => SpreadMode::Reflect,
        GradientSpread::Repeat => SpreadMode::Repeat,
    }
}

fn skia_blend(mode: BlendMode) -> tiny_skia::BlendMode {
    use tiny_skia::BlendMode as Sk;
    match mode {
        BlendMode::Normal => Sk::SourceOver,
        BlendMode::Multiply => Sk::Multiply,
        BlendMode::Screen => Sk::Screen,
        BlendMode::Overlay => Sk::Overlay,
        BlendMode::Darken => Sk::Darken,
        BlendMode::Lighten => Sk::Lighten,
        BlendMode::ColorDodge => Sk::ColorDodge,
        BlendMode::ColorBurn => Sk::ColorBurn,
        BlendMode::HardLight => Sk::HardLight,
        BlendMode::SoftLight => Sk::SoftLight,
        BlendMode::Difference => Sk::Difference,
        BlendMode::Exclusion => Sk::Exclusion,
        BlendMode::Hue => Sk::Hue,
        BlendMode::Saturation => Sk::Saturation,
        BlendMode::Color => Sk::Color,
        BlendMode::Luminosity => Sk::Luminosity,
        BlendMode::Clear => Sk::Clear,
        BlendMode::Source => Sk::Source,
        BlendMode::SourceIn => Sk::SourceIn,
        BlendMode::SourceOut => Sk::SourceOut,
        BlendMode::SourceAtop => Sk::SourceAtop,
        BlendMode::DestinationOver => Sk::DestinationOver,
        BlendMode::DestinationIn => Sk::DestinationIn,
        BlendMode::DestinationOut => Sk::DestinationOut,
        BlendMode::DestinationAtop => Sk::DestinationAtop,
        BlendMode::Xor => Sk::Xor,
        BlendMode::Plus => Sk::Plus,
    }
}

fn skia_path(path: &Path) -> Option<tiny_skia::Path> {
    let mut builder = PathBuilder::new();
    for command in path.commands() {
        match command {
            PathCommand::MoveTo(p) => builder.move_to(p.x, p.y),
            PathCommand::LineTo(p) => builder.line_to(p.x, p.y),
            PathCommand::QuadTo { control, end } => {
                builder.quad_to(control.x, control.y, end.x, end.y)
            }
            PathCommand::CubicTo {
                control1,
                control2,
                end,
            } => builder.cubic_to(control1.x, control1.y, control2.x, control2.y, end.x, end.y),
            PathCommand::Close => builder.close(),
        }
    }
    builder.finish()
}

fn skia_stroke(stroke: &Stroke) -> tiny_skia::Stroke {
    tiny_skia::Stroke {
        width: stroke.width,
        miter_limit: stroke.miter_limit,
        line_cap: match stroke.cap {
            LineCap::Butt => tiny_skia::LineCap::Butt,
            LineCap::Round => tiny_skia::LineCap::Round,
            LineCap::Square => tiny_skia::LineCap::Square,
        },
        line_join: match stroke.join {
            LineJoin::Miter => tiny_skia::LineJoin::Miter,
            LineJoin::Round => tiny_skia::LineJoin::Round,
            LineJoin::Bevel => tiny_skia::LineJoin::Bevel,
        },
        dash: if stroke.dash.is_empty() {
            None
        } else {
            StrokeDash::new(stroke.dash.clone(), stroke.dash_offset)
        },
    }
}

fn skia_stops(stops: &[GradientStop], opacity: f32) -> Vec<tiny_skia::GradientStop> {
    stops
        .iter()
        .map(|stop| {
            let color = stop.color.with_alpha(stop.color.a * opacity);
            tiny_skia::GradientStop::new(stop.offset, skia_color(color))
        })
        .collect()
}

/// Shader for a solid or two-point gradient brush; conic brushes return `None`
fn shader_for(brush: &Brush, opacity: f32) -> Option<Shader<'static>> {
    let solid = |color: Color| Shader::SolidColor(skia_color(color.with_alpha(color.a * opacity)));
    let gradient = match brush {
        Brush::Solid(color) => return Some(solid(*color)),
        Brush::Gradient(gradient) => gradient,
    };
    let shader = match gradient {
        Gradient::Linear {
            start,
            end,
            stops,
            spread,
        } => LinearGradient::new(
            skia_point(*start),
            skia_point(*end),
            skia_stops(stops, opacity),
            skia_spread(*spread),
            Transform::identity(),
        ),
        Gradient::Radial {
            center,
            start_radius,
            end_radius,
            stops,
            spread,
        } => {
            if *end_radius <= 0.0 {
                return Some(solid(stops.last().map(|s| s.color).unwrap_or(Color::BLACK)));
            }
            // Offsets are rescaled so offset 0 lands on the start radius
            let inner = start_radius.clamp(0.0, *end_radius) / end_radius;
            let rescaled: Vec<GradientStop> = stops
                .iter()
                .map(|s| GradientStop::new(inner + s.offset * (1.0 - inner), s.color))
                .collect();
            RadialGradient::new(
                skia_point(*center),
                skia_point(*center),
                *end_radius,
                skia_stops(&rescaled, opacity),
                skia_spread(*spread),
                Transform::identity(),
            )
        }
        Gradient::Conic { .. } => return None,
    };
    shader.or_else(|| {
        trace!("degenerate gradient drawn with its first color");
        Some(solid(gradient.first_color()))
    })
}

/// Multiply coverage by the clip's coverage
fn intersect_coverage(coverage: &mut [u8], clip: &[u8]) {
    for (cov, clip) in coverage.iter_mut().zip(clip) {
        *cov = ((*cov as u16 * *clip as u16 + 127) / 255) as u8;
    }
}

/// Replace color channels with `tint`, keeping each pixel's alpha
fn apply_tint(pixmap: &mut Pixmap, tint: Color) {
    let tint = tint.with_alpha(tint.a.clamp(0.0, 1.0));
    for chunk in pixmap.data_mut().chunks_exact_mut(4) {
        let alpha = chunk[3] as f32 / 255.0;
        if alpha > 0.0 {
            let final_a = alpha * tint.a;
            chunk[0] = (tint.r * final_a * 255.0).round().clamp(0.0, 255.0) as u8;
            chunk[1] = (tint.g * final_a * 255.0).round().clamp(0.0, 255.0) as u8;
            chunk[2] = (tint.b * final_a * 255.0).round().clamp(0.0, 255.0) as u8;
            chunk[3] = (final_a * 255.0).round().clamp(0.0, 255.0) as u8;
        }
    }
}
