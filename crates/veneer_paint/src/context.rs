//! Graphics context - immediate-mode drawing over a host draw context
//!
//! A [`GraphicsContext`] carries its own drawing state (opacity, blend mode,
//! transform, clip stack and filters) and applies it to the host around every
//! individual draw. State changes never leak into the host between draws, so a
//! layer derived from a context can be mutated freely without affecting its
//! parent.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::trace;
use veneer_core::{
    Affine2D, Angle, ClipShape, Color, DrawContext, FillStyle, ImageOptions, LayerConfig, Path,
    Point, Rect, Size, Stroke, UnitPoint, Vec2,
};

use crate::blend::GraphicsBlendMode;
use crate::resolved::{Image, ResolvedImage, ResolvedSymbol, ResolvedText};
use crate::shading::{resolve_brush, ColorRenderingMode, Shading, ShadingEnvironment};
use crate::text::{EstimatedTextMeasurer, Text, TextMeasurer};

// ─────────────────────────────────────────────────────────────────────────────
// Options
// ─────────────────────────────────────────────────────────────────────────────

/// Options applied when adding a clip
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ClipOptions(u32);

impl ClipOptions {
    pub const NONE: ClipOptions = ClipOptions(0);
    /// Keep everything outside the path instead of inside it
    pub const INVERSE: ClipOptions = ClipOptions(1 << 0);

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: ClipOptions) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn union(self, other: ClipOptions) -> ClipOptions {
        ClipOptions(self.0 | other.0)
    }
}

impl std::ops::BitOr for ClipOptions {
    type Output = ClipOptions;

    fn bitor(self, rhs: ClipOptions) -> ClipOptions {
        self.union(rhs)
    }
}

/// Options applied when adding a filter
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FilterOptions(u32);

impl FilterOptions {
    pub const NONE: FilterOptions = FilterOptions(0);
    /// Evaluate the filter in linear color space
    pub const LINEAR_COLOR: FilterOptions = FilterOptions(1 << 0);

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: FilterOptions) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn union(self, other: FilterOptions) -> FilterOptions {
        FilterOptions(self.0 | other.0)
    }
}

impl std::ops::BitOr for FilterOptions {
    type Output = FilterOptions;

    fn bitor(self, rhs: FilterOptions) -> FilterOptions {
        self.union(rhs)
    }
}

/// An image effect applied to subsequent drawing
#[derive(Clone, Debug, PartialEq)]
pub enum Filter {
    Blur { radius: f32 },
    Brightness(f32),
    Contrast(f32),
    Saturation(f32),
    Grayscale(f32),
    HueRotation(Angle),
    ColorInvert(f32),
    Opacity(f32),
    Shadow {
        color: Color,
        radius: f32,
        offset: Vec2,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// Render Environment
// ─────────────────────────────────────────────────────────────────────────────

/// Everything a graphics context resolves content against
#[derive(Clone)]
pub struct RenderEnvironment {
    pub shading: ShadingEnvironment,
    /// Device pixels per point
    pub density: f32,
    measurer: Arc<dyn TextMeasurer>,
    symbols: FxHashMap<String, ResolvedSymbol>,
}

impl std::fmt::Debug for RenderEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderEnvironment")
            .field("shading", &self.shading)
            .field("density", &self.density)
            .field("symbols", &self.symbols.len())
            .finish()
    }
}

impl Default for RenderEnvironment {
    fn default() -> Self {
        Self {
            shading: ShadingEnvironment::default(),
            density: 1.0,
            measurer: Arc::new(EstimatedTextMeasurer::default()),
            symbols: FxHashMap::default(),
        }
    }
}

impl RenderEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_density(mut self, density: f32) -> Self {
        self.density = density;
        self
    }

    pub fn with_foreground(mut self, color: Color) -> Self {
        self.shading.foreground = color;
        self
    }

    pub fn with_color_mode(mut self, mode: ColorRenderingMode) -> Self {
        self.shading.color_mode = mode;
        self
    }

    pub fn with_measurer(mut self, measurer: impl TextMeasurer + 'static) -> Self {
        self.measurer = Arc::new(measurer);
        self
    }

    pub fn with_symbol(mut self, id: impl Into<String>, symbol: ResolvedSymbol) -> Self {
        self.insert_symbol(id, symbol);
        self
    }

    pub fn insert_symbol(&mut self, id: impl Into<String>, symbol: ResolvedSymbol) {
        self.symbols.insert(id.into(), symbol);
    }

    pub fn symbol(&self, id: &str) -> Option<&ResolvedSymbol> {
        self.symbols.get(id)
    }

    pub fn measurer(&self) -> &Arc<dyn TextMeasurer> {
        &self.measurer
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Drawing State
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
struct Clip {
    /// Outline in canvas space, fixed when the clip was added
    path: Path,
    style: FillStyle,
    options: ClipOptions,
}

impl Clip {
    fn to_shape(&self, canvas: Size) -> ClipShape {
        if !self.options.contains(ClipOptions::INVERSE) {
            return ClipShape::path(self.path.clone(), self.style);
        }
        // Even-odd over an enclosing rect keeps everything outside the path
        let outer = Rect::from(canvas).union(&self.path.bounds());
        let outer = Rect::new(
            outer.x() - 1.0,
            outer.y() - 1.0,
            outer.width() + 2.0,
            outer.height() + 2.0,
        );
        let path = Path::rect(outer).append(&self.path);
        ClipShape::path(
            path,
            FillStyle::even_odd().with_antialiasing(self.style.antialiased),
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
struct GraphicsState {
    opacity: f32,
    blend_mode: GraphicsBlendMode,
    transform: Affine2D,
    clips: Vec<Clip>,
    filters: Vec<(Filter, FilterOptions)>,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            blend_mode: GraphicsBlendMode::Normal,
            transform: Affine2D::IDENTITY,
            clips: Vec::new(),
            filters: Vec::new(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Graphics Context
// ─────────────────────────────────────────────────────────────────────────────

/// Immediate-mode drawing destination handed to canvas renderers
///
/// All coordinates are in points. The context's transform applies to paths,
/// text and images at the moment they are drawn; clips are fixed in canvas
/// space using the transform current when they were added.
pub struct GraphicsContext<'a> {
    host: &'a mut dyn DrawContext,
    env: &'a RenderEnvironment,
    size: Size,
    state: GraphicsState,
}

impl<'a> GraphicsContext<'a> {
    pub fn new(host: &'a mut dyn DrawContext, size: Size, env: &'a RenderEnvironment) -> Self {
        Self {
            host,
            env,
            size,
            state: GraphicsState::default(),
        }
    }

    /// Size of the canvas in points
    pub fn size(&self) -> Size {
        self.size
    }

    pub fn environment(&self) -> &ShadingEnvironment {
        &self.env.shading
    }

    pub fn render_environment(&self) -> &RenderEnvironment {
        self.env
    }

    // ─────────────────────────────────────────────────────────────────────────
    // State
    // ─────────────────────────────────────────────────────────────────────────

    pub fn opacity(&self) -> f32 {
        self.state.opacity
    }

    /// Set the opacity of subsequent drawing
    ///
    /// The value is stored as given; hosts clamp it when compositing.
    pub fn set_opacity(&mut self, opacity: f32) {
        self.state.opacity = opacity;
    }

    pub fn blend_mode(&self) -> GraphicsBlendMode {
        self.state.blend_mode
    }

    pub fn set_blend_mode(&mut self, mode: GraphicsBlendMode) {
        self.state.blend_mode = mode;
    }

    pub fn transform(&self) -> Affine2D {
        self.state.transform
    }

    pub fn set_transform(&mut self, transform: Affine2D) {
        self.state.transform = transform;
    }

    /// Scale subsequent drawing in the current user space
    pub fn scale_by(&mut self, x: f32, y: f32) {
        self.state.transform = self.state.transform.scaled_by(x, y);
    }

    pub fn translate_by(&mut self, x: f32, y: f32) {
        self.state.transform = self.state.transform.translated_by(x, y);
    }

    pub fn rotate_by(&mut self, angle: Angle) {
        self.state.transform = self.state.transform.rotated_by(angle);
    }

    /// Apply `matrix` before the current transform
    pub fn concatenate(&mut self, matrix: Affine2D) {
        self.state.transform = self.state.transform.then(&matrix);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Clipping
    // ─────────────────────────────────────────────────────────────────────────

    /// Intersect the clip region with `path` in the current user space
    pub fn clip(&mut self, path: &Path, style: FillStyle, options: ClipOptions) {
        self.state.clips.push(Clip {
            path: path.transformed(&self.state.transform),
            style,
            options,
        });
    }

    pub fn clip_to(&mut self, path: &Path) {
        self.clip(path, FillStyle::default(), ClipOptions::NONE);
    }

    pub fn clip_count(&self) -> usize {
        self.state.clips.len()
    }

    /// Bounds of the drawable region in the current user space
    ///
    /// Inverse clips do not shrink the bounds. Returns [`Rect::ZERO`] when
    /// nothing can be drawn.
    pub fn clip_bounding_rect(&self) -> Rect {
        let canvas = Rect::from(self.size);
        let bounds = self
            .state
            .clips
            .iter()
            .filter(|clip| !clip.options.contains(ClipOptions::INVERSE))
            .try_fold(canvas, |acc, clip| acc.intersection(&clip.path.bounds()));
        let inverse = self.state.transform.invert();
        match (bounds, inverse) {
            (Some(bounds), Some(inverse)) => inverse.transform_rect(bounds),
            _ => Rect::ZERO,
        }
    }

    /// Run `content` in a layer composited with `opacity`
    ///
    /// The layer starts from a copy of this context's state. Its drawing is
    /// composited over the canvas; it is not converted into a clip mask.
    pub fn clip_to_layer(
        &mut self,
        opacity: f32,
        options: ClipOptions,
        content: impl FnOnce(&mut GraphicsContext<'_>),
    ) {
        if options.contains(ClipOptions::INVERSE) {
            trace!("inverse layer clip composited as a plain layer");
        }
        self.layer(LayerConfig::new().opacity(opacity.clamp(0.0, 1.0)), content);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Layers
    // ─────────────────────────────────────────────────────────────────────────

    /// A context drawing to the same host, starting from a copy of this state
    pub fn derive_layer(&mut self) -> GraphicsContext<'_> {
        GraphicsContext {
            host: &mut *self.host,
            env: self.env,
            size: self.size,
            state: self.state.clone(),
        }
    }

    /// Run `content` in an isolated layer composited onto this context
    pub fn draw_layer(&mut self, content: impl FnOnce(&mut GraphicsContext<'_>)) {
        self.layer(LayerConfig::new(), content);
    }

    fn layer(&mut self, config: LayerConfig, content: impl FnOnce(&mut GraphicsContext<'_>)) {
        let mut layer = self.derive_layer();
        layer.host.push_layer(config);
        content(&mut layer);
        layer.host.pop_layer();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Filters
    // ─────────────────────────────────────────────────────────────────────────

    /// Record a filter for subsequent drawing
    ///
    /// Filters are tracked on the state but hosts do not yet apply them.
    pub fn add_filter(&mut self, filter: Filter, options: FilterOptions) {
        trace!(?filter, "filter recorded without effect");
        self.state.filters.push((filter, options));
    }

    pub fn filters(&self) -> impl Iterator<Item = (&Filter, FilterOptions)> {
        self.state.filters.iter().map(|(f, o)| (f, *o))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Resolution
    // ─────────────────────────────────────────────────────────────────────────

    pub fn resolve_shading(&self, shading: Shading) -> Shading {
        shading
    }

    pub fn resolve_text(&self, text: impl Into<Text>) -> ResolvedText {
        ResolvedText::new(text.into(), self.env.measurer().clone())
    }

    pub fn resolve_image(&self, image: Image) -> ResolvedImage {
        ResolvedImage::new(image)
    }

    /// Look up a symbol registered with the canvas by `id`
    pub fn resolve_symbol(&self, id: &str) -> Option<ResolvedSymbol> {
        self.env.symbol(id).cloned()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Drawing
    // ─────────────────────────────────────────────────────────────────────────

    pub fn fill(&mut self, path: &Path, shading: &Shading) {
        self.fill_with_style(path, shading, FillStyle::default());
    }

    pub fn fill_with_style(&mut self, path: &Path, shading: &Shading, style: FillStyle) {
        if path.is_empty() {
            trace!("fill of empty path skipped");
            return;
        }
        let brush = resolve_brush(shading, &self.env.shading);
        self.with_host_state(|host| host.fill_path(path, style, brush));
    }

    pub fn stroke(&mut self, path: &Path, shading: &Shading, stroke: &Stroke) {
        if path.is_empty() || stroke.width <= 0.0 {
            trace!("stroke of empty path or zero width skipped");
            return;
        }
        let brush = resolve_brush(shading, &self.env.shading);
        self.with_host_state(|host| host.stroke_path(path, stroke, brush));
    }

    pub fn stroke_width(&mut self, path: &Path, shading: &Shading, width: f32) {
        self.stroke(path, shading, &Stroke::new(width));
    }

    /// Draw resolved text laid out inside `rect`
    pub fn draw_text(&mut self, text: &ResolvedText, rect: Rect) {
        let content = text.text();
        if content.content.is_empty() || rect.is_empty() {
            return;
        }
        let color = content.color.unwrap_or(self.env.shading.foreground);
        let style = content.style.clone().with_color(color);
        self.with_host_state(|host| host.draw_text(&content.content, rect, &style));
    }

    /// Draw text at its measured size, placing `anchor` of it at `point`
    pub fn draw_text_at(&mut self, text: &ResolvedText, point: Point, anchor: UnitPoint) {
        let size = text.measure(self.size);
        self.draw_text(text, Rect::anchored(point, size, anchor));
    }

    /// Draw an image scaled into `rect`
    pub fn draw_image(&mut self, image: &ResolvedImage, rect: Rect) {
        if rect.is_empty() {
            return;
        }
        let mut options = ImageOptions::new();
        if let Some(shading) = &image.shading {
            match resolve_brush(shading, &self.env.shading) {
                veneer_core::Brush::Solid(color) => options = options.with_tint(color),
                veneer_core::Brush::Gradient(gradient) => {
                    trace!("gradient image shading tinted with its first stop");
                    options = options.with_tint(gradient.first_color());
                }
            }
        }
        let id = image.id;
        self.with_host_state(|host| host.draw_image(id, rect, &options));
    }

    /// Draw an image at its natural size, placing `anchor` of it at `point`
    pub fn draw_image_at(&mut self, image: &ResolvedImage, point: Point, anchor: UnitPoint) {
        self.draw_image(image, Rect::anchored(point, image.size, anchor));
    }

    /// Draw a symbol scaled from its natural size into `rect`
    pub fn draw_symbol(&mut self, symbol: &ResolvedSymbol, rect: Rect) {
        if symbol.is_empty() || symbol.size.is_empty() || rect.is_empty() {
            return;
        }
        let placement = Affine2D::translation(rect.x(), rect.y()).then(&Affine2D::scale(
            rect.width() / symbol.size.width,
            rect.height() / symbol.size.height,
        ));
        self.with_host_state(|host| {
            host.push_transform(placement);
            veneer_core::replay(symbol.commands(), host);
            host.pop_transform();
        });
    }

    pub fn draw_symbol_at(&mut self, symbol: &ResolvedSymbol, point: Point, anchor: UnitPoint) {
        self.draw_symbol(symbol, Rect::anchored(point, symbol.size, anchor));
    }

    /// Apply clips, opacity, blend mode and transform around a single draw
    fn with_host_state(&mut self, draw: impl FnOnce(&mut dyn DrawContext)) {
        let host = &mut *self.host;
        let state = &self.state;

        for clip in &state.clips {
            host.push_clip(clip.to_shape(self.size));
        }
        let faded = state.opacity < 1.0;
        if faded {
            host.push_opacity(state.opacity);
        }
        let blended = state.blend_mode != GraphicsBlendMode::Normal;
        if blended {
            host.push_blend_mode(state.blend_mode.as_native());
        }
        let transformed = !state.transform.is_identity();
        if transformed {
            host.push_transform(state.transform);
        }

        draw(host);

        if transformed {
            host.pop_transform();
        }
        if blended {
            host.pop_blend_mode();
        }
        if faded {
            host.pop_opacity();
        }
        for _ in &state.clips {
            host.pop_clip();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veneer_core::{BlendMode, Brush, DrawCommand, ImageId, RecordingContext};

    fn canvas_size() -> Size {
        Size::new(200.0, 100.0)
    }

    fn square() -> Path {
        Path::rect(Rect::new(0.0, 0.0, 10.0, 10.0))
    }

    #[test]
    fn test_default_state() {
        let env = RenderEnvironment::default();
        let mut host = RecordingContext::new(canvas_size());
        let ctx = GraphicsContext::new(&mut host, canvas_size(), &env);

        assert_eq!(ctx.opacity(), 1.0);
        assert_eq!(ctx.blend_mode(), GraphicsBlendMode::Normal);
        assert!(ctx.transform().is_identity());
        assert_eq!(ctx.clip_count(), 0);
        assert_eq!(ctx.clip_bounding_rect(), Rect::new(0.0, 0.0, 200.0, 100.0));
    }

    #[test]
    fn test_opacity_stored_as_given() {
        let env = RenderEnvironment::default();
        let mut host = RecordingContext::new(canvas_size());
        {
            let mut ctx = GraphicsContext::new(&mut host, canvas_size(), &env);
            ctx.set_opacity(1.5);
            assert_eq!(ctx.opacity(), 1.5);
            ctx.fill(&square(), &Shading::color(Color::RED));

            ctx.set_opacity(-0.25);
            assert_eq!(ctx.opacity(), -0.25);
        }
        let commands = host.take_commands();
        assert_eq!(commands.len(), 1);
        assert!(matches!(commands[0], DrawCommand::FillPath { .. }));
    }

    #[test]
    fn test_fill_without_state_draws_directly() {
        let env = RenderEnvironment::default();
        let mut host = RecordingContext::new(canvas_size());
        {
            let mut ctx = GraphicsContext::new(&mut host, canvas_size(), &env);
            ctx.fill(&square(), &Shading::color(Color::RED));
        }
        assert_eq!(
            host.commands(),
            &[DrawCommand::FillPath {
                path: square(),
                style: FillStyle::default(),
                brush: Brush::Solid(Color::RED),
            }]
        );
    }

    #[test]
    fn test_state_wraps_each_draw() {
        let env = RenderEnvironment::default();
        let mut host = RecordingContext::new(canvas_size());
        {
            let mut ctx = GraphicsContext::new(&mut host, canvas_size(), &env);
            ctx.clip_to(&Path::rect(Rect::new(0.0, 0.0, 50.0, 50.0)));
            ctx.clip_to(&Path::rect(Rect::new(10.0, 10.0, 50.0, 50.0)));
            ctx.set_opacity(0.5);
            ctx.set_blend_mode(GraphicsBlendMode::PlusDarker);
            ctx.translate_by(5.0, 5.0);
            ctx.fill(&square(), &Shading::Foreground);
        }
        let commands = host.commands();
        assert_eq!(commands.len(), 11);
        assert!(matches!(commands[0], DrawCommand::PushClip(_)));
        assert!(matches!(commands[1], DrawCommand::PushClip(_)));
        assert_eq!(commands[2], DrawCommand::PushOpacity(0.5));
        assert_eq!(commands[3], DrawCommand::PushBlendMode(BlendMode::Darken));
        assert_eq!(
            commands[4],
            DrawCommand::PushTransform(Affine2D::translation(5.0, 5.0))
        );
        assert!(matches!(commands[5], DrawCommand::FillPath { .. }));
        assert_eq!(commands[6], DrawCommand::PopTransform);
        assert_eq!(commands[7], DrawCommand::PopBlendMode);
        assert_eq!(commands[8], DrawCommand::PopOpacity);
        assert_eq!(commands[9], DrawCommand::PopClip);
        assert_eq!(commands[10], DrawCommand::PopClip);
        assert_eq!(host.clip_depth(), 0);
    }

    #[test]
    fn test_clip_bounding_rect_intersects() {
        let env = RenderEnvironment::default();
        let mut host = RecordingContext::new(canvas_size());
        let mut ctx = GraphicsContext::new(&mut host, canvas_size(), &env);
        ctx.clip_to(&Path::rect(Rect::new(0.0, 0.0, 50.0, 50.0)));
        ctx.clip_to(&Path::rect(Rect::new(20.0, 30.0, 100.0, 100.0)));
        assert_eq!(ctx.clip_count(), 2);
        assert_eq!(ctx.clip_bounding_rect(), Rect::new(20.0, 30.0, 30.0, 20.0));

        ctx.translate_by(10.0, 10.0);
        assert_eq!(ctx.clip_bounding_rect(), Rect::new(10.0, 20.0, 30.0, 20.0));

        ctx.clip_to(&Path::rect(Rect::new(100.0, 100.0, 10.0, 10.0)));
        assert_eq!(ctx.clip_bounding_rect(), Rect::ZERO);
    }

    #[test]
    fn test_clip_fixed_at_time_added() {
        let env = RenderEnvironment::default();
        let mut host = RecordingContext::new(canvas_size());
        let mut ctx = GraphicsContext::new(&mut host, canvas_size(), &env);
        ctx.translate_by(100.0, 0.0);
        ctx.clip_to(&Path::rect(Rect::new(0.0, 0.0, 10.0, 10.0)));
        ctx.set_transform(Affine2D::IDENTITY);
        assert_eq!(ctx.clip_bounding_rect(), Rect::new(100.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn test_inverse_clip_keeps_bounds() {
        let env = RenderEnvironment::default();
        let mut host = RecordingContext::new(canvas_size());
        {
            let mut ctx = GraphicsContext::new(&mut host, canvas_size(), &env);
            ctx.clip(&square(), FillStyle::default(), ClipOptions::INVERSE);
            assert_eq!(ctx.clip_bounding_rect(), Rect::from(canvas_size()));
            ctx.fill(&Path::rect(Rect::from(canvas_size())), &Shading::Foreground);
        }
        match &host.commands()[0] {
            DrawCommand::PushClip(ClipShape::Path { style, .. }) => {
                assert_eq!(style.rule, veneer_core::FillRule::EvenOdd)
            }
            other => panic!("expected inverse path clip, got {other:?}"),
        }
    }

    #[test]
    fn test_transform_operations_compose() {
        let env = RenderEnvironment::default();
        let mut host = RecordingContext::new(canvas_size());
        let mut ctx = GraphicsContext::new(&mut host, canvas_size(), &env);
        ctx.translate_by(10.0, 0.0);
        ctx.scale_by(2.0, 2.0);
        let p = ctx.transform().transform_point(Point::new(1.0, 1.0));
        assert_eq!(p, Point::new(12.0, 2.0));

        ctx.concatenate(Affine2D::translation(1.0, 0.0));
        let p = ctx.transform().transform_point(Point::ZERO);
        assert_eq!(p, Point::new(12.0, 0.0));

        ctx.set_transform(Affine2D::IDENTITY);
        ctx.rotate_by(Angle::degrees(90.0));
        let p = ctx.transform().transform_point(Point::new(1.0, 0.0));
        assert!(p.x.abs() < 1e-5 && (p.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_layer_state_is_isolated() {
        let env = RenderEnvironment::default();
        let mut host = RecordingContext::new(canvas_size());
        {
            let mut ctx = GraphicsContext::new(&mut host, canvas_size(), &env);
            ctx.set_opacity(0.8);
            ctx.draw_layer(|layer| {
                assert_eq!(layer.opacity(), 0.8);
                layer.set_opacity(0.25);
                layer.translate_by(5.0, 5.0);
                layer.clip_to(&square());
                layer.fill(&square(), &Shading::Foreground);
            });
            assert_eq!(ctx.opacity(), 0.8);
            assert!(ctx.transform().is_identity());
            assert_eq!(ctx.clip_count(), 0);
        }
        let commands = host.commands();
        assert_eq!(commands.first(), Some(&DrawCommand::PushLayer(LayerConfig::new())));
        assert_eq!(commands.last(), Some(&DrawCommand::PopLayer));
    }

    #[test]
    fn test_clip_to_layer_uses_opacity() {
        let env = RenderEnvironment::default();
        let mut host = RecordingContext::new(canvas_size());
        {
            let mut ctx = GraphicsContext::new(&mut host, canvas_size(), &env);
            ctx.clip_to_layer(0.4, ClipOptions::NONE, |layer| {
                layer.fill(&square(), &Shading::Foreground);
            });
        }
        assert_eq!(
            host.commands()[0],
            DrawCommand::PushLayer(LayerConfig::new().opacity(0.4))
        );
    }

    #[test]
    fn test_text_anchor_centres_on_point() {
        let env = RenderEnvironment::default().with_measurer(EstimatedTextMeasurer::new(0.5));
        let mut host = RecordingContext::new(canvas_size());
        {
            let mut ctx = GraphicsContext::new(&mut host, canvas_size(), &env);
            let text = ctx.resolve_text(Text::new("abcd").with_size(10.0));
            ctx.draw_text_at(&text, Point::new(100.0, 50.0), UnitPoint::CENTER);
        }
        match &host.commands()[0] {
            DrawCommand::DrawText { bounds, style, .. } => {
                assert_eq!(bounds.width(), 20.0);
                assert_eq!(bounds.center(), Point::new(100.0, 50.0));
                assert_eq!(style.color, Color::BLACK);
            }
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn test_image_shading_becomes_tint() {
        let env = RenderEnvironment::default().with_foreground(Color::BLUE);
        let mut host = RecordingContext::new(canvas_size());
        {
            let mut ctx = GraphicsContext::new(&mut host, canvas_size(), &env);
            let image = ctx
                .resolve_image(Image::new(ImageId(1), Size::new(20.0, 10.0)))
                .with_shading(Shading::Foreground);
            ctx.draw_image_at(&image, Point::ZERO, UnitPoint::TOP_LEADING);
        }
        assert_eq!(
            host.commands()[0],
            DrawCommand::DrawImage {
                image: ImageId(1),
                rect: Rect::new(0.0, 0.0, 20.0, 10.0),
                options: ImageOptions::new().with_tint(Color::BLUE),
            }
        );
    }

    #[test]
    fn test_symbol_replays_scaled_into_rect() {
        let symbol = ResolvedSymbol::new(
            Size::new(10.0, 10.0),
            vec![DrawCommand::FillPath {
                path: square(),
                style: FillStyle::default(),
                brush: Brush::Solid(Color::GREEN),
            }],
        );
        let env = RenderEnvironment::default().with_symbol("dot", symbol);
        let mut host = RecordingContext::new(canvas_size());
        {
            let mut ctx = GraphicsContext::new(&mut host, canvas_size(), &env);
            assert!(ctx.resolve_symbol("missing").is_none());
            let dot = ctx.resolve_symbol("dot").expect("registered symbol");
            ctx.draw_symbol(&dot, Rect::new(50.0, 50.0, 20.0, 20.0));
        }
        let commands = host.commands();
        assert_eq!(commands.len(), 3);
        match commands[0] {
            DrawCommand::PushTransform(t) => {
                let corner = t.transform_point(Point::new(10.0, 10.0));
                assert_eq!(corner, Point::new(70.0, 70.0));
            }
            ref other => panic!("expected transform, got {other:?}"),
        }
    }

    #[test]
    fn test_degenerate_draws_are_skipped() {
        let env = RenderEnvironment::default();
        let mut host = RecordingContext::new(canvas_size());
        {
            let mut ctx = GraphicsContext::new(&mut host, canvas_size(), &env);
            ctx.fill(&Path::new(), &Shading::Foreground);
            ctx.stroke_width(&square(), &Shading::Foreground, 0.0);
            let text = ctx.resolve_text("");
            ctx.draw_text(&text, Rect::new(0.0, 0.0, 10.0, 10.0));
            let image = ctx.resolve_image(Image::new(ImageId(2), Size::ZERO));
            ctx.draw_image_at(&image, Point::ZERO, UnitPoint::CENTER);
        }
        assert!(host.commands().is_empty());
    }

    #[test]
    fn test_filters_are_recorded() {
        let env = RenderEnvironment::default();
        let mut host = RecordingContext::new(canvas_size());
        let mut ctx = GraphicsContext::new(&mut host, canvas_size(), &env);
        ctx.add_filter(Filter::Blur { radius: 4.0 }, FilterOptions::NONE);
        ctx.add_filter(Filter::Grayscale(1.0), FilterOptions::LINEAR_COLOR);
        let filters: Vec<_> = ctx.filters().collect();
        assert_eq!(filters.len(), 2);
        assert_eq!(filters[1], (&Filter::Grayscale(1.0), FilterOptions::LINEAR_COLOR));
    }

    #[test]
    fn test_options_arithmetic() {
        let both = ClipOptions::NONE | ClipOptions::INVERSE;
        assert!(both.contains(ClipOptions::INVERSE));
        assert!(!ClipOptions::NONE.contains(ClipOptions::INVERSE));
        assert_eq!(FilterOptions::LINEAR_COLOR.bits(), 1);
    }
}
