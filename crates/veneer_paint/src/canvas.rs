//! Canvas - an immediate-mode drawing view
//!
//! A [`Canvas`] owns a renderer closure that draws into a fresh
//! [`GraphicsContext`] every time the canvas is rendered. Symbols registered
//! with the canvas are recorded once per render and can be looked up by id
//! from inside the renderer.

use tracing::{debug, trace, warn};
use veneer_core::{Affine2D, Color, DrawCommand, DrawContext, RecordingContext, Size};

use crate::context::{GraphicsContext, RenderEnvironment};
use crate::error::Result;
use crate::raster::RasterCanvas;
use crate::resolved::ResolvedSymbol;
use crate::shading::ColorRenderingMode;

type Renderer = Box<dyn FnMut(&mut GraphicsContext<'_>, Size)>;
type SymbolRenderer = Box<dyn Fn(&mut GraphicsContext<'_>, Size)>;

struct SymbolSource {
    id: String,
    size: Size,
    draw: SymbolRenderer,
}

/// A view drawn by a renderer closure
pub struct Canvas {
    renderer: Renderer,
    opaque: bool,
    color_mode: ColorRenderingMode,
    renders_asynchronously: bool,
    symbols: Vec<SymbolSource>,
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("opaque", &self.opaque)
            .field("color_mode", &self.color_mode)
            .field("renders_asynchronously", &self.renders_asynchronously)
            .field("symbols", &self.symbols.len())
            .finish()
    }
}

impl Canvas {
    /// Create a canvas drawn by `renderer`, which receives the size in points
    pub fn new(renderer: impl FnMut(&mut GraphicsContext<'_>, Size) + 'static) -> Self {
        Self {
            renderer: Box::new(renderer),
            opaque: false,
            color_mode: ColorRenderingMode::NonLinear,
            renders_asynchronously: false,
            symbols: Vec::new(),
        }
    }

    /// Mark the canvas as fully covering its bounds
    pub fn with_opaque(mut self, opaque: bool) -> Self {
        self.opaque = opaque;
        self
    }

    pub fn with_color_mode(mut self, mode: ColorRenderingMode) -> Self {
        self.color_mode = mode;
        self
    }

    /// Hint that the host may render this canvas off the main thread
    pub fn with_renders_asynchronously(mut self, asynchronous: bool) -> Self {
        self.renders_asynchronously = asynchronous;
        self
    }

    /// Register a symbol the renderer can resolve by `id`
    ///
    /// `draw` is recorded at `size` every render. A later symbol with the same
    /// id replaces an earlier one.
    pub fn with_symbol(
        mut self,
        id: impl Into<String>,
        size: Size,
        draw: impl Fn(&mut GraphicsContext<'_>, Size) + 'static,
    ) -> Self {
        self.symbols.push(SymbolSource {
            id: id.into(),
            size,
            draw: Box::new(draw),
        });
        self
    }

    pub fn is_opaque(&self) -> bool {
        self.opaque
    }

    pub fn color_mode(&self) -> ColorRenderingMode {
        self.color_mode
    }

    pub fn renders_asynchronously(&self) -> bool {
        self.renders_asynchronously
    }

    /// Draw the canvas onto `host`, whose viewport is in device pixels
    pub fn render(&mut self, host: &mut dyn DrawContext, env: &RenderEnvironment) {
        let density = if env.density.is_finite() && env.density > 0.0 {
            env.density
        } else {
            warn!(density = env.density, "invalid canvas density, using 1.0");
            1.0
        };
        let viewport = host.viewport_size();
        let size = Size::new(viewport.width / density, viewport.height / density);

        let mut env = env.clone().with_color_mode(self.color_mode);
        for source in &self.symbols {
            let symbol = record_symbol(source, &env);
            env.insert_symbol(source.id.clone(), symbol);
        }

        if size.is_empty() {
            trace!("empty canvas skipped");
            return;
        }
        debug!(
            width = size.width,
            height = size.height,
            density,
            symbols = self.symbols.len(),
            "rendering canvas"
        );

        let scaled = density != 1.0;
        if scaled {
            host.push_transform(Affine2D::scale(density, density));
        }
        {
            let mut ctx = GraphicsContext::new(&mut *host, size, &env);
            (self.renderer)(&mut ctx, size);
        }
        if scaled {
            host.pop_transform();
        }
    }

    /// Record the canvas at `size` points into draw commands
    pub fn record(&mut self, size: Size, env: &RenderEnvironment) -> Vec<DrawCommand> {
        let mut recording = RecordingContext::new(size.scaled(env.density));
        self.render(&mut recording, env);
        recording.take_commands()
    }

    /// Rasterize the canvas at `size` points
    ///
    /// The surface is `size * env.density` pixels. Opaque canvases start from
    /// white, others from transparent.
    pub fn render_to_raster(&mut self, size: Size, env: &RenderEnvironment) -> Result<RasterCanvas> {
        let width = (size.width * env.density).ceil().max(0.0) as u32;
        let height = (size.height * env.density).ceil().max(0.0) as u32;
        let mut raster = RasterCanvas::new(width, height)?;
        if self.opaque {
            raster.clear(Color::WHITE);
        }
        self.render(&mut raster, env);
        Ok(raster)
    }
}

fn record_symbol(source: &SymbolSource, env: &RenderEnvironment) -> ResolvedSymbol {
    let mut recording = RecordingContext::new(source.size);
    {
        let mut ctx = GraphicsContext::new(&mut recording, source.size, env);
        (source.draw)(&mut ctx, source.size);
    }
    ResolvedSymbol::new(source.size, recording.take_commands())
}
