//! Veneer Paint
//!
//! Immediate-mode 2D drawing for Veneer views:
//!
//! - **Shading**: colors, gradients and semantic fills resolved against an environment
//! - **Graphics context**: drawing state (opacity, blend mode, transform, clips, filters)
//!   applied around each draw onto a host [`DrawContext`](veneer_core::DrawContext)
//! - **Canvas**: a renderer closure plus symbols, rendered at a pixel density
//! - **Raster**: a tiny-skia backed context for offscreen rendering
//!
//! # Example
//!
//! ```rust
//! use veneer_core::{Color, Path, Rect, Size};
//! use veneer_paint::{Canvas, RenderEnvironment, Shading};
//!
//! let mut canvas = Canvas::new(|ctx, size| {
//!     let half = Rect::new(0.0, 0.0, size.width / 2.0, size.height);
//!     ctx.fill(&Path::rect(half), &Shading::color(Color::BLUE));
//! });
//! let raster = canvas
//!     .render_to_raster(Size::new(20.0, 10.0), &RenderEnvironment::default())
//!     .unwrap();
//! assert_eq!(raster.pixel(2, 2), Some(Color::BLUE));
//! ```

pub mod blend;
pub mod canvas;
pub mod context;
pub mod error;
pub mod raster;
pub mod resolved;
pub mod shading;
pub mod text;

pub use blend::GraphicsBlendMode;
pub use canvas::Canvas;
pub use context::{ClipOptions, Filter, FilterOptions, GraphicsContext, RenderEnvironment};
pub use error::{PaintError, Result};
pub use raster::RasterCanvas;
pub use resolved::{Image, ResolvedImage, ResolvedSymbol, ResolvedText};
pub use shading::{resolve_brush, ColorRenderingMode, GradientOptions, Shading, ShadingEnvironment};
pub use text::{EstimatedTextMeasurer, Text, TextMeasurer};
