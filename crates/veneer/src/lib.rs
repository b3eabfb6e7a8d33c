//! Veneer
//!
//! Immediate-mode canvas drawing and time-driven view animation for hosts
//! that expose a retained compositing canvas.
//!
//! The workspace is split into:
//!
//! - [`veneer_core`]: geometry, paint primitives and the host [`DrawContext`](veneer_core::DrawContext)
//! - [`veneer_paint`]: shading, the graphics context, canvases and a raster host
//! - [`veneer_animation`]: phase and keyframe animators, symbol effects and the scheduler
//!
//! This crate ties them together with a TOML configuration and a runtime
//! bundle.
//!
//! # Example
//!
//! ```rust
//! use veneer::prelude::*;
//!
//! let veneer = Veneer::new();
//! let mut canvas = veneer.canvas(|ctx, size| {
//!     let rect = Rect::new(0.0, 0.0, size.width, size.height);
//!     ctx.fill(&Path::ellipse(rect), &Shading::color(Color::RED));
//! });
//! let raster = veneer.render_to_raster(&mut canvas, Size::new(32.0, 32.0)).unwrap();
//! assert_eq!(raster.pixel(16, 16), Some(Color::RED));
//! ```

pub mod config;
pub mod runtime;
pub mod symbol;

pub use veneer_animation;
pub use veneer_core;
pub use veneer_paint;

pub use config::{CanvasConfig, ColorModeSetting, EffectsConfig, VeneerConfig, CONFIG_FILE_NAME};
pub use runtime::Veneer;
pub use symbol::draw_symbol_with_effect;

pub mod prelude {
    pub use crate::config::VeneerConfig;
    pub use crate::runtime::Veneer;
    pub use crate::symbol::draw_symbol_with_effect;

    // Geometry and paint
    pub use veneer_core::{
        Affine2D, Angle, Color, FillStyle, Path, Point, Rect, Size, Stroke, UnitPoint,
    };

    // Drawing
    pub use veneer_paint::{
        Canvas, ClipOptions, GradientOptions, GraphicsBlendMode, GraphicsContext, RasterCanvas,
        RenderEnvironment, Shading, Text,
    };

    // Animation
    pub use veneer_animation::{
        Animation, DiscreteEffect, IndefiniteEffect, Keyframe, KeyframeAnimator,
        KeyframeTimeline, KeyframeTrack, PhaseAnimator, SymbolEffect, SymbolEffectOptions,
    };
}
