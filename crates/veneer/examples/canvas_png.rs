//! Canvas to PNG
//!
//! Renders a small scene with a gradient backdrop, a clipped ring and a
//! symbol caught mid-bounce, then writes it to disk.
//!
//! Reads `veneer.toml` from the current directory when present.
//!
//! Run with: cargo run -p veneer --example canvas_png -- [output.png]

use std::path::PathBuf;

use anyhow::{Context, Result};
use veneer::prelude::*;
use veneer::veneer_animation::SymbolEffect;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let output = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("canvas.png"));

    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let config = VeneerConfig::load_from_dir(&cwd)?;
    let veneer = Veneer::from_config(config)?;

    // Sample the bounce a little way into its first cycle
    let mut bounce = veneer.indefinite_effect(SymbolEffect::Bounce, SymbolEffectOptions::DEFAULT);
    bounce.set_active(true);
    veneer.scheduler().tick_by(120.0);
    let effect = bounce.transform();

    let mut canvas = veneer
        .canvas(move |ctx, size| {
            let bounds = Rect::from(size);
            ctx.fill(
                &Path::rect(bounds),
                &Shading::linear_gradient(
                    &[Color::rgb(0.1, 0.1, 0.2), Color::rgb(0.2, 0.3, 0.5)],
                    Point::new(0.0, 0.0),
                    Point::new(0.0, size.height),
                ),
            );

            let center = bounds.center();
            ctx.draw_layer(|ring| {
                ring.clip_to(&Path::rect(Rect::new(0.0, 0.0, size.width, center.y)));
                ring.stroke(
                    &Path::circle(center, size.height * 0.35),
                    &Shading::conic_gradient(
                        &[Color::RED, Color::GREEN, Color::BLUE, Color::RED],
                        center,
                        Angle::ZERO,
                    ),
                    &Stroke::new(12.0),
                );
            });

            if let Some(star) = ctx.resolve_symbol("star") {
                let rect = Rect::anchored(center, Size::new(48.0, 48.0), UnitPoint::CENTER);
                draw_symbol_with_effect(ctx, &star, rect, &effect);
            }
        })
        .with_symbol("star", Size::new(24.0, 24.0), |ctx, _size| {
            let star = Path::new()
                .move_to(12.0, 1.0)
                .line_to(15.0, 9.0)
                .line_to(23.0, 9.0)
                .line_to(17.0, 14.0)
                .line_to(19.0, 23.0)
                .line_to(12.0, 18.0)
                .line_to(5.0, 23.0)
                .line_to(7.0, 14.0)
                .line_to(1.0, 9.0)
                .line_to(9.0, 9.0)
                .close();
            ctx.fill(&star, &Shading::color(Color::rgb(1.0, 0.8, 0.1)));
        });

    let raster = veneer.render_to_raster(&mut canvas, Size::new(240.0, 160.0))?;
    raster
        .save_png(&output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    tracing::info!(
        path = %output.display(),
        width = raster.width(),
        height = raster.height(),
        "canvas written"
    );
    Ok(())
}
