//! Drawing symbols under a symbol effect

use std::borrow::Cow;

use tracing::trace;
use veneer_animation::EffectTransform;
use veneer_core::{Angle, Brush, Color, DrawCommand, Gradient, GradientStop, Rect};
use veneer_paint::{ClipOptions, GraphicsContext, ResolvedSymbol};

/// Draw `symbol` into `rect` in the visual state `effect` describes
///
/// Scale and rotation pivot on the centre of `rect`. Opacity applies to the
/// symbol as a group and hue rotation recolours its fills.
pub fn draw_symbol_with_effect(
    ctx: &mut GraphicsContext<'_>,
    symbol: &ResolvedSymbol,
    rect: Rect,
    effect: &EffectTransform,
) {
    if effect.is_identity() {
        ctx.draw_symbol(symbol, rect);
        return;
    }
    if effect.opacity <= 0.0 {
        trace!("symbol hidden by effect opacity");
        return;
    }
    let symbol = if effect.hue_degrees == 0.0 {
        Cow::Borrowed(symbol)
    } else {
        Cow::Owned(hue_rotated(symbol, Angle::degrees(effect.hue_degrees)))
    };
    let pivot = effect.affine_about(rect.center());
    // Opacity fades the composited layer, not each recorded command
    ctx.clip_to_layer(effect.opacity, ClipOptions::NONE, |layer| {
        layer.concatenate(pivot);
        layer.draw_symbol(&symbol, rect);
    });
}

fn hue_rotated(symbol: &ResolvedSymbol, angle: Angle) -> ResolvedSymbol {
    let rotate = |color: Color| color.hue_rotated(angle);
    let commands = symbol
        .commands()
        .iter()
        .cloned()
        .map(|command| match command {
            DrawCommand::FillPath { path, style, brush } => DrawCommand::FillPath {
                path,
                style,
                brush: rotate_brush(brush, &rotate),
            },
            DrawCommand::StrokePath {
                path,
                stroke,
                brush,
            } => DrawCommand::StrokePath {
                path,
                stroke,
                brush: rotate_brush(brush, &rotate),
            },
            DrawCommand::DrawText {
                text,
                bounds,
                mut style,
            } => {
                style.color = rotate(style.color);
                DrawCommand::DrawText {
                    text,
                    bounds,
                    style,
                }
            }
            DrawCommand::DrawImage {
                image,
                rect,
                mut options,
            } => {
                options.tint = options.tint.map(rotate);
                DrawCommand::DrawImage {
                    image,
                    rect,
                    options,
                }
            }
            other => other,
        })
        .collect();
    ResolvedSymbol::new(symbol.size, commands)
}

fn rotate_brush(brush: Brush, rotate: &impl Fn(Color) -> Color) -> Brush {
    let rotate_stops = |stops: Vec<GradientStop>| -> Vec<GradientStop> {
        stops
            .into_iter()
            .map(|s| GradientStop::new(s.offset, rotate(s.color)))
            .collect()
    };
    match brush {
        Brush::Solid(color) => Brush::Solid(rotate(color)),
        Brush::Gradient(Gradient::Linear {
            start,
            end,
            stops,
            spread,
        }) => Brush::Gradient(Gradient::Linear {
            start,
            end,
            stops: rotate_stops(stops),
            spread,
        }),
        Brush::Gradient(Gradient::Radial {
            center,
            start_radius,
            end_radius,
            stops,
            spread,
        }) => Brush::Gradient(Gradient::Radial {
            center,
            start_radius,
            end_radius,
            stops: rotate_stops(stops),
            spread,
        }),
        Brush::Gradient(Gradient::Conic {
            center,
            start_angle,
            stops,
        }) => Brush::Gradient(Gradient::Conic {
            center,
            start_angle,
            stops: rotate_stops(stops),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veneer_core::{
        Affine2D, FillStyle, LayerConfig, Path, Point, RecordingContext, Size,
    };
    use veneer_paint::{RasterCanvas, RenderEnvironment};

    fn dot() -> ResolvedSymbol {
        ResolvedSymbol::new(
            Size::new(10.0, 10.0),
            vec![DrawCommand::FillPath {
                path: Path::rect(Rect::new(0.0, 0.0, 10.0, 10.0)),
                style: FillStyle::default(),
                brush: Brush::Solid(Color::RED),
            }],
        )
    }

    fn record(effect: EffectTransform) -> Vec<DrawCommand> {
        let env = RenderEnvironment::default();
        let mut host = RecordingContext::new(Size::new(100.0, 100.0));
        {
            let mut ctx = GraphicsContext::new(&mut host, Size::new(100.0, 100.0), &env);
            draw_symbol_with_effect(&mut ctx, &dot(), Rect::new(0.0, 0.0, 20.0, 20.0), &effect);
        }
        host.take_commands()
    }

    #[test]
    fn test_identity_draws_plainly() {
        let commands = record(EffectTransform::IDENTITY);
        assert_eq!(commands.len(), 3);
        assert!(matches!(commands[0], DrawCommand::PushTransform(_)));
    }

    #[test]
    fn test_scale_pivots_on_centre() {
        let effect = EffectTransform {
            scale: 2.0,
            ..EffectTransform::IDENTITY
        };
        let commands = record(effect);
        assert_eq!(commands.len(), 7);
        assert_eq!(commands[0], DrawCommand::PushLayer(LayerConfig::new()));
        match commands[1] {
            DrawCommand::PushTransform(t) => {
                assert_eq!(t.transform_point(Point::new(10.0, 10.0)), Point::new(10.0, 10.0));
                assert_eq!(t.transform_point(Point::new(20.0, 10.0)), Point::new(30.0, 10.0));
            }
            ref other => panic!("expected pivot transform, got {other:?}"),
        }
        assert_eq!(commands[6], DrawCommand::PopLayer);
    }

    #[test]
    fn test_opacity_and_hue() {
        let effect = EffectTransform {
            opacity: 0.5,
            hue_degrees: 180.0,
            ..EffectTransform::IDENTITY
        };
        let commands = record(effect);
        assert_eq!(commands[0], DrawCommand::PushLayer(LayerConfig::new().opacity(0.5)));
        assert!(!commands
            .iter()
            .any(|c| matches!(c, DrawCommand::PushOpacity(_))));
        let rotated = Color::RED.hue_rotated(Angle::degrees(180.0));
        assert!(commands.iter().any(|c| matches!(
            c,
            DrawCommand::FillPath { brush: Brush::Solid(color), .. } if *color == rotated
        )));
        assert!(!commands
            .iter()
            .any(|c| matches!(c, DrawCommand::PushTransform(t) if *t == Affine2D::IDENTITY)));
    }

    #[test]
    fn test_opacity_fades_symbol_as_group() {
        let overlapping = ResolvedSymbol::new(
            Size::new(10.0, 10.0),
            vec![
                DrawCommand::FillPath {
                    path: Path::rect(Rect::new(0.0, 0.0, 6.0, 6.0)),
                    style: FillStyle::default(),
                    brush: Brush::Solid(Color::RED),
                },
                DrawCommand::FillPath {
                    path: Path::rect(Rect::new(4.0, 4.0, 6.0, 6.0)),
                    style: FillStyle::default(),
                    brush: Brush::Solid(Color::RED),
                },
            ],
        );
        let effect = EffectTransform {
            opacity: 0.5,
            ..EffectTransform::IDENTITY
        };
        let env = RenderEnvironment::default();
        let mut raster = RasterCanvas::new(20, 20).unwrap();
        {
            let mut ctx = GraphicsContext::new(&mut raster, Size::new(20.0, 20.0), &env);
            draw_symbol_with_effect(
                &mut ctx,
                &overlapping,
                Rect::new(0.0, 0.0, 20.0, 20.0),
                &effect,
            );
        }

        let single = raster.pixel(3, 3).unwrap();
        let overlap = raster.pixel(10, 10).unwrap();
        assert!((single.a - 0.5).abs() < 0.02, "single {single:?}");
        assert!((overlap.a - 0.5).abs() < 0.02, "overlap {overlap:?}");
        assert_eq!(raster.pixel(18, 1).map(|c| c.a), Some(0.0));
    }

    #[test]
    fn test_invisible_effect_draws_nothing() {
        let effect = EffectTransform {
            opacity: 0.0,
            ..EffectTransform::IDENTITY
        };
        assert!(record(effect).is_empty());
    }
}
