//! End-to-end canvas rendering through the raster host

use veneer::prelude::*;
use veneer::veneer_core::RecordingContext;
use veneer::veneer_paint::{resolve_brush, ShadingEnvironment};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn test_single_blue_rect() {
    init_tracing();
    let veneer = Veneer::new();
    let mut canvas = veneer.canvas(|ctx, _size| {
        ctx.fill(
            &Path::rect(Rect::new(0.0, 0.0, 100.0, 100.0)),
            &Shading::color(Color::BLUE),
        );
    });
    let raster = veneer
        .render_to_raster(&mut canvas, Size::new(200.0, 200.0))
        .unwrap();

    assert_eq!(raster.width(), 200);
    assert_eq!(raster.height(), 200);
    for (x, y) in [(0, 0), (50, 50), (99, 99), (0, 99), (99, 0)] {
        assert_eq!(raster.pixel(x, y), Some(Color::BLUE), "inside at ({x}, {y})");
    }
    for (x, y) in [(100, 100), (150, 20), (20, 150), (199, 199)] {
        assert_eq!(raster.pixel(x, y).map(|c| c.a), Some(0.0), "outside at ({x}, {y})");
    }
}

#[test]
fn test_clips_accumulate_until_scope_ends() {
    init_tracing();
    let mut canvas = Canvas::new(|ctx, size| {
        ctx.clip_to(&Path::rect(Rect::new(0.0, 0.0, 120.0, 120.0)));
        ctx.clip_to(&Path::rect(Rect::new(60.0, 60.0, 140.0, 140.0)));
        assert_eq!(ctx.clip_count(), 2);
        assert_eq!(ctx.clip_bounding_rect(), Rect::new(60.0, 60.0, 60.0, 60.0));
        ctx.fill(
            &Path::rect(Rect::from(size)),
            &Shading::color(Color::RED),
        );
    });
    let raster = canvas
        .render_to_raster(Size::new(200.0, 200.0), &RenderEnvironment::default())
        .unwrap();

    assert_eq!(raster.pixel(90, 90), Some(Color::RED));
    assert_eq!(raster.pixel(30, 30).map(|c| c.a), Some(0.0));
    assert_eq!(raster.pixel(150, 150).map(|c| c.a), Some(0.0));
}

#[test]
fn test_density_scales_device_pixels() {
    let env = RenderEnvironment::new().with_density(2.0);
    let mut canvas = Canvas::new(|ctx, size| {
        assert_eq!(size, Size::new(50.0, 25.0));
        ctx.fill(
            &Path::rect(Rect::new(0.0, 0.0, 10.0, 10.0)),
            &Shading::color(Color::GREEN),
        );
    });
    let raster = canvas.render_to_raster(Size::new(50.0, 25.0), &env).unwrap();

    assert_eq!((raster.width(), raster.height()), (100, 50));
    assert_eq!(raster.pixel(19, 19), Some(Color::GREEN));
    assert_eq!(raster.pixel(21, 21).map(|c| c.a), Some(0.0));
}

#[test]
fn test_text_anchor_centres_measured_size() {
    let env = RenderEnvironment::default();
    let mut host = RecordingContext::new(Size::new(200.0, 100.0));
    let ctx = GraphicsContext::new(&mut host, Size::new(200.0, 100.0), &env);

    let text = ctx.resolve_text(Text::new("Hello").with_size(20.0));
    let measured = text.measure(ctx.size());
    let point = Point::new(100.0, 50.0);
    let rect = Rect::anchored(point, measured, UnitPoint::CENTER);

    assert_eq!(rect.center(), point);
    assert_eq!(rect.x(), point.x - measured.width / 2.0);
    assert_eq!(rect.y(), point.y - measured.height / 2.0);

    let leading = Rect::anchored(point, measured, UnitPoint::TOP_LEADING);
    assert_eq!(leading.origin, point);
}

#[test]
fn test_shading_resolution_is_deterministic() {
    let env = ShadingEnvironment::default().with_foreground(Color::rgba(0.2, 0.4, 0.6, 1.0));
    let shadings = [
        Shading::Foreground,
        Shading::color(Color::RED),
        Shading::linear_gradient(
            &[Color::RED, Color::BLUE],
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
        ),
        Shading::conic_gradient(
            &[Color::RED, Color::GREEN, Color::BLUE],
            Point::new(5.0, 5.0),
            Angle::degrees(90.0),
        ),
    ];
    for shading in &shadings {
        assert_eq!(resolve_brush(shading, &env), resolve_brush(shading, &env));
    }
}

#[test]
fn test_every_blend_mode_draws() {
    for mode in GraphicsBlendMode::ALL {
        let mut canvas = Canvas::new(move |ctx, size| {
            ctx.set_blend_mode(mode);
            assert_eq!(ctx.blend_mode(), mode);
            ctx.fill(&Path::rect(Rect::from(size)), &Shading::color(Color::RED));
        });
        let raster = canvas
            .render_to_raster(Size::new(4.0, 4.0), &RenderEnvironment::default())
            .unwrap();
        assert!(raster.pixel(1, 1).is_some(), "{mode:?}");
    }
}

#[test]
fn test_opaque_canvas_starts_white() {
    let mut canvas = Canvas::new(|_, _| {}).with_opaque(true);
    let raster = canvas
        .render_to_raster(Size::new(8.0, 8.0), &RenderEnvironment::default())
        .unwrap();
    assert_eq!(raster.pixel(4, 4), Some(Color::WHITE));
}

#[test]
fn test_png_written() {
    let veneer = Veneer::new();
    let mut canvas = veneer.canvas(|ctx, size| {
        ctx.fill(&Path::ellipse(Rect::from(size)), &Shading::color(Color::RED));
    });
    let raster = veneer
        .render_to_raster(&mut canvas, Size::new(16.0, 16.0))
        .unwrap();
    let bytes = raster.encode_png().unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
}
