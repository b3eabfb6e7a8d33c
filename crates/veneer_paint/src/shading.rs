//! Shading and its resolution to host brushes
//!
//! A [`Shading`] is a paint description that stays abstract until something
//! is drawn with it. [`resolve_brush`] turns it into a concrete [`Brush`]
//! against a [`ShadingEnvironment`], which supplies the foreground colour and
//! the canvas colour mode.

use veneer_core::{
    even_stops, Angle, Brush, Color, Gradient, GradientSpread, GradientStop, Point,
};

/// Samples inserted between each pair of stops for linear-light gradients
const LINEAR_LIGHT_SAMPLES: usize = 8;

// ─────────────────────────────────────────────────────────────────────────────
// Options
// ─────────────────────────────────────────────────────────────────────────────

/// Options controlling how a gradient is rendered
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct GradientOptions(u32);

impl GradientOptions {
    pub const NONE: GradientOptions = GradientOptions(0);
    /// Repeat the gradient outside its nominal range
    pub const REPEAT: GradientOptions = GradientOptions(1 << 0);
    /// Repeat, reflecting every other instance
    pub const MIRROR: GradientOptions = GradientOptions(1 << 1);
    /// Interpolate between stops in linear light
    pub const LINEAR_COLOR: GradientOptions = GradientOptions(1 << 2);

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: GradientOptions) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn union(self, other: GradientOptions) -> GradientOptions {
        GradientOptions(self.0 | other.0)
    }

    /// Spread mode implied by these options; `MIRROR` wins over `REPEAT`
    pub fn spread(self) -> GradientSpread {
        if self.contains(Self::MIRROR) {
            GradientSpread::Reflect
        } else if self.contains(Self::REPEAT) {
            GradientSpread::Repeat
        } else {
            GradientSpread::Pad
        }
    }
}

impl std::ops::BitOr for GradientOptions {
    type Output = GradientOptions;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

/// Working colour space of a canvas
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ColorRenderingMode {
    /// Gamma-encoded sRGB
    #[default]
    NonLinear,
    /// Linear sRGB
    Linear,
    /// Linear sRGB with values outside [0, 1]
    ExtendedLinear,
}

impl ColorRenderingMode {
    pub fn is_linear(self) -> bool {
        !matches!(self, ColorRenderingMode::NonLinear)
    }
}

/// Values a shading is resolved against
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadingEnvironment {
    /// Colour used by [`Shading::Foreground`]
    pub foreground: Color,
    pub color_mode: ColorRenderingMode,
}

impl Default for ShadingEnvironment {
    fn default() -> Self {
        Self {
            foreground: Color::BLACK,
            color_mode: ColorRenderingMode::NonLinear,
        }
    }
}

impl ShadingEnvironment {
    pub fn with_foreground(mut self, color: Color) -> Self {
        self.foreground = color;
        self
    }

    pub fn with_color_mode(mut self, mode: ColorRenderingMode) -> Self {
        self.color_mode = mode;
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Shading
// ─────────────────────────────────────────────────────────────────────────────

/// A colour or pattern to fill or outline a path with
#[derive(Clone, Debug, PartialEq)]
pub enum Shading {
    /// The environment's foreground colour
    Foreground,
    /// The content behind the canvas; resolves to transparent
    Backdrop,
    Color(Color),
    LinearGradient {
        stops: Vec<GradientStop>,
        start: Point,
        end: Point,
        options: GradientOptions,
    },
    RadialGradient {
        stops: Vec<GradientStop>,
        center: Point,
        start_radius: f32,
        end_radius: f32,
        options: GradientOptions,
    },
    ConicGradient {
        stops: Vec<GradientStop>,
        center: Point,
        angle: Angle,
        options: GradientOptions,
    },
}

impl Shading {
    pub fn color(color: Color) -> Self {
        Shading::Color(color)
    }

    /// Linear gradient through evenly spaced `colors`
    pub fn linear_gradient(colors: &[Color], start: Point, end: Point) -> Self {
        Self::linear_gradient_stops(even_stops(colors), start, end, GradientOptions::NONE)
    }

    pub fn linear_gradient_stops(
        stops: Vec<GradientStop>,
        start: Point,
        end: Point,
        options: GradientOptions,
    ) -> Self {
        Shading::LinearGradient {
            stops,
            start,
            end,
            options,
        }
    }

    /// Radial gradient through evenly spaced `colors`
    pub fn radial_gradient(
        colors: &[Color],
        center: Point,
        start_radius: f32,
        end_radius: f32,
    ) -> Self {
        Self::radial_gradient_stops(
            even_stops(colors),
            center,
            start_radius,
            end_radius,
            GradientOptions::NONE,
        )
    }

    pub fn radial_gradient_stops(
        stops: Vec<GradientStop>,
        center: Point,
        start_radius: f32,
        end_radius: f32,
        options: GradientOptions,
    ) -> Self {
        Shading::RadialGradient {
            stops,
            center,
            start_radius,
            end_radius,
            options,
        }
    }

    /// Conic gradient through evenly spaced `colors`, starting at `angle`
    pub fn conic_gradient(colors: &[Color], center: Point, angle: Angle) -> Self {
        Self::conic_gradient_stops(even_stops(colors), center, angle, GradientOptions::NONE)
    }

    pub fn conic_gradient_stops(
        stops: Vec<GradientStop>,
        center: Point,
        angle: Angle,
        options: GradientOptions,
    ) -> Self {
        Shading::ConicGradient {
            stops,
            center,
            angle,
            options,
        }
    }
}

impl From<Color> for Shading {
    fn from(color: Color) -> Self {
        Shading::Color(color)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Resolution
// ─────────────────────────────────────────────────────────────────────────────

/// Resolve a shading to the brush a host draws with
///
/// Never fails: a gradient without stops falls back to solid black, and a
/// gradient with a single stop becomes a solid fill of that colour.
pub fn resolve_brush(shading: &Shading, env: &ShadingEnvironment) -> Brush {
    match shading {
        Shading::Foreground => Brush::Solid(env.foreground),
        Shading::Backdrop => Brush::Solid(Color::TRANSPARENT),
        Shading::Color(color) => Brush::Solid(*color),
        Shading::LinearGradient {
            stops,
            start,
            end,
            options,
        } => gradient_brush(stops, *options, env, |stops| Gradient::Linear {
            start: *start,
            end: *end,
            stops,
            spread: options.spread(),
        }),
        Shading::RadialGradient {
            stops,
            center,
            start_radius,
            end_radius,
            options,
        } => gradient_brush(stops, *options, env, |stops| Gradient::Radial {
            center: *center,
            start_radius: start_radius.max(0.0),
            end_radius: end_radius.max(0.0),
            stops,
            spread: options.spread(),
        }),
        Shading::ConicGradient {
            stops,
            center,
            angle,
            options,
        } => gradient_brush(stops, *options, env, |stops| Gradient::Conic {
            center: *center,
            start_angle: *angle,
            stops,
        }),
    }
}

fn gradient_brush(
    stops: &[GradientStop],
    options: GradientOptions,
    env: &ShadingEnvironment,
    build: impl FnOnce(Vec<GradientStop>) -> Gradient,
) -> Brush {
    match stops {
        [] => {
            tracing::warn!("gradient has no stops, drawing black");
            Brush::Solid(Color::BLACK)
        }
        [only] => Brush::Solid(only.color),
        _ => {
            let mut sorted = stops.to_vec();
            sorted.sort_by(|a, b| a.offset.total_cmp(&b.offset));
            let linear = options.contains(GradientOptions::LINEAR_COLOR);
            let stops = if linear || env.color_mode.is_linear() {
                linear_light_stops(&sorted)
            } else {
                sorted
            };
            Brush::Gradient(build(stops))
        }
    }
}

/// Resample stops so that sRGB interpolation between them approximates
/// interpolation in linear light
fn linear_light_stops(stops: &[GradientStop]) -> Vec<GradientStop> {
    let mut out = Vec::with_capacity(stops.len() * LINEAR_LIGHT_SAMPLES);
    for pair in stops.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        for i in 0..LINEAR_LIGHT_SAMPLES {
            let t = i as f32 / LINEAR_LIGHT_SAMPLES as f32;
            out.push(GradientStop::new(
                a.offset + (b.offset - a.offset) * t,
                Color::lerp_linear(&a.color, &b.color, t),
            ));
        }
    }
    if let Some(last) = stops.last() {
        out.push(*last);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_and_foreground() {
        let env = ShadingEnvironment::default().with_foreground(Color::RED);
        assert_eq!(
            resolve_brush(&Shading::color(Color::BLUE), &env),
            Brush::Solid(Color::BLUE)
        );
        assert_eq!(resolve_brush(&Shading::Foreground, &env), Brush::Solid(Color::RED));
        assert_eq!(
            resolve_brush(&Shading::Backdrop, &env),
            Brush::Solid(Color::TRANSPARENT)
        );
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let env = ShadingEnvironment::default();
        let shading = Shading::linear_gradient(
            &[Color::RED, Color::BLUE],
            Point::ZERO,
            Point::new(10.0, 0.0),
        );
        assert_eq!(resolve_brush(&shading, &env), resolve_brush(&shading, &env));
    }

    #[test]
    fn test_degenerate_gradients() {
        let env = ShadingEnvironment::default();
        let empty = Shading::linear_gradient(&[], Point::ZERO, Point::new(1.0, 0.0));
        assert_eq!(resolve_brush(&empty, &env), Brush::Solid(Color::BLACK));

        let single = Shading::radial_gradient(&[Color::GREEN], Point::ZERO, 0.0, 10.0);
        assert_eq!(resolve_brush(&single, &env), Brush::Solid(Color::GREEN));
    }

    #[test]
    fn test_options_select_spread() {
        assert_eq!(GradientOptions::NONE.spread(), GradientSpread::Pad);
        assert_eq!(GradientOptions::REPEAT.spread(), GradientSpread::Repeat);
        assert_eq!(
            (GradientOptions::REPEAT | GradientOptions::MIRROR).spread(),
            GradientSpread::Reflect
        );

        let shading = Shading::linear_gradient_stops(
            even_stops(&[Color::RED, Color::BLUE]),
            Point::ZERO,
            Point::new(1.0, 0.0),
            GradientOptions::REPEAT,
        );
        match resolve_brush(&shading, &ShadingEnvironment::default()) {
            Brush::Gradient(Gradient::Linear { spread, .. }) => {
                assert_eq!(spread, GradientSpread::Repeat)
            }
            other => panic!("expected linear gradient, got {other:?}"),
        }
    }

    #[test]
    fn test_linear_color_resamples_stops() {
        let shading = Shading::linear_gradient_stops(
            even_stops(&[Color::BLACK, Color::WHITE]),
            Point::ZERO,
            Point::new(1.0, 0.0),
            GradientOptions::LINEAR_COLOR,
        );
        let brush = resolve_brush(&shading, &ShadingEnvironment::default());
        let Brush::Gradient(gradient) = brush else {
            panic!("expected a gradient");
        };
        assert_eq!(gradient.stops().len(), LINEAR_LIGHT_SAMPLES + 1);
        // Linear-light midpoint is brighter than the sRGB midpoint
        assert!(gradient.color_at(0.5).r > 0.7);

        let linear_canvas =
            ShadingEnvironment::default().with_color_mode(ColorRenderingMode::Linear);
        let plain = Shading::linear_gradient(
            &[Color::BLACK, Color::WHITE],
            Point::ZERO,
            Point::new(1.0, 0.0),
        );
        let Brush::Gradient(gradient) = resolve_brush(&plain, &linear_canvas) else {
            panic!("expected a gradient");
        };
        assert!(gradient.stops().len() > 2);
    }

    #[test]
    fn test_unsorted_stops_are_ordered() {
        let shading = Shading::conic_gradient_stops(
            vec![
                GradientStop::new(1.0, Color::BLUE),
                GradientStop::new(0.0, Color::RED),
            ],
            Point::ZERO,
            Angle::ZERO,
            GradientOptions::NONE,
        );
        let Brush::Gradient(gradient) = resolve_brush(&shading, &ShadingEnvironment::default())
        else {
            panic!("expected a gradient");
        };
        assert_eq!(gradient.stops()[0].color, Color::RED);
    }
}
