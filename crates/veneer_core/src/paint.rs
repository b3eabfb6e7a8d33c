//! Paint primitives
//!
//! Colors, gradients, brushes and the native blend modes understood by a
//! host draw context.

use crate::geometry::{Angle, Point};

// ─────────────────────────────────────────────────────────────────────────────
// Color
// ─────────────────────────────────────────────────────────────────────────────

/// RGBA color with straight (non-premultiplied) alpha, sRGB encoded
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);
    pub const YELLOW: Color = Color::rgb(1.0, 1.0, 0.0);
    pub const CYAN: Color = Color::rgb(0.0, 1.0, 1.0);
    pub const MAGENTA: Color = Color::rgb(1.0, 0.0, 1.0);
    pub const ORANGE: Color = Color::rgb(1.0, 0.5, 0.0);
    pub const GRAY: Color = Color::rgb(0.5, 0.5, 0.5);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xFF) as f32 / 255.0;
        let g = ((hex >> 8) & 0xFF) as f32 / 255.0;
        let b = (hex & 0xFF) as f32 / 255.0;
        Self::rgb(r, g, b)
    }

    /// Parse `#rrggbb` or `#rrggbbaa`
    pub fn parse_hex(text: &str) -> Option<Self> {
        let digits = text.strip_prefix('#').unwrap_or(text);
        let value = u32::from_str_radix(digits, 16).ok()?;
        match digits.len() {
            6 => Some(Self::from_hex(value)),
            8 => Some(Self::from_hex(value >> 8).with_alpha((value & 0xFF) as f32 / 255.0)),
            _ => None,
        }
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.a = alpha;
        self
    }

    /// Multiply the alpha channel
    pub fn fade(mut self, factor: f32) -> Self {
        self.a *= factor;
        self
    }

    pub fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// 8-bit straight-alpha RGBA
    pub fn to_rgba8(&self) -> [u8; 4] {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    /// Linear interpolation between two colors
    pub fn lerp(a: &Color, b: &Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        Color {
            r: a.r + (b.r - a.r) * t,
            g: a.g + (b.g - a.g) * t,
            b: a.b + (b.b - a.b) * t,
            a: a.a + (b.a - a.a) * t,
        }
    }

    /// Interpolate in linear light and re-encode as sRGB
    pub fn lerp_linear(a: &Color, b: &Color, t: f32) -> Color {
        Color::lerp(&a.to_linear(), &b.to_linear(), t).to_srgb()
    }

    /// Decode the sRGB transfer function
    pub fn to_linear(&self) -> Color {
        fn decode(c: f32) -> f32 {
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        Color::rgba(decode(self.r), decode(self.g), decode(self.b), self.a)
    }

    /// Encode linear components with the sRGB transfer function
    pub fn to_srgb(&self) -> Color {
        fn encode(c: f32) -> f32 {
            if c <= 0.003_130_8 {
                c * 12.92
            } else {
                1.055 * c.powf(1.0 / 2.4) - 0.055
            }
        }
        Color::rgba(encode(self.r), encode(self.g), encode(self.b), self.a)
    }

    /// Rotate the hue by `angle`, keeping luminance (YIQ rotation)
    pub fn hue_rotated(&self, angle: Angle) -> Color {
        let (s, c) = angle.as_radians().sin_cos();
        let y = 0.299 * self.r + 0.587 * self.g + 0.114 * self.b;
        let i = 0.596 * self.r - 0.274 * self.g - 0.322 * self.b;
        let q = 0.211 * self.r - 0.523 * self.g + 0.312 * self.b;
        let (i, q) = (i * c - q * s, i * s + q * c);
        Color::rgba(
            (y + 0.956 * i + 0.621 * q).clamp(0.0, 1.0),
            (y - 0.272 * i - 0.647 * q).clamp(0.0, 1.0),
            (y - 1.106 * i + 1.703 * q).clamp(0.0, 1.0),
            self.a,
        )
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Gradients
// ─────────────────────────────────────────────────────────────────────────────

/// Gradient stop
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    /// Position along the gradient (0.0 to 1.0)
    pub offset: f32,
    /// Color at this stop
    pub color: Color,
}

impl GradientStop {
    /// Create a new gradient stop
    pub fn new(offset: f32, color: Color) -> Self {
        Self {
            offset: offset.clamp(0.0, 1.0),
            color,
        }
    }
}

/// Stops for `colors` spaced evenly over [0, 1]
pub fn even_stops(colors: &[Color]) -> Vec<GradientStop> {
    match colors.len() {
        0 => Vec::new(),
        1 => vec![GradientStop::new(0.0, colors[0])],
        n => colors
            .iter()
            .enumerate()
            .map(|(i, c)| GradientStop::new(i as f32 / (n - 1) as f32, *c))
            .collect(),
    }
}

/// Gradient spread method for areas outside the gradient
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GradientSpread {
    /// Pad with the end colors
    #[default]
    Pad,
    /// Reflect the gradient
    Reflect,
    /// Repeat the gradient
    Repeat,
}

/// Gradient type
#[derive(Clone, Debug, PartialEq)]
pub enum Gradient {
    /// Linear gradient between two points
    Linear {
        start: Point,
        end: Point,
        /// Color stops sorted by offset
        stops: Vec<GradientStop>,
        spread: GradientSpread,
    },
    /// Radial gradient between two concentric circles
    Radial {
        center: Point,
        /// Radius at which offset 0 is drawn
        start_radius: f32,
        /// Radius at which offset 1 is drawn
        end_radius: f32,
        /// Color stops sorted by offset
        stops: Vec<GradientStop>,
        spread: GradientSpread,
    },
    /// Conic/angular gradient around a center point, clockwise in y-down space
    Conic {
        center: Point,
        start_angle: Angle,
        /// Color stops sorted by offset
        stops: Vec<GradientStop>,
    },
}

impl Gradient {
    /// Create a simple linear gradient with two colors
    pub fn linear(start: Point, end: Point, from: Color, to: Color) -> Self {
        Gradient::Linear {
            start,
            end,
            stops: vec![GradientStop::new(0.0, from), GradientStop::new(1.0, to)],
            spread: GradientSpread::Pad,
        }
    }

    /// Get the gradient stops
    pub fn stops(&self) -> &[GradientStop] {
        match self {
            Gradient::Linear { stops, .. } => stops,
            Gradient::Radial { stops, .. } => stops,
            Gradient::Conic { stops, .. } => stops,
        }
    }

    /// Get the first color in the gradient (or BLACK if no stops)
    pub fn first_color(&self) -> Color {
        self.stops()
            .first()
            .map(|s| s.color)
            .unwrap_or(Color::BLACK)
    }

    /// Color at `offset`, interpolating between the surrounding stops
    pub fn color_at(&self, offset: f32) -> Color {
        sample_stops(self.stops(), offset)
    }
}

/// Sample sorted stops at `offset`, padding with the end colors
pub fn sample_stops(stops: &[GradientStop], offset: f32) -> Color {
    let (first, last) = match (stops.first(), stops.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Color::BLACK,
    };
    if offset <= first.offset {
        return first.color;
    }
    if offset >= last.offset {
        return last.color;
    }
    for pair in stops.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        if offset <= b.offset {
            let span = b.offset - a.offset;
            if span <= f32::EPSILON {
                return b.color;
            }
            return Color::lerp(&a.color, &b.color, (offset - a.offset) / span);
        }
    }
    last.color
}

// ─────────────────────────────────────────────────────────────────────────────
// Brush and Blending
// ─────────────────────────────────────────────────────────────────────────────

/// Concrete paint consumed by a host draw context
#[derive(Clone, Debug, PartialEq)]
pub enum Brush {
    Solid(Color),
    Gradient(Gradient),
}

impl From<Color> for Brush {
    fn from(color: Color) -> Self {
        Brush::Solid(color)
    }
}

impl From<Gradient> for Brush {
    fn from(gradient: Gradient) -> Self {
        Brush::Gradient(gradient)
    }
}

/// Blend modes a host draw context can composite with
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BlendMode {
    #[default]
    Normal,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
    Hue,
    Saturation,
    Color,
    Luminosity,
    Clear,
    Source,
    SourceIn,
    SourceOut,
    SourceAtop,
    DestinationOver,
    DestinationIn,
    DestinationOut,
    DestinationAtop,
    Xor,
    Plus,
}

/// Corner radii for rounded rectangles
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CornerRadius {
    pub top_left: f32,
    pub top_right: f32,
    pub bottom_right: f32,
    pub bottom_left: f32,
}

impl CornerRadius {
    pub const ZERO: CornerRadius = CornerRadius {
        top_left: 0.0,
        top_right: 0.0,
        bottom_right: 0.0,
        bottom_left: 0.0,
    };

    pub fn uniform(radius: f32) -> Self {
        Self {
            top_left: radius,
            top_right: radius,
            bottom_right: radius,
            bottom_left: radius,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl From<f32> for CornerRadius {
    fn from(radius: f32) -> Self {
        Self::uniform(radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(Color::parse_hex("#0000ff"), Some(Color::BLUE));
        assert_eq!(
            Color::parse_hex("ff000080").map(|c| c.to_rgba8()),
            Some([255, 0, 0, 128])
        );
        assert_eq!(Color::parse_hex("#12"), None);
    }

    #[test]
    fn test_even_stops() {
        let stops = even_stops(&[Color::RED, Color::GREEN, Color::BLUE]);
        let offsets: Vec<f32> = stops.iter().map(|s| s.offset).collect();
        assert_eq!(offsets, vec![0.0, 0.5, 1.0]);
        assert!(even_stops(&[]).is_empty());
    }

    #[test]
    fn test_sample_stops_pads_and_interpolates() {
        let stops = vec![
            GradientStop::new(0.25, Color::BLACK),
            GradientStop::new(0.75, Color::WHITE),
        ];
        assert_eq!(sample_stops(&stops, 0.0), Color::BLACK);
        assert_eq!(sample_stops(&stops, 1.0), Color::WHITE);
        let mid = sample_stops(&stops, 0.5);
        assert!((mid.r - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_linear_light_round_trip() {
        let c = Color::rgb(0.2, 0.5, 0.8);
        let back = c.to_linear().to_srgb();
        assert!((back.r - c.r).abs() < 1e-4);
        assert!((back.g - c.g).abs() < 1e-4);
        assert!((back.b - c.b).abs() < 1e-4);
    }

    #[test]
    fn test_hue_rotation_full_turn_is_identity() {
        let c = Color::rgb(0.8, 0.3, 0.1);
        let turned = c.hue_rotated(Angle::degrees(360.0));
        assert!((turned.r - c.r).abs() < 1e-2);
        assert!((turned.g - c.g).abs() < 1e-2);
        assert!((turned.b - c.b).abs() < 1e-2);
    }
}
