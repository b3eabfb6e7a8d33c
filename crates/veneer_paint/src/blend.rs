//! Graphics context blend modes
//!
//! The full set of compositing functions a [`GraphicsContext`](crate::GraphicsContext)
//! accepts, and their mapping onto the modes a host draw context implements.

use veneer_core::BlendMode;

/// How new drawing combines with what is already on the canvas
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GraphicsBlendMode {
    #[default]
    Normal,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    SoftLight,
    HardLight,
    Difference,
    Exclusion,
    Hue,
    Saturation,
    Color,
    Luminosity,
    Clear,
    Copy,
    SourceIn,
    SourceOut,
    SourceAtop,
    DestinationOver,
    DestinationIn,
    DestinationOut,
    DestinationAtop,
    Xor,
    PlusDarker,
    PlusLighter,
}

impl GraphicsBlendMode {
    /// Every blend mode, in declaration order
    pub const ALL: [GraphicsBlendMode; 28] = [
        GraphicsBlendMode::Normal,
        GraphicsBlendMode::Multiply,
        GraphicsBlendMode::Screen,
        GraphicsBlendMode::Overlay,
        GraphicsBlendMode::Darken,
        GraphicsBlendMode::Lighten,
        GraphicsBlendMode::ColorDodge,
        GraphicsBlendMode::ColorBurn,
        GraphicsBlendMode::SoftLight,
        GraphicsBlendMode::HardLight,
        GraphicsBlendMode::Difference,
        GraphicsBlendMode::Exclusion,
        GraphicsBlendMode::Hue,
        GraphicsBlendMode::Saturation,
        GraphicsBlendMode::Color,
        GraphicsBlendMode::Luminosity,
        GraphicsBlendMode::Clear,
        GraphicsBlendMode::Copy,
        GraphicsBlendMode::SourceIn,
        GraphicsBlendMode::SourceOut,
        GraphicsBlendMode::SourceAtop,
        GraphicsBlendMode::DestinationOver,
        GraphicsBlendMode::DestinationIn,
        GraphicsBlendMode::DestinationOut,
        GraphicsBlendMode::DestinationAtop,
        GraphicsBlendMode::Xor,
        GraphicsBlendMode::PlusDarker,
        GraphicsBlendMode::PlusLighter,
    ];

    /// The host blend mode used to draw with this mode
    ///
    /// `PlusDarker` has no host equivalent and draws as `Darken`.
    pub fn as_native(self) -> BlendMode {
        match self {
            GraphicsBlendMode::Normal => BlendMode::Normal,
            GraphicsBlendMode::Multiply => BlendMode::Multiply,
            GraphicsBlendMode::Screen => BlendMode::Screen,
            GraphicsBlendMode::Overlay => BlendMode::Overlay,
            GraphicsBlendMode::Darken => BlendMode::Darken,
            GraphicsBlendMode::Lighten => BlendMode::Lighten,
            GraphicsBlendMode::ColorDodge => BlendMode::ColorDodge,
            GraphicsBlendMode::ColorBurn => BlendMode::ColorBurn,
            GraphicsBlendMode::SoftLight => BlendMode::SoftLight,
            GraphicsBlendMode::HardLight => BlendMode::HardLight,
            GraphicsBlendMode::Difference => BlendMode::Difference,
            GraphicsBlendMode::Exclusion => BlendMode::Exclusion,
            GraphicsBlendMode::Hue => BlendMode::Hue,
            GraphicsBlendMode::Saturation => BlendMode::Saturation,
            GraphicsBlendMode::Color => BlendMode::Color,
            GraphicsBlendMode::Luminosity => BlendMode::Luminosity,
            GraphicsBlendMode::Clear => BlendMode::Clear,
            GraphicsBlendMode::Copy => BlendMode::Source,
            GraphicsBlendMode::SourceIn => BlendMode::SourceIn,
            GraphicsBlendMode::SourceOut => BlendMode::SourceOut,
            GraphicsBlendMode::SourceAtop => BlendMode::SourceAtop,
            GraphicsBlendMode::DestinationOver => BlendMode::DestinationOver,
            GraphicsBlendMode::DestinationIn => BlendMode::DestinationIn,
            GraphicsBlendMode::DestinationOut => BlendMode::DestinationOut,
            GraphicsBlendMode::DestinationAtop => BlendMode::DestinationAtop,
            GraphicsBlendMode::Xor => BlendMode::Xor,
            GraphicsBlendMode::PlusDarker => BlendMode::Darken,
            GraphicsBlendMode::PlusLighter => BlendMode::Plus,
        }
    }
}

impl From<GraphicsBlendMode> for BlendMode {
    fn from(mode: GraphicsBlendMode) -> Self {
        mode.as_native()
    }
}
