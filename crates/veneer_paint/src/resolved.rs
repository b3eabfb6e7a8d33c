//! Content resolved against a graphics context
//!
//! Text, images and symbols are resolved once and can then be measured and
//! drawn any number of times.

use std::fmt;
use std::sync::Arc;

use veneer_core::{DrawCommand, ImageId, Size};

use crate::shading::Shading;
use crate::text::{Text, TextMeasurer};

/// Ratio of the measured height used as the baseline
///
/// An approximation in place of real font metrics.
const BASELINE_RATIO: f32 = 0.8;

/// Text fixed to the environment of a graphics context
#[derive(Clone)]
pub struct ResolvedText {
    text: Text,
    measurer: Arc<dyn TextMeasurer>,
}

impl fmt::Debug for ResolvedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedText").field("text", &self.text).finish()
    }
}

impl ResolvedText {
    pub fn new(text: Text, measurer: Arc<dyn TextMeasurer>) -> Self {
        Self { text, measurer }
    }

    pub fn text(&self) -> &Text {
        &self.text
    }

    /// Shading for uncoloured regions of the text
    pub fn shading(&self) -> Shading {
        Shading::Foreground
    }

    /// Size of the text laid out within `size`
    pub fn measure(&self, size: Size) -> Size {
        self.measurer
            .measure(&self.text.content, &self.text.style, size)
    }

    /// Distance from the top of the first line to its baseline
    pub fn first_baseline(&self, size: Size) -> f32 {
        self.measure(size).height * BASELINE_RATIO
    }

    /// Distance from the top of the text to the last line's baseline
    pub fn last_baseline(&self, size: Size) -> f32 {
        self.first_baseline(size)
    }
}

/// An image registered with the host, with its natural size
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Image {
    pub id: ImageId,
    pub size: Size,
}

impl Image {
    pub fn new(id: ImageId, size: Size) -> Self {
        Self { id, size }
    }
}

/// An image fixed to the environment of a graphics context
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedImage {
    pub id: ImageId,
    pub size: Size,
    /// Distance from the top of the image to its baseline
    pub baseline: f32,
    /// Fill for the image's opaque regions, replacing its colours
    pub shading: Option<Shading>,
}

impl ResolvedImage {
    pub fn new(image: Image) -> Self {
        Self {
            id: image.id,
            size: image.size,
            baseline: 0.0,
            shading: None,
        }
    }

    pub fn with_shading(mut self, shading: Shading) -> Self {
        self.shading = Some(shading);
        self
    }
}

/// A recorded sequence of drawing operations that can be drawn repeatedly
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResolvedSymbol {
    pub size: Size,
    commands: Vec<DrawCommand>,
}

impl ResolvedSymbol {
    pub fn new(size: Size, commands: Vec<DrawCommand>) -> Self {
        Self { size, commands }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::EstimatedTextMeasurer;

    #[test]
    fn test_baseline_heuristic() {
        let text = ResolvedText::new(
            Text::new("Hello").with_size(10.0),
            Arc::new(EstimatedTextMeasurer::new(0.5)),
        );
        let bounds = Size::new(1000.0, 1000.0);
        let size = text.measure(bounds);
        assert_eq!(size.width, 25.0);
        assert!((text.first_baseline(bounds) - size.height * 0.8).abs() < 1e-5);
        assert_eq!(text.first_baseline(bounds), text.last_baseline(bounds));
        assert_eq!(text.shading(), Shading::Foreground);
    }

    #[test]
    fn test_resolved_image_defaults() {
        let image = ResolvedImage::new(Image::new(ImageId(3), Size::new(16.0, 8.0)));
        assert_eq!(image.baseline, 0.0);
        assert!(image.shading.is_none());
        assert_eq!(image.size, Size::new(16.0, 8.0));
    }
}
