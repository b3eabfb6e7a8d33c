//! Text content and measurement

use veneer_core::{Color, Size, TextStyle};

/// A run of text to draw into a graphics context
#[derive(Clone, Debug, PartialEq)]
pub struct Text {
    pub content: String,
    pub style: TextStyle,
    /// Explicit colour; `None` draws with the foreground shading
    pub color: Option<Color>,
}

impl Text {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            style: TextStyle::default(),
            color: None,
        }
    }

    pub fn with_style(mut self, style: TextStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.style.size = size;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }
}

impl From<&str> for Text {
    fn from(content: &str) -> Self {
        Text::new(content)
    }
}

impl From<String> for Text {
    fn from(content: String) -> Self {
        Text::new(content)
    }
}

/// Lays out text to find the space it occupies
pub trait TextMeasurer: Send + Sync {
    /// Size of `text` laid out in `style`, wrapped and clipped to `bounds`
    fn measure(&self, text: &str, style: &TextStyle, bounds: Size) -> Size;
}

/// Measures text from average glyph metrics, without a font stack
///
/// Each character advances `advance_ratio * size`; lines are greedily
/// wrapped at word boundaries and `line_height * size` tall.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EstimatedTextMeasurer {
    pub advance_ratio: f32,
}

impl Default for EstimatedTextMeasurer {
    fn default() -> Self {
        Self {
            advance_ratio: 0.55,
        }
    }
}

impl EstimatedTextMeasurer {
    pub fn new(advance_ratio: f32) -> Self {
        Self { advance_ratio }
    }

    fn line_widths(&self, text: &str, advance: f32, max_width: f32) -> Vec<f32> {
        let mut widths = Vec::new();
        for paragraph in text.split('\n') {
            let mut line = 0.0_f32;
            for word in paragraph.split(' ') {
                let word_width = word.chars().count() as f32 * advance;
                let with_space = if line > 0.0 {
                    line + advance + word_width
                } else {
                    word_width
                };
                if line > 0.0 && with_space > max_width {
                    widths.push(line);
                    line = word_width;
                } else {
                    line = with_space;
                }
            }
            widths.push(line);
        }
        widths
    }
}

impl TextMeasurer for EstimatedTextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle, bounds: Size) -> Size {
        if text.is_empty() || style.size <= 0.0 {
            return Size::ZERO;
        }
        let advance = style.size * self.advance_ratio;
        let line_height = style.size * style.line_height;
        let widths = self.line_widths(text, advance, bounds.width.max(0.0));
        let width = widths.iter().copied().fold(0.0, f32::max);
        let height = widths.len() as f32 * line_height;
        Size::new(
            width.min(bounds.width.max(0.0)),
            height.min(bounds.height.max(0.0)),
        )
    }
}
