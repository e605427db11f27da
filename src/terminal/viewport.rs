//! Viewport geometry
//!
//! Derives the number of visible lines and the word-wrap character budget
//! from the canvas size, scale factor and font metrics.

/// Canvas geometry and font metrics, all in logical pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Canvas width in logical pixels
    pub width: f32,
    /// Canvas height in logical pixels
    pub height: f32,
    /// Device pixel ratio (physical pixels per logical pixel)
    pub scale_factor: f32,
    /// Font size in logical pixels
    pub font_size: f32,
    /// Distance between baselines of consecutive lines
    pub line_height: f32,
    /// Padding on every side of the text area
    pub padding: f32,
    /// Average glyph advance as a fraction of the font size
    pub char_width_ratio: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 450.0,
            scale_factor: 1.0,
            font_size: 14.0,
            line_height: 20.0,
            padding: 30.0,
            char_width_ratio: 0.6,
        }
    }
}

impl Viewport {
    /// Build geometry from a physical surface size
    ///
    /// A zero-sized surface (window not laid out yet) falls back to the
    /// default 800x450 logical canvas.
    pub fn from_physical(
        physical_width: u32,
        physical_height: u32,
        scale_factor: f64,
        template: &Viewport,
    ) -> Self {
        let scale = if scale_factor > 0.0 { scale_factor as f32 } else { 1.0 };
        let (width, height) = if physical_width == 0 || physical_height == 0 {
            let fallback = Viewport::default();
            (fallback.width, fallback.height)
        } else {
            (physical_width as f32 / scale, physical_height as f32 / scale)
        };

        Self {
            width,
            height,
            scale_factor: scale,
            ..*template
        }
    }

    /// Average character advance in logical pixels
    pub fn char_width(&self) -> f32 {
        self.font_size * self.char_width_ratio
    }

    /// Number of lines that fit in the text area (at least 1)
    pub fn max_lines(&self) -> usize {
        let usable = self.height - self.padding * 2.0;
        if usable <= 0.0 || self.line_height <= 0.0 {
            return 1;
        }
        ((usable / self.line_height).floor() as usize).max(1)
    }

    /// Word-wrap budget in characters (at least 1)
    pub fn chars_per_line(&self) -> usize {
        let usable = self.width - self.padding * 2.0;
        let char_width = self.char_width();
        if usable <= 0.0 || char_width <= 0.0 {
            return 1;
        }
        ((usable / char_width).floor() as usize).max(1)
    }
}
