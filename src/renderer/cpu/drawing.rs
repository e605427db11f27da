//! Drawing primitives for CPU rendering
//!
//! Helper functions for text layout, the bar cursor and the scroll indicator.
//! Coordinates are logical pixels; the draw target carries the scale.

use crate::terminal::{Color, Viewport};
use raqote::{DrawOptions, DrawTarget, SolidSource, Source};

/// Width of the bar cursor
pub(super) const CURSOR_WIDTH: f32 = 2.0;
/// Width of the scroll indicator, and its distance from the right edge
pub(super) const INDICATOR_WIDTH: f32 = 4.0;
pub(super) const INDICATOR_MARGIN: f32 = 10.0;

pub(super) fn solid(color: Color) -> Source<'static> {
    Source::Solid(SolidSource::from_unpremultiplied_argb(
        0xff, color.r, color.g, color.b,
    ))
}

/// Baseline of the visible row `row`
pub(super) fn baseline(viewport: &Viewport, row: usize) -> f32 {
    viewport.padding + row as f32 * viewport.line_height + viewport.font_size
}

/// Advance width of `text` in logical pixels
///
/// Characters without a glyph advance by `fallback`.
pub(super) fn text_width(font: &font_kit::font::Font, size: f32, text: &str, fallback: f32) -> f32 {
    let units_per_em = font.metrics().units_per_em as f32;
    if units_per_em <= 0.0 {
        return text.chars().count() as f32 * fallback;
    }
    text.chars()
        .map(|ch| {
            font.glyph_for_char(ch)
                .and_then(|glyph| font.advance(glyph).ok())
                .map(|advance| advance.x() * size / units_per_em)
                .unwrap_or(fallback)
        })
        .sum()
}

pub(super) fn fill_rect(dt: &mut DrawTarget, x: f32, y: f32, width: f32, height: f32, color: Color) {
    dt.fill_rect(x, y, width, height, &solid(color), &DrawOptions::new());
}

/// Draw the 2px bar cursor with its top at `top`
pub(super) fn draw_bar_cursor(dt: &mut DrawTarget, x: f32, top: f32, height: f32, color: Color) {
    fill_rect(dt, x, top, CURSOR_WIDTH, height, color);
}

/// Left edge of the scroll indicator for a canvas `width` wide
pub(super) fn indicator_x(width: f32) -> f32 {
    width - INDICATOR_MARGIN - INDICATOR_WIDTH
}
