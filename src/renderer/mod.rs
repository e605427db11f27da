//! Renderer implementations for the siteterm window
//!
//! Renderers paint a [`Frame`] (a pure projection of the session) onto the
//! window surface. All renderers implement the `Renderer` trait so the
//! application logic stays backend-agnostic.

pub mod app;
pub mod input;

#[cfg(feature = "ui-cpu")]
pub mod cpu;

pub use app::{App, AppBase};

#[cfg(feature = "ui-cpu")]
pub use cpu::CpuRenderer;

use crate::config::ColorConfig;
use crate::session::{Frame, ScrollState};
use crate::terminal::Color;

/// Abstraction over rendering backends
pub trait Renderer {
    /// Resize the rendering surface to the given physical size
    fn resize(&mut self, width: u32, height: u32) -> anyhow::Result<()>;

    /// Paint one frame
    ///
    /// `cursor_visible` carries the blink phase; the frame itself decides
    /// whether the cursor is on screen at all.
    fn render(&mut self, frame: &Frame<'_>, cursor_visible: bool) -> anyhow::Result<()>;
}

/// Resolved colors used for painting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub foreground: Color,
    pub cursor: Color,
    /// Scroll indicator, already blended over the background
    pub scroll_indicator: Color,
}

impl Palette {
    pub fn from_config(colors: &ColorConfig) -> Self {
        let background = Color::from_hex(colors.background);
        Self {
            background,
            foreground: Color::from_hex(colors.foreground),
            cursor: Color::from_hex(colors.cursor),
            scroll_indicator: Color::from_hex(colors.scroll_indicator)
                .blend_over(background, colors.scroll_indicator_alpha),
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::from_config(&ColorConfig::default())
    }
}

/// Position and length of the scroll indicator thumb, in logical pixels
///
/// The thumb spans the fraction of the track occupied by the visible lines
/// and sits at the fraction given by the scroll offset.
pub fn scroll_thumb(scroll: &ScrollState, track_top: f32, track_height: f32) -> (f32, f32) {
    if scroll.total_lines == 0 || track_height <= 0.0 {
        return (track_top, 0.0);
    }
    let total = scroll.total_lines as f32;
    let height = (track_height * scroll.visible_lines as f32 / total).max(4.0).min(track_height);
    let travel = track_height - height;
    let top = if scroll.max_offset == 0 {
        track_top
    } else {
        track_top + travel * scroll.offset as f32 / scroll.max_offset as f32
    };
    (top, height)
}
