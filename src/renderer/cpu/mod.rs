//! CPU-based renderer using Raqote and Softbuffer
//!
//! This module provides a software rendering backend that works on all
//! platforms without requiring GPU drivers.

mod drawing;

use super::{Palette, Renderer, scroll_thumb};
use crate::session::Frame;
use anyhow::{Context as _, Result};
use font_kit::family_name::FamilyName;
use font_kit::font::Font;
use font_kit::properties::Properties;
use font_kit::source::SystemSource;
use raqote::{DrawOptions, DrawTarget, Point, SolidSource, Transform};
use softbuffer::Surface;
use std::num::NonZeroU32;
use std::sync::Arc;
use winit::window::Window;

/// Load the first available font of `families`, falling back to any monospace font
pub fn load_font(families: &[String]) -> Result<Font> {
    let mut names: Vec<FamilyName> = families
        .iter()
        .map(|family| FamilyName::Title(family.clone()))
        .collect();
    names.push(FamilyName::Monospace);

    let handle = SystemSource::new()
        .select_best_match(&names, &Properties::new())
        .context("No usable font found")?;
    let font = handle.load().context("Failed to load font")?;
    log::info!("Using font {}", font.full_name());
    Ok(font)
}

/// CPU renderer using Raqote for 2D graphics and Softbuffer for display
pub struct CpuRenderer {
    surface: Surface<Arc<Window>, Arc<Window>>,
    font: Font,
    palette: Palette,
    width: u32,
    height: u32,
}

impl CpuRenderer {
    pub fn new(
        surface: Surface<Arc<Window>, Arc<Window>>,
        font: Font,
        palette: Palette,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        let mut renderer = Self {
            surface,
            font,
            palette,
            width,
            height,
        };
        renderer.resize(width, height)?;
        Ok(renderer)
    }

    fn paint(&self, dt: &mut DrawTarget, frame: &Frame<'_>, cursor_visible: bool) {
        let viewport = &frame.viewport;
        let fallback_advance = viewport.char_width();

        dt.set_transform(&Transform::scale(viewport.scale_factor, viewport.scale_factor));

        let text = drawing::solid(self.palette.foreground);
        for (row, line) in frame.lines.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            dt.draw_text(
                &self.font,
                viewport.font_size,
                line,
                Point::new(viewport.padding, drawing::baseline(viewport, row)),
                &text,
                &DrawOptions::new(),
            );
        }

        if cursor_visible
            && let Some((row, column)) = frame.cursor
            && let Some(line) = frame.lines.get(row)
        {
            let before: String = line.chars().take(column).collect();
            let x = viewport.padding
                + drawing::text_width(&self.font, viewport.font_size, &before, fallback_advance);
            let top = drawing::baseline(viewport, row) - viewport.font_size;
            drawing::draw_bar_cursor(dt, x, top, viewport.font_size + 2.0, self.palette.cursor);
        }

        if let Some(scroll) = &frame.scroll {
            let track_top = viewport.padding;
            let track_height = viewport.height - viewport.padding * 2.0;
            let (top, height) = scroll_thumb(scroll, track_top, track_height);
            drawing::fill_rect(
                dt,
                drawing::indicator_x(viewport.width),
                top,
                drawing::INDICATOR_WIDTH,
                height,
                self.palette.scroll_indicator,
            );
        }
    }
}

impl Renderer for CpuRenderer {
    fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        let w = NonZeroU32::new(width).context("Window width is zero")?;
        let h = NonZeroU32::new(height).context("Window height is zero")?;
        self.surface
            .resize(w, h)
            .map_err(|e| anyhow::anyhow!("Failed to resize surface: {:?}", e))?;
        self.width = width;
        self.height = height;
        Ok(())
    }

    fn render(&mut self, frame: &Frame<'_>, cursor_visible: bool) -> Result<()> {
        let mut dt = DrawTarget::new(self.width as i32, self.height as i32);
        let bg = self.palette.background;
        dt.clear(SolidSource::from_unpremultiplied_argb(0xff, bg.r, bg.g, bg.b));

        self.paint(&mut dt, frame, cursor_visible);

        let mut buffer = self
            .surface
            .buffer_mut()
            .map_err(|e| anyhow::anyhow!("Failed to get buffer: {:?}", e))?;

        for (pixel, value) in buffer.iter_mut().zip(dt.get_data()) {
            *pixel = *value;
        }

        buffer
            .present()
            .map_err(|e| anyhow::anyhow!("Failed to present buffer: {:?}", e))?;
        Ok(())
    }
}
