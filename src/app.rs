//! Window-system glue for the CPU renderer
//!
//! Creates the window and softbuffer surface, then forwards winit events to
//! the renderer-independent [`AppBase`](crate::renderer::AppBase).

use crate::renderer::cpu::load_font;
use crate::renderer::{App, CpuRenderer, Palette};
use anyhow::{Context as _, Result};
use softbuffer::{Context, Surface};
use std::sync::Arc;
use std::time::{Duration, Instant};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::window::{Window, WindowId};

/// Frame interval of the event loop (~60fps)
const TICK: Duration = Duration::from_millis(16);

impl App<CpuRenderer> {
    fn init_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window_attrs = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(LogicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .context("Failed to create window")?,
        );
        log::info!("Window created");

        let context = Context::new(window.clone())
            .map_err(|e| anyhow::anyhow!("Failed to create context: {}", e))?;
        let surface = Surface::new(&context, window.clone())
            .map_err(|e| anyhow::anyhow!("Failed to create surface: {}", e))?;

        let font = load_font(&self.config.font.families)?;
        let palette = Palette::from_config(&self.config.colors);

        let size = window.inner_size();
        let renderer = CpuRenderer::new(surface, font, palette, size.width, size.height)?;

        self.base
            .resize(size.width, size.height, window.scale_factor());
        self.renderer = Some(renderer);
        self.window = Some(window);
        Ok(())
    }
}

impl ApplicationHandler for App<CpuRenderer> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(e) = self.init_window(event_loop) {
            log::error!("{:#}", e);
            event_loop.exit();
            return;
        }
        self.request_redraw();
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        // Loader results and blink phase are checked every tick
        if self.base.tick(Instant::now()) {
            self.request_redraw();
        }

        event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now() + TICK));
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested");
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.render() {
                    log::error!("Render error: {:#}", e);
                }
            }
            WindowEvent::ModifiersChanged(new_modifiers) => {
                self.base.modifiers = new_modifiers.state();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed
                    && self
                        .base
                        .handle_key(&event.logical_key, event.text.as_deref())
                {
                    self.request_redraw();
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                if self.base.handle_wheel(&delta) {
                    self.request_redraw();
                }
            }
            WindowEvent::Resized(size) => {
                let scale_factor = match &self.window {
                    Some(window) => window.scale_factor(),
                    None => 1.0,
                };
                self.resize(size.width, size.height, scale_factor);
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                if let Some(window) = &self.window {
                    let size = window.inner_size();
                    self.resize(size.width, size.height, scale_factor);
                }
            }
            _ => {}
        }
    }
}
