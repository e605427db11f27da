//! Application state and logic for the terminal UI
//!
//! This module contains the application logic that works with any renderer
//! implementation. The window-system glue lives in [`crate::app`].

use super::Renderer;
use super::input::{self, KeyAction};
use crate::config::Config;
use crate::session::Session;
use crate::terminal::{EditorEvent, Viewport};
use std::sync::Arc;
use std::time::{Duration, Instant};
use winit::event::MouseScrollDelta;
use winit::keyboard::{Key, ModifiersState};

/// Renderer-independent application state
pub struct AppBase {
    /// Terminal session owning buffer, editor and interpreter
    pub session: Session,
    /// Current keyboard modifier state (Shift, Ctrl, Alt, etc.)
    pub modifiers: ModifiersState,
    /// Current cursor blink phase (true = visible, false = hidden)
    pub cursor_visible_phase: bool,
    /// Last time the cursor blink state was toggled
    pub last_blink_toggle: Instant,
    pub blink_interval: Duration,
    /// System clipboard for paste
    pub clipboard: Option<arboard::Clipboard>,
    /// Font metrics and padding applied to every new window size
    viewport_template: Viewport,
}

impl AppBase {
    pub fn new(session: Session, config: &Config) -> Self {
        let clipboard = match arboard::Clipboard::new() {
            Ok(clipboard) => Some(clipboard),
            Err(e) => {
                log::warn!("Clipboard unavailable: {}", e);
                None
            }
        };
        Self::with_clipboard(session, config, clipboard)
    }

    pub fn with_clipboard(
        session: Session,
        config: &Config,
        clipboard: Option<arboard::Clipboard>,
    ) -> Self {
        Self {
            session,
            modifiers: ModifiersState::empty(),
            cursor_visible_phase: true,
            last_blink_toggle: Instant::now(),
            blink_interval: Duration::from_millis(config.terminal.cursor_blink_ms),
            clipboard,
            viewport_template: config.viewport(),
        }
    }

    /// Periodic work: poll the interpreter load and advance the blink phase
    ///
    /// Returns true if anything visible changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let loaded = self.session.poll_loader();

        let blinked = if now.duration_since(self.last_blink_toggle) >= self.blink_interval {
            self.cursor_visible_phase = !self.cursor_visible_phase;
            self.last_blink_toggle = now;
            true
        } else {
            false
        };

        loaded || blinked
    }

    /// Handle a key press; returns true if a repaint is needed
    pub fn handle_key(&mut self, key: &Key, text: Option<&str>) -> bool {
        let event = match input::map_key(key, text, &self.modifiers) {
            Some(KeyAction::Edit(event)) => event,
            Some(KeyAction::Paste) => match input::read_clipboard(&mut self.clipboard) {
                Some(text) => EditorEvent::Paste(text),
                None => return false,
            },
            None => return false,
        };

        let changed = self.session.handle(event);
        // Keep the cursor solid while typing
        input::reset_cursor_blink(&mut self.cursor_visible_phase, &mut self.last_blink_toggle);
        changed
    }

    pub fn handle_wheel(&mut self, delta: &MouseScrollDelta) -> bool {
        let notches = input::wheel_notches(delta, self.viewport_template.line_height);
        if notches == 0 {
            return false;
        }
        self.session.handle(EditorEvent::Wheel(notches))
    }

    /// Recompute the viewport for a new physical surface size
    pub fn resize(&mut self, width: u32, height: u32, scale_factor: f64) {
        let viewport = Viewport::from_physical(width, height, scale_factor, &self.viewport_template);
        self.session.resize(viewport);
    }

    pub fn cursor_visible(&self) -> bool {
        self.cursor_visible_phase
    }
}

/// Generic application structure for the terminal UI
pub struct App<R: Renderer> {
    pub base: AppBase,
    pub config: Config,
    pub window: Option<Arc<winit::window::Window>>,
    pub renderer: Option<R>,
}

impl<R: Renderer> App<R> {
    pub fn new(session: Session, config: Config) -> Self {
        let base = AppBase::new(session, &config);
        Self {
            base,
            config,
            window: None,
            renderer: None,
        }
    }

    /// Render the current session frame to screen
    pub fn render(&mut self) -> anyhow::Result<()> {
        use anyhow::Context;

        let renderer = self.renderer.as_mut().context("No renderer available")?;
        let frame = self.base.session.frame();
        renderer.render(&frame, self.base.cursor_visible())
    }

    pub fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    /// Resize surface and viewport to the window's new physical size
    pub fn resize(&mut self, width: u32, height: u32, scale_factor: f64) {
        if let Some(renderer) = &mut self.renderer
            && let Err(e) = renderer.resize(width, height)
        {
            log::error!("Failed to resize renderer: {:#}", e);
        }
        self.base.resize(width, height, scale_factor);
        self.request_redraw();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::InterpreterLoader;
    use crate::interpreter::testing::ScriptedInterpreter;
    use winit::keyboard::NamedKey;

    fn base() -> AppBase {
        let config = Config::default();
        let session = Session::new(
            &config,
            InterpreterLoader::ready(Box::new(ScriptedInterpreter::new("$ "))),
        );
        AppBase::with_clipboard(session, &config, None)
    }

    #[test]
    fn test_tick_reports_load_then_blinks() {
        let mut base = base();
        let start = base.last_blink_toggle;
        assert!(base.tick(start));
        assert!(base.session.is_ready());
        assert!(base.cursor_visible());

        assert!(!base.tick(start + Duration::from_millis(100)));
        assert!(base.tick(start + Duration::from_millis(500)));
        assert!(!base.cursor_visible());
    }

    #[test]
    fn test_typing_resets_blink() {
        let mut base = base();
        base.tick(Instant::now());
        base.cursor_visible_phase = false;

        assert!(base.handle_key(&Key::Character("x".into()), Some("x")));
        assert!(base.cursor_visible());
        assert_eq!(base.session.buffer().input(), "x");
    }

    #[test]
    fn test_shortcut_uses_modifiers() {
        let mut base = base();
        base.tick(Instant::now());
        base.handle_key(&Key::Character("a".into()), Some("a"));
        base.handle_key(&Key::Character("b".into()), Some("b"));

        base.modifiers = ModifiersState::CONTROL;
        base.handle_key(&Key::Character("u".into()), None);
        assert_eq!(base.session.buffer().input(), "");
    }

    #[test]
    fn test_paste_without_clipboard_is_ignored() {
        let mut base = base();
        base.tick(Instant::now());
        base.modifiers = ModifiersState::CONTROL;
        assert!(!base.handle_key(&Key::Character("v".into()), None));
    }

    #[test]
    fn test_enter_submits() {
        let mut base = base();
        base.tick(Instant::now());
        assert!(base.handle_key(&Key::Named(NamedKey::Enter), None));
        assert_eq!(base.session.buffer().lines().last(), Some("$ "));
    }

    #[test]
    fn test_resize_uses_logical_size() {
        let mut base = base();
        base.resize(1600, 900, 2.0);
        let viewport = base.session.buffer().viewport();
        assert_eq!(viewport.width, 800.0);
        assert_eq!(viewport.height, 450.0);
        assert_eq!(viewport.scale_factor, 2.0);
    }
}
