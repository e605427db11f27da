//! Input handling for the terminal window
//!
//! Maps winit keyboard and mouse wheel events to editor events and reads
//! the system clipboard for paste.

use crate::terminal::EditorEvent;
use arboard::Clipboard;
use std::time::Instant;
use winit::event::MouseScrollDelta;
use winit::keyboard::{Key, ModifiersState, NamedKey};

/// What a key press asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Edit(EditorEvent),
    /// Ctrl/Cmd+V: read the clipboard, then insert its text
    Paste,
}

/// Translate a key press into an editor action
///
/// Ctrl and Super (Cmd) are treated alike for the editing shortcuts.
/// Unbound keys and shortcuts return `None`.
pub fn map_key(key: &Key, text: Option<&str>, modifiers: &ModifiersState) -> Option<KeyAction> {
    let edit = |event| Some(KeyAction::Edit(event));

    match key {
        Key::Named(named) => match named {
            NamedKey::Enter => edit(EditorEvent::Enter),
            NamedKey::Backspace => edit(EditorEvent::Backspace),
            NamedKey::Space => edit(EditorEvent::Char(' ')),
            NamedKey::ArrowUp => edit(EditorEvent::HistoryUp),
            NamedKey::ArrowDown => edit(EditorEvent::HistoryDown),
            NamedKey::Home => edit(EditorEvent::LineStart),
            NamedKey::End => edit(EditorEvent::LineEnd),
            NamedKey::PageUp => edit(EditorEvent::PageUp),
            NamedKey::PageDown => edit(EditorEvent::PageDown),
            _ => None,
        },
        Key::Character(s) => {
            if modifiers.control_key() || modifiers.super_key() {
                let mut chars = s.chars();
                let (Some(ch), None) = (chars.next(), chars.next()) else {
                    return None;
                };
                return match ch.to_ascii_lowercase() {
                    'l' => edit(EditorEvent::ClearScreen),
                    'a' => edit(EditorEvent::LineStart),
                    'e' => edit(EditorEvent::LineEnd),
                    'u' => edit(EditorEvent::KillToStart),
                    'k' => edit(EditorEvent::KillToEnd),
                    'w' => edit(EditorEvent::DeleteWord),
                    'c' => edit(EditorEvent::Cancel),
                    'v' => Some(KeyAction::Paste),
                    _ => None,
                };
            }

            // Prefer the text produced by winit (respects keyboard layout)
            let typed = text.unwrap_or(s.as_str());
            let mut chars = typed.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) if !ch.is_control() => edit(EditorEvent::Char(ch)),
                (Some(_), Some(_)) => edit(EditorEvent::Paste(typed.to_string())),
                _ => None,
            }
        }
        _ => None,
    }
}

/// Wheel movement in editor notches; positive scrolls towards newer lines
///
/// winit reports wheel-up as a positive delta, which moves back in the
/// scrollback. Pixel deltas (touchpads) are converted using `line_height`.
pub fn wheel_notches(delta: &MouseScrollDelta, line_height: f32) -> isize {
    let lines = match delta {
        MouseScrollDelta::LineDelta(_, y) => *y,
        MouseScrollDelta::PixelDelta(position) => {
            if line_height <= 0.0 {
                return 0;
            }
            position.y as f32 / line_height
        }
    };

    let notches = -lines.round() as isize;
    if notches == 0 && lines != 0.0 {
        // Small but deliberate movement still scrolls one line
        if lines > 0.0 { -1 } else { 1 }
    } else {
        notches
    }
}

/// Read text from the clipboard for pasting
pub fn read_clipboard(clipboard: &mut Option<Clipboard>) -> Option<String> {
    let Some(clipboard) = clipboard else {
        log::warn!("Paste requested but no clipboard is available");
        return None;
    };
    match clipboard.get_text() {
        Ok(text) => Some(text),
        Err(e) => {
            log::warn!("Failed to read clipboard: {}", e);
            None
        }
    }
}

/// Reset cursor blink state to visible
pub fn reset_cursor_blink(cursor_visible_phase: &mut bool, last_blink_toggle: &mut Instant) {
    *cursor_visible_phase = true;
    *last_blink_toggle = Instant::now();
}
