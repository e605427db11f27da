//! Line editor: the input controller for the active line
//!
//! Translates editor events into edits of the last line of the display
//! buffer. Anything that needs the interpreter or a fresh prompt (submission,
//! clear screen, cancellation) is reported back to the caller as an
//! [`EditOutcome`] instead of being handled here.

use super::buffer::DisplayBuffer;
use super::history::{HistoryCursor, HistoryMove};
use crate::interpreter::Interpreter;

/// Input events understood by the line editor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    /// Printable character
    Char(char),
    Backspace,
    Enter,
    HistoryUp,
    HistoryDown,
    /// Ctrl/Cmd+L
    ClearScreen,
    /// Ctrl/Cmd+A
    LineStart,
    /// Ctrl/Cmd+E
    LineEnd,
    /// Ctrl/Cmd+U
    KillToStart,
    /// Ctrl/Cmd+K
    KillToEnd,
    /// Ctrl/Cmd+W
    DeleteWord,
    /// Ctrl/Cmd+C
    Cancel,
    Paste(String),
    /// Mouse wheel notches; positive scrolls towards newer lines
    Wheel(isize),
    PageUp,
    PageDown,
}

/// What the caller has to do after an event was applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// State changed (or may have); nothing else to do
    Handled,
    /// Event had no effect
    Ignored,
    /// A command line was submitted
    Submit(String),
    /// The scrollback was cleared and needs a new prompt
    ClearScreen,
    /// The current input was cancelled and needs a new prompt
    Cancelled,
}

/// Scroll and marker settings for the line editor
#[derive(Debug, Clone)]
pub struct EditorSettings {
    /// Lines scrolled per wheel notch
    pub wheel_step: usize,
    /// Lines scrolled per PageUp/PageDown
    pub page_step: usize,
    /// Marker appended to a cancelled line
    pub cancel_marker: String,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            wheel_step: 1,
            page_step: 5,
            cancel_marker: "^C".to_string(),
        }
    }
}

pub struct LineEditor {
    history: HistoryCursor,
    settings: EditorSettings,
}

impl LineEditor {
    pub fn new(settings: EditorSettings) -> Self {
        Self {
            history: HistoryCursor::new(),
            settings,
        }
    }

    pub fn history(&self) -> &HistoryCursor {
        &self.history
    }

    /// Apply one event to the active line of `buffer`
    ///
    /// `interpreter` is only consulted for history navigation; with no
    /// interpreter loaded the arrow keys do nothing.
    pub fn handle(
        &mut self,
        event: EditorEvent,
        buffer: &mut DisplayBuffer,
        interpreter: Option<&dyn Interpreter>,
    ) -> EditOutcome {
        match event {
            EditorEvent::Char(ch) => {
                if ch.is_control() {
                    return EditOutcome::Ignored;
                }
                let mut encoded = [0u8; 4];
                buffer.insert_str(ch.encode_utf8(&mut encoded));
                EditOutcome::Handled
            }
            EditorEvent::Backspace => {
                if buffer.backspace() {
                    EditOutcome::Handled
                } else {
                    EditOutcome::Ignored
                }
            }
            EditorEvent::Enter => {
                let command = buffer.input().to_string();
                self.history.reset();
                EditOutcome::Submit(command)
            }
            EditorEvent::HistoryUp => match interpreter {
                Some(interpreter) => {
                    let len = interpreter.history_len();
                    match self.history.older(len) {
                        HistoryMove::Select(index) => show_history_item(buffer, interpreter, index),
                        _ => EditOutcome::Ignored,
                    }
                }
                None => EditOutcome::Ignored,
            },
            EditorEvent::HistoryDown => match interpreter {
                Some(interpreter) => {
                    let len = interpreter.history_len();
                    match self.history.newer(len) {
                        HistoryMove::Select(index) => show_history_item(buffer, interpreter, index),
                        HistoryMove::Exit => {
                            buffer.replace_input("");
                            EditOutcome::Handled
                        }
                        HistoryMove::Stay => EditOutcome::Ignored,
                    }
                }
                None => EditOutcome::Ignored,
            },
            EditorEvent::ClearScreen => {
                buffer.clear();
                EditOutcome::ClearScreen
            }
            EditorEvent::LineStart => {
                buffer.cursor_to_start();
                EditOutcome::Handled
            }
            EditorEvent::LineEnd => {
                buffer.cursor_to_end();
                EditOutcome::Handled
            }
            EditorEvent::KillToStart => {
                let after = buffer.input_parts().1.to_string();
                buffer.set_input_parts("", &after);
                EditOutcome::Handled
            }
            EditorEvent::KillToEnd => {
                let before = buffer.input_parts().0.to_string();
                buffer.set_input_parts(&before, "");
                EditOutcome::Handled
            }
            EditorEvent::DeleteWord => {
                let (before, after) = buffer.input_parts();
                let kept = delete_word_before(before).to_string();
                let after = after.to_string();
                buffer.set_input_parts(&kept, &after);
                EditOutcome::Handled
            }
            EditorEvent::Cancel => {
                if buffer.input().is_empty() {
                    return EditOutcome::Ignored;
                }
                buffer.append_marker(&self.settings.cancel_marker);
                buffer.append("");
                self.history.reset();
                EditOutcome::Cancelled
            }
            EditorEvent::Paste(text) => {
                let sanitized: String = text.chars().filter(|c| *c != '\r' && *c != '\n').collect();
                if sanitized.is_empty() {
                    return EditOutcome::Ignored;
                }
                buffer.insert_str(&sanitized);
                EditOutcome::Handled
            }
            EditorEvent::Wheel(notches) => {
                self.scroll(buffer, notches * self.settings.wheel_step as isize)
            }
            EditorEvent::PageUp => self.scroll(buffer, -(self.settings.page_step as isize)),
            EditorEvent::PageDown => self.scroll(buffer, self.settings.page_step as isize),
        }
    }

    fn scroll(&self, buffer: &mut DisplayBuffer, delta: isize) -> EditOutcome {
        let before = buffer.scroll_offset();
        buffer.scroll_by(delta);
        if buffer.scroll_offset() == before {
            EditOutcome::Ignored
        } else {
            EditOutcome::Handled
        }
    }
}

fn show_history_item(
    buffer: &mut DisplayBuffer,
    interpreter: &dyn Interpreter,
    index: usize,
) -> EditOutcome {
    match interpreter.history_item(index) {
        Some(item) => {
            buffer.replace_input(&item);
            EditOutcome::Handled
        }
        None => EditOutcome::Ignored,
    }
}

/// Input left before the cursor after deleting the previous word
///
/// Trailing spaces are collapsed first, then everything after the last
/// remaining space goes.
fn delete_word_before(before: &str) -> &str {
    let trimmed = before.trim_end_matches(' ');
    match trimmed.rfind(' ') {
        Some(index) => &trimmed[..=index],
        None => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::testing::ScriptedInterpreter;
    use crate::terminal::viewport::Viewport;
    use crate::terminal::buffer::DEFAULT_SCROLLBACK;

    fn setup(prompt: &str) -> (LineEditor, DisplayBuffer) {
        let mut buffer = DisplayBuffer::new(Viewport::default(), DEFAULT_SCROLLBACK);
        buffer.new_prompt(prompt);
        (LineEditor::new(EditorSettings::default()), buffer)
    }

    fn type_text(editor: &mut LineEditor, buffer: &mut DisplayBuffer, text: &str) {
        for ch in text.chars() {
            editor.handle(EditorEvent::Char(ch), buffer, None);
        }
    }

    #[test]
    fn test_insertions_advance_cursor() {
        let (mut editor, mut buffer) = setup("$ ");
        let text = "echo hi there";
        for (n, ch) in text.chars().enumerate() {
            editor.handle(EditorEvent::Char(ch), &mut buffer, None);
            assert_eq!(buffer.cursor(), 2 + n + 1);
        }
        assert_eq!(buffer.input(), text);
    }

    #[test]
    fn test_backspace_is_left_inverse_of_insert() {
        let (mut editor, mut buffer) = setup("user@host:/ $ ");
        type_text(&mut editor, &mut buffer, "abcdef");
        for position in buffer.prompt_len()..=buffer.active_line().chars().count() {
            buffer.set_cursor(position);
            let line = buffer.active_line().to_string();
            let cursor = buffer.cursor();

            editor.handle(EditorEvent::Char('Z'), &mut buffer, None);
            editor.handle(EditorEvent::Backspace, &mut buffer, None);

            assert_eq!(buffer.active_line(), line);
            assert_eq!(buffer.cursor(), cursor);
        }
    }

    #[test]
    fn test_backspace_at_prompt_is_ignored() {
        let (mut editor, mut buffer) = setup("$ ");
        let outcome = editor.handle(EditorEvent::Backspace, &mut buffer, None);
        assert_eq!(outcome, EditOutcome::Ignored);
        assert_eq!(buffer.active_line(), "$ ");
    }

    #[test]
    fn test_control_char_is_ignored() {
        let (mut editor, mut buffer) = setup("$ ");
        let outcome = editor.handle(EditorEvent::Char('\u{7}'), &mut buffer, None);
        assert_eq!(outcome, EditOutcome::Ignored);
        assert_eq!(buffer.input(), "");
    }

    #[test]
    fn test_enter_submits_input_after_prompt() {
        let (mut editor, mut buffer) = setup("$ ");
        type_text(&mut editor, &mut buffer, "ls -la");
        let outcome = editor.handle(EditorEvent::Enter, &mut buffer, None);
        assert_eq!(outcome, EditOutcome::Submit("ls -la".to_string()));
    }

    #[test]
    fn test_line_start_and_end() {
        let (mut editor, mut buffer) = setup("$ ");
        type_text(&mut editor, &mut buffer, "abc");
        editor.handle(EditorEvent::LineStart, &mut buffer, None);
        assert_eq!(buffer.cursor(), 2);
        editor.handle(EditorEvent::LineEnd, &mut buffer, None);
        assert_eq!(buffer.cursor(), 5);
    }

    #[test]
    fn test_kill_to_start_keeps_prompt_and_tail() {
        let (mut editor, mut buffer) = setup("$ ");
        type_text(&mut editor, &mut buffer, "hello world");
        buffer.set_cursor(7);
        editor.handle(EditorEvent::KillToStart, &mut buffer, None);
        assert_eq!(buffer.active_line(), "$  world");
        assert_eq!(buffer.cursor(), 2);
    }

    #[test]
    fn test_kill_to_end() {
        let (mut editor, mut buffer) = setup("$ ");
        type_text(&mut editor, &mut buffer, "hello world");
        buffer.set_cursor(7);
        editor.handle(EditorEvent::KillToEnd, &mut buffer, None);
        assert_eq!(buffer.active_line(), "$ hello");
        assert_eq!(buffer.cursor(), 7);
    }

    #[test]
    fn test_delete_word_collapses_trailing_space() {
        let (mut editor, mut buffer) = setup("$ ");
        type_text(&mut editor, &mut buffer, "hello world ");
        editor.handle(EditorEvent::DeleteWord, &mut buffer, None);
        assert_eq!(buffer.active_line(), "$ hello ");
        assert_eq!(buffer.cursor(), 8);
    }

    #[test]
    fn test_delete_word_single_word_clears_input() {
        let (mut editor, mut buffer) = setup("$ ");
        type_text(&mut editor, &mut buffer, "hello");
        editor.handle(EditorEvent::DeleteWord, &mut buffer, None);
        assert_eq!(buffer.active_line(), "$ ");
    }

    #[test]
    fn test_delete_word_keeps_text_after_cursor() {
        let (mut editor, mut buffer) = setup("$ ");
        type_text(&mut editor, &mut buffer, "cat some file");
        buffer.set_cursor(10);
        editor.handle(EditorEvent::DeleteWord, &mut buffer, None);
        assert_eq!(buffer.active_line(), "$ cat  file");
        assert_eq!(buffer.cursor(), 6);
    }

    #[test]
    fn test_cancel_with_input() {
        let (mut editor, mut buffer) = setup("$ ");
        type_text(&mut editor, &mut buffer, "oops");
        let outcome = editor.handle(EditorEvent::Cancel, &mut buffer, None);
        assert_eq!(outcome, EditOutcome::Cancelled);
        let lines: Vec<&str> = buffer.lines().collect();
        assert_eq!(lines, vec!["$ oops^C", ""]);
    }

    #[test]
    fn test_cancel_stops_history_browsing() {
        let interpreter = ScriptedInterpreter::new("$ ").with_history(&["ls", "pwd"]);
        let (mut editor, mut buffer) = setup("$ ");
        editor.handle(EditorEvent::HistoryUp, &mut buffer, Some(&interpreter));
        assert!(editor.history().is_browsing());
        assert_eq!(buffer.input(), "pwd");

        let outcome = editor.handle(EditorEvent::Cancel, &mut buffer, Some(&interpreter));
        assert_eq!(outcome, EditOutcome::Cancelled);
        assert!(!editor.history().is_browsing());
    }

    #[test]
    fn test_delete_word_splits_on_spaces_only() {
        let (mut editor, mut buffer) = setup("$ ");
        editor.handle(EditorEvent::Paste("ab \t".to_string()), &mut buffer, None);
        editor.handle(EditorEvent::DeleteWord, &mut buffer, None);
        assert_eq!(buffer.active_line(), "$ ab ");

        editor.handle(EditorEvent::KillToStart, &mut buffer, None);
        editor.handle(EditorEvent::Paste("a\tb  ".to_string()), &mut buffer, None);
        editor.handle(EditorEvent::DeleteWord, &mut buffer, None);
        assert_eq!(buffer.active_line(), "$ ");
    }

    #[test]
    fn test_cancel_without_input_is_noop() {
        let (mut editor, mut buffer) = setup("$ ");
        let outcome = editor.handle(EditorEvent::Cancel, &mut buffer, None);
        assert_eq!(outcome, EditOutcome::Ignored);
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn test_paste_strips_newlines_and_inserts_at_cursor() {
        let (mut editor, mut buffer) = setup("$ ");
        type_text(&mut editor, &mut buffer, "echo ");
        editor.handle(
            EditorEvent::Paste("multi\r\nline\ntext".to_string()),
            &mut buffer,
            None,
        );
        assert_eq!(buffer.input(), "echo multilinetext");
        assert_eq!(buffer.cursor(), 2 + 18);
    }

    #[test]
    fn test_clear_screen_empties_buffer() {
        let (mut editor, mut buffer) = setup("$ ");
        buffer.append("old output");
        let outcome = editor.handle(EditorEvent::ClearScreen, &mut buffer, None);
        assert_eq!(outcome, EditOutcome::ClearScreen);
        assert!(buffer.is_empty());
        assert_eq!(buffer.scroll_offset(), 0);
    }

    #[test]
    fn test_history_without_interpreter_is_ignored() {
        let (mut editor, mut buffer) = setup("$ ");
        let outcome = editor.handle(EditorEvent::HistoryUp, &mut buffer, None);
        assert_eq!(outcome, EditOutcome::Ignored);
    }

    #[test]
    fn test_history_navigation() {
        let interpreter = ScriptedInterpreter::new("$ ").with_history(&["ls", "pwd", "whoami"]);
        let (mut editor, mut buffer) = setup("$ ");

        editor.handle(EditorEvent::HistoryUp, &mut buffer, Some(&interpreter));
        assert_eq!(buffer.input(), "whoami");
        assert_eq!(buffer.cursor(), 8);

        editor.handle(EditorEvent::HistoryUp, &mut buffer, Some(&interpreter));
        editor.handle(EditorEvent::HistoryUp, &mut buffer, Some(&interpreter));
        assert_eq!(buffer.input(), "ls");

        editor.handle(EditorEvent::HistoryDown, &mut buffer, Some(&interpreter));
        assert_eq!(buffer.input(), "pwd");
    }

    #[test]
    fn test_history_up_is_idempotent_at_oldest() {
        let interpreter = ScriptedInterpreter::new("$ ").with_history(&["first", "second"]);
        let (mut editor, mut buffer) = setup("$ ");
        for _ in 0..2 {
            editor.handle(EditorEvent::HistoryUp, &mut buffer, Some(&interpreter));
        }
        let line = buffer.active_line().to_string();
        for _ in 0..5 {
            editor.handle(EditorEvent::HistoryUp, &mut buffer, Some(&interpreter));
            assert_eq!(buffer.active_line(), line);
        }
    }

    #[test]
    fn test_history_down_past_newest_empties_input() {
        let interpreter = ScriptedInterpreter::new("$ ").with_history(&["first", "second"]);
        let (mut editor, mut buffer) = setup("$ ");
        editor.handle(EditorEvent::HistoryUp, &mut buffer, Some(&interpreter));
        assert_eq!(buffer.input(), "second");
        editor.handle(EditorEvent::HistoryDown, &mut buffer, Some(&interpreter));
        assert_eq!(buffer.input(), "");
        assert_eq!(buffer.cursor(), 2);
        assert!(!editor.history().is_browsing());
    }

    #[test]
    fn test_enter_resets_history_cursor() {
        let interpreter = ScriptedInterpreter::new("$ ").with_history(&["first"]);
        let (mut editor, mut buffer) = setup("$ ");
        editor.handle(EditorEvent::HistoryUp, &mut buffer, Some(&interpreter));
        assert!(editor.history().is_browsing());
        editor.handle(EditorEvent::Enter, &mut buffer, Some(&interpreter));
        assert!(!editor.history().is_browsing());
    }

    #[test]
    fn test_scrolling_does_not_touch_active_line() {
        let (mut editor, mut buffer) = setup("$ ");
        for i in 0..40 {
            buffer.append(&format!("line {i}"));
        }
        buffer.new_prompt("$ ");
        type_text(&mut editor, &mut buffer, "abc");
        let bottom = buffer.scroll_offset();

        editor.handle(EditorEvent::PageUp, &mut buffer, None);
        assert_eq!(buffer.scroll_offset(), bottom - 5);
        editor.handle(EditorEvent::Wheel(-1), &mut buffer, None);
        assert_eq!(buffer.scroll_offset(), bottom - 6);
        editor.handle(EditorEvent::PageDown, &mut buffer, None);
        editor.handle(EditorEvent::PageDown, &mut buffer, None);
        assert_eq!(buffer.scroll_offset(), bottom);

        assert_eq!(buffer.input(), "abc");
        assert_eq!(buffer.cursor(), 5);
    }
}
