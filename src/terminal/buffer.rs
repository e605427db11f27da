//! Display buffer: bounded scrollback with a viewport window
//!
//! Lines are plain strings. Only the last line (the active line) is ever
//! mutated; everything before it is frozen once appended. The active line
//! carries a prompt boundary, the char offset of its non-editable prefix, and
//! the cursor, which never moves before that boundary.

use super::viewport::Viewport;
use std::collections::VecDeque;

/// Default scrollback capacity in lines
pub const DEFAULT_SCROLLBACK: usize = 10000;

/// Word-wrap `text` into segments of at most `budget` characters
///
/// Splits on single spaces and never breaks inside a word, so a word longer
/// than the budget gets a segment of its own. Joining the result with single
/// spaces reproduces `text` exactly. Empty input yields one empty segment.
pub fn wrap(text: &str, budget: usize) -> Vec<String> {
    let budget = budget.max(1);
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;
    let mut started = false;

    for word in text.split(' ') {
        let word_len = word.chars().count();
        if !started {
            current.push_str(word);
            current_len = word_len;
            started = true;
        } else if current_len + 1 + word_len > budget {
            segments.push(std::mem::take(&mut current));
            current.push_str(word);
            current_len = word_len;
        } else {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
        }
    }

    segments.push(current);
    segments
}

/// Byte offset of the `char_idx`-th character (or the end of the string)
pub(crate) fn byte_offset(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map_or(s.len(), |(offset, _)| offset)
}

pub struct DisplayBuffer {
    lines: VecDeque<String>,
    /// Maximum number of retained lines, `None` for unbounded
    capacity: Option<usize>,
    /// Char offset where user input starts on the active line
    prompt_len: usize,
    /// Char offset of the cursor on the active line
    cursor: usize,
    scroll_offset: usize,
    viewport: Viewport,
}

impl DisplayBuffer {
    /// Create an empty buffer; a `capacity` of 0 means unbounded scrollback
    pub fn new(viewport: Viewport, capacity: usize) -> Self {
        Self {
            lines: VecDeque::new(),
            capacity: (capacity > 0).then_some(capacity),
            prompt_len: 0,
            cursor: 0,
            scroll_offset: 0,
            viewport,
        }
    }

    /// Append output text, word-wrapped to the current viewport width
    ///
    /// The last appended segment becomes the active line with its whole
    /// content treated as non-editable.
    pub fn append(&mut self, text: &str) {
        for segment in wrap(text, self.viewport.chars_per_line()) {
            self.push_line(segment);
        }
        self.anchor_to_end();
        self.scroll_to_bottom();
    }

    /// Start a new active line holding `prompt`
    pub fn new_prompt(&mut self, prompt: &str) {
        self.push_line(prompt.to_string());
        self.anchor_to_end();
        self.scroll_to_bottom();
    }

    /// Drop all lines and reset the scroll position
    pub fn clear(&mut self) {
        self.lines.clear();
        self.prompt_len = 0;
        self.cursor = 0;
        self.scroll_offset = 0;
    }

    /// Pure projection of the lines visible at `scroll_offset`
    pub fn project(&self, viewport_lines: usize, scroll_offset: usize) -> Vec<&str> {
        let start = scroll_offset.min(self.lines.len());
        let end = (start + viewport_lines).min(self.lines.len());
        self.lines.range(start..end).map(String::as_str).collect()
    }

    /// Lines visible with the current geometry and scroll offset
    pub fn visible(&self) -> Vec<&str> {
        self.project(self.viewport.max_lines(), self.scroll_offset)
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Replace the viewport geometry
    ///
    /// Existing lines are not re-wrapped; only future appends use the new
    /// width. The scroll offset is clamped to the new valid range.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.clamp_scroll();
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn max_scroll(&self) -> usize {
        self.lines.len().saturating_sub(self.viewport.max_lines())
    }

    /// Move the viewport by `delta` lines (negative scrolls towards older lines)
    pub fn scroll_by(&mut self, delta: isize) {
        let target = self.scroll_offset as isize + delta;
        self.scroll_offset = target.clamp(0, self.max_scroll() as isize) as usize;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = self.max_scroll();
    }

    fn clamp_scroll(&mut self) {
        self.scroll_offset = self.scroll_offset.min(self.max_scroll());
    }

    // Active line editing

    /// Full text of the active line (empty if the buffer is empty)
    pub fn active_line(&self) -> &str {
        self.lines.back().map_or("", String::as_str)
    }

    pub fn prompt_len(&self) -> usize {
        self.prompt_len
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// User input on the active line (everything after the prompt boundary)
    pub fn input(&self) -> &str {
        let line = self.active_line();
        &line[byte_offset(line, self.prompt_len)..]
    }

    /// User input split at the cursor: (before cursor, after cursor)
    pub fn input_parts(&self) -> (&str, &str) {
        let line = self.active_line();
        let start = byte_offset(line, self.prompt_len);
        let split = byte_offset(line, self.cursor);
        (&line[start..split], &line[split..])
    }

    /// Insert text at the cursor and advance past it
    pub fn insert_str(&mut self, text: &str) {
        let cursor = self.cursor;
        let line = self.active_line_mut();
        let offset = byte_offset(line, cursor);
        line.insert_str(offset, text);
        self.cursor += text.chars().count();
    }

    /// Delete the character before the cursor; false when at the prompt boundary
    pub fn backspace(&mut self) -> bool {
        if self.cursor <= self.prompt_len {
            return false;
        }
        let cursor = self.cursor;
        let line = self.active_line_mut();
        let offset = byte_offset(line, cursor - 1);
        line.remove(offset);
        self.cursor -= 1;
        true
    }

    /// Move the cursor, clamped to `[prompt boundary, line length]`
    pub fn set_cursor(&mut self, position: usize) {
        let len = self.active_line().chars().count();
        self.cursor = position.clamp(self.prompt_len, len.max(self.prompt_len));
    }

    pub fn cursor_to_start(&mut self) {
        self.cursor = self.prompt_len;
    }

    pub fn cursor_to_end(&mut self) {
        self.cursor = self.active_line().chars().count();
    }

    /// Replace the user input, keeping the prompt; cursor moves to the end
    pub fn replace_input(&mut self, input: &str) {
        self.set_input_parts(input, "");
    }

    /// Rebuild the user input as `before + after` with the cursor between them
    pub fn set_input_parts(&mut self, before: &str, after: &str) {
        let prompt_len = self.prompt_len;
        let line = self.active_line_mut();
        line.truncate(byte_offset(line, prompt_len));
        line.push_str(before);
        line.push_str(after);
        self.cursor = prompt_len + before.chars().count();
    }

    /// Append a marker to the end of the active line (e.g. `^C`)
    pub fn append_marker(&mut self, marker: &str) {
        self.active_line_mut().push_str(marker);
        self.cursor_to_end();
    }

    fn active_line_mut(&mut self) -> &mut String {
        if self.lines.is_empty() {
            self.push_line(String::new());
            self.prompt_len = 0;
            self.cursor = 0;
        }
        let last = self.lines.len() - 1;
        &mut self.lines[last]
    }

    fn push_line(&mut self, line: String) {
        self.lines.push_back(line);
        if let Some(capacity) = self.capacity {
            while self.lines.len() > capacity {
                self.lines.pop_front();
            }
        }
    }

    fn anchor_to_end(&mut self) {
        let len = self.active_line().chars().count();
        self.prompt_len = len;
        self.cursor = len;
    }
}
