//! Terminal core
//!
//! This module contains the UI-independent parts of the terminal:
//! - Display buffer with bounded scrollback and word wrapping
//! - Line editor that turns key events into buffer edits
//! - History cursor over the interpreter's command history
//! - Viewport geometry and colors
//! - Output sanitising via the VTE parser

pub mod buffer;
pub mod color;
pub mod editor;
pub mod history;
pub mod sanitize;
pub mod viewport;

pub use buffer::{DEFAULT_SCROLLBACK, DisplayBuffer, wrap};
pub use color::Color;
pub use editor::{EditOutcome, EditorEvent, EditorSettings, LineEditor};
pub use history::{HistoryCursor, HistoryMove};
pub use sanitize::sanitize_output;
pub use viewport::Viewport;
