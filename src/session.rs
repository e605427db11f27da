//! Terminal session management
//!
//! This module provides `Session`, which combines the display buffer, the
//! line editor and the protocol adapter with an interpreter that is loaded
//! in the background. It has no UI dependencies; the window layer feeds it
//! [`EditorEvent`]s and paints [`Frame`]s.

use crate::config::Config;
use crate::interpreter::loader::LoadStatus;
use crate::interpreter::{Interpreter, InterpreterLoader};
use crate::protocol::{ProtocolAdapter, Response};
use crate::terminal::{DisplayBuffer, EditOutcome, EditorEvent, LineEditor, Viewport};

/// Fixed messages printed by the session itself
#[derive(Debug, Clone)]
pub struct SessionMessages {
    pub greeting: String,
    pub not_ready: String,
    pub load_failure: String,
    /// Prompt used while no interpreter is available
    pub fallback_prompt: String,
}

impl SessionMessages {
    pub fn from_config(config: &Config) -> Self {
        Self {
            greeting: config.terminal.greeting.clone(),
            not_ready: config.terminal.not_ready_message.clone(),
            load_failure: config.terminal.load_failure_message.clone(),
            fallback_prompt: config.terminal.fallback_prompt.clone(),
        }
    }
}

/// Filesystem requests made before the interpreter finished loading
enum PendingOp {
    File { path: String, content: String },
    Directory(String),
}

/// Scroll position summary for the scroll indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollState {
    pub offset: usize,
    pub max_offset: usize,
    pub visible_lines: usize,
    pub total_lines: usize,
}

/// Everything needed to paint one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Frame<'a> {
    pub lines: Vec<&'a str>,
    /// Row within `lines` and char column of the cursor, when the active line is visible
    pub cursor: Option<(usize, usize)>,
    /// Present when the scrollback does not fit the viewport
    pub scroll: Option<ScrollState>,
    pub viewport: Viewport,
}

/// Terminal session that orchestrates buffer, editor and interpreter
pub struct Session {
    buffer: DisplayBuffer,
    editor: LineEditor,
    adapter: ProtocolAdapter,
    loader: InterpreterLoader,
    interpreter: Option<Box<dyn Interpreter>>,
    messages: SessionMessages,
    pending_ops: Vec<PendingOp>,
    load_failed: bool,
}

impl Session {
    pub fn new(config: &Config, loader: InterpreterLoader) -> Self {
        Self {
            buffer: DisplayBuffer::new(config.viewport(), config.terminal.scrollback_lines),
            editor: LineEditor::new(config.editor_settings()),
            adapter: ProtocolAdapter::new(config.welcome.clone()),
            loader,
            interpreter: None,
            messages: SessionMessages::from_config(config),
            pending_ops: Vec::new(),
            load_failed: false,
        }
    }

    pub fn buffer(&self) -> &DisplayBuffer {
        &self.buffer
    }

    pub fn editor(&self) -> &LineEditor {
        &self.editor
    }

    pub fn is_ready(&self) -> bool {
        self.interpreter.is_some()
    }

    pub fn load_failed(&self) -> bool {
        self.load_failed
    }

    /// Check the background load without blocking
    ///
    /// Returns true if the display changed. On success the queued
    /// filesystem requests are applied and the greeting and first prompt
    /// are printed; on failure a single error line is printed.
    pub fn poll_loader(&mut self) -> bool {
        match self.loader.poll() {
            LoadStatus::Pending | LoadStatus::Finished => false,
            LoadStatus::Ready(interpreter) => {
                log::info!("Interpreter loaded");
                self.interpreter = Some(interpreter);
                for op in std::mem::take(&mut self.pending_ops) {
                    match op {
                        PendingOp::File { path, content } => self.add_file(&path, &content),
                        PendingOp::Directory(path) => self.add_directory(&path),
                    }
                }
                let greeting = self.messages.greeting.clone();
                self.buffer.append(&greeting);
                self.buffer.append("");
                self.issue_prompt();
                true
            }
            LoadStatus::Failed(e) => {
                log::error!("Failed to load interpreter: {:#}", e);
                self.load_failed = true;
                if !self.pending_ops.is_empty() {
                    log::warn!(
                        "Dropping {} filesystem requests queued for the interpreter",
                        self.pending_ops.len()
                    );
                    self.pending_ops.clear();
                }
                let message = self.messages.load_failure.clone();
                self.buffer.append(&message);
                true
            }
        }
    }

    /// Apply one input event; returns true if a repaint is needed
    pub fn handle(&mut self, event: EditorEvent) -> bool {
        let outcome = self
            .editor
            .handle(event, &mut self.buffer, self.interpreter.as_deref());

        match outcome {
            EditOutcome::Handled => true,
            EditOutcome::Ignored => false,
            EditOutcome::Submit(command) => {
                self.submit(&command);
                true
            }
            EditOutcome::ClearScreen | EditOutcome::Cancelled => {
                self.issue_prompt();
                true
            }
        }
    }

    /// Send a command line to the interpreter and print the outcome
    ///
    /// Without an interpreter only the not-ready notice is printed.
    pub fn submit(&mut self, command: &str) {
        let Some(interpreter) = self.interpreter.as_mut() else {
            log::debug!("Command submitted before interpreter was ready");
            let notice = self.messages.not_ready.clone();
            self.buffer.append(&notice);
            return;
        };

        let raw = interpreter.execute_command(command);
        let response = Response::decode(&raw);
        log::debug!("Interpreter response: {:?}", response);
        self.adapter.apply(response, &mut self.buffer, &**interpreter);
    }

    /// Start a new active line with the interpreter's prompt
    pub fn issue_prompt(&mut self) {
        let prompt = match &self.interpreter {
            Some(interpreter) => interpreter.prompt(),
            None => self.messages.fallback_prompt.clone(),
        };
        self.buffer.new_prompt(&prompt);
    }

    /// Adopt new viewport geometry; existing lines are not re-wrapped
    pub fn resize(&mut self, viewport: Viewport) {
        log::debug!(
            "Resize to {}x{} ({} lines, {} chars)",
            viewport.width,
            viewport.height,
            viewport.max_lines(),
            viewport.chars_per_line()
        );
        self.buffer.set_viewport(viewport);
    }

    /// Add a file to the interpreter's filesystem
    ///
    /// Requests made while the interpreter is loading are queued. Results
    /// are logged only; the display is never touched.
    pub fn add_file(&mut self, path: &str, content: &str) {
        match self.interpreter.as_mut() {
            Some(interpreter) => match interpreter.add_file(path, content) {
                Ok(()) => log::info!("Added file {}", path),
                Err(e) => log::error!("Failed to add file {}: {}", path, e),
            },
            None if self.load_failed => {
                log::warn!("Cannot add file {}: no interpreter", path);
            }
            None => self.pending_ops.push(PendingOp::File {
                path: path.to_string(),
                content: content.to_string(),
            }),
        }
    }

    /// Add a directory to the interpreter's filesystem
    pub fn add_directory(&mut self, path: &str) {
        match self.interpreter.as_mut() {
            Some(interpreter) => match interpreter.add_directory(path) {
                Ok(()) => log::info!("Added directory {}", path),
                Err(e) => log::error!("Failed to add directory {}: {}", path, e),
            },
            None if self.load_failed => {
                log::warn!("Cannot add directory {}: no interpreter", path);
            }
            None => self.pending_ops.push(PendingOp::Directory(path.to_string())),
        }
    }

    /// Pure projection of the current state for painting
    pub fn frame(&self) -> Frame<'_> {
        let viewport = *self.buffer.viewport();
        let visible_lines = viewport.max_lines();
        let offset = self.buffer.scroll_offset();
        let lines = self.buffer.project(visible_lines, offset);

        let cursor = if self.buffer.is_empty() {
            None
        } else {
            let active_row = self.buffer.len() - 1;
            (active_row >= offset && active_row < offset + lines.len())
                .then(|| (active_row - offset, self.buffer.cursor()))
        };

        let scroll = (self.buffer.len() > visible_lines).then(|| ScrollState {
            offset,
            max_offset: self.buffer.max_scroll(),
            visible_lines,
            total_lines: self.buffer.len(),
        });

        Frame {
            lines,
            cursor,
            scroll,
            viewport,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::testing::ScriptedInterpreter;

    fn ready_session(interpreter: ScriptedInterpreter) -> Session {
        let mut session = Session::new(
            &Config::default(),
            InterpreterLoader::ready(Box::new(interpreter)),
        );
        assert!(session.poll_loader());
        session
    }

    fn lines(session: &Session) -> Vec<&str> {
        session.buffer().lines().collect()
    }

    fn type_line(session: &mut Session, text: &str) {
        for ch in text.chars() {
            session.handle(EditorEvent::Char(ch));
        }
    }

    #[test]
    fn test_greeting_after_load() {
        let session = ready_session(ScriptedInterpreter::new("login: "));
        assert_eq!(
            lines(&session),
            vec!["Welcome to Hanna's Terminal System v1.0", "", "login: "]
        );
        assert_eq!(session.buffer().cursor(), 7);
    }

    #[test]
    fn test_submit_before_ready_prints_notice_only() {
        let mut session = Session::new(&Config::default(), InterpreterLoader::pending());
        assert!(!session.poll_loader());
        session.issue_prompt();
        type_line(&mut session, "whoami");
        let before = session.buffer().len();

        session.handle(EditorEvent::Enter);

        assert_eq!(session.buffer().len(), before + 1);
        assert_eq!(
            lines(&session),
            vec!["$ whoami", "Terminal not ready yet..."]
        );
        assert!(!session.is_ready());
    }

    #[test]
    fn test_typing_before_any_prompt() {
        let mut session = Session::new(&Config::default(), InterpreterLoader::pending());
        type_line(&mut session, "ls");
        session.handle(EditorEvent::Enter);
        assert_eq!(lines(&session), vec!["ls", "Terminal not ready yet..."]);
    }

    #[test]
    fn test_load_failure_message() {
        let mut session = Session::new(
            &Config::default(),
            InterpreterLoader::spawn(|| Err(anyhow::anyhow!("missing module"))),
        );
        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
        while !session.poll_loader() && std::time::Instant::now() < deadline {
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
        assert!(session.load_failed());
        assert_eq!(lines(&session), vec!["ERROR: Failed to load terminal module"]);

        session.handle(EditorEvent::Enter);
        assert_eq!(lines(&session).last(), Some(&"Terminal not ready yet..."));
    }

    #[test]
    fn test_root_login_scenario() {
        let mut session = ready_session(
            ScriptedInterpreter::new("root@hanna-terminal:/root # ")
                .with_response("LOGIN_SUCCESS:root"),
        );
        let before = session.buffer().len();
        session.handle(EditorEvent::Enter);

        let added: Vec<&str> = lines(&session)[before..].to_vec();
        assert_eq!(
            added,
            vec![
                "",
                "Welcome, root!",
                "",
                "Welcome, System Administrator!",
                "You have full system access.",
                "",
                "root@hanna-terminal:/root # ",
            ]
        );
        assert_eq!(
            session.buffer().cursor(),
            "root@hanna-terminal:/root # ".chars().count()
        );
    }

    #[test]
    fn test_clear_scenario() {
        let mut session = ready_session(ScriptedInterpreter::new("$ ").with_response("CLEAR"));
        type_line(&mut session, "clear");
        session.handle(EditorEvent::Enter);
        assert_eq!(lines(&session), vec!["$ "]);
        assert_eq!(session.buffer().scroll_offset(), 0);
    }

    #[test]
    fn test_ctrl_l_issues_one_prompt() {
        let mut session = ready_session(ScriptedInterpreter::new("$ "));
        type_line(&mut session, "partial");
        session.handle(EditorEvent::ClearScreen);
        assert_eq!(lines(&session), vec!["$ "]);
    }

    #[test]
    fn test_ctrl_w_scenario() {
        let mut session = ready_session(ScriptedInterpreter::new("$ "));
        type_line(&mut session, "hello world ");
        session.handle(EditorEvent::DeleteWord);
        assert_eq!(session.buffer().active_line(), "$ hello ");
    }

    #[test]
    fn test_text_output_then_prompt() {
        let mut session = ready_session(ScriptedInterpreter::new("$ ").with_response("a\nb"));
        type_line(&mut session, "ls");
        session.handle(EditorEvent::Enter);
        assert_eq!(lines(&session)[2..], ["$ ls", "a", "b", "$ "]);
    }

    #[test]
    fn test_cancel_prints_marker_and_prompt() {
        let mut session = ready_session(ScriptedInterpreter::new("$ "));
        type_line(&mut session, "oops");
        assert!(session.handle(EditorEvent::Cancel));
        assert_eq!(lines(&session)[2..], ["$ oops^C", "", "$ "]);

        // Nothing to cancel on an empty line
        assert!(!session.handle(EditorEvent::Cancel));
    }

    #[test]
    fn test_history_is_read_from_interpreter() {
        let mut session =
            ready_session(ScriptedInterpreter::new("$ ").with_history(&["ls", "pwd"]));
        session.handle(EditorEvent::HistoryUp);
        assert_eq!(session.buffer().input(), "pwd");
        session.handle(EditorEvent::HistoryUp);
        session.handle(EditorEvent::HistoryUp);
        assert_eq!(session.buffer().input(), "ls");
        session.handle(EditorEvent::HistoryDown);
        session.handle(EditorEvent::HistoryDown);
        assert_eq!(session.buffer().input(), "");
    }

    #[test]
    fn test_file_ops_queued_until_ready() {
        let mut session = Session::new(&Config::default(), InterpreterLoader::pending());
        session.add_file("/tmp/a.txt", "queued");
        session.add_directory("/tmp/dir");
        assert_eq!(session.pending_ops.len(), 2);
        assert!(session.buffer().is_empty());

        session.loader = InterpreterLoader::ready(Box::new(ScriptedInterpreter::new("$ ")));
        session.poll_loader();
        assert!(session.pending_ops.is_empty());
        let interpreter = session.interpreter.as_ref().unwrap();
        assert_eq!(interpreter.read_file("/tmp/a.txt").as_deref(), Some("queued"));
    }

    #[test]
    fn test_frame_projection() {
        let mut session = ready_session(ScriptedInterpreter::new("$ "));
        type_line(&mut session, "ab");
        let frame = session.frame();
        assert_eq!(frame.lines.len(), 3);
        assert_eq!(frame.cursor, Some((2, 4)));
        assert!(frame.scroll.is_none());
    }

    #[test]
    fn test_frame_hides_cursor_when_scrolled_away() {
        let mut session = ready_session(ScriptedInterpreter::new("$ "));
        for i in 0..40 {
            session.buffer.append(&format!("line {}", i));
        }
        session.issue_prompt();
        session.handle(EditorEvent::PageUp);

        let frame = session.frame();
        let scroll = frame.scroll.unwrap();
        assert_eq!(scroll.total_lines, session.buffer().len());
        assert_eq!(scroll.offset, scroll.max_offset - 5);
        assert!(frame.cursor.is_none());
    }

    #[test]
    fn test_resize_clamps_scroll() {
        let mut session = ready_session(ScriptedInterpreter::new("$ "));
        for i in 0..40 {
            session.buffer.append(&format!("line {}", i));
        }
        let tall = Viewport {
            height: 2000.0,
            ..*session.buffer().viewport()
        };
        session.resize(tall);
        assert_eq!(session.buffer().scroll_offset(), 0);
        assert!(session.frame().scroll.is_none());
    }
}
