//! Command interpreter boundary
//!
//! The terminal drives an interpreter through a narrow string-in/string-out
//! contract. Control events (login, logout, clear) come back as sentinel
//! strings which the session decodes once into a
//! [`Response`](crate::protocol::Response).

pub mod loader;
pub mod local;

pub use loader::InterpreterLoader;
pub use local::LocalInterpreter;

use thiserror::Error;

/// Errors reported by interpreter-side filesystem operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InterpreterError {
    #[error("{0}: No such file or directory")]
    NotFound(String),

    #[error("{0}: Not a directory")]
    NotADirectory(String),

    #[error("{0}: File exists")]
    AlreadyExists(String),

    #[error("invalid path: {0:?}")]
    InvalidPath(String),
}

/// Capability set of a command interpreter
///
/// Implementations are constructed off the UI thread, hence `Send`.
pub trait Interpreter: Send {
    /// Run one submitted line and return the raw (possibly sentinel) output
    fn execute_command(&mut self, input: &str) -> String;

    /// Prompt for the next input line
    fn prompt(&self) -> String;

    fn history_len(&self) -> usize;

    /// History entry at `index`, oldest first
    fn history_item(&self, index: usize) -> Option<String>;

    fn read_file(&self, path: &str) -> Option<String>;

    fn add_file(&mut self, path: &str, content: &str) -> Result<(), InterpreterError>;

    fn add_directory(&mut self, path: &str) -> Result<(), InterpreterError>;
}
