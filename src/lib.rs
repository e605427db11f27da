//! Siteterm - canvas terminal emulator for a simulated shell
//!
//! This library provides:
//! - A scrollback display buffer with word wrap and an editable active line
//! - A line editor with history, shortcuts and paste handling
//! - A string-in/string-out interpreter boundary with sentinel decoding
//! - A built-in interpreter with login, a virtual filesystem and media playback
//!
//! The terminal logic has no window-system dependencies; the `ui-cpu`
//! feature adds the winit/softbuffer front end used by the `siteterm` binary.
//!
//! ## Quick Start
//!
//! ```no_run
//! use siteterm::{Config, Interpreter, InterpreterLoader, LocalInterpreter, Session};
//! use siteterm::terminal::EditorEvent;
//!
//! let config = Config::default();
//! let interpreter = LocalInterpreter::from_config(&config.interpreter, &config.media)?;
//! let mut session = Session::new(
//!     &config,
//!     InterpreterLoader::ready(Box::new(interpreter) as Box<dyn Interpreter>),
//! );
//!
//! session.poll_loader();
//! for ch in "guest".chars() {
//!     session.handle(EditorEvent::Char(ch));
//! }
//! session.handle(EditorEvent::Enter);
//!
//! for line in session.frame().lines {
//!     println!("{}", line);
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod config;
pub mod interpreter;
pub mod media;
pub mod protocol;
pub mod renderer;
pub mod session;
pub mod terminal;

#[cfg(feature = "ui-cpu")]
pub mod app;

pub use config::{Config, ConfigError};
pub use interpreter::{Interpreter, InterpreterError, InterpreterLoader, LocalInterpreter};
pub use media::{MediaError, MediaPlayer};
pub use protocol::{ProtocolAdapter, Response};
pub use session::{Frame, ScrollState, Session};
pub use terminal::{DisplayBuffer, EditorEvent, LineEditor, Viewport};
