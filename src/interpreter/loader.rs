//! Asynchronous interpreter construction
//!
//! The interpreter is built on a background thread and handed back through a
//! channel. The session polls the channel once per tick without blocking, so
//! input keeps working while the load is pending.

use super::Interpreter;
use anyhow::Result;
use std::sync::mpsc::{Receiver, Sender, TryRecvError, channel};
use std::thread;

/// Outcome of polling the loader
pub enum LoadStatus {
    /// Still loading
    Pending,
    /// Load finished; the interpreter is handed over exactly once
    Ready(Box<dyn Interpreter>),
    /// Load failed; reported exactly once
    Failed(anyhow::Error),
    /// Result was already taken by an earlier poll
    Finished,
}

type LoadResult = Result<Box<dyn Interpreter>>;

pub struct InterpreterLoader {
    receiver: Option<Receiver<LoadResult>>,
    /// Sender held by loaders that never resolve, so the channel stays open
    _idle_sender: Option<Sender<LoadResult>>,
}

impl InterpreterLoader {
    /// Start building an interpreter on a background thread
    pub fn spawn<F>(factory: F) -> Self
    where
        F: FnOnce() -> Result<Box<dyn Interpreter>> + Send + 'static,
    {
        let (tx, rx) = channel();

        thread::spawn(move || {
            log::debug!("Building interpreter...");
            let result = factory();
            if tx.send(result).is_err() {
                // Session was dropped before the load finished
                log::debug!("Interpreter load finished after session shutdown");
            }
        });

        Self {
            receiver: Some(rx),
            _idle_sender: None,
        }
    }

    /// Loader that resolves on the first poll
    pub fn ready(interpreter: Box<dyn Interpreter>) -> Self {
        let (tx, rx) = channel();
        // The receiver is alive, so this cannot fail
        let _ = tx.send(Ok(interpreter));
        Self {
            receiver: Some(rx),
            _idle_sender: None,
        }
    }

    /// Loader that never resolves (tests, or a session without interpreter)
    pub fn pending() -> Self {
        let (tx, rx) = channel();
        Self {
            receiver: Some(rx),
            _idle_sender: Some(tx),
        }
    }

    /// Check for a finished load without blocking
    pub fn poll(&mut self) -> LoadStatus {
        let Some(receiver) = &self.receiver else {
            return LoadStatus::Finished;
        };

        match receiver.try_recv() {
            Ok(Ok(interpreter)) => {
                self.receiver = None;
                LoadStatus::Ready(interpreter)
            }
            Ok(Err(e)) => {
                self.receiver = None;
                LoadStatus::Failed(e)
            }
            Err(TryRecvError::Empty) => LoadStatus::Pending,
            Err(TryRecvError::Disconnected) => {
                self.receiver = None;
                LoadStatus::Failed(anyhow::anyhow!(
                    "interpreter loader exited without a result"
                ))
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.receiver.is_none()
    }
}
