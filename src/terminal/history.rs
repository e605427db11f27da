//! History cursor for browsing previously submitted commands

/// Position while browsing the interpreter's command history
///
/// The history itself lives in the interpreter and is queried live; this
/// only tracks which entry is selected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryCursor {
    index: Option<usize>,
}

/// Result of moving the history cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryMove {
    /// Show the entry at this index
    Select(usize),
    /// Left browsing mode; the input should be emptied
    Exit,
    /// Nothing to do (empty history)
    Stay,
}

impl HistoryCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently selected index, `None` when not browsing
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn is_browsing(&self) -> bool {
        self.index.is_some()
    }

    pub fn reset(&mut self) {
        self.index = None;
    }

    /// Step towards older entries
    ///
    /// Starts at the newest entry and stops at index 0.
    pub fn older(&mut self, history_len: usize) -> HistoryMove {
        let next = match self.index {
            None if history_len == 0 => return HistoryMove::Stay,
            None => history_len - 1,
            Some(index) => index.saturating_sub(1).min(history_len.saturating_sub(1)),
        };
        self.index = Some(next);
        HistoryMove::Select(next)
    }

    /// Step towards newer entries, leaving browsing mode past the newest
    pub fn newer(&mut self, history_len: usize) -> HistoryMove {
        match self.index {
            Some(index) if index + 1 < history_len => {
                self.index = Some(index + 1);
                HistoryMove::Select(index + 1)
            }
            _ => {
                self.index = None;
                HistoryMove::Exit
            }
        }
    }
}
