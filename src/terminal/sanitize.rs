//! Interpreter output cleanup
//!
//! Interpreter text is fed through a VTE parser so escape sequences (colors,
//! cursor movement, titles) never reach the display buffer. Only printable
//! characters survive; tabs become spaces and `\n` splits lines.

use vte::{Parser, Perform};

const TAB: &str = "    ";

#[derive(Default)]
struct LineCollector {
    lines: Vec<String>,
    current: String,
}

impl Perform for LineCollector {
    fn print(&mut self, c: char) {
        self.current.push(c);
    }

    fn execute(&mut self, byte: u8) {
        match byte {
            b'\n' => self.lines.push(std::mem::take(&mut self.current)),
            b'\t' => self.current.push_str(TAB),
            b'\x08' => {
                self.current.pop();
            }
            // CR, BEL and the remaining C0 controls are dropped
            _ => {}
        }
    }
}

/// Split interpreter output into clean display lines
///
/// Empty input yields no lines; otherwise the result has one more entry
/// than there are line feeds.
pub fn sanitize_output(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let mut parser = Parser::new();
    let mut collector = LineCollector::default();
    for &byte in text.as_bytes() {
        parser.advance(&mut collector, byte);
    }
    collector.lines.push(collector.current);
    collector.lines
}
