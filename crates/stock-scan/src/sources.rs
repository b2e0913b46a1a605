//! Concrete scanner sources.

use std::collections::VecDeque;
use std::io::BufRead;

use crate::error::{Result, ScanError};
use crate::scanner::{ScanEvent, Scanner};

/// Keyboard-wedge scanner: each non-blank line of input is one decode.
///
/// Handheld USB scanners type the code followed by Enter, so reading stdin
/// line by line is enough to drive the inventory from a terminal. Surrounding
/// whitespace (including `\r\n`) is stripped; blank lines are skipped.
pub struct LineScanner<R> {
    reader: Option<R>,
    buf: String,
}

impl<R: BufRead> LineScanner<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: Some(reader),
            buf: String::new(),
        }
    }
}

impl<R: BufRead> Scanner for LineScanner<R> {
    fn next_scan(&mut self) -> Result<Option<ScanEvent>> {
        let reader = self.reader.as_mut().ok_or(ScanError::Closed)?;
        loop {
            self.buf.clear();
            if reader.read_line(&mut self.buf)? == 0 {
                return Ok(None);
            }
            let value = self.buf.trim();
            if !value.is_empty() {
                return Ok(Some(ScanEvent::now(value)));
            }
        }
    }

    fn close(&mut self) {
        self.reader = None;
    }

    fn is_closed(&self) -> bool {
        self.reader.is_none()
    }
}

/// Replays a fixed list of decoded values.
#[derive(Debug, Clone)]
pub struct ScriptedScanner {
    pending: VecDeque<String>,
    closed: bool,
}

impl ScriptedScanner {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pending: values.into_iter().map(Into::into).collect(),
            closed: false,
        }
    }

    /// Values not yet delivered.
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl Scanner for ScriptedScanner {
    fn next_scan(&mut self) -> Result<Option<ScanEvent>> {
        if self.closed {
            return Err(ScanError::Closed);
        }
        Ok(self.pending.pop_front().map(ScanEvent::now))
    }

    fn close(&mut self) {
        self.closed = true;
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn values<S: Scanner>(scanner: &mut S) -> Vec<String> {
        let mut out = Vec::new();
        while let Some(event) = scanner.next_scan().unwrap() {
            out.push(event.value);
        }
        out
    }

    #[test]
    fn line_scanner_yields_trimmed_non_blank_lines() {
        let input = Cursor::new("8690000000001\r\n\n   \n  ABC-12 \n");
        let mut scanner = LineScanner::new(input);
        assert_eq!(values(&mut scanner), ["8690000000001", "ABC-12"]);
    }

    #[test]
    fn line_scanner_handles_missing_trailing_newline() {
        let mut scanner = LineScanner::new(Cursor::new("123"));
        assert_eq!(values(&mut scanner), ["123"]);
        assert!(scanner.next_scan().unwrap().is_none());
    }

    #[test]
    fn closed_line_scanner_rejects_reads() {
        let mut scanner = LineScanner::new(Cursor::new("1\n2\n"));
        scanner.close();
        scanner.close();
        assert!(scanner.is_closed());
        assert!(matches!(scanner.next_scan(), Err(ScanError::Closed)));
    }

    #[test]
    fn scripted_scanner_replays_in_order() {
        let mut scanner = ScriptedScanner::new(["a", "b"]);
        assert_eq!(scanner.remaining(), 2);
        assert_eq!(values(&mut scanner), ["a", "b"]);
        assert_eq!(scanner.remaining(), 0);
    }
}
