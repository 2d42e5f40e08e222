//! The log the engine reads from and appends to.

use crate::error::Result;
use crate::types::{LogLine, SynthesizedLine};

/// An externally owned, line-numbered log.
///
/// The engine only ever reads the existing lines and appends a contiguous
/// block of synthesized lines after the last one.
pub trait LogView {
    /// Snapshot of the existing lines, in display order.
    ///
    /// Views may keep the snapshot so appended lines can be placed after it.
    fn read(&mut self) -> Result<Vec<LogLine>>;

    /// Append synthesized lines after the last existing line.
    fn append(&mut self, lines: &[SynthesizedLine]) -> Result<()>;
}

/// In-memory log, numbered from 1.
#[derive(Debug, Clone, Default)]
pub struct MemoryLog {
    lines: Vec<LogLine>,
    appended: Vec<SynthesizedLine>,
}

impl MemoryLog {
    /// Create a log from existing lines.
    pub fn new(lines: Vec<LogLine>) -> Self {
        Self {
            lines,
            appended: Vec::new(),
        }
    }

    /// Create a log from text, one line per text line.
    pub fn from_text(text: &str) -> Self {
        let lines = text
            .lines()
            .enumerate()
            .map(|(i, l)| LogLine::new(i as u64 + 1, l))
            .collect();
        Self::new(lines)
    }

    /// Lines appended so far.
    pub fn appended(&self) -> &[SynthesizedLine] {
        &self.appended
    }
}

impl LogView for MemoryLog {
    fn read(&mut self) -> Result<Vec<LogLine>> {
        Ok(self.lines.clone())
    }

    fn append(&mut self, lines: &[SynthesizedLine]) -> Result<()> {
        self.appended.extend_from_slice(lines);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Tone;

    #[test]
    fn test_from_text_numbers_from_one() {
        let mut log = MemoryLog::from_text("first\nsecond\nthird");
        let lines = log.read().unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], LogLine::new(1, "first"));
        assert_eq!(lines[2], LogLine::new(3, "third"));
    }

    #[test]
    fn test_append_keeps_original_lines() {
        let mut log = MemoryLog::from_text("only");
        log.append(&[SynthesizedLine {
            index: 2,
            tone: Tone::Info,
            indent: None,
            text: "added".to_string(),
            trailing_separator: false,
        }])
        .unwrap();

        assert_eq!(log.read().unwrap(), vec![LogLine::new(1, "only")]);
        assert_eq!(log.appended().len(), 1);
        assert_eq!(log.appended()[0].text, "added");
    }
}
