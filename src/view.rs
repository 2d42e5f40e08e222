//! File-backed job logs.

use plankit::markup::{split_line_number, text_content};
use plankit::render::markup_line;
use plankit::{Error, LogLine, LogView, ReadinessProbe, SynthesizedLine, Tone};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::cli::OutputFormat;
use crate::ui;

/// One line of the log file as read.
#[derive(Debug, Clone)]
struct RawLine {
    raw: String,
    line: LogLine,
}

/// A job log stored in a file, one display line per text line.
///
/// A GitLab line-number anchor provides the display index and is removed
/// from the content; lines without one are numbered by position.
pub struct FileLog {
    path: PathBuf,
    snapshot: Vec<RawLine>,
    appended: Vec<SynthesizedLine>,
}

impl FileLog {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            snapshot: Vec::new(),
            appended: Vec::new(),
        }
    }

    fn parse(text: &str) -> Vec<RawLine> {
        text.lines()
            .enumerate()
            .map(|(i, raw)| {
                let line = match split_line_number(raw) {
                    Some((index, rest)) => LogLine::new(index, rest),
                    None => LogLine::new(i as u64 + 1, raw),
                };
                RawLine {
                    raw: raw.to_string(),
                    line,
                }
            })
            .collect()
    }

    /// Whether the last snapshot holds rendered markup.
    pub fn is_markup(&self) -> bool {
        self.snapshot.iter().any(|e| e.raw.contains("<span"))
    }

    /// Write the last snapshot followed by the appended lines.
    ///
    /// `markup_input` tells whether the original lines are rendered markup.
    pub fn write_to(
        &self,
        out: &mut dyn Write,
        format: OutputFormat,
        markup_input: bool,
    ) -> io::Result<()> {
        for entry in &self.snapshot {
            let rendered = match (format, markup_input) {
                (OutputFormat::Markup, true) => entry.raw.clone(),
                (OutputFormat::Markup, false) => markup_line(&SynthesizedLine {
                    index: entry.line.index,
                    tone: Tone::Plain,
                    indent: None,
                    text: entry.line.content.clone(),
                    trailing_separator: false,
                }),
                (OutputFormat::Text, true) => {
                    ui::log_line(entry.line.index, &text_content(&entry.line.content))
                }
                (OutputFormat::Text, false) => ui::log_line(entry.line.index, &entry.line.content),
            };
            writeln!(out, "{rendered}")?;
        }

        for line in &self.appended {
            let rendered = match format {
                OutputFormat::Markup => markup_line(line),
                OutputFormat::Text => ui::plan_line(line),
            };
            writeln!(out, "{rendered}")?;
        }

        out.flush()
    }
}

impl LogView for FileLog {
    fn read(&mut self) -> plankit::Result<Vec<LogLine>> {
        let text = fs::read_to_string(&self.path).map_err(|e| Error::View {
            message: format!("could not read {}: {e}", self.path.display()),
        })?;
        self.snapshot = Self::parse(&text);
        Ok(self.snapshot.iter().map(|e| e.line.clone()).collect())
    }

    fn append(&mut self, lines: &[SynthesizedLine]) -> plankit::Result<()> {
        self.appended.extend_from_slice(lines);
        Ok(())
    }
}

// ============================================================================
// Readiness
// ============================================================================

/// Ready once the log file exists, is non-empty and, if configured,
/// contains the ready marker.
pub struct FileReady {
    path: PathBuf,
    marker: Option<String>,
}

impl FileReady {
    pub fn new(path: &Path, marker: Option<String>) -> Self {
        Self {
            path: path.to_path_buf(),
            marker,
        }
    }
}

impl ReadinessProbe for FileReady {
    fn is_ready(&self) -> bool {
        let Ok(text) = fs::read_to_string(&self.path) else {
            return false;
        };
        !text.is_empty()
            && self
                .marker
                .as_deref()
                .is_none_or(|marker| text.contains(marker))
    }
}

// ============================================================================
// Tests
// ============================================================================
