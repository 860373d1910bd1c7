//! Line-oriented progress output.
//!
//! Pipeline banners, rendered queries and result rows are written as
//! plain lines. Warnings and errors get a marker prefix.

use std::io::{self, Write};

/// Log level of an output line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A single output line.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    /// Nesting depth, two spaces per level
    pub indent: u8,
}

impl LogEntry {
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Info, message: message.into(), indent: 0 }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Success, message: message.into(), indent: 0 }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Warning, message: message.into(), indent: 0 }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Error, message: message.into(), indent: 0 }
    }

    pub fn with_indent(mut self, indent: u8) -> Self {
        self.indent = indent;
        self
    }

    /// The line as written, without the trailing newline.
    pub fn render(&self) -> String {
        let prefix = match self.level {
            LogLevel::Info | LogLevel::Success => "",
            LogLevel::Warning => "⚠️  ",
            LogLevel::Error => "❌ ",
        };
        format!("{}{}{}", "  ".repeat(self.indent as usize), prefix, self.message)
    }
}

/// Writes log entries to a sink (stdout by default).
pub struct Reporter<W: Write = io::Stdout> {
    out: W,
}

impl Reporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn log(&mut self, entry: LogEntry) -> io::Result<()> {
        writeln!(self.out, "{}", entry.render())?;
        self.out.flush()
    }

    pub fn info(&mut self, msg: impl Into<String>) -> io::Result<()> {
        self.log(LogEntry::info(msg))
    }

    pub fn success(&mut self, msg: impl Into<String>) -> io::Result<()> {
        self.log(LogEntry::success(msg))
    }

    pub fn warning(&mut self, msg: impl Into<String>) -> io::Result<()> {
        self.log(LogEntry::warning(msg))
    }

    pub fn info_indent(&mut self, msg: impl Into<String>, indent: u8) -> io::Result<()> {
        self.log(LogEntry::info(msg).with_indent(indent))
    }

    /// Empty separator line.
    pub fn blank(&mut self) -> io::Result<()> {
        writeln!(self.out)
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_levels() {
        assert_eq!(LogEntry::info("hello").render(), "hello");
        assert_eq!(LogEntry::success("done").render(), "done");
        assert_eq!(LogEntry::warning("careful").render(), "⚠️  careful");
        assert_eq!(LogEntry::error("boom").render(), "❌ boom");
    }

    #[test]
    fn test_indent() {
        assert_eq!(LogEntry::info("row").with_indent(1).render(), "  row");
        assert_eq!(LogEntry::info("row").with_indent(2).render(), "    row");
    }

    #[test]
    fn test_reporter_writes_lines() {
        let mut reporter = Reporter::new(Vec::new());
        reporter.info("first").unwrap();
        reporter.blank().unwrap();
        reporter.info_indent("second", 1).unwrap();

        let out = String::from_utf8(reporter.into_inner()).unwrap();
        assert_eq!(out, "first\n\n  second\n");
    }
}
