//! Output formatters for different output modes.
//!
//! Text mode prints the glyph-prefixed console lines as events arrive. JSON
//! mode buffers events and prints one document at the end. NDJSON mode prints
//! each event as its own line, with the summary as the final line.

use super::events::{ProgressEvent, SummaryReport};
use crate::models::{LinkResult, OutputFormat};
use std::io::{self, Write};

/// Trait for formatting and writing output events.
pub trait OutputFormatter {
    /// Writes a progress event to the output.
    fn write_event(&mut self, event: &ProgressEvent) -> io::Result<()>;

    /// Writes the final summary of a completed batch.
    fn write_summary(&mut self, summary: &SummaryReport) -> io::Result<()>;

    /// Writes a fatal error with its remediation hints.
    fn write_error(&mut self, message: &str, hints: &[String]) -> io::Result<()>;

    /// Flushes any buffered output.
    fn flush(&mut self) -> io::Result<()>;
}

/// Writer that formats output according to the specified format.
pub struct OutputWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    events: Vec<ProgressEvent>,
}

impl<W: Write> OutputWriter<W> {
    /// Creates a new OutputWriter with the specified format.
    pub fn new(writer: W, format: OutputFormat) -> Self {
        Self {
            writer,
            format,
            events: Vec::new(),
        }
    }

    /// Returns the output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    fn writeln(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.writer, "{}", text)
    }

    fn write_json_line<T: serde::Serialize>(&mut self, value: &T) -> io::Result<()> {
        let json = serde_json::to_string(value).map_err(io::Error::other)?;
        self.writeln(&json)
    }

    /// Text shown after "Processing issue #n... ".
    fn result_text(number: u64, result: &LinkResult) -> String {
        match result {
            LinkResult::Linked => "✅".to_string(),
            LinkResult::AlreadyLinked => "ℹ️  (already in project)".to_string(),
            LinkResult::ResolutionFailed => format!("❌ Could not find issue #{}", number),
            LinkResult::RequestFailed(reason) => format!("❌ {}", reason),
        }
    }

    fn write_text_event(&mut self, event: &ProgressEvent) -> io::Result<()> {
        match event {
            ProgressEvent::Start { project_title, .. } => {
                self.writeln(&format!("🔍 Finding project: {}...", project_title))?;
            }
            ProgressEvent::ProjectFound { number, title, .. } => {
                self.writeln(&format!("✅ Found project #{}: {}", number, title))?;
            }
            ProgressEvent::BatchStart { total } => {
                self.writeln(&format!("📋 Adding {} issues to project...", total))?;
                self.writeln("")?;
            }
            ProgressEvent::IssueStart { number, .. } => {
                write!(self.writer, "  Processing issue #{}... ", number)?;
                self.writer.flush()?;
            }
            ProgressEvent::IssueResult { number, result } => {
                let text = Self::result_text(*number, result);
                self.writeln(&text)?;
            }
            ProgressEvent::Error { message, hints } => {
                self.writeln("")?;
                self.writeln(&format!("❌ {}", message))?;
                if let Some((first, rest)) = hints.split_first() {
                    self.writeln("")?;
                    self.writeln(&format!("💡 {}", first))?;
                    for hint in rest {
                        self.writeln(&format!("   {}", hint))?;
                    }
                }
            }
        }
        Ok(())
    }
}

impl<W: Write> OutputFormatter for OutputWriter<W> {
    fn write_event(&mut self, event: &ProgressEvent) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => self.write_text_event(event)?,
            OutputFormat::Json => self.events.push(event.clone()),
            OutputFormat::Ndjson => self.write_json_line(event)?,
        }
        Ok(())
    }

    fn write_summary(&mut self, summary: &SummaryReport) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => {
                self.writeln("")?;
                self.writeln("✅ Summary:")?;
                self.writeln(&format!("   Added: {}", summary.added))?;
                self.writeln(&format!("   Already in project: {}", summary.already_present))?;
                self.writeln(&format!("   Errors: {}", summary.errors))?;
                self.writeln("")?;
                self.writeln(&format!("📊 View project: {}", summary.board_url))?;
            }
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "summary": summary,
                    "events": self.events
                });
                let json = serde_json::to_string_pretty(&output).map_err(io::Error::other)?;
                self.writeln(&json)?;
            }
            OutputFormat::Ndjson => {
                let line = serde_json::json!({ "event": "summary", "summary": summary });
                self.write_json_line(&line)?;
            }
        }
        Ok(())
    }

    fn write_error(&mut self, message: &str, hints: &[String]) -> io::Result<()> {
        let event = ProgressEvent::Error {
            message: message.to_string(),
            hints: hints.to_vec(),
        };

        match self.format {
            OutputFormat::Text | OutputFormat::Ndjson => self.write_event(&event),
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "error": event,
                    "events": self.events
                });
                let json = serde_json::to_string_pretty(&output).map_err(io::Error::other)?;
                self.writeln(&json)
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
