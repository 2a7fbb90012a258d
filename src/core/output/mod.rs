//! Output system for a linking run.
//!
//! This module provides structured progress events and formatters for the
//! text, JSON, and NDJSON output modes.

mod events;
mod format;

pub use events::{ProgressEvent, SummaryReport};
pub use format::{OutputFormatter, OutputWriter};
