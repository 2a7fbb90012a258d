//! Core linking workflow.
//!
//! - [`project`]: locating the board by title
//! - [`link`]: classifying add-item responses
//! - [`runner`]: the end-to-end driver
//! - [`output`]: text, JSON, and NDJSON reporting

pub mod link;
pub mod output;
pub mod project;
pub mod runner;

/// Process exit codes.
///
/// Per-issue failures never change the exit code; only fatal errors do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// The batch ran to completion.
    Success = 0,

    /// A fatal error stopped the run (credential, HTTP client, lookup, config).
    Failure = 1,
}

impl ExitCode {
    /// Returns the numeric exit code value.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Returns a human-readable description of the exit code.
    pub fn description(self) -> &'static str {
        match self {
            ExitCode::Success => "Batch completed",
            ExitCode::Failure => "Run aborted by a fatal error",
        }
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code.code())
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}
