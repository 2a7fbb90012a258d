//! Common types for the link runner.

use crate::core::ExitCode;
use crate::core::output::SummaryReport;

/// Result of a linking run.
#[derive(Debug)]
pub struct RunResult {
    /// Exit code for the process.
    pub exit_code: ExitCode,
    /// The fatal error message, when the run was aborted.
    pub message: Option<String>,
    /// The batch summary, when the run got that far.
    pub summary: Option<SummaryReport>,
}

impl RunResult {
    /// Creates a successful result carrying the batch summary.
    pub fn completed(summary: SummaryReport) -> Self {
        Self {
            exit_code: ExitCode::Success,
            message: None,
            summary: Some(summary),
        }
    }

    /// Creates an aborted result.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            exit_code: ExitCode::Failure,
            message: Some(message.into()),
            summary: None,
        }
    }

    /// Returns true if the batch ran to completion.
    pub fn is_success(&self) -> bool {
        matches!(self.exit_code, ExitCode::Success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LinkResult, LinkSummary, ProjectReference, ProjectScope};

    /// # Run Result Constructors
    ///
    /// Verifies RunResult constructor methods.
    ///
    /// ## Test Scenario
    /// - Creates completed and aborted results
    ///
    /// ## Expected Outcome
    /// - Exit codes and optional fields are set correctly
    #[test]
    fn test_run_result_constructors() {
        let mut summary = LinkSummary::default();
        summary.record(45, LinkResult::ResolutionFailed);
        let report = SummaryReport::new(
            ProjectReference {
                id: "PVT_1".to_string(),
                number: 1,
                title: "Board".to_string(),
                scope: ProjectScope::Organization,
            },
            "acme",
            summary,
        );

        let done = RunResult::completed(report);
        assert!(done.is_success());
        assert!(done.message.is_none());
        assert_eq!(done.summary.as_ref().map(|s| s.errors), Some(1));

        let failed = RunResult::error("No GitHub token found");
        assert!(!failed.is_success());
        assert_eq!(failed.exit_code, ExitCode::Failure);
        assert!(failed.summary.is_none());
    }
}
