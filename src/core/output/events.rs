//! Progress events for a linking run.
//!
//! Events are serializable for JSON/NDJSON output and renderable as the
//! glyph-prefixed console lines of text output.

use serde::Serialize;

use crate::models::{IssueOutcome, LinkResult, LinkSummary, ProjectReference};

/// Progress events emitted while a run is underway.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProgressEvent {
    /// Project lookup is starting.
    Start {
        owner: String,
        project_title: String,
    },

    /// The project board was located.
    ProjectFound {
        number: u64,
        title: String,
        url: String,
    },

    /// Issue processing is starting.
    BatchStart {
        /// Number of issues that will be processed.
        total: usize,
    },

    /// One issue is about to be resolved and linked.
    IssueStart {
        number: u64,
        /// Position in the batch (0-based).
        index: usize,
        total: usize,
    },

    /// One issue finished.
    IssueResult {
        number: u64,
        #[serde(flatten)]
        result: LinkResult,
    },

    /// The run stopped on a fatal error.
    Error {
        message: String,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        hints: Vec<String>,
    },
}

/// Everything needed to report a finished batch.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SummaryReport {
    pub project: ProjectReference,
    pub board_url: String,
    pub added: usize,
    pub already_present: usize,
    pub errors: usize,
    pub processed: usize,
    pub outcomes: Vec<IssueOutcome>,
}

impl SummaryReport {
    pub fn new(project: ProjectReference, owner: &str, summary: LinkSummary) -> Self {
        Self {
            board_url: project.board_url(owner),
            project,
            added: summary.added,
            already_present: summary.already_present,
            errors: summary.errors,
            processed: summary.processed(),
            outcomes: summary.outcomes,
        }
    }
}
