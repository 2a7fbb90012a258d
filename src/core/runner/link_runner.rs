//! End-to-end driver: credential, transport, project lookup, then the batch.

use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use crate::api::{
    EnvTokenSource, GhCliTokenSource, GitHubClient, HttpTransport, ReqwestTransport, TokenSource,
    resolve_token,
};
use crate::config::RunConfig;
use crate::core::output::{OutputFormatter, OutputWriter, ProgressEvent, SummaryReport};
use crate::core::project::locate_project;
use crate::error::{ApiError, BoardlinkError};
use crate::models::{LinkResult, LinkSummary, OutputFormat, ProjectReference};

use super::traits::RunResult;

/// Runs one linking batch and reports progress to a writer.
pub struct LinkRunner<W: Write = io::Stdout> {
    config: RunConfig,
    output: OutputWriter<W>,
}

impl LinkRunner<io::Stdout> {
    /// Creates a runner that reports to stdout.
    pub fn new(config: RunConfig, format: OutputFormat) -> Self {
        Self::with_writer(config, format, io::stdout())
    }
}

impl<W: Write> LinkRunner<W> {
    /// Creates a runner with a custom writer.
    pub fn with_writer(config: RunConfig, format: OutputFormat, writer: W) -> Self {
        Self {
            config,
            output: OutputWriter::new(writer, format),
        }
    }

    /// Runs with the standard token sources and the reqwest transport.
    pub async fn run(&mut self) -> RunResult {
        let gh = GhCliTokenSource::new();
        let env = EnvTokenSource::default();
        self.run_with(&[&gh, &env], |timeout| {
            let transport: Arc<dyn HttpTransport> = Arc::new(ReqwestTransport::new(timeout)?);
            Ok(transport)
        })
        .await
    }

    /// Runs with explicit token sources and transport constructor.
    ///
    /// `connect` is only called once a token has been found, so a missing
    /// credential never results in network traffic.
    pub async fn run_with<F>(&mut self, sources: &[&dyn TokenSource], connect: F) -> RunResult
    where
        F: FnOnce(Duration) -> Result<Arc<dyn HttpTransport>, ApiError>,
    {
        let owner = self.config.owner.value().clone();
        let title = self.config.project_title.value().clone();

        self.emit_event(ProgressEvent::Start {
            owner: owner.clone(),
            project_title: title.clone(),
        });

        let token = match resolve_token(sources) {
            Ok(token) => token,
            Err(e) => return self.fail(e.into()),
        };

        let transport = match connect(self.config.timeout) {
            Ok(transport) => transport,
            Err(e) => return self.fail(e.into()),
        };

        let client = GitHubClient::new(transport, self.config.api_url.value().as_str(), token);

        let project = match locate_project(&client, &owner, &title).await {
            Ok(project) => project,
            Err(e) => return self.fail(e.into()),
        };

        self.emit_event(ProgressEvent::ProjectFound {
            number: project.number,
            title: project.title.clone(),
            url: project.board_url(&owner),
        });

        let summary = self.run_batch(&client, &project).await;
        let report = SummaryReport::new(project, &owner, summary);

        if let Err(e) = self.output.write_summary(&report) {
            tracing::warn!(error = %e, "failed to write summary");
        }
        self.flush();

        RunResult::completed(report)
    }

    /// Resolve and link every configured issue, strictly in order.
    ///
    /// An issue that does not resolve is recorded as an error and no link
    /// request is sent for it.
    pub async fn run_batch(
        &mut self,
        client: &GitHubClient,
        project: &ProjectReference,
    ) -> LinkSummary {
        let issues = self.config.issues.value().clone();
        let total = issues.len();
        let mut summary = LinkSummary::default();

        self.emit_event(ProgressEvent::BatchStart { total });

        for (index, number) in issues.into_iter().enumerate() {
            self.emit_event(ProgressEvent::IssueStart {
                number,
                index,
                total,
            });

            let result = match client
                .resolve_issue(self.config.owner.value(), self.config.repo.value(), number)
                .await
            {
                Some(issue) => client.link_issue(&project.id, &issue.node_id).await,
                None => LinkResult::ResolutionFailed,
            };

            tracing::info!(issue = number, result = ?result, "processed issue");
            self.emit_event(ProgressEvent::IssueResult {
                number,
                result: result.clone(),
            });
            summary.record(number, result);
        }

        summary
    }

    fn fail(&mut self, err: BoardlinkError) -> RunResult {
        tracing::error!(error = %err, "run aborted");
        let message = err.to_string();
        if let Err(e) = self.output.write_error(&message, &err.remediation()) {
            tracing::warn!(error = %e, "failed to write error");
        }
        self.flush();
        RunResult::error(message)
    }

    fn emit_event(&mut self, event: ProgressEvent) {
        if let Err(e) = self.output.write_event(&event) {
            tracing::warn!(error = %e, "failed to write event");
        }
    }

    fn flush(&mut self) {
        if let Err(e) = self.output.flush() {
            tracing::warn!(error = %e, "failed to flush output");
        }
    }
}
