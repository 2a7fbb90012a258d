use crate::config::{Config, RunConfig, Sourced, parse_issue_list};
use crate::error::ConfigError;
use clap::Parser;
use serde::Serialize;

/// Output format for progress and summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON summary at the end.
    Json,
    /// Newline-delimited JSON (one event per line).
    Ndjson,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Ndjson => write!(f, "ndjson"),
        }
    }
}

#[derive(Parser, Clone, Debug, Default)]
#[command(
    author,
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BOARDLINK_BUILD_REV"), ")"),
    about = "Link a batch of GitHub issues to a Projects board",
    long_about = "Resolve a list of GitHub issues and add each one to a Projects (v2) board.\n\n\
        The board is looked up by exact title among the owner's organization and user\n\
        projects. Issues that are already on the board are reported, not treated as errors,\n\
        so repeated runs are safe.\n\n\
        Authentication uses 'gh auth token' and falls back to the GITHUB_TOKEN environment\n\
        variable. The token needs the read:project and write:project scopes.\n\n\
        Configuration can be provided via CLI arguments, environment variables (BOARDLINK_*),\n\
        config file (~/.config/boardlink/config.toml), or detected from a git remote.",
    after_help = "EXAMPLES:\n    \
        # Link the configured issues to the configured board\n    \
        boardlink\n\n    \
        # Link issues 45 through 56 and 60 to a board owned by acme\n    \
        boardlink --owner acme --repo widgets --project \"Sprint Board\" --issues 45-56,60\n\n    \
        # Take owner and repo from a local clone, print a JSON summary\n    \
        boardlink --repo-path . --issues 12,14 --output json"
)]
pub struct Args {
    /// Repository owner (user or organization login) [default: liorkl]
    #[arg(short, long, help_heading = "Target")]
    pub owner: Option<String>,

    /// Repository name [default: co-co]
    #[arg(short, long, help_heading = "Target")]
    pub repo: Option<String>,

    /// Exact title of the project board [default: Co-Co Backlog]
    #[arg(short, long = "project", help_heading = "Target")]
    pub project_title: Option<String>,

    /// Issues to link, e.g. "45-56,60" [default: 45-56]
    #[arg(short, long, help_heading = "Target")]
    pub issues: Option<String>,

    /// Local clone whose origin remote supplies owner and repo
    #[arg(long, help_heading = "Target")]
    pub repo_path: Option<String>,

    /// GraphQL endpoint [default: https://api.github.com/graphql]
    #[arg(long, help_heading = "Connection")]
    pub api_url: Option<String>,

    /// Per-request timeout in seconds [default: 10]
    #[arg(long, help_heading = "Connection")]
    pub timeout_secs: Option<u64>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, help_heading = "Output Options")]
    pub output: OutputFormat,

    /// Log level (trace, debug, info, warn, error); logging is off unless set
    #[arg(long, help_heading = "Logging")]
    pub log_level: Option<String>,

    /// Write logs to this file instead of stderr
    #[arg(long, help_heading = "Logging")]
    pub log_file: Option<String>,

    /// Log format (text or json)
    #[arg(long, help_heading = "Logging")]
    pub log_format: Option<String>,

    /// Write a sample configuration file and exit
    #[arg(long)]
    pub create_config: bool,
}

impl Args {
    /// The layer contributed by command-line flags.
    pub fn cli_config(&self) -> Result<Config, ConfigError> {
        let issues = self
            .issues
            .as_deref()
            .map(parse_issue_list)
            .transpose()?
            .map(Sourced::cli);

        Ok(Config {
            owner: self.owner.clone().map(Sourced::cli),
            repo: self.repo.clone().map(Sourced::cli),
            project_title: self.project_title.clone().map(Sourced::cli),
            issues,
            api_url: self.api_url.clone().map(Sourced::cli),
            timeout_secs: self.timeout_secs.map(Sourced::cli),
        })
    }

    /// Resolve configuration from CLI args, environment variables, git
    /// remote, config file and defaults.
    pub fn resolve_config(&self) -> Result<RunConfig, ConfigError> {
        let file_config = Config::load_from_file()?;

        let git_config = match &self.repo_path {
            Some(path) => Config::detect_from_git_remote(path),
            None => Config::default(),
        };

        let env_config = Config::load_from_env()?;
        let cli_config = self.cli_config()?;

        // defaults < file < git remote < env < cli
        Config::defaults()
            .merge(file_config)
            .merge(git_config)
            .merge(env_config)
            .merge(cli_config)
            .resolve()
    }
}

/// Which collection a project board was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectScope {
    Organization,
    User,
}

impl ProjectScope {
    fn url_segment(self) -> &'static str {
        match self {
            ProjectScope::Organization => "orgs",
            ProjectScope::User => "users",
        }
    }
}

/// A project board matched by title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectReference {
    /// Opaque node id.
    pub id: String,
    /// Sequence number shown in the board URL.
    pub number: u64,
    pub title: String,
    pub scope: ProjectScope,
}

impl ProjectReference {
    /// Browser URL of the board.
    pub fn board_url(&self, owner: &str) -> String {
        format!(
            "https://github.com/{}/{}/projects/{}",
            self.scope.url_segment(),
            owner,
            self.number
        )
    }
}

/// An issue number paired with its opaque node id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueReference {
    pub number: u64,
    pub node_id: String,
}

/// Outcome of trying to put one issue on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum LinkResult {
    /// The issue was added.
    Linked,
    /// The issue was already on the board.
    AlreadyLinked,
    /// The issue number did not resolve to a node id.
    ResolutionFailed,
    /// The mutation failed; the reason is tagged (`error: ...`, `http_error: ...`).
    RequestFailed(String),
}

impl LinkResult {
    pub fn is_error(&self) -> bool {
        matches!(self, LinkResult::ResolutionFailed | LinkResult::RequestFailed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueOutcome {
    pub number: u64,
    #[serde(flatten)]
    pub result: LinkResult,
}

/// Running tally for a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LinkSummary {
    pub added: usize,
    pub already_present: usize,
    pub errors: usize,
    pub outcomes: Vec<IssueOutcome>,
}

impl LinkSummary {
    /// Count one issue's result. Every call lands in exactly one counter.
    pub fn record(&mut self, number: u64, result: LinkResult) {
        match &result {
            LinkResult::Linked => self.added += 1,
            LinkResult::AlreadyLinked => self.already_present += 1,
            LinkResult::ResolutionFailed | LinkResult::RequestFailed(_) => self.errors += 1,
        }
        self.outcomes.push(IssueOutcome { number, result });
    }

    pub fn processed(&self) -> usize {
        self.outcomes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// # Board URL Shape
    ///
    /// Tests that the board URL follows the scope the project was found in.
    ///
    /// ## Test Scenario
    /// - Builds URLs for a user and an organization project
    ///
    /// ## Expected Outcome
    /// - `/users/` for user projects, `/orgs/` for organization projects
    #[test]
    fn test_board_url_by_scope() {
        let mut project = ProjectReference {
            id: "PVT_1".to_string(),
            number: 3,
            title: "Co-Co Backlog".to_string(),
            scope: ProjectScope::User,
        };
        assert_eq!(
            project.board_url("liorkl"),
            "https://github.com/users/liorkl/projects/3"
        );

        project.scope = ProjectScope::Organization;
        assert_eq!(
            project.board_url("acme"),
            "https://github.com/orgs/acme/projects/3"
        );
    }

    /// # Summary Tally
    ///
    /// Tests that every recorded result lands in exactly one counter.
    ///
    /// ## Test Scenario
    /// - Records one of each result kind
    ///
    /// ## Expected Outcome
    /// - added + already_present + errors equals processed
    #[test]
    fn test_summary_tally() {
        let mut summary = LinkSummary::default();
        summary.record(1, LinkResult::Linked);
        summary.record(2, LinkResult::AlreadyLinked);
        summary.record(3, LinkResult::ResolutionFailed);
        summary.record(4, LinkResult::RequestFailed("http_error: 502".to_string()));

        assert_eq!(summary.added, 1);
        assert_eq!(summary.already_present, 1);
        assert_eq!(summary.errors, 2);
        assert_eq!(
            summary.added + summary.already_present + summary.errors,
            summary.processed()
        );
        assert_eq!(
            summary.outcomes.iter().map(|o| o.number).collect::<Vec<_>>(),
            vec![1, 2, 3, 4]
        );
    }

    #[test]
    fn test_link_result_serialization() {
        let json = serde_json::to_value(IssueOutcome {
            number: 7,
            result: LinkResult::RequestFailed("error: nope".to_string()),
        })
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"number": 7, "status": "request_failed", "reason": "error: nope"})
        );

        let json = serde_json::to_value(IssueOutcome {
            number: 8,
            result: LinkResult::Linked,
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"number": 8, "status": "linked"}));
    }

    /// # CLI Layer
    ///
    /// Tests that only flags the user passed end up in the CLI layer.
    ///
    /// ## Test Scenario
    /// - Parses args with owner and an issue list
    ///
    /// ## Expected Outcome
    /// - Owner and issues are set with a CLI source, other fields unset
    #[test]
    fn test_cli_config_layer() {
        let args = Args::parse_from(["boardlink", "--owner", "acme", "--issues", "4-6,2"]);
        let layer = args.cli_config().unwrap();

        assert_eq!(layer.owner, Some(Sourced::cli("acme".to_string())));
        assert_eq!(layer.issues, Some(Sourced::cli(vec![4, 5, 6, 2])));
        assert!(layer.repo.is_none());
        assert!(layer.project_title.is_none());
        assert_eq!(args.output, OutputFormat::Text);
    }

    #[test]
    fn test_cli_config_rejects_bad_issue_list() {
        let args = Args::parse_from(["boardlink", "--issues", "x"]);
        assert!(args.cli_config().is_err());
    }

    #[test]
    fn test_args_output_and_logging_flags() {
        let args = Args::parse_from([
            "boardlink",
            "-p",
            "Sprint Board",
            "--output",
            "ndjson",
            "--log-level",
            "debug",
        ]);
        assert_eq!(args.project_title.as_deref(), Some("Sprint Board"));
        assert_eq!(args.output, OutputFormat::Ndjson);
        assert_eq!(args.log_level.as_deref(), Some("debug"));
    }
}
