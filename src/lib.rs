//! # boardlink
//!
//! Adds a batch of GitHub issues to a Projects (v2) board in one shot.
//!
//! - [`api`]: GitHub GraphQL client, credential lookup, and the HTTP seam
//! - [`core`]: board lookup, link classification, the runner, and output
//! - [`config`]: layered configuration (defaults, file, git remote, env, CLI)
//! - [`logging`]: optional tracing output
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use boardlink::{LinkRunner, OutputFormat, RunConfig};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let config = RunConfig::new("octocat", "hello-world", vec![1, 2, 3], "Roadmap");
//! let result = LinkRunner::new(config, OutputFormat::Text).run().await;
//! std::process::exit(result.exit_code.code().into());
//! # }
//! ```

pub mod api;
pub mod config;
pub mod core;
pub mod error;
pub mod git_config;
pub mod logging;
pub mod models;

// Re-export commonly used types for convenience
pub use api::{GitHubClient, GitHubToken, HttpTransport};
pub use config::{Config, RunConfig};
pub use core::ExitCode;
pub use core::runner::{LinkRunner, RunResult};
pub use error::{BoardlinkError, BoardlinkResult};
pub use models::{Args, LinkResult, LinkSummary, OutputFormat};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
