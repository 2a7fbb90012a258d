//! GitHub GraphQL API client module.
//!
//! This module talks to the GitHub GraphQL endpoint on behalf of the linker:
//! listing project boards, resolving issue numbers to node ids, and adding
//! issues to a board.
//!
//! ## Layers
//!
//! - [`traits`]: the [`HttpTransport`] seam and its reqwest implementation
//! - [`graphql`]: request envelope and [`ApiOutcome`] decoding
//! - [`credential`]: bearer token lookup
//! - [`client`]: the three GraphQL documents behind [`GitHubClient`]
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use boardlink::api::{GitHubClient, ReqwestTransport, resolve_default_token};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let token = resolve_default_token()?;
//! let transport = ReqwestTransport::new(Duration::from_secs(10))?;
//! let client = GitHubClient::new(
//!     Arc::new(transport),
//!     "https://api.github.com/graphql",
//!     token,
//! );
//!
//! let projects = client.fetch_projects("octocat").await;
//! println!("{:?}", projects.ok());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod credential;
pub mod graphql;
pub mod traits;

pub use client::{GitHubClient, ProjectNode, ProjectOwner, ProjectsData};
pub use credential::{
    EnvTokenSource, GhCliTokenSource, GitHubToken, TOKEN_ENV_VAR, TokenSource,
    resolve_default_token, resolve_token,
};
pub use graphql::{ApiOutcome, GraphQlError, GraphQlRequest, decode};
pub use traits::{HttpResponse, HttpTransport, ReqwestTransport, TransportError};
