//! GitHub GraphQL client for project boards and issues.
//!
//! Three documents are sent:
//! - a combined organization/user `projectsV2` listing (no variables)
//! - an issue lookup by owner, repository and number
//! - the `addProjectV2ItemById` mutation

use serde::Deserialize;
use serde::de::IgnoredAny;
use serde_json::json;
use std::sync::Arc;

use super::credential::GitHubToken;
use super::graphql::{ApiOutcome, GraphQlRequest, decode};
use super::traits::HttpTransport;
use crate::models::{IssueReference, LinkResult};

/// How many projects to request from each collection.
pub const PROJECTS_PAGE_SIZE: u32 = 20;

const ISSUE_QUERY: &str = r#"
query($owner: String!, $repo: String!, $number: Int!) {
  repository(owner: $owner, name: $repo) {
    issue(number: $number) {
      id
    }
  }
}
"#;

const ADD_ITEM_MUTATION: &str = r#"
mutation($projectId: ID!, $contentId: ID!) {
  addProjectV2ItemById(input: {projectId: $projectId, contentId: $contentId}) {
    item {
      id
    }
  }
}
"#;

/// Build the combined organization/user project listing for `owner`.
///
/// The login is embedded as a JSON-escaped string literal, which is also a
/// valid GraphQL string literal.
pub fn projects_query(owner: &str) -> String {
    let login = serde_json::Value::String(owner.to_string()).to_string();
    format!(
        r#"
query {{
  organization(login: {login}) {{
    projectsV2(first: {first}) {{
      nodes {{
        id
        title
        number
      }}
    }}
  }}
  user(login: {login}) {{
    projectsV2(first: {first}) {{
      nodes {{
        id
        title
        number
      }}
    }}
  }}
}}
"#,
        login = login,
        first = PROJECTS_PAGE_SIZE
    )
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ProjectNode {
    pub id: String,
    pub title: String,
    pub number: u64,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
pub struct ProjectConnection {
    #[serde(default)]
    pub nodes: Vec<Option<ProjectNode>>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
pub struct ProjectOwner {
    #[serde(rename = "projectsV2", default)]
    pub projects: Option<ProjectConnection>,
}

impl ProjectOwner {
    /// Project nodes in API order, skipping nulls.
    pub fn nodes(&self) -> impl Iterator<Item = &ProjectNode> {
        self.projects
            .iter()
            .flat_map(|c| c.nodes.iter())
            .filter_map(Option::as_ref)
    }
}

/// `data` of the project listing query.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
pub struct ProjectsData {
    #[serde(default)]
    pub organization: Option<ProjectOwner>,
    #[serde(default)]
    pub user: Option<ProjectOwner>,
}

#[derive(Debug, Deserialize)]
struct IssueNode {
    id: String,
}

#[derive(Debug, Deserialize)]
struct IssueRepository {
    issue: Option<IssueNode>,
}

#[derive(Debug, Deserialize)]
struct IssueData {
    repository: Option<IssueRepository>,
}

/// GitHub GraphQL client.
///
/// # Example
///
/// ```rust,no_run
/// use boardlink::api::{GitHubClient, GitHubToken, ReqwestTransport};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let transport = Arc::new(ReqwestTransport::new(Duration::from_secs(10))?);
/// let token = GitHubToken::new("ghp_example".to_string(), "example");
/// let client = GitHubClient::new(transport, "https://api.github.com/graphql", token);
///
/// let issue = client.resolve_issue("liorkl", "co-co", 45).await;
/// println!("{:?}", issue);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct GitHubClient {
    transport: Arc<dyn HttpTransport>,
    endpoint: String,
    token: GitHubToken,
}

impl GitHubClient {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        endpoint: impl Into<String>,
        token: GitHubToken,
    ) -> Self {
        Self {
            transport,
            endpoint: endpoint.into(),
            token,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn headers(&self) -> Vec<(String, String)> {
        vec![
            (
                "Authorization".to_string(),
                self.token.authorization_header(),
            ),
            ("Content-Type".to_string(), "application/json".to_string()),
        ]
    }

    async fn execute<T: serde::de::DeserializeOwned>(
        &self,
        request: &GraphQlRequest,
    ) -> ApiOutcome<T> {
        let response = self
            .transport
            .post_json(&self.endpoint, &request.to_json(), &self.headers())
            .await;
        decode(response)
    }

    /// List up to [`PROJECTS_PAGE_SIZE`] projects from both the organization
    /// and the user named `owner`.
    #[tracing::instrument(skip(self))]
    pub async fn fetch_projects(&self, owner: &str) -> ApiOutcome<ProjectsData> {
        let outcome = self
            .execute(&GraphQlRequest::new(projects_query(owner)))
            .await;
        if let Some(reason) = outcome.describe_failure() {
            tracing::debug!(%reason, "project listing did not fully succeed");
        }
        outcome
    }

    /// Map an issue number to its node id.
    ///
    /// Every failure (status, transport, decode, GraphQL error, missing
    /// repository or issue) yields `None`.
    #[tracing::instrument(skip(self))]
    pub async fn resolve_issue(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Option<IssueReference> {
        let request = GraphQlRequest::new(ISSUE_QUERY).with_variables(json!({
            "owner": owner,
            "repo": repo,
            "number": number,
        }));

        let outcome: ApiOutcome<IssueData> = self.execute(&request).await;
        if let Some(reason) = outcome.describe_failure() {
            tracing::warn!(%reason, "issue lookup failed");
        }

        let issue = outcome.ok()?.repository.and_then(|r| r.issue);
        match issue {
            Some(issue) => Some(IssueReference {
                number,
                node_id: issue.id,
            }),
            None => {
                tracing::warn!("repository or issue not found");
                None
            }
        }
    }

    /// Add `content_id` to `project_id` and classify the response.
    #[tracing::instrument(skip(self))]
    pub async fn link_issue(&self, project_id: &str, content_id: &str) -> LinkResult {
        let request = GraphQlRequest::new(ADD_ITEM_MUTATION).with_variables(json!({
            "projectId": project_id,
            "contentId": content_id,
        }));

        // Only the error list decides the result; the payload is skipped.
        let outcome: ApiOutcome<IgnoredAny> = self.execute(&request).await;
        crate::core::link::classify_link_outcome(outcome)
    }
}
