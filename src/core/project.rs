//! Project board lookup by exact title.
//!
//! The listing query asks for both `organization(login:)` and `user(login:)`
//! at once. For a personal account the organization half fails with a
//! "Could not resolve to an Organization" error while the user half still
//! carries data, so those errors are dropped and the partial data searched.
//! Any other error ends the lookup.

use crate::api::{ApiOutcome, GitHubClient, GraphQlError, ProjectsData};
use crate::error::LookupError;
use crate::models::{ProjectReference, ProjectScope};

/// Whether an error only says that `owner` is not an organization.
pub fn is_not_an_organization(error: &GraphQlError) -> bool {
    if error
        .message
        .to_lowercase()
        .contains("could not resolve to an organization")
    {
        return true;
    }

    error.kind.as_deref() == Some("NOT_FOUND") && error.root_field() == Some("organization")
}

/// Whether the errors suggest the token lacks project scopes.
fn needs_project_scope(errors: &[GraphQlError]) -> bool {
    errors.iter().any(|e| {
        e.kind.as_deref() == Some("INSUFFICIENT_SCOPES")
            || e.message.to_lowercase().contains("project")
    })
}

/// Find the first project titled exactly `title`, organization first.
pub fn select_project(data: &ProjectsData, title: &str) -> Option<ProjectReference> {
    let collections = [
        (ProjectScope::Organization, data.organization.as_ref()),
        (ProjectScope::User, data.user.as_ref()),
    ];

    collections
        .into_iter()
        .filter_map(|(scope, owner)| owner.map(|o| (scope, o)))
        .find_map(|(scope, owner)| {
            owner
                .nodes()
                .find(|node| node.title == title)
                .map(|node| ProjectReference {
                    id: node.id.clone(),
                    number: node.number,
                    title: node.title.clone(),
                    scope,
                })
        })
}

/// Reduce a listing outcome to a project reference or a lookup error.
pub fn resolve_project(
    outcome: ApiOutcome<ProjectsData>,
    title: &str,
) -> Result<ProjectReference, LookupError> {
    let data = match outcome {
        ApiOutcome::Ok(data) => data,
        ApiOutcome::ApiError { errors, data } => {
            let (ignored, fatal): (Vec<_>, Vec<_>) =
                errors.into_iter().partition(is_not_an_organization);

            if !fatal.is_empty() {
                return Err(LookupError::GraphQl {
                    scope_hint: needs_project_scope(&fatal),
                    messages: fatal.into_iter().map(|e| e.message).collect(),
                });
            }

            tracing::debug!(
                suppressed = ignored.len(),
                "owner is not an organization; searching user projects"
            );
            data.unwrap_or_default()
        }
        ApiOutcome::HttpError { status, body } => {
            return Err(LookupError::Http { status, body });
        }
        ApiOutcome::Malformed(message) => return Err(LookupError::Malformed { message }),
        ApiOutcome::Transport(err) => {
            return Err(LookupError::Transport {
                message: err.to_string(),
            });
        }
    };

    select_project(&data, title).ok_or_else(|| LookupError::NotFound {
        title: title.to_string(),
    })
}

/// Query `owner`'s projects and pick the one titled `title`.
pub async fn locate_project(
    client: &GitHubClient,
    owner: &str,
    title: &str,
) -> Result<ProjectReference, LookupError> {
    let outcome = client.fetch_projects(owner).await;
    let project = resolve_project(outcome, title)?;
    tracing::info!(
        id = %project.id,
        number = project.number,
        scope = ?project.scope,
        "located project board"
    );
    Ok(project)
}
