//! Classification of `addProjectV2ItemById` responses.

use crate::api::{ApiOutcome, GraphQlError};
use crate::models::LinkResult;

/// Error types GitHub uses when the item is already on the board.
const DUPLICATE_ERROR_TYPES: &[&str] = &["UNPROCESSABLE", "DUPLICATE"];

/// Whether a mutation error means "this issue is already on the board".
///
/// The message check is case-insensitive. A structured `type` is only
/// trusted together with a message that mentions existence, since
/// `UNPROCESSABLE` is also used for unrelated validation failures.
pub fn is_already_linked(error: &GraphQlError) -> bool {
    let message = error.message.to_lowercase();
    if message.contains("already exists") {
        return true;
    }

    let duplicate_type = error
        .kind
        .as_deref()
        .is_some_and(|kind| DUPLICATE_ERROR_TYPES.contains(&kind));
    duplicate_type && (message.contains("already") || message.contains("exists"))
}

/// Turn a decoded mutation response into a [`LinkResult`].
///
/// Only the first error is inspected.
pub fn classify_link_outcome<T>(outcome: ApiOutcome<T>) -> LinkResult {
    match outcome {
        ApiOutcome::Ok(_) => LinkResult::Linked,
        ApiOutcome::ApiError { errors, .. } => match errors.first() {
            Some(first) if is_already_linked(first) => LinkResult::AlreadyLinked,
            Some(first) => LinkResult::RequestFailed(format!("error: {}", first.message)),
            None => LinkResult::Linked,
        },
        ApiOutcome::HttpError { status, .. } => {
            LinkResult::RequestFailed(format!("http_error: {}", status))
        }
        ApiOutcome::Malformed(message) => {
            LinkResult::RequestFailed(format!("malformed_response: {}", message))
        }
        ApiOutcome::Transport(err) => LinkResult::RequestFailed(format!("transport_error: {}", err)),
    }
}
