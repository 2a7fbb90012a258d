//! GraphQL envelope types and response decoding.
//!
//! Responses are decoded exactly once, here, into an [`ApiOutcome`]. Callers
//! match on the outcome instead of poking through optional JSON fields.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::traits::{HttpResponse, TransportError};

/// Request body: `{"query": ..., "variables": ...}`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GraphQlRequest {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<serde_json::Value>,
}

impl GraphQlRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            variables: None,
        }
    }

    pub fn with_variables(mut self, variables: serde_json::Value) -> Self {
        self.variables = Some(variables);
        self
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!(self)
    }
}

/// One entry of the `errors` array.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
pub struct GraphQlError {
    #[serde(default = "unknown_error")]
    pub message: String,
    /// GitHub's error classification, e.g. `NOT_FOUND` or `INSUFFICIENT_SCOPES`.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub path: Vec<serde_json::Value>,
}

fn unknown_error() -> String {
    "Unknown error".to_string()
}

impl GraphQlError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    /// First path segment, when it is a field name.
    pub fn root_field(&self) -> Option<&str> {
        self.path.first().and_then(|v| v.as_str())
    }
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Option<Vec<GraphQlError>>,
}

/// Result of one GraphQL call, decoded at the API boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiOutcome<T> {
    /// HTTP 200, no errors, data present.
    Ok(T),
    /// HTTP 200 with a non-empty `errors` array; `data` holds any partial result.
    ApiError {
        errors: Vec<GraphQlError>,
        data: Option<T>,
    },
    /// Any non-200 status.
    HttpError { status: u16, body: String },
    /// HTTP 200 but the body did not decode.
    Malformed(String),
    /// No response at all.
    Transport(TransportError),
}

impl<T> ApiOutcome<T> {
    /// The payload when the call fully succeeded.
    pub fn ok(self) -> Option<T> {
        match self {
            ApiOutcome::Ok(data) => Some(data),
            _ => None,
        }
    }

    /// Short, log-friendly description of a non-`Ok` outcome.
    pub fn describe_failure(&self) -> Option<String> {
        match self {
            ApiOutcome::Ok(_) => None,
            ApiOutcome::ApiError { errors, .. } => Some(format!(
                "graphql errors: {}",
                errors
                    .iter()
                    .map(|e| e.message.as_str())
                    .collect::<Vec<_>>()
                    .join("; ")
            )),
            ApiOutcome::HttpError { status, .. } => Some(format!("http status {}", status)),
            ApiOutcome::Malformed(message) => Some(format!("malformed response: {}", message)),
            ApiOutcome::Transport(err) => Some(format!("transport: {}", err)),
        }
    }
}

/// Decode a transport result into an [`ApiOutcome`].
pub fn decode<T: DeserializeOwned>(
    response: Result<HttpResponse, TransportError>,
) -> ApiOutcome<T> {
    let response = match response {
        Ok(response) => response,
        Err(err) => return ApiOutcome::Transport(err),
    };

    if response.status != 200 {
        return ApiOutcome::HttpError {
            status: response.status,
            body: response.body,
        };
    }

    let envelope: Envelope<T> = match serde_json::from_str(&response.body) {
        Ok(envelope) => envelope,
        Err(e) => return ApiOutcome::Malformed(e.to_string()),
    };

    match (envelope.data, envelope.errors.unwrap_or_default()) {
        (data, errors) if !errors.is_empty() => ApiOutcome::ApiError { errors, data },
        (Some(data), _) => ApiOutcome::Ok(data),
        // Payloads that accept `null` (unit-like or ignored) succeed on an
        // empty error list alone.
        (None, _) => match serde_json::from_value(serde_json::Value::Null) {
            Ok(data) => ApiOutcome::Ok(data),
            Err(_) => {
                ApiOutcome::Malformed("response carried neither data nor errors".to_string())
            }
        },
    }
}
