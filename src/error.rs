//! Unified error handling for boardlink.
//!
//! Every error that can end a run lives here. Per-issue failures are not
//! errors in this sense: they are folded into [`crate::models::LinkResult`]
//! values and counted in the summary instead.
//!
//! ## Error Categories
//!
//! - [`CredentialError`]: no bearer token could be found
//! - [`ApiError`]: the HTTP client could not be built or used
//! - [`LookupError`]: the project board could not be located
//! - [`ConfigError`]: configuration loading and validation
//!
//! ## Example
//!
//! ```rust
//! use boardlink::error::{BoardlinkError, CredentialError};
//!
//! let err: BoardlinkError = CredentialError::Unavailable.into();
//! assert!(!err.remediation().is_empty());
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Command that grants the project scopes a token needs.
pub const SCOPE_REFRESH_COMMAND: &str = "gh auth refresh -s read:project,write:project";

/// The main error type for boardlink.
///
/// Each variant is fatal: the binary prints the message and the
/// [`remediation`](BoardlinkError::remediation) lines, then exits with status 1.
#[derive(Error, Debug)]
pub enum BoardlinkError {
    /// No credential could be resolved.
    #[error(transparent)]
    Credential(#[from] CredentialError),

    /// The HTTP layer could not be set up.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The project board could not be located.
    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// Configuration was missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A generic error for cases not covered by specific error types.
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl BoardlinkError {
    /// Human-readable hints telling the user how to get past this error.
    pub fn remediation(&self) -> Vec<String> {
        match self {
            BoardlinkError::Credential(CredentialError::Unavailable) => vec![
                "Run 'gh auth login' to authenticate the GitHub CLI".to_string(),
                "Or export GITHUB_TOKEN with the read:project and write:project scopes"
                    .to_string(),
            ],
            BoardlinkError::Api(ApiError::ClientInit { .. }) => vec![
                "The HTTPS client could not be initialized on this system".to_string(),
                "Check that the TLS root certificates are installed and readable".to_string(),
            ],
            BoardlinkError::Lookup(err) => err.remediation(),
            BoardlinkError::Config(ConfigError::MissingRequired { field, env_var }) => vec![
                format!("Pass --{}, set {}, or add it to the config file", field, env_var),
            ],
            _ => Vec::new(),
        }
    }
}

/// Errors raised while resolving the bearer credential.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    /// Neither the `gh` helper nor the environment produced a token.
    #[error("No GitHub token found. Set GITHUB_TOKEN or run 'gh auth login'")]
    Unavailable,
}

/// Errors from the HTTP layer that prevent any request from being made.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client unavailable: {message}")]
    ClientInit {
        /// Description of the initialization failure.
        message: String,
    },
}

/// Errors that end project board resolution.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// No project with the requested title exists for the owner.
    #[error("Could not find project '{title}'")]
    NotFound {
        /// The title that was searched for.
        title: String,
    },

    /// The API reported errors other than "not an organization".
    #[error("GraphQL Errors:\n{}", format_messages(.messages))]
    GraphQl {
        /// Error messages exactly as the API returned them.
        messages: Vec<String>,
        /// Whether the errors point at missing project scopes.
        scope_hint: bool,
    },

    /// The API answered with a non-200 status.
    #[error("API Error: {status}\n   Response: {body}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The request never got an answer.
    #[error("Request failed: {message}")]
    Transport {
        /// Description of the transport failure.
        message: String,
    },

    /// The response could not be decoded.
    #[error("Malformed API response: {message}")]
    Malformed {
        /// Description of the decode failure.
        message: String,
    },
}

impl LookupError {
    /// Hints for a failed board lookup.
    ///
    /// Every variant ends with the same numbered options, after any line
    /// specific to the failure.
    pub fn remediation(&self) -> Vec<String> {
        let mut hints = match self {
            LookupError::NotFound { .. } | LookupError::Malformed { .. } => Vec::new(),
            LookupError::GraphQl { scope_hint, .. } if *scope_hint => vec![
                format!("Solution: Run '{}'", SCOPE_REFRESH_COMMAND),
                "Or use the 'project' scope: 'gh auth refresh -s project'".to_string(),
            ],
            LookupError::GraphQl { .. } => Vec::new(),
            LookupError::Http { status: 401, .. } => vec![
                "The token was rejected; run 'gh auth login' or refresh GITHUB_TOKEN".to_string(),
            ],
            LookupError::Http { status, .. } if *status >= 500 => {
                vec![format!("GitHub answered {}; retry in a few minutes", status)]
            }
            LookupError::Http { .. } => Vec::new(),
            LookupError::Transport { .. } => {
                vec!["Check the network connection and the configured API URL".to_string()]
            }
        };
        hints.extend([
            format!("1. Run '{}' to grant scopes", SCOPE_REFRESH_COMMAND),
            "2. Verify the project name matches exactly".to_string(),
            "3. Add issues manually via GitHub UI".to_string(),
        ]);
        hints
    }
}

fn format_messages(messages: &[String]) -> String {
    messages
        .iter()
        .map(|m| format!("   {}", m))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Errors that can occur during configuration loading and validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required configuration field is missing or empty.
    #[error("{field} is required (use --{field}, {env_var} env var, or config file)")]
    MissingRequired {
        /// Name of the missing field.
        field: String,
        /// Environment variable name for this field.
        env_var: String,
    },

    /// An invalid value was provided for a configuration field.
    #[error("Invalid value for {field}: {message}")]
    InvalidValue {
        /// Name of the field with invalid value.
        field: String,
        /// Description of why the value is invalid.
        message: String,
    },

    /// Failed to read the configuration file.
    #[error("Failed to read config file at {path}: {message}")]
    FileReadError {
        /// Path to the config file.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Failed to parse the configuration file.
    #[error("Failed to parse config file at {path}: {message}")]
    ParseError {
        /// Path to the config file.
        path: PathBuf,
        /// Parse error message.
        message: String,
    },
}

/// Type alias for Results using BoardlinkError.
pub type BoardlinkResult<T> = std::result::Result<T, BoardlinkError>;

#[cfg(test)]
mod tests {
    use super::*;

    /// # Credential Error Message
    ///
    /// Tests that the missing-credential error tells the user both ways to fix it.
    ///
    /// ## Test Scenario
    /// - Formats `CredentialError::Unavailable`
    /// - Collects its remediation lines through `BoardlinkError`
    ///
    /// ## Expected Outcome
    /// - Message names GITHUB_TOKEN and `gh auth login`
    /// - Remediation is non-empty
    #[test]
    fn test_credential_error_display() {
        let err = CredentialError::Unavailable;
        let msg = err.to_string();
        assert!(msg.contains("GITHUB_TOKEN"));
        assert!(msg.contains("gh auth login"));

        let wrapped: BoardlinkError = err.into();
        assert_eq!(wrapped.remediation().len(), 2);
    }

    /// # Not Found Remediation
    ///
    /// Tests that a missing project produces the three numbered suggestions.
    ///
    /// ## Test Scenario
    /// - Wraps `LookupError::NotFound` in `BoardlinkError`
    ///
    /// ## Expected Outcome
    /// - Exactly three hints, the first naming the scope refresh command
    #[test]
    fn test_not_found_remediation() {
        let err: BoardlinkError = LookupError::NotFound {
            title: "Co-Co Backlog".to_string(),
        }
        .into();

        assert_eq!(err.to_string(), "Could not find project 'Co-Co Backlog'");
        let hints = err.remediation();
        assert_eq!(hints.len(), 3);
        assert!(hints[0].contains(SCOPE_REFRESH_COMMAND));
        assert!(hints[1].starts_with("2."));
        assert!(hints[2].starts_with("3."));
    }

    /// # GraphQL Error Display
    ///
    /// Tests that GraphQL errors are listed verbatim and the scope hint is gated.
    ///
    /// ## Test Scenario
    /// - Formats a `GraphQl` error with two messages, with and without scope hint
    ///
    /// ## Expected Outcome
    /// - Each message appears on its own indented line
    /// - Remediation only appears when `scope_hint` is set
    #[test]
    fn test_graphql_error_display() {
        let messages = vec![
            "Your token has not been granted the required scopes".to_string(),
            "Something else".to_string(),
        ];
        let with_hint = LookupError::GraphQl {
            messages: messages.clone(),
            scope_hint: true,
        };
        let text = with_hint.to_string();
        assert!(text.starts_with("GraphQL Errors:"));
        assert!(text.contains("\n   Your token has not been granted the required scopes"));
        assert!(text.contains("\n   Something else"));

        let wrapped: BoardlinkError = with_hint.into();
        assert!(wrapped.remediation()[0].contains(SCOPE_REFRESH_COMMAND));

        let without_hint: BoardlinkError = LookupError::GraphQl {
            messages,
            scope_hint: false,
        }
        .into();
        let hints = without_hint.remediation();
        assert_eq!(hints.len(), 3);
        assert!(hints[0].starts_with("1."));
    }

    /// # Lookup Failures Always Carry Hints
    ///
    /// Tests that every way the board lookup can fail ends with the numbered options.
    ///
    /// ## Test Scenario
    /// - Transport timeout, HTTP 502, HTTP 403, HTTP 401, undecodable body,
    ///   GraphQL error without a scope hint
    ///
    /// ## Expected Outcome
    /// - Each ends with the three numbered options
    /// - Transport, 5xx and 401 lead with a line of their own
    #[test]
    fn test_lookup_failures_always_have_hints() {
        let cases = [
            (
                LookupError::Transport {
                    message: "request timed out".to_string(),
                },
                4,
            ),
            (
                LookupError::Http {
                    status: 502,
                    body: "Bad Gateway".to_string(),
                },
                4,
            ),
            (
                LookupError::Http {
                    status: 403,
                    body: String::new(),
                },
                3,
            ),
            (
                LookupError::Http {
                    status: 401,
                    body: String::new(),
                },
                4,
            ),
            (
                LookupError::Malformed {
                    message: "eof".to_string(),
                },
                3,
            ),
            (
                LookupError::GraphQl {
                    messages: vec!["Something went wrong".to_string()],
                    scope_hint: false,
                },
                3,
            ),
        ];

        for (err, expected) in cases {
            let wrapped: BoardlinkError = err.clone().into();
            let hints = wrapped.remediation();
            assert_eq!(hints.len(), expected, "hints for {:?}", err);
            assert!(hints[expected - 3].contains(SCOPE_REFRESH_COMMAND));
            assert!(hints[expected - 1].starts_with("3."));
        }
    }

    /// # Config Error Display
    ///
    /// Tests that config errors point at the flag and environment variable.
    ///
    /// ## Test Scenario
    /// - Formats `ConfigError::MissingRequired`
    ///
    /// ## Expected Outcome
    /// - Message names both `--owner` and `BOARDLINK_OWNER`
    #[test]
    fn test_config_error_display() {
        let missing = ConfigError::MissingRequired {
            field: "owner".to_string(),
            env_var: "BOARDLINK_OWNER".to_string(),
        };
        let msg = missing.to_string();
        assert!(msg.contains("--owner"));
        assert!(msg.contains("BOARDLINK_OWNER"));

        let wrapped: BoardlinkError = missing.into();
        assert!(matches!(wrapped, BoardlinkError::Config(_)));
        assert_eq!(wrapped.remediation().len(), 1);
    }

    /// # Error Conversion
    ///
    /// Tests that errors convert correctly through the From trait.
    ///
    /// ## Test Scenario
    /// - Creates specific error types and converts them to BoardlinkError
    ///
    /// ## Expected Outcome
    /// - All error types land in the matching variant
    #[test]
    fn test_error_conversion() {
        let api: BoardlinkError = ApiError::ClientInit {
            message: "no tls".to_string(),
        }
        .into();
        assert!(matches!(api, BoardlinkError::Api(_)));
        assert!(!api.remediation().is_empty());

        let lookup: BoardlinkError = LookupError::Transport {
            message: "timed out".to_string(),
        }
        .into();
        assert!(matches!(lookup, BoardlinkError::Lookup(_)));
        assert!(!lookup.remediation().is_empty());

        let other: BoardlinkError = anyhow::anyhow!("boom").into();
        assert_eq!(other.to_string(), "boom");
    }
}
