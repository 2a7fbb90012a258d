//! Bearer token resolution for the GitHub API.
//!
//! The token is looked up once per run from an ordered list of
//! [`TokenSource`]s: the GitHub CLI (`gh auth token`) first, then the
//! `GITHUB_TOKEN` environment variable. The first non-empty value wins.

use secrecy::{ExposeSecret, SecretString};
use std::process::Command;

use crate::error::CredentialError;

/// Environment variable consulted when the `gh` helper yields nothing.
pub const TOKEN_ENV_VAR: &str = "GITHUB_TOKEN";

/// Bearer token for the GitHub API.
///
/// The token is stored in a `SecretString` and only exposed when the
/// `Authorization` header is built.
///
/// # Example
///
/// ```rust
/// use boardlink::api::GitHubToken;
///
/// let token = GitHubToken::new("ghp_example".to_string(), "test");
/// assert!(format!("{:?}", token).contains("[REDACTED]"));
/// assert_eq!(token.authorization_header(), "Bearer ghp_example");
/// ```
#[derive(Clone)]
pub struct GitHubToken {
    token: SecretString,
    source: String,
}

impl GitHubToken {
    /// Wraps a raw token, remembering which source produced it.
    pub fn new(token: String, source: impl Into<String>) -> Self {
        Self {
            token: SecretString::from(token),
            source: source.into(),
        }
    }

    /// Name of the source that produced this token.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Value for the `Authorization` header.
    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.token.expose_secret())
    }
}

impl std::fmt::Debug for GitHubToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubToken")
            .field("token", &"[REDACTED]")
            .field("source", &self.source)
            .finish()
    }
}

/// Something that may be able to produce a token.
pub trait TokenSource {
    /// Short name used in logs.
    fn name(&self) -> String;

    /// The raw token, or `None` if this source has nothing to offer.
    fn fetch(&self) -> Option<String>;
}

/// Asks the GitHub CLI for its stored token.
#[derive(Debug, Clone)]
pub struct GhCliTokenSource {
    program: String,
}

impl GhCliTokenSource {
    pub fn new() -> Self {
        Self::with_program("gh")
    }

    /// Use a different executable in place of `gh`.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for GhCliTokenSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenSource for GhCliTokenSource {
    fn name(&self) -> String {
        format!("{} auth token", self.program)
    }

    fn fetch(&self) -> Option<String> {
        let output = match Command::new(&self.program).args(["auth", "token"]).output() {
            Ok(output) => output,
            Err(e) => {
                tracing::debug!(program = %self.program, error = %e, "token helper unavailable");
                return None;
            }
        };

        if !output.status.success() {
            tracing::debug!(
                program = %self.program,
                status = ?output.status.code(),
                "token helper exited unsuccessfully"
            );
            return None;
        }

        String::from_utf8(output.stdout).ok()
    }
}

/// Reads a token from an environment variable.
#[derive(Debug, Clone)]
pub struct EnvTokenSource {
    var: String,
}

impl EnvTokenSource {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvTokenSource {
    fn default() -> Self {
        Self::new(TOKEN_ENV_VAR)
    }
}

impl TokenSource for EnvTokenSource {
    fn name(&self) -> String {
        format!("${}", self.var)
    }

    fn fetch(&self) -> Option<String> {
        std::env::var(&self.var).ok()
    }
}

/// Try each source in order and return the first non-empty token.
pub fn resolve_token(sources: &[&dyn TokenSource]) -> Result<GitHubToken, CredentialError> {
    for source in sources {
        let name = source.name();
        match source.fetch().map(|raw| raw.trim().to_string()) {
            Some(token) if !token.is_empty() => {
                tracing::info!(source = %name, "resolved GitHub token");
                return Ok(GitHubToken::new(token, name));
            }
            _ => tracing::debug!(source = %name, "no token from source"),
        }
    }

    Err(CredentialError::Unavailable)
}

/// Resolve a token the standard way: `gh auth token`, then `GITHUB_TOKEN`.
pub fn resolve_default_token() -> Result<GitHubToken, CredentialError> {
    let gh = GhCliTokenSource::new();
    let env = EnvTokenSource::default();
    resolve_token(&[&gh, &env])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::file_serial;
    use std::cell::Cell;

    struct FixedSource {
        value: Option<&'static str>,
        calls: Cell<usize>,
    }

    impl FixedSource {
        fn new(value: Option<&'static str>) -> Self {
            Self {
                value,
                calls: Cell::new(0),
            }
        }
    }

    impl TokenSource for FixedSource {
        fn name(&self) -> String {
            "fixed".to_string()
        }

        fn fetch(&self) -> Option<String> {
            self.calls.set(self.calls.get() + 1);
            self.value.map(str::to_string)
        }
    }

    /// # Token Redaction
    ///
    /// Tests that Debug output never contains the token.
    ///
    /// ## Test Scenario
    /// - Formats a token with `{:?}`
    ///
    /// ## Expected Outcome
    /// - Output shows `[REDACTED]` and not the secret
    #[test]
    fn test_token_debug_is_redacted() {
        let token = GitHubToken::new("ghp_secret".to_string(), "fixed");
        let debug = format!("{:?}", token);
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("ghp_secret"));
        assert_eq!(token.source(), "fixed");
    }

    /// # First Source Wins
    ///
    /// Tests ordering: a later source is never consulted once one succeeds.
    ///
    /// ## Test Scenario
    /// - First source yields a padded token, second yields another
    ///
    /// ## Expected Outcome
    /// - Trimmed first token is returned; second source not called
    #[test]
    fn test_first_source_wins() {
        let first = FixedSource::new(Some("  tok-1\n"));
        let second = FixedSource::new(Some("tok-2"));

        let token = resolve_token(&[&first, &second]).unwrap();

        assert_eq!(token.authorization_header(), "Bearer tok-1");
        assert_eq!(second.calls.get(), 0);
    }

    /// # Fallback Past Empty Values
    ///
    /// Tests that missing and whitespace-only values fall through.
    ///
    /// ## Test Scenario
    /// - Sources yield nothing, whitespace, then a token
    ///
    /// ## Expected Outcome
    /// - Third source's token is returned
    #[test]
    fn test_fallback_past_empty_values() {
        let none = FixedSource::new(None);
        let blank = FixedSource::new(Some("   "));
        let good = FixedSource::new(Some("tok"));

        let token = resolve_token(&[&none, &blank, &good]).unwrap();
        assert_eq!(token.authorization_header(), "Bearer tok");
    }

    #[test]
    fn test_no_sources_yield_unavailable() {
        let none = FixedSource::new(None);
        assert_eq!(
            resolve_token(&[&none]).unwrap_err(),
            CredentialError::Unavailable
        );
        assert_eq!(resolve_token(&[]).unwrap_err(), CredentialError::Unavailable);
    }

    #[test]
    fn test_missing_helper_yields_nothing() {
        let helper = GhCliTokenSource::with_program("boardlink-test-no-such-helper");
        assert!(helper.fetch().is_none());
        assert_eq!(helper.name(), "boardlink-test-no-such-helper auth token");
    }

    /// # Failing Helper
    ///
    /// Tests a helper that runs but exits non-zero.
    ///
    /// ## Test Scenario
    /// - `false` stands in for `gh`, followed by a fixed source
    ///
    /// ## Expected Outcome
    /// - The helper yields nothing and resolution moves on to the next source
    #[test]
    #[cfg(unix)]
    fn test_failing_helper_falls_through() {
        let helper = GhCliTokenSource::with_program("false");
        assert!(helper.fetch().is_none());

        let fallback = FixedSource::new(Some("fallback"));
        let token = resolve_token(&[&helper, &fallback]).unwrap();
        assert_eq!(token.authorization_header(), "Bearer fallback");
    }

    /// # Helper Absent and Variable Unset
    ///
    /// Tests the fully unconfigured machine.
    ///
    /// ## Test Scenario
    /// - Helper program does not exist, env var is removed
    ///
    /// ## Expected Outcome
    /// - `CredentialError::Unavailable`
    #[test]
    #[file_serial(env_tests)]
    fn test_absent_helper_and_unset_env() {
        let var = "BOARDLINK_TEST_TOKEN_UNSET";
        unsafe {
            std::env::remove_var(var);
        }

        let helper = GhCliTokenSource::with_program("boardlink-test-no-such-helper");
        let env = EnvTokenSource::new(var);

        assert_eq!(
            resolve_token(&[&helper, &env]).unwrap_err(),
            CredentialError::Unavailable
        );
    }

    #[test]
    #[file_serial(env_tests)]
    fn test_env_source_reads_variable() {
        let var = "BOARDLINK_TEST_TOKEN_SET";
        unsafe {
            std::env::set_var(var, "from-env");
        }

        let helper = GhCliTokenSource::with_program("boardlink-test-no-such-helper");
        let env = EnvTokenSource::new(var);
        let token = resolve_token(&[&helper, &env]);

        unsafe {
            std::env::remove_var(var);
        }

        let token = token.unwrap();
        assert_eq!(token.authorization_header(), "Bearer from-env");
        assert_eq!(token.source(), "$BOARDLINK_TEST_TOKEN_SET");
    }
}
