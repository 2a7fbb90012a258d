//! Configuration management for boardlink.
//!
//! A run needs four things: the repository owner, the repository name, the
//! ordered list of issue numbers, and the title of the project board. Two
//! operational settings (API endpoint and request timeout) ride along.
//!
//! Values are layered, lowest priority first:
//! - built-in defaults
//! - TOML file at `$XDG_CONFIG_HOME/boardlink/config.toml`
//! - `origin` remote of `--repo-path` (owner and repo only)
//! - `BOARDLINK_*` environment variables
//! - command-line arguments
//!
//! ## Example
//!
//! ```rust
//! use boardlink::config::{Config, Sourced};
//!
//! let cli = Config {
//!     owner: Some(Sourced::cli("acme".to_string())),
//!     ..Config::default()
//! };
//! let resolved = Config::defaults().merge(cli).resolve().unwrap();
//! assert_eq!(resolved.owner.value(), "acme");
//! assert_eq!(resolved.repo.value(), "co-co");
//! ```

use crate::error::ConfigError;
use crate::git_config;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::fs;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

pub const DEFAULT_OWNER: &str = "liorkl";
pub const DEFAULT_REPO: &str = "co-co";
pub const DEFAULT_PROJECT_TITLE: &str = "Co-Co Backlog";
pub const DEFAULT_ISSUES: std::ops::RangeInclusive<u64> = 45..=56;
pub const DEFAULT_API_URL: &str = "https://api.github.com/graphql";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
/// Largest number of issues a single `a-b` range may expand to.
pub const MAX_ISSUE_RANGE: u64 = 1000;

/// Where a configuration value came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ValueSource {
    /// Command-line flag.
    Cli,
    /// Environment variable (variable name).
    Env(String),
    /// Detected from a git remote (remote URL).
    GitRemote(String),
    /// Config file (file path).
    File(PathBuf),
    /// Built-in default.
    Default,
}

impl Display for ValueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueSource::Cli => write!(f, "cli"),
            ValueSource::Env(var) => write!(f, "env:{}", var),
            ValueSource::GitRemote(url) => write!(f, "git:{}", url),
            ValueSource::File(path) => write!(f, "file:{}", path.display()),
            ValueSource::Default => write!(f, "default"),
        }
    }
}

/// A configuration value tagged with its origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sourced<T> {
    value: T,
    source: ValueSource,
}

impl<T> Sourced<T> {
    pub fn new(value: T, source: ValueSource) -> Self {
        Self { value, source }
    }

    pub fn cli(value: T) -> Self {
        Self::new(value, ValueSource::Cli)
    }

    pub fn default_value(value: T) -> Self {
        Self::new(value, ValueSource::Default)
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn source(&self) -> &ValueSource {
        &self.source
    }

    pub fn into_value(self) -> T {
        self.value
    }

    fn try_map<U, E>(self, f: impl FnOnce(T) -> std::result::Result<U, E>) -> std::result::Result<Sourced<U>, E> {
        Ok(Sourced {
            value: f(self.value)?,
            source: self.source,
        })
    }
}

impl<T> Deref for Sourced<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl<T: Display> Display for Sourced<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.value.fmt(f)
    }
}

/// Issue list as written in the config file: either an array or a range string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
enum IssuesEntry {
    List(Vec<u64>),
    Ranges(String),
}

/// Temporary struct for deserializing TOML configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct ConfigFile {
    pub owner: Option<String>,
    pub repo: Option<String>,
    pub project_title: Option<String>,
    pub issues: Option<IssuesEntry>,
    pub api_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// One layer of configuration. Unset fields defer to lower layers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// Repository owner (user or organization login).
    pub owner: Option<Sourced<String>>,
    /// Repository name.
    pub repo: Option<Sourced<String>>,
    /// Exact title of the project board.
    pub project_title: Option<Sourced<String>>,
    /// Issue numbers to link, in processing order.
    pub issues: Option<Sourced<Vec<u64>>>,
    /// GraphQL endpoint.
    pub api_url: Option<Sourced<String>>,
    /// Per-request timeout in seconds.
    pub timeout_secs: Option<Sourced<u64>>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub owner: Sourced<String>,
    pub repo: Sourced<String>,
    pub project_title: Sourced<String>,
    pub issues: Sourced<Vec<u64>>,
    pub api_url: Sourced<Url>,
    pub timeout: Duration,
}

impl RunConfig {
    /// Build a run configuration from explicit values, using default
    /// endpoint and timeout.
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        issues: Vec<u64>,
        project_title: impl Into<String>,
    ) -> Self {
        Self {
            owner: Sourced::cli(owner.into()),
            repo: Sourced::cli(repo.into()),
            project_title: Sourced::cli(project_title.into()),
            issues: Sourced::cli(issues),
            api_url: Sourced::default_value(
                Url::parse(DEFAULT_API_URL).expect("default API URL is valid"),
            ),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// The built-in defaults layer.
    pub fn defaults() -> Self {
        Self {
            owner: Some(Sourced::default_value(DEFAULT_OWNER.to_string())),
            repo: Some(Sourced::default_value(DEFAULT_REPO.to_string())),
            project_title: Some(Sourced::default_value(DEFAULT_PROJECT_TITLE.to_string())),
            issues: Some(Sourced::default_value(DEFAULT_ISSUES.collect())),
            api_url: Some(Sourced::default_value(DEFAULT_API_URL.to_string())),
            timeout_secs: Some(Sourced::default_value(DEFAULT_TIMEOUT_SECS)),
        }
    }

    /// Load configuration from the XDG config directory.
    ///
    /// A missing file yields an empty layer.
    #[must_use = "this returns the loaded configuration which should be used"]
    pub fn load_from_file() -> std::result::Result<Self, ConfigError> {
        match Self::get_config_path() {
            Some(path) => Self::load_from_path(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from an explicit TOML file path.
    pub fn load_from_path(path: &Path) -> std::result::Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::FileReadError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let file: ConfigFile = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let source = || ValueSource::File(path.to_path_buf());
        let issues = match file.issues {
            Some(IssuesEntry::List(list)) => Some(normalize_issue_list(list)?),
            Some(IssuesEntry::Ranges(ranges)) => Some(parse_issue_list(&ranges)?),
            None => None,
        };

        Ok(Self {
            owner: file.owner.map(|v| Sourced::new(v, source())),
            repo: file.repo.map(|v| Sourced::new(v, source())),
            project_title: file.project_title.map(|v| Sourced::new(v, source())),
            issues: issues.map(|v| Sourced::new(v, source())),
            api_url: file.api_url.map(|v| Sourced::new(v, source())),
            timeout_secs: file.timeout_secs.map(|v| Sourced::new(v, source())),
        })
    }

    /// Detect owner and repo from the `origin` remote of a local clone.
    pub fn detect_from_git_remote<P: AsRef<Path>>(repo_path: P) -> Self {
        match git_config::detect_github_remote(repo_path.as_ref()) {
            Ok(Some(remote)) => Self {
                owner: Some(Sourced::new(
                    remote.owner,
                    ValueSource::GitRemote(remote.url.clone()),
                )),
                repo: Some(Sourced::new(
                    remote.repository,
                    ValueSource::GitRemote(remote.url),
                )),
                ..Self::default()
            },
            Ok(None) => Self::default(),
            Err(e) => {
                tracing::warn!(error = %e, "could not read git remote");
                Self::default()
            }
        }
    }

    /// Load configuration from `BOARDLINK_*` environment variables.
    pub fn load_from_env() -> std::result::Result<Self, ConfigError> {
        Self::load_from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn load_from_lookup<F>(lookup: F) -> std::result::Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .map(|v| Sourced::new(v, ValueSource::Env(name.to_string())))
        };

        let issues = read("BOARDLINK_ISSUES")
            .map(|s| s.try_map(|v| parse_issue_list(&v)))
            .transpose()?;
        let timeout_secs = read("BOARDLINK_TIMEOUT_SECS")
            .map(|s| s.try_map(|v| parse_timeout(&v)))
            .transpose()?;

        Ok(Self {
            owner: read("BOARDLINK_OWNER"),
            repo: read("BOARDLINK_REPO"),
            project_title: read("BOARDLINK_PROJECT"),
            issues,
            api_url: read("BOARDLINK_API_URL"),
            timeout_secs,
        })
    }

    /// Merge this config with another, preferring values from other when they exist
    pub fn merge(self, other: Self) -> Self {
        Self {
            owner: other.owner.or(self.owner),
            repo: other.repo.or(self.repo),
            project_title: other.project_title.or(self.project_title),
            issues: other.issues.or(self.issues),
            api_url: other.api_url.or(self.api_url),
            timeout_secs: other.timeout_secs.or(self.timeout_secs),
        }
    }

    /// Validate the merged layers into a [`RunConfig`].
    pub fn resolve(self) -> std::result::Result<RunConfig, ConfigError> {
        let owner = required(self.owner, "owner", "BOARDLINK_OWNER")?;
        let repo = required(self.repo, "repo", "BOARDLINK_REPO")?;
        let project_title = required(self.project_title, "project", "BOARDLINK_PROJECT")?;

        let issues = self.issues.ok_or_else(|| ConfigError::MissingRequired {
            field: "issues".to_string(),
            env_var: "BOARDLINK_ISSUES".to_string(),
        })?;
        if issues.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "issues".to_string(),
                message: "at least one issue number is required".to_string(),
            });
        }

        let api_url = self
            .api_url
            .unwrap_or_else(|| Sourced::default_value(DEFAULT_API_URL.to_string()))
            .try_map(|raw| parse_api_url(&raw))?;

        let timeout_secs = self
            .timeout_secs
            .map(Sourced::into_value)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "timeout-secs".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }

        Ok(RunConfig {
            owner,
            repo,
            project_title,
            issues,
            api_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Get the XDG config file path for boardlink
    pub fn get_config_path() -> Option<PathBuf> {
        let config_dir = std::env::var("XDG_CONFIG_HOME")
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))?;

        Some(config_dir.join("boardlink").join("config.toml"))
    }

    /// Create a sample config file for user reference.
    ///
    /// Returns the path of the file; an existing file is left untouched.
    #[must_use = "this operation can fail and the result should be checked"]
    pub fn create_sample_config() -> Result<PathBuf> {
        let config_path = Self::get_config_path()
            .context("Could not determine the configuration directory")?;

        if config_path.exists() {
            return Ok(config_path);
        }

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let sample_config = format!(
            r#"# boardlink configuration
# Location: $XDG_CONFIG_HOME/boardlink/config.toml (defaults to ~/.config)
# Every value can also be set with a BOARDLINK_* environment variable or a CLI flag.

# Repository owner (user or organization login)
owner = "{owner}"

# Repository name
repo = "{repo}"

# Exact, case-sensitive title of the project board
project_title = "{title}"

# Issues to link: an array of numbers or a range string such as "45-56,60"
issues = "{first}-{last}"

# GraphQL endpoint (change for GitHub Enterprise Server)
# api_url = "{api}"

# Per-request timeout in seconds
# timeout_secs = {timeout}
"#,
            owner = DEFAULT_OWNER,
            repo = DEFAULT_REPO,
            title = DEFAULT_PROJECT_TITLE,
            first = DEFAULT_ISSUES.start(),
            last = DEFAULT_ISSUES.end(),
            api = DEFAULT_API_URL,
            timeout = DEFAULT_TIMEOUT_SECS,
        );

        fs::write(&config_path, sample_config)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

        Ok(config_path)
    }
}

fn required(
    value: Option<Sourced<String>>,
    field: &str,
    env_var: &str,
) -> std::result::Result<Sourced<String>, ConfigError> {
    match value {
        Some(v) if !v.trim().is_empty() => v.try_map(|s| Ok(s.trim().to_string())),
        _ => Err(ConfigError::MissingRequired {
            field: field.to_string(),
            env_var: env_var.to_string(),
        }),
    }
}

fn parse_timeout(raw: &str) -> std::result::Result<u64, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidValue {
            field: "timeout-secs".to_string(),
            message: format!("'{}' is not a whole number of seconds ({})", raw, e),
        })
}

fn parse_api_url(raw: &str) -> std::result::Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidValue {
        field: "api-url".to_string(),
        message: format!("'{}': {}", raw, e),
    })?;

    match url.scheme() {
        "https" | "http" => Ok(url),
        other => Err(ConfigError::InvalidValue {
            field: "api-url".to_string(),
            message: format!("unsupported scheme '{}'", other),
        }),
    }
}

/// Parse an issue list such as `"45-56, 60,62"`.
///
/// Items are comma separated; `a-b` expands to the inclusive range. Order of
/// first appearance is kept and repeated numbers are dropped.
pub fn parse_issue_list(input: &str) -> std::result::Result<Vec<u64>, ConfigError> {
    let invalid = |message: String| ConfigError::InvalidValue {
        field: "issues".to_string(),
        message,
    };
    let parse_number = |s: &str| -> std::result::Result<u64, ConfigError> {
        match s.trim().parse::<u64>() {
            Ok(0) => Err(invalid("issue numbers start at 1".to_string())),
            Ok(n) => Ok(n),
            Err(_) => Err(invalid(format!("'{}' is not an issue number", s.trim()))),
        }
    };

    let mut numbers = Vec::new();
    for item in input.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        match item.split_once('-') {
            Some((start, end)) => {
                let (start, end) = (parse_number(start)?, parse_number(end)?);
                if start > end {
                    return Err(invalid(format!("range '{}' runs backwards", item)));
                }
                if end - start >= MAX_ISSUE_RANGE {
                    return Err(invalid(format!(
                        "range '{}' spans more than {} issues",
                        item, MAX_ISSUE_RANGE
                    )));
                }
                numbers.extend(start..=end);
            }
            None => numbers.push(parse_number(item)?),
        }
    }

    normalize_issue_list(numbers)
}

fn normalize_issue_list(numbers: Vec<u64>) -> std::result::Result<Vec<u64>, ConfigError> {
    if numbers.contains(&0) {
        return Err(ConfigError::InvalidValue {
            field: "issues".to_string(),
            message: "issue numbers start at 1".to_string(),
        });
    }

    let mut seen = std::collections::HashSet::new();
    Ok(numbers.into_iter().filter(|n| seen.insert(*n)).collect())
}
