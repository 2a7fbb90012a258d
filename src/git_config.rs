//! Detection of the GitHub owner and repository from a local clone.
//!
//! Reads the `origin` remote of a repository and recognizes the usual
//! GitHub URL shapes (scp-style SSH, `ssh://`, and HTTPS, with or without a
//! trailing `.git`).

use anyhow::{Context, Result};
use regex::Regex;
use std::path::Path;
use std::process::Command;
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubRemote {
    pub host: String,
    pub owner: String,
    pub repository: String,
    pub url: String,
}

static SCP_REGEX: OnceLock<Regex> = OnceLock::new();
static SSH_URL_REGEX: OnceLock<Regex> = OnceLock::new();
static HTTPS_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_scp_regex() -> &'static Regex {
    SCP_REGEX.get_or_init(|| {
        Regex::new(r"^[^@/]+@([^:/]+):([^/]+)/([^/]+?)(?:\.git)?/?$")
            .expect("Failed to compile scp-style SSH regex")
    })
}

fn get_ssh_url_regex() -> &'static Regex {
    SSH_URL_REGEX.get_or_init(|| {
        Regex::new(r"^ssh://(?:[^@/]+@)?([^/:]+)(?::\d+)?/([^/]+)/([^/]+?)(?:\.git)?/?$")
            .expect("Failed to compile ssh:// regex")
    })
}

fn get_https_regex() -> &'static Regex {
    HTTPS_REGEX.get_or_init(|| {
        Regex::new(r"^https?://(?:[^@/]+@)?([^/]+)/([^/]+)/([^/]+?)(?:\.git)?/?$")
            .expect("Failed to compile HTTPS regex")
    })
}

/// Read `origin` from the repository at `repo_path` and parse it.
///
/// Returns `Ok(None)` when the path is not a git repository or the remote
/// does not look like an owner/repository URL.
pub fn detect_github_remote<P: AsRef<Path>>(repo_path: P) -> Result<Option<GitHubRemote>> {
    let repo_path = repo_path.as_ref();

    if !is_git_repository(repo_path)? {
        tracing::debug!(path = %repo_path.display(), "not a git repository");
        return Ok(None);
    }

    let remote_url = get_git_remote_url(repo_path)?;
    Ok(parse_github_remote(&remote_url))
}

fn is_git_repository<P: AsRef<Path>>(repo_path: P) -> Result<bool> {
    let output = Command::new("git")
        .current_dir(repo_path.as_ref())
        .args(["rev-parse", "--git-dir"])
        .output()
        .context("Failed to check if directory is a git repository")?;

    Ok(output.status.success())
}

fn get_git_remote_url<P: AsRef<Path>>(repo_path: P) -> Result<String> {
    let output = Command::new("git")
        .current_dir(repo_path.as_ref())
        .args(["remote", "get-url", "origin"])
        .output()
        .context("Failed to get git remote URL")?;

    if !output.status.success() {
        anyhow::bail!(
            "Failed to get git remote URL: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Parse an owner/repository pair out of a remote URL.
pub fn parse_github_remote(url: &str) -> Option<GitHubRemote> {
    let url = url.trim();
    let captures = get_scp_regex()
        .captures(url)
        .or_else(|| get_ssh_url_regex().captures(url))
        .or_else(|| get_https_regex().captures(url))?;

    Some(GitHubRemote {
        host: captures[1].to_string(),
        owner: captures[2].to_string(),
        repository: captures[3].to_string(),
        url: url.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scp_style_ssh_url() {
        let remote = parse_github_remote("git@github.com:liorkl/co-co.git").unwrap();

        assert_eq!(remote.host, "github.com");
        assert_eq!(remote.owner, "liorkl");
        assert_eq!(remote.repository, "co-co");
    }

    #[test]
    fn test_parse_scp_style_without_git_suffix() {
        let remote = parse_github_remote("git@github.com:liorkl/co-co").unwrap();

        assert_eq!(remote.owner, "liorkl");
        assert_eq!(remote.repository, "co-co");
    }

    #[test]
    fn test_parse_ssh_scheme_url() {
        let remote = parse_github_remote("ssh://git@github.com:22/acme/widgets.git").unwrap();

        assert_eq!(remote.host, "github.com");
        assert_eq!(remote.owner, "acme");
        assert_eq!(remote.repository, "widgets");
    }

    #[test]
    fn test_parse_https_url() {
        let remote = parse_github_remote("https://github.com/acme/widgets.git").unwrap();

        assert_eq!(remote.owner, "acme");
        assert_eq!(remote.repository, "widgets");
        assert_eq!(remote.url, "https://github.com/acme/widgets.git");
    }

    #[test]
    fn test_parse_https_url_with_credentials_and_trailing_slash() {
        let remote = parse_github_remote("https://x-access-token@github.com/acme/widgets/").unwrap();

        assert_eq!(remote.owner, "acme");
        assert_eq!(remote.repository, "widgets");
    }

    #[test]
    fn test_parse_enterprise_host() {
        let remote = parse_github_remote("git@github.example.com:platform/tools.git").unwrap();

        assert_eq!(remote.host, "github.example.com");
        assert_eq!(remote.owner, "platform");
        assert_eq!(remote.repository, "tools");
    }

    #[test]
    fn test_parse_rejects_paths_without_owner() {
        assert!(parse_github_remote("https://github.com/widgets").is_none());
        assert!(parse_github_remote("/srv/git/widgets.git").is_none());
        assert!(parse_github_remote("").is_none());
    }

    #[test]
    fn test_detect_outside_repository_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let detected = detect_github_remote(dir.path());
        // git may be absent on the test host; both outcomes mean "nothing detected"
        if let Ok(remote) = detected {
            assert!(remote.is_none());
        }
    }
}
