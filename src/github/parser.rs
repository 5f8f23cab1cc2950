use crate::{Error, Result};
use regex::Regex;
use std::sync::OnceLock;

/// Parsed GitHub repository identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryInfo {
    pub owner: String,
    pub repo: String,
}

impl RepositoryInfo {
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

fn name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9._-]{1,100}$").expect("static pattern"))
}

fn validate_segment(segment: &str, what: &str) -> Result<()> {
    if segment == "." || segment == ".." || !name_pattern().is_match(segment) {
        return Err(Error::InvalidParameter(format!(
            "Invalid repository {what}: {segment:?}"
        )));
    }
    Ok(())
}

/// Parse a repository reference from the languages route
/// Accepts formats:
/// - repo
/// - owner/repo
/// - github.com/owner/repo
/// - https://github.com/owner/repo(.git)
///
/// Only repositories of `owner` are accepted; the owner segment is compared
/// case-insensitively, as GitHub logins are.
pub fn parse_repository_name(input: &str, owner: &str) -> Result<RepositoryInfo> {
    let input = input.trim();

    // Remove trailing slashes and .git suffix
    let input = input.trim_end_matches('/').trim_end_matches(".git");

    // Remove protocol if present
    let input = input
        .strip_prefix("https://")
        .or_else(|| input.strip_prefix("http://"))
        .unwrap_or(input);

    // Remove github.com if present
    let input = input.strip_prefix("github.com/").unwrap_or(input);

    let parts: Vec<&str> = input.split('/').map(str::trim).collect();

    let (requested_owner, repo) = match parts.as_slice() {
        [repo] => (owner, *repo),
        [requested_owner, repo] => (*requested_owner, *repo),
        _ => {
            return Err(Error::InvalidParameter(
                "Invalid repository name. Expected: repo or owner/repo".to_string(),
            ))
        }
    };

    if requested_owner.is_empty() || repo.is_empty() {
        return Err(Error::InvalidParameter(
            "Repository owner and name cannot be empty".to_string(),
        ));
    }

    validate_segment(requested_owner, "owner")?;
    validate_segment(repo, "name")?;

    if !requested_owner.eq_ignore_ascii_case(owner) {
        return Err(Error::InvalidParameter(format!(
            "Only repositories owned by {owner} are available"
        )));
    }

    Ok(RepositoryInfo {
        owner: owner.to_string(),
        repo: repo.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_name_uses_configured_owner() {
        let info = parse_repository_name("dotfiles", "octocat").unwrap();
        assert_eq!(info.owner, "octocat");
        assert_eq!(info.repo, "dotfiles");
        assert_eq!(info.full_name(), "octocat/dotfiles");
    }

    #[test]
    fn test_parse_owner_and_repo() {
        let info = parse_repository_name("octocat/dotfiles", "octocat").unwrap();
        assert_eq!(info.full_name(), "octocat/dotfiles");
    }

    #[test]
    fn test_parse_full_https_url() {
        let info =
            parse_repository_name("https://github.com/octocat/engine.git", "octocat").unwrap();
        assert_eq!(info.owner, "octocat");
        assert_eq!(info.repo, "engine");
    }

    #[test]
    fn test_parse_without_protocol() {
        let info = parse_repository_name("github.com/octocat/engine/", "octocat").unwrap();
        assert_eq!(info.full_name(), "octocat/engine");
    }

    #[test]
    fn test_parse_owner_is_case_insensitive() {
        let info = parse_repository_name("OctoCat/engine", "octocat").unwrap();
        assert_eq!(info.full_name(), "octocat/engine");
    }

    #[test]
    fn test_parse_rejects_other_owners() {
        let err = parse_repository_name("some-org/private-thing", "octocat").unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(msg) if msg.contains("octocat")));

        assert!(parse_repository_name("https://github.com/rust-lang/cargo", "octocat").is_err());
    }

    #[test]
    fn test_dots_and_underscores_allowed() {
        let info = parse_repository_name("my_site.github.io", "octocat").unwrap();
        assert_eq!(info.repo, "my_site.github.io");
    }

    #[test]
    fn test_parse_rejects_traversal() {
        assert!(parse_repository_name("..", "octocat").is_err());
        assert!(parse_repository_name("a/b/c", "octocat").is_err());
    }

    #[test]
    fn test_parse_rejects_bad_characters() {
        let err = parse_repository_name("bad name?", "octocat").unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));
    }

    #[test]
    fn test_parse_empty_parts() {
        assert!(parse_repository_name("", "octocat").is_err());
        assert!(parse_repository_name("/repo", "octocat").is_err());
    }
}
