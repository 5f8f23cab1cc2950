use crate::config::Settings;
use crate::github::GitHubClient;
use crate::Result;
use tracing::warn;

/// Number of repositories listed by `check`
const CHECK_SAMPLE_SIZE: u32 = 3;

/// Classic token scopes the service relies on; any one scope of a group suffices
const SCOPE_GROUPS: &[(&str, &[&str])] = &[
    ("repository access", &["repo", "public_repo"]),
    ("user access (needed for pinned repositories)", &["user", "read:user"]),
];

/// Summary of a successful credential check
#[derive(Debug, Clone)]
pub struct CheckReport {
    pub login: String,
    pub account_type: String,
    /// `None` when GitHub reported no classic scopes (fine-grained token)
    pub scopes: Option<Vec<String>>,
    pub sample: Vec<String>,
    pub rate_remaining: u32,
    pub rate_limit: u32,
    pub rate_reset: i64,
}

impl CheckReport {
    /// Scope groups the token has none of; empty when scopes are unknown
    pub fn missing_scopes(&self) -> Vec<&'static str> {
        let Some(scopes) = &self.scopes else {
            return Vec::new();
        };

        SCOPE_GROUPS
            .iter()
            .filter(|(_, accepted)| !scopes.iter().any(|s| accepted.contains(&s.as_str())))
            .map(|(group, _)| *group)
            .collect()
    }
}

/// Authenticate, list a few repositories and read the rate limit
pub async fn check(settings: &Settings) -> Result<CheckReport> {
    let client = GitHubClient::new(settings.github.clone())?;

    let user = client.authenticated_user().await?;
    let repos = client
        .fetch_repository_page(&settings.github.username, CHECK_SAMPLE_SIZE)
        .await?;
    let rate = client.core_rate_limit().await?;

    let report = CheckReport {
        login: user.login,
        account_type: user.account_type,
        scopes: user.scopes,
        sample: repos.into_iter().map(|r| r.name).collect(),
        rate_remaining: rate.remaining,
        rate_limit: rate.limit,
        rate_reset: rate.reset,
    };

    for group in report.missing_scopes() {
        warn!("Token is missing {}", group);
    }

    Ok(report)
}

pub fn print_check_report(settings: &Settings, report: &CheckReport) {
    println!("✓ Authenticated as {} ({})", report.login, report.account_type);

    match &report.scopes {
        Some(scopes) if scopes.is_empty() => println!("  Token scopes: (none)"),
        Some(scopes) => println!("  Token scopes: {}", scopes.join(", ")),
        None => println!("  Token scopes: not reported (fine-grained token)"),
    }
    for group in report.missing_scopes() {
        println!("⚠ Token is missing {group}");
    }

    if report.login != settings.github.username {
        println!(
            "  Note: serving repositories of {}, not the token owner",
            settings.github.username
        );
    }

    println!(
        "✓ Repository access for {} ({} most recent shown)",
        settings.github.username,
        report.sample.len()
    );
    for name in &report.sample {
        println!("  - {name}");
    }

    let reset = chrono::DateTime::from_timestamp(report.rate_reset, 0)
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| report.rate_reset.to_string());
    println!(
        "✓ Rate limit: {}/{} remaining (resets {})",
        report.rate_remaining, report.rate_limit, reset
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(scopes: Option<&[&str]>) -> CheckReport {
        CheckReport {
            login: "octocat".to_string(),
            account_type: "User".to_string(),
            scopes: scopes.map(|s| s.iter().map(|s| s.to_string()).collect()),
            sample: Vec::new(),
            rate_remaining: 5000,
            rate_limit: 5000,
            rate_reset: 0,
        }
    }

    #[test]
    fn test_missing_scopes() {
        assert!(report(Some(&["repo", "read:user"])).missing_scopes().is_empty());
        assert!(report(Some(&["public_repo", "user"])).missing_scopes().is_empty());

        let missing = report(Some(&["public_repo"])).missing_scopes();
        assert_eq!(missing.len(), 1);
        assert!(missing[0].starts_with("user access"));

        assert_eq!(report(Some(&[])).missing_scopes().len(), 2);
    }

    #[test]
    fn test_unknown_scopes_report_nothing_missing() {
        assert!(report(None).missing_scopes().is_empty());
    }
}
