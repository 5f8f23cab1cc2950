use crate::models::Repository;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// GitHub API rate limit information
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimit {
    pub limit: u32,
    pub remaining: u32,
    pub reset: i64,
}

/// Body of `GET /rate_limit`
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitResponse {
    pub resources: RateLimitResources,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitResources {
    pub core: RateLimit,
}

/// Body of `GET /user`
#[derive(Debug, Clone, Deserialize)]
pub struct AuthenticatedUser {
    pub login: String,
    #[serde(rename = "type")]
    pub account_type: String,
    /// Classic token scopes from `X-OAuth-Scopes`; `None` when the header is
    /// absent, as it is for fine-grained tokens
    #[serde(skip)]
    pub scopes: Option<Vec<String>>,
}

/// Error body returned by the REST API
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub message: String,
}

/// Repository as returned by `GET /users/{user}/repos`
#[derive(Debug, Clone, Deserialize)]
pub struct RestRepository {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub html_url: String,
    pub clone_url: String,
    pub language: Option<String>,
    pub stargazers_count: u64,
    pub forks_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub pushed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub private: bool,
    pub homepage: Option<String>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub fork: bool,
}

impl From<RestRepository> for Repository {
    fn from(repo: RestRepository) -> Self {
        Repository {
            id: repo.id,
            name: repo.name,
            full_name: repo.full_name,
            description: repo.description,
            url: repo.html_url,
            clone_url: repo.clone_url,
            language: repo.language,
            stars: repo.stargazers_count,
            forks: repo.forks_count,
            created_at: repo.created_at,
            updated_at: repo.updated_at,
            pushed_at: repo.pushed_at,
            topics: repo.topics,
            is_private: repo.private,
            homepage: non_empty(repo.homepage),
            archived: repo.archived,
            is_fork: repo.fork,
        }
    }
}

/// GraphQL request envelope
#[derive(Debug, serde::Serialize)]
pub struct GraphQlRequest<'a, V> {
    pub query: &'a str,
    pub variables: V,
}

/// GraphQL response envelope
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PinnedData {
    pub user: Option<PinnedUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinnedUser {
    pub pinned_items: Connection<PinnedRepository>,
}

#[derive(Debug, Deserialize)]
pub struct Connection<T> {
    pub nodes: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub struct NamedNode {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct TopicNode {
    pub topic: NamedNode,
}

/// Pinned repository node from the GraphQL `pinnedItems` connection
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinnedRepository {
    pub database_id: Option<u64>,
    pub name: String,
    pub name_with_owner: String,
    pub description: Option<String>,
    pub url: String,
    pub homepage_url: Option<String>,
    pub primary_language: Option<NamedNode>,
    pub stargazer_count: u64,
    pub fork_count: u64,
    pub is_fork: bool,
    pub is_private: bool,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub pushed_at: Option<DateTime<Utc>>,
    pub repository_topics: Connection<TopicNode>,
}

impl From<PinnedRepository> for Repository {
    fn from(repo: PinnedRepository) -> Self {
        let clone_url = format!("{}.git", repo.url);
        Repository {
            id: repo.database_id.unwrap_or_default(),
            name: repo.name,
            full_name: repo.name_with_owner,
            description: repo.description,
            url: repo.url,
            clone_url,
            language: repo.primary_language.map(|l| l.name),
            stars: repo.stargazer_count,
            forks: repo.fork_count,
            created_at: repo.created_at,
            updated_at: repo.updated_at,
            pushed_at: repo.pushed_at,
            topics: repo
                .repository_topics
                .nodes
                .into_iter()
                .map(|n| n.topic.name)
                .collect(),
            is_private: repo.is_private,
            homepage: non_empty(repo.homepage_url),
            archived: repo.is_archived,
            is_fork: repo.is_fork,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rest_repository_normalization() {
        let body = r#"{
            "id": 1296269,
            "name": "Hello-World",
            "full_name": "octocat/Hello-World",
            "description": "This your first repo!",
            "html_url": "https://github.com/octocat/Hello-World",
            "clone_url": "https://github.com/octocat/Hello-World.git",
            "language": "Rust",
            "stargazers_count": 80,
            "forks_count": 9,
            "created_at": "2011-01-26T19:01:12Z",
            "updated_at": "2011-01-26T19:14:43Z",
            "pushed_at": "2011-01-26T19:06:43Z",
            "topics": ["octocat", "api"],
            "private": false,
            "homepage": "",
            "archived": false,
            "fork": true,
            "watchers_count": 80
        }"#;

        let raw: RestRepository = serde_json::from_str(body).unwrap();
        let repo = Repository::from(raw);

        assert_eq!(repo.id, 1296269);
        assert_eq!(repo.full_name, "octocat/Hello-World");
        assert_eq!(repo.url, "https://github.com/octocat/Hello-World");
        assert_eq!(repo.stars, 80);
        assert_eq!(repo.forks, 9);
        assert_eq!(repo.topics, vec!["octocat", "api"]);
        assert_eq!(repo.homepage, None);
        assert!(repo.is_fork);
    }

    #[test]
    fn test_rest_repository_tolerates_missing_optionals() {
        let body = r#"{
            "id": 7,
            "name": "empty",
            "full_name": "octocat/empty",
            "description": null,
            "html_url": "https://github.com/octocat/empty",
            "clone_url": "https://github.com/octocat/empty.git",
            "language": null,
            "stargazers_count": 0,
            "forks_count": 0,
            "created_at": "2020-05-01T00:00:00Z",
            "updated_at": "2020-05-01T00:00:00Z",
            "pushed_at": null,
            "homepage": null
        }"#;

        let repo = Repository::from(serde_json::from_str::<RestRepository>(body).unwrap());
        assert!(repo.topics.is_empty());
        assert!(repo.pushed_at.is_none());
        assert!(!repo.archived);
        assert!(!repo.is_fork);
    }

    #[test]
    fn test_pinned_repository_normalization() {
        let body = r#"{
            "data": {
                "user": {
                    "pinnedItems": {
                        "nodes": [{
                            "databaseId": 99,
                            "name": "dotfiles",
                            "nameWithOwner": "octocat/dotfiles",
                            "description": null,
                            "url": "https://github.com/octocat/dotfiles",
                            "homepageUrl": "https://octo.cat",
                            "primaryLanguage": {"name": "Shell"},
                            "stargazerCount": 12,
                            "forkCount": 2,
                            "isFork": false,
                            "isPrivate": false,
                            "isArchived": true,
                            "createdAt": "2019-02-01T10:00:00Z",
                            "updatedAt": "2024-02-01T10:00:00Z",
                            "pushedAt": "2024-01-31T10:00:00Z",
                            "repositoryTopics": {"nodes": [{"topic": {"name": "zsh"}}]}
                        }]
                    }
                }
            }
        }"#;

        let response: GraphQlResponse<PinnedData> = serde_json::from_str(body).unwrap();
        assert!(response.errors.is_empty());

        let node = response
            .data
            .and_then(|d| d.user)
            .map(|u| u.pinned_items.nodes)
            .unwrap()
            .remove(0);
        let repo = Repository::from(node);

        assert_eq!(repo.id, 99);
        assert_eq!(repo.full_name, "octocat/dotfiles");
        assert_eq!(repo.clone_url, "https://github.com/octocat/dotfiles.git");
        assert_eq!(repo.language.as_deref(), Some("Shell"));
        assert_eq!(repo.homepage.as_deref(), Some("https://octo.cat"));
        assert_eq!(repo.topics, vec!["zsh"]);
        assert!(repo.archived);
    }
}
