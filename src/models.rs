use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Normalized repository record served by every listing endpoint
///
/// Field order here is the field order of the JSON output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub url: String,
    pub clone_url: String,
    pub language: Option<String>,
    pub stars: u64,
    pub forks: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub pushed_at: Option<DateTime<Utc>>,
    pub topics: Vec<String>,
    pub is_private: bool,
    pub homepage: Option<String>,
    pub archived: bool,
    /// Used for filtering only; not part of the public shape
    #[serde(skip)]
    pub is_fork: bool,
}

impl Repository {
    pub fn language_matches(&self, wanted: &[String]) -> bool {
        match &self.language {
            Some(language) => wanted.iter().any(|w| w.eq_ignore_ascii_case(language)),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repository() -> Repository {
        let at = "2024-01-01T00:00:00Z".parse().unwrap();
        Repository {
            id: 42,
            name: "hello".to_string(),
            full_name: "octocat/hello".to_string(),
            description: None,
            url: "https://github.com/octocat/hello".to_string(),
            clone_url: "https://github.com/octocat/hello.git".to_string(),
            language: Some("Rust".to_string()),
            stars: 3,
            forks: 1,
            created_at: at,
            updated_at: at,
            pushed_at: None,
            topics: vec!["cli".to_string()],
            is_private: false,
            homepage: None,
            archived: false,
            is_fork: true,
        }
    }

    #[test]
    fn test_json_field_set() {
        let json = serde_json::to_value(repository()).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), 16);
        for key in ["id", "clone_url", "stars", "forks", "topics", "is_private", "archived"] {
            assert!(object.contains_key(key), "missing {key}");
        }
        assert!(object["description"].is_null());
    }

    #[test]
    fn test_serialized_text_keeps_declaration_order() {
        let text = serde_json::to_string(&repository()).unwrap();
        let id = text.find("\"id\"").unwrap();
        let full_name = text.find("\"full_name\"").unwrap();
        let archived = text.find("\"archived\"").unwrap();
        assert!(id < full_name && full_name < archived);
        assert!(!text.contains("is_fork"));
        assert!(text.contains("\"created_at\":\"2024-01-01T00:00:00Z\""));
    }

    #[test]
    fn test_language_match_is_case_insensitive() {
        let repo = repository();
        assert!(repo.language_matches(&["rust".to_string()]));
        assert!(!repo.language_matches(&["go".to_string()]));

        let mut repo = repo;
        repo.language = None;
        assert!(!repo.language_matches(&["rust".to_string()]));
    }
}
