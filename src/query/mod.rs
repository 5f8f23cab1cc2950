pub mod featured;

pub use featured::{rank, RankWeights};

use crate::models::Repository;
use crate::{Error, Result};
use std::str::FromStr;

/// Sort order for repository listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Most recently updated first
    #[default]
    Updated,
    /// Newest first
    Created,
    /// Most recently pushed first; never-pushed repositories last
    Pushed,
    /// Alphabetical by `owner/name`
    FullName,
}

impl FromStr for SortKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "updated" => Ok(SortKey::Updated),
            "created" => Ok(SortKey::Created),
            "pushed" => Ok(SortKey::Pushed),
            "full_name" => Ok(SortKey::FullName),
            other => Err(Error::InvalidParameter(format!(
                "Invalid sort value '{other}'. Expected one of: updated, created, pushed, full_name"
            ))),
        }
    }
}

/// Filters, ordering and limit applied to a repository listing
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    pub include_forks: bool,
    /// Languages to keep (case-insensitive); `None` or empty keeps all
    pub languages: Option<Vec<String>>,
    pub sort: SortKey,
    /// Positive values truncate; zero, negative or `None` return everything
    pub limit: Option<i64>,
}

/// Filter, sort and truncate `repositories` without touching the input
pub fn apply(repositories: &[Repository], options: &QueryOptions) -> Vec<Repository> {
    let languages = options.languages.as_deref().filter(|l| !l.is_empty());

    let mut selected: Vec<Repository> = repositories
        .iter()
        .filter(|r| options.include_forks || !r.is_fork)
        .filter(|r| languages.map_or(true, |wanted| r.language_matches(wanted)))
        .cloned()
        .collect();

    // sort_by is stable: equal keys keep upstream order
    match options.sort {
        SortKey::Updated => selected.sort_by(|a, b| b.updated_at.cmp(&a.updated_at)),
        SortKey::Created => selected.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortKey::Pushed => selected.sort_by(|a, b| b.pushed_at.cmp(&a.pushed_at)),
        SortKey::FullName => selected.sort_by(|a, b| a.full_name.cmp(&b.full_name)),
    }

    if let Some(limit) = options.limit.filter(|l| *l > 0) {
        selected.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
    }

    selected
}
