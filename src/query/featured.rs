use crate::models::Repository;
use chrono::{DateTime, Duration, Utc};

/// Number of featured repositories returned when no limit is given
pub const DEFAULT_FEATURED_LIMIT: i64 = 6;

/// Weights of the featured score
///
/// `score = stars * star_weight + forks * fork_weight + bonus`, where the
/// bonus is `recent_bonus` when the last push is within `recent_window_days`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankWeights {
    pub star_weight: u64,
    pub fork_weight: u64,
    pub recent_bonus: u64,
    pub recent_window_days: i64,
}

impl Default for RankWeights {
    fn default() -> Self {
        Self {
            star_weight: 2,
            fork_weight: 1,
            recent_bonus: 10,
            recent_window_days: 90,
        }
    }
}

impl RankWeights {
    fn recency_bonus(&self, pushed_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> u64 {
        match pushed_at {
            Some(pushed) if now - pushed <= Duration::days(self.recent_window_days) => {
                self.recent_bonus
            }
            _ => 0,
        }
    }

    pub fn score(&self, repo: &Repository, now: DateTime<Utc>) -> u64 {
        repo.stars
            .saturating_mul(self.star_weight)
            .saturating_add(repo.forks.saturating_mul(self.fork_weight))
            .saturating_add(self.recency_bonus(repo.pushed_at, now))
    }
}

/// Top `limit` non-archived, non-fork repositories by score, highest first.
///
/// Equal scores are ordered by `full_name`. A non-positive limit returns every
/// eligible repository.
pub fn rank(
    repositories: &[Repository],
    limit: i64,
    now: DateTime<Utc>,
    weights: &RankWeights,
) -> Vec<Repository> {
    let mut scored: Vec<(u64, &Repository)> = repositories
        .iter()
        .filter(|r| !r.archived && !r.is_fork)
        .map(|r| (weights.score(r, now), r))
        .collect();

    scored.sort_by(|(score_a, a), (score_b, b)| {
        score_b
            .cmp(score_a)
            .then_with(|| a.full_name.cmp(&b.full_name))
    });

    if limit > 0 {
        scored.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
    }

    scored.into_iter().map(|(_, r)| r.clone()).collect()
}
