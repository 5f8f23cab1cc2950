pub mod clock;

pub use clock::{Clock, ManualClock, SystemClock};

use crate::models::Repository;
use crate::Result;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Cache key for the owner's full repository listing
pub const REPOSITORIES_KEY: &str = "repositories";

/// Cache key for the owner's pinned repositories
pub const PINNED_KEY: &str = "pinned";

/// Cache of upstream repository lists, shared by all handlers
pub type RepositoryCache = TtlCache<Arc<Vec<Repository>>>;

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    fetched_at: DateTime<Utc>,
    value: V,
}

/// Value returned by [`TtlCache::get_or_fetch`]
#[derive(Debug, Clone)]
pub struct Cached<V> {
    pub value: V,
    pub fetched_at: DateTime<Utc>,
    /// True when no fetch was made for this lookup
    pub from_cache: bool,
}

/// In-memory key/value cache with a single time-to-live.
///
/// The lock is never held across a fetch, so two concurrent misses for one
/// key both fetch and the later write wins. Entries are replaced whole and
/// live until the process exits.
pub struct TtlCache<V> {
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn is_fresh(&self, entry: &CacheEntry<V>, now: DateTime<Utc>) -> bool {
        match (now - entry.fetched_at).to_std() {
            Ok(elapsed) => elapsed < self.ttl,
            // fetched_at in the future: clock went backwards
            Err(_) => true,
        }
    }

    /// Return the cached value for `key`, fetching and storing it when the
    /// entry is missing, expired, or `force_refresh` is set.
    ///
    /// A failed fetch leaves any existing entry untouched.
    pub async fn get_or_fetch<F, Fut>(
        &self,
        key: &str,
        force_refresh: bool,
        fetch: F,
    ) -> Result<Cached<V>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>>,
    {
        if !force_refresh {
            let now = self.clock.now();
            let entries = self.entries.read().await;
            if let Some(entry) = entries.get(key).filter(|e| self.is_fresh(e, now)) {
                debug!("Cache hit for {}", key);
                return Ok(Cached {
                    value: entry.value.clone(),
                    fetched_at: entry.fetched_at,
                    from_cache: true,
                });
            }
        }

        if force_refresh {
            info!("Forced refresh for {}", key);
        } else {
            info!("Cache miss for {}, fetching from GitHub", key);
        }

        let value = fetch().await?;
        let fetched_at = self.clock.now();

        self.entries.write().await.insert(
            key.to_string(),
            CacheEntry {
                fetched_at,
                value: value.clone(),
            },
        );

        Ok(Cached {
            value,
            fetched_at,
            from_cache: false,
        })
    }
}
