use moka::future::Cache;
use std::time::Duration;

use crate::utils::username_filter::normalize;

/// Recently confirmed taken usernames.
#[derive(Clone)]
pub struct UsernameCache {
    inner: Cache<String, ()>,
}

impl Default for UsernameCache {
    fn default() -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(50_000)
                .time_to_live(Duration::from_secs(86400)) // 24h TTL
                .build(),
        }
    }
}

impl UsernameCache {
    pub async fn mark_taken(&self, username: &str) {
        self.inner.insert(normalize(username), ()).await;
    }

    pub async fn is_taken(&self, username: &str) -> bool {
        self.inner.get(&normalize(username)).await.is_some()
    }

    /// Batch mark usernames as taken
    pub async fn batch_mark(&self, usernames: &[String]) {
        let futures: Vec<_> = usernames
            .iter()
            .map(|u| self.inner.insert(normalize(u), ()))
            .collect();

        futures::future::join_all(futures).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn marks_are_visible_regardless_of_case() {
        let cache = UsernameCache::default();
        assert!(!cache.is_taken("alice").await);

        cache.mark_taken("ALICE").await;
        assert!(cache.is_taken("alice").await);

        cache.batch_mark(&["bob".to_string()]).await;
        assert!(cache.is_taken("Bob").await);
    }
}
