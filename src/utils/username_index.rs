use anyhow::{Result, anyhow};
use futures_util::StreamExt;
use tracing::{debug, info};

use crate::db::DbPool;
use crate::utils::{username_cache::UsernameCache, username_filter::UsernameFilter};

/// Layered username lookup: cuckoo filter (fast negative), moka cache
/// (fast positive), then the database.
#[derive(Default)]
pub struct UsernameIndex {
    filter: UsernameFilter,
    cache: UsernameCache,
}

impl UsernameIndex {
    /// true  => username AVAILABLE
    /// false => username TAKEN
    pub async fn is_available(&self, username: &str, pool: &DbPool) -> Result<bool, sqlx::Error> {
        if !self.filter.might_exist(username) {
            return Ok(true);
        }

        if self.cache.is_taken(username).await {
            return Ok(false);
        }

        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = ? LIMIT 1)",
        )
        .bind(username)
        .fetch_one(pool)
        .await?;

        if exists {
            self.cache.mark_taken(username).await;
        } else {
            debug!(username, "Username filter false positive");
        }

        Ok(!exists)
    }

    pub async fn mark_taken(&self, username: &str) {
        self.filter.insert(username);
        self.cache.mark_taken(username).await;
    }

    /// Loads every existing username into the filter and cache, streaming
    /// rows in batches.
    pub async fn warmup(&self, pool: &DbPool, batch_size: usize) -> Result<usize> {
        let mut stream =
            sqlx::query_as::<_, (String,)>("SELECT username FROM users").fetch(pool);

        let mut batch = Vec::with_capacity(batch_size);
        let mut total = 0usize;

        while let Some(row) = stream.next().await {
            let (username,) = row.map_err(|e| anyhow!("DB row fetch failed: {}", e))?;
            batch.push(username);
            total += 1;

            if batch.len() == batch_size {
                self.flush(&mut batch).await;
            }
        }

        if !batch.is_empty() {
            self.flush(&mut batch).await;
        }

        info!("Username index warmup complete: {} users", total);
        Ok(total)
    }

    async fn flush(&self, batch: &mut Vec<String>) {
        self.filter.insert_batch(batch);
        self.cache.batch_mark(batch).await;
        batch.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_pool;

    #[actix_web::test]
    async fn warmup_loads_existing_users() {
        let pool = setup_test_pool().await;
        let index = UsernameIndex::default();

        let loaded = index.warmup(&pool, 1).await.unwrap();
        assert_eq!(loaded, 1);
        assert!(!index.is_available("boss", &pool).await.unwrap());
        assert!(!index.is_available("BOSS", &pool).await.unwrap());
        assert!(index.is_available("nobody", &pool).await.unwrap());
    }
}
