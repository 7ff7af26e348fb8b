use autoscale_cuckoo_filter::CuckooFilter;
use std::sync::RwLock;

/// Expected capacity and false-positive rate.
/// Tune these based on real user counts.
const FILTER_CAPACITY: usize = 10_000;
const FALSE_POSITIVE_RATE: f64 = 0.001;

/// Folds ASCII case only, the same way SQLite's `NOCASE` collation does.
#[inline]
pub fn normalize(username: &str) -> String {
    username.trim().to_ascii_lowercase()
}

/// Probabilistic set of taken usernames. A miss means the name is free.
pub struct UsernameFilter {
    inner: RwLock<CuckooFilter<String>>,
}

impl Default for UsernameFilter {
    fn default() -> Self {
        Self {
            inner: RwLock::new(CuckooFilter::new(FILTER_CAPACITY, FALSE_POSITIVE_RATE)),
        }
    }
}

impl UsernameFilter {
    /// Check if a username might exist (false positives possible)
    pub fn might_exist(&self, username: &str) -> bool {
        let username = normalize(username);
        // a poisoned lock falls through to the database check
        self.inner
            .read()
            .map(|f| f.contains(&username))
            .unwrap_or(true)
    }

    pub fn insert(&self, username: &str) {
        let username = normalize(username);
        if let Ok(mut filter) = self.inner.write() {
            filter.add(&username);
        }
    }

    pub fn insert_batch(&self, usernames: &[String]) {
        if let Ok(mut filter) = self.inner.write() {
            for username in usernames {
                filter.add(&normalize(username));
            }
        }
    }
}
