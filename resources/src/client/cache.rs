use dashmap::DashMap;

/// Storage for GET response bodies, keyed by request URL.
pub trait ResponseCache: Send + Sync {
    fn get(&self, url: &str) -> Option<String>;

    fn set(&self, url: &str, body: &str);

    /// Drop the body stored for `url`, if any.
    fn remove(&self, url: &str);
}

/// A [`ResponseCache`] that lives as long as the process.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: DashMap<String, String>,
}

impl MemoryCache {
    pub fn new() -> Self {
        MemoryCache::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ResponseCache for MemoryCache {
    fn get(&self, url: &str) -> Option<String> {
        self.entries.get(url).map(|entry| entry.value().clone())
    }

    fn set(&self, url: &str, body: &str) {
        self.entries.insert(url.to_owned(), body.to_owned());
    }

    fn remove(&self, url: &str) {
        if self.entries.remove(url).is_some() {
            tracing::debug!("Evicted {} from response cache", url);
        }
    }
}
