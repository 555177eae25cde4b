use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use sha2::{Digest, Sha256};
use tokio::sync::RwLock;

/// Inputs that determine a completion. Credentials are never part of the key;
/// the completion client receives them as a separate argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKey {
    pub content: String,
    pub count: u8,
    pub topic: Option<String>,
    pub model: String,
}

impl CacheKey {
    pub fn new(content: &str, count: u8, topic: Option<&str>, model: &str) -> Self {
        Self {
            content: content.to_string(),
            count,
            topic: topic.map(str::to_string),
            model: model.to_string(),
        }
    }

    fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(content_digest(&self.content).as_bytes());
        hasher.update([0u8]);
        hasher.update([self.count]);
        hasher.update([0u8]);
        hasher.update(self.topic.as_deref().unwrap_or_default().as_bytes());
        hasher.update([0u8]);
        hasher.update(self.model.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

fn content_digest(content: &str) -> String {
    format!("{:x}", Sha256::digest(content.as_bytes()))
}

#[derive(Debug, Clone)]
struct CacheEntry {
    completion: String,
    content_digest: String,
    inserted_at: Instant,
}

/// Raw completions memoized by input with a fixed time-to-live.
pub struct GenerationCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl GenerationCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    pub async fn get(&self, key: &CacheKey) -> Option<String> {
        if !self.is_enabled() {
            return None;
        }

        let digest = key.digest();
        {
            let entries = self.entries.read().await;
            match entries.get(&digest) {
                Some(entry) if entry.inserted_at.elapsed() < self.ttl => {
                    return Some(entry.completion.clone());
                }
                Some(_) => {}
                None => return None,
            }
        }

        // Expired: evict under the write lock, rechecking in case of a fresh insert.
        let mut entries = self.entries.write().await;
        if entries
            .get(&digest)
            .is_some_and(|entry| entry.inserted_at.elapsed() >= self.ttl)
        {
            entries.remove(&digest);
            log::debug!("Evicted expired completion {}", &digest[..12]);
        }
        None
    }

    pub async fn insert(&self, key: &CacheKey, completion: impl Into<String>) {
        if !self.is_enabled() {
            return;
        }

        let entry = CacheEntry {
            completion: completion.into(),
            content_digest: content_digest(&key.content),
            inserted_at: Instant::now(),
        };
        let ttl = self.ttl;
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, existing| existing.inserted_at.elapsed() < ttl);
        let expired = before - entries.len();
        if expired > 0 {
            log::debug!("Swept {} expired completion(s)", expired);
        }
        entries.insert(key.digest(), entry);
    }

    /// Drops every cached completion generated from `content`.
    pub async fn invalidate_content(&self, content: &str) -> usize {
        let target = content_digest(content);
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.content_digest != target);
        let removed = before - entries.len();
        if removed > 0 {
            log::info!("Invalidated {} cached completion(s) for changed content", removed);
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(content: &str) -> CacheKey {
        CacheKey::new(content, 5, Some("Biology"), "test-model")
    }

    #[actix_web::test]
    async fn returns_cached_completion_within_ttl() {
        let cache = GenerationCache::new(Duration::from_secs(60));
        cache.insert(&key("notes"), "Question 1: ...").await;

        assert_eq!(cache.get(&key("notes")).await.as_deref(), Some("Question 1: ..."));
        assert_eq!(cache.get(&key("other")).await, None);
    }

    #[actix_web::test]
    async fn every_key_field_separates_entries() {
        let cache = GenerationCache::new(Duration::from_secs(60));
        cache.insert(&key("notes"), "cached").await;

        assert!(cache.get(&CacheKey::new("notes", 6, Some("Biology"), "test-model")).await.is_none());
        assert!(cache.get(&CacheKey::new("notes", 5, None, "test-model")).await.is_none());
        assert!(cache.get(&CacheKey::new("notes", 5, Some("Biology"), "other-model")).await.is_none());
    }

    #[actix_web::test]
    async fn expired_entries_are_evicted() {
        let cache = GenerationCache::new(Duration::from_millis(20));
        cache.insert(&key("notes"), "cached").await;

        tokio::time::sleep(Duration::from_millis(40)).await;

        assert_eq!(cache.get(&key("notes")).await, None);
        assert!(cache.is_empty().await);
    }

    #[actix_web::test]
    async fn insert_sweeps_entries_nobody_reads_again() {
        let cache = GenerationCache::new(Duration::from_millis(200));
        for i in 0..100 {
            cache.insert(&key(&format!("notes {}", i)), "cached").await;
        }
        assert_eq!(cache.len().await, 100);

        tokio::time::sleep(Duration::from_millis(300)).await;
        cache.insert(&key("fresh notes"), "cached").await;

        assert_eq!(cache.len().await, 1);
        assert!(cache.get(&key("fresh notes")).await.is_some());
    }

    #[actix_web::test]
    async fn zero_ttl_disables_caching() {
        let cache = GenerationCache::new(Duration::ZERO);
        cache.insert(&key("notes"), "cached").await;

        assert!(!cache.is_enabled());
        assert_eq!(cache.get(&key("notes")).await, None);
        assert_eq!(cache.len().await, 0);
    }

    #[actix_web::test]
    async fn invalidate_content_only_touches_matching_entries() {
        let cache = GenerationCache::new(Duration::from_secs(60));
        cache.insert(&key("old notes"), "a").await;
        cache.insert(&CacheKey::new("old notes", 3, None, "test-model"), "b").await;
        cache.insert(&key("other notes"), "c").await;

        assert_eq!(cache.invalidate_content("old notes").await, 2);
        assert_eq!(cache.len().await, 1);
        assert!(cache.get(&key("other notes")).await.is_some());
        assert_eq!(cache.invalidate_content("old notes").await, 0);
    }
}
