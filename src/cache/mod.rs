//! Response Cache
//!
//! Injectable store for enriched responses. Retention policy belongs to the
//! implementation; the client only reads, writes and evicts keys.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::response::EnrichedResponse;

/// Cache collaborator used by cached calls.
pub trait ResponseCache: Send + Sync {
    fn get(&self, key: &str) -> Option<EnrichedResponse>;
    fn set(&self, key: &str, value: EnrichedResponse);
    fn delete(&self, key: &str);
    fn clear(&self);
}

/// Process-local cache with optional retention.
#[derive(Default)]
pub struct InMemoryResponseCache {
    entries: Mutex<HashMap<String, (Instant, EnrichedResponse)>>,
    retention: Option<Duration>,
}

impl InMemoryResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries older than `retention` are treated as missing.
    pub fn with_retention(retention: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            retention: Some(retention),
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, (Instant, EnrichedResponse)>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ResponseCache for InMemoryResponseCache {
    fn get(&self, key: &str) -> Option<EnrichedResponse> {
        let mut entries = self.lock();
        let fresh = match (entries.get(key), self.retention) {
            (None, _) => return None,
            (Some((stored, _)), Some(retention)) => stored.elapsed() <= retention,
            (Some(_), None) => true,
        };

        if fresh {
            entries.get(key).map(|(_, value)| value.clone())
        } else {
            entries.remove(key);
            None
        }
    }

    /// Writing also drops every expired entry.
    fn set(&self, key: &str, value: EnrichedResponse) {
        let mut entries = self.lock();
        if let Some(retention) = self.retention {
            entries.retain(|_, (stored, _)| stored.elapsed() <= retention);
        }
        entries.insert(key.to_string(), (Instant::now(), value));
    }

    fn delete(&self, key: &str) {
        self.lock().remove(key);
    }

    fn clear(&self) {
        self.lock().clear();
    }
}
