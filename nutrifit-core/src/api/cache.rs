//! TTL cache for plan responses.
//!
//! An explicit object injected into the HTTP client, not module state:
//! each client owns its cache, so tests and sessions never bleed into
//! each other.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use super::PlanSnapshot;

struct CachedPlan {
    stored_at: Instant,
    snapshot: PlanSnapshot,
}

/// In-memory plan cache with a fixed time-to-live.
#[derive(Debug)]
pub struct PlanCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CachedPlan>>,
}

impl std::fmt::Debug for CachedPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedPlan")
            .field("stored_at", &self.stored_at)
            .finish_non_exhaustive()
    }
}

impl PlanCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// A cache that never returns hits.
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Returns the cached snapshot for `key` if it is still fresh.
    pub fn get(&self, key: &str) -> Option<PlanSnapshot> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        match entries.get(key) {
            Some(cached) if cached.stored_at.elapsed() < self.ttl => {
                Some(cached.snapshot.clone())
            }
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn put(&self, key: impl Into<String>, snapshot: PlanSnapshot) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(
            key.into(),
            CachedPlan {
                stored_at: Instant::now(),
                snapshot,
            },
        );
    }

    /// Drop a single key, e.g. after a mutation invalidates the plan.
    pub fn invalidate(&self, key: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
    }
}
