//! Cached read views keyed by path
//!
//! A successful mutation hands back the paths whose views went stale; the
//! boundary invalidates them here so the next read re-fetches from the store.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Trait for view caches
///
/// Every path carries a generation that [`ViewCache::invalidate`] bumps. A
/// reader takes the generation before fetching from the store and hands it
/// back to [`ViewCache::put`], so a body fetched before a write can never be
/// cached after that write's invalidation.
#[async_trait]
pub trait ViewCache: Send + Sync {
    /// Cached body for `path`, if still fresh
    async fn get(&self, path: &str) -> Result<Option<Value>>;

    /// Current generation of `path`
    async fn generation(&self, path: &str) -> Result<u64>;

    /// Store the rendered body for `path` if `path` is still at `generation`
    ///
    /// Returns whether the body was stored.
    async fn put(&self, path: &str, body: Value, generation: u64) -> Result<bool>;

    /// Mark `path` stale
    async fn invalidate(&self, path: &str) -> Result<()>;
}

#[derive(Default)]
struct CachedView {
    generation: u64,
    body: Option<Value>,
}

/// In-memory view cache
///
/// Uses RwLock for thread-safe access.
#[derive(Clone, Default)]
pub struct InMemoryViewCache {
    views: Arc<RwLock<HashMap<String, CachedView>>>,
}

impl InMemoryViewCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a fresh body is held for `path`
    pub fn is_cached(&self, path: &str) -> bool {
        self.views
            .read()
            .map(|views| views.get(path).is_some_and(|view| view.body.is_some()))
            .unwrap_or(false)
    }
}

#[async_trait]
impl ViewCache for InMemoryViewCache {
    async fn get(&self, path: &str) -> Result<Option<Value>> {
        let views = self
            .views
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(views.get(path).and_then(|view| view.body.clone()))
    }

    async fn generation(&self, path: &str) -> Result<u64> {
        let views = self
            .views
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(views.get(path).map_or(0, |view| view.generation))
    }

    async fn put(&self, path: &str, body: Value, generation: u64) -> Result<bool> {
        let mut views = self
            .views
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let view = views.entry(path.to_string()).or_default();
        if view.generation != generation {
            tracing::debug!(path, "stale view not cached");
            return Ok(false);
        }
        view.body = Some(body);
        Ok(true)
    }

    async fn invalidate(&self, path: &str) -> Result<()> {
        let mut views = self
            .views
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let view = views.entry(path.to_string()).or_default();
        view.generation += 1;
        if view.body.take().is_some() {
            tracing::debug!(path, "view invalidated");
        }
        Ok(())
    }
}
