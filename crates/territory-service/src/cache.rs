//! # Dataset Cache
//!
//! Each lookup dataset is loaded from storage the first time it is needed and
//! kept for the life of the process. Updating a dataset in storage therefore has
//! no effect until the cache is refreshed, either explicitly or by an optional TTL.
//!
//! Failed loads are never cached: the next request tries again.

use entity_store::{StorageBackend, StoreError};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, info};

/// How long a loaded dataset stays valid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CachePolicy {
    /// `None` keeps data until it is explicitly invalidated.
    pub ttl: Option<Duration>,
}

struct Loaded<T> {
    data: Arc<Vec<T>>,
    at: Instant,
}

/// Process-wide cache of one typed dataset held at `locator` in `backend`.
pub struct DatasetCache<T> {
    backend: Arc<dyn StorageBackend>,
    locator: String,
    policy: CachePolicy,
    slot: RwLock<Option<Loaded<T>>>,
}

impl<T: DeserializeOwned + Send + Sync> DatasetCache<T> {
    pub fn new(backend: Arc<dyn StorageBackend>, locator: impl Into<String>, policy: CachePolicy) -> Self {
        Self {
            backend,
            locator: locator.into(),
            policy,
            slot: RwLock::new(None),
        }
    }

    pub fn locator(&self) -> &str {
        &self.locator
    }

    /// Returns the cached dataset, loading it first if absent or expired.
    ///
    /// # Errors
    /// - [`StoreError::Parse`] when the blob is not JSON or not a list of the expected records.
    /// - Any backend read error, unchanged.
    pub async fn get(&self) -> Result<Arc<Vec<T>>, StoreError> {
        {
            let slot = self.slot.read().await;
            if let Some(loaded) = slot.as_ref().filter(|l| self.is_fresh(l)) {
                return Ok(Arc::clone(&loaded.data));
            }
        }

        let mut slot = self.slot.write().await;
        // Another task may have loaded it while we waited for the lock.
        if let Some(loaded) = slot.as_ref().filter(|l| self.is_fresh(l)) {
            return Ok(Arc::clone(&loaded.data));
        }
        let data = Arc::new(self.load().await?);
        *slot = Some(Loaded {
            data: Arc::clone(&data),
            at: Instant::now(),
        });
        Ok(data)
    }

    /// Drops the cached copy; the next `get` reloads.
    pub async fn invalidate(&self) {
        debug!(dataset = %self.locator, "Invalidated");
        *self.slot.write().await = None;
    }

    /// Reloads now. On failure the previous copy is kept.
    pub async fn refresh(&self) -> Result<usize, StoreError> {
        let data = self.load().await?;
        let size = data.len();
        *self.slot.write().await = Some(Loaded {
            data: Arc::new(data),
            at: Instant::now(),
        });
        Ok(size)
    }

    pub async fn is_loaded(&self) -> bool {
        self.slot.read().await.is_some()
    }

    fn is_fresh(&self, loaded: &Loaded<T>) -> bool {
        match self.policy.ttl {
            Some(ttl) => loaded.at.elapsed() < ttl,
            None => true,
        }
    }

    async fn load(&self) -> Result<Vec<T>, StoreError> {
        let text = self.backend.read(&self.locator).await?;
        let data: Vec<T> =
            serde_json::from_str(&text).map_err(|e| StoreError::parse(&self.locator, e))?;
        info!(dataset = %self.locator, size = data.len(), "Loaded");
        Ok(data)
    }
}
