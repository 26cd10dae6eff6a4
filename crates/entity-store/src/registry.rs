//! # Store Registry
//!
//! Hands out one [`ResourceClient`] per resource, spawning the backing
//! [`ResourceActor`] the first time a resource is asked for. Two callers naming the
//! same resource always reach the same actor, which is what makes their
//! read-modify-write cycles sequential.

use crate::actor::ResourceActor;
use crate::backend::StorageBackend;
use crate::client::ResourceClient;
use crate::store::JsonStore;
use dashmap::DashMap;
use tokio::task::{JoinError, JoinHandle};
use tracing::{error, info};

const DEFAULT_BUFFER_SIZE: usize = 32;

struct ActorSlot {
    client: ResourceClient,
    handle: JoinHandle<()>,
}

/// Lazily started, per-resource actors sharing one [`JsonStore`].
///
/// Resources are keyed by the backend's absolute rendering of the locator, so
/// `reps.json` and `/cwd/reps.json` share an actor.
pub struct StoreRegistry<B: StorageBackend + ?Sized> {
    store: JsonStore<B>,
    actors: DashMap<String, ActorSlot>,
    buffer_size: usize,
}

impl<B: StorageBackend + ?Sized> StoreRegistry<B> {
    pub fn new(store: JsonStore<B>) -> Self {
        Self {
            store,
            actors: DashMap::new(),
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size.max(1);
        self
    }

    pub fn store(&self) -> &JsonStore<B> {
        &self.store
    }

    /// Returns the client for `locator`, starting its actor if needed.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn client(&self, locator: &str) -> ResourceClient {
        let key = self.store.backend().display_path(locator);
        self.actors
            .entry(key)
            .or_insert_with(|| {
                let (actor, client) =
                    ResourceActor::new(self.store.clone(), locator, self.buffer_size);
                let handle = tokio::spawn(actor.run());
                ActorSlot { client, handle }
            })
            .client
            .relabel(locator)
    }

    /// Number of actors currently running.
    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    /// Stops every actor and waits for it to finish.
    ///
    /// Each actor exits once the registry's client and every clone handed out
    /// earlier have been dropped; callers must release their clients first.
    /// Every actor is awaited even if one fails; the first failure is returned.
    pub async fn shutdown(&self) -> Result<(), JoinError> {
        info!(actors = self.actors.len(), "Shutting down store registry");
        let keys: Vec<String> = self.actors.iter().map(|entry| entry.key().clone()).collect();
        let mut first_failure = None;

        for key in keys {
            if let Some((_, slot)) = self.actors.remove(&key) {
                drop(slot.client);
                if let Err(e) = slot.handle.await {
                    error!(resource = %key, error = %e, "Actor task failed");
                    first_failure.get_or_insert(e);
                }
            }
        }

        match first_failure {
            Some(e) => Err(e),
            None => {
                info!("Store registry shutdown complete");
                Ok(())
            }
        }
    }
}
