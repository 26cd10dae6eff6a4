//! # Resource Actor
//!
//! This module defines the [`ResourceActor`], the task that owns one JSON resource and
//! applies every operation on it one at a time. It is the "Server" side of the Actor
//! Model: the [`JsonStore`] cycles (load, modify, persist) never interleave for the
//! same resource, so two writers can no longer silently discard each other's changes.

use crate::backend::StorageBackend;
use crate::client::ResourceClient;
use crate::error::StoreError;
use crate::message::ResourceRequest;
use crate::store::JsonStore;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The actor that serializes all operations on a single resource.
///
/// # Architecture Note
/// This struct owns the receiver end of the channel and a [`JsonStore`] pointed at
/// one locator. It holds no cached copy of the resource: every message runs a full
/// store operation against the backend, and the next message is not taken off the
/// channel until that operation has finished.
///
/// # Usage Pattern
///
/// 1.  **Create**: Call `ResourceActor::new()` to get the `actor` and its `client`.
/// 2.  **Run**: Spawn `actor.run()` in a background task.
/// 3.  **Use**: Clone the client freely; drop every clone to stop the actor.
///
/// ```rust
/// use entity_store::mock::MemoryBackend;
/// use entity_store::{Entity, JsonStore, ResourceActor};
/// use serde_json::json;
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() {
///     let store = JsonStore::new(Arc::new(MemoryBackend::new()));
///     let (actor, client) = ResourceActor::new(store, "reps.json", 16);
///     tokio::spawn(actor.run());
///
///     let entity = Entity::try_from(json!({ "ID": 1, "name": "JB" })).unwrap();
///     let receipt = client.create(entity).await.unwrap();
///     assert!(receipt.ok);
/// }
/// ```
pub struct ResourceActor<B: StorageBackend + ?Sized> {
    receiver: mpsc::Receiver<ResourceRequest>,
    store: JsonStore<B>,
    locator: String,
}

impl<B: StorageBackend + ?Sized> ResourceActor<B> {
    /// Creates a new `ResourceActor` for `locator` and its associated `ResourceClient`.
    ///
    /// `buffer_size` is the channel capacity; when it is full, client calls wait.
    pub fn new(
        store: JsonStore<B>,
        locator: impl Into<String>,
        buffer_size: usize,
    ) -> (Self, ResourceClient) {
        let locator = locator.into();
        let (sender, receiver) = mpsc::channel(buffer_size);
        let client = ResourceClient::new(sender, &locator);
        let actor = Self {
            receiver,
            store,
            locator,
        };
        (actor, client)
    }

    /// Runs the actor's event loop until every client has been dropped.
    pub async fn run(mut self) {
        let resource = self.locator.clone();
        let resource = resource.as_str();
        info!(resource, "Actor started");
        let mut handled: u64 = 0;

        while let Some(msg) = self.receiver.recv().await {
            handled += 1;
            match msg {
                ResourceRequest::Read { respond_to } => {
                    debug!(resource, "Read");
                    let result = self.store.read(resource).await;
                    log_failure(resource, "Read", &result);
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Get { id, respond_to } => {
                    let result = self.store.get(resource, &id).await;
                    log_failure(resource, "Get", &result);
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Create { entity, respond_to } => {
                    let result = self.store.create(resource, entity).await;
                    log_failure(resource, "Create", &result);
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Update {
                    id,
                    fields,
                    respond_to,
                } => {
                    let result = self.store.update(resource, &id, fields).await;
                    log_failure(resource, "Update", &result);
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Delete {
                    id,
                    locator,
                    respond_to,
                } => {
                    let result = self.store.delete(&locator, &id).await;
                    log_failure(resource, "Delete", &result);
                    let _ = respond_to.send(result);
                }
            }
        }

        info!(resource, handled, "Shutdown");
    }
}

fn log_failure<T>(resource: &str, operation: &str, result: &Result<T, StoreError>) {
    if let Err(e) = result {
        warn!(resource, operation, error = %e, "Operation failed");
    }
}
