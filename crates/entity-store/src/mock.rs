//! # Test Doubles
//!
//! Two tools for testing code that sits on top of the store without touching disk.
//!
//! | Tool | Replaces | Use Case |
//! |------|----------|----------|
//! | [`MemoryBackend`] | [`FsBackend`](crate::FsBackend) | Exercising the real store/actor logic against in-memory resources, with write history and failure injection |
//! | [`create_mock_client`] | [`ResourceActor`](crate::ResourceActor) | Driving a [`ResourceClient`] from a hand-held channel to script responses or simulate a dead actor |
//!
//! ## Example
//!
//! ```rust
//! use entity_store::mock::MemoryBackend;
//! use entity_store::{Entity, JsonStore};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let backend = Arc::new(MemoryBackend::new().with_file("reps.json", r#"[{"ID":1}]"#));
//!     let store = JsonStore::new(backend.clone());
//!
//!     let entity = Entity::try_from(json!({ "ID": 2 })).unwrap();
//!     store.create("reps.json", entity).await.unwrap();
//!
//!     assert_eq!(backend.writes().len(), 1);
//! }
//! ```

use crate::backend::StorageBackend;
use crate::client::ResourceClient;
use crate::error::StoreError;
use crate::message::ResourceRequest;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::io;
use tokio::sync::mpsc;

#[derive(Debug, Clone)]
struct Failure {
    kind: io::ErrorKind,
    message: String,
}

impl Failure {
    fn to_error(&self, locator: &str) -> StoreError {
        StoreError::io(locator, io::Error::new(self.kind, self.message.clone()))
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    files: HashMap<String, String>,
    writes: Vec<(String, String)>,
    probes: Vec<String>,
    fail_probe: Option<Failure>,
    fail_read: Option<Failure>,
    fail_write: Option<Failure>,
    writes_before_failure: usize,
}

/// An in-memory [`StorageBackend`] that records what was written.
///
/// Every `write` call is appended to the write history, including calls that
/// were made to fail, so tests can assert on the exact text the store tried
/// to persist.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    state: Mutex<MemoryState>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a resource with raw text.
    pub fn with_file(self, locator: impl Into<String>, contents: impl Into<String>) -> Self {
        self.insert(locator, contents);
        self
    }

    pub fn insert(&self, locator: impl Into<String>, contents: impl Into<String>) {
        self.state
            .lock()
            .files
            .insert(locator.into(), contents.into());
    }

    /// Current contents of a resource, if it exists.
    pub fn contents(&self, locator: &str) -> Option<String> {
        self.state.lock().files.get(locator).cloned()
    }

    /// Every write attempted so far, in order, as `(locator, contents)`.
    pub fn writes(&self) -> Vec<(String, String)> {
        self.state.lock().writes.clone()
    }

    /// Every locator probed so far, in order.
    pub fn probes(&self) -> Vec<String> {
        self.state.lock().probes.clone()
    }

    /// Makes subsequent probes fail with the given error.
    pub fn fail_probes(&self, kind: io::ErrorKind, message: impl Into<String>) {
        self.state.lock().fail_probe = Some(Failure {
            kind,
            message: message.into(),
        });
    }

    /// Makes subsequent reads fail with the given error.
    pub fn fail_reads(&self, kind: io::ErrorKind, message: impl Into<String>) {
        self.state.lock().fail_read = Some(Failure {
            kind,
            message: message.into(),
        });
    }

    /// Makes subsequent writes fail with the given error. Attempts are still recorded.
    pub fn fail_writes(&self, kind: io::ErrorKind, message: impl Into<String>) {
        self.fail_writes_after(0, kind, message);
    }

    /// Lets the next `successes` writes through, then fails every later one.
    pub fn fail_writes_after(&self, successes: usize, kind: io::ErrorKind, message: impl Into<String>) {
        let mut state = self.state.lock();
        state.writes_before_failure = successes;
        state.fail_write = Some(Failure {
            kind,
            message: message.into(),
        });
    }

    pub fn clear_failures(&self) {
        let mut state = self.state.lock();
        state.fail_probe = None;
        state.fail_read = None;
        state.fail_write = None;
        state.writes_before_failure = 0;
    }
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    async fn probe(&self, locator: &str) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        state.probes.push(locator.to_string());
        if let Some(failure) = &state.fail_probe {
            return Err(failure.to_error(locator));
        }
        if state.files.contains_key(locator) {
            Ok(())
        } else {
            Err(StoreError::io(
                locator,
                io::Error::new(io::ErrorKind::NotFound, "no such resource"),
            ))
        }
    }

    async fn read(&self, locator: &str) -> Result<String, StoreError> {
        let state = self.state.lock();
        if let Some(failure) = &state.fail_read {
            return Err(failure.to_error(locator));
        }
        state.files.get(locator).cloned().ok_or_else(|| {
            StoreError::io(
                locator,
                io::Error::new(io::ErrorKind::NotFound, "no such resource"),
            )
        })
    }

    async fn write(&self, locator: &str, contents: &str) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        state
            .writes
            .push((locator.to_string(), contents.to_string()));
        if state.writes_before_failure > 0 {
            state.writes_before_failure -= 1;
        } else if let Some(failure) = &state.fail_write {
            return Err(failure.to_error(locator));
        }
        state
            .files
            .insert(locator.to_string(), contents.to_string());
        Ok(())
    }

    fn display_path(&self, locator: &str) -> String {
        if locator.starts_with('/') {
            locator.to_string()
        } else {
            format!("/memory/{}", locator)
        }
    }
}

/// Creates a client and the receiver its requests arrive on.
///
/// Nothing answers the requests unless the test does: pull them off the
/// receiver with [`next_request`] and reply through `respond_to`, or drop the
/// receiver to simulate an actor that is gone.
pub fn create_mock_client(
    locator: &str,
    buffer_size: usize,
) -> (ResourceClient, mpsc::Receiver<ResourceRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender, locator), receiver)
}

/// Waits for the next request sent by a mock client.
pub async fn next_request(
    receiver: &mut mpsc::Receiver<ResourceRequest>,
) -> Option<ResourceRequest> {
    receiver.recv().await
}
