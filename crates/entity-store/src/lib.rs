//! # Entity Store
//!
//! CRUD over JSON documents, with one actor per document to keep concurrent writers
//! from clobbering each other.
//!
//! A **resource** is a named JSON document (a file, a blob) that holds an array of
//! **entities**. Each entity is a JSON object identified by its `ID` field. The crate
//! offers the four classic operations over such a resource (create, read, update,
//! delete) plus a read-by-ID, each as a complete load-modify-persist cycle.
//!
//! ## Architecture Overview
//!
//! The crate separates concerns into three layers:
//!
//! 1. **Backend Layer** ([`StorageBackend`]) - Where the bytes live: [`FsBackend`] for
//!    local files, [`mock::MemoryBackend`] for tests, or anything else that can probe,
//!    read, and overwrite a document.
//! 2. **Store Layer** ([`JsonStore`]) - The CRUD semantics: array-shape checks,
//!    identifier lookup, identifier preservation on update, pretty-printed persistence.
//! 3. **Actor Layer** ([`ResourceActor`], [`ResourceClient`], [`StoreRegistry`]) - One
//!    Tokio task per resource that applies operations sequentially.
//!
//! ## Quick Start
//!
//! ```rust
//! use entity_store::mock::MemoryBackend;
//! use entity_store::{Entity, EntityId, JsonStore, StoreRegistry};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let registry = StoreRegistry::new(JsonStore::new(Arc::new(MemoryBackend::new())));
//!     let reps = registry.client("reps.json");
//!
//!     // Create bootstraps the resource as `[]` when it does not exist yet.
//!     let jb = Entity::try_from(json!({ "ID": 999, "name": "JB" })).unwrap();
//!     reps.create(jb).await.unwrap();
//!
//!     let found = reps.get(EntityId::from(999_i64)).await.unwrap();
//!     assert_eq!(found.unwrap()["name"], "JB");
//! }
//! ```
//!
//! ## Concurrency Model
//!
//! - [`JsonStore`] on its own does no locking: two overlapping cycles on the same
//!   resource race, and the last writer wins.
//! - A [`ResourceActor`] owns one resource and processes messages **sequentially**, so
//!   operations sent through its [`ResourceClient`] never interleave.
//! - [`StoreRegistry`] guarantees one actor per resource; different resources proceed
//!   in parallel.
//!
//! ## Errors
//!
//! Everything fails with [`StoreError`]. Backend and parse errors are passed through
//! untouched, and [`StoreError::is_parse`] separates malformed JSON from I/O trouble.

pub mod actor;
pub mod backend;
pub mod client;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;
pub mod registry;
pub mod store;

// Re-export core types for convenience
pub use actor::ResourceActor;
pub use backend::{FsBackend, StorageBackend};
pub use client::ResourceClient;
pub use entity::{Entity, EntityId, ID_FIELD};
pub use error::StoreError;
pub use message::{ResourceRequest, Response};
pub use registry::StoreRegistry;
pub use store::{DuplicatePolicy, JsonStore, WriteReceipt};
