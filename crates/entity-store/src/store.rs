//! # JSON Store
//!
//! [`JsonStore`] implements the four CRUD operations over a JSON resource, plus a
//! read-by-ID. Each call is one full load-modify-persist cycle: nothing is cached
//! between calls and nothing is locked. Serializing concurrent writers is the job of
//! [`ResourceActor`](crate::ResourceActor); use a [`StoreRegistry`](crate::StoreRegistry)
//! when more than one task may write to the same resource.
//!
//! ## Resource Shape
//!
//! A resource is expected to hold an array of entities.
//!
//! | Operation | Array | Single object | Anything else |
//! |-----------|-------|---------------|---------------|
//! | `read`    | returned as-is | returned as-is | returned as-is |
//! | `create`  | entity appended | `[object, entity]` | `[entity]` |
//! | `get`, `update`, `delete` | searched | [`StoreError::Shape`] | [`StoreError::Shape`] |
//!
//! Every write is the whole collection, pretty-printed with two-space indentation.

use crate::backend::StorageBackend;
use crate::entity::{Entity, EntityId, ID_FIELD};
use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info};

/// Whether `create` may append an identifier that is already present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Append unconditionally. Later lookups see the first match only.
    #[default]
    Allow,
    /// Fail with [`StoreError::DuplicateId`] before writing anything.
    Reject,
}

/// Success token returned by every write operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteReceipt {
    pub ok: bool,
    pub path: String,
}

impl WriteReceipt {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            ok: true,
            path: path.into(),
        }
    }
}

/// CRUD operations over JSON resources held by a [`StorageBackend`].
pub struct JsonStore<B: StorageBackend + ?Sized> {
    backend: Arc<B>,
    duplicates: DuplicatePolicy,
}

impl<B: StorageBackend + ?Sized> Clone for JsonStore<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            duplicates: self.duplicates,
        }
    }
}

impl<B: StorageBackend + ?Sized> JsonStore<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            duplicates: DuplicatePolicy::default(),
        }
    }

    pub fn with_duplicate_policy(mut self, duplicates: DuplicatePolicy) -> Self {
        self.duplicates = duplicates;
        self
    }

    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    pub fn duplicate_policy(&self) -> DuplicatePolicy {
        self.duplicates
    }

    /// Loads and parses a resource. Any JSON value is accepted.
    ///
    /// # Errors
    /// - [`StoreError::Io`] if the backend cannot read the resource.
    /// - [`StoreError::Parse`] if the text is not valid JSON.
    pub async fn read(&self, locator: &str) -> Result<Value, StoreError> {
        let text = self.backend.read(locator).await?;
        serde_json::from_str(&text).map_err(|e| StoreError::parse(locator, e))
    }

    /// Appends an entity to a resource, creating the resource as `[]` first if the
    /// existence probe fails.
    ///
    /// When the resource did not exist this performs two writes: the empty-array
    /// bootstrap and then the real content. If the second write fails the resource
    /// is left holding `[]`.
    pub async fn create(&self, locator: &str, entity: Entity) -> Result<WriteReceipt, StoreError> {
        let path = self.backend.display_path(locator);
        debug!(resource = locator, id = %entity.id(), "Create");

        if self.backend.probe(locator).await.is_err() {
            debug!(resource = locator, "Bootstrapping empty resource");
            self.persist(locator, &Value::Array(Vec::new())).await?;
        }

        let collection = match self.read(locator).await? {
            Value::Array(mut items) => {
                self.check_duplicate(&items, entity.id())?;
                items.push(entity.into_value());
                items
            }
            existing @ Value::Object(_) => {
                let mut items = vec![existing];
                self.check_duplicate(&items, entity.id())?;
                items.push(entity.into_value());
                items
            }
            _ => vec![entity.into_value()],
        };

        let size = collection.len();
        self.persist(locator, &Value::Array(collection)).await?;
        info!(resource = locator, size, "Created");
        Ok(WriteReceipt::new(path))
    }

    /// Returns the first entity whose identifier equals `id`.
    pub async fn get(&self, locator: &str, id: &EntityId) -> Result<Option<Value>, StoreError> {
        let items = self.read_array(locator).await?;
        let found = items.into_iter().find(|item| id.matches(item));
        debug!(resource = locator, %id, found = found.is_some(), "Get");
        Ok(found)
    }

    /// Replaces the first entity matching `id` with `fields`, keeping the original
    /// identifier. An `ID` inside `fields` is overwritten; its key position is kept.
    ///
    /// # Errors
    /// - [`StoreError::Shape`] if the resource is not an array.
    /// - [`StoreError::NotFound`] if no entity matches.
    /// - Read, parse, and write errors from the backend, unchanged.
    pub async fn update(
        &self,
        locator: &str,
        id: &EntityId,
        fields: Map<String, Value>,
    ) -> Result<WriteReceipt, StoreError> {
        let path = self.backend.display_path(locator);
        debug!(resource = locator, %id, "Update");

        let mut items = self.read_array(locator).await?;
        let index = Self::position(&items, id)?;

        let original_id = items[index]
            .get(ID_FIELD)
            .cloned()
            .unwrap_or_else(|| id.to_value());
        let mut replacement = fields;
        replacement.insert(ID_FIELD.to_string(), original_id);
        items[index] = Value::Object(replacement);

        self.persist(locator, &Value::Array(items)).await?;
        info!(resource = locator, %id, "Updated");
        Ok(WriteReceipt::new(path))
    }

    /// Removes the first entity matching `id`.
    ///
    /// The receipt carries the locator exactly as supplied, not its absolute form.
    pub async fn delete(&self, locator: &str, id: &EntityId) -> Result<WriteReceipt, StoreError> {
        debug!(resource = locator, %id, "Delete");
        self.backend.probe(locator).await?;

        let mut items = self.read_array(locator).await?;
        let index = Self::position(&items, id)?;
        items.remove(index);

        let size = items.len();
        self.persist(locator, &Value::Array(items)).await?;
        info!(resource = locator, %id, size, "Deleted");
        Ok(WriteReceipt::new(locator))
    }

    async fn read_array(&self, locator: &str) -> Result<Vec<Value>, StoreError> {
        match self.read(locator).await? {
            Value::Array(items) => Ok(items),
            _ => Err(StoreError::Shape {
                path: locator.to_string(),
            }),
        }
    }

    fn position(items: &[Value], id: &EntityId) -> Result<usize, StoreError> {
        items
            .iter()
            .position(|item| id.matches(item))
            .ok_or_else(|| StoreError::NotFound { id: id.clone() })
    }

    fn check_duplicate(&self, items: &[Value], id: &EntityId) -> Result<(), StoreError> {
        if self.duplicates == DuplicatePolicy::Reject && items.iter().any(|item| id.matches(item)) {
            return Err(StoreError::DuplicateId { id: id.clone() });
        }
        Ok(())
    }

    async fn persist(&self, locator: &str, value: &Value) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(value).map_err(|e| StoreError::parse(locator, e))?;
        self.backend.write(locator, &text).await
    }
}
