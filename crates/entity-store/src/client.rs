//! # Resource Client
//!
//! The handle callers use to talk to a [`ResourceActor`](crate::ResourceActor).

use crate::entity::{Entity, EntityId};
use crate::error::StoreError;
use crate::message::ResourceRequest;
use crate::store::WriteReceipt;
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument};

/// A cloneable async handle to the actor that owns one resource.
///
/// All clones share one channel, so every operation issued through any of them
/// is applied by the actor in arrival order.
#[derive(Clone)]
pub struct ResourceClient {
    sender: mpsc::Sender<ResourceRequest>,
    locator: Arc<str>,
}

impl ResourceClient {
    pub fn new(sender: mpsc::Sender<ResourceRequest>, locator: &str) -> Self {
        Self {
            sender,
            locator: Arc::from(locator),
        }
    }

    /// A client on the same actor that reports `locator` as its resource.
    pub(crate) fn relabel(&self, locator: &str) -> Self {
        Self::new(self.sender.clone(), locator)
    }

    /// The resource this client addresses.
    pub fn locator(&self) -> &str {
        &self.locator
    }

    pub async fn read(&self) -> Result<Value, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.send(ResourceRequest::Read { respond_to }).await?;
        response.await.map_err(|_| StoreError::ActorDropped)?
    }

    pub async fn get(&self, id: EntityId) -> Result<Option<Value>, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.send(ResourceRequest::Get { id, respond_to }).await?;
        response.await.map_err(|_| StoreError::ActorDropped)?
    }

    #[instrument(skip(self, entity), fields(resource = %self.locator, id = %entity.id()))]
    pub async fn create(&self, entity: Entity) -> Result<WriteReceipt, StoreError> {
        debug!("Sending request");
        let (respond_to, response) = oneshot::channel();
        self.send(ResourceRequest::Create { entity, respond_to })
            .await?;
        response.await.map_err(|_| StoreError::ActorDropped)?
    }

    #[instrument(skip(self, fields), fields(resource = %self.locator))]
    pub async fn update(
        &self,
        id: EntityId,
        fields: Map<String, Value>,
    ) -> Result<WriteReceipt, StoreError> {
        debug!("Sending request");
        let (respond_to, response) = oneshot::channel();
        self.send(ResourceRequest::Update {
            id,
            fields,
            respond_to,
        })
        .await?;
        response.await.map_err(|_| StoreError::ActorDropped)?
    }

    #[instrument(skip(self), fields(resource = %self.locator))]
    pub async fn delete(&self, id: EntityId) -> Result<WriteReceipt, StoreError> {
        debug!("Sending request");
        let (respond_to, response) = oneshot::channel();
        self.send(ResourceRequest::Delete {
            id,
            locator: Arc::clone(&self.locator),
            respond_to,
        })
        .await?;
        response.await.map_err(|_| StoreError::ActorDropped)?
    }

    async fn send(&self, request: ResourceRequest) -> Result<(), StoreError> {
        self.sender
            .send(request)
            .await
            .map_err(|_| StoreError::ActorClosed)
    }
}
