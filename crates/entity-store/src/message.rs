//! # Resource Messages
//!
//! The requests a [`ResourceClient`](crate::ResourceClient) sends to a
//! [`ResourceActor`](crate::ResourceActor). One variant per store operation, each
//! carrying a oneshot channel for the reply.

use crate::entity::{Entity, EntityId};
use crate::error::StoreError;
use crate::store::WriteReceipt;
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, StoreError>>;

/// Internal message type sent to the actor that owns a resource.
///
/// Every variant maps to one [`JsonStore`](crate::JsonStore) operation on the
/// actor's resource; the actor runs them one at a time, in arrival order.
#[derive(Debug)]
pub enum ResourceRequest {
    Read {
        respond_to: Response<Value>,
    },
    Get {
        id: EntityId,
        respond_to: Response<Option<Value>>,
    },
    Create {
        entity: Entity,
        respond_to: Response<WriteReceipt>,
    },
    Update {
        id: EntityId,
        fields: Map<String, Value>,
        respond_to: Response<WriteReceipt>,
    },
    /// Carries the caller's spelling of the locator, which the receipt echoes.
    Delete {
        id: EntityId,
        locator: Arc<str>,
        respond_to: Response<WriteReceipt>,
    },
}
