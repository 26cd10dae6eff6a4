//! # Store Errors
//!
//! Every failure the store can report, in one enum. Errors from the backend and
//! from JSON parsing are wrapped with the resource they came from but otherwise
//! travel to the caller untouched: no retries, no fallbacks. Callers that need to
//! tell a malformed document apart from an unreadable one use [`StoreError::is_parse`].

use crate::entity::EntityId;

/// Errors raised by the JSON store, its backends, and its actors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The resource could not be read, written, or probed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The resource holds text that is not valid JSON.
    #[error("Invalid JSON in {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// The resource's top-level value is not an array of entities.
    #[error("JSON file does not contain an array of entities.")]
    Shape { path: String },

    /// No entity in the resource carries the identifier.
    #[error("Entity with ID {id} not found.")]
    NotFound { id: EntityId },

    /// Create was asked to append an identifier that is already taken.
    #[error("Entity with ID {id} already exists.")]
    DuplicateId { id: EntityId },

    /// The supplied entity failed boundary validation.
    #[error("Invalid entity: {0}")]
    InvalidEntity(String),

    /// A remote backend failed below the I/O layer (HTTP status, transport).
    #[error("Backend error on {path}: {source}")]
    Transport {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Actor closed")]
    ActorClosed,

    #[error("Actor dropped response channel")]
    ActorDropped,
}

impl StoreError {
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }

    /// True if the failure is a JSON syntax (or data) error.
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }

    /// True if the resource itself does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}
