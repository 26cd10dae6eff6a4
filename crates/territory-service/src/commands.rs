//! # Entity Commands
//!
//! The JSON CRUD helpers, exposed on the command line. Each command runs
//! through a [`StoreRegistry`] so it goes through the same per-resource actor as
//! any other writer in the process, and prints its result as JSON.
//!
//! ```bash
//! territory-service entity create --file reps.json --json '{"ID":999,"name":"JB"}'
//! territory-service entity get --file reps.json --id 999
//! territory-service entity update --file reps.json --id 999 --json '{"name":"JB Smith"}'
//! territory-service entity delete --file reps.json --id 999
//! ```

use entity_store::{
    DuplicatePolicy, Entity, EntityId, FsBackend, JsonStore, StorageBackend, StoreError, StoreRegistry,
};
use serde_json::{Map, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("--json is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("--json must be a JSON object")]
    NotAnObject,

    #[error("Failed to encode result: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Entity actor failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[derive(Debug, Clone, clap::Args)]
pub struct EntityArgs {
    /// Refuse to create an entity whose ID is already present
    #[arg(long, global = true)]
    pub reject_duplicates: bool,

    #[command(subcommand)]
    pub command: EntityCommand,
}

#[derive(Debug, Clone, clap::Subcommand)]
pub enum EntityCommand {
    /// Print the whole document
    Read {
        #[arg(long)]
        file: PathBuf,
    },
    /// Print the first entity with the given ID
    Get {
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        id: String,
    },
    /// Append an entity, creating the document if needed
    Create {
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        json: String,
    },
    /// Replace an entity's fields, keeping its ID
    Update {
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        id: String,
        #[arg(long)]
        json: String,
    },
    /// Remove an entity
    Delete {
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        id: String,
    },
}

impl EntityCommand {
    pub fn file(&self) -> &PathBuf {
        match self {
            Self::Read { file }
            | Self::Get { file, .. }
            | Self::Create { file, .. }
            | Self::Update { file, .. }
            | Self::Delete { file, .. } => file,
        }
    }
}

/// Runs one command against local files and shuts the registry down afterwards.
pub async fn execute(args: &EntityArgs) -> Result<Value, CommandError> {
    let policy = if args.reject_duplicates {
        DuplicatePolicy::Reject
    } else {
        DuplicatePolicy::Allow
    };
    let store = JsonStore::new(Arc::new(FsBackend::new())).with_duplicate_policy(policy);
    let registry = StoreRegistry::new(store);

    let result = run_entity_command(&registry, &args.command).await;
    registry.shutdown().await?;
    result
}

/// Runs one command through `registry`.
///
/// `get` on a missing ID fails with [`StoreError::NotFound`] so the caller sees
/// an error rather than `null`.
pub async fn run_entity_command<B: StorageBackend + ?Sized>(
    registry: &StoreRegistry<B>,
    command: &EntityCommand,
) -> Result<Value, CommandError> {
    let locator = command.file().to_string_lossy();
    let client = registry.client(&locator);
    debug!(resource = %locator, ?command, "Running entity command");

    match command {
        EntityCommand::Read { .. } => Ok(client.read().await?),
        EntityCommand::Get { id, .. } => {
            let id = EntityId::parse_arg(id);
            client
                .get(id.clone())
                .await?
                .ok_or(CommandError::Store(StoreError::NotFound { id }))
        }
        EntityCommand::Create { json, .. } => {
            let entity = Entity::try_from(parse_json(json)?)?;
            encode(&client.create(entity).await?)
        }
        EntityCommand::Update { id, json, .. } => {
            let fields = parse_object(json)?;
            encode(&client.update(EntityId::parse_arg(id), fields).await?)
        }
        EntityCommand::Delete { id, .. } => encode(&client.delete(EntityId::parse_arg(id)).await?),
    }
}

fn parse_json(raw: &str) -> Result<Value, CommandError> {
    serde_json::from_str(raw).map_err(CommandError::InvalidJson)
}

fn parse_object(raw: &str) -> Result<Map<String, Value>, CommandError> {
    match parse_json(raw)? {
        Value::Object(fields) => Ok(fields),
        _ => Err(CommandError::NotAnObject),
    }
}

fn encode<T: serde::Serialize>(value: &T) -> Result<Value, CommandError> {
    serde_json::to_value(value).map_err(CommandError::Encode)
}
