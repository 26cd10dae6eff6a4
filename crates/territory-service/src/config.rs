//! # Configuration
//!
//! Command-line flags with environment fallbacks. The environment names are the
//! ones a deployed function app already sets (`AzureWebJobsStorage`,
//! `BLOB_CONTAINER_NAME`, and the per-dataset blob names), so an existing app
//! configuration works unchanged.
//!
//! ## Storage Selection
//!
//! | Connection string | Backend |
//! |-------------------|---------|
//! | absent | [`FsBackend`] over `<data-dir>/<container>/` |
//! | `BlobEndpoint=...;SharedAccessSignature=...` | [`BlobBackend`] |
//! | `AccountName=...;SharedAccessSignature=...` | [`BlobBackend`], endpoint derived from the account |
//! | account-key only | rejected with [`ConfigError::SharedKeyUnsupported`] |

use crate::blob::BlobBackend;
use crate::cache::CachePolicy;
use entity_store::{FsBackend, StorageBackend};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Errors raised while turning configuration into live components.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid storage connection string: {0}")]
    InvalidConnectionString(String),

    #[error("Storage connection strings with an account key are not supported; use a SAS connection string")]
    SharedKeyUnsupported,

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Settings for the `serve` command.
#[derive(Debug, Clone, clap::Args)]
pub struct ServiceConfig {
    /// Address the HTTP API listens on
    #[arg(long, env = "TERRITORY_BIND", default_value = "0.0.0.0:7071")]
    pub bind: SocketAddr,

    /// Blob storage connection string (SAS form)
    #[arg(long, env = "AzureWebJobsStorage", hide_env_values = true)]
    pub connection_string: Option<String>,

    /// Blob container holding the datasets
    #[arg(long, env = "BLOB_CONTAINER_NAME", default_value = "hso_storage_blob")]
    pub container: String,

    /// Blob name of the zip-code territory dataset
    #[arg(long, env = "BLOB_FILE_NAME", default_value = "searchByZip.json")]
    pub zip_blob: String,

    /// Blob name of the state representatives dataset
    #[arg(long, env = "STATES_BLOB_FILE_NAME", default_value = "states.json")]
    pub states_blob: String,

    /// Blob name of the sales representatives dataset
    #[arg(long, env = "SALES_REPS_BLOB_FILE_NAME", default_value = "salesReps.json")]
    pub sales_reps_blob: String,

    /// Local directory used when no connection string is set
    #[arg(long, env = "TERRITORY_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Reload datasets after this many seconds (default: never)
    #[arg(long, env = "TERRITORY_CACHE_TTL_SECS")]
    pub cache_ttl_secs: Option<u64>,
}

/// Blob names of the three datasets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetNames {
    pub zips: String,
    pub states: String,
    pub sales_reps: String,
}

impl Default for DatasetNames {
    fn default() -> Self {
        Self {
            zips: "searchByZip.json".to_string(),
            states: "states.json".to_string(),
            sales_reps: "salesReps.json".to_string(),
        }
    }
}

impl ServiceConfig {
    /// A configuration that serves datasets from `data_dir` with default names.
    pub fn local(data_dir: impl Into<PathBuf>) -> Self {
        let names = DatasetNames::default();
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 0)),
            connection_string: None,
            container: "hso_storage_blob".to_string(),
            zip_blob: names.zips,
            states_blob: names.states,
            sales_reps_blob: names.sales_reps,
            data_dir: data_dir.into(),
            cache_ttl_secs: None,
        }
    }

    pub fn dataset_names(&self) -> DatasetNames {
        DatasetNames {
            zips: self.zip_blob.clone(),
            states: self.states_blob.clone(),
            sales_reps: self.sales_reps_blob.clone(),
        }
    }

    pub fn cache_policy(&self) -> CachePolicy {
        CachePolicy {
            ttl: self.cache_ttl_secs.map(Duration::from_secs),
        }
    }

    /// Builds the backend the datasets are loaded from.
    pub fn backend(&self) -> Result<Arc<dyn StorageBackend>, ConfigError> {
        match &self.connection_string {
            None => Ok(Arc::new(FsBackend::rooted(self.data_dir.join(&self.container)))),
            Some(raw) => {
                let target = ConnectionString::parse(raw)?.blob_target()?;
                let backend = BlobBackend::new(&target.endpoint, &self.container, target.sas)?;
                Ok(Arc::new(backend))
            }
        }
    }
}

/// Where and how to reach blob storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobTarget {
    pub endpoint: String,
    pub sas: Option<String>,
}

/// A parsed storage connection string (`Key=Value;Key=Value`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionString {
    pub protocol: Option<String>,
    pub account_name: Option<String>,
    pub account_key: Option<String>,
    pub blob_endpoint: Option<String>,
    pub endpoint_suffix: Option<String>,
    pub shared_access_signature: Option<String>,
}

impl ConnectionString {
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let mut parsed = Self::default();
        for part in raw.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = part.split_once('=').ok_or_else(|| {
                ConfigError::InvalidConnectionString(format!("segment `{part}` has no `=`"))
            })?;
            let value = Some(value.trim().to_string());
            match key.trim().to_ascii_lowercase().as_str() {
                "defaultendpointsprotocol" => parsed.protocol = value,
                "accountname" => parsed.account_name = value,
                "accountkey" => parsed.account_key = value,
                "blobendpoint" => parsed.blob_endpoint = value,
                "endpointsuffix" => parsed.endpoint_suffix = value,
                "sharedaccesssignature" => parsed.shared_access_signature = value,
                // Queue, table, and file endpoints are irrelevant here.
                _ => {}
            }
        }
        Ok(parsed)
    }

    /// Resolves the blob endpoint and SAS token this string describes.
    pub fn blob_target(&self) -> Result<BlobTarget, ConfigError> {
        let Some(sas) = self.shared_access_signature.clone() else {
            return Err(if self.account_key.is_some() {
                ConfigError::SharedKeyUnsupported
            } else {
                ConfigError::InvalidConnectionString(
                    "missing SharedAccessSignature".to_string(),
                )
            });
        };

        let endpoint = match (&self.blob_endpoint, &self.account_name) {
            (Some(endpoint), _) => endpoint.trim_end_matches('/').to_string(),
            (None, Some(account)) => format!(
                "{}://{}.blob.{}",
                self.protocol.as_deref().unwrap_or("https"),
                account,
                self.endpoint_suffix.as_deref().unwrap_or("core.windows.net"),
            ),
            (None, None) => {
                return Err(ConfigError::InvalidConnectionString(
                    "needs BlobEndpoint or AccountName".to_string(),
                ))
            }
        };

        Ok(BlobTarget {
            endpoint,
            sas: Some(sas),
        })
    }
}
