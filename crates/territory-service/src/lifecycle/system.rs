use crate::config::{ConfigError, ServiceConfig};
use crate::http::{build_router, AppState};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{error, info};

#[derive(Debug, thiserror::Error)]
pub enum SystemError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),

    #[error("Server task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// The running HTTP service.
///
/// ```ignore
/// let system = TerritorySystem::from_config(&config).await?;
/// tokio::signal::ctrl_c().await?;
/// system.shutdown().await?;
/// ```
pub struct TerritorySystem {
    /// Shared with the router; exposed so callers can refresh caches directly.
    pub state: AppState,
    local_addr: SocketAddr,
    shutdown_tx: oneshot::Sender<()>,
    handle: JoinHandle<std::io::Result<()>>,
}

impl TerritorySystem {
    /// Builds the backend and caches from `config`, binds, and starts serving.
    pub async fn from_config(config: &ServiceConfig) -> Result<Self, SystemError> {
        let backend = config.backend()?;
        let state = AppState::new(backend, &config.dataset_names(), config.cache_policy());
        let listener = TcpListener::bind(config.bind)
            .await
            .map_err(|source| SystemError::Bind {
                addr: config.bind,
                source,
            })?;
        Self::start(state, listener)
    }

    /// Serves the API for `state` on an already bound listener.
    pub fn start(state: AppState, listener: TcpListener) -> Result<Self, SystemError> {
        let local_addr = listener.local_addr()?;
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let app = build_router(state.clone());

        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    // A dropped sender also stops the server.
                    let _ = shutdown_rx.await;
                })
                .await
        });

        info!(addr = %local_addr, "Territory API listening");
        Ok(Self {
            state,
            local_addr,
            shutdown_tx,
            handle,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stops accepting connections and waits for in-flight requests to finish.
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down territory API...");
        let _ = self.shutdown_tx.send(());
        match self.handle.await? {
            Ok(()) => {
                info!("Territory API stopped");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Server exited with error");
                Err(SystemError::Serve(e))
            }
        }
    }
}
