//! # Service Lifecycle
//!
//! Starting and stopping the service as a unit.
//!
//! 1. **Wire** - [`ServiceConfig`](crate::config::ServiceConfig) picks the storage
//!    backend; one [`DatasetCache`](crate::cache::DatasetCache) per dataset is built
//!    over it and handed to the router.
//! 2. **Serve** - [`TerritorySystem::start`] spawns the axum server on an already
//!    bound listener, so callers (and tests) can bind port `0` and ask for the
//!    real address.
//! 3. **Shut down** - [`TerritorySystem::shutdown`] signals the server, which stops
//!    accepting connections, drains in-flight requests, and exits.
//!
//! Logging is initialized once per process by [`setup_tracing`].

pub mod system;
pub mod tracing;

pub use self::system::*;
pub use self::tracing::*;
