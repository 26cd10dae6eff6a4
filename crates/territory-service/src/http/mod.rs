//! # HTTP API
//!
//! | Route | Methods | Answer |
//! |-------|---------|--------|
//! | `/api/search?zipCode=75,733` | GET, POST | sorted territory names |
//! | `/api/states/get-reps?stateAbbreviation=TX` | GET, POST | one state, or a list when several are asked for |
//! | `/api/sales-rep`, `/api/sales-reps` | GET, POST | every sales rep |
//! | `/api/cache/refresh` | POST | `{"ok":true}` after dropping every cached dataset |
//!
//! Query values are comma-separated lists. Every non-200 answer is an
//! [`ErrorBody`](crate::model::ErrorBody).

pub mod error;
pub mod handlers;

pub use error::{ApiError, Dataset};

use crate::cache::{CachePolicy, DatasetCache};
use crate::config::DatasetNames;
use crate::model::{SalesRep, StateReps, ZipTerritory};
use axum::routing::{get, post};
use axum::Router;
use entity_store::StorageBackend;
use std::sync::Arc;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub zips: Arc<DatasetCache<ZipTerritory>>,
    pub states: Arc<DatasetCache<StateReps>>,
    pub sales_reps: Arc<DatasetCache<SalesRep>>,
}

impl AppState {
    pub fn new(backend: Arc<dyn StorageBackend>, names: &DatasetNames, policy: CachePolicy) -> Self {
        Self {
            zips: Arc::new(DatasetCache::new(Arc::clone(&backend), &names.zips, policy)),
            states: Arc::new(DatasetCache::new(Arc::clone(&backend), &names.states, policy)),
            sales_reps: Arc::new(DatasetCache::new(backend, &names.sales_reps, policy)),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/search",
            get(handlers::search_by_zip).post(handlers::search_by_zip),
        )
        .route(
            "/api/states/get-reps",
            get(handlers::search_by_state).post(handlers::search_by_state),
        )
        .route(
            "/api/sales-rep",
            get(handlers::sales_reps).post(handlers::sales_reps),
        )
        .route(
            "/api/sales-reps",
            get(handlers::sales_reps).post(handlers::sales_reps),
        )
        .route("/api/cache/refresh", post(handlers::refresh_caches))
        .fallback(handlers::not_found)
        .with_state(state)
}
