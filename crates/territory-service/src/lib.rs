//! # Territory Service
//!
//! Sales-territory lookups over HTTP, plus command-line maintenance of the JSON
//! documents behind them.
//!
//! ## Components
//!
//! - **[model]**: The records in each dataset ([`ZipTerritory`](model::ZipTerritory),
//!   [`StateReps`](model::StateReps), [`SalesRep`](model::SalesRep)).
//! - **[cache]**: [`DatasetCache`](cache::DatasetCache), a loaded-once copy of a dataset
//!   with explicit invalidation.
//! - **[lookup]**: Query-list parsing and the zip/state matching rules.
//! - **[http]**: The axum router and its error responses.
//! - **[config]** and **[blob]**: Where the datasets live, local disk or blob storage.
//! - **[lifecycle]**: Starting, serving, and stopping, plus log setup.
//! - **[commands]**: `entity` CRUD commands built on [`entity_store`].

pub mod blob;
pub mod cache;
pub mod commands;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod lookup;
pub mod model;
