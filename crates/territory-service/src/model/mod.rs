//! Record types for the three datasets the API serves.
//!
//! Every type keeps fields it does not know about in an `extra` map, so a
//! response carries the full record exactly as stored.

pub mod sales_rep;
pub mod state;
pub mod zip;

pub use sales_rep::*;
pub use state::*;
pub use zip::*;

use serde::{Deserialize, Serialize};

/// Body of every non-200 API response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
