use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One row of the zip-code search dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZipTerritory {
    pub zip_code: String,
    pub territory: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ZipTerritory {
    pub fn new(zip_code: impl Into<String>, territory: impl Into<String>) -> Self {
        Self {
            zip_code: zip_code.into(),
            territory: territory.into(),
            extra: Map::new(),
        }
    }
}
