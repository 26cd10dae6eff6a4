use entity_store::EntityId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A sales representative, as stored in the sales-rep dataset.
///
/// The `ID` field is the same identifier the entity tools use to address the
/// record, which is why it is an [`EntityId`] rather than a bare number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRep {
    pub name: String,
    pub phone: String,
    pub email: String,
    #[serde(rename = "ID")]
    pub id: EntityId,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
