use entity_store::EntityId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The representatives assigned to one state.
///
/// Rep fields hold sales-rep identifiers; a state without a rep of some kind
/// simply omits the field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateReps {
    pub state: String,
    pub state_abbreviation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support_rep: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_rep: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sales_rep: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_practice_rep: Option<EntityId>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
