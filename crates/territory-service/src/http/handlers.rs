use super::error::{ApiError, Dataset};
use super::AppState;
use crate::lookup::{parse_query_list, states_by_abbreviation, territories_for_zips};
use crate::model::{SalesRep, StateReps};
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::Uri;
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

/// Decoded query pairs in request order. Repeated keys are kept.
pub type QueryPairs = Vec<(String, String)>;

/// A single state when one abbreviation was asked for, a list otherwise.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum StatesResponse {
    One(StateReps),
    Many(Vec<StateReps>),
}

/// The first value given for `key`, if any. Later repeats are ignored.
fn first_param(query: Result<Query<QueryPairs>, QueryRejection>, key: &str) -> Option<String> {
    let pairs = match query {
        Ok(Query(pairs)) => pairs,
        Err(rejection) => {
            warn!(error = %rejection, "Unreadable query string");
            return None;
        }
    };
    pairs
        .into_iter()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value)
}

pub async fn search_by_zip(
    State(state): State<AppState>,
    uri: Uri,
    query: Result<Query<QueryPairs>, QueryRejection>,
) -> Result<Json<Vec<String>>, ApiError> {
    info!(%uri, "Processing request");
    let prefixes = parse_query_list(first_param(query, "zipCode").as_deref());
    if prefixes.is_empty() {
        return Err(ApiError::BadRequest(
            "No valid zip codes provided for search.".to_string(),
        ));
    }

    let records = state.zips.get().await.map_err(ApiError::load(Dataset::Territories))?;
    let territories = territories_for_zips(&records, &prefixes);
    if territories.is_empty() {
        return Err(ApiError::NotFound(
            "No territories found for the provided zip codes.".to_string(),
        ));
    }
    debug!(found = territories.len(), "Territories matched");
    Ok(Json(territories))
}

pub async fn search_by_state(
    State(state): State<AppState>,
    uri: Uri,
    query: Result<Query<QueryPairs>, QueryRejection>,
) -> Result<Json<StatesResponse>, ApiError> {
    info!(%uri, "Processing request");
    let raw = first_param(query, "stateAbbreviation").unwrap_or_default();
    let abbreviations = parse_query_list(Some(&raw));
    if abbreviations.is_empty() {
        return Err(ApiError::BadRequest(
            "A valid stateAbbreviation query parameter is required.".to_string(),
        ));
    }

    let records = state.states.get().await.map_err(ApiError::load(Dataset::Territories))?;
    let mut found: Vec<StateReps> = states_by_abbreviation(&records, &abbreviations)
        .into_iter()
        .cloned()
        .collect();
    if found.is_empty() {
        return Err(ApiError::NotFound(format!(
            "No state found for the provided state abbreviation: {raw}."
        )));
    }

    let distinct: BTreeSet<&String> = abbreviations.iter().collect();
    let response = if distinct.len() == 1 {
        StatesResponse::One(found.remove(0))
    } else {
        StatesResponse::Many(found)
    };
    Ok(Json(response))
}

pub async fn sales_reps(
    State(state): State<AppState>,
    uri: Uri,
) -> Result<Json<Vec<SalesRep>>, ApiError> {
    info!(%uri, "Processing request");
    let reps = state.sales_reps.get().await.map_err(ApiError::load(Dataset::SalesReps))?;
    Ok(Json(Vec::clone(&reps)))
}

pub async fn refresh_caches(State(state): State<AppState>) -> Json<Value> {
    state.zips.invalidate().await;
    state.states.invalidate().await;
    state.sales_reps.invalidate().await;
    info!("Dataset caches invalidated");
    Json(json!({ "ok": true }))
}

pub async fn not_found(uri: Uri) -> ApiError {
    debug!(%uri, "No route");
    ApiError::NotFound(format!("No route for {}", uri.path()))
}
