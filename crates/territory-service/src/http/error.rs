//! Error responses.
//!
//! Every failure becomes a JSON [`ErrorBody`]. Load failures are split into
//! "the document is malformed" and "anything else", with wording that depends on
//! which dataset failed.

use crate::model::ErrorBody;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use entity_store::StoreError;
use tracing::error;

/// Which family of endpoints a load failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    /// Zip-code and state lookups.
    Territories,
    SalesReps,
}

impl Dataset {
    fn parse_message(self) -> &'static str {
        match self {
            Self::Territories => "Failed to parse the JSON file (invalid format).",
            Self::SalesReps => "Failed to parse the sales representative JSON file (invalid format).",
        }
    }

    fn unexpected_message(self) -> &'static str {
        match self {
            Self::Territories => "An unexpected error occurred while processing your request.",
            Self::SalesReps => "An unexpected error occurred while loading sales representative data.",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("failed to load {dataset:?} data: {source}")]
    Load {
        dataset: Dataset,
        #[source]
        source: StoreError,
    },
}

impl ApiError {
    pub fn load(dataset: Dataset) -> impl FnOnce(StoreError) -> Self {
        move |source| Self::Load { dataset, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Load { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message clients see. Load failures never expose the underlying cause.
    pub fn public_message(&self) -> String {
        match self {
            Self::BadRequest(message) | Self::NotFound(message) => message.clone(),
            Self::Load { dataset, source } if source.is_parse() => dataset.parse_message().to_string(),
            Self::Load { dataset, .. } => dataset.unexpected_message().to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Load { dataset, source } = &self {
            error!(?dataset, error = %source, "Dataset load failed");
        }
        (self.status(), Json(ErrorBody::new(self.public_message()))).into_response()
    }
}
