//! HTTP handler implementations
//!
//! Each handler is a function of the shared [`ChainStore`] handle and the
//! request; all chain mutation goes through the store.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::consensus::Transaction;
use crate::storage::{ChainStore, StoreError};

/// Error body returned by every failing endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Handler errors, each mapped to one status code
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid transaction: {0}")]
    BadRequest(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Response serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(StoreError::Validation(_)) => StatusCode::CONFLICT,
            ApiError::Store(StoreError::NotReady) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Store(_) | ApiError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(%status, error = %self, "request failed");
        } else {
            tracing::warn!(%status, error = %self, "request rejected");
        }
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// Pretty-printed JSON response
fn json_response<T: Serialize>(status: StatusCode, payload: &T) -> Result<Response, ApiError> {
    let body = serde_json::to_string_pretty(payload)?;
    Ok((status, [(header::CONTENT_TYPE, "application/json")], body).into_response())
}

/// `GET /` - the full chain as a JSON array in index order
pub async fn get_chain(State(store): State<ChainStore>) -> Result<Response, ApiError> {
    let chain = store.snapshot()?;
    json_response(StatusCode::OK, &chain)
}

/// Decode a transaction body, matching top-level keys case-insensitively.
///
/// Keys that differ only in case collapse to a single entry.
fn decode_transaction(body: &[u8]) -> Result<Transaction, ApiError> {
    let bad_request = |e: serde_json::Error| ApiError::BadRequest(e.to_string());

    let value = match serde_json::from_slice(body).map_err(bad_request)? {
        Value::Object(fields) => Value::Object(
            fields
                .into_iter()
                .map(|(key, value)| (key.to_lowercase(), value))
                .collect::<Map<String, Value>>(),
        ),
        other => other,
    };
    serde_json::from_value(value).map_err(bad_request)
}

/// `POST /` - append one transaction as a new block
///
/// The body is decoded here rather than through the `Json` extractor so
/// that every decode failure is a 400, whatever the content type.
pub async fn write_block(
    State(store): State<ChainStore>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let transaction = decode_transaction(&body)?;

    let block = store.append_transaction(transaction)?;
    json_response(StatusCode::CREATED, &block)
}
