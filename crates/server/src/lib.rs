use axum::{Json, http::StatusCode, response::IntoResponse};
use ledger::LedgerError;

use api_types::ErrorResponse;
pub use server::{ServerState, router, run_with_listener};

mod docs;
mod server;
mod transactions;
mod wallets;

pub enum ServerError {
    Ledger(LedgerError),
    /// Malformed request: bad path id, query parameter or body.
    Generic(String),
    /// The `Accept` header names a format we cannot produce.
    NotAcceptable(String),
    /// Failure while rendering a response.
    Internal(String),
}

fn status_for_ledger_error(err: &LedgerError) -> StatusCode {
    match err {
        LedgerError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        LedgerError::InsufficientFunds(_) | LedgerError::InvalidOperation(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        LedgerError::Storage { .. } | LedgerError::Database(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn message_for_ledger_error(err: LedgerError) -> String {
    if err.is_storage() {
        tracing::error!("storage error: {err}");
        return "internal server error".to_string();
    }
    err.to_string()
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ServerError::Ledger(err) => {
                (status_for_ledger_error(&err), message_for_ledger_error(err))
            }
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
            ServerError::NotAcceptable(err) => (StatusCode::NOT_ACCEPTABLE, err),
            ServerError::Internal(err) => {
                tracing::error!("internal error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        if status.is_client_error() {
            tracing::warn!(status = status.as_u16(), "request failed: {message}");
        }

        (status, Json(ErrorResponse { message })).into_response()
    }
}

impl From<LedgerError> for ServerError {
    fn from(value: LedgerError) -> Self {
        Self::Ledger(value)
    }
}
