//! The module contains the errors the ledger can return.
//!
//! The errors are:
//!
//! - [`KeyNotFound`] when a referenced wallet does not exist.
//! - [`InsufficientFunds`] when a debit would take a balance below zero.
//! - [`InvalidOperation`] when a business rule is violated (self transfer, zero
//!   amount, inverted time range, unknown operation type, ...).
//! - [`Database`] and [`Storage`] when the backing store fails. `Storage` is a
//!   `Database` error that has been tagged with the operation it came from.
//!
//!  [`KeyNotFound`]: LedgerError::KeyNotFound
//!  [`InsufficientFunds`]: LedgerError::InsufficientFunds
//!  [`InvalidOperation`]: LedgerError::InvalidOperation
//!  [`Database`]: LedgerError::Database
//!  [`Storage`]: LedgerError::Storage
use sea_orm::DbErr;
use thiserror::Error;

/// Ledger custom errors.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Not found: {0}")]
    KeyNotFound(String),
    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
    #[error("{context}: {source}")]
    Storage {
        context: String,
        #[source]
        source: DbErr,
    },
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl LedgerError {
    /// Tag the error with the operation that produced it.
    ///
    /// The kind is preserved: a `KeyNotFound` stays a `KeyNotFound`. Raw
    /// database errors become [`LedgerError::Storage`].
    #[must_use]
    pub fn context(self, context: &str) -> Self {
        match self {
            Self::KeyNotFound(msg) => Self::KeyNotFound(format!("{context}: {msg}")),
            Self::InsufficientFunds(msg) => Self::InsufficientFunds(format!("{context}: {msg}")),
            Self::InvalidOperation(msg) => Self::InvalidOperation(format!("{context}: {msg}")),
            Self::Storage {
                context: inner,
                source,
            } => Self::Storage {
                context: format!("{context}: {inner}"),
                source,
            },
            Self::Database(source) => Self::Storage {
                context: context.to_string(),
                source,
            },
        }
    }

    /// True for failures of the backing store itself.
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage { .. } | Self::Database(_))
    }
}

impl PartialEq for LedgerError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::InsufficientFunds(a), Self::InsufficientFunds(b)) => a == b,
            (Self::InvalidOperation(a), Self::InvalidOperation(b)) => a == b,
            (
                Self::Storage {
                    context: a,
                    source: sa,
                },
                Self::Storage {
                    context: b,
                    source: sb,
                },
            ) => a == b && sa.to_string() == sb.to_string(),
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
