//! Internal helpers for model validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize the
//! mapping between domain integers (`u64`) and storage integers (`i64`).

use uuid::Uuid;

use crate::{LedgerError, ResultLedger};

/// Parse a UUID from storage and return a labeled error on failure.
pub(crate) fn parse_uuid(value: &str, label: &str) -> ResultLedger<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| LedgerError::InvalidOperation(format!("invalid {label} id: {value}")))
}

/// Convert an amount into the signed representation used by the store.
pub(crate) fn to_storage_amount(amount: u64) -> ResultLedger<i64> {
    i64::try_from(amount)
        .map_err(|_| LedgerError::InvalidOperation(format!("amount too large: {amount}")))
}

/// Convert a stored, never-negative integer back into a domain amount.
pub(crate) fn from_storage_amount(value: i64, label: &str) -> ResultLedger<u64> {
    u64::try_from(value)
        .map_err(|_| LedgerError::InvalidOperation(format!("negative {label}: {value}")))
}
