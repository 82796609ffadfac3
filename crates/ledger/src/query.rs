//! Read model over the transaction history of one wallet.
//!
//! A query is a [`TransactionFilter`] plus a [`Page`] window. Results come
//! back newest first and can be projected into a [`TransactionView`], the shape
//! a single wallet owner sees: their own balance after each transaction and
//! the wallet on the other side, if any.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{LedgerError, OperationType, ResultLedger, Transaction, WalletRef};

/// Filters for listing the transactions of a wallet.
///
/// Both time bounds are inclusive, in UTC.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionFilter {
    /// Matches transactions where the wallet is the sender or the recipient.
    pub wallet_id: Uuid,
    pub operation_type: Option<OperationType>,
    pub processed_at_gte: Option<DateTime<Utc>>,
    pub processed_at_lte: Option<DateTime<Utc>>,
}

impl TransactionFilter {
    pub fn new(wallet_id: Uuid) -> Self {
        Self {
            wallet_id,
            operation_type: None,
            processed_at_gte: None,
            processed_at_lte: None,
        }
    }

    pub fn operation_type(mut self, operation_type: OperationType) -> Self {
        self.operation_type = Some(operation_type);
        self
    }

    pub fn processed_at_gte(mut self, at: DateTime<Utc>) -> Self {
        self.processed_at_gte = Some(at);
        self
    }

    pub fn processed_at_lte(mut self, at: DateTime<Utc>) -> Self {
        self.processed_at_lte = Some(at);
        self
    }

    /// Reject inverted ranges. A single bound, or two equal bounds, is fine.
    pub fn validate(&self) -> ResultLedger<()> {
        if let (Some(gte), Some(lte)) = (self.processed_at_gte, self.processed_at_lte)
            && gte > lte
        {
            return Err(LedgerError::InvalidOperation(
                "invalid time range: processed_at.gte must not be after processed_at.lte"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

/// Pagination window. `None` means unbounded (limit) or no offset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Page {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl Page {
    /// Build a window from the wire representation, where `-1` means
    /// "unbounded" for the limit and "no offset" for the offset.
    pub fn new(limit: i64, offset: i64) -> ResultLedger<Self> {
        Ok(Self {
            limit: window_value(limit, "limit")?,
            offset: window_value(offset, "offset")?,
        })
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }
}

fn window_value(value: i64, label: &str) -> ResultLedger<Option<u64>> {
    match value {
        -1 => Ok(None),
        v if v < -1 => Err(LedgerError::InvalidOperation(format!(
            "invalid {label}: {v}"
        ))),
        v => Ok(u64::try_from(v).ok()),
    }
}

/// Which side of a transaction the viewing wallet was on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Sender,
    Recipient,
}

/// A transaction as seen from one wallet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionView {
    pub operation_type: OperationType,
    pub amount: u64,
    pub processed_at: DateTime<Utc>,
    pub role: Role,
    /// Balance of the viewing wallet right after this transaction.
    pub balance: u64,
    /// The wallet on the other side. Always `None` for deposits.
    pub counterpart: Option<WalletRef>,
}

impl TransactionView {
    /// Project `tx` for `viewer`.
    ///
    /// A viewer that is not the sender is treated as the recipient; the
    /// history query only returns transactions the viewer takes part in.
    pub fn project(viewer: Uuid, tx: &Transaction) -> Self {
        match tx.sender {
            Some(sender) if sender.id == viewer => Self {
                operation_type: tx.operation_type,
                amount: tx.amount,
                processed_at: tx.processed_at,
                role: Role::Sender,
                balance: sender.balance,
                counterpart: Some(tx.recipient),
            },
            sender => Self {
                operation_type: tx.operation_type,
                amount: tx.amount,
                processed_at: tx.processed_at,
                role: Role::Recipient,
                balance: tx.recipient.balance,
                counterpart: sender,
            },
        }
    }

    /// Set when the viewer sent the money of a transfer.
    pub fn sender_is_me(&self) -> bool {
        self.counterpart.is_some() && self.role == Role::Sender
    }

    /// Set when the viewer received the money of a transfer.
    pub fn recipient_is_me(&self) -> bool {
        self.counterpart.is_some() && self.role == Role::Recipient
    }
}
