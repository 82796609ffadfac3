//! Transaction primitives.
//!
//! A `Transaction` is the immutable record of one deposit or transfer. It is
//! written exactly once, in the same database transaction that moved the
//! balances, and never updated afterwards.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    LedgerError, ResultLedger,
    util::{from_storage_amount, parse_uuid},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationType {
    Deposit,
    Transfer,
}

impl OperationType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Transfer => "transfer",
        }
    }
}

impl core::fmt::Display for OperationType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for OperationType {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "deposit" => Ok(Self::Deposit),
            "transfer" => Ok(Self::Transfer),
            other => Err(LedgerError::InvalidOperation(format!(
                "unknown operation type: {other}"
            ))),
        }
    }
}

/// A wallet as seen by one transaction: its id and its balance right after
/// the transaction committed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletRef {
    pub id: Uuid,
    pub balance: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Store-assigned, increasing with insertion order.
    pub id: i64,
    pub operation_type: OperationType,
    pub amount: u64,
    pub processed_at: DateTime<Utc>,
    pub recipient: WalletRef,
    /// Present only for transfers.
    pub sender: Option<WalletRef>,
}

impl Transaction {
    /// Whether `wallet_id` is the sender or the recipient of this transaction.
    pub fn involves(&self, wallet_id: Uuid) -> bool {
        self.recipient.id == wallet_id || self.sender.is_some_and(|s| s.id == wallet_id)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub operation_type: String,
    pub amount: i64,
    pub sender_wallet_id: Option<String>,
    pub sender_wallet_balance: Option<i64>,
    pub recipient_wallet_id: String,
    pub recipient_wallet_balance: i64,
    pub processed_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::wallets::Entity",
        from = "Column::RecipientWalletId",
        to = "super::wallets::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Recipient,
    #[sea_orm(
        belongs_to = "super::wallets::Entity",
        from = "Column::SenderWalletId",
        to = "super::wallets::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Sender,
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Transaction {
    type Error = LedgerError;

    fn try_from(model: Model) -> ResultLedger<Self> {
        // The nullable sender columns collapse into one optional side here.
        let sender = match (model.sender_wallet_id, model.sender_wallet_balance) {
            (Some(id), Some(balance)) => Some(WalletRef {
                id: parse_uuid(&id, "sender wallet")?,
                balance: from_storage_amount(balance, "sender wallet balance")?,
            }),
            (None, None) => None,
            _ => {
                return Err(LedgerError::InvalidOperation(format!(
                    "transaction {} has a partial sender",
                    model.id
                )));
            }
        };

        Ok(Self {
            id: i64::from(model.id),
            operation_type: OperationType::try_from(model.operation_type.as_str())?,
            amount: from_storage_amount(model.amount, "transaction amount")?,
            processed_at: model.processed_at,
            recipient: WalletRef {
                id: parse_uuid(&model.recipient_wallet_id, "recipient wallet")?,
                balance: from_storage_amount(
                    model.recipient_wallet_balance,
                    "recipient wallet balance",
                )?,
            },
            sender,
        })
    }
}
