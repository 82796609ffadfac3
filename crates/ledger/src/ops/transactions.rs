//! Balance mutations shared by deposits and transfers.
//!
//! Balances are only ever changed with a single conditional
//! `UPDATE wallets SET balance = balance ± amount WHERE id = ? AND <bound>`, where
//! the bound keeps the result within `0..=i64::MAX`.
//! The new balance is read back afterwards inside the same database
//! transaction, where the row is already locked by the update.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, prelude::*, sea_query::Expr};
use uuid::Uuid;

use crate::{LedgerError, OperationType, ResultLedger, Transaction, transactions, wallets};

use super::Ledger;

mod list;
mod write;

/// One side of a transaction to persist: the wallet and its balance after
/// the balance update.
#[derive(Clone, Copy, Debug)]
struct Side {
    wallet_id: Uuid,
    balance: i64,
}

struct RecordInput {
    operation_type: OperationType,
    amount: i64,
    processed_at: DateTime<Utc>,
    recipient: Side,
    sender: Option<Side>,
}

impl Ledger {
    /// Add `amount` to the wallet balance and return the new balance.
    ///
    /// The update only matches while the result still fits the BIGINT column.
    async fn credit(
        &self,
        db_tx: &DatabaseTransaction,
        wallet_id: Uuid,
        amount: i64,
    ) -> ResultLedger<i64> {
        let res = wallets::Entity::update_many()
            .col_expr(
                wallets::Column::Balance,
                Expr::col(wallets::Column::Balance).add(amount),
            )
            .filter(wallets::Column::Id.eq(wallet_id.to_string()))
            .filter(wallets::Column::Balance.lte(i64::MAX - amount))
            .exec(db_tx)
            .await?;
        if res.rows_affected == 0 {
            self.ensure_exists(db_tx, wallet_id).await?;
            return Err(LedgerError::InvalidOperation(format!(
                "balance overflow: wallet {wallet_id} cannot take {amount}"
            )));
        }
        self.current_balance(db_tx, wallet_id).await
    }

    /// Subtract `amount` from the wallet balance and return the new balance.
    ///
    /// The update only matches when the balance covers the amount, so a
    /// balance can never be observed below zero.
    async fn debit(
        &self,
        db_tx: &DatabaseTransaction,
        wallet_id: Uuid,
        amount: i64,
    ) -> ResultLedger<i64> {
        let res = wallets::Entity::update_many()
            .col_expr(
                wallets::Column::Balance,
                Expr::col(wallets::Column::Balance).sub(amount),
            )
            .filter(wallets::Column::Id.eq(wallet_id.to_string()))
            .filter(wallets::Column::Balance.gte(amount))
            .exec(db_tx)
            .await?;
        if res.rows_affected == 0 {
            self.ensure_exists(db_tx, wallet_id).await?;
            return Err(LedgerError::InsufficientFunds(format!(
                "wallet {wallet_id} cannot cover {amount}"
            )));
        }
        self.current_balance(db_tx, wallet_id).await
    }

    /// `KeyNotFound` unless the wallet row exists.
    async fn ensure_exists(
        &self,
        db_tx: &DatabaseTransaction,
        wallet_id: Uuid,
    ) -> ResultLedger<()> {
        let exists = wallets::Entity::find_by_id(wallet_id.to_string())
            .one(db_tx)
            .await?
            .is_some();
        if !exists {
            return Err(LedgerError::KeyNotFound(format!("wallet {wallet_id}")));
        }
        Ok(())
    }

    async fn current_balance(
        &self,
        db_tx: &DatabaseTransaction,
        wallet_id: Uuid,
    ) -> ResultLedger<i64> {
        let model = wallets::Entity::find_by_id(wallet_id.to_string())
            .one(db_tx)
            .await?
            .ok_or_else(|| LedgerError::KeyNotFound(format!("wallet {wallet_id}")))?;
        Ok(model.balance)
    }

    /// Append the immutable transaction record.
    async fn record(
        &self,
        db_tx: &DatabaseTransaction,
        input: RecordInput,
    ) -> ResultLedger<Transaction> {
        let model = transactions::ActiveModel {
            id: ActiveValue::NotSet,
            operation_type: ActiveValue::Set(input.operation_type.as_str().to_string()),
            amount: ActiveValue::Set(input.amount),
            sender_wallet_id: ActiveValue::Set(input.sender.map(|s| s.wallet_id.to_string())),
            sender_wallet_balance: ActiveValue::Set(input.sender.map(|s| s.balance)),
            recipient_wallet_id: ActiveValue::Set(input.recipient.wallet_id.to_string()),
            recipient_wallet_balance: ActiveValue::Set(input.recipient.balance),
            processed_at: ActiveValue::Set(input.processed_at),
        }
        .insert(db_tx)
        .await?;
        Transaction::try_from(model)
    }
}
