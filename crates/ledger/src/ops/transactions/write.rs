use sea_orm::TransactionTrait;
use uuid::Uuid;

use crate::{OperationType, ResultLedger, Transaction, util::to_storage_amount};

use super::{
    super::{Ledger, with_tx},
    RecordInput, Side,
};

impl Ledger {
    /// Credit `amount` to the recipient and append a deposit record.
    ///
    /// Both effects commit together. A missing recipient fails with
    /// `KeyNotFound` and leaves nothing behind. The store does not reject a
    /// zero amount; that rule belongs to the caller.
    pub async fn deposit(&self, recipient_id: Uuid, amount: u64) -> ResultLedger<Transaction> {
        let amount = to_storage_amount(amount)?;
        let tx = with_tx!(self, |db_tx| {
            let balance = self.credit(&db_tx, recipient_id, amount).await?;
            let processed_at = self.clock.now();
            self.record(
                &db_tx,
                RecordInput {
                    operation_type: OperationType::Deposit,
                    amount,
                    processed_at,
                    recipient: Side {
                        wallet_id: recipient_id,
                        balance,
                    },
                    sender: None,
                },
            )
            .await
        })?;
        tracing::debug!(
            transaction_id = tx.id,
            recipient = %recipient_id,
            amount,
            "deposit committed"
        );
        Ok(tx)
    }

    /// Move `amount` from sender to recipient and append a transfer record.
    ///
    /// The debit, the credit and the record commit together or not at all.
    /// Wallet rows are locked in ascending id order so two opposite transfers
    /// cannot deadlock each other.
    pub async fn transfer(
        &self,
        sender_id: Uuid,
        recipient_id: Uuid,
        amount: u64,
    ) -> ResultLedger<Transaction> {
        let amount = to_storage_amount(amount)?;
        let tx = with_tx!(self, |db_tx| {
            let (sender_balance, recipient_balance) = if sender_id <= recipient_id {
                let sender_balance = self.debit(&db_tx, sender_id, amount).await?;
                let recipient_balance = self.credit(&db_tx, recipient_id, amount).await?;
                (sender_balance, recipient_balance)
            } else {
                let recipient_balance = self.credit(&db_tx, recipient_id, amount).await?;
                let sender_balance = self.debit(&db_tx, sender_id, amount).await?;
                (sender_balance, recipient_balance)
            };
            let processed_at = self.clock.now();
            self.record(
                &db_tx,
                RecordInput {
                    operation_type: OperationType::Transfer,
                    amount,
                    processed_at,
                    recipient: Side {
                        wallet_id: recipient_id,
                        balance: recipient_balance,
                    },
                    sender: Some(Side {
                        wallet_id: sender_id,
                        balance: sender_balance,
                    }),
                },
            )
            .await
        })?;
        tracing::debug!(
            transaction_id = tx.id,
            sender = %sender_id,
            recipient = %recipient_id,
            amount,
            "transfer committed"
        );
        Ok(tx)
    }
}
