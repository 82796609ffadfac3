use std::sync::Arc;

use uuid::Uuid;

use crate::{
    Currency, LedgerError, LedgerStore, Page, ResultLedger, Transaction, TransactionFilter,
    TransactionView, Wallet,
};

/// Business rules on top of a [`LedgerStore`].
///
/// The store guarantees atomicity and non-negative balances; the service
/// adds the rules that are not storage constraints (no self transfers, no
/// zero amounts) and tags every error with the call it came from.
#[derive(Clone)]
pub struct WalletService {
    store: Arc<dyn LedgerStore>,
}

impl core::fmt::Debug for WalletService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WalletService").finish_non_exhaustive()
    }
}

impl WalletService {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    pub async fn create_wallet(&self, name: &str, currency: Currency) -> ResultLedger<Uuid> {
        self.store
            .create_wallet(name, currency)
            .await
            .map_err(|err| err.context("wallet service: create wallet"))
    }

    pub async fn wallet(&self, wallet_id: Uuid) -> ResultLedger<Wallet> {
        self.store
            .wallet(wallet_id)
            .await
            .map_err(|err| err.context("wallet service: wallet"))
    }

    pub async fn deposit(&self, recipient_id: Uuid, amount: u64) -> ResultLedger<Transaction> {
        ensure_positive(amount).map_err(|err| err.context("wallet service: deposit"))?;
        self.store
            .deposit(recipient_id, amount)
            .await
            .map_err(|err| err.context("wallet service: deposit"))
    }

    /// Rejects a transfer to the same wallet before touching storage.
    pub async fn transfer(
        &self,
        sender_id: Uuid,
        recipient_id: Uuid,
        amount: u64,
    ) -> ResultLedger<Transaction> {
        if sender_id == recipient_id {
            return Err(LedgerError::InvalidOperation(
                "sender wallet should be different than recipient wallet".to_string(),
            )
            .context("wallet service: transfer"));
        }
        ensure_positive(amount).map_err(|err| err.context("wallet service: transfer"))?;
        self.store
            .transfer(sender_id, recipient_id, amount)
            .await
            .map_err(|err| err.context("wallet service: transfer"))
    }

    pub async fn get_transactions(
        &self,
        page: Page,
        filter: &TransactionFilter,
    ) -> ResultLedger<Vec<Transaction>> {
        self.store
            .query_transactions(page, filter)
            .await
            .map_err(|err| err.context("wallet service: get transactions"))
    }

    /// Transactions of `filter.wallet_id`, projected for that wallet.
    ///
    /// Records the wallet took no part in are skipped.
    pub async fn transaction_views(
        &self,
        page: Page,
        filter: &TransactionFilter,
    ) -> ResultLedger<Vec<TransactionView>> {
        let transactions = self.get_transactions(page, filter).await?;
        Ok(transactions
            .iter()
            .filter(|tx| tx.involves(filter.wallet_id))
            .map(|tx| TransactionView::project(filter.wallet_id, tx))
            .collect())
    }
}

fn ensure_positive(amount: u64) -> ResultLedger<()> {
    if amount == 0 {
        return Err(LedgerError::InvalidOperation(
            "amount must be > 0".to_string(),
        ));
    }
    Ok(())
}
