//! The storage seam of the ledger.
//!
//! [`WalletService`](crate::WalletService) talks to storage only through
//! [`LedgerStore`], which keeps the business rules testable without a
//! database. [`Ledger`] is the relational implementation.

use async_trait::async_trait;
use uuid::Uuid;

use crate::{Currency, Ledger, Page, ResultLedger, Transaction, TransactionFilter, Wallet};

#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn create_wallet(&self, name: &str, currency: Currency) -> ResultLedger<Uuid>;

    async fn wallet(&self, wallet_id: Uuid) -> ResultLedger<Wallet>;

    async fn deposit(&self, recipient_id: Uuid, amount: u64) -> ResultLedger<Transaction>;

    async fn transfer(
        &self,
        sender_id: Uuid,
        recipient_id: Uuid,
        amount: u64,
    ) -> ResultLedger<Transaction>;

    async fn query_transactions(
        &self,
        page: Page,
        filter: &TransactionFilter,
    ) -> ResultLedger<Vec<Transaction>>;
}

#[async_trait]
impl LedgerStore for Ledger {
    async fn create_wallet(&self, name: &str, currency: Currency) -> ResultLedger<Uuid> {
        Ledger::create_wallet(self, name, currency)
            .await
            .map_err(|err| err.context("ledger store: create wallet"))
    }

    async fn wallet(&self, wallet_id: Uuid) -> ResultLedger<Wallet> {
        Ledger::wallet(self, wallet_id)
            .await
            .map_err(|err| err.context("ledger store: wallet"))
    }

    async fn deposit(&self, recipient_id: Uuid, amount: u64) -> ResultLedger<Transaction> {
        Ledger::deposit(self, recipient_id, amount)
            .await
            .map_err(|err| err.context("ledger store: deposit"))
    }

    async fn transfer(
        &self,
        sender_id: Uuid,
        recipient_id: Uuid,
        amount: u64,
    ) -> ResultLedger<Transaction> {
        Ledger::transfer(self, sender_id, recipient_id, amount)
            .await
            .map_err(|err| err.context("ledger store: transfer"))
    }

    async fn query_transactions(
        &self,
        page: Page,
        filter: &TransactionFilter,
    ) -> ResultLedger<Vec<Transaction>> {
        Ledger::query_transactions(self, page, filter)
            .await
            .map_err(|err| err.context("ledger store: query transactions"))
    }
}
