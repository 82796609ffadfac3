use sea_orm::{TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{Currency, LedgerError, ResultLedger, Wallet, wallets};

use super::{Ledger, with_tx};

impl Ledger {
    /// Add a new wallet with a zero balance and return its id.
    pub async fn create_wallet(&self, name: &str, currency: Currency) -> ResultLedger<Uuid> {
        let wallet = Wallet::new(name.to_string(), currency);
        let wallet_model: wallets::ActiveModel = (&wallet).into();
        wallet_model.insert(&self.database).await?;
        tracing::debug!(wallet_id = %wallet.id, %currency, "wallet created");
        Ok(wallet.id)
    }

    /// Return a wallet snapshot from DB.
    pub async fn wallet(&self, wallet_id: Uuid) -> ResultLedger<Wallet> {
        with_tx!(self, |db_tx| {
            let model = wallets::Entity::find_by_id(wallet_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| LedgerError::KeyNotFound(format!("wallet {wallet_id}")))?;
            Wallet::try_from(model)
        })
    }
}
