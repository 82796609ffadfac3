use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{Clock, ResultLedger, SystemClock};

mod transactions;
mod wallets;

/// Run a block inside a DB transaction, committing on success.
///
/// On error the transaction is dropped without commit, which rolls it back.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// The relational ledger store.
///
/// Owns every write to `wallets` and `transactions`. Each deposit or transfer
/// runs in its own database transaction, so callers observe either all of its
/// effects or none.
#[derive(Debug)]
pub struct Ledger {
    database: DatabaseConnection,
    clock: Arc<dyn Clock>,
}

impl Ledger {
    /// Return a builder for `Ledger`. Help to build the struct.
    pub fn builder() -> LedgerBuilder {
        LedgerBuilder::default()
    }
}

/// The builder for `Ledger`
#[derive(Default)]
pub struct LedgerBuilder {
    database: DatabaseConnection,
    clock: Option<Arc<dyn Clock>>,
}

impl LedgerBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> LedgerBuilder {
        self.database = db;
        self
    }

    /// Override the clock used to stamp transactions. Defaults to [`SystemClock`].
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> LedgerBuilder {
        self.clock = Some(clock);
        self
    }

    /// Construct `Ledger`
    pub async fn build(self) -> ResultLedger<Ledger> {
        Ok(Ledger {
            database: self.database,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
        })
    }
}
