//! Wallet ledger core.
//!
//! - [`Ledger`]: the relational store. Sole writer of wallet balances and
//!   transaction records; every deposit or transfer is one atomic unit.
//! - [`WalletService`]: business rules on top of any [`LedgerStore`].
//! - [`TransactionFilter`], [`Page`] and [`TransactionView`]: the filtered,
//!   paginated, per-wallet read model over the transaction history.

pub use clock::{Clock, SystemClock};
pub use currency::{Currency, CurrencyPolicy};
pub use error::LedgerError;
pub use ops::{Ledger, LedgerBuilder};
pub use query::{Page, Role, TransactionFilter, TransactionView};
pub use service::WalletService;
pub use store::LedgerStore;
pub use transactions::{OperationType, Transaction, WalletRef};
pub use wallets::Wallet;

mod clock;
mod currency;
mod error;
mod ops;
mod query;
mod service;
mod store;
mod transactions;
mod util;
mod wallets;

type ResultLedger<T> = Result<T, LedgerError>;
