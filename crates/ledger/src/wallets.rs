//! The module contains `Wallet` struct and its storage model.

use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    Currency, LedgerError, ResultLedger,
    util::{from_storage_amount, parse_uuid},
};

/// A wallet.
///
/// Holds a non-negative balance in a single currency. The balance is only
/// ever changed by deposits and transfers, never written directly.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    /// Stable identifier assigned by the store on creation.
    pub id: Uuid,
    pub name: String,
    pub currency: Currency,
    /// Balance in minor units.
    pub balance: u64,
}

impl Wallet {
    /// A new, empty wallet with a freshly generated id.
    pub fn new(name: String, currency: Currency) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            currency,
            balance: 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "wallets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub currency: String,
    pub balance: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Wallet> for ActiveModel {
    fn from(value: &Wallet) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            name: ActiveValue::Set(value.name.clone()),
            currency: ActiveValue::Set(value.currency.code().to_string()),
            balance: ActiveValue::Set(0),
        }
    }
}

impl TryFrom<Model> for Wallet {
    type Error = LedgerError;

    fn try_from(model: Model) -> ResultLedger<Self> {
        Ok(Self {
            id: parse_uuid(&model.id, "wallet")?,
            currency: Currency::try_from(model.currency.as_str())?,
            balance: from_storage_amount(model.balance, "wallet balance")?,
            name: model.name,
        })
    }
}
