use serde::{Deserialize, Serialize};

use crate::LedgerError;

/// ISO currency code of a wallet.
///
/// Balances are stored as an integer number of **minor units** (cents for
/// `USD`), so no conversion happens inside the ledger. Which of these
/// currencies a deployment accepts is decided by [`CurrencyPolicy`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Usd,
}

impl Currency {
    /// Canonical currency code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Currency::Usd => "USD",
        }
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<&str> for Currency {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "USD" => Ok(Currency::Usd),
            other => Err(LedgerError::InvalidOperation(format!(
                "unsupported currency: {other}"
            ))),
        }
    }
}

/// The set of currencies a deployment accepts for new wallets.
///
/// Built once from configuration and handed to whoever validates incoming
/// requests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrencyPolicy {
    allowed: Vec<Currency>,
}

impl CurrencyPolicy {
    pub fn new(allowed: Vec<Currency>) -> Self {
        Self { allowed }
    }

    /// Build a policy from currency codes, failing on the first unknown code.
    pub fn from_codes<I, S>(codes: I) -> Result<Self, LedgerError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut allowed = Vec::new();
        for code in codes {
            let currency = Currency::try_from(code.as_ref())?;
            if !allowed.contains(&currency) {
                allowed.push(currency);
            }
        }
        Ok(Self { allowed })
    }

    /// Parse `code` and check it against the allowed set.
    pub fn validate(&self, code: &str) -> Result<Currency, LedgerError> {
        let currency = Currency::try_from(code)?;
        if !self.allowed.contains(&currency) {
            return Err(LedgerError::InvalidOperation(format!(
                "currency not allowed: {code}"
            )));
        }
        Ok(currency)
    }

    pub fn allowed(&self) -> &[Currency] {
        &self.allowed
    }
}

impl Default for CurrencyPolicy {
    fn default() -> Self {
        Self::new(vec![Currency::Usd])
    }
}
