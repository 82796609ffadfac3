use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Error body returned by every failing endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

pub mod wallet {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WalletNew {
        pub name: String,
        /// ISO currency code, e.g. `USD`.
        pub currency: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WalletCreated {
        pub id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Wallet {
        pub id: Uuid,
        pub name: String,
        pub currency: String,
        pub balance: u64,
    }
}

pub mod deposit {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DepositNew {
        pub amount: u64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DepositResponse {
        /// Balance of the wallet after the deposit.
        pub balance: u64,
    }
}

pub mod transfer {
    use super::*;

    /// Transfer into the wallet named by the request path.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransferNew {
        pub amount: u64,
        pub sender_wallet_id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransferResponse {
        pub sender_wallet_balance: u64,
        /// Balance of the recipient wallet after the transfer.
        pub balance: u64,
    }
}

pub mod transaction {
    use super::*;

    /// One history entry as seen by the queried wallet.
    ///
    /// For transfers only the counterpart's id and balance are filled in, and
    /// exactly one of the `*_me` flags is set. Deposits carry neither side.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct TransactionView {
        pub operation_type: String,
        pub amount: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub sender_wallet_id: Option<Uuid>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub sender_wallet_balance: Option<u64>,
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        pub sender_wallet_me: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub recipient_wallet_id: Option<Uuid>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub recipient_wallet_balance: Option<u64>,
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        pub recipient_wallet_me: bool,
        /// Balance of the queried wallet right after this transaction.
        pub balance: u64,
        pub processed_at: DateTime<Utc>,
    }

    /// Query string of the history endpoint.
    ///
    /// Values are kept as raw strings so the handler can report exactly which
    /// parameter was malformed.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionList {
        pub limit: Option<String>,
        pub offset: Option<String>,
        pub operation_type: Option<String>,
        #[serde(rename = "processed_at.gte")]
        pub processed_at_gte: Option<String>,
        #[serde(rename = "processed_at.lte")]
        pub processed_at_lte: Option<String>,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deposit_view_omits_both_sides() {
        let view = transaction::TransactionView {
            operation_type: "deposit".to_string(),
            amount: 100,
            sender_wallet_id: None,
            sender_wallet_balance: None,
            sender_wallet_me: false,
            recipient_wallet_id: None,
            recipient_wallet_balance: None,
            recipient_wallet_me: false,
            balance: 100,
            processed_at: DateTime::from_timestamp(1_641_772_800, 0).unwrap(),
        };

        let json = serde_json::to_value(&view).unwrap();
        let obj = json.as_object().unwrap();
        let mut keys: Vec<_> = obj.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["amount", "balance", "operation_type", "processed_at"]);
        assert_eq!(obj["processed_at"], "2022-01-10T00:00:00Z");
    }

    #[test]
    fn list_query_uses_dotted_time_bounds() {
        let query: transaction::TransactionList = serde_json::from_str(
            r#"{"limit":"10","processed_at.gte":"2022-01-10T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(query.limit.as_deref(), Some("10"));
        assert_eq!(
            query.processed_at_gte.as_deref(),
            Some("2022-01-10T00:00:00Z")
        );
        assert!(query.processed_at_lte.is_none());
    }
}
