//! Transaction history endpoint.
//!
//! The same history is rendered as JSON or CSV depending on `Accept`.

use api_types::transaction::{TransactionList, TransactionView};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, header},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, SecondsFormat, Utc};
use ledger::{OperationType, Page, Role, TransactionFilter};

use crate::{ServerError, server::ServerState, wallets::parse_wallet_id};

const CSV_HEADER: [&str; 10] = [
    "OperationType",
    "Amount",
    "SenderWalletId",
    "SenderWalletBalance",
    "SenderWalletMe",
    "RecipientWalletId",
    "RecipientWalletBalance",
    "RecipientWalletMe",
    "Balance",
    "ProcessedAt",
];

const CSV_NULL: &str = "NULL";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Json,
    Csv,
}

fn negotiate(headers: &HeaderMap) -> Result<Format, ServerError> {
    let accept = match headers.get(header::ACCEPT) {
        Some(value) => value
            .to_str()
            .map_err(|_| ServerError::NotAcceptable("unreadable Accept header".to_string()))?
            .trim(),
        None => "",
    };
    match accept {
        "" | "*/*" | "application/json" => Ok(Format::Json),
        "text/csv" => Ok(Format::Csv),
        other => Err(ServerError::NotAcceptable(format!(
            "unsupported Accept header: {other}"
        ))),
    }
}

fn window_param(value: Option<&str>, label: &str) -> Result<i64, ServerError> {
    let invalid = || ServerError::Generic(format!("invalid {label} query parameter"));
    match value {
        None | Some("") => Ok(-1),
        Some(raw) => {
            let parsed: i64 = raw.parse().map_err(|_| invalid())?;
            if parsed < -1 {
                return Err(invalid());
            }
            Ok(parsed)
        }
    }
}

fn time_param(value: Option<&str>, label: &str) -> Result<Option<DateTime<Utc>>, ServerError> {
    match value {
        None | Some("") => Ok(None),
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|at| Some(at.with_timezone(&Utc)))
            .map_err(|_| ServerError::Generic(format!("invalid query parameter {label}"))),
    }
}

fn parse_query(
    wallet_id: uuid::Uuid,
    query: &TransactionList,
) -> Result<(Page, TransactionFilter), ServerError> {
    let limit = window_param(query.limit.as_deref(), "limit")?;
    let offset = window_param(query.offset.as_deref(), "offset")?;
    let page = Page::new(limit, offset).map_err(|err| ServerError::Generic(err.to_string()))?;

    let mut filter = TransactionFilter::new(wallet_id);
    if let Some(raw) = query.operation_type.as_deref().filter(|raw| !raw.is_empty()) {
        let operation_type = OperationType::try_from(raw).map_err(|_| {
            ServerError::Generic("invalid query parameter operation_type".to_string())
        })?;
        filter = filter.operation_type(operation_type);
    }
    filter.processed_at_gte = time_param(query.processed_at_gte.as_deref(), "processed_at.gte")?;
    filter.processed_at_lte = time_param(query.processed_at_lte.as_deref(), "processed_at.lte")?;
    filter
        .validate()
        .map_err(|_| ServerError::Generic("invalid time range processed_at".to_string()))?;

    Ok((page, filter))
}

fn to_view(view: &ledger::TransactionView) -> TransactionView {
    let mut out = TransactionView {
        operation_type: view.operation_type.as_str().to_string(),
        amount: view.amount,
        sender_wallet_id: None,
        sender_wallet_balance: None,
        sender_wallet_me: view.sender_is_me(),
        recipient_wallet_id: None,
        recipient_wallet_balance: None,
        recipient_wallet_me: view.recipient_is_me(),
        balance: view.balance,
        processed_at: view.processed_at,
    };
    if let Some(counterpart) = view.counterpart {
        match view.role {
            Role::Sender => {
                out.recipient_wallet_id = Some(counterpart.id);
                out.recipient_wallet_balance = Some(counterpart.balance);
            }
            Role::Recipient => {
                out.sender_wallet_id = Some(counterpart.id);
                out.sender_wallet_balance = Some(counterpart.balance);
            }
        }
    }
    out
}

fn or_null<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| CSV_NULL.to_string(), |v| v.to_string())
}

fn flag(value: bool) -> String {
    if value {
        "true".to_string()
    } else {
        CSV_NULL.to_string()
    }
}

fn to_csv(views: &[TransactionView]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;
    for view in views {
        writer.write_record([
            view.operation_type.clone(),
            view.amount.to_string(),
            or_null(view.sender_wallet_id),
            or_null(view.sender_wallet_balance),
            flag(view.sender_wallet_me),
            or_null(view.recipient_wallet_id),
            or_null(view.recipient_wallet_balance),
            flag(view.recipient_wallet_me),
            view.balance.to_string(),
            view.processed_at.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        ])?;
    }
    writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))
}

/// Handle requests listing the history of the wallet named by the path
pub async fn list(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Query(query): Query<TransactionList>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    let format = negotiate(&headers)?;
    let wallet_id = parse_wallet_id(&id)?;
    let (page, filter) = parse_query(wallet_id, &query)?;

    let views: Vec<TransactionView> = state
        .service
        .transaction_views(page, &filter)
        .await?
        .iter()
        .map(to_view)
        .collect();

    match format {
        Format::Json => Ok(Json(views).into_response()),
        Format::Csv => {
            let body = to_csv(&views).map_err(|err| ServerError::Internal(err.to_string()))?;
            Ok(([(header::CONTENT_TYPE, "text/csv")], body).into_response())
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;
    use chrono::TimeZone;
    use ledger::WalletRef;
    use uuid::Uuid;

    use super::*;

    fn accept(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn negotiation() {
        assert_eq!(negotiate(&HeaderMap::new()).ok(), Some(Format::Json));
        assert_eq!(negotiate(&accept("*/*")).ok(), Some(Format::Json));
        assert_eq!(negotiate(&accept("application/json")).ok(), Some(Format::Json));
        assert_eq!(negotiate(&accept("text/csv")).ok(), Some(Format::Csv));
        assert!(matches!(
            negotiate(&accept("text/xml")),
            Err(ServerError::NotAcceptable(_))
        ));
    }

    #[test]
    fn window_defaults_to_unbounded() {
        assert_eq!(window_param(None, "limit").ok(), Some(-1));
        assert_eq!(window_param(Some("0"), "limit").ok(), Some(0));
        assert!(window_param(Some("-2"), "limit").is_err());
        assert!(window_param(Some("ten"), "offset").is_err());
    }

    #[test]
    fn query_parsing() {
        let id = Uuid::new_v4();
        let query = TransactionList {
            limit: Some("10".to_string()),
            offset: Some("0".to_string()),
            operation_type: Some("transfer".to_string()),
            processed_at_gte: Some("2022-01-10T00:00:00Z".to_string()),
            processed_at_lte: Some("2022-01-10T23:59:59Z".to_string()),
        };

        let (page, filter) = parse_query(id, &query).ok().unwrap();

        assert_eq!(page, Page::unbounded().limit(10).offset(0));
        assert_eq!(filter.operation_type, Some(OperationType::Transfer));
        assert_eq!(
            filter.processed_at_lte,
            Some(Utc.with_ymd_and_hms(2022, 1, 10, 23, 59, 59).unwrap())
        );
    }

    #[test]
    fn inverted_range_is_rejected() {
        let query = TransactionList {
            processed_at_gte: Some("2022-01-11T00:00:00Z".to_string()),
            processed_at_lte: Some("2022-01-10T00:00:00Z".to_string()),
            ..Default::default()
        };
        assert!(parse_query(Uuid::new_v4(), &query).is_err());
    }

    #[test]
    fn csv_renders_missing_values_as_null() {
        let me = Uuid::new_v4();
        let other = Uuid::new_v4();
        let at = Utc.with_ymd_and_hms(2022, 1, 10, 12, 0, 0).unwrap();
        let tx = ledger::Transaction {
            id: 2,
            operation_type: OperationType::Transfer,
            amount: 50,
            processed_at: at,
            recipient: WalletRef {
                id: me,
                balance: 150,
            },
            sender: Some(WalletRef {
                id: other,
                balance: 10,
            }),
        };
        let view = to_view(&ledger::TransactionView::project(me, &tx));

        let body = String::from_utf8(to_csv(&[view]).ok().unwrap()).unwrap();
        let lines: Vec<&str> = body.lines().collect();

        assert_eq!(lines[0], CSV_HEADER.join(","));
        assert_eq!(
            lines[1],
            format!("transfer,50,{other},10,NULL,NULL,NULL,true,150,2022-01-10T12:00:00Z")
        );
    }
}
