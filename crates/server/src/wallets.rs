//! Wallet API endpoints

use api_types::{
    deposit::{DepositNew, DepositResponse},
    transfer::{TransferNew, TransferResponse},
    wallet::{Wallet, WalletCreated, WalletNew},
};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

pub(crate) fn parse_wallet_id(value: &str) -> Result<Uuid, ServerError> {
    Uuid::parse_str(value).map_err(|_| ServerError::Generic(format!("invalid wallet id: {value}")))
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ServerError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ServerError::Generic(rejection.body_text()))
}

fn ensure_positive(amount: u64) -> Result<(), ServerError> {
    if amount == 0 {
        return Err(ServerError::Generic("amount must be greater than 0".to_string()));
    }
    Ok(())
}

/// Handle requests for creating a new wallet
pub async fn wallet_new(
    State(state): State<ServerState>,
    payload: Result<Json<WalletNew>, JsonRejection>,
) -> Result<(StatusCode, Json<WalletCreated>), ServerError> {
    let payload = body(payload)?;
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(ServerError::Generic("name is required".to_string()));
    }
    let currency = state
        .currencies
        .validate(&payload.currency)
        .map_err(|err| ServerError::Generic(err.to_string()))?;

    let id = state.service.create_wallet(name, currency).await?;

    Ok((StatusCode::CREATED, Json(WalletCreated { id })))
}

/// Handle requests for a wallet snapshot
pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<Wallet>, ServerError> {
    let id = parse_wallet_id(&id)?;
    let wallet = state.service.wallet(id).await?;

    Ok(Json(Wallet {
        id: wallet.id,
        name: wallet.name,
        currency: wallet.currency.code().to_string(),
        balance: wallet.balance,
    }))
}

/// Handle deposits into the wallet named by the path
pub async fn deposit(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    payload: Result<Json<DepositNew>, JsonRejection>,
) -> Result<Json<DepositResponse>, ServerError> {
    let id = parse_wallet_id(&id)?;
    let payload = body(payload)?;
    ensure_positive(payload.amount)?;

    let tx = state.service.deposit(id, payload.amount).await?;

    Ok(Json(DepositResponse {
        balance: tx.recipient.balance,
    }))
}

/// Handle transfers into the wallet named by the path
pub async fn transfer(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    payload: Result<Json<TransferNew>, JsonRejection>,
) -> Result<Json<TransferResponse>, ServerError> {
    let recipient_id = parse_wallet_id(&id)?;
    let payload = body(payload)?;
    ensure_positive(payload.amount)?;

    let tx = state
        .service
        .transfer(payload.sender_wallet_id, recipient_id, payload.amount)
        .await?;
    let Some(sender) = tx.sender else {
        return Err(ServerError::Internal(format!(
            "transfer {} has no sender side",
            tx.id
        )));
    };

    Ok(Json(TransferResponse {
        sender_wallet_balance: sender.balance,
        balance: tx.recipient.balance,
    }))
}
