use axum::{
    Router,
    routing::{get, post},
};
use ledger::{CurrencyPolicy, WalletService};

use std::{future::Future, sync::Arc};

use crate::{docs, transactions, wallets};

#[derive(Clone)]
pub struct ServerState {
    pub service: Arc<WalletService>,
    /// Currencies a new wallet may be opened in.
    pub currencies: Arc<CurrencyPolicy>,
}

impl ServerState {
    pub fn new(service: WalletService, currencies: CurrencyPolicy) -> Self {
        Self {
            service: Arc::new(service),
            currencies: Arc::new(currencies),
        }
    }
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/api/v1/wallets", post(wallets::wallet_new))
        .route("/api/v1/wallets/{id}", get(wallets::get))
        .route("/api/v1/wallets/{id}/deposit", post(wallets::deposit))
        .route("/api/v1/wallets/{id}/transfer", post(wallets::transfer))
        .route("/api/v1/wallets/{id}/transactions", get(transactions::list))
        .route("/api.yaml", get(docs::api_yaml))
        .route("/docs", get(docs::redoc))
        .with_state(state)
}

/// Serve until `shutdown` resolves, then stop accepting connections and
/// wait for in-flight requests.
pub async fn run_with_listener<F>(
    state: ServerState,
    listener: tokio::net::TcpListener,
    shutdown: F,
) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}
