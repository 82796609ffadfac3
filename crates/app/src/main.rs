use std::{sync::Arc, time::Duration};

use ledger::{CurrencyPolicy, Ledger, WalletService};
use migration::{Migrator, MigratorTrait};
use server::ServerState;
use tokio::sync::oneshot;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "wallets={level},server={level},ledger={level}",
            level = settings.app.level
        ))
        .init();

    let currencies = CurrencyPolicy::from_codes(&settings.currencies)?;
    let db = connect_database(&settings.database.url).await?;
    let ledger = Ledger::builder().database(db).build().await?;
    let state = ServerState::new(WalletService::new(Arc::new(ledger)), currencies);

    let addr = format!("{}:{}", settings.server.bind, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let mut serving = tokio::spawn(server::run_with_listener(state, listener, async move {
        let _ = stop_rx.await;
    }));

    tokio::select! {
        res = &mut serving => {
            res??;
            return Ok(());
        }
        res = tokio::signal::ctrl_c() => res?,
    }

    tracing::info!("shutdown requested, draining in-flight requests");
    let _ = stop_tx.send(());
    let grace = Duration::from_secs(settings.server.shutdown_grace_period_secs);
    match tokio::time::timeout(grace, &mut serving).await {
        Ok(res) => res??,
        Err(_) => {
            tracing::warn!("grace period of {grace:?} elapsed, aborting open connections");
            serving.abort();
        }
    }

    tracing::info!("server stopped");
    Ok(())
}

async fn connect_database(
    url: &str,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    tracing::info!("database ready");
    Ok(database)
}
