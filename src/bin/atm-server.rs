use std::sync::Arc;

use anyhow::{Context, Result};
use atm_ledger::{
    config::get_configuration, ledger::LedgerService, logging::init_logging,
    transport::{SharedLedger, build_router},
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let settings = get_configuration().context("Failed to read configuration")?;
    init_logging(&settings.log).context("Failed to initialize logging")?;

    let ledger: SharedLedger = Arc::new(LedgerService::default());
    for seed in &settings.seed_accounts {
        ledger
            .open_account(&seed.account_number, seed.balance)
            .with_context(|| format!("Invalid seed account `{}`", seed.account_number))?;
    }
    info!(accounts = settings.seed_accounts.len(), "seed accounts opened");

    let app = build_router(ledger);

    let address = settings.server.address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind to address {address}"))?;

    info!("Starting atm-server on {address}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("atm-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {err}");
    }
}
