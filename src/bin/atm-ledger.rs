use std::fs::File;

use anyhow::{Context, Result};
use atm_ledger::bin_utils::{ReplayError, Service};
use atm_ledger::ledger::LedgerError;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let filename = std::env::args()
        .nth(1)
        .context("Expected a file name as the first argument")?;
    let file = File::open(&filename).with_context(|| format!("Failed to open `{filename}`"))?;

    let service = Service {
        input: file,
        output: &mut std::io::stdout(),
        error_printer: Box::new(|line, err| {
            match err {
                ReplayError::Parse(_) | ReplayError::Ledger(LedgerError::Command(_)) => {
                    tracing::warn!("Error at line {line}: {err}")
                }
                ReplayError::Ledger(LedgerError::Account(_)) => {
                    // business rejections, not input errors
                    tracing::debug!("Rejected at line {line}: {err}")
                }
            }
        }),
    };
    service.run()
}
