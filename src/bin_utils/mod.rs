//! Batch driver for [`crate::ledger`]: replays a CSV of operations and prints
//! the resulting balances. Shared by the `atm-ledger` binary and the
//! integration tests.

use std::io::{Read, Write};

use crate::{
    command::TransactionCommand,
    ledger::{LedgerError, LedgerService},
};
use anyhow::Result;
use csv_parser::CsvOperationParser;
use csv_printer::print_accounts;
use thiserror::Error;
pub mod csv_parser;
pub mod csv_printer;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("Malformed row: {0}")]
    Parse(#[from] csv::Error),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

pub struct Service<'w, R, W: 'w> {
    pub input: R,
    pub output: &'w mut W,
    pub error_printer: Box<dyn FnMut(u64, ReplayError)>,
}

impl<'w, R, W> Service<'w, R, W>
where
    R: Read,
    W: Write + 'w,
{
    pub fn run(self) -> Result<()> {
        self.run_with(&LedgerService::default())
    }

    /// Replays against `ledger`, so callers can pre-seed accounts.
    pub fn run_with(mut self, ledger: &LedgerService) -> Result<()> {
        let parser = CsvOperationParser::new(self.input);

        for (line, row) in parser {
            let outcome = row.map_err(ReplayError::from).and_then(|row| {
                match row.operation.transaction_kind() {
                    Some(kind) => {
                        let command = TransactionCommand::parse(kind, row.amount)
                            .map_err(LedgerError::from)?;
                        ledger.execute(&row.account, command)?;
                    }
                    None => {
                        ledger.inquire_balance(&row.account);
                    }
                }
                Ok(())
            });
            if let Err(err) = outcome {
                (self.error_printer)(line, err);
            }
        }

        print_accounts(self.output, &ledger.accounts())
    }
}
