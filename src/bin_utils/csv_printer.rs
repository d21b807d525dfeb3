use std::io::Write;

use anyhow::Context;
use csv::Writer;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::account::{Account, AccountNumber};

#[derive(Debug, Serialize)]
struct AccountRow<'a> {
    account: &'a AccountNumber,
    balance: Decimal,
}

/// Writes `account,balance` rows in the order given.
pub fn print_accounts<W>(output: &mut W, accounts: &[Account]) -> anyhow::Result<()>
where
    W: Write,
{
    let mut writer = Writer::from_writer(output);
    for acc in accounts {
        writer
            .serialize(AccountRow {
                account: acc.account_number(),
                balance: acc.balance(),
            })
            .with_context(|| format!("Failed to write account `{}`", acc.account_number()))?;
    }
    writer.flush().context("Failed to flush CSV writer")
}
