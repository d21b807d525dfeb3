use std::io::Read;

use crate::{account::AccountNumber, command::TransactionKind};
use csv::{DeserializeRecordsIntoIter, Trim};
use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Deposit,
    Withdrawal,
    Balance,
}

impl Operation {
    pub fn transaction_kind(self) -> Option<TransactionKind> {
        match self {
            Operation::Deposit => Some(TransactionKind::Deposit),
            Operation::Withdrawal => Some(TransactionKind::Withdrawal),
            Operation::Balance => None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct OperationRow {
    #[serde(rename = "type")]
    pub operation: Operation,
    pub account: AccountNumber,
    pub amount: Option<Decimal>,
}

/// Parses an operation list in CSV format (`type,account,amount`).
///
/// Rows that fail to deserialize are yielded as errors rather than ending
/// the iteration.
pub struct CsvOperationParser<R> {
    iter: DeserializeRecordsIntoIter<R, OperationRow>,
}

impl<R> CsvOperationParser<R>
where
    R: Read,
{
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(source);

        Self {
            iter: reader.into_deserialize(),
        }
    }
}

impl<R> Iterator for CsvOperationParser<R>
where
    R: Read,
{
    type Item = (u64, Result<OperationRow, csv::Error>);

    fn next(&mut self) -> Option<Self::Item> {
        let curr_line = self.iter.reader().position().line();
        self.iter.next().map(|row| (curr_line, row))
    }
}
