use std::fmt;

use rust_decimal::{Decimal, prelude::Zero};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
}

impl TransactionKind {
    fn past_tense(self) -> &'static str {
        match self {
            TransactionKind::Deposit => "deposited",
            TransactionKind::Withdrawal => "withdrew",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Deposit => f.write_str("deposit"),
            TransactionKind::Withdrawal => f.write_str("withdrawal"),
        }
    }
}

/// A validated balance mutation: the amount is always strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionCommand {
    kind: TransactionKind,
    amount: Decimal,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Amount is required for {kind:?}")]
    AmountRequired { kind: TransactionKind },
    #[error("{kind:?} amount must be positive")]
    InvalidAmount {
        kind: TransactionKind,
        amount: Decimal,
    },
}

impl TransactionCommand {
    pub fn parse(kind: TransactionKind, amount: Option<Decimal>) -> Result<Self, CommandError> {
        let Some(amount) = amount else {
            return Err(CommandError::AmountRequired { kind });
        };
        if amount > Decimal::zero() {
            Ok(Self { kind, amount })
        } else {
            Err(CommandError::InvalidAmount { kind, amount })
        }
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Human readable outcome, e.g. `Successfully withdrew $200.00`.
    pub fn success_message(&self) -> String {
        let mut shown = self.amount;
        shown.rescale(2);
        format!("Successfully {} ${shown}", self.kind.past_tense())
    }
}
