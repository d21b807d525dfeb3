use std::{fmt, str::FromStr};

use rust_decimal::{Decimal, prelude::Zero};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::command::{TransactionCommand, TransactionKind};

/// Opaque account identifier. Never empty, never changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct AccountNumber(String);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccountNumberError {
    #[error("Account number must not be empty")]
    Empty,
}

impl AccountNumber {
    pub fn parse(raw: impl Into<String>) -> Result<Self, AccountNumberError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AccountNumberError::Empty);
        }
        if trimmed.len() == raw.len() {
            Ok(Self(raw))
        } else {
            Ok(Self(trimmed.to_owned()))
        }
    }

    /// For compile-time literals known to be non-empty.
    pub(crate) fn from_static(raw: &'static str) -> Self {
        debug_assert!(!raw.trim().is_empty());
        Self(raw.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for AccountNumber {
    type Error = AccountNumberError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl FromStr for AccountNumber {
    type Err = AccountNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for AccountNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountEventKind {
    Deposited,
    Withdrawn,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountEvent {
    amount: Decimal,
    kind: AccountEventKind,
}

impl AccountEvent {
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn kind(&self) -> AccountEventKind {
        self.kind
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccountError {
    #[error("Insufficient funds")]
    InsufficientFunds { balance: Decimal, requested: Decimal },
    #[error("Deposit would overflow the account balance")]
    BalanceOverflow { balance: Decimal, requested: Decimal },
    #[error("Opening balance must not be negative, got {balance}")]
    NegativeOpeningBalance { balance: Decimal },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    account_number: AccountNumber,
    #[serde(with = "rust_decimal::serde::float")]
    balance: Decimal,
}

impl Account {
    pub fn new(account_number: AccountNumber, balance: Decimal) -> Result<Self, AccountError> {
        if balance < Decimal::zero() {
            return Err(AccountError::NegativeOpeningBalance { balance });
        }
        Ok(Self {
            account_number,
            balance,
        })
    }

    /// Zero-balance account, the shape every auto-created account takes.
    pub fn empty(account_number: AccountNumber) -> Self {
        Self {
            account_number,
            balance: Decimal::zero(),
        }
    }

    pub fn account_number(&self) -> &AccountNumber {
        &self.account_number
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    /// Applies an event produced by [`Account::handle_transaction`].
    ///
    /// Events are the source of truth: nothing is validated here.
    pub fn apply(&mut self, event: &AccountEvent) {
        match event.kind {
            AccountEventKind::Deposited => {
                self.balance += event.amount;
            }
            AccountEventKind::Withdrawn => {
                self.balance -= event.amount;
            }
        }
    }

    pub fn handle_transaction(
        &self,
        command: &TransactionCommand,
    ) -> Result<AccountEvent, AccountError> {
        let amount = command.amount();
        match command.kind() {
            TransactionKind::Deposit => {
                if self.balance.checked_add(amount).is_some() {
                    Ok(AccountEvent {
                        amount,
                        kind: AccountEventKind::Deposited,
                    })
                } else {
                    Err(AccountError::BalanceOverflow {
                        balance: self.balance,
                        requested: amount,
                    })
                }
            }
            TransactionKind::Withdrawal => {
                if self.balance >= amount {
                    Ok(AccountEvent {
                        amount,
                        kind: AccountEventKind::Withdrawn,
                    })
                } else {
                    Err(AccountError::InsufficientFunds {
                        balance: self.balance,
                        requested: amount,
                    })
                }
            }
        }
    }
}
