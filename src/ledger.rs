use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, trace};

use crate::{
    account::{Account, AccountError, AccountNumber},
    command::{CommandError, TransactionCommand, TransactionKind},
    store::{AccountStore, InMemoryAccountStore},
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error(transparent)]
    Account(#[from] AccountError),
}

/// Coarse classification adapters use to pick a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidAmount,
    InsufficientFunds,
}

impl LedgerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::Command(_) => ErrorKind::InvalidAmount,
            LedgerError::Account(
                AccountError::NegativeOpeningBalance { .. } | AccountError::BalanceOverflow { .. },
            ) => ErrorKind::InvalidAmount,
            LedgerError::Account(AccountError::InsufficientFunds { .. }) => {
                ErrorKind::InsufficientFunds
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionResult {
    pub account_number: AccountNumber,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceInquiry {
    pub account: Account,
    /// `true` when this inquiry materialized the account.
    pub created: bool,
}

/// Business rules around an [`AccountStore`].
///
/// Every entry point auto-creates unknown accounts with a zero balance, so
/// there is no "account not found" outcome. Amounts are validated before the
/// account is resolved: a rejected amount never creates an account.
#[derive(Debug, Default)]
pub struct LedgerService<S = InMemoryAccountStore> {
    store: S,
}

impl<S> LedgerService<S>
where
    S: AccountStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn inquire_balance(&self, account_number: &AccountNumber) -> BalanceInquiry {
        let (account, created) = self
            .store
            .get_or_create(Account::empty(account_number.clone()));
        if created {
            debug!(account = %account_number, "account created on balance inquiry");
        }
        BalanceInquiry { account, created }
    }

    /// Explicitly opens an account. An existing account is left untouched.
    pub fn open_account(
        &self,
        account_number: &AccountNumber,
        opening_balance: Decimal,
    ) -> Result<BalanceInquiry, LedgerError> {
        let account = Account::new(account_number.clone(), opening_balance)?;
        let (account, created) = self.store.get_or_create(account);
        if created {
            debug!(account = %account_number, balance = %opening_balance, "account opened");
        }
        Ok(BalanceInquiry { account, created })
    }

    pub fn withdraw(
        &self,
        account_number: &AccountNumber,
        amount: Decimal,
    ) -> Result<TransactionResult, LedgerError> {
        let command = TransactionCommand::parse(TransactionKind::Withdrawal, Some(amount))?;
        self.execute(account_number, command)
    }

    pub fn deposit(
        &self,
        account_number: &AccountNumber,
        amount: Decimal,
    ) -> Result<TransactionResult, LedgerError> {
        let command = TransactionCommand::parse(TransactionKind::Deposit, Some(amount))?;
        self.execute(account_number, command)
    }

    /// Applies an already validated command inside the account's critical
    /// section.
    pub fn execute(
        &self,
        account_number: &AccountNumber,
        command: TransactionCommand,
    ) -> Result<TransactionResult, LedgerError> {
        let (outcome, created) = self.store.transact(account_number, |account| {
            let event = account.handle_transaction(&command)?;
            account.apply(&event);
            Ok::<_, AccountError>(account.balance())
        });
        if created {
            debug!(account = %account_number, kind = %command.kind(), "account created on first transaction");
        }
        let balance = outcome?;
        trace!(
            account = %account_number,
            kind = %command.kind(),
            amount = %command.amount(),
            %balance,
            "transaction applied"
        );
        Ok(TransactionResult {
            account_number: account_number.clone(),
            balance,
            message: command.success_message(),
        })
    }

    pub fn accounts(&self) -> Vec<Account> {
        self.store.list()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn number(raw: &str) -> AccountNumber {
        AccountNumber::parse(raw).unwrap()
    }

    #[test]
    fn deposit_and_withdraw_scenario() {
        let ledger = LedgerService::<InMemoryAccountStore>::default();
        let acct = number("12345");
        ledger.open_account(&acct, dec!(1000.00)).unwrap();

        let res = ledger.deposit(&acct, dec!(500)).unwrap();
        assert_eq!(res.balance, dec!(1500.00));
        assert_eq!(res.account_number, acct);
        assert_eq!(res.message, "Successfully deposited $500.00");

        let res = ledger.withdraw(&acct, dec!(200)).unwrap();
        assert_eq!(res.balance, dec!(1300.00));
        assert_eq!(res.message, "Successfully withdrew $200.00");

        let err = ledger.withdraw(&acct, dec!(5000)).unwrap_err();
        assert_eq!(
            err,
            LedgerError::Account(AccountError::InsufficientFunds {
                balance: dec!(1300.00),
                requested: dec!(5000)
            })
        );
        assert_eq!(err.kind(), ErrorKind::InsufficientFunds);
        assert_eq!(ledger.inquire_balance(&acct).account.balance(), dec!(1300.00));
    }

    #[test]
    fn inquiry_creates_account_once() {
        let ledger = LedgerService::<InMemoryAccountStore>::default();
        let acct = number("never-seen");

        let first = ledger.inquire_balance(&acct);
        assert!(first.created);
        assert_eq!(first.account.balance(), dec!(0));

        ledger.deposit(&acct, dec!(3)).unwrap();
        let second = ledger.inquire_balance(&acct);
        assert!(!second.created);
        assert_eq!(second.account.balance(), dec!(3));
        assert_eq!(ledger.accounts().len(), 1);
    }

    #[test]
    fn non_positive_amounts_are_rejected() {
        let ledger = LedgerService::<InMemoryAccountStore>::default();
        let acct = number("1");
        ledger.open_account(&acct, dec!(10)).unwrap();

        for amount in [dec!(0), dec!(-5)] {
            let err = ledger.withdraw(&acct, amount).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidAmount);
            let err = ledger.deposit(&acct, amount).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidAmount);
        }
        assert_eq!(ledger.inquire_balance(&acct).account.balance(), dec!(10));
    }

    #[test]
    fn rejected_amount_does_not_create_account() {
        let ledger = LedgerService::<InMemoryAccountStore>::default();
        ledger.deposit(&number("1"), dec!(-1)).unwrap_err();
        ledger.withdraw(&number("2"), dec!(0)).unwrap_err();
        assert!(ledger.store().is_empty());
    }

    #[test]
    fn withdrawal_from_unknown_account_creates_it_and_fails() {
        let ledger = LedgerService::<InMemoryAccountStore>::default();
        let acct = number("fresh");
        let err = ledger.withdraw(&acct, dec!(1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientFunds);

        let inquiry = ledger.inquire_balance(&acct);
        assert!(!inquiry.created);
        assert_eq!(inquiry.account.balance(), dec!(0));
    }

    #[test]
    fn deposit_to_unknown_account_creates_it() {
        let ledger = LedgerService::<InMemoryAccountStore>::default();
        let res = ledger.deposit(&number("new"), dec!(42.42)).unwrap();
        assert_eq!(res.balance, dec!(42.42));
        assert_eq!(ledger.accounts().len(), 1);
    }

    #[test]
    fn open_account_does_not_reset_existing() {
        let ledger = LedgerService::<InMemoryAccountStore>::default();
        let acct = number("1");
        assert!(ledger.open_account(&acct, dec!(100)).unwrap().created);

        let reopened = ledger.open_account(&acct, dec!(0)).unwrap();
        assert!(!reopened.created);
        assert_eq!(reopened.account.balance(), dec!(100));

        let err = ledger.open_account(&number("2"), dec!(-1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidAmount);
        assert_eq!(ledger.accounts().len(), 1);
    }

    #[test]
    fn deposit_overflow_leaves_balance_unchanged() {
        let ledger = LedgerService::<InMemoryAccountStore>::default();
        let acct = number("big");
        ledger.deposit(&acct, Decimal::MAX).unwrap();

        let err = ledger.deposit(&acct, Decimal::ONE).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidAmount);
        assert_eq!(
            err.to_string(),
            "Deposit would overflow the account balance"
        );
        assert_eq!(ledger.inquire_balance(&acct).account.balance(), Decimal::MAX);

        // the account lock was released: further operations still work
        let res = ledger.withdraw(&acct, dec!(1)).unwrap();
        assert_eq!(res.balance, Decimal::MAX - Decimal::ONE);
    }

    #[test]
    fn only_parsed_commands_reach_the_store() {
        let ledger = LedgerService::<InMemoryAccountStore>::default();
        let acct = number("1");

        for kind in [TransactionKind::Deposit, TransactionKind::Withdrawal] {
            let err = TransactionCommand::parse(kind, Some(dec!(-50))).unwrap_err();
            assert_eq!(LedgerError::from(err).kind(), ErrorKind::InvalidAmount);
        }

        let command = TransactionCommand::parse(TransactionKind::Deposit, Some(dec!(50))).unwrap();
        let res = ledger.execute(&acct, command).unwrap();
        assert_eq!(res.balance, dec!(50));
        assert_eq!(command.amount(), dec!(50));

        assert!(ledger.deposit(&acct, dec!(-50)).is_err());
        assert!(ledger.withdraw(&acct, dec!(-50)).is_err());
        assert_eq!(ledger.inquire_balance(&acct).account.balance(), dec!(50));
    }

    #[test]
    fn serialize_transaction_result() {
        let res = TransactionResult {
            account_number: number("12345"),
            balance: dec!(1500.00),
            message: "Successfully deposited $500.00".to_string(),
        };
        let json = serde_json::to_value(&res).unwrap();
        assert_eq!(json["account_number"], "12345");
        assert_eq!(json["balance"].as_f64(), Some(1500.0));
        assert_eq!(json["message"], "Successfully deposited $500.00");
    }
}
