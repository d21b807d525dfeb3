use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    account::{Account, AccountNumber},
    command::{TransactionCommand, TransactionKind},
    ledger::{LedgerError, TransactionResult},
};

use super::{ApiError, SharedLedger};

#[derive(Debug, Deserialize)]
pub struct AmountRequest {
    pub amount: Decimal,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Welcome to the ATM System API",
    })
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// GET /accounts
pub async fn list_accounts(State(ledger): State<SharedLedger>) -> Json<Vec<Account>> {
    Json(ledger.accounts())
}

/// GET /accounts/{account_number}/balance
///
/// Unknown accounts are created with a zero balance.
pub async fn get_balance(
    State(ledger): State<SharedLedger>,
    Path(account_number): Path<String>,
) -> Result<Json<Account>, ApiError> {
    let account_number = AccountNumber::parse(account_number)?;
    Ok(Json(ledger.inquire_balance(&account_number).account))
}

/// POST /accounts/{account_number}/withdraw
pub async fn withdraw(
    State(ledger): State<SharedLedger>,
    Path(account_number): Path<String>,
    body: Result<Json<AmountRequest>, JsonRejection>,
) -> Result<Json<TransactionResult>, ApiError> {
    let (account_number, amount) =
        decode_transaction(account_number, body, TransactionKind::Withdrawal)?;
    let result = ledger
        .withdraw(&account_number, amount)
        .inspect_err(|err| log_rejection(&account_number, amount, err))?;
    Ok(Json(result))
}

/// POST /accounts/{account_number}/deposit
pub async fn deposit(
    State(ledger): State<SharedLedger>,
    Path(account_number): Path<String>,
    body: Result<Json<AmountRequest>, JsonRejection>,
) -> Result<Json<TransactionResult>, ApiError> {
    let (account_number, amount) =
        decode_transaction(account_number, body, TransactionKind::Deposit)?;
    let result = ledger
        .deposit(&account_number, amount)
        .inspect_err(|err| log_rejection(&account_number, amount, err))?;
    Ok(Json(result))
}

fn log_rejection(account_number: &AccountNumber, amount: Decimal, err: &LedgerError) {
    tracing::info!(
        account = %account_number,
        %amount,
        kind = ?err.kind(),
        "transaction rejected: {err}"
    );
}

/// Rejects empty account numbers, malformed bodies and non-positive amounts
/// before the ledger sees them. The ledger validates the amount again.
fn decode_transaction(
    account_number: String,
    body: Result<Json<AmountRequest>, JsonRejection>,
    kind: TransactionKind,
) -> Result<(AccountNumber, Decimal), ApiError> {
    let account_number = AccountNumber::parse(account_number)?;
    let Json(request) = body?;
    let command = TransactionCommand::parse(kind, Some(request.amount))?;
    Ok((account_number, command.amount()))
}
