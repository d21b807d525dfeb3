//! HTTP adapter: decodes requests, calls the [`LedgerService`] and encodes
//! its results. No business rule lives here beyond pre-validating amounts.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::ledger::LedgerService;

pub mod error;
pub mod handlers;

pub use error::ApiError;

pub type SharedLedger = Arc<LedgerService>;

pub fn build_router(ledger: SharedLedger) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/accounts", get(handlers::list_accounts))
        .route("/accounts/{account_number}/balance", get(handlers::get_balance))
        .route("/accounts/{account_number}/withdraw", post(handlers::withdraw))
        .route("/accounts/{account_number}/deposit", post(handlers::deposit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(ledger)
}
