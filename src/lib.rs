/// Account entity: identity, balance and the event based mutation rules
/// that keep the balance non-negative.
pub mod account;

/// Validated transaction commands that are later executed by [`account`].
pub mod command;

/// Account store interface, plus "in memory" implementation.
/// The store is the only owner of account state and the synchronization
/// boundary for concurrent access.
pub mod store;

/// Ledger service: lookup-or-create policy, amount validation and atomic
/// balance mutation on top of a [`store::AccountStore`].
pub mod ledger;

/// Layered settings (defaults, optional YAML file, `ATM__*` environment).
pub mod config;

pub mod logging;

/// HTTP endpoints over a shared ledger.
pub mod transport;

/// CSV replay of operation lists. It lives in the library so the
/// integration tests can drive it too.
pub mod bin_utils;
