/// Accounts and the store that owns them.
/// Balances change through validated events, so they never go below zero.
pub mod account;

/// Balance-mutating requests handled by [`ledger`].
pub mod command;

/// Append-only transaction history and `TXN<n>` identifiers.
pub mod transaction;

/// Orchestrates store, history and storage: mutate, record, flush.
pub mod ledger;

/// Durable storage interface, plus CSV file and "in memory" implementations.
pub mod storage;

/// Front-end pieces for the binary. Kept in the library so integration
/// tests can drive it.
pub mod bin_utils;
