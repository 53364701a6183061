use std::{io, path::PathBuf};

use thiserror::Error;

use crate::{account::AccountSnapshot, transaction::TransactionRecord};

pub mod csv_storage;
pub mod in_memory_storage;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on `{}`: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("Unsupported format in `{}`: expected `{expected}`, found `{found}`", .path.display())]
    UnsupportedFormat {
        path: PathBuf,
        expected: &'static str,
        found: String,
    },
    #[error("Malformed data in `{}`: {source}", .path.display())]
    Csv { path: PathBuf, source: csv::Error },
}

/// Durable home of the account set and the transaction history.
///
/// Both collections are independent resources and every save overwrites the
/// whole resource. A resource that was never written loads as empty.
pub trait LedgerStorage {
    fn save_accounts(&mut self, accounts: &[AccountSnapshot]) -> Result<(), StorageError>;

    fn load_accounts(&self) -> Result<Vec<AccountSnapshot>, StorageError>;

    fn save_transactions(&mut self, records: &[TransactionRecord]) -> Result<(), StorageError>;

    fn load_transactions(&self) -> Result<Vec<TransactionRecord>, StorageError>;
}
