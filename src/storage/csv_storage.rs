use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::{account::AccountSnapshot, transaction::TransactionRecord};

use super::{LedgerStorage, StorageError};

pub const ACCOUNTS_FILE: &str = "accounts.csv";
pub const TRANSACTIONS_FILE: &str = "transactions.csv";

const ACCOUNTS_SCHEMA: &str = "# bank-ledger accounts v1";
const TRANSACTIONS_SCHEMA: &str = "# bank-ledger transactions v1";

/// Stores each collection as a CSV file inside a data directory.
///
/// Files start with a schema line followed by a regular CSV table:
///
/// ```text
/// # bank-ledger accounts v1
/// id,owner,category,balance
/// 1000001,Ada,Savings,70
/// ```
#[derive(Debug, Clone)]
pub struct CsvStorage {
    accounts_path: PathBuf,
    transactions_path: PathBuf,
}

impl CsvStorage {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref();
        Self {
            accounts_path: data_dir.join(ACCOUNTS_FILE),
            transactions_path: data_dir.join(TRANSACTIONS_FILE),
        }
    }

    pub fn accounts_path(&self) -> &Path {
        &self.accounts_path
    }

    pub fn transactions_path(&self) -> &Path {
        &self.transactions_path
    }
}

impl LedgerStorage for CsvStorage {
    fn save_accounts(&mut self, accounts: &[AccountSnapshot]) -> Result<(), StorageError> {
        write_table(&self.accounts_path, ACCOUNTS_SCHEMA, accounts)
    }

    fn load_accounts(&self) -> Result<Vec<AccountSnapshot>, StorageError> {
        read_table(&self.accounts_path, ACCOUNTS_SCHEMA)
    }

    fn save_transactions(&mut self, records: &[TransactionRecord]) -> Result<(), StorageError> {
        write_table(&self.transactions_path, TRANSACTIONS_SCHEMA, records)
    }

    fn load_transactions(&self) -> Result<Vec<TransactionRecord>, StorageError> {
        read_table(&self.transactions_path, TRANSACTIONS_SCHEMA)
    }
}

fn io_err(path: &Path) -> impl FnOnce(io::Error) -> StorageError + '_ {
    move |source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn write_table<T>(path: &Path, schema: &'static str, rows: &[T]) -> Result<(), StorageError>
where
    T: Serialize,
{
    let csv_err = |source| StorageError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut buf = format!("{schema}\n").into_bytes();
    {
        let mut writer = csv::Writer::from_writer(&mut buf);
        for row in rows {
            writer.serialize(row).map_err(csv_err)?;
        }
        writer.flush().map_err(io_err(path))?;
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err(parent))?;
    }
    // the previous file stays intact until the rename
    let tmp = path.with_extension("csv.tmp");
    fs::write(&tmp, &buf).map_err(io_err(&tmp))?;
    fs::rename(&tmp, path).map_err(io_err(path))?;
    debug!(path = %path.display(), rows = rows.len(), "table written");
    Ok(())
}

fn read_table<T>(path: &Path, schema: &'static str) -> Result<Vec<T>, StorageError>
where
    T: DeserializeOwned,
{
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no table on disk yet");
            return Ok(Vec::new());
        }
        Err(err) => return Err(io_err(path)(err)),
    };

    let (first_line, body) = raw.split_once('\n').unwrap_or((raw.as_str(), ""));
    let first_line = first_line.trim_end_matches('\r');
    if first_line != schema {
        return Err(StorageError::UnsupportedFormat {
            path: path.to_path_buf(),
            expected: schema,
            found: first_line.to_string(),
        });
    }

    let rows = csv::Reader::from_reader(body.as_bytes())
        .into_deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(|source| StorageError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
    debug!(path = %path.display(), rows = rows.len(), "table read");
    Ok(rows)
}
