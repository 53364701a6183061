use crate::{account::AccountSnapshot, transaction::TransactionRecord};

use super::{LedgerStorage, StorageError};

/// Keeps both collections in memory and counts how often each one was flushed.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStorage {
    accounts: Vec<AccountSnapshot>,
    transactions: Vec<TransactionRecord>,
    account_saves: usize,
    transaction_saves: usize,
}

impl InMemoryStorage {
    pub fn new(accounts: Vec<AccountSnapshot>, transactions: Vec<TransactionRecord>) -> Self {
        Self {
            accounts,
            transactions,
            ..Default::default()
        }
    }

    pub fn accounts(&self) -> &[AccountSnapshot] {
        &self.accounts
    }

    pub fn transactions(&self) -> &[TransactionRecord] {
        &self.transactions
    }

    pub fn account_saves(&self) -> usize {
        self.account_saves
    }

    pub fn transaction_saves(&self) -> usize {
        self.transaction_saves
    }
}

impl LedgerStorage for InMemoryStorage {
    fn save_accounts(&mut self, accounts: &[AccountSnapshot]) -> Result<(), StorageError> {
        self.accounts = accounts.to_vec();
        self.account_saves += 1;
        Ok(())
    }

    fn load_accounts(&self) -> Result<Vec<AccountSnapshot>, StorageError> {
        Ok(self.accounts.clone())
    }

    fn save_transactions(&mut self, records: &[TransactionRecord]) -> Result<(), StorageError> {
        self.transactions = records.to_vec();
        self.transaction_saves += 1;
        Ok(())
    }

    fn load_transactions(&self) -> Result<Vec<TransactionRecord>, StorageError> {
        Ok(self.transactions.clone())
    }
}
