use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::{
    account::{AccountError, AccountSnapshot, AccountStore},
    command::LedgerCommand,
    storage::LedgerStorage,
    transaction::{TransactionLog, TransactionRecord},
};

/// Composes the account store, the transaction log and the storage.
///
/// Every successful mutation appends exactly one record and flushes both
/// collections before returning. A rejected mutation changes nothing and
/// touches neither the log nor the storage. Storage failures are logged and
/// never fail the operation: memory stays the source of truth.
#[derive(Debug)]
pub struct LedgerService<S> {
    accounts: AccountStore,
    transactions: TransactionLog,
    storage: S,
}

impl<S> LedgerService<S>
where
    S: LedgerStorage,
{
    /// Loads both collections. Anything unreadable is replaced by an empty collection.
    pub fn open(storage: S) -> Self {
        let accounts = match storage.load_accounts() {
            Ok(snapshots) => AccountStore::restore(snapshots).unwrap_or_else(|err| {
                warn!(%err, "stored accounts are inconsistent, starting with no accounts");
                AccountStore::default()
            }),
            Err(err) => {
                warn!(%err, "failed to load accounts, starting with no accounts");
                AccountStore::default()
            }
        };
        let transactions = match storage.load_transactions() {
            Ok(records) => TransactionLog::restore(records).unwrap_or_else(|err| {
                warn!(%err, "stored transactions are inconsistent, starting with empty history");
                TransactionLog::default()
            }),
            Err(err) => {
                warn!(%err, "failed to load transactions, starting with empty history");
                TransactionLog::default()
            }
        };
        info!(
            accounts = accounts.len(),
            transactions = transactions.len(),
            "ledger opened"
        );
        Self {
            accounts,
            transactions,
            storage,
        }
    }

    pub fn create_account(
        &mut self,
        id: impl Into<String>,
        owner: impl Into<String>,
        category: impl Into<String>,
        initial_balance: Decimal,
    ) -> Result<AccountSnapshot, AccountError> {
        let created = self
            .accounts
            .create(id, owner, category, initial_balance)
            .inspect_err(|err| warn!(%err, "account creation rejected"))?;
        info!(id = %created.id, balance = %created.balance, "account created");
        self.flush_accounts();
        Ok(created)
    }

    pub fn deposit(
        &mut self,
        account_id: impl Into<String>,
        amount: Decimal,
    ) -> Result<TransactionRecord, AccountError> {
        self.execute(LedgerCommand::Deposit {
            account_id: account_id.into(),
            amount,
        })
    }

    pub fn withdraw(
        &mut self,
        account_id: impl Into<String>,
        amount: Decimal,
    ) -> Result<TransactionRecord, AccountError> {
        self.execute(LedgerCommand::Withdraw {
            account_id: account_id.into(),
            amount,
        })
    }

    /// Records a single TRANSFER entry keyed to the sender.
    pub fn transfer(
        &mut self,
        from_id: impl Into<String>,
        to_id: impl Into<String>,
        amount: Decimal,
    ) -> Result<TransactionRecord, AccountError> {
        self.execute(LedgerCommand::Transfer {
            from_id: from_id.into(),
            to_id: to_id.into(),
            amount,
        })
    }

    pub fn execute(&mut self, command: LedgerCommand) -> Result<TransactionRecord, AccountError> {
        let applied = match &command {
            LedgerCommand::Deposit { account_id, amount } => {
                self.accounts.deposit(account_id, *amount)
            }
            LedgerCommand::Withdraw { account_id, amount } => {
                self.accounts.withdraw(account_id, *amount)
            }
            LedgerCommand::Transfer {
                from_id,
                to_id,
                amount,
            } => self.accounts.transfer(from_id, to_id, *amount),
        };
        applied.inspect_err(|err| warn!(kind = ?command.kind(), %err, "operation rejected"))?;

        // record only once the balances changed
        let record = self
            .transactions
            .append(command.subject(), command.amount(), command.kind())
            .clone();
        info!(
            id = %record.id(),
            account = record.account(),
            amount = %record.amount(),
            kind = ?record.kind(),
            "transaction recorded"
        );
        self.flush_transactions();
        self.flush_accounts();
        Ok(record)
    }

    pub fn account_details(&self, id: &str) -> Option<AccountSnapshot> {
        self.accounts.snapshot(id)
    }

    pub fn accounts(&self) -> Vec<AccountSnapshot> {
        self.accounts.snapshots()
    }

    /// Oldest first.
    pub fn transaction_history(&self) -> &[TransactionRecord] {
        self.transactions.all()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    fn flush_accounts(&mut self) {
        if let Err(err) = self.storage.save_accounts(&self.accounts.snapshots()) {
            warn!(%err, "failed to save accounts, stored copy is stale");
        }
    }

    fn flush_transactions(&mut self) {
        if let Err(err) = self.storage.save_transactions(self.transactions.all()) {
            warn!(%err, "failed to save transactions, stored copy is stale");
        }
    }
}
