use rust_decimal::{Decimal, prelude::Zero};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, PartialEq, Eq)]
pub enum AccountEventKind {
    Deposited,
    Withdrawn,
}

/// Validated balance change, produced by `handle_*` and applied afterwards.
#[derive(Debug)]
pub struct AccountEvent {
    amount: Decimal,
    kind: AccountEventKind,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccountError {
    #[error("Account `{id}` not found")]
    NotFound { id: String },
    #[error("Account `{id}` already exists")]
    DuplicateAccount { id: String },
    #[error("Amount must be greater than zero, got {amount}")]
    NonPositiveAmount { amount: Decimal },
    #[error("Balance of `{id}` must not be negative, got {balance}")]
    NegativeBalance { id: String, balance: Decimal },
    #[error("Insufficient funds on `{id}`: balance is {balance}, requested {requested}")]
    InsufficientFunds {
        id: String,
        balance: Decimal,
        requested: Decimal,
    },
    #[error("Balance of `{id}` cannot hold {balance} + {amount}")]
    BalanceOverflow {
        id: String,
        balance: Decimal,
        amount: Decimal,
    },
}

/// Independent copy of an account's state. Changing it has no effect on the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub id: String,
    pub owner: String,
    pub category: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub balance: Decimal,
}

#[derive(Debug)]
struct Account {
    id: String,
    owner: String,
    category: String,
    balance: Decimal,
}

impl Account {
    fn apply(&mut self, event: &AccountEvent) {
        match event.kind {
            AccountEventKind::Deposited => {
                self.balance += event.amount;
            }
            AccountEventKind::Withdrawn => {
                self.balance -= event.amount;
            }
        }
    }

    fn handle_deposit(&self, amount: Decimal) -> Result<AccountEvent, AccountError> {
        if amount <= Decimal::zero() {
            return Err(AccountError::NonPositiveAmount { amount });
        }
        if self.balance.checked_add(amount).is_none() {
            return Err(AccountError::BalanceOverflow {
                id: self.id.clone(),
                balance: self.balance,
                amount,
            });
        }
        Ok(AccountEvent {
            amount,
            kind: AccountEventKind::Deposited,
        })
    }

    fn handle_withdraw(&self, amount: Decimal) -> Result<AccountEvent, AccountError> {
        if amount <= Decimal::zero() {
            return Err(AccountError::NonPositiveAmount { amount });
        }
        if amount > self.balance {
            return Err(AccountError::InsufficientFunds {
                id: self.id.clone(),
                balance: self.balance,
                requested: amount,
            });
        }
        Ok(AccountEvent {
            amount,
            kind: AccountEventKind::Withdrawn,
        })
    }

    fn snapshot(&self) -> AccountSnapshot {
        AccountSnapshot {
            id: self.id.clone(),
            owner: self.owner.clone(),
            category: self.category.clone(),
            balance: self.balance,
        }
    }
}

/// Owns every account. Balances only change through `deposit`, `withdraw`
/// and `transfer`, which never leave a balance below zero.
#[derive(Debug, Default)]
pub struct AccountStore {
    accounts: Vec<Account>,
}

impl AccountStore {
    /// Rebuilds a store from persisted snapshots, checking the same rules as `create`.
    pub fn restore(
        snapshots: impl IntoIterator<Item = AccountSnapshot>,
    ) -> Result<Self, AccountError> {
        let mut store = Self::default();
        for snapshot in snapshots {
            store.create(
                snapshot.id,
                snapshot.owner,
                snapshot.category,
                snapshot.balance,
            )?;
        }
        Ok(store)
    }

    pub fn create(
        &mut self,
        id: impl Into<String>,
        owner: impl Into<String>,
        category: impl Into<String>,
        initial_balance: Decimal,
    ) -> Result<AccountSnapshot, AccountError> {
        let id = id.into();
        if self.find_by_id(&id).is_some() {
            return Err(AccountError::DuplicateAccount { id });
        }
        if initial_balance < Decimal::zero() {
            return Err(AccountError::NegativeBalance {
                id,
                balance: initial_balance,
            });
        }
        let account = Account {
            id,
            owner: owner.into(),
            category: category.into(),
            balance: initial_balance,
        };
        let snapshot = account.snapshot();
        self.accounts.push(account);
        Ok(snapshot)
    }

    fn find_by_id(&self, id: &str) -> Option<usize> {
        self.accounts.iter().position(|acc| acc.id == id)
    }

    fn require(&self, id: &str) -> Result<usize, AccountError> {
        self.find_by_id(id).ok_or_else(|| AccountError::NotFound { id: id.to_string() })
    }

    pub fn deposit(&mut self, id: &str, amount: Decimal) -> Result<(), AccountError> {
        let idx = self.require(id)?;
        let evt = self.accounts[idx].handle_deposit(amount)?;
        self.accounts[idx].apply(&evt);
        Ok(())
    }

    pub fn withdraw(&mut self, id: &str, amount: Decimal) -> Result<(), AccountError> {
        let idx = self.require(id)?;
        let evt = self.accounts[idx].handle_withdraw(amount)?;
        self.accounts[idx].apply(&evt);
        Ok(())
    }

    /// Both legs are validated before either is applied.
    pub fn transfer(
        &mut self,
        from_id: &str,
        to_id: &str,
        amount: Decimal,
    ) -> Result<(), AccountError> {
        let from = self.require(from_id)?;
        let to = self.require(to_id)?;
        let withdrawn = self.accounts[from].handle_withdraw(amount)?;
        let deposited = self.accounts[to].handle_deposit(amount)?;
        self.accounts[from].apply(&withdrawn);
        self.accounts[to].apply(&deposited);
        Ok(())
    }

    pub fn snapshot(&self, id: &str) -> Option<AccountSnapshot> {
        self.find_by_id(id).map(|idx| self.accounts[idx].snapshot())
    }

    /// All accounts in creation order.
    pub fn snapshots(&self) -> Vec<AccountSnapshot> {
        self.accounts.iter().map(Account::snapshot).collect()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::prelude::FromPrimitive;

    use super::*;

    fn store_with(accounts: &[(&str, u32)]) -> AccountStore {
        let mut store = AccountStore::default();
        for (id, balance) in accounts {
            store
                .create(*id, "Ada", "Savings", Decimal::from_u32(*balance).unwrap())
                .unwrap();
        }
        store
    }

    fn balance(store: &AccountStore, id: &str) -> Decimal {
        store.snapshot(id).unwrap().balance
    }

    #[test]
    fn apply_events() {
        let mut acc = Account {
            id: "1000001".to_string(),
            owner: "Ada".to_string(),
            category: "Savings".to_string(),
            balance: Decimal::zero(),
        };
        acc.apply(&AccountEvent {
            amount: Decimal::from_u32(10).unwrap(),
            kind: AccountEventKind::Deposited,
        });
        assert_eq!(acc.balance, Decimal::from_u32(10).unwrap());
        acc.apply(&AccountEvent {
            amount: Decimal::from_u32(3).unwrap(),
            kind: AccountEventKind::Withdrawn,
        });
        assert_eq!(acc.balance, Decimal::from_u32(7).unwrap());
    }

    #[test]
    fn create_and_snapshot() {
        let mut store = AccountStore::default();
        let created = store
            .create("1000001", "Ada", "Savings", Decimal::new(1050, 1))
            .unwrap();
        assert_eq!(
            created,
            AccountSnapshot {
                id: "1000001".to_string(),
                owner: "Ada".to_string(),
                category: "Savings".to_string(),
                balance: Decimal::new(1050, 1),
            }
        );
        assert_eq!(store.snapshot("1000001"), Some(created));
        assert_eq!(store.snapshot("1000002"), None);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn snapshot_is_detached() {
        let mut store = store_with(&[("1000001", 100)]);
        let mut snapshot = store.snapshot("1000001").unwrap();
        snapshot.balance = Decimal::from_u32(1_000_000).unwrap();
        assert_eq!(balance(&store, "1000001"), Decimal::from_u32(100).unwrap());

        store.deposit("1000001", Decimal::from_u32(1).unwrap()).unwrap();
        assert_eq!(snapshot.balance, Decimal::from_u32(1_000_000).unwrap());
    }

    #[test]
    fn reject_duplicate_and_negative_accounts() {
        let mut store = store_with(&[("1000001", 100)]);
        let err = store
            .create("1000001", "Bob", "Checking", Decimal::zero())
            .unwrap_err();
        assert_eq!(
            err,
            AccountError::DuplicateAccount {
                id: "1000001".to_string()
            }
        );

        let err = store
            .create("1000002", "Bob", "Checking", Decimal::from_i32(-1).unwrap())
            .unwrap_err();
        assert!(matches!(err, AccountError::NegativeBalance { .. }));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn deposit_rules() {
        let mut store = store_with(&[("1000001", 100)]);

        let err = store
            .deposit("1000001", Decimal::from_i32(-5).unwrap())
            .unwrap_err();
        assert!(matches!(err, AccountError::NonPositiveAmount { .. }));
        let err = store.deposit("1000001", Decimal::zero()).unwrap_err();
        assert!(matches!(err, AccountError::NonPositiveAmount { .. }));
        assert_eq!(balance(&store, "1000001"), Decimal::from_u32(100).unwrap());

        let err = store
            .deposit("9999999", Decimal::from_u32(5).unwrap())
            .unwrap_err();
        assert_eq!(
            err,
            AccountError::NotFound {
                id: "9999999".to_string()
            }
        );

        store.deposit("1000001", Decimal::new(25, 1)).unwrap();
        assert_eq!(balance(&store, "1000001"), Decimal::new(1025, 1));
    }

    #[test]
    fn withdraw_rules() {
        let mut store = store_with(&[("1000001", 50)]);

        let err = store
            .withdraw("1000001", Decimal::from_u32(80).unwrap())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Insufficient funds on `1000001`: balance is 50, requested 80"
        );
        assert_eq!(balance(&store, "1000001"), Decimal::from_u32(50).unwrap());

        let err = store.withdraw("1000001", Decimal::zero()).unwrap_err();
        assert!(matches!(err, AccountError::NonPositiveAmount { .. }));

        // withdrawing the whole balance is allowed
        store
            .withdraw("1000001", Decimal::from_u32(50).unwrap())
            .unwrap();
        assert_eq!(balance(&store, "1000001"), Decimal::zero());
    }

    #[test]
    fn transfer_moves_funds() {
        let mut store = store_with(&[("1000001", 100), ("1000002", 20)]);
        store
            .transfer("1000001", "1000002", Decimal::from_u32(30).unwrap())
            .unwrap();
        assert_eq!(balance(&store, "1000001"), Decimal::from_u32(70).unwrap());
        assert_eq!(balance(&store, "1000002"), Decimal::from_u32(50).unwrap());
    }

    #[test]
    fn transfer_is_all_or_nothing() {
        let mut store = store_with(&[("1000001", 100), ("1000002", 20)]);

        // missing receiver must not debit the sender
        let err = store
            .transfer("1000001", "9999999", Decimal::from_u32(30).unwrap())
            .unwrap_err();
        assert!(matches!(err, AccountError::NotFound { .. }));
        assert_eq!(balance(&store, "1000001"), Decimal::from_u32(100).unwrap());

        let err = store
            .transfer("1000002", "1000001", Decimal::from_u32(21).unwrap())
            .unwrap_err();
        assert!(matches!(err, AccountError::InsufficientFunds { .. }));
        assert_eq!(balance(&store, "1000001"), Decimal::from_u32(100).unwrap());
        assert_eq!(balance(&store, "1000002"), Decimal::from_u32(20).unwrap());
    }

    #[test]
    fn deposit_overflow_is_rejected() {
        let mut store = AccountStore::default();
        store
            .create("1000001", "Ada", "Savings", Decimal::MAX)
            .unwrap();

        let err = store
            .deposit("1000001", Decimal::from_u32(1).unwrap())
            .unwrap_err();
        assert_eq!(
            err,
            AccountError::BalanceOverflow {
                id: "1000001".to_string(),
                balance: Decimal::MAX,
                amount: Decimal::from_u32(1).unwrap(),
            }
        );
        assert_eq!(balance(&store, "1000001"), Decimal::MAX);
    }

    #[test]
    fn transfer_overflow_leaves_both_balances() {
        let mut store = store_with(&[("1000001", 10)]);
        store
            .create("1000002", "Bob", "Checking", Decimal::MAX)
            .unwrap();

        let err = store
            .transfer("1000001", "1000002", Decimal::from_u32(5).unwrap())
            .unwrap_err();
        assert!(matches!(err, AccountError::BalanceOverflow { .. }));
        assert_eq!(balance(&store, "1000001"), Decimal::from_u32(10).unwrap());
        assert_eq!(balance(&store, "1000002"), Decimal::MAX);

        // the largest balance can still be moved out
        store
            .transfer("1000002", "1000001", Decimal::MAX - Decimal::from_u32(10).unwrap())
            .unwrap();
        assert_eq!(balance(&store, "1000001"), Decimal::MAX);
        assert_eq!(balance(&store, "1000002"), Decimal::from_u32(10).unwrap());
    }

    #[test]
    fn transfer_to_self_keeps_balance() {
        let mut store = store_with(&[("1000001", 100)]);
        store
            .transfer("1000001", "1000001", Decimal::from_u32(100).unwrap())
            .unwrap();
        assert_eq!(balance(&store, "1000001"), Decimal::from_u32(100).unwrap());
    }

    #[test]
    fn restore_checks_invariants() {
        let store = store_with(&[("1000001", 100), ("1000002", 20)]);
        let restored = AccountStore::restore(store.snapshots()).unwrap();
        assert_eq!(restored.snapshots(), store.snapshots());

        let mut snapshots = store.snapshots();
        snapshots.push(snapshots[0].clone());
        assert!(matches!(
            AccountStore::restore(snapshots),
            Err(AccountError::DuplicateAccount { .. })
        ));
    }
}
