use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
    Transfer,
}

/// A balance-mutating request, as received from the front-end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerCommand {
    Deposit {
        account_id: String,
        amount: Decimal,
    },
    Withdraw {
        account_id: String,
        amount: Decimal,
    },
    Transfer {
        from_id: String,
        to_id: String,
        amount: Decimal,
    },
}

impl LedgerCommand {
    pub fn kind(&self) -> TransactionKind {
        match self {
            Self::Deposit { .. } => TransactionKind::Deposit,
            Self::Withdraw { .. } => TransactionKind::Withdrawal,
            Self::Transfer { .. } => TransactionKind::Transfer,
        }
    }

    pub fn amount(&self) -> Decimal {
        match self {
            Self::Deposit { amount, .. }
            | Self::Withdraw { amount, .. }
            | Self::Transfer { amount, .. } => *amount,
        }
    }

    /// Account the resulting transaction record is keyed to.
    /// For transfers this is the sender only.
    pub fn subject(&self) -> &str {
        match self {
            Self::Deposit { account_id, .. } | Self::Withdraw { account_id, .. } => account_id,
            Self::Transfer { from_id, .. } => from_id,
        }
    }
}
