use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::command::TransactionKind;

const ID_PREFIX: &str = "TXN";

#[derive(Debug, Error, PartialEq, Eq)]
#[error("`{0}` is not a valid transaction id, expected TXN<n> with n >= 1")]
pub struct ParseTransactionIdError(String);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HistoryError {
    #[error("Transaction {id} does not follow {previous}, ids must strictly increase")]
    OutOfOrder {
        previous: TransactionId,
        id: TransactionId,
    },
    #[error("Transaction {0} leaves no room for further ids")]
    SequenceExhausted(TransactionId),
}

/// Sequential transaction identifier, rendered as `TXN<n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TransactionId(u64);

impl TransactionId {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{ID_PREFIX}{}", self.0)
    }
}

impl FromStr for TransactionId {
    type Err = ParseTransactionIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseTransactionIdError(s.to_string());
        let digits = s.strip_prefix(ID_PREFIX).ok_or_else(invalid)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        match digits.parse::<u64>() {
            Ok(n) if n > 0 => Ok(Self(n)),
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for TransactionId {
    type Error = ParseTransactionIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TransactionId> for String {
    fn from(value: TransactionId) -> Self {
        value.to_string()
    }
}

/// Immutable entry describing one completed mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    id: TransactionId,
    account: String,
    #[serde(with = "rust_decimal::serde::str")]
    amount: Decimal,
    kind: TransactionKind,
    timestamp: DateTime<Utc>,
}

impl TransactionRecord {
    pub fn id(&self) -> TransactionId {
        self.id
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Append-only history. Owns identifier generation.
#[derive(Debug)]
pub struct TransactionLog {
    records: Vec<TransactionRecord>,
    next_sequence: u64,
}

impl Default for TransactionLog {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            next_sequence: 1,
        }
    }
}

impl TransactionLog {
    /// Numbering resumes after the last restored record, so ids stay unique across restarts.
    /// Ids must strictly increase, which also makes the last one at least `records.len()`.
    pub fn restore(records: Vec<TransactionRecord>) -> Result<Self, HistoryError> {
        let mut last: Option<TransactionId> = None;
        for record in &records {
            if let Some(previous) = last {
                if record.id <= previous {
                    return Err(HistoryError::OutOfOrder {
                        previous,
                        id: record.id,
                    });
                }
            }
            last = Some(record.id);
        }
        let next_sequence = match last {
            None => 1,
            // `append` has to be able to step past the next id as well
            Some(id) => id
                .sequence()
                .checked_add(1)
                .filter(|next| *next < u64::MAX)
                .ok_or(HistoryError::SequenceExhausted(id))?,
        };
        Ok(Self {
            records,
            next_sequence,
        })
    }

    pub fn append(
        &mut self,
        account: impl Into<String>,
        amount: Decimal,
        kind: TransactionKind,
    ) -> &TransactionRecord {
        let id = TransactionId(self.next_sequence);
        self.next_sequence += 1;
        self.records.push(TransactionRecord {
            id,
            account: account.into(),
            amount,
            kind,
            timestamp: Utc::now(),
        });
        &self.records[self.records.len() - 1]
    }

    /// Oldest first.
    pub fn all(&self) -> &[TransactionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
