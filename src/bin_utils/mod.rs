//! Thin front-end used by the binary: it turns one parsed [`Command`] into a
//! call on [`LedgerService`] and prints the outcome as CSV.

use std::io::Write;

use crate::{
    account::AccountError,
    ledger::LedgerService,
    storage::LedgerStorage,
};
use anyhow::Result;
use args::Command;
use csv_printer::{print_accounts, print_transactions};
pub mod args;
pub mod csv_printer;

pub struct Service<'w, S, W: 'w> {
    pub ledger: LedgerService<S>,
    pub output: &'w mut W,
    pub error_printer: Box<dyn FnMut(AccountError) + 'w>,
}

impl<'w, S, W> Service<'w, S, W>
where
    S: LedgerStorage,
    W: Write + 'w,
{
    /// Business failures go to `error_printer`; only output failures are returned.
    pub fn run(mut self, command: Command) -> Result<()> {
        let outcome = match command {
            Command::Create(args) => self
                .ledger
                .create_account(args.id, args.owner, args.category, args.balance)
                .map(|account| print_accounts(self.output, [&account])),
            Command::Deposit(args) => self
                .ledger
                .deposit(args.id, args.amount)
                .map(|record| print_transactions(self.output, [&record])),
            Command::Withdraw(args) => self
                .ledger
                .withdraw(args.id, args.amount)
                .map(|record| print_transactions(self.output, [&record])),
            Command::Transfer(args) => self
                .ledger
                .transfer(args.from, args.to, args.amount)
                .map(|record| print_transactions(self.output, [&record])),
            Command::Show { id } => match self.ledger.account_details(&id) {
                Some(account) => Ok(print_accounts(self.output, [&account])),
                None => Err(AccountError::NotFound { id }),
            },
            Command::Accounts => Ok(print_accounts(self.output, &self.ledger.accounts())),
            Command::History => Ok(print_transactions(
                self.output,
                self.ledger.transaction_history(),
            )),
        };
        match outcome {
            Ok(printed) => printed,
            Err(err) => {
                (self.error_printer)(err);
                Ok(())
            }
        }
    }
}
