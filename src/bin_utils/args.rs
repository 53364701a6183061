use std::{path::PathBuf, str::FromStr};

use clap::{Args, Parser, Subcommand};
use rust_decimal::{Decimal, prelude::Zero};

#[derive(Parser, Debug)]
#[command(name = "bank-ledger")]
#[command(about = "Keeps accounts and their transaction history on disk")]
pub struct Cli {
    /// Directory holding `accounts.csv` and `transactions.csv` (also read from `BANK_LEDGER_DATA_DIR`).
    #[arg(long, env = "BANK_LEDGER_DATA_DIR", default_value = ".")]
    pub data_dir: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Open a new account.
    Create(CreateArgs),
    /// Add money to an account.
    Deposit(AmountArgs),
    /// Take money out of an account.
    Withdraw(AmountArgs),
    /// Move money between two accounts.
    Transfer(TransferArgs),
    /// Print one account.
    Show {
        #[arg(long, value_parser = parse_account_id)]
        id: String,
    },
    /// Print every account.
    Accounts,
    /// Print the whole transaction history, oldest first.
    History,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct CreateArgs {
    #[arg(long, value_parser = parse_account_id)]
    pub id: String,
    #[arg(long, value_parser = parse_text)]
    pub owner: String,
    /// Free-form account type, e.g. Savings or Checking.
    #[arg(long, value_parser = parse_text)]
    pub category: String,
    #[arg(long, value_parser = parse_decimal, default_value = "0")]
    pub balance: Decimal,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct AmountArgs {
    #[arg(long, value_parser = parse_account_id)]
    pub id: String,
    #[arg(long, value_parser = parse_amount)]
    pub amount: Decimal,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct TransferArgs {
    #[arg(long, value_parser = parse_account_id)]
    pub from: String,
    #[arg(long, value_parser = parse_account_id)]
    pub to: String,
    #[arg(long, value_parser = parse_amount)]
    pub amount: Decimal,
}

/// Account numbers are 6 to 10 digits.
pub fn parse_account_id(raw: &str) -> Result<String, String> {
    let id = raw.trim();
    if (6..=10).contains(&id.len()) && id.bytes().all(|b| b.is_ascii_digit()) {
        Ok(id.to_string())
    } else {
        Err(format!(
            "invalid account number `{raw}`, expected 6 to 10 digits"
        ))
    }
}

pub fn parse_text(raw: &str) -> Result<String, String> {
    let text = raw.trim();
    if text.is_empty() {
        Err("value cannot be empty".to_string())
    } else {
        Ok(text.to_string())
    }
}

pub fn parse_decimal(raw: &str) -> Result<Decimal, String> {
    Decimal::from_str(raw.trim()).map_err(|err| format!("invalid amount `{raw}`: {err}"))
}

pub fn parse_amount(raw: &str) -> Result<Decimal, String> {
    let amount = parse_decimal(raw)?;
    if amount > Decimal::zero() {
        Ok(amount)
    } else {
        Err(format!("amount must be greater than zero, got {amount}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_numbers() {
        assert_eq!(parse_account_id("123456").unwrap(), "123456");
        assert_eq!(parse_account_id(" 1234567890 ").unwrap(), "1234567890");
        for bad in ["12345", "12345678901", "12345a", "", "-123456"] {
            assert!(parse_account_id(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn amounts() {
        assert_eq!(parse_amount("12.50").unwrap(), Decimal::new(1250, 2));
        assert!(parse_amount("0").is_err());
        assert!(parse_amount("-3").is_err());
        assert!(parse_amount("ten").is_err());
        assert_eq!(parse_decimal("0").unwrap(), Decimal::zero());
    }

    #[test]
    fn parse_cli() {
        let cli = Cli::try_parse_from([
            "bank-ledger",
            "--data-dir",
            "/tmp/ledger",
            "transfer",
            "--from",
            "100001",
            "--to",
            "100002",
            "--amount",
            "30",
        ])
        .unwrap();
        assert_eq!(cli.data_dir, PathBuf::from("/tmp/ledger"));
        assert_eq!(
            cli.command,
            Command::Transfer(TransferArgs {
                from: "100001".to_string(),
                to: "100002".to_string(),
                amount: Decimal::new(30, 0),
            })
        );

        let err = Cli::try_parse_from(["bank-ledger", "deposit", "--id", "1", "--amount", "5"]);
        assert!(err.is_err());
        let err = Cli::try_parse_from([
            "bank-ledger",
            "create",
            "--id",
            "100001",
            "--owner",
            "  ",
            "--category",
            "Savings",
        ]);
        assert!(err.is_err());
    }
}
