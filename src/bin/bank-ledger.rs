use std::process::ExitCode;

use anyhow::{Context, Result};
use bank_ledger::{
    account::AccountError,
    bin_utils::{Service, args::Cli},
    ledger::LedgerService,
    storage::csv_storage::CsvStorage,
};
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bank_ledger=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let ledger = LedgerService::open(CsvStorage::new(&cli.data_dir));

    let mut failed = false;
    let service = Service {
        ledger,
        output: &mut std::io::stdout(),
        error_printer: Box::new(|err: AccountError| {
            eprintln!("Operation failed: {err}");
            failed = true;
        }),
    };
    service
        .run(cli.command)
        .context("Failed to write command output")?;

    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
