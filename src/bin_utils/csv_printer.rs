use std::io::Write;

use csv::WriterBuilder;
use serde::Serialize;

use crate::{account::AccountSnapshot, transaction::TransactionRecord};

const ACCOUNT_HEADER: [&str; 4] = ["id", "owner", "category", "balance"];
const TRANSACTION_HEADER: [&str; 5] = ["id", "account", "amount", "kind", "timestamp"];

pub fn print_accounts<'a, W>(
    output: &mut W,
    accounts: impl IntoIterator<Item = &'a AccountSnapshot>,
) -> anyhow::Result<()>
where
    W: Write,
{
    print_rows(output, &ACCOUNT_HEADER, accounts)
}

pub fn print_transactions<'a, W>(
    output: &mut W,
    records: impl IntoIterator<Item = &'a TransactionRecord>,
) -> anyhow::Result<()>
where
    W: Write,
{
    print_rows(output, &TRANSACTION_HEADER, records)
}

// Header is written explicitly so an empty table still has one.
fn print_rows<W, T>(
    output: &mut W,
    header: &[&str],
    rows: impl IntoIterator<Item = T>,
) -> anyhow::Result<()>
where
    W: Write,
    T: Serialize,
{
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(output);
    if let Err(err) = writer.write_record(header) {
        anyhow::bail!("Failed to write to CSV: {err}")
    }
    for row in rows {
        if let Err(err) = writer.serialize(row) {
            anyhow::bail!("Failed to write to CSV: {err}")
        }
    }
    // Ensure all data is flushed to the output
    if let Err(err) = writer.flush() {
        anyhow::bail!("Failed to flush CSV writer: {err}")
    }
    Ok(())
}
