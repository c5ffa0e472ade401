//! CSV readers for the replay frontend
//!
//! Reads transaction request files and account seed files. Malformed rows
//! in a request file are recoverable: they are logged and skipped, and
//! replay continues with the next row. A malformed account seed row is
//! fatal, since replaying against a partially seeded store would produce
//! misleading balances.

use crate::io::csv_format::{convert_account_row, convert_request_row, AccountRow, RequestRow};
use crate::types::{Account, LedgerError, TransactionRequest};
use std::path::Path;
use tracing::warn;

/// Read transaction requests from a CSV file
///
/// Rows that fail to deserialize or convert are skipped with a warning.
///
/// # Errors
///
/// * `LedgerError::Io` - The file cannot be opened or read
pub fn read_requests(path: &Path) -> Result<Vec<TransactionRequest>, LedgerError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)
        .map_err(|e| LedgerError::Io {
            message: format!("Failed to open {}: {}", path.display(), e),
        })?;

    let mut requests = Vec::new();
    for (index, row) in reader.deserialize::<RequestRow>().enumerate() {
        let line = index as u64 + 2; // header is line 1
        match row {
            Ok(row) => match convert_request_row(row) {
                Ok(request) => requests.push(request),
                Err(err) => warn!(line, %err, "skipping malformed request row"),
            },
            Err(err) => warn!(line, %err, "skipping unreadable request row"),
        }
    }
    Ok(requests)
}

/// Read account seed records from a CSV file
///
/// # Errors
///
/// * `LedgerError::Io` - The file cannot be opened or read
/// * `LedgerError::Parse` - A row cannot be deserialized or converted
pub fn read_accounts(path: &Path) -> Result<Vec<Account>, LedgerError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| LedgerError::Io {
            message: format!("Failed to open {}: {}", path.display(), e),
        })?;

    let mut accounts = Vec::new();
    for row in reader.deserialize::<AccountRow>() {
        accounts.push(convert_account_row(row?)?);
    }
    Ok(accounts)
}
