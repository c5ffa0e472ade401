//! CSV format handling for transaction requests and account seeding/output
//!
//! This module centralizes all CSV format concerns for the replay frontend:
//! - Row structures for deserialization
//! - Conversion from rows to domain types
//! - Account output serialization
//!
//! All functions are pure (no I/O) for easy testing.

use crate::types::{Account, LedgerError, TransactionRequest, TransactionType};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

/// Transaction request row
///
/// Matches the replay CSV format with columns:
/// `type,amount,description,from,to`. The account columns are optional
/// since deposits have no source and withdrawals no destination.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct RequestRow {
    #[serde(rename = "type")]
    pub tx_type: String,
    pub amount: String,
    pub description: String,
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Account seed row
///
/// Matches the account seed CSV format with columns:
/// `account,holder,balance`.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AccountRow {
    pub account: String,
    pub holder: String,
    pub balance: String,
}

/// Convert a RequestRow into a TransactionRequest
///
/// Parses the type and amount fields; empty account columns become `None`.
/// Full semantic validation (amount sign, description bounds, account
/// presence per type) is the engine's job; this only rejects rows that
/// cannot be represented at all.
///
/// # Errors
///
/// * `LedgerError::Parse` - Unknown transaction type or unparseable amount
pub fn convert_request_row(row: RequestRow) -> Result<TransactionRequest, LedgerError> {
    let tx_type = match row.tx_type.trim().to_uppercase().as_str() {
        "DEPOSIT" => TransactionType::Deposit,
        "WITHDRAWAL" => TransactionType::Withdrawal,
        "TRANSFER" => TransactionType::Transfer,
        other => {
            return Err(LedgerError::Parse {
                line: None,
                message: format!("Invalid transaction type: '{}'", other),
            });
        }
    };

    let amount = Decimal::from_str(row.amount.trim()).map_err(|_| LedgerError::Parse {
        line: None,
        message: format!("Invalid amount: '{}'", row.amount),
    })?;

    let normalize = |field: Option<String>| field.filter(|value| !value.trim().is_empty());

    Ok(TransactionRequest {
        tx_type,
        amount,
        description: row.description,
        from_account: normalize(row.from),
        to_account: normalize(row.to),
    })
}

/// Convert an AccountRow into an Account
///
/// # Errors
///
/// * `LedgerError::Parse` - Unparseable or negative balance
pub fn convert_account_row(row: AccountRow) -> Result<Account, LedgerError> {
    let balance = Decimal::from_str(row.balance.trim()).map_err(|_| LedgerError::Parse {
        line: None,
        message: format!("Invalid balance: '{}'", row.balance),
    })?;
    if balance < Decimal::ZERO {
        return Err(LedgerError::Parse {
            line: None,
            message: format!("Negative seed balance for account {}", row.account),
        });
    }

    Ok(Account::new(row.account, row.holder, balance))
}

/// Write account states to CSV
///
/// Writes columns `account,holder,balance`, sorted by account id for
/// deterministic output.
pub fn write_accounts_csv(
    accounts: &[Account],
    output: &mut dyn Write,
) -> Result<(), LedgerError> {
    let mut writer = csv::Writer::from_writer(output);

    writer.write_record(["account", "holder", "balance"])?;

    let mut sorted_accounts = accounts.to_vec();
    sorted_accounts.sort_by(|a, b| a.id.cmp(&b.id));

    for account in sorted_accounts {
        writer.write_record(&[
            account.id,
            account.holder,
            format!("{:.2}", account.balance),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
