//! Error types for the Bank Ledger Engine
//!
//! This module defines all error types that can occur during transaction
//! processing. The engine surfaces every failure as a distinct, typed
//! outcome; no failed mutation is silently swallowed.
//!
//! # Error Categories
//!
//! - **Validation errors**: malformed requests (bad amount, missing account
//!   identifiers, self-transfer, bad description)
//! - **Not-found errors**: unknown account or transaction identifiers
//! - **Insufficient funds**: a debit that would drive a balance negative,
//!   checked only under the account lock
//! - **Already modified**: a second correction attempt on a terminal record
//! - **Lock poisoning**: internal coordinator fault; fatal to the operation
//!   but not to the process
//! - **I/O and parse errors**: raised by the CSV replay frontend

use crate::types::{AccountId, TransactionId};
use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the ledger engine
///
/// Each variant carries enough context to diagnose the rejection without
/// consulting engine state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// Malformed transaction request
    ///
    /// Reported to the caller and never retried automatically.
    #[error("Validation error: {message}")]
    Validation {
        /// Description of the validation failure
        message: String,
    },

    /// Account identifier not found in the account store
    #[error("Account {account} not found")]
    AccountNotFound {
        /// The missing account identifier
        account: AccountId,
    },

    /// Transaction identifier not found in the ledger
    #[error("Transaction {id} not found")]
    TransactionNotFound {
        /// The missing transaction identifier
        id: TransactionId,
    },

    /// Debit exceeds the account balance
    ///
    /// Authoritative only when raised under the account lock.
    #[error("Insufficient funds for account {account}: balance {balance}, requested {requested}")]
    InsufficientFunds {
        /// Account identifier
        account: AccountId,
        /// Balance at the time of the check
        balance: Decimal,
        /// Amount the operation required
        requested: Decimal,
    },

    /// The transaction has already been corrected or reversed
    ///
    /// A record is terminal after its first correction.
    #[error("Transaction {id} has already been modified")]
    AlreadyModified {
        /// Transaction identifier
        id: TransactionId,
    },

    /// An account lock was poisoned by a panicking holder
    ///
    /// The coordinator releases any lock it already holds before this
    /// error propagates.
    #[error("Lock for account {account} is poisoned")]
    LockPoisoned {
        /// Account whose lock could not be acquired
        account: AccountId,
    },

    /// I/O error while reading or writing replay files
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
    },

    /// CSV parsing error in the replay frontend
    ///
    /// Recoverable: the malformed row is skipped and replay continues.
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    Parse {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },
}

impl From<std::io::Error> for LedgerError {
    fn from(error: std::io::Error) -> Self {
        LedgerError::Io {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for LedgerError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        LedgerError::Parse {
            line,
            message: error.to_string(),
        }
    }
}

// Helper constructors for common errors

impl LedgerError {
    /// Create a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        LedgerError::Validation {
            message: message.into(),
        }
    }

    /// Create an AccountNotFound error
    pub fn account_not_found(account: impl Into<AccountId>) -> Self {
        LedgerError::AccountNotFound {
            account: account.into(),
        }
    }

    /// Create a TransactionNotFound error
    pub fn transaction_not_found(id: TransactionId) -> Self {
        LedgerError::TransactionNotFound { id }
    }

    /// Create an InsufficientFunds error
    pub fn insufficient_funds(
        account: impl Into<AccountId>,
        balance: Decimal,
        requested: Decimal,
    ) -> Self {
        LedgerError::InsufficientFunds {
            account: account.into(),
            balance,
            requested,
        }
    }

    /// Create an AlreadyModified error
    pub fn already_modified(id: TransactionId) -> Self {
        LedgerError::AlreadyModified { id }
    }

    /// Create a LockPoisoned error
    pub fn lock_poisoned(account: impl Into<AccountId>) -> Self {
        LedgerError::LockPoisoned {
            account: account.into(),
        }
    }
}
