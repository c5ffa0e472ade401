//! Transaction-related types for the Bank Ledger Engine
//!
//! This module defines the transaction kinds, caller-facing request type,
//! and the ledger record type used throughout the system.

use super::account::AccountId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Transaction identifier
///
/// Assigned by the ledger at insertion time. Identifiers are unique and
/// strictly increasing; they are never reused, though gaps may appear
/// because corrections insert new records rather than renumbering.
pub type TransactionId = u64;

/// Transaction types supported by the ledger engine
///
/// Deposits and withdrawals touch a single account; transfers move funds
/// between two distinct accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    /// Credit funds to a destination account
    ///
    /// Requires a destination account; has no source account.
    Deposit,

    /// Debit funds from a source account
    ///
    /// Requires a source account with sufficient balance; has no
    /// destination account.
    Withdrawal,

    /// Move funds from a source account to a distinct destination account
    ///
    /// Requires both accounts. Both account locks are held for the whole
    /// debit-then-credit sequence.
    Transfer,
}

/// A caller-submitted transaction request
///
/// Carries no identifier and no timestamp: the ledger assigns the id and
/// the engine stamps the processing time. Any timestamp supplied by an
/// outer layer is ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRequest {
    /// The kind of transaction requested
    pub tx_type: TransactionType,

    /// Transaction amount
    ///
    /// Must be strictly positive for a new transaction. Compensating
    /// entries generated by corrections are exempt and may carry a zero or
    /// negative amount.
    pub amount: Decimal,

    /// Human-readable description (non-empty, at most 255 characters)
    pub description: String,

    /// Source account (required for withdrawal and transfer)
    pub from_account: Option<AccountId>,

    /// Destination account (required for deposit and transfer)
    pub to_account: Option<AccountId>,
}

/// A recorded ledger entry
///
/// The ledger is append-only with respect to financial effect: a recorded
/// transaction's amount is never changed in place. Corrections mark the
/// record as modified (terminal) and insert a new compensating entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Ledger-assigned identifier (0 until the record is appended)
    pub id: TransactionId,

    /// The kind of transaction
    #[serde(rename = "type")]
    pub tx_type: TransactionType,

    /// Signed amount
    ///
    /// Positive for ordinary transactions; compensating entries may be
    /// zero or negative.
    pub amount: Decimal,

    /// Human-readable description
    pub description: String,

    /// Processing time, stamped by the engine
    #[serde(rename = "date")]
    pub timestamp: DateTime<Utc>,

    /// Source account, when the type has one
    pub from_account: Option<AccountId>,

    /// Destination account, when the type has one
    pub to_account: Option<AccountId>,

    /// Terminal flag
    ///
    /// Set once when the record is corrected or reversed; a marked record
    /// may never be corrected again.
    pub modified: bool,
}

impl Transaction {
    /// Build an unrecorded transaction
    ///
    /// The id is left at 0 and assigned by [`crate::core::LedgerStore::append`];
    /// the modified flag starts unset.
    pub fn new(
        tx_type: TransactionType,
        amount: Decimal,
        description: String,
        timestamp: DateTime<Utc>,
        from_account: Option<AccountId>,
        to_account: Option<AccountId>,
    ) -> Self {
        Transaction {
            id: 0,
            tx_type,
            amount,
            description,
            timestamp,
            from_account,
            to_account,
            modified: false,
        }
    }

    /// Whether this transaction touches the given account as source or destination
    pub fn involves(&self, account: &str) -> bool {
        self.from_account.as_deref() == Some(account)
            || self.to_account.as_deref() == Some(account)
    }
}
