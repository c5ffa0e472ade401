//! Append-mostly transaction ledger
//!
//! This module provides the `LedgerStore`, the system of record for balance
//! changes. Records are appended with a unique, monotonically increasing
//! identifier and are never altered in financial effect afterwards: the only
//! permitted in-place change is the one-way terminal (`modified`) flag set
//! when a record is corrected or reversed.
//!
//! # Identifier assignment
//!
//! Identifiers come from an `AtomicU64`, so concurrent appends never receive
//! the same id. Ids are strictly increasing but not gap-free after failed
//! corrections, since corrections insert new records rather than reusing
//! identifiers.

use crate::types::{LedgerError, Transaction, TransactionId};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Append-mostly sequence of transaction records
///
/// Backed by a `DashMap` keyed by transaction id for concurrent point
/// lookups, plus an atomic id source for insertion.
#[derive(Debug, Default)]
pub struct LedgerStore {
    /// Map of transaction id to recorded transaction
    transactions: DashMap<TransactionId, Transaction>,

    /// Next identifier to assign (starts at 1)
    next_id: AtomicU64,
}

impl LedgerStore {
    /// Create a new empty ledger
    pub fn new() -> Self {
        Self {
            transactions: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Append a transaction, assigning its identifier
    ///
    /// The id on the input record is ignored; the ledger assigns the next
    /// identifier atomically with respect to other concurrent appends and
    /// returns the stored record.
    pub fn append(&self, mut transaction: Transaction) -> Transaction {
        transaction.id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let stored = transaction.clone();
        self.transactions.insert(transaction.id, transaction);
        stored
    }

    /// Look up a transaction by identifier
    pub fn find(&self, id: TransactionId) -> Option<Transaction> {
        self.transactions.get(&id).map(|entry| entry.value().clone())
    }

    /// Atomically mark a transaction as modified (terminal)
    ///
    /// The flag is one-way: the first caller wins and receives the record
    /// as it was before marking; every later attempt fails. The check and
    /// the set happen under the entry's lock, so two concurrent corrections
    /// of the same record cannot both succeed.
    ///
    /// # Returns
    ///
    /// * `Ok(original)` - The record prior to marking
    /// * `Err(LedgerError::TransactionNotFound)` - If the id is unknown
    /// * `Err(LedgerError::AlreadyModified)` - If the record is already terminal
    pub fn mark_modified(&self, id: TransactionId) -> Result<Transaction, LedgerError> {
        let mut entry = self
            .transactions
            .get_mut(&id)
            .ok_or_else(|| LedgerError::transaction_not_found(id))?;

        if entry.modified {
            return Err(LedgerError::already_modified(id));
        }
        let original = entry.value().clone();
        entry.modified = true;
        Ok(original)
    }

    /// Scan the ledger, returning matching records in ascending id order
    pub fn scan<F>(&self, predicate: F) -> Vec<Transaction>
    where
        F: Fn(&Transaction) -> bool,
    {
        let mut matches: Vec<Transaction> = self
            .transactions
            .iter()
            .filter(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        matches.sort_by_key(|tx| tx.id);
        matches
    }

    /// Number of recorded transactions
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// Whether the ledger holds no records
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}
