//! Thread-safe account storage with guarded balance mutation
//!
//! This module provides the `AccountStore`, a keyed mapping from account
//! identifier to account record backed by `DashMap` for fine-grained
//! concurrent access.
//!
//! # Balance mutation contract
//!
//! All balance writes are funneled through [`AccountStore::credit`] and
//! [`AccountStore::debit`]; no other code path writes a balance field.
//! Both operations are atomic with respect to a single account, but callers
//! touching multiple accounts together (the transaction engine) must hold
//! the appropriate coordinator locks for the whole read-modify-write.
//!
//! # Signed amounts
//!
//! Compensating ledger entries may carry negative amounts, so `credit` and
//! `debit` accept signed values. Whichever direction the arithmetic runs,
//! a resulting negative balance is rejected and the account is left
//! unchanged.

use crate::types::{Account, AccountId, LedgerError};
use dashmap::DashMap;
use rust_decimal::Decimal;

/// Keyed mapping from account identifier to mutable balance record
///
/// Accounts are provisioned through [`AccountStore::open`] and mutated only
/// through `credit`/`debit`. Reads return snapshots; a snapshot taken before
/// a lock is acquired is not authoritative.
#[derive(Debug, Default)]
pub struct AccountStore {
    /// Concurrent map of account id to account record
    accounts: DashMap<AccountId, Account>,
}

impl AccountStore {
    /// Create a new empty AccountStore
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
        }
    }

    /// Provision an account
    ///
    /// Inserts (or replaces) the record for `id`. Provisioning happens
    /// outside the transaction-processing path, at startup or in tests.
    pub fn open(
        &self,
        id: impl Into<AccountId>,
        holder: impl Into<String>,
        balance: Decimal,
    ) -> Account {
        let account = Account::new(id, holder, balance);
        self.accounts.insert(account.id.clone(), account.clone());
        account
    }

    /// Look up an account by identifier
    ///
    /// Returns a snapshot of the account at the time of the call. Used for
    /// existence pre-checks; the authoritative balance read happens inside
    /// `credit`/`debit` while the caller holds the account lock.
    pub fn find(&self, id: &str) -> Option<Account> {
        self.accounts.get(id).map(|entry| entry.value().clone())
    }

    /// Add a signed amount to an account balance
    ///
    /// # Returns
    ///
    /// * `Ok(balance)` - The new balance after the credit
    /// * `Err(LedgerError::AccountNotFound)` - If the account does not exist
    /// * `Err(LedgerError::InsufficientFunds)` - If a negative amount would
    ///   drive the balance below zero
    pub fn credit(&self, id: &str, amount: Decimal) -> Result<Decimal, LedgerError> {
        let mut entry = self
            .accounts
            .get_mut(id)
            .ok_or_else(|| LedgerError::account_not_found(id))?;

        let new_balance = entry.balance + amount;
        if new_balance < Decimal::ZERO {
            return Err(LedgerError::insufficient_funds(
                id,
                entry.balance,
                -amount,
            ));
        }
        entry.balance = new_balance;
        Ok(new_balance)
    }

    /// Subtract a signed amount from an account balance
    ///
    /// The balance check happens here, at the point of debit: if the
    /// current balance is smaller than `amount`, the debit is rejected and
    /// the balance is left unchanged.
    ///
    /// # Returns
    ///
    /// * `Ok(balance)` - The new balance after the debit
    /// * `Err(LedgerError::AccountNotFound)` - If the account does not exist
    /// * `Err(LedgerError::InsufficientFunds)` - If the balance is smaller
    ///   than the requested amount
    pub fn debit(&self, id: &str, amount: Decimal) -> Result<Decimal, LedgerError> {
        let mut entry = self
            .accounts
            .get_mut(id)
            .ok_or_else(|| LedgerError::account_not_found(id))?;

        if entry.balance < amount {
            return Err(LedgerError::insufficient_funds(
                id,
                entry.balance,
                amount,
            ));
        }
        entry.balance -= amount;
        Ok(entry.balance)
    }

    /// Get a snapshot of all accounts
    pub fn all_accounts(&self) -> Vec<Account> {
        self.accounts
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_account(balance: i64) -> AccountStore {
        let store = AccountStore::new();
        store.open("A001", "Alice", Decimal::new(balance, 2));
        store
    }

    #[test]
    fn test_open_and_find() {
        let store = store_with_account(10000_00);

        let account = store.find("A001").unwrap();
        assert_eq!(account.holder, "Alice");
        assert_eq!(account.balance, Decimal::new(10000_00, 2));
    }

    #[test]
    fn test_find_missing_account() {
        let store = AccountStore::new();
        assert!(store.find("A999").is_none());
    }

    #[test]
    fn test_credit_increases_balance() {
        let store = store_with_account(10000_00);

        let balance = store.credit("A001", Decimal::new(5000, 2)).unwrap();
        assert_eq!(balance, Decimal::new(10050_00, 2));
        assert_eq!(store.find("A001").unwrap().balance, Decimal::new(10050_00, 2));
    }

    #[test]
    fn test_credit_unknown_account() {
        let store = AccountStore::new();

        let result = store.credit("A999", Decimal::new(5000, 2));
        assert!(matches!(result, Err(LedgerError::AccountNotFound { .. })));
    }

    #[test]
    fn test_negative_credit_rejected_when_balance_would_go_negative() {
        let store = store_with_account(100_00);

        // A compensating entry crediting -150.00 against a 100.00 balance
        let result = store.credit("A001", Decimal::new(-150_00, 2));
        assert!(matches!(result, Err(LedgerError::InsufficientFunds { .. })));
        assert_eq!(store.find("A001").unwrap().balance, Decimal::new(100_00, 2));
    }

    #[test]
    fn test_debit_decreases_balance() {
        let store = store_with_account(10000_00);

        let balance = store.debit("A001", Decimal::new(200_00, 2)).unwrap();
        assert_eq!(balance, Decimal::new(9800_00, 2));
    }

    #[test]
    fn test_debit_insufficient_funds_leaves_balance_unchanged() {
        let store = store_with_account(100_00);

        let result = store.debit("A001", Decimal::new(150_00, 2));
        assert_eq!(
            result,
            Err(LedgerError::insufficient_funds(
                "A001",
                Decimal::new(100_00, 2),
                Decimal::new(150_00, 2)
            ))
        );
        assert_eq!(store.find("A001").unwrap().balance, Decimal::new(100_00, 2));
    }

    #[test]
    fn test_negative_debit_adds_funds() {
        let store = store_with_account(100_00);

        // Reversal of a withdrawal runs as a debit of the negated amount
        let balance = store.debit("A001", Decimal::new(-50_00, 2)).unwrap();
        assert_eq!(balance, Decimal::new(150_00, 2));
    }

    #[test]
    fn test_concurrent_credits_are_atomic() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(store_with_account(0));
        let mut handles = vec![];

        for _ in 0..100 {
            let store = Arc::clone(&store);
            handles.push(thread::spawn(move || {
                store.credit("A001", Decimal::new(1_00, 2)).unwrap();
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.find("A001").unwrap().balance, Decimal::new(100_00, 2));
    }
}
