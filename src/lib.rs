//! Bank Ledger Engine Library
//! # Overview
//!
//! This library provides a concurrent transaction-processing core over
//! in-memory bank accounts, with corrections recorded as compensating
//! ledger entries.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Account, Transaction, LedgerError)
//! - [`cli`] - CLI argument parsing for the replay binary
//! - [`core`] - Business logic components:
//!   - [`core::engine`] - Validation, locking, balance mutation, corrections
//!   - [`core::account_store`] - Account records with guarded credit/debit
//!   - [`core::ledger_store`] - Append-mostly system of record
//!   - [`core::lock_coordinator`] - Per-account locks in canonical order
//! - [`io`] - CSV replay frontend (request reading, account output)
//!
//! # Transaction Types
//!
//! The engine supports three transaction types:
//!
//! - **Deposit**: Credit funds to a destination account
//! - **Withdrawal**: Debit funds from a source account (requires sufficient balance)
//! - **Transfer**: Move funds between two distinct accounts under both locks
//!
//! # Corrections
//!
//! A recorded transaction is never edited in place. Correcting or reversing
//! it marks the record terminal and appends a new compensating entry (the
//! signed difference, or the negation), so replaying the ledger in order
//! always reconstructs every balance.
//!
//! # Concurrency
//!
//! Callers run on ordinary threads; all blocking is on per-account mutex
//! acquisition. Two-account operations take their locks in lexicographic
//! order of the account identifiers, which rules out circular waits.

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod types;

pub use core::{AccountStore, LedgerStore, LockCoordinator, TransactionEngine};
pub use io::write_accounts_csv;
pub use types::{
    Account, AccountId, LedgerError, Transaction, TransactionId, TransactionRequest,
    TransactionType,
};
