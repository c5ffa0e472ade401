//! Core business logic components
//!
//! This module contains the transaction-processing core:
//! - `account_store`: keyed account records with guarded balance mutation
//! - `ledger_store`: the append-mostly system of record
//! - `lock_coordinator`: per-account locks with canonical ordering
//! - `engine`: validation, locking, balance mutation, and corrections

pub mod account_store;
pub mod engine;
pub mod ledger_store;
pub mod lock_coordinator;

pub use account_store::AccountStore;
pub use engine::TransactionEngine;
pub use ledger_store::LedgerStore;
pub use lock_coordinator::LockCoordinator;
