//! Per-account lock coordination with canonical ordering
//!
//! This module provides the `LockCoordinator`, which owns one mutual
//! exclusion lock per account identifier and hands out ordered
//! multi-account acquisition to the transaction engine.
//!
//! # Deadlock avoidance
//!
//! Two-account operations acquire their locks in lexicographic order of the
//! account identifiers, regardless of which account is the source and which
//! is the destination. Because every caller acquires multi-account locks in
//! the same global order, no cycle of waiting can form. Single-account
//! operations take exactly one lock through the same path rather than
//! skipping lock discipline.
//!
//! # Release guarantees
//!
//! Locks are held as RAII guards and released in reverse order of
//! acquisition on every exit path, including error returns from the
//! protected closure. If acquiring the second lock fails, the already-held
//! first lock is released before the failure propagates.
//!
//! The coordinator is an explicitly-owned registry injected into the engine
//! at construction, not a hidden process-wide singleton, so tests can
//! isolate instances.

use crate::types::{AccountId, LedgerError};
use dashmap::DashMap;
use std::sync::{Arc, Mutex};

/// Registry of per-account locks with ordered multi-account acquisition
///
/// Lock entries are created lazily on first use and shared for the lifetime
/// of the coordinator. Creation is at-most-once even under concurrent first
/// access, via the registry map's atomic get-or-create.
#[derive(Debug, Default)]
pub struct LockCoordinator {
    /// Map of account id to its shared lock
    locks: DashMap<AccountId, Arc<Mutex<()>>>,
}

impl LockCoordinator {
    /// Create a new empty lock coordinator
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// Get or lazily create the shared lock for an account
    fn lock_for(&self, account: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(account.to_string())
            .or_default()
            .clone()
    }

    /// Run a closure while holding the lock(s) covering one or two accounts
    ///
    /// For two distinct accounts the locks are acquired in lexicographic
    /// (canonical) order and released in reverse order when the guards drop.
    /// Passing the same account twice, or `None` for the second account,
    /// degenerates to a single lock.
    ///
    /// # Arguments
    ///
    /// * `a` - First account involved in the operation
    /// * `b` - Second account, for two-account operations
    /// * `f` - The critical section to run under the lock(s)
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::LockPoisoned` if a lock was poisoned by a
    /// panicking holder; any lock already acquired is released before the
    /// error returns. Errors from `f` propagate unchanged, after release.
    pub fn with_locks<T>(
        &self,
        a: &str,
        b: Option<&str>,
        f: impl FnOnce() -> Result<T, LedgerError>,
    ) -> Result<T, LedgerError> {
        let (first, second) = match b {
            None => (a, None),
            Some(b) if b == a => (a, None),
            Some(b) if a < b => (a, Some(b)),
            Some(b) => (b, Some(a)),
        };

        let first_lock = self.lock_for(first);
        let second_lock = second.map(|id| self.lock_for(id));

        // Guards drop in reverse declaration order, so the second lock is
        // always released before the first.
        let _first_guard = first_lock
            .lock()
            .map_err(|_| LedgerError::lock_poisoned(first))?;
        let _second_guard = match (&second_lock, second) {
            (Some(lock), Some(id)) => {
                // A failure here drops _first_guard on the way out.
                Some(lock.lock().map_err(|_| LedgerError::lock_poisoned(id))?)
            }
            _ => None,
        };

        f()
    }

    /// Number of registered account locks
    pub fn registered(&self) -> usize {
        self.locks.len()
    }
}
