//! Transaction processing engine
//!
//! This module provides the `TransactionEngine`, which validates requested
//! transactions, acquires the account locks involved in canonical order,
//! mutates balances through the account store's guarded `credit`/`debit`
//! contract, and appends the resulting record to the ledger.
//!
//! # Corrections as compensating entries
//!
//! Updating or deleting a past transaction never alters the recorded
//! amount. Instead the original record is marked terminal and a new
//! transaction is created: the signed difference for a correction, the
//! negation for a reversal. The compensating entry runs through the same
//! locked apply path as any other transaction, so the engine has exactly
//! one code path that ever mutates balances and the full history remains
//! reconstructable by replaying the ledger in order.
//!
//! # Atomicity
//!
//! Balance mutation and ledger append happen inside the same critical
//! section per account (pair): once a mutation commits, the record append
//! is guaranteed to follow before the locks are released. Any failure
//! before the first mutation leaves every balance untouched.

use crate::core::account_store::AccountStore;
use crate::core::ledger_store::LedgerStore;
use crate::core::lock_coordinator::LockCoordinator;
use crate::types::{
    AccountId, LedgerError, Transaction, TransactionId, TransactionRequest, TransactionType,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, warn};

/// Maximum accepted description length, in characters
const MAX_DESCRIPTION_LEN: usize = 255;

/// The transaction-processing core
///
/// Coordinates between the account store, the ledger, and the lock
/// coordinator. All three collaborators are injected at construction and
/// shared via `Arc`, so the engine itself is cheap to clone and safe to
/// call from many threads concurrently.
#[derive(Debug, Clone)]
pub struct TransactionEngine {
    /// Account balances, mutated only through credit/debit
    accounts: Arc<AccountStore>,

    /// System of record for balance changes
    ledger: Arc<LedgerStore>,

    /// Per-account locks with canonical multi-account ordering
    locks: Arc<LockCoordinator>,
}

impl TransactionEngine {
    /// Create a new engine over the given collaborators
    pub fn new(
        accounts: Arc<AccountStore>,
        ledger: Arc<LedgerStore>,
        locks: Arc<LockCoordinator>,
    ) -> Self {
        Self {
            accounts,
            ledger,
            locks,
        }
    }

    /// Process a caller-submitted transaction request
    ///
    /// Validates the request (positive amount, bounded non-empty
    /// description, account fields matching the type), stamps the current
    /// time, applies the balance changes under the account lock(s), and
    /// appends the record to the ledger.
    ///
    /// # Errors
    ///
    /// * `LedgerError::Validation` - Malformed request; no partial effects
    /// * `LedgerError::AccountNotFound` - A referenced account does not exist
    /// * `LedgerError::InsufficientFunds` - Debit exceeds the balance,
    ///   checked under the lock
    /// * `LedgerError::LockPoisoned` - Coordinator fault; no lock is leaked
    pub fn process(&self, request: TransactionRequest) -> Result<Transaction, LedgerError> {
        if request.amount <= rust_decimal::Decimal::ZERO {
            return Err(LedgerError::validation("Amount must be positive"));
        }
        self.validate_shape(&request)?;
        self.apply(request)
    }

    /// Correct a recorded transaction
    ///
    /// Marks the original terminal (at most one correction per record),
    /// then records a compensating entry whose amount is
    /// `updated.amount - original.amount` and whose account pair, type, and
    /// description come from `updated`. The compensating entry is exempt
    /// from the positive-amount rule and may legitimately be zero or
    /// negative, but it still runs through the full locked apply path and
    /// respects the non-negative balance invariant.
    ///
    /// # Errors
    ///
    /// * `LedgerError::TransactionNotFound` - Unknown identifier
    /// * `LedgerError::AlreadyModified` - The record is already terminal
    /// * Any error the apply path can produce for the compensating entry
    pub fn correct(
        &self,
        id: TransactionId,
        updated: TransactionRequest,
    ) -> Result<Transaction, LedgerError> {
        self.validate_shape(&updated)?;

        let original = self.ledger.mark_modified(id)?;
        debug!(id, "recording difference entry for correction");

        let difference = TransactionRequest {
            tx_type: updated.tx_type,
            amount: updated.amount - original.amount,
            description: updated.description,
            from_account: updated.from_account,
            to_account: updated.to_account,
        };
        self.apply(difference)
    }

    /// Reverse a recorded transaction
    ///
    /// Marks the original terminal and records a compensating entry whose
    /// amount is the negation of the original's, with account pair, type,
    /// and description copied unchanged from the original.
    ///
    /// # Errors
    ///
    /// Same as [`TransactionEngine::correct`].
    pub fn reverse(&self, id: TransactionId) -> Result<Transaction, LedgerError> {
        let original = self.ledger.mark_modified(id)?;
        debug!(id, "recording reversal entry");

        let negation = TransactionRequest {
            tx_type: original.tx_type,
            amount: -original.amount,
            description: original.description,
            from_account: original.from_account,
            to_account: original.to_account,
        };
        self.apply(negation)
    }

    /// Look up a recorded transaction by identifier
    pub fn find_transaction(&self, id: TransactionId) -> Option<Transaction> {
        self.ledger.find(id)
    }

    /// List recorded transactions with pagination and optional filters
    ///
    /// Pages are zero-based. The type filter matches exactly; the account
    /// filter matches transactions where the account is either the source
    /// or the destination. Pages past the end return an empty vector,
    /// never an error.
    ///
    /// # Errors
    ///
    /// * `LedgerError::Validation` - If `page_size` is zero
    pub fn list(
        &self,
        page: usize,
        page_size: usize,
        type_filter: Option<TransactionType>,
        account_filter: Option<&str>,
    ) -> Result<Vec<Transaction>, LedgerError> {
        if page_size == 0 {
            return Err(LedgerError::validation("Page size must be positive"));
        }

        // A page offset beyond usize is past the end by definition.
        let Some(offset) = page.checked_mul(page_size) else {
            return Ok(Vec::new());
        };

        let matches = self.ledger.scan(|tx| {
            type_filter.map_or(true, |t| tx.tx_type == t)
                && account_filter.map_or(true, |account| tx.involves(account))
        });

        Ok(matches
            .into_iter()
            .skip(offset)
            .take(page_size)
            .collect())
    }

    /// Snapshot of all account states
    pub fn accounts(&self) -> Vec<crate::types::Account> {
        self.accounts.all_accounts()
    }

    /// Check that the request's account fields match its type
    ///
    /// Shared between new transactions and corrections; the amount sign is
    /// deliberately not checked here.
    fn validate_shape(&self, request: &TransactionRequest) -> Result<(), LedgerError> {
        if request.description.is_empty() {
            return Err(LedgerError::validation("Description is required"));
        }
        if request.description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(LedgerError::validation(
                "Description must be at most 255 characters",
            ));
        }

        match request.tx_type {
            TransactionType::Deposit => {
                if request.to_account.is_none() {
                    return Err(LedgerError::validation(
                        "Destination account is required for deposit",
                    ));
                }
            }
            TransactionType::Withdrawal => {
                if request.from_account.is_none() {
                    return Err(LedgerError::validation(
                        "Source account is required for withdrawal",
                    ));
                }
            }
            TransactionType::Transfer => {
                let (from, to) = match (&request.from_account, &request.to_account) {
                    (Some(from), Some(to)) => (from, to),
                    (None, _) => {
                        return Err(LedgerError::validation(
                            "Source account is required for transfer",
                        ));
                    }
                    (_, None) => {
                        return Err(LedgerError::validation(
                            "Destination account is required for transfer",
                        ));
                    }
                };
                if from == to {
                    return Err(LedgerError::validation(
                        "Cannot transfer to the same account",
                    ));
                }
            }
        }
        Ok(())
    }

    /// Apply a validated request: lock, mutate, record
    ///
    /// The single code path that ever mutates balances. Callers have
    /// already checked the request shape; the amount may be signed when the
    /// request is a compensating entry.
    fn apply(&self, request: TransactionRequest) -> Result<Transaction, LedgerError> {
        let timestamp = Utc::now();

        let result = match request.tx_type {
            TransactionType::Deposit => {
                let Some(to) = request.to_account.clone() else {
                    return Err(LedgerError::validation(
                        "Destination account is required for deposit",
                    ));
                };
                self.locks.with_locks(&to, None, || {
                    self.require_account(&to)?;
                    self.accounts.credit(&to, request.amount)?;
                    Ok(self.record(&request, timestamp))
                })
            }
            TransactionType::Withdrawal => {
                let Some(from) = request.from_account.clone() else {
                    return Err(LedgerError::validation(
                        "Source account is required for withdrawal",
                    ));
                };
                self.locks.with_locks(&from, None, || {
                    self.require_account(&from)?;
                    // The balance check inside debit is the authoritative one:
                    // it runs while the account lock is held.
                    self.accounts.debit(&from, request.amount)?;
                    Ok(self.record(&request, timestamp))
                })
            }
            TransactionType::Transfer => {
                let (Some(from), Some(to)) =
                    (request.from_account.clone(), request.to_account.clone())
                else {
                    return Err(LedgerError::validation(
                        "Both accounts are required for transfer",
                    ));
                };
                self.locks.with_locks(&from, Some(&to), || {
                    self.require_account(&from)?;
                    self.require_account(&to)?;
                    // Re-checked under both locks; any earlier read is stale.
                    self.accounts.debit(&from, request.amount)?;
                    match self.accounts.credit(&to, request.amount) {
                        Ok(_) => {}
                        Err(err) => {
                            // Negative compensating credit can fail after the
                            // debit succeeded; restore the source before
                            // surfacing the error so no partial effect commits.
                            self.accounts.credit(&from, request.amount)?;
                            return Err(err);
                        }
                    }
                    Ok(self.record(&request, timestamp))
                })
            }
        };

        match &result {
            Ok(tx) => debug!(id = tx.id, tx_type = ?tx.tx_type, %tx.amount, "transaction recorded"),
            Err(err) => warn!(%err, "transaction rejected"),
        }
        result
    }

    /// Fail with `AccountNotFound` unless the account exists
    fn require_account(&self, id: &AccountId) -> Result<(), LedgerError> {
        self.accounts
            .find(id)
            .map(|_| ())
            .ok_or_else(|| LedgerError::account_not_found(id.clone()))
    }

    /// Append the request to the ledger as a recorded transaction
    fn record(
        &self,
        request: &TransactionRequest,
        timestamp: chrono::DateTime<Utc>,
    ) -> Transaction {
        self.ledger.append(Transaction::new(
            request.tx_type,
            request.amount,
            request.description.clone(),
            timestamp,
            request.from_account.clone(),
            request.to_account.clone(),
        ))
    }
}
