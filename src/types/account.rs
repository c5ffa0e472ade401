//! Account-related types for the Bank Ledger Engine
//!
//! This module defines the Account structure representing a bank account
//! with a decimal balance.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Account identifier
///
/// A stable, unique string such as "A001". Account identifiers also key the
/// per-account lock registry, so their lexicographic order defines the
/// canonical lock acquisition order.
pub type AccountId = String;

/// Bank account state
///
/// Represents the current state of an account: its identifier, the holder's
/// name, and the balance.
///
/// # Invariants
///
/// The balance is always non-negative. This is enforced at the point of
/// mutation by the account store's `credit`/`debit` operations; no other
/// code path writes a balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// The unique account identifier
    pub id: AccountId,

    /// The account holder's name
    pub holder: String,

    /// Current balance
    ///
    /// Uses `rust_decimal::Decimal` for exact decimal arithmetic; binary
    /// floating point is never used for money.
    pub balance: Decimal,
}

impl Account {
    /// Create a new account with the given identifier, holder, and balance
    pub fn new(id: impl Into<AccountId>, holder: impl Into<String>, balance: Decimal) -> Self {
        Account {
            id: id.into(),
            holder: holder.into(),
            balance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_account() {
        let account = Account::new("A001", "Alice", Decimal::new(1000000, 2));

        assert_eq!(account.id, "A001");
        assert_eq!(account.holder, "Alice");
        assert_eq!(account.balance, Decimal::new(1000000, 2));
    }
}
