//! End-to-end flows through the transaction engine
//!
//! These tests exercise the public engine surface the way an outer routing
//! layer would: provisioning accounts, submitting transactions, correcting
//! and reversing them, and reading back the ledger through the listing
//! contract.

use bank_ledger_engine::{
    AccountStore, LedgerError, LedgerStore, LockCoordinator, TransactionEngine,
    TransactionRequest, TransactionType,
};
use rstest::rstest;
use rust_decimal::Decimal;
use std::sync::Arc;

/// Build an engine over the default A001-A010 seed (10000.00 each)
fn seeded_engine() -> (TransactionEngine, Arc<AccountStore>) {
    let accounts = Arc::new(AccountStore::new());
    for i in 1..=10 {
        accounts.open(
            format!("A{:03}", i),
            format!("Account {}", i),
            Decimal::new(10000_00, 2),
        );
    }
    let engine = TransactionEngine::new(
        Arc::clone(&accounts),
        Arc::new(LedgerStore::new()),
        Arc::new(LockCoordinator::new()),
    );
    (engine, accounts)
}

fn request(
    tx_type: TransactionType,
    amount: Decimal,
    from: Option<&str>,
    to: Option<&str>,
) -> TransactionRequest {
    TransactionRequest {
        tx_type,
        amount,
        description: "integration test".to_string(),
        from_account: from.map(String::from),
        to_account: to.map(String::from),
    }
}

fn balance(accounts: &AccountStore, id: &str) -> Decimal {
    accounts.find(id).unwrap().balance
}

#[test]
fn deposit_updates_balance_and_ledger() {
    let (engine, accounts) = seeded_engine();

    let tx = engine
        .process(request(
            TransactionType::Deposit,
            Decimal::new(50_00, 2),
            None,
            Some("A001"),
        ))
        .unwrap();

    assert_eq!(balance(&accounts, "A001"), Decimal::new(10050_00, 2));
    assert_eq!(tx.tx_type, TransactionType::Deposit);
    assert_eq!(tx.amount, Decimal::new(50_00, 2));
    assert_eq!(tx.to_account.as_deref(), Some("A001"));

    let listed = engine.list(0, 20, None, None).unwrap();
    assert_eq!(listed, vec![tx]);
}

#[test]
fn transfer_moves_funds_between_accounts() {
    let (engine, accounts) = seeded_engine();

    engine
        .process(request(
            TransactionType::Transfer,
            Decimal::new(200_00, 2),
            Some("A001"),
            Some("A002"),
        ))
        .unwrap();

    assert_eq!(balance(&accounts, "A001"), Decimal::new(9800_00, 2));
    assert_eq!(balance(&accounts, "A002"), Decimal::new(10200_00, 2));

    let transfers = engine
        .list(0, 20, Some(TransactionType::Transfer), None)
        .unwrap();
    assert_eq!(transfers.len(), 1);
}

#[rstest]
#[case::withdrawal(TransactionType::Withdrawal, Some("A001"), None)]
#[case::transfer(TransactionType::Transfer, Some("A001"), Some("A002"))]
fn overdraft_is_rejected_and_balances_unchanged(
    #[case] tx_type: TransactionType,
    #[case] from: Option<&str>,
    #[case] to: Option<&str>,
) {
    let (engine, accounts) = seeded_engine();

    let result = engine.process(request(tx_type, Decimal::new(10000_01, 2), from, to));

    assert!(matches!(result, Err(LedgerError::InsufficientFunds { .. })));
    assert_eq!(balance(&accounts, "A001"), Decimal::new(10000_00, 2));
    assert_eq!(balance(&accounts, "A002"), Decimal::new(10000_00, 2));
    assert!(engine.list(0, 20, None, None).unwrap().is_empty());
}

#[test]
fn correction_flow_keeps_ledger_replayable() {
    let (engine, accounts) = seeded_engine();

    let original = engine
        .process(request(
            TransactionType::Deposit,
            Decimal::new(50_00, 2),
            None,
            Some("A001"),
        ))
        .unwrap();

    let difference = engine
        .correct(
            original.id,
            request(
                TransactionType::Deposit,
                Decimal::new(80_00, 2),
                None,
                Some("A001"),
            ),
        )
        .unwrap();

    // The stale original plus the difference equals the corrected amount.
    assert_eq!(original.amount + difference.amount, Decimal::new(80_00, 2));
    assert_eq!(balance(&accounts, "A001"), Decimal::new(10080_00, 2));

    // The original is terminal; the difference entry is a fresh record.
    let stored_original = engine.find_transaction(original.id).unwrap();
    assert!(stored_original.modified);
    assert_eq!(stored_original.amount, original.amount);
    assert!(!engine.find_transaction(difference.id).unwrap().modified);
    assert!(difference.id > original.id);

    // Replaying the ledger reproduces the balance.
    let net: Decimal = engine
        .list(0, 100, None, Some("A001"))
        .unwrap()
        .iter()
        .map(|tx| tx.amount)
        .sum();
    assert_eq!(net, Decimal::new(80_00, 2));
}

#[test]
fn reversal_restores_both_balances() {
    let (engine, accounts) = seeded_engine();

    let original = engine
        .process(request(
            TransactionType::Transfer,
            Decimal::new(300_00, 2),
            Some("A003"),
            Some("A004"),
        ))
        .unwrap();

    engine.reverse(original.id).unwrap();

    assert_eq!(balance(&accounts, "A003"), Decimal::new(10000_00, 2));
    assert_eq!(balance(&accounts, "A004"), Decimal::new(10000_00, 2));

    // One original plus one compensating entry, nothing rewritten.
    let entries = engine.list(0, 20, None, Some("A003")).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].amount, Decimal::new(300_00, 2));
    assert_eq!(entries[1].amount, Decimal::new(-300_00, 2));
}

#[rstest]
#[case::correct_twice(true)]
#[case::reverse_twice(false)]
fn second_correction_fails_with_already_modified(#[case] correct_first: bool) {
    let (engine, _accounts) = seeded_engine();

    let original = engine
        .process(request(
            TransactionType::Deposit,
            Decimal::new(50_00, 2),
            None,
            Some("A001"),
        ))
        .unwrap();

    if correct_first {
        engine
            .correct(
                original.id,
                request(
                    TransactionType::Deposit,
                    Decimal::new(60_00, 2),
                    None,
                    Some("A001"),
                ),
            )
            .unwrap();
    } else {
        engine.reverse(original.id).unwrap();
    }

    let correct_again = engine.correct(
        original.id,
        request(
            TransactionType::Deposit,
            Decimal::new(70_00, 2),
            None,
            Some("A001"),
        ),
    );
    let reverse_again = engine.reverse(original.id);

    assert_eq!(
        correct_again,
        Err(LedgerError::already_modified(original.id))
    );
    assert_eq!(
        reverse_again,
        Err(LedgerError::already_modified(original.id))
    );
}

#[test]
fn listing_filters_compose_with_pagination() {
    let (engine, _accounts) = seeded_engine();

    for i in 0..6 {
        let to = if i % 2 == 0 { "A001" } else { "A002" };
        engine
            .process(request(
                TransactionType::Deposit,
                Decimal::new(1_00, 2),
                None,
                Some(to),
            ))
            .unwrap();
    }
    engine
        .process(request(
            TransactionType::Transfer,
            Decimal::new(5_00, 2),
            Some("A001"),
            Some("A002"),
        ))
        .unwrap();

    // A001 is involved in 3 deposits and 1 transfer.
    let page0 = engine.list(0, 3, None, Some("A001")).unwrap();
    let page1 = engine.list(1, 3, None, Some("A001")).unwrap();
    assert_eq!(page0.len(), 3);
    assert_eq!(page1.len(), 1);
    assert_eq!(page1[0].tx_type, TransactionType::Transfer);

    let deposits_a002 = engine
        .list(0, 20, Some(TransactionType::Deposit), Some("A002"))
        .unwrap();
    assert_eq!(deposits_a002.len(), 3);
    assert!(deposits_a002
        .iter()
        .all(|tx| tx.to_account.as_deref() == Some("A002")));
}
