//! Bank Ledger Engine CLI
//!
//! Replays a CSV of transaction requests against an in-memory ledger from a
//! pool of worker threads, then writes the final account balances as CSV to
//! stdout.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- transactions.csv > balances.csv
//! cargo run -- --accounts seed.csv --workers 8 transactions.csv > balances.csv
//! ```
//!
//! Without `--accounts`, ten accounts A001-A010 are provisioned with a
//! balance of 10000.00 each.
//!
//! Rejected transactions (validation failures, insufficient funds, unknown
//! accounts) are logged to stderr and counted; they never abort the replay.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (missing arguments, file not found, unreadable seed file, etc.)

use bank_ledger_engine::cli;
use bank_ledger_engine::io::{read_accounts, read_requests, write_accounts_csv};
use bank_ledger_engine::{
    AccountStore, LedgerError, LedgerStore, LockCoordinator, TransactionEngine,
    TransactionRequest,
};
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use tracing::{info, warn};

fn main() {
    // Logs go to stderr; stdout carries the balances CSV.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = cli::parse_args();

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &cli::CliArgs) -> Result<(), LedgerError> {
    let accounts = Arc::new(AccountStore::new());
    seed_accounts(&accounts, args)?;

    let engine = TransactionEngine::new(
        Arc::clone(&accounts),
        Arc::new(LedgerStore::new()),
        Arc::new(LockCoordinator::new()),
    );

    let requests = read_requests(&args.input_file)?;
    let total = requests.len();
    let rejected = replay(&engine, requests, args.worker_count());
    info!(total, rejected, "replay complete");

    let mut output = std::io::stdout();
    write_accounts_csv(&accounts.all_accounts(), &mut output)
}

/// Seed the account store from the seed file, or with the default A001-A010 set
fn seed_accounts(store: &AccountStore, args: &cli::CliArgs) -> Result<(), LedgerError> {
    match &args.accounts_file {
        Some(path) => {
            for account in read_accounts(path)? {
                store.open(account.id, account.holder, account.balance);
            }
        }
        None => {
            for i in 1..=10 {
                store.open(
                    format!("A{:03}", i),
                    format!("Account {}", i),
                    Decimal::new(10000_00, 2),
                );
            }
        }
    }
    Ok(())
}

/// Submit requests to the engine from a pool of worker threads
///
/// Workers pull the next request index from a shared atomic counter, so the
/// engine sees genuinely concurrent callers. Returns the number of rejected
/// requests.
fn replay(engine: &TransactionEngine, requests: Vec<TransactionRequest>, workers: usize) -> usize {
    let next = AtomicUsize::new(0);
    let rejected = AtomicUsize::new(0);

    thread::scope(|scope| {
        for _ in 0..workers {
            scope.spawn(|| loop {
                let index = next.fetch_add(1, Ordering::Relaxed);
                let Some(request) = requests.get(index) else {
                    break;
                };
                if let Err(err) = engine.process(request.clone()) {
                    warn!(index, %err, "request rejected");
                    rejected.fetch_add(1, Ordering::Relaxed);
                }
            });
        }
    });

    rejected.into_inner()
}
