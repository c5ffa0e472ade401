use clap::Parser;
use std::path::PathBuf;

/// Replay bank transactions against an in-memory ledger
#[derive(Parser, Debug)]
#[command(name = "bank-ledger")]
#[command(about = "Replay bank transactions against an in-memory ledger", long_about = None)]
pub struct CliArgs {
    /// Input CSV file containing transaction requests
    #[arg(value_name = "INPUT", help = "Path to the transaction request CSV")]
    pub input_file: PathBuf,

    /// Account seed CSV (account,holder,balance)
    #[arg(
        long = "accounts",
        value_name = "FILE",
        help = "Seed accounts from a CSV instead of the built-in A001-A010 set"
    )]
    pub accounts_file: Option<PathBuf>,

    /// Number of worker threads submitting transactions concurrently
    #[arg(
        long = "workers",
        value_name = "COUNT",
        help = "Number of concurrent worker threads (default: CPU cores)"
    )]
    pub workers: Option<usize>,
}

impl CliArgs {
    /// Resolve the worker count, falling back to the number of CPU cores
    ///
    /// A zero value is treated as unset.
    pub fn worker_count(&self) -> usize {
        match self.workers {
            Some(count) if count > 0 => count,
            _ => num_cpus::get(),
        }
    }
}

/// Parse command-line arguments
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}
