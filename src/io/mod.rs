//! I/O handling for the CSV replay frontend
//!
//! This module contains:
//! - `csv_format`: row structures, conversions, and account output
//! - `reader`: file readers for request and account seed CSVs

pub mod csv_format;
pub mod reader;

pub use csv_format::write_accounts_csv;
pub use reader::{read_accounts, read_requests};
