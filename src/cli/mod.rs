//! CLI argument parsing for the replay binary

pub mod args;

pub use args::{parse_args, CliArgs};
