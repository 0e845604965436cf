//! Line-oriented shell that drives a [`crate::ledger::LedgerStore`].

pub mod commands;
pub mod output;
mod shell;

pub use shell::{run_cli, CliError, CliMode};
