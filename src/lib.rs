#![doc(test(attr(deny(warnings))))]

//! Noboros Core keeps personal accounts and their transactions consistent in
//! memory and derives balance history and statistics from the transaction log.

pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod ledger;
pub mod services;
pub mod utils;

pub use errors::{LedgerError, LedgerResult, ValidationError};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    init_with_filter(None);
}

/// Initializes tracing using the `log_filter` from `config` when present.
pub fn init_with_config(config: &config::LedgerConfig) {
    init_with_filter(config.log_filter.as_deref());
}

fn init_with_filter(directive: Option<&str>) {
    INIT_TRACING.call_once(|| {
        utils::init_tracing_with(directive);
        tracing::info!("Noboros Core tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
    }
}
