use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::config::ConfigError;
use crate::domain::TransactionKind;

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Error type that captures common ledger failures.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("Unresolved account reference: {0}")]
    UnresolvedReference(Uuid),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Caller-correctable input problems. The store is left untouched when one is raised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("account name must not be empty")]
    EmptyAccountName,
    #[error("amount must be greater than zero (got {0})")]
    NonPositiveAmount(Decimal),
    #[error("{0} transaction requires an account")]
    MissingAccount(TransactionKind),
    #[error("transfer requires both a source and a destination account")]
    MissingTransferEndpoint,
    #[error("transfer source and destination must differ")]
    SameTransferEndpoints,
}

impl LedgerError {
    /// Returns the validation failure wrapped by this error, if any.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            LedgerError::Validation(err) => Some(err),
            _ => None,
        }
    }
}
