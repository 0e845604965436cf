use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::{TransactionCategory, TransactionFlow, TransactionKind};
use crate::errors::ValidationError;

/// Input for `LedgerStore::add_transaction`.
///
/// References not used by `kind` are ignored: `account_id` for transfers,
/// `source_account_id`/`destination_account_id` for income and expense.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub timestamp: DateTime<Utc>,
    pub category: Option<TransactionCategory>,
    pub account_id: Option<Uuid>,
    pub source_account_id: Option<Uuid>,
    pub destination_account_id: Option<Uuid>,
    pub description: Option<String>,
}

impl NewTransaction {
    pub fn new(kind: TransactionKind, amount: Decimal, timestamp: DateTime<Utc>) -> Self {
        Self {
            kind,
            amount,
            timestamp,
            category: None,
            account_id: None,
            source_account_id: None,
            destination_account_id: None,
            description: None,
        }
    }

    pub fn income(account_id: Uuid, amount: Decimal, timestamp: DateTime<Utc>) -> Self {
        Self::new(TransactionKind::Income, amount, timestamp).with_account(account_id)
    }

    pub fn expense(account_id: Uuid, amount: Decimal, timestamp: DateTime<Utc>) -> Self {
        Self::new(TransactionKind::Expense, amount, timestamp).with_account(account_id)
    }

    pub fn transfer(
        source_account_id: Uuid,
        destination_account_id: Uuid,
        amount: Decimal,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self::new(TransactionKind::Transfer, amount, timestamp)
            .with_source(source_account_id)
            .with_destination(destination_account_id)
    }

    pub fn with_account(mut self, account_id: Uuid) -> Self {
        self.account_id = Some(account_id);
        self
    }

    pub fn with_source(mut self, account_id: Uuid) -> Self {
        self.source_account_id = Some(account_id);
        self
    }

    pub fn with_destination(mut self, account_id: Uuid) -> Self {
        self.destination_account_id = Some(account_id);
        self
    }

    pub fn with_category(mut self, category: TransactionCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Checks the command in isolation and returns the accounts it touches.
    /// Whether those accounts exist is decided by the store.
    pub fn validate(&self) -> Result<TransactionFlow, ValidationError> {
        if self.amount <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveAmount(self.amount));
        }
        match self.kind {
            TransactionKind::Income => self
                .account_id
                .map(|account| TransactionFlow::Income { account })
                .ok_or(ValidationError::MissingAccount(self.kind)),
            TransactionKind::Expense => self
                .account_id
                .map(|account| TransactionFlow::Expense { account })
                .ok_or(ValidationError::MissingAccount(self.kind)),
            TransactionKind::Transfer => {
                match (self.source_account_id, self.destination_account_id) {
                    (Some(source), Some(destination)) if source == destination => {
                        Err(ValidationError::SameTransferEndpoints)
                    }
                    (Some(source), Some(destination)) => Ok(TransactionFlow::Transfer {
                        source,
                        destination,
                    }),
                    _ => Err(ValidationError::MissingTransferEndpoint),
                }
            }
        }
    }
}
