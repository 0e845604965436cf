use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{find_by_id, Account, Transaction};

/// Immutable copy of the store's collections at one revision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LedgerSnapshot {
    /// Incremented once per successful mutation; `0` for a store nothing has touched.
    pub revision: u64,
    pub accounts: Vec<Account>,
    pub transactions: Vec<Transaction>,
}

impl LedgerSnapshot {
    pub fn account(&self, id: Uuid) -> Option<&Account> {
        find_by_id(&self.accounts, id)
    }

    pub fn transaction(&self, id: Uuid) -> Option<&Transaction> {
        find_by_id(&self.transactions, id)
    }

    pub fn total_balance(&self) -> Decimal {
        self.accounts
            .iter()
            .map(|account| account.current_balance)
            .sum()
    }
}
