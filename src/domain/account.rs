use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::*;

/// Represents a balance-holding account tracked within the ledger.
///
/// Only `current_balance` ever changes after creation, and only through
/// transaction application inside the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub category: AccountCategory,
    pub initial_balance: Decimal,
    pub current_balance: Decimal,
}

impl Account {
    /// Creates a new account whose current balance starts at `initial_balance`.
    pub fn new(
        name: impl Into<String>,
        category: AccountCategory,
        initial_balance: Decimal,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            category,
            initial_balance,
            current_balance: initial_balance,
        }
    }

    /// Net amount moved through this account since creation.
    pub fn net_change(&self) -> Decimal {
        self.current_balance - self.initial_balance
    }

    pub(crate) fn apply_delta(&mut self, delta: Decimal) {
        self.current_balance += delta;
    }
}

impl Identifiable for Account {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for Account {
    fn display_label(&self) -> String {
        format!("{} ({})", self.name, self.category.display_name())
    }
}

/// Enumerates the supported account classifications.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum AccountCategory {
    #[default]
    General,
    Cash,
    Savings,
    Investment,
    Mortgage,
    Bonuses,
}

impl AccountCategory {
    pub const ALL: [AccountCategory; 6] = [
        AccountCategory::General,
        AccountCategory::Cash,
        AccountCategory::Savings,
        AccountCategory::Investment,
        AccountCategory::Mortgage,
        AccountCategory::Bonuses,
    ];
}

impl DisplayName for AccountCategory {
    fn display_name(&self) -> &'static str {
        match self {
            AccountCategory::General => "General",
            AccountCategory::Cash => "Cash",
            AccountCategory::Savings => "Savings",
            AccountCategory::Investment => "Investment",
            AccountCategory::Mortgage => "Mortgage",
            AccountCategory::Bonuses => "Bonuses",
        }
    }
}

impl fmt::Display for AccountCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for AccountCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_by_name(&Self::ALL, s).ok_or_else(|| format!("unknown account category `{s}`"))
    }
}
