use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{parse_by_name, DisplayName, Displayable, Identifiable};

/// Direction of a money movement.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    Income,
    Expense,
    Transfer,
}

impl TransactionKind {
    pub const ALL: [TransactionKind; 3] = [
        TransactionKind::Income,
        TransactionKind::Expense,
        TransactionKind::Transfer,
    ];
}

impl DisplayName for TransactionKind {
    fn display_name(&self) -> &'static str {
        match self {
            TransactionKind::Income => "Income",
            TransactionKind::Expense => "Expense",
            TransactionKind::Transfer => "Transfer",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_by_name(&Self::ALL, s).ok_or_else(|| format!("unknown transaction type `{s}`"))
    }
}

/// Spending and earning buckets for income and expense records.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TransactionCategory {
    FoodDrinks,
    Shopping,
    Housing,
    Transportation,
    Vehicle,
    LifeEntertainment,
    FinancialExpenses,
    Investments,
    Income,
    Others,
}

impl TransactionCategory {
    pub const ALL: [TransactionCategory; 10] = [
        TransactionCategory::FoodDrinks,
        TransactionCategory::Shopping,
        TransactionCategory::Housing,
        TransactionCategory::Transportation,
        TransactionCategory::Vehicle,
        TransactionCategory::LifeEntertainment,
        TransactionCategory::FinancialExpenses,
        TransactionCategory::Investments,
        TransactionCategory::Income,
        TransactionCategory::Others,
    ];
}

impl DisplayName for TransactionCategory {
    fn display_name(&self) -> &'static str {
        match self {
            TransactionCategory::FoodDrinks => "Food & Drinks",
            TransactionCategory::Shopping => "Shopping",
            TransactionCategory::Housing => "Housing",
            TransactionCategory::Transportation => "Transportation",
            TransactionCategory::Vehicle => "Vehicle",
            TransactionCategory::LifeEntertainment => "Life & Entertainment",
            TransactionCategory::FinancialExpenses => "Financial expenses",
            TransactionCategory::Investments => "Investments",
            TransactionCategory::Income => "Income",
            TransactionCategory::Others => "Others",
        }
    }
}

impl fmt::Display for TransactionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for TransactionCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_by_name(&Self::ALL, s).ok_or_else(|| format!("unknown transaction category `{s}`"))
    }
}

/// Accounts touched by a transaction. The variant fixes which references exist.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransactionFlow {
    Income { account: Uuid },
    Expense { account: Uuid },
    Transfer { source: Uuid, destination: Uuid },
}

impl TransactionFlow {
    pub fn kind(&self) -> TransactionKind {
        match self {
            TransactionFlow::Income { .. } => TransactionKind::Income,
            TransactionFlow::Expense { .. } => TransactionKind::Expense,
            TransactionFlow::Transfer { .. } => TransactionKind::Transfer,
        }
    }

    /// Account for income and expense records.
    pub fn account(&self) -> Option<Uuid> {
        match *self {
            TransactionFlow::Income { account } | TransactionFlow::Expense { account } => {
                Some(account)
            }
            TransactionFlow::Transfer { .. } => None,
        }
    }

    /// `(source, destination)` for transfers.
    pub fn endpoints(&self) -> Option<(Uuid, Uuid)> {
        match *self {
            TransactionFlow::Transfer {
                source,
                destination,
            } => Some((source, destination)),
            _ => None,
        }
    }

    /// Every account referenced, in application order.
    pub fn account_ids(&self) -> Vec<Uuid> {
        match *self {
            TransactionFlow::Income { account } | TransactionFlow::Expense { account } => {
                vec![account]
            }
            TransactionFlow::Transfer {
                source,
                destination,
            } => vec![source, destination],
        }
    }
}

/// Immutable record of a money movement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transaction {
    pub id: Uuid,
    pub flow: TransactionFlow,
    /// Magnitude only; direction comes from `flow`.
    pub amount: Decimal,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<TransactionCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Transaction {
    pub(crate) fn new(
        flow: TransactionFlow,
        amount: Decimal,
        timestamp: DateTime<Utc>,
        category: Option<TransactionCategory>,
        description: Option<String>,
    ) -> Self {
        let category = match flow {
            TransactionFlow::Transfer { .. } => None,
            _ => category,
        };
        let description = description
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty());
        Self {
            id: Uuid::new_v4(),
            flow,
            amount,
            timestamp,
            category,
            description,
        }
    }

    pub fn kind(&self) -> TransactionKind {
        self.flow.kind()
    }

    pub fn references(&self, account_id: Uuid) -> bool {
        self.flow.account_ids().contains(&account_id)
    }

    /// Per-account balance changes, in application order.
    pub fn legs(&self) -> Vec<(Uuid, Decimal)> {
        match self.flow {
            TransactionFlow::Income { account } => vec![(account, self.amount)],
            TransactionFlow::Expense { account } => vec![(account, -self.amount)],
            TransactionFlow::Transfer {
                source,
                destination,
            } => vec![(source, -self.amount), (destination, self.amount)],
        }
    }

    /// Signed change this transaction applies to `account_id`.
    pub fn delta_for(&self, account_id: Uuid) -> Decimal {
        self.legs()
            .into_iter()
            .filter(|(id, _)| *id == account_id)
            .map(|(_, delta)| delta)
            .sum()
    }

    /// Signed change to the aggregate balance; transfers are neutral.
    pub fn net_flow(&self) -> Decimal {
        match self.flow {
            TransactionFlow::Income { .. } => self.amount,
            TransactionFlow::Expense { .. } => -self.amount,
            TransactionFlow::Transfer { .. } => Decimal::ZERO,
        }
    }
}

impl Identifiable for Transaction {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for Transaction {
    fn display_label(&self) -> String {
        match &self.category {
            Some(category) => format!("{} {} ({})", self.kind(), self.amount, category),
            None => format!("{} {}", self.kind(), self.amount),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn at() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-03-01T09:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn transfer_drops_category_and_blank_description() {
        let txn = Transaction::new(
            TransactionFlow::Transfer {
                source: Uuid::new_v4(),
                destination: Uuid::new_v4(),
            },
            dec!(20),
            at(),
            Some(TransactionCategory::Shopping),
            Some("   ".into()),
        );
        assert_eq!(txn.category, None);
        assert_eq!(txn.description, None);
        assert_eq!(txn.net_flow(), Decimal::ZERO);
    }

    #[test]
    fn delta_for_follows_direction() {
        let (source, destination, other) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let transfer = Transaction::new(
            TransactionFlow::Transfer {
                source,
                destination,
            },
            dec!(7.25),
            at(),
            None,
            None,
        );
        assert_eq!(transfer.delta_for(source), dec!(-7.25));
        assert_eq!(transfer.delta_for(destination), dec!(7.25));
        assert_eq!(transfer.delta_for(other), Decimal::ZERO);

        let expense = Transaction::new(
            TransactionFlow::Expense { account: other },
            dec!(3),
            at(),
            Some(TransactionCategory::FoodDrinks),
            Some("lunch".into()),
        );
        assert_eq!(expense.delta_for(other), dec!(-3));
        assert_eq!(expense.display_label(), "Expense 3 (Food & Drinks)");
    }

    #[test]
    fn category_parses_from_display_name() {
        assert_eq!(
            "food & drinks".parse::<TransactionCategory>(),
            Ok(TransactionCategory::FoodDrinks)
        );
        assert_eq!(
            "LifeEntertainment".parse::<TransactionCategory>(),
            Ok(TransactionCategory::LifeEntertainment)
        );
        assert_eq!("transfer".parse::<TransactionKind>(), Ok(TransactionKind::Transfer));
    }
}
