use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::Account;
use crate::ledger::{LedgerSnapshot, LedgerStore};

use super::history_service::{BalancePoint, HistoryService};

/// Accounts plus their combined balance, as shown on an overview screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub accounts: Vec<Account>,
    pub total_balance: Decimal,
}

/// Total balance with the reconstructed history and its extremes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatisticsSummary {
    pub total_balance: Decimal,
    pub history: Vec<BalancePoint>,
    pub min_balance: Decimal,
    pub max_balance: Decimal,
}

/// Read-only aggregate queries over the store and history series.
pub struct SummaryService;

impl SummaryService {
    pub fn total_balance(store: &LedgerStore) -> Decimal {
        store.total_balance()
    }

    /// `None` when no account has this id.
    pub fn account_balance(store: &LedgerStore, id: Uuid) -> Option<Decimal> {
        store.account(id).map(|account| account.current_balance)
    }

    /// Lowest running balance; zero for an empty series.
    pub fn min_balance(history: &[BalancePoint]) -> Decimal {
        history
            .iter()
            .map(|point| point.balance)
            .min()
            .unwrap_or(Decimal::ZERO)
    }

    /// Highest running balance; zero for an empty series.
    pub fn max_balance(history: &[BalancePoint]) -> Decimal {
        history
            .iter()
            .map(|point| point.balance)
            .max()
            .unwrap_or(Decimal::ZERO)
    }

    pub fn dashboard(store: &LedgerStore) -> DashboardSummary {
        Self::dashboard_from(&store.snapshot())
    }

    pub fn dashboard_from(snapshot: &LedgerSnapshot) -> DashboardSummary {
        DashboardSummary {
            accounts: snapshot.accounts.clone(),
            total_balance: snapshot.total_balance(),
        }
    }

    pub fn statistics(store: &LedgerStore, history: &HistoryService) -> StatisticsSummary {
        Self::statistics_from(&store.snapshot(), history)
    }

    pub fn statistics_from(
        snapshot: &LedgerSnapshot,
        history: &HistoryService,
    ) -> StatisticsSummary {
        let points = history.balance_history(&snapshot.transactions);
        StatisticsSummary {
            total_balance: snapshot.total_balance(),
            min_balance: Self::min_balance(&points),
            max_balance: Self::max_balance(&points),
            history: points,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    #[test]
    fn extremes_of_empty_series_are_zero() {
        assert_eq!(SummaryService::min_balance(&[]), Decimal::ZERO);
        assert_eq!(SummaryService::max_balance(&[]), Decimal::ZERO);
    }

    #[test]
    fn extremes_cover_negative_dips() {
        let now = Utc::now();
        let history = [
            BalancePoint::new(now, dec!(0)),
            BalancePoint::new(now, dec!(-12.5)),
            BalancePoint::new(now, dec!(40)),
        ];
        assert_eq!(SummaryService::min_balance(&history), dec!(-12.5));
        assert_eq!(SummaryService::max_balance(&history), dec!(40));
    }

    #[test]
    fn unknown_account_has_no_balance() {
        let store = LedgerStore::new();
        assert_eq!(SummaryService::account_balance(&store, Uuid::new_v4()), None);
    }
}
