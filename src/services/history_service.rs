//! Rebuilds the cumulative income/expense curve from the transaction log.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::LedgerConfig;
use crate::domain::Transaction;

/// One point of the balance chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BalancePoint {
    pub timestamp: DateTime<Utc>,
    pub balance: Decimal,
}

impl BalancePoint {
    pub fn new(timestamp: DateTime<Utc>, balance: Decimal) -> Self {
        Self { timestamp, balance }
    }
}

/// Produces `(timestamp, running total)` series for charting.
///
/// The running total starts at zero and only follows income and expense, so it
/// ignores initial balances and is not expected to match the live total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryService {
    anchor_offset: Duration,
}

impl Default for HistoryService {
    fn default() -> Self {
        Self::new(Duration::minutes(1))
    }
}

impl HistoryService {
    /// Negative offsets are treated as zero so the anchor never follows the first point.
    pub fn new(anchor_offset: Duration) -> Self {
        Self {
            anchor_offset: anchor_offset.max(Duration::zero()),
        }
    }

    pub fn from_config(config: &LedgerConfig) -> Self {
        Self::new(config.history_anchor())
    }

    pub fn anchor_offset(&self) -> Duration {
        self.anchor_offset
    }

    pub fn balance_history(&self, transactions: &[Transaction]) -> Vec<BalancePoint> {
        self.balance_history_at(transactions, Utc::now())
    }

    /// Same as [`Self::balance_history`] with an explicit clock for the empty-log point.
    pub fn balance_history_at(
        &self,
        transactions: &[Transaction],
        now: DateTime<Utc>,
    ) -> Vec<BalancePoint> {
        let mut ordered: Vec<&Transaction> = transactions.iter().collect();
        // stable: equal timestamps keep insertion order
        ordered.sort_by_key(|txn| txn.timestamp);

        let Some(first) = ordered.first() else {
            return vec![BalancePoint::new(now, Decimal::ZERO)];
        };

        let mut points = Vec::with_capacity(ordered.len() + 1);
        let anchor = first
            .timestamp
            .checked_sub_signed(self.anchor_offset)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        points.push(BalancePoint::new(anchor, Decimal::ZERO));

        let mut running = Decimal::ZERO;
        for txn in ordered {
            running += txn.net_flow();
            points.push(BalancePoint::new(txn.timestamp, running));
        }
        points
    }
}
