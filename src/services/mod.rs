pub mod history_service;
pub mod summary_service;

pub use history_service::{BalancePoint, HistoryService};
pub use summary_service::{DashboardSummary, StatisticsSummary, SummaryService};
