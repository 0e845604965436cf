use std::{str::FromStr, sync::Arc};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::config::LedgerConfig;
use crate::domain::{
    Account, AccountCategory, DisplayName, Displayable, TransactionCategory, TransactionFlow,
    TransactionKind,
};
use crate::errors::{LedgerError, LedgerResult};
use crate::ledger::{LedgerSnapshot, LedgerStore, NewTransaction};
use crate::services::{DashboardSummary, HistoryService, SummaryService};

use super::output::{self, format_amount};

const COMMANDS: &[(&str, &str)] = &[
    ("account", "account add <name> <category> [initial]"),
    ("accounts", "List accounts with their balances"),
    ("income", "income <account> <amount> [category] [--note text] [--at rfc3339]"),
    ("expense", "expense <account> <amount> [category] [--note text] [--at rfc3339]"),
    ("transfer", "transfer <from> <to> <amount> [--note text] [--at rfc3339]"),
    ("transactions", "List recorded transactions"),
    ("balance", "Show the total balance"),
    ("history", "Show the reconstructed balance history"),
    ("stats", "Show total, lowest and highest balance"),
    ("version", "Show build information"),
    ("help", "Show this help"),
    ("exit", "Leave the shell"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),
    #[error("no account matches `{0}`")]
    UnknownAccount(String),
    #[error("{0}")]
    Parse(String),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// State shared by every command in one shell session.
pub struct ShellContext {
    store: LedgerStore,
    history: HistoryService,
    dashboard: Arc<Mutex<DashboardSummary>>,
    pub running: bool,
}

impl ShellContext {
    pub fn new(config: &LedgerConfig) -> LedgerResult<Self> {
        let store = LedgerStore::from_config(config)?;
        let dashboard = Arc::new(Mutex::new(SummaryService::dashboard(&store)));
        let published = Arc::clone(&dashboard);
        store.subscribe(move |snapshot: Arc<LedgerSnapshot>| {
            *published.lock() = SummaryService::dashboard_from(&snapshot);
        });
        Ok(Self {
            store,
            history: HistoryService::from_config(config),
            dashboard,
            running: true,
        })
    }

    pub fn store(&self) -> &LedgerStore {
        &self.store
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        COMMANDS.iter().map(|(name, _)| *name).collect()
    }

    pub fn prompt(&self) -> String {
        let total = self.dashboard.lock().total_balance;
        format!("noboros [{}]> ", total.round_dp(2))
    }

    pub fn report_error(&self, err: CommandError) {
        match err {
            CommandError::Ledger(LedgerError::Validation(inner)) => {
                output::warning(format!("Rejected: {inner}"))
            }
            other => output::error(other),
        }
    }

    pub fn dispatch(&mut self, command: &str, args: &[&str]) -> Result<LoopControl, CommandError> {
        match command {
            "account" => self.account(args),
            "accounts" => {
                self.list_accounts();
                Ok(LoopControl::Continue)
            }
            "income" => self.record(TransactionKind::Income, args),
            "expense" => self.record(TransactionKind::Expense, args),
            "transfer" => self.record(TransactionKind::Transfer, args),
            "transactions" => {
                self.list_transactions();
                Ok(LoopControl::Continue)
            }
            "balance" => {
                let total = self.dashboard.lock().total_balance;
                output::line(format!("Total balance: {}", format_amount(total)));
                Ok(LoopControl::Continue)
            }
            "history" => {
                self.show_history();
                Ok(LoopControl::Continue)
            }
            "stats" => {
                self.show_stats();
                Ok(LoopControl::Continue)
            }
            "version" => {
                output::line(format!(
                    "noboros {} ({}, {}, built {})",
                    env!("CARGO_PKG_VERSION"),
                    env!("NOBOROS_BUILD_HASH"),
                    env!("NOBOROS_BUILD_PROFILE"),
                    env!("NOBOROS_BUILD_TIMESTAMP"),
                ));
                Ok(LoopControl::Continue)
            }
            "help" | "?" => {
                output::section("Commands");
                for (name, usage) in COMMANDS {
                    output::line(format!("  {name:<13} {usage}"));
                }
                Ok(LoopControl::Continue)
            }
            "exit" | "quit" => Ok(LoopControl::Exit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }

    fn account(&mut self, args: &[&str]) -> Result<LoopControl, CommandError> {
        const USAGE: &str = "account add <name> <category> [initial]";
        let (name, category, initial) = match args {
            ["add", name, category] => (*name, *category, None),
            ["add", name, category, initial] => (*name, *category, Some(*initial)),
            _ => return Err(CommandError::Usage(USAGE)),
        };
        let category = AccountCategory::from_str(category).map_err(CommandError::Parse)?;
        let initial = initial.map(parse_amount).transpose()?.unwrap_or(Decimal::ZERO);
        let account = self.store.add_account(name, category, initial)?;
        output::success(format!(
            "Account added: {} {}",
            account.display_label(),
            format_amount(account.current_balance)
        ));
        Ok(LoopControl::Continue)
    }

    fn record(
        &mut self,
        kind: TransactionKind,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        let (positional, note, at) = split_options(args)?;
        let timestamp = at.unwrap_or_else(Utc::now);

        let command = match kind {
            TransactionKind::Transfer => {
                let [from, to, amount] = positional.as_slice() else {
                    return Err(CommandError::Usage(
                        "transfer <from> <to> <amount> [--note text] [--at rfc3339]",
                    ));
                };
                let source = self.resolve_account(from)?;
                let destination = self.resolve_account(to)?;
                NewTransaction::transfer(
                    source.id,
                    destination.id,
                    parse_amount(amount)?,
                    timestamp,
                )
            }
            _ => {
                let (account, amount, category) = match positional.as_slice() {
                    [account, amount] => (*account, *amount, None),
                    [account, amount, category] => (*account, *amount, Some(*category)),
                    _ => {
                        return Err(CommandError::Usage(
                            "income|expense <account> <amount> [category] [--note text]",
                        ))
                    }
                };
                let account = self.resolve_account(account)?;
                let mut command = NewTransaction::new(kind, parse_amount(amount)?, timestamp)
                    .with_account(account.id);
                if let Some(category) = category {
                    command = command.with_category(
                        TransactionCategory::from_str(category).map_err(CommandError::Parse)?,
                    );
                }
                command
            }
        };
        let command = match note {
            Some(note) => command.with_description(note),
            None => command,
        };

        let recorded = self.store.add_transaction(command)?;
        output::success(format!(
            "{} of {} recorded",
            recorded.kind(),
            format_amount(recorded.amount)
        ));
        Ok(LoopControl::Continue)
    }

    /// Matches a 1-based position first, then a case-insensitive name.
    fn resolve_account(&self, reference: &str) -> Result<Account, CommandError> {
        let accounts = self.store.accounts();
        if let Ok(position) = reference.parse::<usize>() {
            if let Some(account) = position.checked_sub(1).and_then(|idx| accounts.get(idx)) {
                return Ok(account.clone());
            }
        }
        accounts
            .into_iter()
            .find(|account| account.name.eq_ignore_ascii_case(reference.trim()))
            .ok_or_else(|| CommandError::UnknownAccount(reference.to_string()))
    }

    fn list_accounts(&self) {
        let dashboard = self.dashboard.lock().clone();
        output::section("Accounts");
        if dashboard.accounts.is_empty() {
            output::info("No accounts yet.");
        }
        for (idx, account) in dashboard.accounts.iter().enumerate() {
            output::line(format!(
                "{:>3}. {:<20} {:<12} {:>14}",
                idx + 1,
                account.name,
                account.category.display_name(),
                format_amount(account.current_balance)
            ));
        }
        output::line(format!("Total balance: {}", format_amount(dashboard.total_balance)));
    }

    fn list_transactions(&self) {
        let snapshot = self.store.snapshot();
        output::section("Transactions");
        if snapshot.transactions.is_empty() {
            output::info("No transactions recorded.");
            return;
        }
        let name_of = |id| {
            snapshot
                .account(id)
                .map(|account| account.name.clone())
                .unwrap_or_else(|| "<missing>".into())
        };
        for txn in &snapshot.transactions {
            let target = match txn.flow {
                TransactionFlow::Income { account } | TransactionFlow::Expense { account } => {
                    name_of(account)
                }
                TransactionFlow::Transfer {
                    source,
                    destination,
                } => format!("{} -> {}", name_of(source), name_of(destination)),
            };
            let category = txn
                .category
                .map(|category| category.display_name())
                .unwrap_or("-");
            output::line(format!(
                "{}  {:<8} {:>12}  {:<24} {:<20} {}",
                txn.timestamp.format("%Y-%m-%d %H:%M"),
                txn.kind().display_name(),
                format_amount(txn.amount),
                target,
                category,
                txn.description.as_deref().unwrap_or("")
            ));
        }
    }

    fn show_history(&self) {
        let points = self.history.balance_history(&self.store.transactions());
        output::section("Balance history");
        for point in points {
            output::line(format!(
                "{}  {:>14}",
                point.timestamp.format("%Y-%m-%d %H:%M"),
                format_amount(point.balance)
            ));
        }
    }

    fn show_stats(&self) {
        let stats = SummaryService::statistics(&self.store, &self.history);
        output::section("Statistics");
        output::line(format!("Total balance:   {}", format_amount(stats.total_balance)));
        output::line(format!("Highest balance: {}", format_amount(stats.max_balance)));
        output::line(format!("Lowest balance:  {}", format_amount(stats.min_balance)));
        output::line(format!("History points:  {}", stats.history.len()));
    }
}

type SplitArgs<'a> = (Vec<&'a str>, Option<String>, Option<DateTime<Utc>>);

fn split_options<'a>(args: &[&'a str]) -> Result<SplitArgs<'a>, CommandError> {
    let mut positional = Vec::new();
    let mut note = None;
    let mut at = None;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match *arg {
            "--note" => {
                let value = iter
                    .next()
                    .ok_or_else(|| CommandError::Parse("--note needs a value".into()))?;
                note = Some(value.to_string());
            }
            "--at" => {
                let value = iter
                    .next()
                    .ok_or_else(|| CommandError::Parse("--at needs a value".into()))?;
                let parsed = DateTime::parse_from_rfc3339(value).map_err(|err| {
                    CommandError::Parse(format!("invalid timestamp `{value}`: {err}"))
                })?;
                at = Some(parsed.with_timezone(&Utc));
            }
            other => positional.push(other),
        }
    }
    Ok((positional, note, at))
}

fn parse_amount(raw: &str) -> Result<Decimal, CommandError> {
    Decimal::from_str(raw.trim())
        .map_err(|err| CommandError::Parse(format!("invalid amount `{raw}`: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn context() -> ShellContext {
        ShellContext::new(&LedgerConfig::default()).expect("context")
    }

    #[test]
    fn split_options_extracts_note_and_timestamp() {
        let (positional, note, at) =
            split_options(&["Cash", "12", "--note", "coffee", "--at", "2024-01-02T08:00:00Z"])
                .unwrap();
        assert_eq!(positional, vec!["Cash", "12"]);
        assert_eq!(note.as_deref(), Some("coffee"));
        assert_eq!(at.unwrap().to_rfc3339(), "2024-01-02T08:00:00+00:00");
    }

    #[test]
    fn accounts_resolve_by_position_or_name() {
        let mut ctx = context();
        ctx.dispatch("account", &["add", "Savings", "savings", "5"]).unwrap();
        assert_eq!(ctx.resolve_account("2").unwrap().name, "Savings");
        assert_eq!(ctx.resolve_account("cash").unwrap().name, "Cash");
        assert!(matches!(
            ctx.resolve_account("Brokerage"),
            Err(CommandError::UnknownAccount(_))
        ));
    }

    #[test]
    fn dashboard_follows_published_snapshots() {
        let mut ctx = context();
        ctx.dispatch("income", &["Cash", "100", "income"]).unwrap();
        ctx.dispatch("expense", &["1", "30"]).unwrap();
        assert_eq!(ctx.dashboard.lock().total_balance, dec!(70));
        assert!(ctx.prompt().contains("70"));
    }

    #[test]
    fn zero_amount_surfaces_validation_error() {
        let mut ctx = context();
        let err = ctx.dispatch("income", &["Cash", "0"]).unwrap_err();
        assert!(matches!(err, CommandError::Ledger(LedgerError::Validation(_))));
        assert!(ctx.store().transactions().is_empty());
    }
}
