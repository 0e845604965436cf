mod common;

use common::minutes_after_base;
use noboros_core::{
    config::LedgerConfig,
    domain::AccountCategory,
    init,
    ledger::{LedgerStore, NewTransaction, RecordingObserver},
    services::{HistoryService, SummaryService},
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[test]
fn cash_savings_walkthrough() {
    init();

    let store = LedgerStore::from_config(&LedgerConfig::default()).expect("store");
    let recorder = RecordingObserver::new();
    store.subscribe(recorder.clone());
    let cash = store.accounts()[0].clone();
    assert_eq!(cash.current_balance, Decimal::ZERO);

    store
        .add_transaction(NewTransaction::income(cash.id, dec!(100), minutes_after_base(0)))
        .unwrap();
    assert_eq!(SummaryService::account_balance(&store, cash.id), Some(dec!(100)));
    assert_eq!(SummaryService::total_balance(&store), dec!(100));

    store
        .add_transaction(NewTransaction::expense(cash.id, dec!(30), minutes_after_base(1)))
        .unwrap();
    assert_eq!(SummaryService::account_balance(&store, cash.id), Some(dec!(70)));
    assert_eq!(SummaryService::total_balance(&store), dec!(70));

    let savings = store
        .add_account("Savings", AccountCategory::Savings, Decimal::ZERO)
        .unwrap();
    store
        .add_transaction(NewTransaction::transfer(
            cash.id,
            savings.id,
            dec!(20),
            minutes_after_base(2),
        ))
        .unwrap();
    assert_eq!(SummaryService::account_balance(&store, cash.id), Some(dec!(50)));
    assert_eq!(SummaryService::account_balance(&store, savings.id), Some(dec!(20)));
    assert_eq!(SummaryService::total_balance(&store), dec!(70));

    let history = HistoryService::default().balance_history(&store.transactions());
    let balances: Vec<Decimal> = history.iter().map(|point| point.balance).collect();
    assert_eq!(balances, vec![dec!(0), dec!(100), dec!(70), dec!(70)]);

    let stats = SummaryService::statistics(&store, &HistoryService::default());
    assert_eq!(stats.total_balance, dec!(70));
    assert_eq!(stats.max_balance, dec!(100));
    assert_eq!(stats.min_balance, dec!(0));

    let dashboard = SummaryService::dashboard(&store);
    assert_eq!(dashboard.accounts.len(), 2);
    assert_eq!(dashboard.total_balance, dec!(70));

    assert_eq!(recorder.len(), 4);
    let latest = recorder.latest().expect("published snapshot");
    assert_eq!(SummaryService::dashboard_from(&latest), dashboard);
}
