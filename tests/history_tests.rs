mod common;

use chrono::Duration;
use common::{base_time, minutes_after_base, store_with_cash};
use noboros_core::{
    domain::AccountCategory,
    ledger::NewTransaction,
    services::{BalancePoint, HistoryService, SummaryService},
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[test]
fn history_has_one_point_per_transaction_plus_anchor() {
    let (store, cash) = store_with_cash();
    for (minute, amount) in [(0, dec!(5)), (10, dec!(15)), (20, dec!(25))] {
        store
            .add_transaction(NewTransaction::income(cash.id, amount, minutes_after_base(minute)))
            .unwrap();
    }

    let points = HistoryService::default().balance_history(&store.transactions());

    assert_eq!(points.len(), store.transactions().len() + 1);
    assert_eq!(
        points[0],
        BalancePoint::new(base_time() - Duration::minutes(1), Decimal::ZERO)
    );
    assert!(points
        .windows(2)
        .all(|pair| pair[0].timestamp <= pair[1].timestamp));
    assert_eq!(points.last().unwrap().balance, dec!(45));
}

#[test]
fn out_of_order_timestamps_are_sorted_before_accumulating() {
    let (store, cash) = store_with_cash();
    store
        .add_transaction(NewTransaction::expense(cash.id, dec!(30), minutes_after_base(30)))
        .unwrap();
    store
        .add_transaction(NewTransaction::income(cash.id, dec!(100), minutes_after_base(0)))
        .unwrap();

    let points = HistoryService::default().balance_history(&store.transactions());
    let balances: Vec<Decimal> = points.iter().map(|point| point.balance).collect();

    assert_eq!(balances, vec![dec!(0), dec!(100), dec!(70)]);
    assert_eq!(points[1].timestamp, minutes_after_base(0));
}

#[test]
fn equal_timestamps_keep_insertion_order() {
    let (store, cash) = store_with_cash();
    let same_instant = minutes_after_base(5);
    store
        .add_transaction(NewTransaction::expense(cash.id, dec!(8), same_instant))
        .unwrap();
    store
        .add_transaction(NewTransaction::income(cash.id, dec!(3), same_instant))
        .unwrap();

    let points = HistoryService::default().balance_history(&store.transactions());
    let balances: Vec<Decimal> = points.iter().map(|point| point.balance).collect();

    assert_eq!(balances, vec![dec!(0), dec!(-8), dec!(-5)]);
}

#[test]
fn running_total_ignores_initial_balances_and_transfers() {
    let (store, cash) = store_with_cash();
    let savings = store
        .add_account("Savings", AccountCategory::Savings, dec!(500))
        .unwrap();
    store
        .add_transaction(NewTransaction::income(cash.id, dec!(40), minutes_after_base(0)))
        .unwrap();
    store
        .add_transaction(NewTransaction::transfer(
            savings.id,
            cash.id,
            dec!(100),
            minutes_after_base(1),
        ))
        .unwrap();

    let points = HistoryService::default().balance_history(&store.transactions());

    assert_eq!(points.last().unwrap().balance, dec!(40));
    assert_eq!(store.total_balance(), dec!(540));
}

#[test]
fn empty_log_produces_single_zero_point() {
    let (store, _) = store_with_cash();
    let now = base_time();

    let points = HistoryService::default().balance_history_at(&store.transactions(), now);

    assert_eq!(points, vec![BalancePoint::new(now, Decimal::ZERO)]);
    assert_eq!(SummaryService::min_balance(&points), Decimal::ZERO);
    assert_eq!(SummaryService::max_balance(&points), Decimal::ZERO);
}

#[test]
fn history_is_recomputed_on_every_call() {
    let (store, cash) = store_with_cash();
    let service = HistoryService::default();
    store
        .add_transaction(NewTransaction::income(cash.id, dec!(1), minutes_after_base(0)))
        .unwrap();
    let first = service.balance_history(&store.transactions());

    store
        .add_transaction(NewTransaction::income(cash.id, dec!(2), minutes_after_base(1)))
        .unwrap();
    let second = service.balance_history(&store.transactions());

    assert_eq!(first.len(), 2);
    assert_eq!(second.len(), 3);
    assert_eq!(&second[..2], &first[..]);
}
