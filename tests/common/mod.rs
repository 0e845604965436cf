#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};
use noboros_core::{
    domain::{Account, AccountCategory},
    ledger::LedgerStore,
};
use rust_decimal::Decimal;

/// Fixed reference instant so history assertions stay deterministic.
pub fn base_time() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2025-01-15T09:00:00Z")
        .expect("valid timestamp")
        .with_timezone(&Utc)
}

pub fn minutes_after_base(minutes: i64) -> DateTime<Utc> {
    base_time() + Duration::minutes(minutes)
}

/// Empty store plus one Cash account at zero, mirroring a fresh install.
pub fn store_with_cash() -> (LedgerStore, Account) {
    let store = LedgerStore::new();
    let cash = store
        .add_account("Cash", AccountCategory::Cash, Decimal::ZERO)
        .expect("add cash account");
    (store, cash)
}

pub fn balance_of(store: &LedgerStore, account: &Account) -> Decimal {
    store
        .account(account.id)
        .expect("account exists")
        .current_balance
}
