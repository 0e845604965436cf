use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::LedgerConfig;
use crate::domain::{Account, AccountCategory, Transaction};
use crate::errors::{LedgerError, LedgerResult, ValidationError};

use super::observer::{publish, LedgerObserver, ObserverRegistry, Subscription};
use super::{LedgerSnapshot, NewTransaction};

/// What to do when a transaction names an account the store does not hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedReferencePolicy {
    /// Record the transaction and skip each side whose account is missing.
    /// A transfer with one missing side then changes the total balance.
    #[default]
    ApplyResolvable,
    /// Fail the whole command with [`LedgerError::UnresolvedReference`].
    Reject,
}

#[derive(Debug, Default)]
struct LedgerState {
    revision: u64,
    accounts: Vec<Account>,
    transactions: Vec<Transaction>,
}

impl LedgerState {
    fn position(&self, id: Uuid) -> Option<usize> {
        self.accounts.iter().position(|account| account.id == id)
    }

    fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            revision: self.revision,
            accounts: self.accounts.clone(),
            transactions: self.transactions.clone(),
        }
    }
}

/// Authoritative in-memory store of accounts and transactions.
///
/// Every mutation runs as one critical section over both collections and is
/// followed by a snapshot broadcast to subscribers, in mutation order.
pub struct LedgerStore {
    /// Serialises mutate-then-publish; always taken before `state`.
    publishing: Mutex<()>,
    state: RwLock<LedgerState>,
    observers: Mutex<ObserverRegistry>,
    policy: UnresolvedReferencePolicy,
}

impl Default for LedgerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerStore {
    /// Creates an empty store that applies the resolvable sides of a transaction.
    pub fn new() -> Self {
        Self::with_policy(UnresolvedReferencePolicy::default())
    }

    pub fn with_policy(policy: UnresolvedReferencePolicy) -> Self {
        Self {
            publishing: Mutex::new(()),
            state: RwLock::new(LedgerState::default()),
            observers: Mutex::new(ObserverRegistry::default()),
            policy,
        }
    }

    /// Builds the store described by `config`, seeding the starter account if enabled.
    pub fn from_config(config: &LedgerConfig) -> LedgerResult<Self> {
        let store = Self::with_policy(config.unresolved_references);
        if config.seed_default_account {
            store.add_account(
                config.default_account_name.as_str(),
                AccountCategory::Cash,
                Decimal::ZERO,
            )?;
        }
        Ok(store)
    }

    pub fn policy(&self) -> UnresolvedReferencePolicy {
        self.policy
    }

    pub fn add_account(
        &self,
        name: impl Into<String>,
        category: AccountCategory,
        initial_balance: Decimal,
    ) -> LedgerResult<Account> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyAccountName.into());
        }
        let account = Account::new(name, category, initial_balance);
        let created = account.clone();
        self.commit(move |state| {
            state.accounts.push(account);
            Ok(())
        })?;
        info!(
            account_id = %created.id,
            name = %created.name,
            category = %created.category,
            initial_balance = %created.initial_balance,
            "Account added"
        );
        Ok(created)
    }

    /// Records a transaction and applies its balance changes atomically.
    pub fn add_transaction(&self, command: NewTransaction) -> LedgerResult<Transaction> {
        let flow = command.validate()?;
        let transaction = Transaction::new(
            flow,
            command.amount,
            command.timestamp,
            command.category,
            command.description,
        );
        let policy = self.policy;

        let recorded = self.commit(|state| {
            let legs: Vec<(Uuid, Option<usize>, Decimal)> = transaction
                .legs()
                .into_iter()
                .map(|(account_id, delta)| (account_id, state.position(account_id), delta))
                .collect();

            if policy == UnresolvedReferencePolicy::Reject {
                if let Some((missing, _, _)) = legs.iter().find(|(_, index, _)| index.is_none()) {
                    return Err(LedgerError::UnresolvedReference(*missing));
                }
            }

            state.transactions.push(transaction.clone());
            for (account_id, index, delta) in legs {
                match index {
                    Some(index) => state.accounts[index].apply_delta(delta),
                    None => warn!(
                        transaction_id = %transaction.id,
                        account_id = %account_id,
                        %delta,
                        "Account not found; balance change skipped"
                    ),
                }
            }
            Ok(transaction.clone())
        })?;

        info!(
            transaction_id = %recorded.id,
            kind = %recorded.kind(),
            amount = %recorded.amount,
            "Transaction recorded"
        );
        Ok(recorded)
    }

    pub fn accounts(&self) -> Vec<Account> {
        self.state.read().accounts.clone()
    }

    pub fn transactions(&self) -> Vec<Transaction> {
        self.state.read().transactions.clone()
    }

    pub fn account(&self, id: Uuid) -> Option<Account> {
        let state = self.state.read();
        state.position(id).map(|index| state.accounts[index].clone())
    }

    /// Sum of current balances across all accounts.
    pub fn total_balance(&self) -> Decimal {
        self.state
            .read()
            .accounts
            .iter()
            .map(|account| account.current_balance)
            .sum()
    }

    pub fn revision(&self) -> u64 {
        self.state.read().revision
    }

    /// Consistent copy of both collections.
    pub fn snapshot(&self) -> LedgerSnapshot {
        self.state.read().snapshot()
    }

    pub fn subscribe<O>(&self, observer: O) -> Subscription
    where
        O: LedgerObserver + 'static,
    {
        let subscription = self.observers.lock().insert(Arc::new(observer));
        debug!(subscription = subscription.0, "Observer subscribed");
        subscription
    }

    /// Returns `false` when the subscription was already gone.
    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        self.observers.lock().remove(subscription)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.lock().len()
    }

    /// Runs `mutate` under the write lock and, when it succeeds, publishes the
    /// resulting snapshot. `mutate` must not touch state before it can no
    /// longer fail.
    ///
    /// The publishing lock is held across both steps so snapshots go out in
    /// mutation order, while callbacks run with the state and registry locks
    /// released.
    fn commit<T>(
        &self,
        mutate: impl FnOnce(&mut LedgerState) -> LedgerResult<T>,
    ) -> LedgerResult<T> {
        let _publishing = self.publishing.lock();
        let (value, snapshot) = {
            let mut state = self.state.write();
            let value = mutate(&mut *state)?;
            state.revision += 1;
            (value, Arc::new(state.snapshot()))
        };

        let observers = self.observers.lock().observers();
        debug!(
            revision = snapshot.revision,
            observers = observers.len(),
            "Publishing ledger snapshot"
        );
        publish(&observers, &snapshot);
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    #[test]
    fn failed_command_leaves_revision_untouched() {
        let store = LedgerStore::new();
        let err = store
            .add_account("  ", AccountCategory::General, dec!(0))
            .expect_err("blank name must fail");
        assert_eq!(err.as_validation(), Some(&ValidationError::EmptyAccountName));
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn reject_policy_keeps_transfer_atomic() {
        let store = LedgerStore::with_policy(UnresolvedReferencePolicy::Reject);
        let cash = store
            .add_account("Cash", AccountCategory::Cash, dec!(50))
            .unwrap();
        let ghost = Uuid::new_v4();

        let err = store
            .add_transaction(NewTransaction::transfer(cash.id, ghost, dec!(20), Utc::now()))
            .expect_err("unknown destination must fail");

        assert!(matches!(err, LedgerError::UnresolvedReference(id) if id == ghost));
        assert!(store.transactions().is_empty());
        assert_eq!(store.account(cash.id).unwrap().current_balance, dec!(50));
        assert_eq!(store.revision(), 1);
    }

    #[test]
    fn from_config_seeds_cash_account() {
        let store = LedgerStore::from_config(&LedgerConfig::default()).unwrap();
        let accounts = store.accounts();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].name, "Cash");
        assert_eq!(accounts[0].category, AccountCategory::Cash);
        assert_eq!(store.total_balance(), Decimal::ZERO);
    }
}
