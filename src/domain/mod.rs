//! Value types for accounts and transactions.

pub mod account;
pub mod common;
pub mod transaction;

pub use account::{Account, AccountCategory};
pub use common::{find_by_id, DisplayName, Displayable, Identifiable};
pub use transaction::{Transaction, TransactionCategory, TransactionFlow, TransactionKind};
