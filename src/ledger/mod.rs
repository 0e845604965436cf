//! The ledger store, its commands, and snapshot publication.

pub mod command;
pub mod observer;
pub mod snapshot;
pub mod store;

pub use command::NewTransaction;
pub use observer::{LedgerObserver, RecordingObserver, Subscription};
pub use snapshot::LedgerSnapshot;
pub use store::{LedgerStore, UnresolvedReferencePolicy};
