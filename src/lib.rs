//! # Credit Ledger
//!
//! An event-driven ledger for a single revolving-credit account. It ingests
//! a chronological stream of authorization and payment lifecycle events,
//! maintains available credit and payable balance, and projects a
//! point-in-time summary with pending and settled transaction lists.
//!
//! ## Design Principles
//!
//! - **Integer cents**: all amounts are `i64` cents; purchases positive,
//!   payments negative
//! - **Fail-fast validation**: every handler validates before mutating, so a
//!   rejected event leaves balances and history untouched
//! - **Explicit lifecycle states**: per-transaction `Pending -> Settled |
//!   Voided`, with no transitions out of a terminal state
//! - **Deterministic summaries**: lists sorted by initial time descending,
//!   arrival order on ties
//!
//! ## Example
//!
//! ```no_run
//! use credit_ledger::summarize_json;
//!
//! let input = r#"{
//!     "creditLimit": 1000,
//!     "events": [
//!         {"eventType": "TXN_AUTHED", "eventTime": 1, "txnId": "t1", "amount": 123}
//!     ]
//! }"#;
//! println!("{}", summarize_json(input).unwrap());
//! ```

pub mod batch;
pub mod error;
pub mod event;
pub mod ledger;
pub mod store;
pub mod summary;

pub use batch::{summarize_credit_events, summarize_json};
pub use error::{EngineError, LedgerError, Result};
pub use event::{CreditEvent, EventRecord, EventType, SummaryInput};
pub use ledger::{HistoryEntry, Ledger, LedgerConfig, TransactionHistory, TxnState};
pub use store::{AccountService, AccountStore, MemoryStore};
pub use summary::{CreditSummary, TransactionSummary};
