//! Error types for the credit ledger.

use crate::event::EventType;
use thiserror::Error;

/// Result type alias for CLI and service operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// A single event failed validation.
///
/// Every variant is fatal to that one event only: balances and history are
/// left untouched and the caller decides whether to retry, correct, or drop.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Amount missing, zero, or of the wrong sign for the event kind
    #[error("{txn_id}: {event_type} with invalid amount")]
    InvalidAmount { txn_id: String, event_type: EventType },

    /// Authorization exceeds remaining credit (enforced-limit policy)
    #[error("{txn_id}: insufficient available credit [{available}] for transaction amount [{amount}]")]
    InsufficientCredit {
        txn_id: String,
        available: i64,
        amount: i64,
    },

    /// Settle or clear with no prior `TXN_AUTHED` for the id
    #[error("{txn_id}: no authorized transaction found")]
    NoPriorAuthorization { txn_id: String },

    /// Post or cancel with no prior `PAYMENT_INITIATED` for the id
    #[error("{txn_id}: {event_type} without being initiated")]
    NotInitiated { txn_id: String, event_type: EventType },

    /// Event time precedes the referenced prior event's time
    #[error("{txn_id}: {event_type} at time {event_time} precedes prior event at time {prior_time}")]
    EventOutOfOrder {
        txn_id: String,
        event_type: EventType,
        event_time: i64,
        prior_time: i64,
    },

    /// Payment initiation would drive payable balance below zero
    #[error("{txn_id}: over payment detected, payment of [{amount}] exceeds payable balance [{payable_balance}]")]
    OverpaymentDetected {
        txn_id: String,
        payable_balance: i64,
        amount: i64,
    },

    /// Opening event for a transaction id that already has history
    #[error("{txn_id}: transaction id already in use")]
    DuplicateTransaction { txn_id: String },

    /// Finalizing event for a transaction already settled or voided
    #[error("{txn_id}: {event_type} on an already finalized transaction")]
    AlreadyFinalized { txn_id: String, event_type: EventType },

    /// Event kind not in the closed set
    #[error("{txn_id}: unsupported event type '{event_type}'")]
    UnsupportedEventType { txn_id: String, event_type: String },
}

/// Errors that can occur at the CLI or account-service boundary.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Failed to open or read the input file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Input document is not valid JSON
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// An event failed ledger validation
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// No ledger registered for the account id
    #[error("account {0} not found")]
    AccountNotFound(String),

    /// Missing input file argument
    #[error("Missing input file argument. Usage: credit-ledger <input.json>")]
    MissingArgument,
}
