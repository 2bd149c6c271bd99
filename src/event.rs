//! Event models for JSON parsing and internal representation.

use crate::error::LedgerError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle event kinds for purchases and payments.
///
/// The purchase lifecycle is authorize -> settle (or clear); the payment
/// lifecycle is initiate -> post (or cancel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventType {
    /// A hold placed against available credit for a pending purchase.
    #[serde(rename = "TXN_AUTHED")]
    TxnAuthed,

    /// Conversion of a hold into an actual owed balance.
    #[serde(rename = "TXN_SETTLED")]
    TxnSettled,

    /// Cancellation/expiry of a hold without settlement.
    #[serde(rename = "TXN_AUTH_CLEARED")]
    TxnAuthCleared,

    /// Start of a repayment; reduces payable balance.
    #[serde(rename = "PAYMENT_INITIATED")]
    PaymentInitiated,

    /// Completion of a repayment; frees credit back up.
    #[serde(rename = "PAYMENT_POSTED")]
    PaymentPosted,

    /// Cancellation of an initiated repayment.
    #[serde(rename = "PAYMENT_CANCELED")]
    PaymentCanceled,
}

impl EventType {
    /// Wire name of the event kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::TxnAuthed => "TXN_AUTHED",
            EventType::TxnSettled => "TXN_SETTLED",
            EventType::TxnAuthCleared => "TXN_AUTH_CLEARED",
            EventType::PaymentInitiated => "PAYMENT_INITIATED",
            EventType::PaymentPosted => "PAYMENT_POSTED",
            EventType::PaymentCanceled => "PAYMENT_CANCELED",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw event record as read from JSON.
///
/// The event type is kept as a string so that unknown kinds surface as
/// [`LedgerError::UnsupportedEventType`] instead of a deserializer error.
/// Amounts are integer cents; positive for purchases, negative for payments.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    /// Event kind: one of the six wire names.
    pub event_type: String,

    /// Caller-supplied monotonic clock, in seconds.
    pub event_time: i64,

    /// Transaction this event belongs to.
    pub txn_id: String,

    /// Amount in cents (present for authed/settled/initiated, usually
    /// absent for posted/cancelled/cleared).
    #[serde(default)]
    pub amount: Option<i64>,
}

impl EventRecord {
    /// Parses the raw record into a typed event.
    pub fn parse(&self) -> Result<CreditEvent, LedgerError> {
        let event_type = match self.event_type.trim() {
            "TXN_AUTHED" => EventType::TxnAuthed,
            "TXN_SETTLED" => EventType::TxnSettled,
            "TXN_AUTH_CLEARED" => EventType::TxnAuthCleared,
            "PAYMENT_INITIATED" => EventType::PaymentInitiated,
            "PAYMENT_POSTED" => EventType::PaymentPosted,
            "PAYMENT_CANCELED" => EventType::PaymentCanceled,
            other => {
                return Err(LedgerError::UnsupportedEventType {
                    txn_id: self.txn_id.clone(),
                    event_type: other.to_string(),
                })
            }
        };

        Ok(CreditEvent {
            txn_id: self.txn_id.clone(),
            event_type,
            event_time: self.event_time,
            amount: self.amount,
        })
    }
}

/// A parsed lifecycle event ready for processing.
#[derive(Debug, Clone)]
pub struct CreditEvent {
    /// Transaction this event belongs to.
    pub txn_id: String,

    /// Event kind.
    pub event_type: EventType,

    /// Caller-supplied monotonic clock, in seconds.
    pub event_time: i64,

    /// Amount in cents, if the event carries one.
    pub amount: Option<i64>,
}

/// Batch input document: a starting credit limit plus an ordered event list.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryInput {
    /// Starting credit limit in cents.
    pub credit_limit: i64,

    /// Events in chronological (oldest-first) order.
    pub events: Vec<EventRecord>,
}
