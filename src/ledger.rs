//! Core account ledger state machine.
//!
//! Processes lifecycle events for one revolving-credit account and maintains
//! two running balances: `credit_limit_remaining` (available credit, adjusted
//! by authorize/clear/post) and `payable_balance` (adjusted by settle and the
//! payment lifecycle). Each event appends to that transaction's history;
//! [`Ledger::summarize`] projects the pending/settled views from it.
//!
//! Every handler performs all validation reads before committing any balance
//! write, so a rejected event leaves the ledger exactly as it found it.

use crate::error::LedgerError;
use crate::event::{CreditEvent, EventType};
use crate::summary::{CreditSummary, TransactionSummary};
use log::{debug, warn};
use std::cmp::Reverse;
use std::collections::HashMap;

/// Policy switches for the ledger.
#[derive(Debug, Clone, Copy)]
pub struct LedgerConfig {
    /// Reject authorizations that exceed remaining credit. On by default;
    /// with this off, available credit may go negative from authorization.
    pub enforce_credit_limit: bool,

    /// Allow a repeated `TXN_AUTHED` / `PAYMENT_INITIATED` for a known id to
    /// discard that id's prior history and start fresh. Off by default, in
    /// which case the repeat fails with `DuplicateTransaction`.
    pub allow_reauthorization: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        LedgerConfig {
            enforce_credit_limit: true,
            allow_reauthorization: false,
        }
    }
}

/// Per-transaction lifecycle state.
///
/// Entered as `Pending` by the opening event; settle/post move it to
/// `Settled`, clear/cancel to `Voided`. No transitions leave a terminal
/// state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxnState {
    /// Opened by `TXN_AUTHED` or `PAYMENT_INITIATED`, not yet finalized.
    Pending,

    /// Finalized by `TXN_SETTLED` or `PAYMENT_POSTED`.
    Settled,

    /// Finalized by `TXN_AUTH_CLEARED` or `PAYMENT_CANCELED`.
    Voided,
}

/// One recorded event in a transaction's history.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    /// Event kind.
    pub event_type: EventType,

    /// Amount as supplied on the event, if any.
    pub amount: Option<i64>,

    /// Caller-supplied event time.
    pub event_time: i64,
}

/// Event history for one transaction id, in arrival order.
#[derive(Debug, Clone)]
pub struct TransactionHistory {
    /// Recorded events, oldest arrival first.
    pub entries: Vec<HistoryEntry>,

    /// Current lifecycle state.
    pub state: TxnState,

    /// Arrival order of the opening event; breaks summary ordering ties.
    seq: u64,
}

/// The account ledger.
///
/// Owns the two balances and per-transaction histories for a single account.
/// Callers feed events one at a time (or via [`crate::summarize_credit_events`]
/// for a full batch) and project a [`CreditSummary`] at any point.
#[derive(Debug, Clone)]
pub struct Ledger {
    /// Spending headroom remaining under the credit limit.
    credit_limit_remaining: i64,

    /// Amount currently owed and due for repayment.
    payable_balance: i64,

    /// Event histories keyed by transaction id.
    history: HashMap<String, TransactionHistory>,

    /// Next arrival sequence number.
    next_seq: u64,

    /// Policy switches.
    config: LedgerConfig,
}

impl Ledger {
    /// Creates a ledger with the given starting credit limit and default
    /// policy (credit limit enforced, re-authorization rejected).
    pub fn new(credit_limit: i64) -> Self {
        Self::with_config(credit_limit, LedgerConfig::default())
    }

    /// Creates a ledger with explicit policy switches.
    pub fn with_config(credit_limit: i64, config: LedgerConfig) -> Self {
        Ledger {
            credit_limit_remaining: credit_limit,
            payable_balance: 0,
            history: HashMap::new(),
            next_seq: 0,
            config,
        }
    }

    /// Spending headroom remaining under the credit limit.
    pub fn available_credit(&self) -> i64 {
        self.credit_limit_remaining
    }

    /// Amount currently owed and due for repayment.
    pub fn payable_balance(&self) -> i64 {
        self.payable_balance
    }

    /// Returns the recorded history for a transaction id, if any.
    pub fn transaction_history(&self, txn_id: &str) -> Option<&TransactionHistory> {
        self.history.get(txn_id)
    }

    /// Applies a single parsed event, dispatching on its kind.
    pub fn apply(&mut self, event: &CreditEvent) -> Result<(), LedgerError> {
        match event.event_type {
            EventType::TxnAuthed => {
                self.txn_authed(&event.txn_id, event.amount, event.event_time)
            }
            EventType::TxnSettled => {
                self.txn_settled(&event.txn_id, event.amount, event.event_time)
            }
            EventType::TxnAuthCleared => {
                self.txn_cleared(&event.txn_id, event.amount, event.event_time)
            }
            EventType::PaymentInitiated => {
                self.payment_initiated(&event.txn_id, event.amount, event.event_time)
            }
            EventType::PaymentPosted => self.payment_posted(&event.txn_id, event.event_time),
            EventType::PaymentCanceled => {
                self.payment_cancelled(&event.txn_id, event.event_time)
            }
        }
    }

    /// Places a hold against available credit for a new purchase.
    ///
    /// Decrements `credit_limit_remaining` by `amount` and opens a fresh
    /// history for the id.
    pub fn txn_authed(
        &mut self,
        txn_id: &str,
        amount: Option<i64>,
        event_time: i64,
    ) -> Result<(), LedgerError> {
        let amount = match amount {
            Some(a) if a != 0 => a,
            _ => {
                return Err(LedgerError::InvalidAmount {
                    txn_id: txn_id.to_string(),
                    event_type: EventType::TxnAuthed,
                })
            }
        };

        self.check_fresh_id(txn_id)?;

        if self.config.enforce_credit_limit && amount > self.credit_limit_remaining {
            return Err(LedgerError::InsufficientCredit {
                txn_id: txn_id.to_string(),
                available: self.credit_limit_remaining,
                amount,
            });
        }

        self.credit_limit_remaining -= amount;
        self.open_history(
            txn_id,
            HistoryEntry {
                event_type: EventType::TxnAuthed,
                amount: Some(amount),
                event_time,
            },
        );

        debug!("{} successfully authorized", txn_id);
        Ok(())
    }

    /// Converts a hold into an owed balance.
    ///
    /// If a truthy settlement amount differs from the authorized amount, the
    /// difference is reconciled against available credit before the payable
    /// balance is increased.
    pub fn txn_settled(
        &mut self,
        txn_id: &str,
        amount: Option<i64>,
        event_time: i64,
    ) -> Result<(), LedgerError> {
        let authed_amount =
            self.checked_prior(txn_id, EventType::TxnSettled, EventType::TxnAuthed, event_time)?;

        let settled_amount = match amount {
            Some(a) if a != 0 => a,
            _ => authed_amount,
        };

        if settled_amount != authed_amount {
            warn!(
                "{} has an updated amount from [{}] to [{}]",
                txn_id, authed_amount, settled_amount
            );
            self.credit_limit_remaining += authed_amount;
            self.credit_limit_remaining -= settled_amount;
        }

        self.payable_balance += settled_amount;
        self.finalize(
            txn_id,
            HistoryEntry {
                event_type: EventType::TxnSettled,
                amount,
                event_time,
            },
            TxnState::Settled,
        );

        debug!("{} successfully settled", txn_id);
        Ok(())
    }

    /// Voids a hold without settlement, restoring available credit.
    pub fn txn_cleared(
        &mut self,
        txn_id: &str,
        amount: Option<i64>,
        event_time: i64,
    ) -> Result<(), LedgerError> {
        let authed_amount = self.checked_prior(
            txn_id,
            EventType::TxnAuthCleared,
            EventType::TxnAuthed,
            event_time,
        )?;

        self.credit_limit_remaining += authed_amount;
        self.finalize(
            txn_id,
            HistoryEntry {
                event_type: EventType::TxnAuthCleared,
                amount,
                event_time,
            },
            TxnState::Voided,
        );

        debug!("{} successfully cleared", txn_id);
        Ok(())
    }

    /// Starts a repayment; the amount must be strictly negative.
    ///
    /// Decreases `payable_balance` by `|amount|`. Rejected as overpayment if
    /// that would drive the payable balance below zero.
    pub fn payment_initiated(
        &mut self,
        txn_id: &str,
        amount: Option<i64>,
        event_time: i64,
    ) -> Result<(), LedgerError> {
        let amount = match amount {
            Some(a) if a < 0 => a,
            _ => {
                return Err(LedgerError::InvalidAmount {
                    txn_id: txn_id.to_string(),
                    event_type: EventType::PaymentInitiated,
                })
            }
        };

        if self.payable_balance + amount < 0 {
            return Err(LedgerError::OverpaymentDetected {
                txn_id: txn_id.to_string(),
                payable_balance: self.payable_balance,
                amount,
            });
        }

        self.check_fresh_id(txn_id)?;

        self.payable_balance += amount;
        self.open_history(
            txn_id,
            HistoryEntry {
                event_type: EventType::PaymentInitiated,
                amount: Some(amount),
                event_time,
            },
        );

        debug!("{} successfully initiated", txn_id);
        Ok(())
    }

    /// Completes a repayment, freeing credit back up by the initiated amount.
    pub fn payment_posted(&mut self, txn_id: &str, event_time: i64) -> Result<(), LedgerError> {
        let initiated_amount = self.checked_prior(
            txn_id,
            EventType::PaymentPosted,
            EventType::PaymentInitiated,
            event_time,
        )?;

        self.credit_limit_remaining += initiated_amount.abs();
        self.finalize(
            txn_id,
            HistoryEntry {
                event_type: EventType::PaymentPosted,
                amount: None,
                event_time,
            },
            TxnState::Settled,
        );

        debug!("{} successfully posted", txn_id);
        Ok(())
    }

    /// Cancels an initiated repayment, reversing its payable-balance effect.
    pub fn payment_cancelled(&mut self, txn_id: &str, event_time: i64) -> Result<(), LedgerError> {
        let initiated_amount = self.checked_prior(
            txn_id,
            EventType::PaymentCanceled,
            EventType::PaymentInitiated,
            event_time,
        )?;

        self.payable_balance -= initiated_amount;
        self.finalize(
            txn_id,
            HistoryEntry {
                event_type: EventType::PaymentCanceled,
                amount: None,
                event_time,
            },
            TxnState::Voided,
        );

        debug!("{} successfully cancelled", txn_id);
        Ok(())
    }

    /// Projects the pending/settled transaction views from ledger state.
    ///
    /// For each transaction id: the init event is the first `TXN_AUTHED` or
    /// `PAYMENT_INITIATED` in arrival order (ids with no truthy init amount
    /// are skipped); the final event is a settle/post if any, else a
    /// clear/cancel. Settled transactions are those finalized by settle/post;
    /// pending ones have no final event; voided ones appear in neither list.
    /// Both lists sort by initial time descending, ties broken by arrival
    /// order. Projection has no side effects and is idempotent.
    pub fn summarize(&self) -> CreditSummary {
        let mut pending: Vec<(u64, TransactionSummary)> = Vec::new();
        let mut settled: Vec<(u64, TransactionSummary)> = Vec::new();

        for (txn_id, history) in &self.history {
            let init = history.entries.iter().find(|e| {
                matches!(
                    e.event_type,
                    EventType::TxnAuthed | EventType::PaymentInitiated
                )
            });

            let init = match init {
                Some(entry) => entry,
                None => continue,
            };
            let init_amount = match init.amount {
                Some(a) if a != 0 => a,
                _ => continue,
            };

            let last = history
                .entries
                .iter()
                .find(|e| {
                    matches!(
                        e.event_type,
                        EventType::TxnSettled | EventType::PaymentPosted
                    )
                })
                .or_else(|| {
                    history.entries.iter().find(|e| {
                        matches!(
                            e.event_type,
                            EventType::TxnAuthCleared | EventType::PaymentCanceled
                        )
                    })
                });

            let summary = TransactionSummary {
                id: txn_id.clone(),
                amount: last
                    .and_then(|e| e.amount)
                    .filter(|a| *a != 0)
                    .unwrap_or(init_amount),
                initial_time: init.event_time,
                final_time: last.map(|e| e.event_time),
            };

            match last {
                Some(entry)
                    if matches!(
                        entry.event_type,
                        EventType::TxnSettled | EventType::PaymentPosted
                    ) =>
                {
                    settled.push((history.seq, summary));
                }
                // Voided transactions appear in neither list.
                Some(_) => {}
                None => pending.push((history.seq, summary)),
            }
        }

        CreditSummary {
            available_credit: self.credit_limit_remaining,
            payable_balance: self.payable_balance,
            pending_transactions: sort_by_recency(pending),
            settled_transactions: sort_by_recency(settled),
        }
    }

    /// Rejects opening events for ids that already have history, unless
    /// re-authorization is allowed, in which case the prior history will be
    /// discarded by the caller's `open_history`.
    fn check_fresh_id(&self, txn_id: &str) -> Result<(), LedgerError> {
        if self.history.contains_key(txn_id) {
            if !self.config.allow_reauthorization {
                return Err(LedgerError::DuplicateTransaction {
                    txn_id: txn_id.to_string(),
                });
            }
            warn!("{} re-opened, prior history discarded", txn_id);
        }
        Ok(())
    }

    /// Starts a fresh history for an opening event.
    fn open_history(&mut self, txn_id: &str, entry: HistoryEntry) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.history.insert(
            txn_id.to_string(),
            TransactionHistory {
                entries: vec![entry],
                state: TxnState::Pending,
                seq,
            },
        );
    }

    /// Validation reads shared by the four finalizing handlers.
    ///
    /// Resolves the opening event of kind `prior` for `txn_id` and returns
    /// its amount. Fails if the id has no history containing that opening
    /// kind, if the transaction already left `Pending`, if `event_time`
    /// precedes the opening time, or if the opening amount was missing or
    /// zero.
    fn checked_prior(
        &self,
        txn_id: &str,
        event_type: EventType,
        prior: EventType,
        event_time: i64,
    ) -> Result<i64, LedgerError> {
        let missing_prior = || match prior {
            EventType::PaymentInitiated => LedgerError::NotInitiated {
                txn_id: txn_id.to_string(),
                event_type,
            },
            _ => LedgerError::NoPriorAuthorization {
                txn_id: txn_id.to_string(),
            },
        };

        let history = self.history.get(txn_id).ok_or_else(missing_prior)?;
        let opening = history
            .entries
            .iter()
            .find(|e| e.event_type == prior)
            .ok_or_else(missing_prior)?;

        if history.state != TxnState::Pending {
            return Err(LedgerError::AlreadyFinalized {
                txn_id: txn_id.to_string(),
                event_type,
            });
        }
        if event_time < opening.event_time {
            return Err(LedgerError::EventOutOfOrder {
                txn_id: txn_id.to_string(),
                event_type,
                event_time,
                prior_time: opening.event_time,
            });
        }
        match opening.amount {
            Some(a) if a != 0 => Ok(a),
            _ => Err(LedgerError::InvalidAmount {
                txn_id: txn_id.to_string(),
                event_type,
            }),
        }
    }

    /// Appends a finalizing entry and moves the transaction to its terminal
    /// state. Only called after `checked_prior` succeeded.
    fn finalize(&mut self, txn_id: &str, entry: HistoryEntry, state: TxnState) {
        // Safety: checked_prior verified the history exists
        let history = self
            .history
            .get_mut(txn_id)
            .expect("history exists for finalized txn");
        history.entries.push(entry);
        history.state = state;
    }
}

/// Sorts summaries most-recent-first by initial time, arrival order on ties.
fn sort_by_recency(mut items: Vec<(u64, TransactionSummary)>) -> Vec<TransactionSummary> {
    items.sort_by_key(|(seq, summary)| (Reverse(summary.initial_time), *seq));
    items.into_iter().map(|(_, summary)| summary).collect()
}
