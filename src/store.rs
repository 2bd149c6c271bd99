//! Account repository interface and multi-account service.
//!
//! The ledger itself is single-account and storage-agnostic; this module
//! supplies the seam for callers that hold many ledgers keyed by account id.
//! One writer per account id at a time; a `summarize` read must not run
//! concurrently with a mutating event for the same account.

use crate::error::{EngineError, Result};
use crate::event::CreditEvent;
use crate::ledger::{Ledger, LedgerConfig};
use crate::summary::CreditSummary;
use std::collections::HashMap;

/// Repository of per-account ledgers.
pub trait AccountStore {
    /// Returns the ledger for an account, if one is registered.
    fn get(&self, account_id: &str) -> Option<&Ledger>;

    /// Mutable access to the ledger for an account.
    fn get_mut(&mut self, account_id: &str) -> Option<&mut Ledger>;

    /// Registers or replaces the ledger for an account.
    fn put(&mut self, account_id: &str, ledger: Ledger);
}

/// In-memory store backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    accounts: HashMap<String, Ledger>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl AccountStore for MemoryStore {
    fn get(&self, account_id: &str) -> Option<&Ledger> {
        self.accounts.get(account_id)
    }

    fn get_mut(&mut self, account_id: &str) -> Option<&mut Ledger> {
        self.accounts.get_mut(account_id)
    }

    fn put(&mut self, account_id: &str, ledger: Ledger) {
        self.accounts.insert(account_id.to_string(), ledger);
    }
}

/// Routes events to per-account ledgers held in an injected store.
pub struct AccountService<S: AccountStore> {
    store: S,
    config: LedgerConfig,
}

impl<S: AccountStore> AccountService<S> {
    /// Creates a service over the given store with default ledger policy.
    pub fn new(store: S) -> Self {
        Self::with_config(store, LedgerConfig::default())
    }

    /// Creates a service with explicit ledger policy for new accounts.
    pub fn with_config(store: S, config: LedgerConfig) -> Self {
        AccountService { store, config }
    }

    /// Opens (or resets) an account with the given starting credit limit.
    pub fn open_account(&mut self, account_id: &str, credit_limit: i64) {
        self.store
            .put(account_id, Ledger::with_config(credit_limit, self.config));
    }

    /// Applies one event to the owning account's ledger.
    pub fn apply(&mut self, account_id: &str, event: &CreditEvent) -> Result<()> {
        let ledger = self
            .store
            .get_mut(account_id)
            .ok_or_else(|| EngineError::AccountNotFound(account_id.to_string()))?;
        ledger.apply(event)?;
        Ok(())
    }

    /// Projects the current summary for an account.
    pub fn summary(&self, account_id: &str) -> Result<CreditSummary> {
        let ledger = self
            .store
            .get(account_id)
            .ok_or_else(|| EngineError::AccountNotFound(account_id.to_string()))?;
        Ok(ledger.summarize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LedgerError;
    use crate::event::EventType;

    fn event(txn_id: &str, event_type: EventType, amount: Option<i64>, time: i64) -> CreditEvent {
        CreditEvent {
            txn_id: txn_id.to_string(),
            event_type,
            event_time: time,
            amount,
        }
    }

    #[test]
    fn test_apply_and_summarize_per_account() {
        let mut service = AccountService::new(MemoryStore::new());
        service.open_account("acct-1", 1000);
        service.open_account("acct-2", 2000);

        service
            .apply("acct-1", &event("t1", EventType::TxnAuthed, Some(100), 1))
            .unwrap();
        service
            .apply("acct-2", &event("t2", EventType::TxnAuthed, Some(500), 1))
            .unwrap();

        let first = service.summary("acct-1").unwrap();
        assert_eq!(first.available_credit, 900);
        assert_eq!(first.pending_transactions.len(), 1);

        let second = service.summary("acct-2").unwrap();
        assert_eq!(second.available_credit, 1500);
    }

    #[test]
    fn test_unknown_account_fails() {
        let mut service = AccountService::new(MemoryStore::new());

        let err = service
            .apply("ghost", &event("t1", EventType::TxnAuthed, Some(100), 1))
            .unwrap_err();
        assert!(matches!(err, EngineError::AccountNotFound(_)));

        let err = service.summary("ghost").unwrap_err();
        assert!(matches!(err, EngineError::AccountNotFound(_)));
    }

    #[test]
    fn test_credit_limit_enforced_through_service() {
        let mut service = AccountService::new(MemoryStore::new());
        service.open_account("acct-1", 1000);

        let err = service
            .apply("acct-1", &event("t1", EventType::TxnAuthed, Some(1500), 1))
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Ledger(LedgerError::InsufficientCredit { .. })
        ));
        assert_eq!(service.summary("acct-1").unwrap().available_credit, 1000);
    }

    #[test]
    fn test_reopening_account_resets_ledger() {
        let mut service = AccountService::new(MemoryStore::new());
        service.open_account("acct-1", 1000);
        service
            .apply("acct-1", &event("t1", EventType::TxnAuthed, Some(100), 1))
            .unwrap();

        service.open_account("acct-1", 500);
        let summary = service.summary("acct-1").unwrap();
        assert_eq!(summary.available_credit, 500);
        assert!(summary.pending_transactions.is_empty());
    }
}
