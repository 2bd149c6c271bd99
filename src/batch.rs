//! Batch entry points: build a ledger from a full event document, project
//! once, and discard it.
//!
//! A single invalid event aborts the whole batch; no partial summary is
//! produced.

use crate::error::Result;
use crate::event::SummaryInput;
use crate::ledger::{Ledger, LedgerConfig};
use crate::summary::CreditSummary;
use log::debug;

/// Processes a full ordered event list against a fresh ledger and returns
/// the final summary.
///
/// Events are applied oldest-first in document order. The first validation
/// failure aborts with that event's error.
pub fn summarize_credit_events(input: &SummaryInput, config: LedgerConfig) -> Result<CreditSummary> {
    let mut ledger = Ledger::with_config(input.credit_limit, config);

    for record in &input.events {
        let event = record.parse()?;
        debug!(
            "processing {} for transaction {}",
            event.event_type, event.txn_id
        );
        ledger.apply(&event)?;
    }

    Ok(ledger.summarize())
}

/// JSON front door used by the CLI: parses the input document, summarizes
/// it under the default policy, and renders the text summary.
pub fn summarize_json(input_json: &str) -> Result<String> {
    let input: SummaryInput = serde_json::from_str(input_json)?;
    let summary = summarize_credit_events(&input, LedgerConfig::default())?;
    Ok(summary.render())
}
