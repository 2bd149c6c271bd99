//! Credit summary types and text rendering.
//!
//! The text format is a fixed contract consumed by downstream tooling:
//!
//! ```text
//! Available credit: $<int>
//! Payable balance: $<int>
//!
//! Pending transactions:
//! <txnId>: $<amount> @ time <initialTime>
//!
//! Settled transactions:
//! <txnId>: $<amount> @ time <initialTime> (finalized @ time <finalTime>)
//! ```
//!
//! Negative amounts render as `-$<abs>`.

use serde::Serialize;
use std::fmt::Write;

/// One transaction as it appears in the pending or settled list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSummary {
    /// Transaction id.
    pub id: String,

    /// Final amount if the finalizing event carried one, else the opening
    /// amount.
    pub amount: i64,

    /// Time of the opening event.
    pub initial_time: i64,

    /// Time of the finalizing event, absent while pending.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_time: Option<i64>,
}

/// Point-in-time view of one account, derived by [`crate::Ledger::summarize`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditSummary {
    /// Spending headroom remaining under the credit limit.
    pub available_credit: i64,

    /// Amount currently owed and due for repayment.
    pub payable_balance: i64,

    /// Open transactions, most recent initial time first.
    pub pending_transactions: Vec<TransactionSummary>,

    /// Finalized transactions, most recent initial time first.
    pub settled_transactions: Vec<TransactionSummary>,
}

impl CreditSummary {
    /// Renders the summary in the fixed text format, without a trailing
    /// newline.
    pub fn render(&self) -> String {
        let mut out = String::new();

        // write! to a String cannot fail
        let _ = write!(
            out,
            "Available credit: {}\nPayable balance: {}\n\nPending transactions:\n",
            format_dollars(self.available_credit),
            format_dollars(self.payable_balance)
        );

        for txn in &self.pending_transactions {
            let _ = writeln!(
                out,
                "{}: {} @ time {}",
                txn.id,
                format_dollars(txn.amount),
                txn.initial_time
            );
        }

        out.push_str("\nSettled transactions:\n");
        for txn in &self.settled_transactions {
            let _ = write!(
                out,
                "{}: {} @ time {}",
                txn.id,
                format_dollars(txn.amount),
                txn.initial_time
            );
            if let Some(final_time) = txn.final_time {
                let _ = write!(out, " (finalized @ time {})", final_time);
            }
            out.push('\n');
        }

        out.trim().to_string()
    }
}

/// Formats an integer dollar amount; negatives render as `-$<abs>`.
fn format_dollars(amount: i64) -> String {
    if amount < 0 {
        format!("-${}", amount.unsigned_abs())
    } else {
        format!("${}", amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_dollars() {
        assert_eq!(format_dollars(0), "$0");
        assert_eq!(format_dollars(123), "$123");
        assert_eq!(format_dollars(-45), "-$45");
    }

    #[test]
    fn test_render_empty_lists() {
        let summary = CreditSummary {
            available_credit: 500,
            payable_balance: 0,
            pending_transactions: vec![],
            settled_transactions: vec![],
        };

        assert_eq!(
            summary.render(),
            "Available credit: $500\nPayable balance: $0\n\nPending transactions:\n\nSettled transactions:"
        );
    }

    #[test]
    fn test_render_pending_and_settled() {
        let summary = CreditSummary {
            available_credit: 850,
            payable_balance: 100,
            pending_transactions: vec![TransactionSummary {
                id: "t2".to_string(),
                amount: 50,
                initial_time: 3,
                final_time: None,
            }],
            settled_transactions: vec![TransactionSummary {
                id: "t1".to_string(),
                amount: 100,
                initial_time: 1,
                final_time: Some(2),
            }],
        };

        assert_eq!(
            summary.render(),
            "Available credit: $850\nPayable balance: $100\n\n\
             Pending transactions:\nt2: $50 @ time 3\n\n\
             Settled transactions:\nt1: $100 @ time 1 (finalized @ time 2)"
        );
    }

    #[test]
    fn test_render_negative_payment_amount() {
        let summary = CreditSummary {
            available_credit: 1000,
            payable_balance: 0,
            pending_transactions: vec![],
            settled_transactions: vec![TransactionSummary {
                id: "p1".to_string(),
                amount: -100,
                initial_time: 3,
                final_time: Some(4),
            }],
        };

        assert!(summary
            .render()
            .contains("p1: -$100 @ time 3 (finalized @ time 4)"));
    }

    #[test]
    fn test_serializes_camel_case() {
        let summary = CreditSummary {
            available_credit: 900,
            payable_balance: 100,
            pending_transactions: vec![],
            settled_transactions: vec![TransactionSummary {
                id: "t1".to_string(),
                amount: 100,
                initial_time: 1,
                final_time: Some(2),
            }],
        };

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["availableCredit"], 900);
        assert_eq!(json["payableBalance"], 100);
        assert_eq!(json["settledTransactions"][0]["finalTime"], 2);
    }
}
