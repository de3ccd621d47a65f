use saldo_core::{Flow, NormalizedTransaction};
use serde::Serialize;
use std::fmt;

/// Debit and credit row counts did not add up to the input row count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SplitInvariantWarning {
    pub total: usize,
    pub debits: usize,
    pub credits: usize,
}

impl fmt::Display for SplitInvariantWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Possible data loss: total={}, split={} (debits={}, credits={})",
            self.total,
            self.debits + self.credits,
            self.debits,
            self.credits
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct Split {
    pub debits: Vec<NormalizedTransaction>,
    pub credits: Vec<NormalizedTransaction>,
    pub mismatch: Option<SplitInvariantWarning>,
}

/// Partitions transactions by flow, preserving order within each side.
///
/// The partition is always returned; a count mismatch is logged and attached
/// to the result.
pub fn split(transactions: &[NormalizedTransaction]) -> Split {
    let (debits, credits): (Vec<_>, Vec<_>) = transactions
        .iter()
        .cloned()
        .partition(|tx| tx.flow == Flow::Debit);

    let mismatch = check_partition(transactions.len(), debits.len(), credits.len());
    if let Some(warning) = &mismatch {
        tracing::warn!(
            total = warning.total,
            debits = warning.debits,
            credits = warning.credits,
            "debit/credit split does not cover every row"
        );
    }

    Split {
        debits,
        credits,
        mismatch,
    }
}

pub fn check_partition(total: usize, debits: usize, credits: usize) -> Option<SplitInvariantWarning> {
    (debits + credits != total).then_some(SplitInvariantWarning {
        total,
        debits,
        credits,
    })
}
