use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::paytable::{OutcomeEntry, OutcomeTable};

/// What to return when a draw lands past the table's cumulative weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FallbackPolicy {
    /// The final table entry, whatever it pays.
    LastEntry,
    /// The first entry paying nothing. Falls back to the final entry when the
    /// table has no such entry.
    ZeroPayout,
}

impl FallbackPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            FallbackPolicy::LastEntry => "last-entry",
            FallbackPolicy::ZeroPayout => "zero-payout",
        }
    }
}

impl std::fmt::Display for FallbackPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cumulative-weight selector. Has no `Default`: callers always name a policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightedSelector {
    pub fallback: FallbackPolicy,
}

impl WeightedSelector {
    pub fn new(fallback: FallbackPolicy) -> Self {
        Self { fallback }
    }

    /// First entry whose running weight sum reaches `draw` (`<=`, so a draw on
    /// a boundary belongs to the earlier entry), else the fallback entry.
    pub fn select<'t>(&self, table: &'t OutcomeTable, draw: f64) -> &'t OutcomeEntry {
        let mut cumulative = 0.0;
        for entry in table.entries() {
            cumulative += entry.weight;
            if draw <= cumulative {
                return entry;
            }
        }
        self.fallback_entry(table)
    }

    pub fn fallback_entry<'t>(&self, table: &'t OutcomeTable) -> &'t OutcomeEntry {
        match self.fallback {
            FallbackPolicy::LastEntry => table.last(),
            FallbackPolicy::ZeroPayout => table.first_zero_payout().unwrap_or_else(|| {
                warn!("zero-payout fallback requested but table has no zero-payout entry");
                table.last()
            }),
        }
    }
}
