use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::paytable::OutcomeEntry;
use crate::symbols::Symbol;

/// Running counters for one session.
///
/// `balance` accumulates winnings only; stakes are tracked in `total_stakes`
/// and never deducted from it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub games: u64,
    pub wins: u64,
    pub total_stakes: u64,
    pub total_gains: u64,
    pub balance: u64,
    pub hits: BTreeMap<Symbol, u64>,
}

impl SessionStats {
    pub fn record(&mut self, entry: &OutcomeEntry, stake: u64) {
        self.games += 1;
        self.total_stakes += stake;
        self.total_gains += entry.payout;
        self.balance += entry.payout;
        if entry.is_win() {
            self.wins += 1;
        }
        *self.hits.entry(entry.symbol).or_insert(0) += 1;
    }

    /// Return to player in percent, `None` until something has been staked.
    pub fn rtp_percent(&self) -> Option<f64> {
        (self.total_stakes > 0).then(|| self.total_gains as f64 / self.total_stakes as f64 * 100.0)
    }

    pub fn hit_frequency(&self) -> Option<f64> {
        (self.games > 0).then(|| self.wins as f64 / self.games as f64)
    }

    pub fn hits_for(&self, symbol: Symbol) -> u64 {
        self.hits.get(&symbol).copied().unwrap_or(0)
    }
}
