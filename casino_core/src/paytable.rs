use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{TableError, TableResult};
use crate::selector::FallbackPolicy;
use crate::symbols::Symbol;

/// Deviation of the weight sum from 1.0 tolerated before `check_weights` warns.
pub const DEFAULT_WEIGHT_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutcomeEntry {
    pub symbol: Symbol,
    pub payout: u64,
    pub weight: f64,
}

impl OutcomeEntry {
    pub const fn new(symbol: Symbol, payout: u64, weight: f64) -> Self {
        Self {
            symbol,
            payout,
            weight,
        }
    }

    pub fn is_win(&self) -> bool {
        self.payout > 0
    }
}

/// Ordered, non-empty list of outcomes. Order is significant: selection walks
/// cumulative weights front to back, and the position of a symbol here is its
/// position on the reel ring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<OutcomeEntry>", into = "Vec<OutcomeEntry>")]
pub struct OutcomeTable(Vec<OutcomeEntry>);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightSummary {
    pub total: f64,
    pub deviation: f64,
}

impl OutcomeTable {
    pub fn new(entries: Vec<OutcomeEntry>) -> TableResult<Self> {
        if entries.is_empty() {
            return Err(TableError::Empty);
        }
        for (i, e) in entries.iter().enumerate() {
            if !e.weight.is_finite() || !(0.0..=1.0).contains(&e.weight) {
                return Err(TableError::InvalidWeight {
                    symbol: e.symbol,
                    weight: e.weight,
                });
            }
            if entries[..i].iter().any(|prev| prev.symbol == e.symbol) {
                return Err(TableError::DuplicateSymbol(e.symbol));
            }
        }
        Ok(Self(entries))
    }

    /// The "500" table: frequent mid-size wins.
    pub fn standard() -> Self {
        Self(vec![
            OutcomeEntry::new(Symbol::Cherry, 200, 0.20),
            OutcomeEntry::new(Symbol::Diamond, 300, 0.15),
            OutcomeEntry::new(Symbol::Bell, 0, 0.20),
            OutcomeEntry::new(Symbol::Lemon, 100, 0.20),
            OutcomeEntry::new(Symbol::Star, 500, 0.10),
            OutcomeEntry::new(Symbol::MoneyBag, 1000, 0.03),
            OutcomeEntry::new(Symbol::Clover, 0, 0.10),
            OutcomeEntry::new(Symbol::Crown, 2000, 0.02),
        ])
    }

    /// The "100" table: mostly blanks, jackpot at one in a hundred thousand.
    pub fn rare_jackpot() -> Self {
        Self(vec![
            OutcomeEntry::new(Symbol::Cherry, 200, 0.008),
            OutcomeEntry::new(Symbol::Diamond, 300, 0.006),
            OutcomeEntry::new(Symbol::Bell, 0, 0.7),
            OutcomeEntry::new(Symbol::Lemon, 100, 0.006),
            OutcomeEntry::new(Symbol::Star, 500, 0.002),
            OutcomeEntry::new(Symbol::MoneyBag, 1000, 0.0002),
            OutcomeEntry::new(Symbol::Clover, 0, 0.27779),
            OutcomeEntry::new(Symbol::Crown, 2000, 0.00001),
        ])
    }

    pub fn entries(&self) -> &[OutcomeEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> &OutcomeEntry {
        // non-empty by construction
        &self.0[self.0.len() - 1]
    }

    pub fn first_zero_payout(&self) -> Option<&OutcomeEntry> {
        self.0.iter().find(|e| e.payout == 0)
    }

    pub fn position_of(&self, symbol: Symbol) -> Option<usize> {
        self.0.iter().position(|e| e.symbol == symbol)
    }

    /// Sum of weights in table order, i.e. the same float the selector ends on.
    pub fn weight_summary(&self) -> WeightSummary {
        let total = self.0.iter().fold(0.0, |acc, e| acc + e.weight);
        WeightSummary {
            total,
            deviation: total - 1.0,
        }
    }

    /// Warn when the weights drift further than `tolerance` from 1.0.
    /// Returns the summary only in that case; a skewed table is still usable.
    pub fn check_weights(&self, tolerance: f64) -> Option<WeightSummary> {
        let summary = self.weight_summary();
        if summary.deviation.abs() > tolerance {
            warn!(
                total = summary.total,
                deviation = summary.deviation,
                "outcome weights do not sum to 1.0; residual mass goes to the fallback entry"
            );
            Some(summary)
        } else {
            None
        }
    }

    /// Expected payout per play, ignoring residual mass.
    pub fn expected_payout(&self) -> f64 {
        self.0.iter().map(|e| e.payout as f64 * e.weight).sum()
    }
}

impl TryFrom<Vec<OutcomeEntry>> for OutcomeTable {
    type Error = TableError;

    fn try_from(entries: Vec<OutcomeEntry>) -> TableResult<Self> {
        Self::new(entries)
    }
}

impl From<OutcomeTable> for Vec<OutcomeEntry> {
    fn from(table: OutcomeTable) -> Self {
        table.0
    }
}

/// The two tables the game ships with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    Standard,
    RareJackpot,
}

impl Preset {
    pub fn table(self) -> OutcomeTable {
        match self {
            Preset::Standard => OutcomeTable::standard(),
            Preset::RareJackpot => OutcomeTable::rare_jackpot(),
        }
    }

    pub fn fallback(self) -> FallbackPolicy {
        match self {
            Preset::Standard => FallbackPolicy::ZeroPayout,
            Preset::RareJackpot => FallbackPolicy::LastEntry,
        }
    }

    pub fn config(self) -> TableConfig {
        TableConfig {
            fallback: Some(self.fallback()),
            entries: self.table(),
        }
    }
}

/// On-disk table description.
///
/// ```json
/// { "fallback": "zero-payout",
///   "entries": [{ "symbol": "cherry", "payout": 200, "weight": 0.2 }] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<FallbackPolicy>,
    pub entries: OutcomeTable,
}

impl TableConfig {
    pub fn from_json_str(json: &str) -> TableResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Pick the effective policy: an explicit override wins over the file.
    pub fn resolve(
        self,
        fallback_override: Option<FallbackPolicy>,
    ) -> TableResult<(OutcomeTable, FallbackPolicy)> {
        let fallback = fallback_override
            .or(self.fallback)
            .ok_or(TableError::MissingFallback)?;
        Ok((self.entries, fallback))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        for preset in [Preset::Standard, Preset::RareJackpot] {
            let table = preset.table();
            assert!(OutcomeTable::new(table.entries().to_vec()).is_ok());
            assert_eq!(table.len(), 8);
            assert!(table.check_weights(DEFAULT_WEIGHT_TOLERANCE).is_none());
        }
    }

    #[test]
    fn test_rejects_bad_tables() {
        assert!(matches!(OutcomeTable::new(vec![]), Err(TableError::Empty)));
        assert!(matches!(
            OutcomeTable::new(vec![OutcomeEntry::new(Symbol::Bell, 0, 1.5)]),
            Err(TableError::InvalidWeight { .. })
        ));
        assert!(matches!(
            OutcomeTable::new(vec![OutcomeEntry::new(Symbol::Bell, 0, f64::NAN)]),
            Err(TableError::InvalidWeight { .. })
        ));
        assert!(matches!(
            OutcomeTable::new(vec![
                OutcomeEntry::new(Symbol::Bell, 0, 0.5),
                OutcomeEntry::new(Symbol::Bell, 10, 0.5),
            ]),
            Err(TableError::DuplicateSymbol(Symbol::Bell))
        ));
    }

    #[test]
    fn test_weight_diagnostic() {
        let skewed = OutcomeTable::new(vec![
            OutcomeEntry::new(Symbol::Bell, 0, 0.5),
            OutcomeEntry::new(Symbol::Crown, 2000, 0.3),
        ])
        .unwrap();
        let summary = skewed.check_weights(DEFAULT_WEIGHT_TOLERANCE).unwrap();
        assert!((summary.total - 0.8).abs() < 1e-12);
        assert!((summary.deviation + 0.2).abs() < 1e-12);
        assert!(skewed.check_weights(0.25).is_none());
    }

    #[test]
    fn test_config_json() {
        let json = r#"{
            "fallback": "last-entry",
            "entries": [
                { "symbol": "bell", "payout": 0, "weight": 0.9 },
                { "symbol": "crown", "payout": 2000, "weight": 0.1 }
            ]
        }"#;
        let config = TableConfig::from_json_str(json).unwrap();
        assert_eq!(config.fallback, Some(FallbackPolicy::LastEntry));
        let (table, policy) = config.clone().resolve(None).unwrap();
        assert_eq!(policy, FallbackPolicy::LastEntry);
        assert_eq!(table.last().symbol, Symbol::Crown);
        let (_, policy) = config.resolve(Some(FallbackPolicy::ZeroPayout)).unwrap();
        assert_eq!(policy, FallbackPolicy::ZeroPayout);
    }

    #[test]
    fn test_config_json_errors() {
        let no_policy = r#"{ "entries": [{ "symbol": "bell", "payout": 0, "weight": 1.0 }] }"#;
        let config = TableConfig::from_json_str(no_policy).unwrap();
        assert!(matches!(
            config.resolve(None),
            Err(TableError::MissingFallback)
        ));
        assert!(matches!(
            TableConfig::from_json_str(r#"{ "entries": [] }"#),
            Err(TableError::Json(_))
        ));
    }

    #[test]
    fn test_preset_config_round_trips_through_json() {
        let config = Preset::RareJackpot.config();
        let json = serde_json::to_string(&config).unwrap();
        let parsed = TableConfig::from_json_str(&json).unwrap();
        assert_eq!(parsed.fallback, config.fallback);
        for (a, b) in parsed.entries.entries().iter().zip(config.entries.entries()) {
            assert_eq!((a.symbol, a.payout), (b.symbol, b.payout));
            assert!((a.weight - b.weight).abs() < 1e-15);
        }
    }
}
