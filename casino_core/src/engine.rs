use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    paytable::{OutcomeEntry, OutcomeTable, DEFAULT_WEIGHT_TOLERANCE},
    rng::MersenneTwister,
    selector::{FallbackPolicy, WeightedSelector},
    stats::SessionStats,
};

/// Draws discarded right after seeding.
pub const DEFAULT_WARMUP: usize = 200;
/// Fixed cost of one play.
pub const DEFAULT_STAKE: u64 = 500;

/// Full reel rotations per spin: `floor(draw * extra_rounds) + base_rounds`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationParams {
    pub base_rounds: u32,
    pub extra_rounds: u32,
}

impl Default for RotationParams {
    fn default() -> Self {
        // 4 to 7 full rotations
        Self {
            base_rounds: 4,
            extra_rounds: 4,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EngineParams {
    pub table: OutcomeTable,
    pub selector: WeightedSelector,
    pub rotation: RotationParams,
    pub warmup: usize,
    pub stake: u64,
}

impl EngineParams {
    pub fn new(table: OutcomeTable, fallback: FallbackPolicy) -> Self {
        Self {
            table,
            selector: WeightedSelector::new(fallback),
            rotation: RotationParams::default(),
            warmup: DEFAULT_WARMUP,
            stake: DEFAULT_STAKE,
        }
    }
}

/// How the pointer travels to the selected symbol: whole turns of the reel
/// ring, then the offset from where it currently rests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinPlan {
    pub ring_len: usize,
    pub start: usize,
    pub target: usize,
    pub full_rounds: u32,
    pub steps_to_target: usize,
    pub total_steps: usize,
}

impl SpinPlan {
    pub fn new(ring_len: usize, start: usize, target: usize, full_rounds: u32) -> Self {
        let steps_to_target = (target + ring_len - start % ring_len) % ring_len;
        Self {
            ring_len,
            start,
            target,
            full_rounds,
            steps_to_target,
            total_steps: full_rounds as usize * ring_len + steps_to_target,
        }
    }

    /// Pointer position after each step; the last one is `target`.
    pub fn positions(&self) -> impl Iterator<Item = usize> + '_ {
        (1..=self.total_steps).map(move |k| (self.start + k) % self.ring_len)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpinOutcome {
    pub play: u64,
    pub entry: OutcomeEntry,
    pub plan: SpinPlan,
}

/// One draw, mapped through the selector.
pub fn draw_outcome(
    rng: &mut MersenneTwister,
    selector: &WeightedSelector,
    table: &OutcomeTable,
) -> OutcomeEntry {
    let draw = rng.extract();
    let entry = *selector.select(table, draw);
    debug!(draw, symbol = %entry.symbol, payout = entry.payout, "outcome drawn");
    entry
}

/// One draw, turned into a count of full reel rotations.
pub fn draw_animation_parameter(rng: &mut MersenneTwister, rotation: &RotationParams) -> u32 {
    let draw = rng.extract();
    (draw * rotation.extra_rounds as f64).floor() as u32 + rotation.base_rounds
}

/// A seeded generator with its table, pointer position and counters.
#[derive(Debug, Clone)]
pub struct Session {
    rng: MersenneTwister,
    params: EngineParams,
    pointer: usize,
    stats: SessionStats,
}

impl Session {
    pub fn new(seed: u32, params: EngineParams) -> Self {
        let mut rng = MersenneTwister::new(seed);
        rng.warm_up(params.warmup);
        params.table.check_weights(DEFAULT_WEIGHT_TOLERANCE);
        info!(
            seed,
            warmup = params.warmup,
            fallback = %params.selector.fallback,
            entries = params.table.len(),
            "session initialized"
        );
        Self {
            rng,
            params,
            pointer: 0,
            stats: SessionStats::default(),
        }
    }

    pub fn draw_outcome(&mut self) -> OutcomeEntry {
        draw_outcome(&mut self.rng, &self.params.selector, &self.params.table)
    }

    pub fn draw_animation_parameter(&mut self) -> u32 {
        draw_animation_parameter(&mut self.rng, &self.params.rotation)
    }

    /// One play: outcome draw, then rotation draw, always in that order.
    pub fn spin(&mut self) -> SpinOutcome {
        let entry = self.draw_outcome();
        let full_rounds = self.draw_animation_parameter();
        let target = self
            .params
            .table
            .position_of(entry.symbol)
            .unwrap_or(self.pointer); // selected entries always come from the table
        let plan = SpinPlan::new(self.params.table.len(), self.pointer, target, full_rounds);
        self.pointer = target;
        self.stats.record(&entry, self.params.stake);
        SpinOutcome {
            play: self.stats.games,
            entry,
            plan,
        }
    }

    pub fn spin_many(&mut self, count: usize) -> Vec<SpinOutcome> {
        (0..count).map(|_| self.spin()).collect()
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn params(&self) -> &EngineParams {
        &self.params
    }

    pub fn rng_mut(&mut self) -> &mut MersenneTwister {
        &mut self.rng
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paytable::Preset;
    use crate::symbols::Symbol;

    fn session(preset: Preset, seed: u32) -> Session {
        Session::new(seed, EngineParams::new(preset.table(), preset.fallback()))
    }

    #[test]
    fn test_spin_deterministic() {
        let mut a = session(Preset::Standard, 77);
        let mut b = session(Preset::Standard, 77);
        assert_eq!(a.spin_many(50), b.spin_many(50));
        assert_eq!(a.stats(), b.stats());
    }

    #[test]
    fn test_reference_session() {
        let mut s = session(Preset::RareJackpot, 1);
        let got: Vec<(Symbol, u32, usize)> = s
            .spin_many(5)
            .iter()
            .map(|o| (o.entry.symbol, o.plan.full_rounds, o.plan.total_steps))
            .collect();
        assert_eq!(
            got,
            vec![
                (Symbol::Bell, 6, 50),
                (Symbol::Bell, 4, 32),
                (Symbol::Clover, 6, 52),
                (Symbol::Bell, 5, 44),
                (Symbol::Clover, 7, 60),
            ]
        );
    }

    #[test]
    fn test_spin_uses_two_draws_in_order() {
        let mut s = session(Preset::Standard, 1);
        let mut rng = MersenneTwister::new(1);
        rng.warm_up(DEFAULT_WARMUP);
        let selector = WeightedSelector::new(FallbackPolicy::ZeroPayout);
        let entry = draw_outcome(&mut rng, &selector, &OutcomeTable::standard());
        let rounds = draw_animation_parameter(&mut rng, &RotationParams::default());

        let out = s.spin();
        assert_eq!(out.entry, entry);
        assert_eq!(out.entry.symbol, Symbol::Diamond);
        assert_eq!(out.plan.full_rounds, rounds);
        assert_eq!(out.plan.total_steps, 49);
        assert_eq!(s.rng_mut().extract(), rng.extract());
    }

    #[test]
    fn test_animation_parameter_bounds() {
        let mut rng = MersenneTwister::new(5);
        let rotation = RotationParams::default();
        for _ in 0..5000 {
            let rounds = draw_animation_parameter(&mut rng, &rotation);
            // a draw of exactly 1.0 lands one past the usual range
            assert!((4..=8).contains(&rounds));
        }
    }

    #[test]
    fn test_plan_lands_on_target() {
        let plan = SpinPlan::new(8, 6, 2, 4);
        assert_eq!(plan.steps_to_target, 4);
        assert_eq!(plan.total_steps, 36);
        let positions: Vec<usize> = plan.positions().collect();
        assert_eq!(positions.len(), 36);
        assert_eq!(positions[0], 7);
        assert_eq!(positions[1], 0);
        assert_eq!(*positions.last().unwrap(), 2);

        let same_spot = SpinPlan::new(8, 3, 3, 5);
        assert_eq!(same_spot.steps_to_target, 0);
        assert_eq!(same_spot.positions().last(), Some(3));
    }

    #[test]
    fn test_pointer_and_stats_follow_spins() {
        let mut s = session(Preset::Standard, 2024);
        for _ in 0..20 {
            let out = s.spin();
            assert_eq!(s.pointer(), out.plan.target);
            assert_eq!(
                s.params().table.entries()[s.pointer()].symbol,
                out.entry.symbol
            );
        }
        assert_eq!(s.stats().games, 20);
        assert_eq!(s.stats().total_stakes, 20 * DEFAULT_STAKE);
    }
}
