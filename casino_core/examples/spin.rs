use casino_core::{EngineParams, Preset, Session};

fn main() {
    // Example session: fixed seed, default warm-up, rare-jackpot table
    let preset = Preset::RareJackpot;
    let mut session = Session::new(1, EngineParams::new(preset.table(), preset.fallback()));
    for outcome in session.spin_many(5) {
        println!(
            "play={} symbol={} payout={} rounds={} steps={}",
            outcome.play,
            outcome.entry.symbol,
            outcome.entry.payout,
            outcome.plan.full_rounds,
            outcome.plan.total_steps
        );
    }
    println!("balance={}", session.stats().balance);
}
