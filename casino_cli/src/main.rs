use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{info, warn};

use casino_core::{
    transcript_digest, EngineParams, FallbackPolicy, OutcomeTable, Preset, Session, SessionStats,
    SpinOutcome, Symbol, TableConfig, DEFAULT_STAKE, DEFAULT_WARMUP, DEFAULT_WEIGHT_TOLERANCE,
};

#[derive(Parser)]
#[command(name = "casino", about = "Seeded slot machine simulator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Generator seed, defaults to the wall clock in milliseconds truncated to 32 bits
    #[arg(long, global = true, env = "CASINO_SEED")]
    seed: Option<u32>,
    /// Draws discarded after seeding
    #[arg(long, global = true, env = "CASINO_WARMUP", default_value_t = DEFAULT_WARMUP)]
    warmup: usize,
    /// `standard`, `rare-jackpot`, or a path to a JSON table
    #[arg(long, global = true, env = "CASINO_TABLE", default_value = "standard")]
    table: TableSource,
    /// Overrides the fallback policy of the preset or table file
    #[arg(long, global = true, env = "CASINO_FALLBACK", value_enum)]
    fallback: Option<FallbackArg>,
    /// Cost of one play
    #[arg(long, global = true, env = "CASINO_STAKE", default_value_t = DEFAULT_STAKE)]
    stake: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Play spins one by one and show where the pointer lands
    Spin {
        #[arg(long, default_value_t = 1)]
        count: usize,
    },
    /// Play many spins and report return to player
    Simulate {
        #[arg(long, default_value_t = 100_000)]
        spins: usize,
    },
    /// Export spins to CSV path
    ExportCsv {
        path: PathBuf,
        #[arg(long, default_value_t = 1_000)]
        spins: usize,
    },
    /// SHA-256 of the next N draws after warm-up
    Fingerprint {
        #[arg(long, default_value_t = 10_000)]
        draws: usize,
    },
    /// Report how far the table weights are from summing to 1.0
    CheckTable,
}

#[derive(Clone, Copy, ValueEnum)]
enum FallbackArg {
    LastEntry,
    ZeroPayout,
}

impl From<FallbackArg> for FallbackPolicy {
    fn from(arg: FallbackArg) -> Self {
        match arg {
            FallbackArg::LastEntry => FallbackPolicy::LastEntry,
            FallbackArg::ZeroPayout => FallbackPolicy::ZeroPayout,
        }
    }
}

#[derive(Clone, Debug)]
enum TableSource {
    Preset(Preset),
    File(PathBuf),
}

impl FromStr for TableSource {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "standard" => TableSource::Preset(Preset::Standard),
            "rare-jackpot" => TableSource::Preset(Preset::RareJackpot),
            path => TableSource::File(PathBuf::from(path)),
        })
    }
}

impl TableSource {
    fn load(&self) -> anyhow::Result<TableConfig> {
        match self {
            TableSource::Preset(p) => Ok(p.config()),
            TableSource::File(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("reading table {}", path.display()))?;
                TableConfig::from_json_str(&json)
                    .with_context(|| format!("parsing table {}", path.display()))
            }
        }
    }
}

#[derive(Serialize)]
struct SpinRow {
    play: u64,
    symbol: Symbol,
    payout: u64,
    full_rounds: u32,
    total_steps: usize,
    balance: u64,
}

fn build_session(cli: &Cli) -> anyhow::Result<Session> {
    let (table, fallback) = cli.table.load()?.resolve(cli.fallback.map(Into::into))?;
    let seed = cli
        .seed
        .unwrap_or_else(|| Utc::now().timestamp_millis() as u32);
    let mut params = EngineParams::new(table, fallback);
    params.warmup = cli.warmup;
    params.stake = cli.stake;
    Ok(Session::new(seed, params))
}

fn print_stats(stats: &SessionStats) {
    let rtp = stats
        .rtp_percent()
        .map(|r| format!("{r:.2} %"))
        .unwrap_or_else(|| "-".into());
    println!(
        "games={} stakes={} gains={} balance={} rtp={}",
        stats.games, stats.total_stakes, stats.total_gains, stats.balance, rtp
    );
}

fn describe(outcome: &SpinOutcome) -> String {
    let e = &outcome.entry;
    if e.is_win() {
        format!("won {} with {}", e.payout, e.symbol)
    } else {
        format!("nothing ({})", e.symbol)
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Spin { count } => {
            let mut session = build_session(&cli)?;
            for _ in 0..count {
                let outcome = session.spin();
                println!(
                    "#{:>4} {} after {} rounds + {} steps ({} ticks)",
                    outcome.play,
                    describe(&outcome),
                    outcome.plan.full_rounds,
                    outcome.plan.steps_to_target,
                    outcome.plan.total_steps
                );
            }
            print_stats(session.stats());
        }
        Commands::Simulate { spins } => {
            let mut session = build_session(&cli)?;
            for _ in 0..spins {
                session.spin();
            }
            let stats = session.stats();
            print_stats(stats);
            if let Some(freq) = stats.hit_frequency() {
                println!("hit frequency={:.4}", freq);
            }
            for entry in session.params().table.entries() {
                let hits = stats.hits_for(entry.symbol);
                println!(
                    "{:<14} payout={:>5} weight={:<8} hits={:>8} observed={:.6}",
                    entry.symbol.to_string(),
                    entry.payout,
                    entry.weight,
                    hits,
                    hits as f64 / stats.games.max(1) as f64
                );
            }
        }
        Commands::ExportCsv { ref path, spins } => {
            let mut session = build_session(&cli)?;
            let mut wtr = csv::Writer::from_path(path)
                .with_context(|| format!("creating {}", path.display()))?;
            for _ in 0..spins {
                let outcome = session.spin();
                wtr.serialize(SpinRow {
                    play: outcome.play,
                    symbol: outcome.entry.symbol,
                    payout: outcome.entry.payout,
                    full_rounds: outcome.plan.full_rounds,
                    total_steps: outcome.plan.total_steps,
                    balance: session.stats().balance,
                })?;
            }
            wtr.flush()?;
            info!(rows = spins, path = %path.display(), "export finished");
            println!("Exported {} rows to {}", spins, path.display());
        }
        Commands::Fingerprint { draws } => {
            let mut session = build_session(&cli)?;
            println!("{}", transcript_digest(session.rng_mut(), draws));
        }
        Commands::CheckTable => {
            let (table, fallback): (OutcomeTable, FallbackPolicy) =
                cli.table.load()?.resolve(cli.fallback.map(Into::into))?;
            let summary = table.weight_summary();
            println!(
                "entries={} total={} deviation={:e} fallback={} expected payout={:.4}",
                table.len(),
                summary.total,
                summary.deviation,
                fallback,
                table.expected_payout()
            );
            if table.check_weights(DEFAULT_WEIGHT_TOLERANCE).is_some() {
                warn!("draws above {} resolve through the fallback entry", summary.total);
            }
        }
    }

    Ok(())
}
