pub mod engine;
pub mod error;
pub mod paytable;
pub mod rng;
pub mod selector;
pub mod stats;
pub mod symbols;

pub use crate::engine::{
    draw_animation_parameter, draw_outcome, EngineParams, RotationParams, Session, SpinOutcome,
    SpinPlan, DEFAULT_STAKE, DEFAULT_WARMUP,
};
pub use crate::error::{TableError, TableResult};
pub use crate::paytable::{
    OutcomeEntry, OutcomeTable, Preset, TableConfig, WeightSummary, DEFAULT_WEIGHT_TOLERANCE,
};
pub use crate::rng::{derive_hash_hex, transcript_digest, MersenneTwister};
pub use crate::selector::{FallbackPolicy, WeightedSelector};
pub use crate::stats::SessionStats;
pub use crate::symbols::Symbol;
