use crate::symbols::Symbol;

#[derive(thiserror::Error, Debug)]
pub enum TableError {
    #[error("outcome table has no entries")]
    Empty,
    #[error("weight {weight} for {symbol} is outside [0, 1]")]
    InvalidWeight { symbol: Symbol, weight: f64 },
    #[error("symbol {0} appears more than once")]
    DuplicateSymbol(Symbol),
    #[error("table configuration names no fallback policy")]
    MissingFallback,
    #[error("invalid table json: {0}")]
    Json(#[from] serde_json::Error),
}

pub type TableResult<T> = Result<T, TableError>;
