// ─────────────────────────────────────────────────────────────────────
// Condensate Field Kit — Error Hierarchy
// ─────────────────────────────────────────────────────────────────────

use thiserror::Error;

/// Root error type for configuration and persistence failures.
///
/// Configuration-time variants (`UnknownToken` through `Config`) are
/// fatal for a run. The I/O variants are reported per file and never
/// abort sibling outputs.
#[derive(Error, Debug)]
pub enum CondensateError {
    /// A flag token matched no entry of its lookup table.
    #[error("unknown {kind} token '{token}'")]
    UnknownToken { kind: &'static str, token: String },

    /// A behavior list resolved to more than one distinct behavior.
    #[error("behavior must be a single value, got '{0}'")]
    AmbiguousBehavior(String),

    /// The argument vector ended before a required value.
    #[error("missing value for '{name}'")]
    MissingValue { name: String },

    /// A value could not be parsed as a number.
    #[error("invalid number for '{name}': '{value}'")]
    InvalidNumber { name: String, value: String },

    /// The grid does not tile exactly into the requested subgrids.
    #[error("grid {n_x}x{n_y} does not tile into {subgrids}x{subgrids} subgrids")]
    NonTilingGrid {
        n_x: usize,
        n_y: usize,
        subgrids: usize,
    },

    /// Halo is negative or wider than a subgrid interior.
    #[error("invalid halo size {halo}: must be in [0, {max}]")]
    InvalidHalo { halo: i64, max: usize },

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// A file requested for loading does not exist or cannot be opened.
    #[error("couldn't load {path}")]
    MissingFile { path: String },

    /// A write was attempted against an output that failed to open.
    #[error("file {name} is not open")]
    UnopenedFileWrite { name: String },

    /// Underlying I/O failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type CondensateResult<T> = Result<T, CondensateError>;
