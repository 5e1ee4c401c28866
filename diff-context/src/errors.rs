//! Crate-wide error hierarchy for diff-context.
//!
//! Goals:
//! - Single root `Error` for all fallible public functions.
//! - Expansion failures stay recoverable: callers decide whether to fall back
//!   to the unmodified patch (see [`crate::extend::extend_patch_or_original`]).
//! - Ergonomic `?` via `From` impls.

use thiserror::Error;

/// Convenient alias for crate-wide results.
pub type DiffResult<T> = Result<T, Error>;

/// Root error type for the diff-context crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Context expansion failure.
    #[error(transparent)]
    Expansion(#[from] ExpansionError),

    /// Configuration problems (bad env values, absurd window sizes).
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors raised while extending hunks with context lines.
#[derive(Debug, Error)]
pub enum ExpansionError {
    /// Header matched the grammar but a counter could not be represented.
    #[error("invalid hunk header: {0}")]
    InvalidHunkHeader(String),

    /// Integer overflow while computing line ranges.
    #[error("integer overflow")]
    Overflow,

    /// A computed line range falls outside of the file.
    #[error("line {line} is out of bounds (file has {len} lines)")]
    OutOfBounds { line: usize, len: usize },
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("{key} is too large: {value} (max {max})")]
    TooLarge {
        key: &'static str,
        value: usize,
        max: usize,
    },
}
