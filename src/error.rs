//! Error types shared across the crate.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for soundscape operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error for analysis, mapping and playback
#[derive(Error, Debug)]
pub enum Error {
    /// A lexicon (VAD, sentiment or emotion) could not be loaded
    #[error("lexicon error: {0}")]
    Lexicon(#[from] LexiconLoadError),

    /// The audio engine rejected a request or the device is unavailable
    #[error("audio engine error: {0}")]
    Audio(String),

    /// Configuration loading or validation error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Failure while reading a lexicon table.
///
/// Lexicons are loaded once at startup and a failure here is fatal: features
/// cannot be computed without them.
#[derive(Error, Debug)]
pub enum LexiconLoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("lexicon is empty (no header row)")]
    Empty,

    #[error("missing required column `{column}`")]
    MissingColumn { column: &'static str },

    #[error("line {line}: expected at least {expected} fields, found {found}")]
    ShortRow {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: column `{column}` is not a number: {value:?}")]
    InvalidNumber {
        line: usize,
        column: String,
        value: String,
    },

    #[error("line {line}: unknown emotion category {value:?}")]
    UnknownCategory { line: usize, value: String },
}
