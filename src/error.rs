// File: src/error.rs
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, FreqError>;

/// A malformed snapshot. Every variant carries the 1-based line number.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("line {line}: key {key:?} is not exactly one character")]
    KeyNotSingleChar { line: usize, key: String },

    #[error("line {line}: count `{raw}` is not a non-negative integer")]
    InvalidCount { line: usize, raw: String },

    #[error("line {line}: count `{raw}` for '{character}' is negative")]
    NegativeCount {
        line: usize,
        character: char,
        raw: String,
    },

    #[error("line {line}: '{character}' appears more than once")]
    DuplicateCharacter { line: usize, character: char },
}

impl ParseError {
    pub fn line(&self) -> usize {
        match self {
            ParseError::Syntax { line, .. }
            | ParseError::KeyNotSingleChar { line, .. }
            | ParseError::InvalidCount { line, .. }
            | ParseError::NegativeCount { line, .. }
            | ParseError::DuplicateCharacter { line, .. } => *line,
        }
    }
}

/// Text the character counter cannot make sense of.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CountError {
    #[error("line {line}: `x` outside the `xizi` placeholder")]
    StrayX { line: usize },

    #[error("line {line}: unmatched `{found}`")]
    UnmatchedGuillemet { line: usize, found: char },
}

/// An incoming snapshot reported a lower count than the one already held.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "count for '{character}' went down from {existing} to {incoming} \
     ({total} regressed character(s)); snapshots are probably out of order"
)]
pub struct RegressionError {
    pub character: char,
    pub existing: u64,
    pub incoming: u64,
    /// How many characters regressed in the rejected merge.
    pub total: usize,
}

#[derive(Error, Debug)]
pub enum FreqError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("{path}: {source}")]
    Count {
        path: PathBuf,
        #[source]
        source: CountError,
    },

    #[error(transparent)]
    Regression(#[from] RegressionError),

    #[error("Binary cache error: {0}")]
    Bincode(#[from] bincode::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("No snapshots to load")]
    NoSnapshots,
}
