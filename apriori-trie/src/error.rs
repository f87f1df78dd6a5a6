//! Errors raised by the mining pipeline and its I/O collaborators.

use crate::apriori::MiningPhase;

#[derive(Debug, thiserror::Error)]
pub enum AprioriError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("item code on line {line} does not fit in a machine word")]
    ItemOverflow { line: usize },

    #[error("{name} should be in the interval (0,1], got {value}")]
    InvalidThreshold { name: &'static str, value: f64 },

    #[error("configuration error in {path}: {message}")]
    Config { path: String, message: String },

    #[error("cannot run {expected:?} work in phase {found:?}")]
    InvalidPhase {
        expected: MiningPhase,
        found: MiningPhase,
    },
}

pub type Result<T> = std::result::Result<T, AprioriError>;
