//! Error type for the decision engine
//!
//! The engine performs no I/O, so the only failures are malformed inputs
//! coming from the caller and the draw-loop guard in the match engine.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArenaError {
    #[error("invalid move: {0} (expected 1=Rock, 2=Paper, 3=Scissors)")]
    InvalidMove(String),

    #[error("invalid coin side: {0} (expected 0=Heads, 1=Tails)")]
    InvalidCoinSide(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("match undecided after {rounds} rounds")]
    RoundLimit { rounds: u32 },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ArenaError>;
