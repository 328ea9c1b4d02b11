//! Decision engine for Sol Arena
//!
//! Core logic for an adaptive agent playing best-of-three Rock-Paper-Scissors
//! and Coin Flip: opponent modeling, move selection, wager sizing and Elo
//! ratings. No network, signing or persistence happens here.
//! This crate is compiled to:
//! - Native (for the agent and the simulator)
//! - WASM (for frontend match replay)

mod agent;
mod bankroll;
mod commit;
mod error;
mod game;
mod history;
mod random;
mod rating;
mod record;
mod stats;
mod strategy;

#[cfg(feature = "wasm")]
mod wasm;

use serde::{Deserialize, Serialize};

pub use agent::Agent;
pub use bankroll::{win_rate_percent, BankrollConfig, BankrollPolicy, LAMPORTS_PER_SOL};
pub use commit::{
    generate_secret, move_commitment, resolve_flip, secret_commitment, verify_move, verify_secret,
};
pub use error::{ArenaError, Result};
pub use game::{
    play_coin_flip, play_rps_match, run_match, CoinFlipResult, Contestant, FlipContestant,
    MatchResult, MatchState, RoundResult, MAX_ROUNDS, WINS_NEEDED,
};
pub use history::{Frequencies, OpponentModel};
pub use random::SeededRng;
pub use rating::{
    update_ratings, Rating, RatingModel, RatingSystem, RatingUpdate, INITIAL_RATING, RATING_FLOOR,
};
pub use record::{GameKind, MatchRecord};
pub use stats::{PlayerStats, Settlement, DEFAULT_FEE_BPS, MAX_FEE_BPS};
pub use strategy::{
    describe_strategy, execute_coin_strategy, execute_strategy, CoinSide, CoinStrategy, Move,
    Strategy, StrategyBase, StrategyParams, StreakMemory, Tier,
};

/// One side of a two-player match
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

/// Outcome of a round, a flip, or a whole match
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Winner(Side),
    Draw,
}

/// Resolve one RPS round
pub fn resolve_round(a: Move, b: Move) -> Outcome {
    if a == b {
        Outcome::Draw
    } else if a.beats(b) {
        Outcome::Winner(Side::A)
    } else {
        Outcome::Winner(Side::B)
    }
}

/// Score a coin flip: a side wins only if it alone called the result
pub fn resolve_coin_flip(choice_a: CoinSide, choice_b: CoinSide, resolved: CoinSide) -> Outcome {
    match (choice_a == resolved, choice_b == resolved) {
        (true, false) => Outcome::Winner(Side::A),
        (false, true) => Outcome::Winner(Side::B),
        _ => Outcome::Draw,
    }
}
