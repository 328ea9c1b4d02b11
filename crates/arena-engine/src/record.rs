//! Match record for external proofs
//!
//! The memo a caller attaches to an on-chain transfer as proof of a game.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::game::{CoinFlipResult, MatchResult};
use crate::{Outcome, Side};

pub const RECORD_TYPE: &str = "solarena_match";
pub const RECORD_VERSION: &str = "1.0";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameKind {
    Rps,
    Coinflip,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    #[serde(rename = "type")]
    pub record_type: String,
    pub version: String,
    pub game: GameKind,
    pub match_id: u64,
    /// Winner identity, or "draw"
    pub winner: String,
    pub score: String,
}

impl MatchRecord {
    pub fn from_rps(match_id: u64, result: &MatchResult) -> Self {
        Self {
            record_type: RECORD_TYPE.to_string(),
            version: RECORD_VERSION.to_string(),
            game: GameKind::Rps,
            match_id,
            winner: result.winner_id().to_string(),
            score: result.score_line(),
        }
    }

    pub fn from_coin_flip(
        match_id: u64,
        player_a: &str,
        player_b: &str,
        result: &CoinFlipResult,
    ) -> Self {
        let (winner, score) = match result.outcome {
            Outcome::Winner(Side::A) => (player_a.to_string(), "1-0"),
            Outcome::Winner(Side::B) => (player_b.to_string(), "0-1"),
            Outcome::Draw => ("draw".to_string(), "0-0"),
        };
        Self {
            record_type: RECORD_TYPE.to_string(),
            version: RECORD_VERSION.to_string(),
            game: GameKind::Coinflip,
            match_id,
            winner,
            score: score.to_string(),
        }
    }

    /// Serialize to the JSON memo string
    pub fn to_memo(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_memo(memo: &str) -> Result<Self> {
        Ok(serde_json::from_str(memo)?)
    }
}
