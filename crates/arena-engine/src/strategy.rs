//! Move definitions and strategy execution

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ArenaError;
use crate::history::OpponentModel;

/// A move in Rock-Paper-Scissors
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    Rock,
    Paper,
    Scissors,
}

impl Move {
    pub const ALL: [Move; 3] = [Move::Rock, Move::Paper, Move::Scissors];

    /// The move that beats this one: Rock→Paper, Paper→Scissors, Scissors→Rock
    pub fn counter(self) -> Move {
        match self {
            Move::Rock => Move::Paper,
            Move::Paper => Move::Scissors,
            Move::Scissors => Move::Rock,
        }
    }

    pub fn beats(self, other: Move) -> bool {
        other.counter() == self
    }

    /// Position in tie-break order (lower wins ties)
    pub fn index(self) -> usize {
        match self {
            Move::Rock => 0,
            Move::Paper => 1,
            Move::Scissors => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Move::Rock => "Rock",
            Move::Paper => "Paper",
            Move::Scissors => "Scissors",
        }
    }

    fn uniform<R: Rng + ?Sized>(rng: &mut R) -> Move {
        Move::ALL[rng.random_range(0..3)]
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Wire encoding: 1=Rock, 2=Paper, 3=Scissors
impl TryFrom<u8> for Move {
    type Error = ArenaError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Move::Rock),
            2 => Ok(Move::Paper),
            3 => Ok(Move::Scissors),
            other => Err(ArenaError::InvalidMove(other.to_string())),
        }
    }
}

impl From<Move> for u8 {
    fn from(m: Move) -> u8 {
        m.index() as u8 + 1
    }
}

impl FromStr for Move {
    type Err = ArenaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rock" => Ok(Move::Rock),
            "paper" => Ok(Move::Paper),
            "scissors" => Ok(Move::Scissors),
            _ => Err(ArenaError::InvalidMove(s.to_string())),
        }
    }
}

/// A side of the coin
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoinSide {
    Heads,
    Tails,
}

impl CoinSide {
    pub fn flip(self) -> CoinSide {
        match self {
            CoinSide::Heads => CoinSide::Tails,
            CoinSide::Tails => CoinSide::Heads,
        }
    }
}

impl fmt::Display for CoinSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoinSide::Heads => f.write_str("Heads"),
            CoinSide::Tails => f.write_str("Tails"),
        }
    }
}

/// Wire encoding: 0=Heads, 1=Tails
impl TryFrom<u8> for CoinSide {
    type Error = ArenaError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(CoinSide::Heads),
            1 => Ok(CoinSide::Tails),
            other => Err(ArenaError::InvalidCoinSide(other.to_string())),
        }
    }
}

impl FromStr for CoinSide {
    type Err = ArenaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "heads" => Ok(CoinSide::Heads),
            "tails" => Ok(CoinSide::Tails),
            _ => Err(ArenaError::InvalidCoinSide(s.to_string())),
        }
    }
}

/// Base strategy type for RPS
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrategyBase {
    /// Counter the opponent's most frequent move; go one level deeper and
    /// randomize when behind. Opens with a Paper-heavy prior.
    Adaptive,
    /// Counter the most frequent of the last few moves, mixed with random
    /// and double-counter picks.
    Windowed,
    /// Uniform random choice each round.
    Uniform,
    /// Always the same move.
    Fixed(Move),
}

/// Strategy parameters for fine-tuning behavior
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyParams {
    /// Percentage chance to play a uniform move while behind (0-100)
    pub exploration: u8,
    /// Opponent moves needed before the second-order counter kicks in
    pub deep_counter_min_history: usize,
    /// Cold-start weights for Rock, Paper, Scissors (percent, sum 100)
    pub opening_weights: [u8; 3],
    /// Windowed: opponent moves needed before counter-play starts
    pub window_min_history: usize,
    /// Windowed: how many recent moves are counted
    pub window: usize,
    /// Windowed: percentage chance of playing the first-order counter
    pub window_counter: u8,
    /// Windowed: percentage chance of a uniform pick (after the counter band)
    pub window_random: u8,
}

impl Default for StrategyParams {
    fn default() -> Self {
        Self {
            exploration: 30,
            deep_counter_min_history: 2,
            opening_weights: [30, 40, 30],
            window_min_history: 3,
            window: 5,
            window_counter: 60,
            window_random: 20,
        }
    }
}

/// Complete strategy with base type and parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Strategy {
    pub base: StrategyBase,
    #[serde(default)]
    pub params: StrategyParams,
}

impl Strategy {
    /// Create a new strategy with default parameters
    pub fn new(base: StrategyBase) -> Self {
        Self {
            base,
            params: StrategyParams::default(),
        }
    }

    /// Create with custom parameters
    pub fn with_params(base: StrategyBase, params: StrategyParams) -> Self {
        Self { base, params }
    }
}

impl Default for Strategy {
    fn default() -> Self {
        Self::new(StrategyBase::Adaptive)
    }
}

/// Decision tier of the adaptive strategy.
///
/// Chosen from (history length, behind in score); the exploration override
/// is drawn separately on top of whichever tier applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tier {
    /// No observations yet: weighted opening prior
    ColdStart,
    /// counter(most common)
    Counter,
    /// counter(counter(most common))
    DeepCounter,
}

impl Tier {
    pub fn select(history_len: usize, behind: bool, params: &StrategyParams) -> Tier {
        match (history_len, behind) {
            (0, _) => Tier::ColdStart,
            (n, true) if n >= params.deep_counter_min_history => Tier::DeepCounter,
            _ => Tier::Counter,
        }
    }
}

/// Execute a strategy for one round
///
/// # Arguments
/// * `strategy` - The strategy to execute
/// * `model` - What this player has observed of its opponents
/// * `opponent` - Identity of the opponent for this round
/// * `my_score` - Round wins so far for this player
/// * `their_score` - Round wins so far for the opponent
/// * `rng` - Random source for this decision
pub fn execute_strategy<R: Rng + ?Sized>(
    strategy: &Strategy,
    model: &OpponentModel,
    opponent: &str,
    my_score: u8,
    their_score: u8,
    rng: &mut R,
) -> Move {
    match strategy.base {
        StrategyBase::Adaptive => {
            execute_adaptive(model, opponent, my_score, their_score, &strategy.params, rng)
        }
        StrategyBase::Windowed => execute_windowed(model, opponent, &strategy.params, rng),
        StrategyBase::Uniform => Move::uniform(rng),
        StrategyBase::Fixed(m) => m,
    }
}

/// Adaptive: frequency counter-play with anti-exploitation depth
fn execute_adaptive<R: Rng + ?Sized>(
    model: &OpponentModel,
    opponent: &str,
    my_score: u8,
    their_score: u8,
    params: &StrategyParams,
    rng: &mut R,
) -> Move {
    let behind = their_score > my_score;
    let freq = model.frequencies(opponent, None);
    let tier = Tier::select(freq.total(), behind, params);

    let mut choice = match tier {
        Tier::ColdStart => return opening_move(&params.opening_weights, rng),
        Tier::Counter => freq.most_common().counter(),
        Tier::DeepCounter => {
            let deeper = freq.most_common().counter().counter();
            log::debug!("going deeper against {}: {}", opponent, deeper);
            deeper
        }
    };

    if behind && rng.random_range(0..100u8) < params.exploration {
        choice = Move::uniform(rng);
        log::debug!("wildcard against {}: {}", opponent, choice);
    }

    log::debug!(
        "strategy freq=[R:{},P:{},S:{}] tier={:?} -> {}",
        freq.rock,
        freq.paper,
        freq.scissors,
        tier,
        choice
    );
    choice
}

/// Weighted opening draw: first-time opponents tend to open Rock
fn opening_move<R: Rng + ?Sized>(weights: &[u8; 3], rng: &mut R) -> Move {
    let total: u32 = weights.iter().map(|w| *w as u32).sum();
    if total == 0 {
        return Move::uniform(rng);
    }

    let mut roll = rng.random_range(0..total);
    for (m, w) in Move::ALL.iter().zip(weights.iter()) {
        if roll < *w as u32 {
            return *m;
        }
        roll -= *w as u32;
    }
    Move::Scissors
}

/// Windowed: counter the most frequent recent move most of the time
fn execute_windowed<R: Rng + ?Sized>(
    model: &OpponentModel,
    opponent: &str,
    params: &StrategyParams,
    rng: &mut R,
) -> Move {
    if model.len(opponent) < params.window_min_history {
        return Move::uniform(rng);
    }

    let target = model
        .frequencies(opponent, Some(params.window))
        .most_common();

    let roll = rng.random_range(0..100u8);
    if roll < params.window_counter {
        target.counter()
    } else if roll < params.window_counter.saturating_add(params.window_random) {
        Move::uniform(rng)
    } else {
        target.counter().counter()
    }
}

/// Coin flip strategy
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoinStrategy {
    /// 50/50 each flip.
    Random,
    /// After more than `threshold` identical results in a row, call the other side.
    StreakBreaker { threshold: u8 },
    /// Always the same side.
    Fixed(CoinSide),
}

impl Default for CoinStrategy {
    fn default() -> Self {
        CoinStrategy::StreakBreaker { threshold: 2 }
    }
}

/// Consecutive results seen by a coin flip player
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakMemory {
    pub heads: u8,
    pub tails: u8,
}

impl StreakMemory {
    pub fn record(&mut self, result: CoinSide) {
        match result {
            CoinSide::Heads => {
                self.heads = self.heads.saturating_add(1);
                self.tails = 0;
            }
            CoinSide::Tails => {
                self.tails = self.tails.saturating_add(1);
                self.heads = 0;
            }
        }
    }
}

/// Choose a side for the next flip
pub fn execute_coin_strategy<R: Rng + ?Sized>(
    strategy: &CoinStrategy,
    memory: &StreakMemory,
    rng: &mut R,
) -> CoinSide {
    match *strategy {
        CoinStrategy::Fixed(side) => side,
        CoinStrategy::StreakBreaker { threshold } if memory.heads > threshold => CoinSide::Tails,
        CoinStrategy::StreakBreaker { threshold } if memory.tails > threshold => CoinSide::Heads,
        CoinStrategy::StreakBreaker { .. } | CoinStrategy::Random => {
            if rng.random_bool(0.5) {
                CoinSide::Heads
            } else {
                CoinSide::Tails
            }
        }
    }
}

/// Get a human-readable description of a strategy
pub fn describe_strategy(strategy: &Strategy) -> String {
    let p = &strategy.params;
    match strategy.base {
        StrategyBase::Adaptive => {
            let [r, pa, s] = p.opening_weights;
            format!(
                "Counters the opponent's most frequent move. Opens R{}/P{}/S{}. \
                 When behind, counters the counter and plays a random move {}% of the time.",
                r, pa, s, p.exploration
            )
        }
        StrategyBase::Windowed => format!(
            "Counters the most frequent of the last {} moves {}% of the time, \
             random {}%, double counter otherwise.",
            p.window, p.window_counter, p.window_random
        ),
        StrategyBase::Uniform => "Plays a uniformly random move each round.".to_string(),
        StrategyBase::Fixed(m) => format!("Always plays {}.", m),
    }
}
