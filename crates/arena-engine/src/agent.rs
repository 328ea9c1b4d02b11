//! Agent facade
//!
//! Owns everything one agent carries through a session: its opponent
//! model, bankroll policy, rating system, record and random source. The
//! caller (the I/O layer) drives it with balances, observed moves and
//! outcomes; the agent answers with moves, wagers and updated ratings.

use rand::Rng;

use crate::bankroll::BankrollPolicy;
use crate::error::Result;
use crate::game::{
    play_coin_flip, play_rps_match, CoinFlipResult, Contestant, FlipContestant, MatchResult,
};
use crate::history::OpponentModel;
use crate::rating::{Rating, RatingSystem, RatingUpdate};
use crate::stats::{PlayerStats, Settlement, DEFAULT_FEE_BPS, MAX_FEE_BPS};
use crate::strategy::{execute_strategy, CoinStrategy, Move, Strategy, StreakMemory};
use crate::{Outcome, Side};

pub struct Agent<R: Rng> {
    id: String,
    strategy: Strategy,
    coin_strategy: CoinStrategy,
    model: OpponentModel,
    streaks: StreakMemory,
    bankroll: BankrollPolicy,
    ratings: RatingSystem,
    stats: PlayerStats,
    balance: u64,
    fee_bps: u16,
    rng: R,
}

impl<R: Rng> Agent<R> {
    pub fn new(id: impl Into<String>, bankroll: BankrollPolicy, rng: R) -> Self {
        Self {
            id: id.into(),
            strategy: Strategy::default(),
            coin_strategy: CoinStrategy::default(),
            model: OpponentModel::new(),
            streaks: StreakMemory::default(),
            bankroll,
            ratings: RatingSystem::default(),
            stats: PlayerStats::new(),
            balance: 0,
            fee_bps: DEFAULT_FEE_BPS,
            rng,
        }
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_coin_strategy(mut self, strategy: CoinStrategy) -> Self {
        self.coin_strategy = strategy;
        self
    }

    pub fn with_rating_system(mut self, ratings: RatingSystem) -> Self {
        self.ratings = ratings;
        self
    }

    /// House fee in basis points, capped at `MAX_FEE_BPS`
    pub fn with_fee_bps(mut self, fee_bps: u16) -> Self {
        self.fee_bps = fee_bps.min(MAX_FEE_BPS);
        self
    }

    pub fn with_rating(mut self, rating: Rating) -> Self {
        self.stats.rating = rating;
        self
    }

    /// Begin a new session at `balance`; resets the stop-loss reference
    pub fn start_session(&mut self, balance: u64) {
        self.balance = balance;
        self.bankroll.start_session(balance);
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    pub fn stats(&self) -> &PlayerStats {
        &self.stats
    }

    pub fn model(&self) -> &OpponentModel {
        &self.model
    }

    pub fn bankroll(&self) -> &BankrollPolicy {
        &self.bankroll
    }

    /// Choose the next move against `opponent_id` given the current score
    pub fn decide_move(&mut self, opponent_id: &str, agent_score: u8, opponent_score: u8) -> Move {
        execute_strategy(
            &self.strategy,
            &self.model,
            opponent_id,
            agent_score,
            opponent_score,
            &mut self.rng,
        )
    }

    pub fn record_opponent_move(&mut self, opponent_id: &str, m: Move) {
        self.model.record(opponent_id, m);
    }

    pub fn compute_wager(&self, balance: u64, win_rate_percent: f64) -> u64 {
        self.bankroll.wager(balance, win_rate_percent)
    }

    /// Wager for the next match from the agent's own balance and record
    pub fn next_wager(&self) -> u64 {
        self.compute_wager(self.balance, self.stats.win_rate_percent())
    }

    pub fn update_ratings(&self, winner: Rating, loser: Rating, is_draw: bool) -> RatingUpdate {
        self.ratings.update(winner, loser, is_draw)
    }

    /// Play a best-of-three with the agent as side A
    pub fn play_rps(&mut self, opponent: &mut Contestant<'_>) -> Result<MatchResult> {
        let mut me = Contestant::new(&self.id, self.strategy, &mut self.model);
        play_rps_match(&mut me, opponent, &mut self.rng)
    }

    /// Play one coin flip with the agent as side A
    pub fn play_coin_flip(&mut self, opponent: &mut FlipContestant<'_>) -> CoinFlipResult {
        let mut me = FlipContestant {
            id: &self.id,
            strategy: self.coin_strategy,
            memory: &mut self.streaks,
        };
        play_coin_flip(&mut me, opponent, &mut self.rng)
    }

    /// Settle a match the agent played as side A.
    ///
    /// Both sides staked `wager`. The winner takes the pot less the house
    /// fee; a draw returns both stakes. Records and ratings on both sides
    /// are updated.
    pub fn settle(
        &mut self,
        outcome: Outcome,
        wager: u64,
        opponent: &mut PlayerStats,
    ) -> Settlement {
        let settlement = Settlement::new(wager, self.fee_bps);

        match outcome {
            Outcome::Winner(Side::A) => {
                self.balance = self.balance.saturating_add(settlement.net_gain());
                self.stats.record_win(wager, settlement.payout);
                opponent.record_loss(wager);
                let update = self.ratings.update(self.stats.rating, opponent.rating, false);
                self.stats.rating = update.winner;
                opponent.rating = update.loser;
            }
            Outcome::Winner(Side::B) => {
                self.balance = self.balance.saturating_sub(wager);
                self.stats.record_loss(wager);
                opponent.record_win(wager, settlement.payout);
                let update = self.ratings.update(opponent.rating, self.stats.rating, false);
                opponent.rating = update.winner;
                self.stats.rating = update.loser;
            }
            Outcome::Draw => {
                self.stats.record_draw(wager);
                opponent.record_draw(wager);
                let update = self.ratings.update(self.stats.rating, opponent.rating, true);
                self.stats.rating = update.winner;
                opponent.rating = update.loser;
            }
        }

        log::info!(
            "{} settled {:?} on {} lamports: balance {} rating {}",
            self.id,
            outcome,
            wager,
            self.balance,
            self.stats.rating
        );
        settlement
    }
}
