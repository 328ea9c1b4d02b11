//! Player records and pot settlement

use serde::{Deserialize, Serialize};

use crate::bankroll::win_rate_percent;
use crate::rating::{Rating, INITIAL_RATING};

/// House fee on the pot, in basis points (2.5%)
pub const DEFAULT_FEE_BPS: u16 = 250;

/// The whole pot
pub const MAX_FEE_BPS: u16 = 10_000;

/// Running record for one participant
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub rating: Rating,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub total_wagered: u64,
    pub total_won: u64,
    pub matches_played: u32,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            rating: INITIAL_RATING,
            wins: 0,
            losses: 0,
            draws: 0,
            total_wagered: 0,
            total_won: 0,
            matches_played: 0,
        }
    }
}

impl PlayerStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_win(&mut self, wager: u64, payout: u64) {
        self.wins += 1;
        self.total_wagered += wager;
        self.total_won += payout;
        self.matches_played += 1;
    }

    pub fn record_loss(&mut self, wager: u64) {
        self.losses += 1;
        self.total_wagered += wager;
        self.matches_played += 1;
    }

    pub fn record_draw(&mut self, wager: u64) {
        self.draws += 1;
        self.total_wagered += wager;
        self.matches_played += 1;
    }

    pub fn win_rate_percent(&self) -> f64 {
        win_rate_percent(self.wins, self.losses)
    }
}

/// Split of a two-sided pot between winner and house
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub pot: u64,
    pub fee: u64,
    pub payout: u64,
}

impl Settlement {
    /// Both sides stake `wager`; the winner takes the pot minus the fee.
    /// Fees above 10 000 bps are capped at the whole pot.
    pub fn new(wager: u64, fee_bps: u16) -> Self {
        let pot = wager.saturating_mul(2);
        let bps = fee_bps.min(MAX_FEE_BPS) as u128;
        let fee = ((pot as u128) * bps / 10_000) as u64;
        Self {
            pot,
            fee,
            payout: pot - fee,
        }
    }

    /// Winner's balance change: payout less its own stake
    pub fn net_gain(&self) -> u64 {
        self.payout.saturating_sub(self.pot / 2)
    }
}
