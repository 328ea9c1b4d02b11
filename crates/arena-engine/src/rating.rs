//! Elo rating updates

use serde::{Deserialize, Serialize};

pub type Rating = u32;

/// Rating assigned to a new participant
pub const INITIAL_RATING: Rating = 1200;

/// No update takes a rating below this
pub const RATING_FLOOR: Rating = 100;

pub const DEFAULT_K_FACTOR: u32 = 32;

/// How the expected score is computed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RatingModel {
    /// Standard logistic expectation `1 / (1 + 10^((opp - own) / 400))`
    #[default]
    Logistic,
    /// Integer approximation used by on-chain settlement: the rating gap is
    /// capped at 400 and the expectation is linear in it (per-mille).
    Linear,
}

/// New ratings after one match
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingUpdate {
    pub winner: Rating,
    pub loser: Rating,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingSystem {
    pub k_factor: u32,
    pub model: RatingModel,
}

impl Default for RatingSystem {
    fn default() -> Self {
        Self {
            k_factor: DEFAULT_K_FACTOR,
            model: RatingModel::Logistic,
        }
    }
}

impl RatingSystem {
    pub fn linear() -> Self {
        Self {
            model: RatingModel::Linear,
            ..Self::default()
        }
    }

    /// Expected score of `own` against `opponent`, in [0, 1]
    pub fn expected(&self, own: Rating, opponent: Rating) -> f64 {
        match self.model {
            RatingModel::Logistic => {
                let diff = opponent as f64 - own as f64;
                1.0 / (1.0 + 10f64.powf(diff / 400.0))
            }
            RatingModel::Linear => linear_expected_permille(own, opponent) as f64 / 1000.0,
        }
    }

    /// Apply a match outcome.
    ///
    /// For a decisive result the winner gains and the loser drops by the same
    /// delta, which is always at least 1. For a draw each side moves by its
    /// own `K * (0.5 - expected)`, so the higher-rated side gives up points.
    /// Any rating that decreases is held at `RATING_FLOOR`.
    pub fn update(&self, winner: Rating, loser: Rating, is_draw: bool) -> RatingUpdate {
        if is_draw {
            let winner_delta = self.draw_delta(winner, loser);
            let loser_delta = self.draw_delta(loser, winner);
            return RatingUpdate {
                winner: apply_delta(winner, winner_delta),
                loser: apply_delta(loser, loser_delta),
            };
        }

        let delta = self.decisive_delta(winner, loser);
        RatingUpdate {
            winner: winner.saturating_add(delta as Rating),
            loser: apply_delta(loser, -delta),
        }
    }

    fn decisive_delta(&self, winner: Rating, loser: Rating) -> i64 {
        let delta = match self.model {
            RatingModel::Logistic => {
                (self.k_factor as f64 * (1.0 - self.expected(winner, loser))).round() as i64
            }
            RatingModel::Linear => {
                let expected = linear_expected_permille(winner, loser);
                self.k_factor as i64 * (1000 - expected) / 1000
            }
        };
        delta.max(1)
    }

    fn draw_delta(&self, own: Rating, opponent: Rating) -> i64 {
        match self.model {
            RatingModel::Logistic => {
                (self.k_factor as f64 * (0.5 - self.expected(own, opponent))).round() as i64
            }
            RatingModel::Linear => {
                let expected = linear_expected_permille(own, opponent);
                self.k_factor as i64 * (500 - expected) / 1000
            }
        }
    }
}

/// Expected score in per-mille: 500 ± gap·500/400 with the gap capped at 400
fn linear_expected_permille(own: Rating, opponent: Rating) -> i64 {
    let own = own as i64;
    let opponent = opponent as i64;
    let diff = (own - opponent).abs().min(400);
    if own >= opponent {
        500 + diff * 500 / 400
    } else {
        500 - diff * 500 / 400
    }
}

fn apply_delta(rating: Rating, delta: i64) -> Rating {
    let shifted = rating as i64 + delta;
    // a rating already under the floor is never pushed further down
    let updated = if delta < 0 {
        shifted.max(RATING_FLOOR.min(rating) as i64)
    } else {
        shifted
    };
    updated.clamp(0, Rating::MAX as i64) as Rating
}

/// Update ratings with the default system (logistic, K = 32)
pub fn update_ratings(winner: Rating, loser: Rating, is_draw: bool) -> RatingUpdate {
    RatingSystem::default().update(winner, loser, is_draw)
}
