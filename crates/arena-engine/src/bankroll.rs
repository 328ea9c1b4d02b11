//! Wager sizing against a bankroll
//!
//! Percentage-of-bankroll sizing banded by recent win rate, with a reserve
//! that halts the session and a stop-loss that shrinks stakes once the
//! session is down 30%.

use serde::{Deserialize, Serialize};

use crate::error::{ArenaError, Result};

/// One SOL in lamports
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Fixed limits for a session
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BankrollConfig {
    /// Balance that is never wagered
    pub min_reserve: u64,
    pub min_wager: u64,
    pub max_wager: u64,
    /// Stop-loss triggers below this percentage of the session start balance
    pub stop_loss_percent: u8,
    /// Stake percentage for win rate above 60%
    pub hot_percent: u8,
    /// Stake percentage for win rate in [40%, 60%]
    pub base_percent: u8,
    /// Stake percentage for win rate below 40%
    pub cold_percent: u8,
    /// Stake percentage once the stop-loss has triggered
    pub stop_loss_stake_percent: u8,
}

impl Default for BankrollConfig {
    fn default() -> Self {
        Self {
            min_reserve: LAMPORTS_PER_SOL / 20,
            min_wager: LAMPORTS_PER_SOL / 1000,
            max_wager: LAMPORTS_PER_SOL / 20,
            stop_loss_percent: 70,
            hot_percent: 15,
            base_percent: 10,
            cold_percent: 5,
            stop_loss_stake_percent: 2,
        }
    }
}

impl BankrollConfig {
    pub fn validate(&self) -> Result<()> {
        if self.min_wager > self.max_wager {
            return Err(ArenaError::InvalidConfig(format!(
                "min_wager {} exceeds max_wager {}",
                self.min_wager, self.max_wager
            )));
        }
        let percents = [
            self.stop_loss_percent,
            self.hot_percent,
            self.base_percent,
            self.cold_percent,
            self.stop_loss_stake_percent,
        ];
        if percents.iter().any(|p| *p > 100) {
            return Err(ArenaError::InvalidConfig(
                "percentages must be within 0-100".to_string(),
            ));
        }
        Ok(())
    }
}

/// Sizing engine for one session
///
/// Deserializing goes through the same validation as `BankrollPolicy::new`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PolicyState")]
pub struct BankrollPolicy {
    config: BankrollConfig,
    session_start_balance: u64,
}

#[derive(Deserialize)]
struct PolicyState {
    config: BankrollConfig,
    #[serde(default)]
    session_start_balance: u64,
}

impl TryFrom<PolicyState> for BankrollPolicy {
    type Error = ArenaError;

    fn try_from(state: PolicyState) -> Result<Self> {
        let mut policy = BankrollPolicy::new(state.config)?;
        policy.session_start_balance = state.session_start_balance;
        Ok(policy)
    }
}

impl BankrollPolicy {
    pub fn new(config: BankrollConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            session_start_balance: 0,
        })
    }

    /// Record the balance a new session starts from. The stop-loss is
    /// measured against this value until the next call.
    pub fn start_session(&mut self, balance: u64) {
        log::info!("bankroll session start at {} lamports", balance);
        self.session_start_balance = balance;
    }

    pub fn session_start_balance(&self) -> u64 {
        self.session_start_balance
    }

    pub fn config(&self) -> &BankrollConfig {
        &self.config
    }

    /// True once the balance is under the stop-loss line
    pub fn stop_loss_triggered(&self, balance: u64) -> bool {
        self.session_start_balance > 0
            && (balance as u128) * 100
                < (self.session_start_balance as u128) * self.config.stop_loss_percent as u128
    }

    /// Stake percentage for a given win rate, ignoring the stop-loss
    pub fn stake_percent(&self, win_rate_percent: f64) -> u8 {
        if win_rate_percent > 60.0 {
            self.config.hot_percent
        } else if win_rate_percent < 40.0 {
            self.config.cold_percent
        } else {
            self.config.base_percent
        }
    }

    /// Compute the wager for the next match.
    ///
    /// Returns 0 when the balance does not exceed the reserve; otherwise
    /// the result lies in `[min_wager, max_wager]`.
    pub fn wager(&self, balance: u64, win_rate_percent: f64) -> u64 {
        let available = balance.saturating_sub(self.config.min_reserve);
        if available == 0 {
            log::warn!("bankroll below minimum reserve, stopping");
            return 0;
        }

        let mut pct = self.stake_percent(win_rate_percent);
        if self.stop_loss_triggered(balance) {
            log::warn!(
                "stop-loss triggered (below {}% of session start)",
                self.config.stop_loss_percent
            );
            pct = self.config.stop_loss_stake_percent;
        }

        let raw = ((available as u128) * pct as u128 / 100) as u64;
        raw.clamp(self.config.min_wager, self.config.max_wager)
    }
}

impl Default for BankrollPolicy {
    fn default() -> Self {
        Self {
            config: BankrollConfig::default(),
            session_start_balance: 0,
        }
    }
}

/// Win rate in percent over decided matches; 50 when nothing is decided yet
pub fn win_rate_percent(wins: u32, losses: u32) -> f64 {
    let decided = wins + losses;
    if decided == 0 {
        50.0
    } else {
        wins as f64 * 100.0 / decided as f64
    }
}
