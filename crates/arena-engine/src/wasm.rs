//! WASM bindings for frontend match replay and leaderboard math

#![cfg(feature = "wasm")]

use wasm_bindgen::prelude::*;

use crate::strategy::describe_strategy;
use crate::{
    run_match, update_ratings as elo_update, BankrollConfig, BankrollPolicy, CoinSide, Move,
    Strategy, StrategyBase,
};

fn parse_strategy(json: &str) -> Result<Strategy, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid strategy: {}", e))
}

/// Replay a match with full round-by-round details
///
/// # Arguments
/// * `strategy_a_json` - JSON serialized Strategy for player A
/// * `strategy_b_json` - JSON serialized Strategy for player B
/// * `seed` - 32-byte match randomness seed
/// * `match_index` - Index of this match
///
/// # Returns
/// JSON serialized MatchResult
#[wasm_bindgen]
pub fn replay_match(
    strategy_a_json: &str,
    strategy_b_json: &str,
    seed: &[u8],
    match_index: u32,
) -> Result<JsValue, JsError> {
    let strategy_a = parse_strategy(strategy_a_json)
        .map_err(|e| JsError::new(&format!("Invalid strategy A: {}", e)))?;
    let strategy_b = parse_strategy(strategy_b_json)
        .map_err(|e| JsError::new(&format!("Invalid strategy B: {}", e)))?;

    let seed_arr: [u8; 32] = seed
        .try_into()
        .map_err(|_| JsError::new("Seed must be exactly 32 bytes"))?;

    let result = run_match(&strategy_a, &strategy_b, &seed_arr, match_index)
        .map_err(|e| JsError::new(&e.to_string()))?;

    serde_wasm_bindgen::to_value(&result)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Get human-readable description of a strategy
#[wasm_bindgen]
pub fn get_strategy_description(strategy_json: &str) -> Result<String, JsError> {
    let strategy = parse_strategy(strategy_json).map_err(|e| JsError::new(&e))?;
    Ok(describe_strategy(&strategy))
}

#[derive(serde::Serialize)]
struct StrategyInfo {
    id: &'static str,
    name: &'static str,
    description: &'static str,
}

/// Get all available strategy base types
#[wasm_bindgen]
pub fn get_strategy_types() -> Result<JsValue, JsError> {
    let types = [
        StrategyInfo {
            id: "Adaptive",
            name: "Adaptive",
            description: "Counters the opponent's favourite move and goes deeper when behind.",
        },
        StrategyInfo {
            id: "Windowed",
            name: "Windowed",
            description: "Counters the most frequent of the last few moves, with some randomness.",
        },
        StrategyInfo {
            id: "Uniform",
            name: "Uniform",
            description: "Plays a uniformly random move each round.",
        },
        StrategyInfo {
            id: "Rock",
            name: "Always Rock",
            description: "Always plays Rock.",
        },
        StrategyInfo {
            id: "Paper",
            name: "Always Paper",
            description: "Always plays Paper.",
        },
        StrategyInfo {
            id: "Scissors",
            name: "Always Scissors",
            description: "Always plays Scissors.",
        },
    ];

    serde_wasm_bindgen::to_value(&types)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Create a strategy JSON from base type
#[wasm_bindgen]
pub fn create_strategy(base: &str) -> Result<String, JsError> {
    let base = match base {
        "Adaptive" => StrategyBase::Adaptive,
        "Windowed" => StrategyBase::Windowed,
        "Uniform" => StrategyBase::Uniform,
        other => match other.parse::<Move>() {
            Ok(m) => StrategyBase::Fixed(m),
            Err(_) => return Err(JsError::new(&format!("Unknown strategy: {}", base))),
        },
    };

    serde_json::to_string(&Strategy::new(base))
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Wager in lamports for a balance and win rate, under the default policy
/// or a JSON BankrollConfig
#[wasm_bindgen]
pub fn compute_wager(
    balance: u64,
    win_rate_percent: f64,
    session_start_balance: u64,
    config_json: Option<String>,
) -> Result<u64, JsError> {
    let config = match config_json {
        Some(json) => serde_json::from_str::<BankrollConfig>(&json)
            .map_err(|e| JsError::new(&format!("Invalid bankroll config: {}", e)))?,
        None => BankrollConfig::default(),
    };
    let mut policy = BankrollPolicy::new(config).map_err(|e| JsError::new(&e.to_string()))?;
    policy.start_session(session_start_balance);
    Ok(policy.wager(balance, win_rate_percent))
}

/// New ratings after a game, as `{winner, loser}`
#[wasm_bindgen]
pub fn update_ratings(winner: u32, loser: u32, is_draw: bool) -> Result<JsValue, JsError> {
    serde_wasm_bindgen::to_value(&elo_update(winner, loser, is_draw))
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Score a coin flip; returns "A", "B" or "draw"
#[wasm_bindgen]
pub fn resolve_coin_flip(
    choice_a: &str,
    choice_b: &str,
    resolved: &str,
) -> Result<String, JsError> {
    let parse = |s: &str| s.parse::<CoinSide>().map_err(|e| JsError::new(&e.to_string()));
    let outcome = crate::resolve_coin_flip(parse(choice_a)?, parse(choice_b)?, parse(resolved)?);

    Ok(match outcome {
        crate::Outcome::Winner(crate::Side::A) => "A",
        crate::Outcome::Winner(crate::Side::B) => "B",
        crate::Outcome::Draw => "draw",
    }
    .to_string())
}
