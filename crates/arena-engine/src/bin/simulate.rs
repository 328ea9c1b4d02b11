//! Arena Simulator
//!
//! Plays a session of matches between the adaptive agent and a house
//! opponent, sizing each wager with the bankroll policy and settling pots
//! and ratings as it goes.
//!
//! Options: --matches, --seed, --balance, --opponent, --game, --memo

use anyhow::Context;
use arena_engine::*;
use clap::{Parser, ValueEnum};
use rand::rngs::SmallRng;
use rand::SeedableRng;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Game {
    Rps,
    Coinflip,
}

#[derive(Parser)]
#[command(author, version, about = "Simulate an arena session", long_about = None)]
struct Args {
    /// Number of matches to play
    #[arg(short, long, default_value_t = 10)]
    matches: u32,
    /// Seed for the session's random source
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    /// Starting balance in lamports
    #[arg(short, long, default_value_t = LAMPORTS_PER_SOL)]
    balance: u64,
    /// House opponent: adaptive, windowed, uniform, rock, paper or scissors
    #[arg(short, long, default_value = "uniform")]
    opponent: String,
    #[arg(short, long, value_enum, default_value_t = Game::Rps)]
    game: Game,
    /// Optional bankroll config as JSON
    #[arg(long)]
    bankroll: Option<String>,
    /// Print the match record memo for each match
    #[arg(long)]
    memo: bool,
}

fn opponent_strategy(name: &str) -> anyhow::Result<Strategy> {
    let base = match name.to_ascii_lowercase().as_str() {
        "adaptive" => StrategyBase::Adaptive,
        "windowed" => StrategyBase::Windowed,
        "uniform" => StrategyBase::Uniform,
        other => StrategyBase::Fixed(other.parse::<Move>()?),
    };
    Ok(Strategy::new(base))
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = match &args.bankroll {
        Some(json) => serde_json::from_str(json).context("parse bankroll config")?,
        None => BankrollConfig::default(),
    };
    let policy = BankrollPolicy::new(config)?;
    let house_strategy = opponent_strategy(&args.opponent)?;

    let mut agent = Agent::new("gladiator", policy, SmallRng::seed_from_u64(args.seed));
    agent.start_session(args.balance);

    let house_id = "house";
    let mut house = PlayerStats::new();
    let mut house_model = OpponentModel::new();
    let mut house_streaks = StreakMemory::default();

    for match_id in 1..=args.matches as u64 {
        let wager = agent.next_wager();
        if wager == 0 {
            log::warn!("stopping after {} matches: balance at reserve", match_id - 1);
            break;
        }
        if wager > agent.balance() {
            log::warn!("stopping: wager {} exceeds balance {}", wager, agent.balance());
            break;
        }

        let (outcome, record) = match args.game {
            Game::Rps => {
                let mut opponent = Contestant::new(house_id, house_strategy, &mut house_model);
                let result = agent.play_rps(&mut opponent)?;
                log::info!(
                    "match {}: {} wins {} after {} rounds",
                    match_id,
                    result.winner_id(),
                    result.score_line(),
                    result.rounds.len()
                );
                (
                    Outcome::Winner(result.winner),
                    MatchRecord::from_rps(match_id, &result),
                )
            }
            Game::Coinflip => {
                let mut opponent = FlipContestant {
                    id: house_id,
                    strategy: CoinStrategy::Random,
                    memory: &mut house_streaks,
                };
                let result = agent.play_coin_flip(&mut opponent);
                log::info!(
                    "match {}: called {} vs {}, landed {}",
                    match_id,
                    result.choice_a,
                    result.choice_b,
                    result.resolved
                );
                let record = MatchRecord::from_coin_flip(match_id, agent.id(), house_id, &result);
                (result.outcome, record)
            }
        };

        agent.settle(outcome, wager, &mut house);
        if args.memo {
            println!("{}", record.to_memo()?);
        }
    }

    let stats = agent.stats();
    log::info!(
        "session over: {}W/{}L/{}D, win rate {:.1}%, rating {} (house {}), \
         balance {} -> {} lamports",
        stats.wins,
        stats.losses,
        stats.draws,
        stats.win_rate_percent(),
        stats.rating,
        house.rating,
        args.balance,
        agent.balance()
    );
    Ok(())
}
