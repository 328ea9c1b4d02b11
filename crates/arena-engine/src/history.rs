//! Per-opponent move history

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::strategy::Move;

/// Move counts over some slice of an opponent's history
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frequencies {
    pub rock: usize,
    pub paper: usize,
    pub scissors: usize,
}

impl Frequencies {
    pub fn from_moves(moves: &[Move]) -> Self {
        let mut freq = Self::default();
        for m in moves {
            match m {
                Move::Rock => freq.rock += 1,
                Move::Paper => freq.paper += 1,
                Move::Scissors => freq.scissors += 1,
            }
        }
        freq
    }

    pub fn count(&self, m: Move) -> usize {
        match m {
            Move::Rock => self.rock,
            Move::Paper => self.paper,
            Move::Scissors => self.scissors,
        }
    }

    pub fn total(&self) -> usize {
        self.rock + self.paper + self.scissors
    }

    /// Most frequent move. Ties go to the earlier move (Rock, then Paper),
    /// so an empty count reports Rock.
    pub fn most_common(&self) -> Move {
        let mut best = Move::Rock;
        for m in [Move::Paper, Move::Scissors] {
            if self.count(m) > self.count(best) {
                best = m;
            }
        }
        best
    }
}

/// Append-only move history keyed by opponent identity
///
/// One instance per session, owned by whoever drives the matches and passed
/// by reference into strategy calls. Unknown opponents read as empty.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct OpponentModel {
    histories: HashMap<String, Vec<Move>>,
}

impl OpponentModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one observed move
    pub fn record(&mut self, opponent: &str, m: Move) {
        match self.histories.get_mut(opponent) {
            Some(history) => history.push(m),
            None => {
                self.histories.insert(opponent.to_string(), vec![m]);
            }
        }
    }

    pub fn history(&self, opponent: &str) -> &[Move] {
        self.histories
            .get(opponent)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self, opponent: &str) -> usize {
        self.history(opponent).len()
    }

    pub fn is_empty(&self, opponent: &str) -> bool {
        self.len(opponent) == 0
    }

    /// Move counts over the full history, or over the most recent `window`
    /// moves when given.
    pub fn frequencies(&self, opponent: &str, window: Option<usize>) -> Frequencies {
        let history = self.history(opponent);
        let tail = match window {
            Some(n) => &history[history.len().saturating_sub(n)..],
            None => history,
        };
        Frequencies::from_moves(tail)
    }

    pub fn opponents(&self) -> impl Iterator<Item = &str> {
        self.histories.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_opponent_is_empty() {
        let model = OpponentModel::new();
        assert!(model.is_empty("nobody"));
        assert_eq!(model.frequencies("nobody", None), Frequencies::default());
        assert_eq!(model.frequencies("nobody", Some(5)).total(), 0);
    }

    #[test]
    fn test_record_appends_in_order() {
        let mut model = OpponentModel::new();
        model.record("a", Move::Rock);
        model.record("a", Move::Scissors);
        model.record("b", Move::Paper);

        assert_eq!(model.history("a"), &[Move::Rock, Move::Scissors]);
        assert_eq!(model.history("b"), &[Move::Paper]);
        assert_eq!(model.len("a"), 2);

        let mut ids: Vec<_> = model.opponents().collect();
        ids.sort();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_full_frequencies() {
        let mut model = OpponentModel::new();
        for m in [Move::Rock, Move::Rock, Move::Paper, Move::Scissors, Move::Rock] {
            model.record("a", m);
        }
        let f = model.frequencies("a", None);
        assert_eq!((f.rock, f.paper, f.scissors), (3, 1, 1));
        assert_eq!(f.most_common(), Move::Rock);
    }

    #[test]
    fn test_window_counts_tail() {
        let mut model = OpponentModel::new();
        for m in [Move::Rock, Move::Rock, Move::Rock, Move::Paper, Move::Paper] {
            model.record("a", m);
        }
        let f = model.frequencies("a", Some(2));
        assert_eq!((f.rock, f.paper, f.scissors), (0, 2, 0));
        assert_eq!(f.most_common(), Move::Paper);

        // Window larger than history covers everything
        assert_eq!(model.frequencies("a", Some(50)).total(), 5);
        assert_eq!(model.frequencies("a", Some(0)).total(), 0);
    }

    #[test]
    fn test_most_common_tie_break() {
        let f = Frequencies {
            rock: 2,
            paper: 2,
            scissors: 2,
        };
        assert_eq!(f.most_common(), Move::Rock);
        let f = Frequencies {
            rock: 0,
            paper: 1,
            scissors: 1,
        };
        assert_eq!(f.most_common(), Move::Paper);
        let f = Frequencies {
            rock: 2,
            paper: 1,
            scissors: 0,
        };
        assert_eq!(f.most_common(), Move::Rock);
    }
}
