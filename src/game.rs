//! The contract every searchable game implements.
//!
//! Scores are always from the perspective of the player about to move. A
//! positive score favors the mover and [`LOSS_SCORE`] means the mover has
//! already lost. Every strategy relies on this convention to flip signs
//! uniformly when players alternate.

pub mod coins;
pub mod connectfour;
pub mod synthetic;

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;
use std::hash::Hash;

pub type Score = i32;

/// Score of a state whose mover has already lost.
pub const LOSS_SCORE: Score = -100;

/// Score of a state whose mover has already won. Negamax produces it one ply
/// above a [`LOSS_SCORE`] leaf.
pub const WIN_SCORE: Score = 100;

/// Search window bound. Negating it never overflows.
pub const INFINITY: Score = Score::MAX;

/// True when the score proves a win or a loss rather than a heuristic guess.
pub fn is_decisive(score: Score) -> bool {
    score.abs() >= WIN_SCORE
}

pub trait Game: Clone + Send {
    type Move: Copy + Ord + Debug + Send + Sync + Serialize + DeserializeOwned;
    type Agent: Copy + Eq + Debug + Send;
    /// Whatever `undo` needs to reverse one `apply`.
    type Undo;

    fn to_act(&self) -> Self::Agent;

    /// Index of an agent in play order, `0` for whoever moves first.
    fn agent_index(&self, agent: &Self::Agent) -> usize;

    /// Legal moves in search priority order. Ties between equally scored
    /// moves always go to the earliest one in this list.
    fn legal_moves(&self) -> Vec<Self::Move>;

    fn move_valid(&self, m: &Self::Move) -> bool {
        self.legal_moves().contains(m)
    }

    /// Plays `m` for the current player and switches turns.
    ///
    /// Fails with [`Error::InvalidMove`] when `m` is not in `legal_moves`.
    fn apply(&mut self, m: Self::Move) -> Result<Self::Undo>;

    /// Exactly reverses the `apply` that produced `undo`.
    fn undo(&mut self, undo: Self::Undo);

    fn is_terminal(&self) -> bool;

    /// Heuristic or exact value for the player to move.
    fn score(&self) -> Score;

    fn winner(&self) -> Option<Self::Agent>;

    fn play(&mut self, m: Self::Move) -> Result<()> {
        self.apply(m).map(|_| ())
    }

    /// A copy of this state with `m` played.
    fn after(&self, m: Self::Move) -> Result<Self> {
        let mut next = self.clone();
        next.play(m)?;
        Ok(next)
    }

    fn play_all<I>(&mut self, moves: I) -> Result<()>
    where
        I: IntoIterator<Item = Self::Move>,
    {
        for m in moves {
            self.play(m)?;
        }
        Ok(())
    }
}

/// Games that can be looked up in a transposition cache.
///
/// Strategically identical states must produce equal keys. Distinct keys for
/// identical states only cost cache hits.
pub trait Transposable: Game {
    type Key: Hash + Eq + Clone + Debug + Send + Sync;

    fn position_key(&self) -> Self::Key;
}

pub trait ParseGame: Game {
    fn parse_move(&self, input: &str) -> Option<Self::Move>;
}

/// Shared guard for `Game::apply` implementations.
pub(crate) fn check_move<G: Game>(game: &G, m: &G::Move) -> Result<()> {
    if game.move_valid(m) {
        Ok(())
    } else {
        Err(Error::invalid_move(m))
    }
}
