//! Move-selection strategies.
//!
//! Every strategy implements [`Strategy`], so drivers such as the
//! [`Runner`](crate::runner::Runner) or the
//! [iterative deepening solver](crate::solver) never care which one they hold.

use crate::error::{Error, Result};
use crate::game::{Game, Score};
use serde::{Deserialize, Serialize};

pub mod negamax;
pub mod sss;
pub mod stubborn_greedy;

pub use self::negamax::{Negamax, NegamaxParams};
pub use self::sss::{Sss, SssParams};
pub use self::stubborn_greedy::{StubbornGreedy, StubbornGreedyParams};

/// Outcome of one search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchResult<M> {
    /// Value for the player to move at the searched state.
    pub score: Score,
    /// `None` when the searched state had no moves to choose from.
    pub best_move: Option<M>,
    /// Plies searched below the state.
    pub depth: usize,
}

impl<M> SearchResult<M> {
    pub fn leaf(score: Score) -> Self {
        SearchResult {
            score,
            best_move: None,
            depth: 0,
        }
    }
}

/// Work done by the last search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Search nodes entered.
    pub nodes: u64,
    /// Calls to the game's scoring function.
    pub evaluations: u64,
    /// Cache probes answered without searching.
    pub cache_hits: u64,
}

pub trait Strategy<G: Game> {
    type Params;

    fn create(params: Self::Params) -> Self
    where
        Self: Sized;

    fn search(&mut self, game: &G) -> Result<SearchResult<G::Move>>;

    fn decide(&mut self, game: &G) -> Result<G::Move> {
        self.search(game)?.best_move.ok_or(Error::NoLegalMoves)
    }

    fn stats(&self) -> SearchStats;
}
