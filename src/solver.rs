//! Iterative deepening solver.
//!
//! Runs cached, pruned negamax at increasing depths and stops at the first
//! depth that proves a win or a loss, so the reported depth is the shallowest
//! one at which the outcome is forced.

use crate::cache::TranspositionCache;
use crate::error::{Error, Result};
use crate::game::{Score, Transposable};
use crate::strategies::{Negamax, NegamaxParams, Strategy};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Loss,
    /// No depth tried proved either.
    Unknown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution<M> {
    pub outcome: Outcome,
    pub score: Score,
    /// Depth of the last search run.
    pub depth: usize,
    pub best_move: Option<M>,
}

pub fn id_solve<G, I>(
    game: &G,
    depths: I,
    win_score: Score,
    cache: Arc<TranspositionCache<G::Key, G::Move>>,
) -> Result<Solution<G::Move>>
where
    G: Transposable + Sync,
    I: IntoIterator<Item = usize>,
{
    let mut strategy: Negamax<G, _> = Negamax::with_cache(NegamaxParams::default(), cache);
    let mut solution = None;
    for depth in depths {
        strategy.params.depth = depth;
        let result = strategy.search(game)?;
        let outcome = if result.score >= win_score {
            Outcome::Win
        } else if result.score <= -win_score {
            Outcome::Loss
        } else {
            Outcome::Unknown
        };
        info!(
            depth,
            score = result.score,
            best_move = ?result.best_move,
            nodes = strategy.stats().nodes,
            "iterative deepening step"
        );
        solution = Some(Solution {
            outcome,
            score: result.score,
            depth,
            best_move: result.best_move,
        });
        if outcome != Outcome::Unknown {
            break;
        }
    }
    solution.ok_or_else(|| Error::invalid_config("iterative deepening needs at least one depth"))
}
