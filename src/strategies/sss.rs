//! SSS*: best-first minimax.
//!
//! Explores the same depth-limited tree as negamax, but always expands the
//! open node with the highest upper bound on its value (leftmost first among
//! equals). It proves the same value as exhaustive negamax while evaluating
//! no more leaves.
//!
//! Values on the OPEN list are from the root mover's point of view: even plies
//! are MAX nodes scored with `score`, odd plies are MIN nodes scored with
//! `-score`. Nodes are named by the move indices leading to them and rebuilt
//! from a copy of the root when needed.

use super::{SearchResult, SearchStats, Strategy};
use crate::error::{Error, Result};
use crate::game::{Game, Score, INFINITY};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::marker::PhantomData;
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SssParams {
    pub depth: usize,
}

impl Default for SssParams {
    fn default() -> Self {
        SssParams { depth: 5 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Status {
    Live,
    Solved,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Open {
    merit: Score,
    path: Vec<usize>,
    status: Status,
}

impl Ord for Open {
    fn cmp(&self, other: &Self) -> Ordering {
        self.merit
            .cmp(&other.merit)
            .then_with(|| other.path.cmp(&self.path))
            .then_with(|| self.status.cmp(&other.status))
    }
}

impl PartialOrd for Open {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

pub struct Sss<G> {
    pub params: SssParams,
    stats: SearchStats,
    _phantom: PhantomData<G>,
}

impl<G: Game> Sss<G> {
    pub fn new(params: SssParams) -> Self {
        Sss {
            params,
            stats: SearchStats::default(),
            _phantom: PhantomData,
        }
    }

    fn replay(root: &G, path: &[usize]) -> Result<G> {
        let mut state = root.clone();
        for &i in path {
            let m = *state
                .legal_moves()
                .get(i)
                .ok_or(Error::SearchInvariant("OPEN path leaves the move list"))?;
            state.play(m)?;
        }
        Ok(state)
    }

    fn run(&self, root: &G) -> Result<(SearchResult<G::Move>, SearchStats)> {
        let depth = self.params.depth;
        let mut stats = SearchStats::default();
        let root_moves = root.legal_moves();
        if depth == 0 || root.is_terminal() || root_moves.is_empty() {
            stats.nodes += 1;
            stats.evaluations += 1;
            return Ok((SearchResult::leaf(root.score()), stats));
        }

        let mut open = BinaryHeap::new();
        open.push(Open {
            merit: INFINITY,
            path: vec![],
            status: Status::Live,
        });
        let mut best = None;

        while let Some(Open {
            merit,
            mut path,
            status,
        }) = open.pop()
        {
            let ply = path.len();
            let is_max = ply % 2 == 0;
            match status {
                Status::Solved if ply == 0 => {
                    let result = SearchResult {
                        score: merit,
                        best_move: best.map(|i: usize| root_moves[i]),
                        depth,
                    };
                    return Ok((result, stats));
                }
                Status::Live => {
                    stats.nodes += 1;
                    let state = Self::replay(root, &path)?;
                    let moves = state.legal_moves().len();
                    if ply == depth || state.is_terminal() || moves == 0 {
                        stats.evaluations += 1;
                        let value = if is_max { state.score() } else { -state.score() };
                        open.push(Open {
                            merit: merit.min(value),
                            path,
                            status: Status::Solved,
                        });
                    } else if is_max {
                        for i in 0..moves {
                            let mut child = path.clone();
                            child.push(i);
                            open.push(Open {
                                merit,
                                path: child,
                                status: Status::Live,
                            });
                        }
                    } else {
                        path.push(0);
                        open.push(Open {
                            merit,
                            path,
                            status: Status::Live,
                        });
                    }
                }
                Status::Solved => {
                    let index = path.pop().unwrap_or_default();
                    if !is_max {
                        // A solved MIN child solves its MAX parent outright.
                        if path.is_empty() {
                            best = Some(index);
                        }
                        open.retain(|o| !o.path.starts_with(&path));
                        open.push(Open {
                            merit,
                            path,
                            status: Status::Solved,
                        });
                    } else {
                        let siblings = Self::replay(root, &path)?.legal_moves().len();
                        if index + 1 < siblings {
                            path.push(index + 1);
                            open.push(Open {
                                merit,
                                path,
                                status: Status::Live,
                            });
                        } else {
                            open.push(Open {
                                merit,
                                path,
                                status: Status::Solved,
                            });
                        }
                    }
                }
            }
        }
        Err(Error::SearchInvariant("OPEN ran dry before the root was solved"))
    }
}

impl<G: Game> Strategy<G> for Sss<G> {
    type Params = SssParams;

    fn create(params: SssParams) -> Self {
        Sss::new(params)
    }

    fn search(&mut self, game: &G) -> Result<SearchResult<G::Move>> {
        let (result, stats) = self.run(game)?;
        self.stats = stats;
        debug!(
            depth = self.params.depth,
            score = result.score,
            best_move = ?result.best_move,
            nodes = stats.nodes,
            "sss* search finished"
        );
        Ok(result)
    }

    fn stats(&self) -> SearchStats {
        self.stats
    }
}
