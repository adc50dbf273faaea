//! Exact depth-bounded search.
//!
//! Plain negamax, optionally with alpha-beta pruning and a transposition
//! cache. The hot path mutates one state in place and undoes every move
//! before returning to the parent frame.

use super::{SearchResult, SearchStats, Strategy};
use crate::cache::{Bound, CacheEntry, NoCache, PositionCache};
use crate::error::Result;
use crate::game::{Game, Score, INFINITY};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NegamaxParams {
    /// Plies to search below the root.
    pub depth: usize,
    pub pruning: bool,
    /// Search the root's candidate moves on the rayon pool.
    pub parallel: bool,
}

impl Default for NegamaxParams {
    fn default() -> Self {
        NegamaxParams {
            depth: 5,
            pruning: true,
            parallel: false,
        }
    }
}

pub struct Negamax<G, C = NoCache> {
    pub params: NegamaxParams,
    cache: Arc<C>,
    stats: SearchStats,
    _phantom: PhantomData<G>,
}

impl<G: Game> Negamax<G, NoCache> {
    pub fn new(params: NegamaxParams) -> Self {
        Negamax::with_cache(params, Arc::new(NoCache))
    }
}

impl<G: Game, C: PositionCache<G>> Negamax<G, C> {
    pub fn with_cache(params: NegamaxParams, cache: Arc<C>) -> Self {
        Negamax {
            params,
            cache,
            stats: SearchStats::default(),
            _phantom: PhantomData,
        }
    }

    pub fn cache(&self) -> &Arc<C> {
        &self.cache
    }
}

impl<G: Game + Sync, C: PositionCache<G>> Negamax<G, C> {
    fn search_root(&self, game: &G) -> Result<(SearchResult<G::Move>, SearchStats)> {
        let NegamaxParams {
            depth,
            pruning,
            parallel,
        } = self.params;
        let mut ctx = Context {
            cache: &*self.cache,
            pruning,
            stats: SearchStats::default(),
        };
        if !parallel || depth == 0 || game.is_terminal() {
            let mut root = game.clone();
            let result = ctx.negamax(&mut root, depth, -INFINITY, INFINITY)?;
            return Ok((result, ctx.stats));
        }

        ctx.stats.nodes += 1;
        if let Some(entry) = ctx.probe(game, depth) {
            if entry.bound == Bound::Exact {
                return Ok((entry.result, ctx.stats));
            }
        }
        let moves = game.legal_moves();
        if moves.is_empty() {
            ctx.stats.evaluations += 1;
            return Ok((SearchResult::leaf(game.score()), ctx.stats));
        }

        // Each branch owns a copy of the root and is searched with a full
        // window, so every candidate gets its exact value.
        let cache = &*self.cache;
        let branches = moves
            .par_iter()
            .map(|&m| {
                let mut child = game.after(m)?;
                let mut branch = Context {
                    cache,
                    pruning,
                    stats: SearchStats::default(),
                };
                let value = -branch.negamax(&mut child, depth - 1, -INFINITY, INFINITY)?.score;
                Ok((m, value, branch.stats))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut best: Option<(G::Move, Score)> = None;
        for (m, value, stats) in branches {
            ctx.absorb(stats);
            if best.map_or(true, |(_, b)| value > b) {
                best = Some((m, value));
            }
        }
        let result = match best {
            Some((m, score)) => SearchResult {
                score,
                best_move: Some(m),
                depth,
            },
            None => SearchResult::leaf(game.score()),
        };
        cache.record(game, CacheEntry::exact(result));
        Ok((result, ctx.stats))
    }
}

impl<G, C> Strategy<G> for Negamax<G, C>
where
    G: Game + Sync,
    C: PositionCache<G> + Default,
{
    type Params = NegamaxParams;

    fn create(params: NegamaxParams) -> Self {
        Negamax::with_cache(params, Arc::new(C::default()))
    }

    fn search(&mut self, game: &G) -> Result<SearchResult<G::Move>> {
        let (result, stats) = self.search_root(game)?;
        self.stats = stats;
        debug!(
            depth = self.params.depth,
            pruning = self.params.pruning,
            score = result.score,
            best_move = ?result.best_move,
            nodes = stats.nodes,
            cache_hits = stats.cache_hits,
            "negamax search finished"
        );
        Ok(result)
    }

    fn stats(&self) -> SearchStats {
        self.stats
    }
}

struct Context<'a, C> {
    cache: &'a C,
    pruning: bool,
    stats: SearchStats,
}

impl<'a, C> Context<'a, C> {
    fn probe<G: Game>(&mut self, game: &G, depth: usize) -> Option<CacheEntry<G::Move>>
    where
        C: PositionCache<G>,
    {
        let entry = self.cache.probe(game, depth);
        if entry.is_some() {
            self.stats.cache_hits += 1;
        }
        entry
    }

    fn absorb(&mut self, other: SearchStats) {
        self.stats.nodes += other.nodes;
        self.stats.evaluations += other.evaluations;
        self.stats.cache_hits += other.cache_hits;
    }

    fn negamax<G: Game>(
        &mut self,
        game: &mut G,
        depth: usize,
        mut alpha: Score,
        beta: Score,
    ) -> Result<SearchResult<G::Move>>
    where
        C: PositionCache<G>,
    {
        self.stats.nodes += 1;
        if depth == 0 || game.is_terminal() {
            self.stats.evaluations += 1;
            return Ok(SearchResult::leaf(game.score()));
        }

        if let Some(entry) = self.probe(game, depth) {
            let score = entry.score();
            match entry.bound {
                Bound::Exact => return Ok(entry.result),
                Bound::Lower if score >= beta => return Ok(entry.result),
                Bound::Upper if score <= alpha => return Ok(entry.result),
                _ => {}
            }
        }

        let moves = game.legal_moves();
        if moves.is_empty() {
            self.stats.evaluations += 1;
            return Ok(SearchResult::leaf(game.score()));
        }

        let alpha_orig = alpha;
        let mut best_score = -INFINITY;
        let mut best_move = None;
        for m in moves {
            let (child_alpha, child_beta) = if self.pruning {
                (-beta, -alpha)
            } else {
                (-INFINITY, INFINITY)
            };
            let undo = game.apply(m)?;
            let child = self.negamax(game, depth - 1, child_alpha, child_beta);
            game.undo(undo);
            let value = -child?.score;

            if value > best_score {
                best_score = value;
                best_move = Some(m);
            }
            if self.pruning {
                alpha = alpha.max(value);
                if alpha >= beta {
                    break;
                }
            }
        }

        let bound = if best_score <= alpha_orig {
            Bound::Upper
        } else if best_score >= beta {
            Bound::Lower
        } else {
            Bound::Exact
        };
        let result = SearchResult {
            score: best_score,
            best_move,
            depth,
        };
        self.cache.record(game, CacheEntry { result, bound });
        Ok(result)
    }
}
