//! Adversarial search for two-player, turn-based, zero-sum games.
//!
//! A game implements [`Game`]; any [`Strategy`] can then pick its moves:
//!
//! - [`Negamax`](strategies::Negamax): exact depth-bounded search with
//!   optional alpha-beta pruning and a shared [`TranspositionCache`].
//! - [`Sss`](strategies::Sss): best-first SSS*, same value as negamax with no
//!   more leaf evaluations.
//! - [`StubbornGreedy`](strategies::StubbornGreedy): one greedy line per
//!   candidate move, linear in the depth.
//!
//! [`solver::id_solve`] deepens negamax until a win or a loss is proven, and
//! [`runner::Runner`] plays games on the console.

pub mod cache;
pub mod config;
pub mod error;
pub mod game;
pub mod runner;
pub mod solver;
pub mod strategies;

pub use crate::cache::{Cache, TranspositionCache};
pub use crate::error::{Error, Result};
pub use crate::game::{Game, ParseGame, Score, Transposable, LOSS_SCORE, WIN_SCORE};
pub use crate::strategies::{SearchResult, SearchStats, Strategy};
