//! Engine configuration, loadable from JSON.
//!
//! ```json
//! { "strategy": { "kind": "negamax", "depth": 7, "cache": true }, "first_player_human": true }
//! ```

use crate::cache::Cache;
use crate::error::{Error, Result};
use crate::game::Transposable;
use crate::runner::{AIPlayer, Player};
use crate::strategies::{
    Negamax, NegamaxParams, Sss, SssParams, Strategy, StubbornGreedy, StubbornGreedyParams,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StrategyConfig {
    Negamax {
        #[serde(flatten)]
        params: NegamaxParams,
        #[serde(default = "enabled")]
        cache: bool,
    },
    Sss(SssParams),
    Greedy(StubbornGreedyParams),
}

fn enabled() -> bool {
    true
}

impl Default for StrategyConfig {
    fn default() -> Self {
        StrategyConfig::Negamax {
            params: NegamaxParams::default(),
            cache: true,
        }
    }
}

impl StrategyConfig {
    /// Default parameters for a strategy named on the command line.
    pub fn named(name: &str) -> Result<Self> {
        match name {
            "negamax" => Ok(StrategyConfig::default()),
            "sss" => Ok(StrategyConfig::Sss(SssParams::default())),
            "greedy" => Ok(StrategyConfig::Greedy(StubbornGreedyParams::default())),
            other => Err(Error::invalid_config(format!("unknown strategy {:?}", other))),
        }
    }

    pub fn depth(&self) -> usize {
        match *self {
            StrategyConfig::Negamax { ref params, .. } => params.depth,
            StrategyConfig::Sss(ref params) => params.depth,
            StrategyConfig::Greedy(ref params) => params.depth,
        }
    }

    pub fn set_depth(&mut self, depth: usize) {
        match *self {
            StrategyConfig::Negamax { ref mut params, .. } => params.depth = depth,
            StrategyConfig::Sss(ref mut params) => params.depth = depth,
            StrategyConfig::Greedy(ref mut params) => params.depth = depth,
        }
    }

    /// Switches root parallelism on. SSS* has no parallel mode.
    pub fn set_parallel(&mut self) {
        match *self {
            StrategyConfig::Negamax { ref mut params, .. } => params.parallel = true,
            StrategyConfig::Greedy(ref mut params) => params.parallel = true,
            StrategyConfig::Sss(_) => {}
        }
    }

    pub fn disable_pruning(&mut self) {
        if let StrategyConfig::Negamax { ref mut params, .. } = *self {
            params.pruning = false;
        }
    }

    pub fn disable_cache(&mut self) {
        if let StrategyConfig::Negamax { ref mut cache, .. } = *self {
            *cache = false;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.depth() == 0 {
            return Err(Error::invalid_config("search depth must be at least 1"));
        }
        Ok(())
    }

    /// A computer player running this strategy.
    pub fn computer<G>(&self, name: &str) -> Box<dyn Player<G>>
    where
        G: Transposable + Sync + 'static,
    {
        debug!(config = ?self, player = name, "building computer player");
        match *self {
            StrategyConfig::Negamax {
                params,
                cache: true,
            } => Box::new(AIPlayer::new(
                name,
                Negamax::<G, Cache<G>>::create(params),
            )),
            StrategyConfig::Negamax {
                params,
                cache: false,
            } => Box::new(AIPlayer::new(name, Negamax::<G>::new(params))),
            StrategyConfig::Sss(params) => Box::new(AIPlayer::new(name, Sss::<G>::new(params))),
            StrategyConfig::Greedy(params) => {
                Box::new(AIPlayer::new(name, StubbornGreedy::<G>::new(params)))
            }
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub strategy: StrategyConfig,
    /// Whether the human moves first. `None` flips a coin.
    pub first_player_human: Option<bool>,
}

impl EngineConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading engine config");
        EngineConfig::from_json(&fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.strategy.validate()
    }
}
