//! A synthetic game tree with a fixed branching factor and height.
//!
//! Every node offers the same `branching` moves until `height` plies have been
//! played. Scores come from a seeded generator so a tree is reproducible from
//! its parameters, and every call to `score` is counted.

use super::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// How positions are identified.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Every move sequence is a distinct position.
    Tree,
    /// Positions with the same ply and the same sum of moves coincide, so
    /// different move orders transpose into each other.
    Lattice,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeKey {
    Path(Vec<u8>),
    Lattice { ply: usize, sum: u32 },
}

#[derive(Clone, Debug)]
pub struct UniformTree {
    branching: u8,
    height: usize,
    seed: u64,
    spread: Score,
    shape: Shape,
    path: Vec<u8>,
    sum: u32,
    evaluations: Arc<AtomicUsize>,
}

impl UniformTree {
    pub fn new(branching: u8, height: usize, seed: u64) -> Self {
        UniformTree {
            branching: branching.max(1),
            height,
            seed,
            spread: 20,
            shape: Shape::Tree,
            path: Vec::with_capacity(height),
            sum: 0,
            evaluations: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Scores are drawn from `-spread..=spread`. Small spreads produce many
    /// ties.
    pub fn with_spread(mut self, spread: Score) -> Self {
        self.spread = spread.max(0).min(WIN_SCORE - 1);
        self
    }

    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.shape = shape;
        self
    }

    pub fn branching(&self) -> usize {
        self.branching as usize
    }

    pub fn ply(&self) -> usize {
        self.path.len()
    }

    /// Number of `score` calls made on this tree and all of its clones.
    pub fn evaluations(&self) -> usize {
        self.evaluations.load(Ordering::Relaxed)
    }

    pub fn reset_evaluations(&self) {
        self.evaluations.store(0, Ordering::Relaxed);
    }

    fn node_seed(&self) -> u64 {
        let mix = |h: u64, x: u64| (h ^ x).wrapping_mul(0x0000_0100_0000_01b3);
        let base = mix(0xcbf2_9ce4_8422_2325, self.seed);
        match self.shape {
            Shape::Tree => self
                .path
                .iter()
                .fold(base, |h, &m| mix(h, m as u64 + 1)),
            Shape::Lattice => mix(mix(base, self.path.len() as u64), self.sum as u64),
        }
    }
}

impl fmt::Display for UniformTree {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "UniformTree{:?}", self.path)
    }
}

impl Game for UniformTree {
    type Move = u8;
    type Agent = usize;
    type Undo = ();

    fn to_act(&self) -> Self::Agent {
        self.path.len() % 2
    }

    fn agent_index(&self, &a: &Self::Agent) -> usize {
        a
    }

    fn legal_moves(&self) -> Vec<Self::Move> {
        if self.is_terminal() {
            return vec![];
        }
        (0..self.branching).collect()
    }

    fn move_valid(&self, &m: &Self::Move) -> bool {
        !self.is_terminal() && m < self.branching
    }

    fn apply(&mut self, m: Self::Move) -> Result<Self::Undo> {
        check_move(self, &m)?;
        self.path.push(m);
        self.sum += m as u32;
        Ok(())
    }

    fn undo(&mut self, _: Self::Undo) {
        if let Some(m) = self.path.pop() {
            self.sum -= m as u32;
        }
    }

    fn is_terminal(&self) -> bool {
        self.path.len() >= self.height
    }

    fn score(&self) -> Score {
        self.evaluations.fetch_add(1, Ordering::Relaxed);
        let mut rng = StdRng::seed_from_u64(self.node_seed());
        rng.gen_range(-self.spread..=self.spread)
    }

    fn winner(&self) -> Option<Self::Agent> {
        None
    }
}

impl Transposable for UniformTree {
    type Key = NodeKey;

    fn position_key(&self) -> Self::Key {
        match self.shape {
            Shape::Tree => NodeKey::Path(self.path.clone()),
            Shape::Lattice => NodeKey::Lattice {
                ply: self.path.len(),
                sum: self.sum,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scores_are_reproducible() {
        let a = UniformTree::new(3, 4, 7).after(2).unwrap();
        let b = UniformTree::new(3, 4, 7).after(2).unwrap();
        assert_eq!(a.score(), b.score());
    }

    #[test]
    fn evaluations_are_shared_between_clones() {
        let tree = UniformTree::new(2, 3, 1);
        let child = tree.after(0).unwrap();
        child.score();
        tree.score();
        assert_eq!(tree.evaluations(), 2);
        tree.reset_evaluations();
        assert_eq!(child.evaluations(), 0);
    }

    #[test]
    fn lattice_positions_transpose() {
        let base = UniformTree::new(3, 4, 9).with_shape(Shape::Lattice);
        let mut a = base.clone();
        a.play_all(vec![0, 2]).unwrap();
        let mut b = base.clone();
        b.play_all(vec![2, 0]).unwrap();
        assert_eq!(a.position_key(), b.position_key());
        assert_eq!(a.score(), b.score());
    }

    #[test]
    fn height_bounds_play() {
        let mut tree = UniformTree::new(2, 2, 0);
        tree.play_all(vec![1, 1]).unwrap();
        assert!(tree.is_terminal());
        assert!(tree.legal_moves().is_empty());
        assert!(tree.apply(0).is_err());
        tree.undo(());
        assert_eq!(tree.ply(), 1);
        assert_eq!(tree.to_act(), 1);
    }

    #[test]
    fn spread_bounds_scores() {
        let tree = UniformTree::new(4, 3, 5).with_spread(1);
        for m in 0..4 {
            let s = tree.after(m).unwrap().score();
            assert!(s >= -1 && s <= 1);
        }
    }
}
