use gameai::cache::Cache;
use gameai::game::synthetic::{Shape, UniformTree};
use gameai::strategies::{
    Negamax, NegamaxParams, SearchResult, Sss, SssParams, Strategy as SearchStrategy,
    StubbornGreedy, StubbornGreedyParams,
};
use proptest::prelude::*;
use std::sync::Arc;

fn negamax_params(depth: usize, pruning: bool) -> NegamaxParams {
    NegamaxParams {
        depth,
        pruning,
        parallel: false,
    }
}

fn plain(game: &UniformTree, depth: usize, pruning: bool) -> SearchResult<u8> {
    let mut strategy: Negamax<UniformTree> = Negamax::new(negamax_params(depth, pruning));
    strategy.search(game).unwrap()
}

fn cached(game: &UniformTree, depth: usize, pruning: bool) -> SearchResult<u8> {
    let cache = Arc::new(Cache::<UniformTree>::new());
    let mut strategy: Negamax<UniformTree, _> =
        Negamax::with_cache(negamax_params(depth, pruning), cache);
    strategy.search(game).unwrap()
}

/// Small trees with few distinct scores, so ties are common.
fn small_tree() -> impl Strategy<Value = (UniformTree, usize)> {
    (2u8..=4, 1usize..=5, any::<u64>(), 0i32..=6, any::<bool>()).prop_flat_map(
        |(branching, height, seed, spread, lattice)| {
            let shape = if lattice { Shape::Lattice } else { Shape::Tree };
            let tree = UniformTree::new(branching, height, seed)
                .with_spread(spread)
                .with_shape(shape);
            (Just(tree), 1..=height)
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn sss_agrees_with_exhaustive_negamax((game, depth) in small_tree()) {
        let exact = plain(&game, depth, false);
        game.reset_evaluations();
        let mut sss = Sss::new(SssParams { depth });
        let best_first = sss.search(&game).unwrap();
        prop_assert_eq!(best_first.score, exact.score);
        prop_assert_eq!(best_first.best_move, exact.best_move);
        prop_assert!(game.evaluations() <= game.branching().pow(depth as u32));
    }

    #[test]
    fn pruning_never_changes_the_answer((game, depth) in small_tree()) {
        prop_assert_eq!(plain(&game, depth, true), plain(&game, depth, false));
    }

    #[test]
    fn cache_never_changes_the_answer((game, depth) in small_tree(), pruning in any::<bool>()) {
        let without = plain(&game, depth, pruning);
        let with = cached(&game, depth, pruning);
        prop_assert_eq!(with.score, without.score);
        prop_assert_eq!(with.best_move, without.best_move);
    }

    #[test]
    fn parallel_root_never_changes_the_answer((game, depth) in small_tree()) {
        let mut parallel: Negamax<UniformTree> = Negamax::new(NegamaxParams {
            parallel: true,
            ..negamax_params(depth, true)
        });
        prop_assert_eq!(parallel.search(&game).unwrap(), plain(&game, depth, true));
    }

    #[test]
    fn repeated_searches_are_byte_identical((game, depth) in small_tree()) {
        let first = bincode::serialize(&cached(&game, depth, true)).unwrap();
        let second = bincode::serialize(&cached(&game, depth, true)).unwrap();
        prop_assert_eq!(first, second);

        let mut sss = Sss::new(SssParams { depth });
        let a = bincode::serialize(&sss.search(&game).unwrap()).unwrap();
        let b = bincode::serialize(&sss.search(&game).unwrap()).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn stubborn_greedy_stays_within_its_cost_bound(
        branching in 1u8..=6,
        depth in 1usize..=16,
        seed in any::<u64>(),
    ) {
        let game = UniformTree::new(branching, 32, seed);
        let mut greedy = StubbornGreedy::<UniformTree>::new(StubbornGreedyParams {
            depth,
            parallel: false,
        });
        greedy.search(&game).unwrap();
        let n = branching as usize;
        prop_assert!(game.evaluations() <= n + n * n * depth);
    }
}
