use gameai::cache::Cache;
use gameai::game::coins::LastCoinStanding;
use gameai::game::connectfour::ConnectFour;
use gameai::game::synthetic::UniformTree;
use gameai::solver::{id_solve, Outcome};
use gameai::strategies::{Negamax, NegamaxParams, Sss, SssParams};
use gameai::{Game, Strategy, LOSS_SCORE, WIN_SCORE};
use std::sync::Arc;

fn negamax<G: Game + Sync>(depth: usize) -> Negamax<G> {
    Negamax::new(NegamaxParams {
        depth,
        pruning: true,
        parallel: false,
    })
}

#[test]
fn twenty_five_coins_is_a_forced_loss() {
    let game = LastCoinStanding::new(25, 4);
    assert!(!game.mover_wins());

    let result = negamax::<LastCoinStanding>(10).search(&game).unwrap();
    assert_eq!(result.score, LOSS_SCORE);

    let cache = Arc::new(Cache::<LastCoinStanding>::new());
    let solution = id_solve(&game, 1..20, WIN_SCORE, cache).unwrap();
    assert_eq!(solution.outcome, Outcome::Loss);
}

#[test]
fn thirty_coins_follow_the_same_rule() {
    // 30 is a multiple of 5 too, so the mover cannot force a win.
    let game = LastCoinStanding::default();
    let cache = Arc::new(Cache::<LastCoinStanding>::new());
    let solution = id_solve(&game, 1..20, WIN_SCORE, cache).unwrap();
    assert_eq!(solution.outcome, Outcome::Loss);
}

#[test]
fn twenty_nine_coins_is_won_by_leaving_twenty_five() {
    let game = LastCoinStanding::new(29, 4);
    assert!(game.mover_wins());

    let result = negamax::<LastCoinStanding>(11).search(&game).unwrap();
    assert_eq!(result.score, WIN_SCORE);
    assert_eq!(result.best_move, Some(4));

    let cache = Arc::new(Cache::<LastCoinStanding>::new());
    let solution = id_solve(&game, 1..20, WIN_SCORE, cache).unwrap();
    assert_eq!(solution.outcome, Outcome::Win);
    assert_eq!(solution.best_move, Some(4));
}

#[test]
fn empty_connect_four_board_at_depth_one() {
    let game = ConnectFour::default();
    let result = negamax::<ConnectFour>(1).search(&game).unwrap();
    assert_eq!(result.score, 0);
    assert_eq!(result.best_move, Some(0));

    let mut sss = Sss::<ConnectFour>::new(SssParams { depth: 1 });
    let result = sss.search(&game).unwrap();
    assert_eq!(result.score, 0);
    assert_eq!(result.best_move, Some(0));
}

#[test]
fn connect_four_cache_is_transparent() {
    let mut game = ConnectFour::default();
    game.play_all(vec![3, 3, 2, 4]).unwrap();
    let plain = negamax::<ConnectFour>(4).search(&game).unwrap();

    let cache = Arc::new(Cache::<ConnectFour>::new());
    let mut cached: Negamax<ConnectFour, _> = Negamax::with_cache(
        NegamaxParams {
            depth: 4,
            pruning: true,
            parallel: false,
        },
        Arc::clone(&cache),
    );
    assert_eq!(cached.search(&game).unwrap(), plain);
    assert!(cached.stats().cache_hits > 0);
}

#[test]
fn connect_four_blocks_an_open_three() {
    let mut game = ConnectFour::default();
    // Red builds 0, 1, 2 on the bottom row while black stacks column 6.
    game.play_all(vec![0, 6, 1, 6, 2]).unwrap();
    assert_eq!(negamax::<ConnectFour>(2).decide(&game).unwrap(), 3);
    let mut sss = Sss::<ConnectFour>::new(SssParams { depth: 2 });
    assert_eq!(sss.decide(&game).unwrap(), 3);
}

#[test]
fn one_ply_above_a_loss_is_a_win() {
    let mut game = LastCoinStanding::new(1, 4);
    let undo = game.apply(1).unwrap();
    assert_eq!(game.score(), LOSS_SCORE);
    game.undo(undo);

    let result = negamax::<LastCoinStanding>(1).search(&game).unwrap();
    assert_eq!(result.score, -LOSS_SCORE);
}

#[test]
fn sss_never_evaluates_more_leaves_than_exhaustive_search() {
    let game = UniformTree::new(3, 5, 2024).with_spread(50);
    let mut exhaustive: Negamax<UniformTree> = Negamax::new(NegamaxParams {
        depth: 5,
        pruning: false,
        parallel: false,
    });
    let exact = exhaustive.search(&game).unwrap();
    let mut sss = Sss::new(SssParams { depth: 5 });
    let best_first = sss.search(&game).unwrap();
    assert_eq!(best_first.score, exact.score);
    assert!(sss.stats().evaluations < exhaustive.stats().evaluations);
}
