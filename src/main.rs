use anyhow::{bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use gameai::config::{EngineConfig, StrategyConfig};
use gameai::game::coins::LastCoinStanding;
use gameai::game::connectfour::{Color, ConnectFour};
use gameai::runner::{AIPlayer, HumanPlayer, Runner};
use gameai::solver::{id_solve, Outcome};
use gameai::strategies::{Negamax, NegamaxParams, Sss, SssParams};
use gameai::{Cache, WIN_SCORE};

fn depth_arg() -> Arg {
    Arg::new("depth")
        .short('d')
        .long("depth")
        .value_name("UINT")
        .help("How many plies the computer searches ahead.")
        .value_parser(value_parser!(usize))
}

fn cli() -> Command {
    Command::new("gameai")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Adversarial search for two player games")
        .subcommand_required(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log every search at debug level."),
        )
        .subcommand(
            Command::new("play")
                .about("Play connect four against the computer")
                .arg(
                    Arg::new("strategy")
                        .short('s')
                        .long("strategy")
                        .value_parser(["negamax", "sss", "greedy"])
                        .help("Search algorithm the computer uses."),
                )
                .arg(depth_arg())
                .arg(
                    Arg::new("no-pruning")
                        .long("no-pruning")
                        .action(ArgAction::SetTrue)
                        .help("Disable alpha-beta pruning (negamax only)."),
                )
                .arg(
                    Arg::new("no-cache")
                        .long("no-cache")
                        .action(ArgAction::SetTrue)
                        .help("Disable the transposition cache (negamax only)."),
                )
                .arg(
                    Arg::new("parallel")
                        .long("parallel")
                        .action(ArgAction::SetTrue)
                        .help("Search root moves on all cores."),
                )
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .value_name("FILE")
                        .help("JSON engine configuration; flags override it."),
                ),
        )
        .subcommand(
            Command::new("duel")
                .about("Watch negamax play SSS* at connect four")
                .arg(depth_arg().default_value("5")),
        )
        .subcommand(
            Command::new("solve")
                .about("Solve last coin standing by iterative deepening")
                .arg(
                    Arg::new("coins")
                        .long("coins")
                        .value_name("UINT")
                        .default_value("30")
                        .value_parser(value_parser!(u32)),
                )
                .arg(
                    Arg::new("max-take")
                        .long("max-take")
                        .value_name("UINT")
                        .default_value("4")
                        .value_parser(value_parser!(u32)),
                )
                .arg(
                    Arg::new("min-depth")
                        .long("min-depth")
                        .value_name("UINT")
                        .default_value("2")
                        .value_parser(value_parser!(usize)),
                )
                .arg(
                    Arg::new("max-depth")
                        .long("max-depth")
                        .value_name("UINT")
                        .default_value("20")
                        .value_parser(value_parser!(usize)),
                )
                .arg(
                    Arg::new("play")
                        .long("play")
                        .action(ArgAction::SetTrue)
                        .help("Play the solved game against the computer."),
                ),
        )
}

fn engine_config(matches: &ArgMatches) -> Result<EngineConfig> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("could not load config from {}", path))?,
        None => EngineConfig::default(),
    };
    if let Some(name) = matches.get_one::<String>("strategy") {
        config.strategy = StrategyConfig::named(name)?;
    }
    if let Some(&depth) = matches.get_one::<usize>("depth") {
        config.strategy.set_depth(depth);
    }
    if matches.get_flag("no-pruning") {
        config.strategy.disable_pruning();
    }
    if matches.get_flag("no-cache") {
        config.strategy.disable_cache();
    }
    if matches.get_flag("parallel") {
        config.strategy.set_parallel();
    }
    config.validate()?;
    Ok(config)
}

fn play(matches: &ArgMatches) -> Result<()> {
    let config = engine_config(matches)?;
    info!(strategy = ?config.strategy, "starting connect four");

    let mut human = HumanPlayer::new("Human");
    let mut computer = config.strategy.computer::<ConnectFour>("Computer");
    let board = ConnectFour::new(Color::R);
    let mut runner = match config.first_player_human {
        Some(true) => Runner::new(board, &mut human, &mut *computer),
        Some(false) => Runner::new(board, &mut *computer, &mut human),
        None => {
            println!("Flipping to see who starts...");
            Runner::with_random_order(board, &mut human, &mut *computer)
        }
    };
    runner.run()?;
    Ok(())
}

fn duel(matches: &ArgMatches) -> Result<()> {
    let depth = matches.get_one::<usize>("depth").copied().unwrap_or(5);
    if depth == 0 {
        bail!("search depth must be at least 1");
    }
    let cache = Arc::new(Cache::<ConnectFour>::new());
    let mut negamax = AIPlayer::new(
        "Negamax",
        Negamax::<ConnectFour, _>::with_cache(
            NegamaxParams {
                depth,
                pruning: true,
                parallel: false,
            },
            cache,
        ),
    );
    let mut sss = AIPlayer::new("SSS*", Sss::<ConnectFour>::new(SssParams { depth }));
    let mut runner = Runner::new(ConnectFour::new(Color::R), &mut negamax, &mut sss);
    runner.run()?;
    Ok(())
}

fn solve(matches: &ArgMatches) -> Result<()> {
    let coins = matches.get_one::<u32>("coins").copied().unwrap_or(30);
    let max_take = matches.get_one::<u32>("max-take").copied().unwrap_or(4);
    let min_depth = matches.get_one::<usize>("min-depth").copied().unwrap_or(2);
    let max_depth = matches.get_one::<usize>("max-depth").copied().unwrap_or(20);
    if max_take == 0 {
        bail!("players must be allowed to take at least one coin");
    }
    if min_depth == 0 || min_depth >= max_depth {
        bail!("need 1 <= min-depth < max-depth, got {}..{}", min_depth, max_depth);
    }

    let game = LastCoinStanding::new(coins, max_take);
    let cache = Arc::new(Cache::<LastCoinStanding>::new());
    let solution = id_solve(&game, min_depth..max_depth, WIN_SCORE, Arc::clone(&cache))?;
    let verdict = match solution.outcome {
        Outcome::Win => "a forced win",
        Outcome::Loss => "a forced loss",
        Outcome::Unknown => "not proven either way",
    };
    println!(
        "{} coins: {} for the first player (depth {}, best move {:?})",
        coins, verdict, solution.depth, solution.best_move
    );

    if matches.get_flag("play") {
        let mut computer = AIPlayer::new(
            "Computer",
            Negamax::<LastCoinStanding, _>::with_cache(
                NegamaxParams {
                    depth: solution.depth,
                    pruning: true,
                    parallel: false,
                },
                cache,
            ),
        );
        let mut human = HumanPlayer::new("Human");
        let mut runner = Runner::new(game, &mut computer, &mut human);
        runner.run()?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let matches = cli().get_matches();

    let default_level = if matches.get_flag("verbose") {
        "debug"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match matches.subcommand() {
        Some(("play", sub)) => play(sub),
        Some(("duel", sub)) => duel(sub),
        Some(("solve", sub)) => solve(sub),
        _ => unreachable!("a subcommand is required"),
    }
}
