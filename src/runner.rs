//! Console driver: alternates between two players until the game ends.

use crate::error::{Error, Result};
use crate::game::{Game, ParseGame};
use crate::strategies::Strategy;
use std::fmt;
use std::io::{self, BufRead};
use tracing::{debug, info};

pub trait Player<G: Game> {
    fn choose_move(&mut self, game: &G) -> Result<G::Move>;
    fn display_name(&self) -> &str;
    fn player_type(&self) -> &str;
    fn full_name(&self) -> String {
        format!("{} ({})", self.display_name(), self.player_type())
    }
}

pub struct HumanPlayer {
    name: String,
    input: Box<dyn BufRead>,
}

impl HumanPlayer {
    pub fn new(name: &str) -> Self {
        HumanPlayer::with_input(name, Box::new(io::BufReader::new(io::stdin())))
    }

    pub fn with_input(name: &str, input: Box<dyn BufRead>) -> Self {
        HumanPlayer {
            name: String::from(name),
            input,
        }
    }
}

impl<G> Player<G> for HumanPlayer
where
    G: ParseGame,
    G::Agent: fmt::Display,
{
    fn display_name(&self) -> &str {
        self.name.as_str()
    }

    fn player_type(&self) -> &str {
        "Human"
    }

    fn choose_move(&mut self, game: &G) -> Result<G::Move> {
        println!("{}'s move.", game.to_act());

        loop {
            println!("What is your move?");
            let mut choice = String::new();
            if self.input.read_line(&mut choice)? == 0 {
                return Err(Error::Io(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "input closed before a move was entered",
                )));
            }
            println!();

            let choice = match game.parse_move(choice.trim()) {
                Some(m) => m,
                None => continue,
            };

            if !game.move_valid(&choice) {
                println!("Invalid move..");
                continue;
            }

            return Ok(choice);
        }
    }
}

pub struct AIPlayer<S> {
    name: String,
    strategy: S,
}

impl<S> AIPlayer<S> {
    pub fn new(name: &str, strategy: S) -> Self {
        AIPlayer {
            name: String::from(name),
            strategy,
        }
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }
}

impl<G, S> Player<G> for AIPlayer<S>
where
    G: Game,
    S: Strategy<G>,
{
    fn display_name(&self) -> &str {
        self.name.as_str()
    }

    fn player_type(&self) -> &str {
        "Computer"
    }

    fn choose_move(&mut self, game: &G) -> Result<G::Move> {
        println!("Computer is thinking.....");
        let m = self.strategy.decide(game)?;
        info!(player = %self.name, chosen = ?m, nodes = self.strategy.stats().nodes, "computer moved");
        Ok(m)
    }
}

pub type Plr<'a, G> = &'a mut dyn Player<G>;

pub struct Runner<'a, G: Game> {
    board: G,
    players: (Plr<'a, G>, Plr<'a, G>),
}

impl<'a, G> Runner<'a, G>
where
    G: Game + fmt::Display,
    G::Agent: fmt::Display,
{
    /// `p1` moves whenever the first agent of `board` is to act.
    pub fn new(board: G, p1: Plr<'a, G>, p2: Plr<'a, G>) -> Self {
        Runner {
            board,
            players: (p1, p2),
        }
    }

    /// Like `new`, but a coin flip decides which player moves first.
    pub fn with_random_order(board: G, p1: Plr<'a, G>, p2: Plr<'a, G>) -> Self {
        if rand::random::<bool>() {
            Runner::new(board, p1, p2)
        } else {
            Runner::new(board, p2, p1)
        }
    }

    pub fn board(&self) -> &G {
        &self.board
    }

    fn init(&self) {
        println!("Player 1 is {}", self.players.0.full_name());
        println!("Player 2 is {}", self.players.1.full_name());
        println!("{} goes first!", self.board.to_act());
    }

    fn step(&mut self) -> Result<()> {
        println!("{}", self.board);
        let acting = self.board.to_act();
        let m = if self.board.agent_index(&acting) == 0 {
            self.players.0.choose_move(&self.board)?
        } else {
            self.players.1.choose_move(&self.board)?
        };
        debug!(agent = %acting, chosen = ?m, "applying move");
        self.board.play(m)
    }

    /// Plays to the end and returns the winner, or `None` for a draw.
    pub fn run(&mut self) -> Result<Option<G::Agent>> {
        self.init();
        while !self.board.is_terminal() {
            self.step()?;
        }
        println!("{}", self.board);

        let winner = self.board.winner();
        match winner {
            Some(w) => println!("Winner is: {}", w),
            None => println!("It's a draw."),
        }
        Ok(winner)
    }
}
