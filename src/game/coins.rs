//! Last coin standing: players alternately take coins off a stack and
//! whoever takes the last coin wins.
use super::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_COINS: u32 = 30;
pub const DEFAULT_MAX_TAKE: u32 = 4;

#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Player {
    One,
    Two,
}

impl Player {
    fn other(&self) -> Self {
        match *self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Player::One => write!(f, "Player 1"),
            Player::Two => write!(f, "Player 2"),
        }
    }
}

#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct LastCoinStanding {
    coins: u32,
    max_take: u32,
    to_act: Player,
}

impl Default for LastCoinStanding {
    fn default() -> Self {
        LastCoinStanding::new(DEFAULT_COINS, DEFAULT_MAX_TAKE)
    }
}

impl LastCoinStanding {
    pub fn new(coins: u32, max_take: u32) -> Self {
        LastCoinStanding {
            coins,
            max_take: max_take.max(1),
            to_act: Player::One,
        }
    }

    pub fn coins(&self) -> u32 {
        self.coins
    }

    pub fn max_take(&self) -> u32 {
        self.max_take
    }

    /// Whether the player to move can force a win with perfect play.
    pub fn mover_wins(&self) -> bool {
        self.coins % (self.max_take + 1) != 0
    }
}

impl fmt::Display for LastCoinStanding {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{} coins left on the stack", self.coins)
    }
}

impl ParseGame for LastCoinStanding {
    fn parse_move(&self, input: &str) -> Option<Self::Move> {
        u32::from_str(input).ok()
    }
}

impl Game for LastCoinStanding {
    type Move = u32;
    type Agent = Player;
    type Undo = u32;

    fn to_act(&self) -> Self::Agent {
        self.to_act
    }

    fn agent_index(&self, p: &Self::Agent) -> usize {
        match *p {
            Player::One => 0,
            Player::Two => 1,
        }
    }

    fn legal_moves(&self) -> Vec<Self::Move> {
        (1..=self.max_take.min(self.coins)).collect()
    }

    fn move_valid(&self, &take: &Self::Move) -> bool {
        take >= 1 && take <= self.max_take && take <= self.coins
    }

    fn apply(&mut self, take: Self::Move) -> Result<Self::Undo> {
        check_move(self, &take)?;
        self.coins -= take;
        self.to_act = self.to_act.other();
        Ok(take)
    }

    fn undo(&mut self, take: Self::Undo) {
        self.coins += take;
        self.to_act = self.to_act.other();
    }

    fn is_terminal(&self) -> bool {
        self.coins == 0
    }

    fn score(&self) -> Score {
        if self.coins == 0 {
            LOSS_SCORE
        } else {
            0
        }
    }

    fn winner(&self) -> Option<Self::Agent> {
        if self.coins == 0 {
            Some(self.to_act.other())
        } else {
            None
        }
    }
}

impl Transposable for LastCoinStanding {
    type Key = u32;

    fn position_key(&self) -> Self::Key {
        self.coins
    }
}
