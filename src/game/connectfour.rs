use self::Color::*;
use self::Slot::*;
use super::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const HEIGHT: usize = 6;
pub const WIDTH: usize = 7;
const NEEDED: usize = 4;

#[derive(Serialize, Deserialize, Clone, Copy, PartialOrd, PartialEq, Hash, Debug, Ord, Eq)]
pub enum Color {
    R,
    B,
}

impl Color {
    fn flip(&self) -> Color {
        match *self {
            R => B,
            B => R,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum Slot {
    Empty,
    Full(Color),
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match *self {
                Color::R => "X",
                Color::B => "@",
            }
        )
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Empty => write!(f, " "),
            Full(c) => write!(f, "{}", c),
        }
    }
}

// board[0] is the bottom row.
#[derive(Serialize, Deserialize, Clone, Hash, Debug, PartialEq, Eq)]
struct C4Board {
    board: [[Slot; WIDTH]; HEIGHT],
}

impl C4Board {
    fn get(&self, i: usize, j: usize) -> Slot {
        self.board[i][j]
    }

    fn set(&mut self, i: usize, j: usize, slot: Slot) {
        self.board[i][j] = slot;
    }

    /// Row the next piece dropped into `col` lands on.
    fn landing_row(&self, col: usize) -> Option<usize> {
        (0..HEIGHT).find(|&i| self.get(i, col) == Empty)
    }

    fn is_full(&self) -> bool {
        self.board[HEIGHT - 1].iter().all(|s| *s != Empty)
    }

    fn num_pieces(&self) -> usize {
        self.board
            .iter()
            .flat_map(|row| row.iter())
            .filter(|s| **s != Empty)
            .count()
    }
}

impl fmt::Display for C4Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let dashes: String = (0..WIDTH * 3).map(|_| "-").collect();
        for row in self.board.iter().rev() {
            write!(f, "|")?;
            for slot in row.iter() {
                write!(f, " {} ", slot)?;
            }
            writeln!(f, "|")?;
        }
        writeln!(f, "|{}|", dashes.as_str())?;
        write!(f, " ")?;
        for i in 0..WIDTH {
            write!(f, " {} ", i + 1)?;
        }
        writeln!(f, " ")
    }
}

#[derive(Serialize, Deserialize, Hash, Clone, Debug, PartialEq, Eq)]
pub struct ConnectFour {
    state: C4Board,
    to_act: Color,
    first: Color,
    winner: Option<Color>,
}

impl Default for ConnectFour {
    fn default() -> Self {
        ConnectFour::new(R)
    }
}

impl ConnectFour {
    pub fn new(start: Color) -> Self {
        ConnectFour {
            state: C4Board {
                board: [[Empty; WIDTH]; HEIGHT],
            },
            to_act: start,
            first: start,
            winner: None,
        }
    }

    pub fn num_pieces(&self) -> usize {
        self.state.num_pieces()
    }

    pub fn has_won(&self, color: Color) -> bool {
        let color = Full(color);
        // get(column, row)
        let get = |i: usize, j: usize| self.state.get(j, i);

        // vertical
        for j in 0..HEIGHT - (NEEDED - 1) {
            for i in 0..WIDTH {
                if (0..NEEDED).all(|k| get(i, j + k) == color) {
                    return true;
                }
            }
        }
        // horizontal
        for i in 0..WIDTH - (NEEDED - 1) {
            for j in 0..HEIGHT {
                if (0..NEEDED).all(|k| get(i + k, j) == color) {
                    return true;
                }
            }
        }
        // ascending diagonal
        for i in 0..WIDTH - (NEEDED - 1) {
            for j in 0..HEIGHT - (NEEDED - 1) {
                if (0..NEEDED).all(|k| get(i + k, j + k) == color) {
                    return true;
                }
            }
        }
        // descending diagonal
        for i in 0..WIDTH - (NEEDED - 1) {
            for j in (NEEDED - 1)..HEIGHT {
                if (0..NEEDED).all(|k| get(i + k, j - k) == color) {
                    return true;
                }
            }
        }
        false
    }
}

impl fmt::Display for ConnectFour {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Acting: {}", self.to_act)?;
        writeln!(f, "{}", self.state)
    }
}

impl ParseGame for ConnectFour {
    fn parse_move(&self, input: &str) -> Option<Self::Move> {
        usize::from_str(input)
            .ok()
            .and_then(|n| n.checked_sub(1))
    }
}

impl Game for ConnectFour {
    type Move = usize;
    type Agent = Color;
    type Undo = usize;

    fn to_act(&self) -> Self::Agent {
        self.to_act
    }

    fn agent_index(&self, a: &Self::Agent) -> usize {
        if *a == self.first {
            0
        } else {
            1
        }
    }

    fn legal_moves(&self) -> Vec<Self::Move> {
        if self.winner.is_some() {
            return vec![];
        }
        (0..WIDTH)
            .filter(|&j| self.state.get(HEIGHT - 1, j) == Empty)
            .collect()
    }

    fn move_valid(&self, &col: &Self::Move) -> bool {
        col < WIDTH && self.winner.is_none() && self.state.get(HEIGHT - 1, col) == Empty
    }

    fn apply(&mut self, col: Self::Move) -> Result<Self::Undo> {
        check_move(self, &col)?;
        let row = self
            .state
            .landing_row(col)
            .ok_or_else(|| Error::invalid_move(&col))?;
        let color = self.to_act;
        self.state.set(row, col, Full(color));
        if self.has_won(color) {
            self.winner = Some(color);
        }
        self.to_act = color.flip();
        Ok(col)
    }

    fn undo(&mut self, col: Self::Undo) {
        if let Some(row) = (0..HEIGHT).rev().find(|&i| self.state.get(i, col) != Empty) {
            self.state.set(row, col, Empty);
            self.to_act = self.to_act.flip();
            // Moves are never legal after a win, so the undone move made it.
            self.winner = None;
        }
    }

    fn is_terminal(&self) -> bool {
        self.winner.is_some() || self.state.is_full()
    }

    fn score(&self) -> Score {
        match self.winner {
            Some(_) => LOSS_SCORE,
            None => 0,
        }
    }

    fn winner(&self) -> Option<Self::Agent> {
        self.winner
    }
}

impl Transposable for ConnectFour {
    type Key = ConnectFour;

    fn position_key(&self) -> Self::Key {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn played(moves: &[usize]) -> ConnectFour {
        let mut game = ConnectFour::default();
        game.play_all(moves.iter().cloned()).unwrap();
        game
    }

    #[test]
    fn empty_board_allows_every_column() {
        let game = ConnectFour::default();
        assert_eq!(game.legal_moves(), (0..WIDTH).collect::<Vec<_>>());
        assert!(!game.is_terminal());
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn vertical_four_wins() {
        let game = played(&[0, 1, 0, 1, 0, 1, 0]);
        assert_eq!(game.winner(), Some(R));
        assert!(game.is_terminal());
        assert_eq!(game.to_act(), B);
        assert_eq!(game.score(), LOSS_SCORE);
        assert!(game.legal_moves().is_empty());
    }

    #[test]
    fn horizontal_four_wins() {
        let game = played(&[0, 0, 1, 1, 2, 2, 3]);
        assert_eq!(game.winner(), Some(R));
    }

    #[test]
    fn diagonals_win() {
        // ascending: R at (0,0) (1,1) (2,2) (3,3)
        let game = played(&[0, 1, 1, 2, 2, 3, 2, 3, 3, 6, 3]);
        assert_eq!(game.winner(), Some(R));
        // descending: R at (3,0) (2,1) (1,2) (0,3)
        let game = played(&[3, 2, 2, 1, 1, 0, 1, 0, 0, 6, 0]);
        assert_eq!(game.winner(), Some(R));
    }

    #[test]
    fn full_column_is_rejected() {
        let mut game = played(&[2, 2, 2, 2, 2, 2]);
        assert!(!game.move_valid(&2));
        assert!(!game.legal_moves().contains(&2));
        match game.apply(2) {
            Err(Error::InvalidMove { .. }) => {}
            other => panic!("expected InvalidMove, got {:?}", other.map(|_| ())),
        }
        assert!(game.apply(WIDTH).is_err());
    }

    #[test]
    fn undo_restores_the_exact_state() {
        let mut game = played(&[0, 1, 0, 1, 0, 1]);
        let before = game.clone();
        let undo = game.apply(0).unwrap();
        assert!(game.winner().is_some());
        game.undo(undo);
        assert_eq!(game, before);
        assert_eq!(game.position_key(), before.position_key());
    }

    #[test]
    fn parse_move_is_one_based() {
        let game = ConnectFour::default();
        assert_eq!(game.parse_move("1"), Some(0));
        assert_eq!(game.parse_move("7"), Some(6));
        assert_eq!(game.parse_move("0"), None);
        assert_eq!(game.parse_move("x"), None);
    }

    #[test]
    fn agent_index_follows_the_first_player() {
        let game = ConnectFour::new(B);
        assert_eq!(game.agent_index(&B), 0);
        assert_eq!(game.agent_index(&R), 1);
    }
}
