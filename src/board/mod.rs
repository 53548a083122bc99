// Copyright 2026 Tobin Edwards
//
//    Licensed under the Apache License, Version 2.0 (the "License");
//    you may not use this file except in compliance with the License.
//    You may obtain a copy of the License at
//
//        http://www.apache.org/licenses/LICENSE-2.0
//
//    Unless required by applicable law or agreed to in writing, software
//    distributed under the License is distributed on an "AS IS" BASIS,
//    WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//    See the License for the specific language governing permissions and
//    limitations under the License.

//! Janggi board and rule engine
//!
//! A _board_ holds the state of a game of Janggi and enforces its rules.
//! The following features are supported:
//!
//! [x] Move generation for all seven pieces, palace diagonals included
//! [x] Check and checkmate detection
//! [x] Rejecting moves that leave the mover's own general in check
//! [x] Passing (only when not in check)
//! [x] Previewing a move and rolling it back
//! [x] Move history, replay and serializable game records
//! [ ] Bikjang (facing generals) scoring
//! [ ] Repetition rules
//! [ ] Time Controls
//!
//! Some of the key abstractions include:
//!
//! * A `Square` names one of the 90 intersections of the 10-by-9 board.
//!   Files run `FileA` .. `FileI` from left to right and ranks run `Rank1`
//!   .. `Rank10` from top to bottom, so squares are named `A1` .. `I10`.
//!   Red starts on ranks 1-4 and blue on ranks 7-10.
//!
//! * A `Mask` is a 90-bit set of squares stored in a `u128`. Masks are
//!   combined with `|`, `&` and `!` and iterate in square order.
//!
//! * `Material` is a `Piece` of a specific `Color`. There are seven pieces:
//!   `General`, `Guard`, `Elephant`, `Horse`, `Chariot`, `Cannon` and
//!   `Soldier`.
//!
//! * A `Position` holds the contents of every square. The `Pos` trait
//!   provides read-only queries and `PseudoMoves` builds move generation
//!   and check detection on top of it.
//!
//! * `TrialState` wraps a position with at most one saved snapshot so a
//!   move can be applied and later rolled back exactly. Checkmate detection
//!   tries every candidate move this way.
//!
//! * `PlayState` is the game state machine: whose turn it is, whether the
//!   game is over, and the moves played so far. `Board` is the public face
//!   of it, accepting squares either typed or as strings like `"e9"`.
//!

use anyhow::Result;
use log::debug;
use std::fmt;
use std::ops::Index;

mod material;
mod moves;
mod palace;
mod play;
mod position;
mod square;
mod trial;

pub use material::*;
pub use moves::*;
pub use palace::*;
pub use play::*;
pub use position::*;
pub use square::*;
pub use trial::*;

use crate::game::{GameId, GameRecord, GameState};

pub trait Turn {
    fn turn(&self) -> Color;
}

#[derive(Debug, Clone, Default)]
pub struct Board {
    state: PlayState,
}

impl Board {
    /// A new game from the opening layout, blue to move.
    pub fn new() -> Self {
        Self::default()
    }

    /// A game starting from an arbitrary position.
    pub fn from_position(position: Position, turn: Color) -> Self {
        Self {
            state: PlayState::from_position(position, turn),
        }
    }

    /// Reconstruct a board by replaying a sequence of moves from the
    /// opening layout.
    pub fn replay(moves: &[Move]) -> Result<Self> {
        let mut board = Self::new();
        for mv in moves {
            board.submit_move(*mv)?;
        }
        Ok(board)
    }

    pub fn record(&self, id: GameId) -> GameRecord {
        GameRecord {
            id,
            moves: self.history().to_vec(),
            state: self.game_state(),
        }
    }

    #[inline]
    pub fn game_state(&self) -> GameState {
        self.state.status()
    }

    #[inline]
    pub fn history(&self) -> &[Move] {
        self.state.history()
    }

    #[inline]
    pub fn position(&self) -> &Position {
        self.as_ref()
    }

    /// Only meaningful when `color` is in check.
    pub fn is_in_checkmate(&self, color: Color) -> bool {
        self.state.is_in_checkmate(color)
    }

    pub fn legal_destinations(&self, from: Square) -> Mask {
        self.state.legal_destinations(from)
    }

    /// Pseudo-legal destinations of the piece on `from`, by name. Empty for
    /// a vacant or malformed square.
    pub fn list_moves(&self, from: &str) -> Vec<String> {
        match Square::try_from_string(from) {
            Some(square) => self
                .destinations(square)
                .iter()
                .map(|to| to.to_string())
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn submit_move(&mut self, mv: Move) -> Result<()> {
        self.state.submit_move(mv)
    }

    /// Plays a move given by square names. Returns false, changing nothing,
    /// if the names are malformed or the move is not legal.
    pub fn make_move(&mut self, from: &str, to: &str) -> bool {
        match Move::from_strings(from, to) {
            Ok(mv) => self.submit_move(mv).is_ok(),
            Err(err) => {
                debug!("move {from}-{to} rejected: {err}");
                false
            }
        }
    }

    pub fn preview_move(&mut self, mv: Move) {
        self.state.preview_move(mv)
    }

    /// Previews a move given by square names. Must be followed by
    /// `restore_board` unless the move is then played with `make_move`.
    pub fn try_move(&mut self, from: &str, to: &str) -> bool {
        match Move::from_strings(from, to) {
            Ok(mv) => {
                self.preview_move(mv);
                true
            }
            Err(_) => false,
        }
    }

    pub fn restore_board(&mut self) {
        self.state.restore_board()
    }
}

impl Turn for Board {
    #[inline]
    fn turn(&self) -> Color {
        self.state.turn()
    }
}

impl AsRef<Position> for Board {
    fn as_ref(&self) -> &Position {
        self.state.as_ref()
    }
}

impl Pos for Board {}

impl Index<Square> for Board {
    type Output = Option<Material>;
    fn index(&self, index: Square) -> &Self::Output {
        self.contents(index)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.position())?;
        writeln!(f, "turn: {}, state: {}", self.turn(), self.game_state())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use Square::*;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn test_opening_move_out_of_turn() {
        init_logger();
        let mut board = Board::new();
        assert!(!board.make_move("c1", "e3"));
        assert_eq!(board.position(), &Position::new());
        assert_eq!(board.turn(), Color::Blue);
    }

    #[test]
    fn test_legal_opening_move() {
        init_logger();
        let mut board = Board::new();
        assert!(board.make_move("a7", "b7"));
        assert_eq!(board.turn(), Color::Red);
        assert_eq!(board.game_state(), GameState::Unfinished);
        assert_eq!(board[B7], Some(Material::BP));
    }

    #[test]
    fn test_opening_sequence() {
        init_logger();
        let mut board = Board::new();
        assert!(board.make_move("a7", "b7"));
        assert!(board.make_move("a4", "a5"));
        assert!(board.make_move("b10", "d7"));
        // the soldier on b7 screens only the blue cannon behind it
        assert!(!board.make_move("b3", "b6"));
        assert!(board.make_move("a4", "a4"));
        assert_eq!(board.turn(), Color::Blue);
        assert_eq!(board.history().len(), 4);
    }

    #[test]
    fn test_malformed_squares() {
        init_logger();
        let mut board = Board::new();
        for (from, to) in [("a0", "a1"), ("j7", "j6"), ("A7", "B7"), ("a7", "b11"), ("", "b7")] {
            assert!(!board.make_move(from, to), "{from}-{to}");
            assert!(!board.try_move(from, to), "{from}-{to}");
        }
        assert!(board.list_moves("k1").is_empty());
        assert!(board.list_moves("e5").is_empty());
        assert_eq!(board.position(), &Position::new());
        assert!(board.history().is_empty());
    }

    #[test]
    fn test_list_moves() {
        let board = Board::new();
        assert_eq!(board.list_moves("a7"), vec!["a6", "b7"]);
        assert_eq!(board.list_moves("c1"), vec!["d3"]);
        assert_eq!(board.list_moves("h10"), vec!["g8", "i8"]);
        assert!(board.list_moves("b3").is_empty());
    }

    #[test]
    fn test_try_move_and_restore() {
        let mut board = Board::new();
        assert!(board.try_move("e7", "e6"));
        assert_eq!(board[E6], Some(Material::BP));
        assert_eq!(board.turn(), Color::Blue);
        board.restore_board();
        assert_eq!(board.position(), &Position::new());
    }

    #[test]
    fn test_self_check_changes_nothing() {
        init_logger();
        let position = Position::empty()
            .set_contents(E9, Some(Material::BK))
            .set_contents(E8, Some(Material::BA))
            .set_contents(E4, Some(Material::RR))
            .set_contents(E2, Some(Material::RK));
        let mut board = Board::from_position(position.clone(), Color::Blue);
        assert!(!board.make_move("e8", "d8"));
        assert_eq!(board.position(), &position);
        assert_eq!(board.turn(), Color::Blue);
        assert_eq!(board.game_state(), GameState::Unfinished);
        assert!(board.legal_destinations(E8).is_empty());
        assert_eq!(board.legal_destinations(E9).len(), 7);
    }

    #[test]
    fn test_pass_only_out_of_check() {
        init_logger();
        let position = Position::empty()
            .set_contents(E9, Some(Material::BK))
            .set_contents(E5, Some(Material::RR))
            .set_contents(E2, Some(Material::RK));
        let mut board = Board::from_position(position, Color::Blue);
        assert!(board.is_in_check(Color::Blue));
        assert!(!board.make_move("e9", "e9"));
        assert!(board.make_move("e9", "d9"));
        assert!(board.make_move("e2", "e2"));
        assert_eq!(board.turn(), Color::Blue);
    }

    #[test]
    fn test_checkmate_ends_the_game() {
        init_logger();
        let position = Position::empty()
            .set_contents(E10, Some(Material::BK))
            .set_contents(A9, Some(Material::RR))
            .set_contents(B8, Some(Material::RR))
            .set_contents(E2, Some(Material::RK));
        let mut board = Board::from_position(position, Color::Red);
        assert!(board.make_move("b8", "b10"));
        assert!(board.is_in_check(Color::Blue));
        assert!(board.is_in_checkmate(Color::Blue));
        assert_eq!(board.game_state(), GameState::RedWon);
        assert_eq!(board.turn(), Color::Blue);
        assert!(!board.make_move("e10", "f10"));
        assert!(!board.make_move("e10", "e10"));
        assert_eq!(board.history(), &[Move::new(B8, B10)]);
    }

    #[test]
    fn test_replay_and_record() {
        let moves = [Move::new(A7, B7), Move::new(A4, A5), Move::pass(E9)];
        let board = Board::replay(&moves).unwrap();
        assert_eq!(board.turn(), Color::Red);
        let record = board.record(GameId::new(1));
        assert_eq!(record.moves, moves.to_vec());
        assert_eq!(record.state, GameState::Unfinished);

        let json = serde_json::to_string(&record).unwrap();
        let record: GameRecord = serde_json::from_str(&json).unwrap();
        let replayed = Board::replay(&record.moves).unwrap();
        assert_eq!(replayed.position(), board.position());

        assert!(Board::replay(&[Move::new(C1, E3)]).is_err());
    }

    #[test]
    fn test_display() {
        let mut board = Board::new();
        assert!(board.make_move("a7", "b7"));
        let text = board.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 12);
        assert_eq!(lines[0], "    a b c d e f g h i");
        assert_eq!(lines[1], "  1 r e h a . a e h r");
        assert_eq!(lines[7], "  7 . P P . P . P . P");
        assert_eq!(lines[11], "turn: red, state: UNFINISHED");
    }
}
