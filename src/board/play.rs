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

use anyhow::Result;
use log::{debug, info};
use std::ops::Index;

use super::material::{Color, Material};
use super::moves::{Move, MoveError, PseudoMoves};
use super::position::{Pos, Position};
use super::square::{Mask, Square};
use super::trial::TrialState;
use super::Turn;
use crate::game::GameState;

/// The game state machine: a position, the side to move, the game status
/// and the moves played so far.
///
/// A preview started with `preview_move` changes only the position. It is
/// rolled back before any move is submitted.
#[derive(Debug, Clone)]
pub struct PlayState {
    trial: TrialState,
    turn: Color,
    status: GameState,
    history: Vec<Move>,
}

impl Default for PlayState {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayState {
    /// The opening layout with blue to move.
    pub fn new() -> Self {
        Self::from_position(Position::new(), Color::Blue)
    }

    pub fn from_position(position: Position, turn: Color) -> Self {
        Self {
            trial: TrialState::new(position),
            turn,
            status: GameState::Unfinished,
            history: Vec::new(),
        }
    }

    #[inline]
    pub fn status(&self) -> GameState {
        self.status
    }

    #[inline]
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    #[inline]
    pub fn in_preview(&self) -> bool {
        self.trial.in_trial()
    }

    pub fn submit_move(&mut self, mv: Move) -> Result<()> {
        self.restore_board();
        if let Err(err) = self.apply_move(mv) {
            debug!("{} move {mv} rejected: {err}", self.turn);
            return Err(err.into());
        }
        info!("{} plays {mv}", self.turn);
        self.history.push(mv);
        self.turn = !self.turn;
        self.update_result();
        Ok(())
    }

    pub fn is_in_checkmate(&self, color: Color) -> bool {
        self.trial.is_in_checkmate(color)
    }

    pub fn legal_destinations(&self, from: Square) -> Mask {
        self.trial.legal_destinations(from)
    }

    /// Applies `mv` to the position without any legality checks, replacing
    /// any earlier preview. The turn and status are left alone.
    pub fn preview_move(&mut self, mv: Move) {
        self.trial.try_move(mv);
    }

    pub fn restore_board(&mut self) {
        self.trial.restore();
    }

    fn apply_move(&mut self, mv: Move) -> Result<(), MoveError> {
        if self.status.is_finished() {
            return Err(MoveError::GameOver);
        }
        if mv.is_pass() {
            if self.trial.is_in_check(self.turn) {
                return Err(MoveError::PassInCheck);
            }
            return Ok(());
        }
        let material = match self.trial.contents(mv.from) {
            Some(material) => *material,
            None => return Err(MoveError::EmptySquare(mv.from)),
        };
        if material.color() != self.turn {
            return Err(MoveError::NotYourTurn(mv.from));
        }
        if !self.trial.destinations(mv.from).contains(mv.to) {
            return Err(MoveError::InvalidMove(mv));
        }
        self.trial.try_move(mv);
        if self.trial.is_in_check(self.turn) {
            self.trial.restore();
            return Err(MoveError::SelfCheck(mv));
        }
        self.trial.commit();
        Ok(())
    }

    // The side now to move loses if it is mated. The turn stays with it.
    fn update_result(&mut self) {
        let turn = self.turn;
        if self.trial.is_in_check(turn) && self.trial.is_in_checkmate(turn) {
            self.status = GameState::won_by(!turn);
            info!("{turn} is checkmated: {}", self.status);
        }
    }
}

impl Turn for PlayState {
    #[inline]
    fn turn(&self) -> Color {
        self.turn
    }
}

impl AsRef<Position> for PlayState {
    fn as_ref(&self) -> &Position {
        self.trial.as_ref()
    }
}

impl Pos for PlayState {}

impl Index<Square> for PlayState {
    type Output = Option<Material>;
    fn index(&self, index: Square) -> &Self::Output {
        self.contents(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::square::Square::*;
    use pretty_assertions::assert_eq;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn error_of(state: &mut PlayState, mv: Move) -> MoveError {
        let err = state.submit_move(mv).unwrap_err();
        err.downcast::<MoveError>().unwrap()
    }

    #[test]
    fn test_blue_moves_first() {
        init_logger();
        let mut state = PlayState::new();
        assert_eq!(state.turn(), Color::Blue);
        assert_eq!(
            error_of(&mut state, Move::new(C1, E3)),
            MoveError::NotYourTurn(C1)
        );
        state.submit_move(Move::new(A7, B7)).unwrap();
        assert_eq!(state.turn(), Color::Red);
        assert_eq!(state[B7], Some(Material::BP));
        assert_eq!(state.history(), &[Move::new(A7, B7)]);
    }

    #[test]
    fn test_rejections_leave_state_alone() {
        init_logger();
        let mut state = PlayState::new();
        assert_eq!(
            error_of(&mut state, Move::new(E5, E6)),
            MoveError::EmptySquare(E5)
        );
        assert_eq!(
            error_of(&mut state, Move::new(A7, A5)),
            MoveError::InvalidMove(Move::new(A7, A5))
        );
        let pos: &Position = state.as_ref();
        assert_eq!(pos, &Position::new());
        assert_eq!(state.turn(), Color::Blue);
        assert!(state.history().is_empty());
    }

    #[test]
    fn test_pass() {
        init_logger();
        let mut state = PlayState::new();
        state.submit_move(Move::pass(A4)).unwrap();
        assert_eq!(state.turn(), Color::Red);
        let pos: &Position = state.as_ref();
        assert_eq!(pos, &Position::new());
    }

    #[test]
    fn test_pass_in_check() {
        let position = Position::empty()
            .set_contents(E2, Some(Material::RK))
            .set_contents(E9, Some(Material::BK))
            .set_contents(E5, Some(Material::BR));
        let mut state = PlayState::from_position(position, Color::Red);
        assert_eq!(error_of(&mut state, Move::pass(E2)), MoveError::PassInCheck);
        assert_eq!(state.turn(), Color::Red);
    }

    #[test]
    fn test_self_check() {
        init_logger();
        let position = Position::empty()
            .set_contents(E1, Some(Material::RK))
            .set_contents(E2, Some(Material::RA))
            .set_contents(E5, Some(Material::BR))
            .set_contents(E9, Some(Material::BK));
        let mut state = PlayState::from_position(position.clone(), Color::Red);
        let mv = Move::new(E2, D2);
        assert_eq!(error_of(&mut state, mv), MoveError::SelfCheck(mv));
        let pos: &Position = state.as_ref();
        assert_eq!(pos, &position);
        assert_eq!(state.turn(), Color::Red);
        assert_eq!(state.status(), GameState::Unfinished);
        assert!(!state.in_preview());
        state.submit_move(Move::new(E2, E3)).unwrap();
    }

    #[test]
    fn test_checkmate_ends_game() {
        init_logger();
        // blue's chariot slides along the back rank, the one on a2 covers e2
        let position = Position::empty()
            .set_contents(E1, Some(Material::RK))
            .set_contents(E9, Some(Material::BK))
            .set_contents(A3, Some(Material::BR))
            .set_contents(A2, Some(Material::BR));
        let mut state = PlayState::from_position(position, Color::Blue);
        state.submit_move(Move::new(A3, B3)).unwrap();
        state.submit_move(Move::pass(E1)).unwrap();
        assert_eq!(state.status(), GameState::Unfinished);
        state.submit_move(Move::new(B3, B1)).unwrap();
        assert_eq!(state.status(), GameState::BlueWon);
        assert_eq!(state.turn(), Color::Red);
        assert_eq!(
            error_of(&mut state, Move::new(E1, F1)),
            MoveError::GameOver
        );
        assert_eq!(state.history().len(), 3);
    }

    #[test]
    fn test_submit_rolls_back_preview() {
        let mut state = PlayState::new();
        state.preview_move(Move::new(E4, E5));
        assert!(state.in_preview());
        assert_eq!(state[E5], Some(Material::RP));
        state.submit_move(Move::new(A7, B7)).unwrap();
        assert!(!state.in_preview());
        assert_eq!(state[E4], Some(Material::RP));
        assert_eq!(state[E5], None);
    }
}
