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

use log::trace;

use super::material::Color;
use super::moves::{Move, PseudoMoves};
use super::position::{Pos, Position, Snapshot};
use super::square::{Mask, Square};

/// A position that can be changed speculatively and put back.
///
/// `try_move` saves a snapshot and applies a move; `restore` brings the
/// snapshot back and `commit` drops it, keeping the move. At most one
/// snapshot is held: trials never nest.
#[derive(Debug, Clone)]
pub struct TrialState {
    position: Position,
    saved: Option<Snapshot>,
}

impl Default for TrialState {
    fn default() -> Self {
        Self::new(Position::default())
    }
}

impl TrialState {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            saved: None,
        }
    }

    #[inline]
    pub fn position(&self) -> &Position {
        &self.position
    }

    #[inline]
    pub fn in_trial(&self) -> bool {
        self.saved.is_some()
    }

    /// Saves the current position. A trial already in progress is rolled back
    /// first, so the saved position is always a committed one.
    pub fn begin(&mut self) {
        self.restore();
        self.saved = Some(self.position.snapshot());
    }

    /// Applies a move to the live position without any legality checks.
    pub fn apply(&mut self, mv: Move) {
        debug_assert!(self.in_trial());
        let _ = self.position.apply(mv.from, mv.to);
    }

    pub fn try_move(&mut self, mv: Move) {
        self.begin();
        self.apply(mv);
    }

    /// Puts back the position saved by `begin`. Does nothing outside a trial.
    pub fn restore(&mut self) {
        if let Some(snapshot) = self.saved.take() {
            self.position.restore(&snapshot);
        }
    }

    /// Keeps the trial move and forgets the saved position.
    pub fn commit(&mut self) {
        self.saved = None;
    }

    /// Searches every pseudo-legal move of `color` for one that leaves it out
    /// of check. Only meaningful when `color` is already in check.
    ///
    /// The search runs on a scratch copy, so the live position and any trial
    /// in progress are left alone.
    pub fn is_in_checkmate(&self, color: Color) -> bool {
        let mut scratch = TrialState::new(self.position.clone());
        scratch.escape(color).is_none()
    }

    /// Pseudo-legal destinations from `from` that do not leave the moving
    /// side's general in check.
    pub fn legal_destinations(&self, from: Square) -> Mask {
        let color = match self.contents(from) {
            Some(material) => material.color(),
            None => return Mask::empty(),
        };
        let mut scratch = TrialState::new(self.position.clone());
        let legal = self.destinations(from).iter().filter(|&to| {
            scratch.try_move(Move::new(from, to));
            let in_check = scratch.is_in_check(color);
            scratch.restore();
            !in_check
        });
        Mask::from_squares(legal)
    }

    /// The first move (in square order) that gets `color` out of check.
    pub fn escape(&mut self, color: Color) -> Option<Move> {
        for from in self.occupied_by(color).iter() {
            for to in self.destinations(from).iter() {
                let mv = Move::new(from, to);
                self.try_move(mv);
                let in_check = self.is_in_check(color);
                self.restore();
                if !in_check {
                    trace!("{color} escapes check with {mv}");
                    return Some(mv);
                }
            }
        }
        None
    }
}

impl AsRef<Position> for TrialState {
    fn as_ref(&self) -> &Position {
        &self.position
    }
}

impl Pos for TrialState {}
