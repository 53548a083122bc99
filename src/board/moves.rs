// Copyright 2023 Tobin Edwards
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

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::IntoEnumIterator;
use thiserror::Error;

use super::material::{Color, Pair, Piece};
use super::palace::{has_diagonal, palace, palace_line, palace_steps};
use super::position::Pos;
use super::square::{Direction, Mask, Square, NUM_SQUARES};

use Piece::*;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    #[error("Not a square on the board: {0:?}")]
    InvalidSquare(String),
    #[error("The game is already over")]
    GameOver,
    #[error("No piece on {0}")]
    EmptySquare(Square),
    #[error("The piece on {0} does not belong to the side to move")]
    NotYourTurn(Square),
    #[error("Not a legal move: {0}")]
    InvalidMove(Move),
    #[error("Move {0} would leave the general in check")]
    SelfCheck(Move),
    #[error("Cannot pass while in check")]
    PassInCheck,
}

/// A move from one square to another. A move whose origin and destination
/// are the same square is a pass.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
}

impl Move {
    pub fn new(from: Square, to: Square) -> Self {
        Self { from, to }
    }

    pub fn pass(square: Square) -> Self {
        Self::new(square, square)
    }

    /// Parses both squares from their external form (`"e7"`, `"e6"`).
    pub fn from_strings(from: &str, to: &str) -> Result<Self, MoveError> {
        let parse = |name: &str| {
            Square::try_from_string(name).ok_or_else(|| MoveError::InvalidSquare(name.to_string()))
        };
        Ok(Self::new(parse(from)?, parse(to)?))
    }

    #[inline]
    pub fn is_pass(&self) -> bool {
        self.from == self.to
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}

/// A fixed-shape jump: `legs` must all be vacant for the piece to reach
/// `dest`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Jump {
    legs: Mask,
    dest: Square,
}

/// Move generation by geometry alone. Destinations never include a square
/// held by the mover's own color, but moves that leave the mover's general
/// in check are still included.
pub trait PseudoMoves: Pos {
    /// Every destination reachable from `from` by the piece standing there.
    /// Empty if `from` is vacant.
    fn destinations(&self, from: Square) -> Mask {
        match self.contents(from) {
            Some(material) => {
                let color = material.color();
                match material.piece() {
                    General | Guard => self.palace_moves(from, color),
                    Soldier => self.soldier_moves(from, color),
                    Chariot => self.chariot_moves(from, color),
                    Cannon => self.cannon_moves(from, color),
                    Horse => self.jump_moves(&HORSE_JUMPS[from.to_index()], color),
                    Elephant => self.jump_moves(&ELEPHANT_JUMPS[from.to_index()], color),
                }
            }
            None => Mask::empty(),
        }
    }

    fn palace_moves(&self, from: Square, color: Color) -> Mask {
        palace_steps(from) & palace(color) & !self.occupied_by(color)
    }

    fn soldier_moves(&self, from: Square, color: Color) -> Mask {
        SOLDIER_MOVES[color][from] & !self.occupied_by(color)
    }

    fn chariot_moves(&self, from: Square, color: Color) -> Mask {
        let mut result = Mask::empty();
        for line in lines(from) {
            for &square in line {
                match self.contents(square) {
                    None => result |= square,
                    Some(material) => {
                        if material.color() != color {
                            result |= square;
                        }
                        break;
                    }
                }
            }
        }
        result
    }

    fn cannon_moves(&self, from: Square, color: Color) -> Mask {
        let mut result = Mask::empty();
        for line in lines(from) {
            let mut squares = line.iter().copied();
            // the screen is the first piece along the line and may not be a cannon
            let Some(screen) = squares.by_ref().find(|sq| self.is_occupied(*sq)) else {
                continue;
            };
            if self.is_cannon(screen) {
                continue;
            }
            for square in squares {
                match self.contents(square) {
                    None => result |= square,
                    Some(material) => {
                        if material.color() != color && !material.piece().is_cannon() {
                            result |= square;
                        }
                        break;
                    }
                }
            }
        }
        result
    }

    fn jump_moves(&self, jumps: &[Jump], color: Color) -> Mask {
        let occupied = self.occupied();
        let ours = self.occupied_by(color);
        let mut result = Mask::empty();
        for jump in jumps {
            if (jump.legs & occupied).is_empty() && !ours.contains(jump.dest) {
                result |= jump.dest;
            }
        }
        result
    }

    /// True if any piece of `color` could move onto `square`.
    fn is_attacked_by(&self, square: Square, color: Color) -> bool {
        self.occupied_by(color)
            .iter()
            .any(|from| self.destinations(from).contains(square))
    }

    /// True if `color`'s general could be captured on the opponent's next
    /// move. A side without a general is never in check.
    fn is_in_check(&self, color: Color) -> bool {
        match self.general(color) {
            Some(general) => self.is_attacked_by(general, !color),
            None => false,
        }
    }
}

impl<T: Pos> PseudoMoves for T {}

/// Lines a chariot or cannon slides along from a square, nearest square
/// first: the four orthogonals to the board edge and any palace diagonals.
fn lines(from: Square) -> &'static [Vec<Square>] {
    &LINES[from.to_index()]
}

static LINES: Lazy<Vec<Vec<Vec<Square>>>> = Lazy::new(|| {
    fn ray(from: Square, dir: Direction) -> Vec<Square> {
        let mut line = Vec::new();
        let mut next = from + dir;
        while let Some(square) = next {
            line.push(square);
            next = square + dir;
        }
        line
    }
    Square::iter()
        .map(|from| {
            Direction::orthogonals()
                .map(|dir| ray(from, dir))
                .chain(Direction::diagonals().map(|dir| palace_line(from, dir)))
                .filter(|line| !line.is_empty())
                .collect()
        })
        .collect()
});

static SOLDIER_MOVES: Lazy<Pair<[Mask; NUM_SQUARES]>> = Lazy::new(|| {
    fn soldier_moves(color: Color) -> [Mask; NUM_SQUARES] {
        let forward = color.forward();
        let mut array = [Mask::empty(); NUM_SQUARES];
        for square in Square::iter() {
            let steps = [forward, Direction::Left, Direction::Right]
                .into_iter()
                .chain(
                    Direction::diagonals()
                        .filter(|dir| dir.advances(forward) && has_diagonal(square, *dir)),
                )
                .filter_map(|dir| square + dir);
            array[square] = Mask::from_squares(steps);
        }
        array
    }
    Pair::new(soldier_moves(Color::Red), soldier_moves(Color::Blue))
});

fn jumps(from: Square, diagonal_steps: usize) -> Vec<Jump> {
    let mut result = Vec::new();
    for dir in Direction::orthogonals() {
        let Some(first) = from + dir else { continue };
        'outward: for &diagonal in dir.outward() {
            let mut legs = first.to_mask();
            let mut square = first;
            for step in 0..diagonal_steps {
                let Some(next) = square + diagonal else {
                    continue 'outward;
                };
                if step + 1 < diagonal_steps {
                    legs |= next;
                }
                square = next;
            }
            result.push(Jump { legs, dest: square });
        }
    }
    result
}

static HORSE_JUMPS: Lazy<Vec<Vec<Jump>>> =
    Lazy::new(|| Square::iter().map(|from| jumps(from, 1)).collect());

static ELEPHANT_JUMPS: Lazy<Vec<Vec<Jump>>> =
    Lazy::new(|| Square::iter().map(|from| jumps(from, 2)).collect());
