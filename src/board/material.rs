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

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use std::ops::{Index, IndexMut, Not};
use strum_macros::Display;
use strum_macros::EnumIter;

use super::square::Direction;

/// A piece of a specific color. The associated constants use the usual
/// Janggi letters: K general, A guard, E elephant, H horse, R chariot,
/// C cannon, P soldier.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Material {
    color: Color,
    piece: Piece,
}

impl Material {
    pub const RK: Self = Self::red(General);
    pub const RA: Self = Self::red(Guard);
    pub const RE: Self = Self::red(Elephant);
    pub const RH: Self = Self::red(Horse);
    pub const RR: Self = Self::red(Chariot);
    pub const RC: Self = Self::red(Cannon);
    pub const RP: Self = Self::red(Soldier);

    pub const BK: Self = Self::blue(General);
    pub const BA: Self = Self::blue(Guard);
    pub const BE: Self = Self::blue(Elephant);
    pub const BH: Self = Self::blue(Horse);
    pub const BR: Self = Self::blue(Chariot);
    pub const BC: Self = Self::blue(Cannon);
    pub const BP: Self = Self::blue(Soldier);

    #[inline]
    pub const fn new(color: Color, piece: Piece) -> Self {
        Self { color, piece }
    }

    #[inline]
    pub const fn red(piece: Piece) -> Self {
        Self::new(Red, piece)
    }

    #[inline]
    pub const fn blue(piece: Piece) -> Self {
        Self::new(Blue, piece)
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub fn piece(&self) -> Piece {
        self.piece
    }

    /// Red pieces print in lower case, blue pieces in upper case.
    pub fn to_char(&self) -> char {
        let c = self.piece.to_char();
        match self.color {
            Red => c.to_ascii_lowercase(),
            Blue => c,
        }
    }
}

use Color::{Blue, Red};

#[derive(Debug, Serialize, Deserialize, Display, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Color {
    Red,
    Blue,
}

impl Color {
    pub const fn to_index(&self) -> usize {
        *self as usize
    }

    /// The direction a soldier of this color advances in. Red starts at the
    /// top of the board and moves down.
    pub const fn forward(&self) -> Direction {
        match self {
            Red => Direction::Down,
            Blue => Direction::Up,
        }
    }
}

impl Not for Color {
    type Output = Self;

    #[inline]
    fn not(self) -> Self {
        match self {
            Red => Blue,
            Blue => Red,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pair<T>((T, T));

impl<T> Pair<T> {
    pub const fn new(red: T, blue: T) -> Self {
        Self((red, blue))
    }
}

impl<T> Pair<T> {
    pub fn red(&self) -> &T {
        &self.0 .0
    }
    pub fn red_mut(&mut self) -> &mut T {
        &mut self.0 .0
    }
    pub fn blue(&self) -> &T {
        &self.0 .1
    }
    pub fn blue_mut(&mut self) -> &mut T {
        &mut self.0 .1
    }
}

impl<T: Hash> Hash for Pair<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.red().hash(state);
        self.blue().hash(state);
    }
}

impl<T> Index<Color> for Pair<T> {
    type Output = T;

    #[inline(always)]
    fn index(&self, index: Color) -> &Self::Output {
        match index {
            Red => self.red(),
            Blue => self.blue(),
        }
    }
}

impl<T> IndexMut<Color> for Pair<T> {
    #[inline(always)]
    fn index_mut(&mut self, index: Color) -> &mut Self::Output {
        match index {
            Red => self.red_mut(),
            Blue => self.blue_mut(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Display, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Piece {
    General,
    Guard,
    Elephant,
    Horse,
    Chariot,
    Cannon,
    Soldier,
}
use Piece::{Cannon, Chariot, Elephant, General, Guard, Horse, Soldier};

impl Piece {
    pub fn to_index(&self) -> usize {
        *self as usize
    }
    pub fn to_char(&self) -> char {
        match *self {
            General => 'K',
            Guard => 'A',
            Elephant => 'E',
            Horse => 'H',
            Chariot => 'R',
            Cannon => 'C',
            Soldier => 'P',
        }
    }
    pub fn is_cannon(&self) -> bool {
        matches!(*self, Cannon)
    }
}
