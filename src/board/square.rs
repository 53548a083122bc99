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

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, BitAnd, BitAndAssign, BitOr, BitOrAssign, Not};
use std::ops::{Index, IndexMut};
use std::str::FromStr;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;
use thiserror::Error;

pub const NUM_FILES: usize = 9;
pub const NUM_RANKS: usize = 10;
pub const NUM_SQUARES: usize = NUM_FILES * NUM_RANKS;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid square: {0:?}")]
pub struct ParseSquareError(pub String);

/// An intersection on the board. Files run `a`..`i` from left to right and
/// ranks run `1`..`10` from top (red's back rank) to bottom (blue's back rank).
#[rustfmt::skip]
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter)]
pub enum Square {
    A1, B1, C1, D1, E1, F1, G1, H1, I1,
    A2, B2, C2, D2, E2, F2, G2, H2, I2,
    A3, B3, C3, D3, E3, F3, G3, H3, I3,
    A4, B4, C4, D4, E4, F4, G4, H4, I4,
    A5, B5, C5, D5, E5, F5, G5, H5, I5,
    A6, B6, C6, D6, E6, F6, G6, H6, I6,
    A7, B7, C7, D7, E7, F7, G7, H7, I7,
    A8, B8, C8, D8, E8, F8, G8, H8, I8,
    A9, B9, C9, D9, E9, F9, G9, H9, I9,
    A10, B10, C10, D10, E10, F10, G10, H10, I10,
}

#[rustfmt::skip]
use Square::{
    A1, B1, C1, D1, E1, F1, G1, H1, I1,
    A2, B2, C2, D2, E2, F2, G2, H2, I2,
    A3, B3, C3, D3, E3, F3, G3, H3, I3,
    A4, B4, C4, D4, E4, F4, G4, H4, I4,
    A5, B5, C5, D5, E5, F5, G5, H5, I5,
    A6, B6, C6, D6, E6, F6, G6, H6, I6,
    A7, B7, C7, D7, E7, F7, G7, H7, I7,
    A8, B8, C8, D8, E8, F8, G8, H8, I8,
    A9, B9, C9, D9, E9, F9, G9, H9, I9,
    A10, B10, C10, D10, E10, F10, G10, H10, I10,
};

impl Square {
    #[inline]
    pub const fn new(file: File, rank: Rank) -> Self {
        Self::from_index(rank.to_index() * NUM_FILES + file.to_index())
    }

    #[rustfmt::skip]
    #[inline]
    pub const fn from_index(index: usize) -> Self {
        const VALUES: [Square; NUM_SQUARES] = [
            A1, B1, C1, D1, E1, F1, G1, H1, I1,
            A2, B2, C2, D2, E2, F2, G2, H2, I2,
            A3, B3, C3, D3, E3, F3, G3, H3, I3,
            A4, B4, C4, D4, E4, F4, G4, H4, I4,
            A5, B5, C5, D5, E5, F5, G5, H5, I5,
            A6, B6, C6, D6, E6, F6, G6, H6, I6,
            A7, B7, C7, D7, E7, F7, G7, H7, I7,
            A8, B8, C8, D8, E8, F8, G8, H8, I8,
            A9, B9, C9, D9, E9, F9, G9, H9, I9,
            A10, B10, C10, D10, E10, F10, G10, H10, I10,
        ];
        debug_assert!(index < NUM_SQUARES);
        VALUES[index]
    }

    /// Row and column as used by the board grid: `(0, 0)` is `a1`.
    #[inline]
    pub fn try_from_coords(row: usize, col: usize) -> Option<Self> {
        if row < NUM_RANKS && col < NUM_FILES {
            Some(Self::from_index(row * NUM_FILES + col))
        } else {
            None
        }
    }

    /// Parses the external form: one file letter `a`-`i` followed by a rank
    /// number `1`-`10`, nothing else.
    #[inline]
    pub fn try_from_string(name: &str) -> Option<Self> {
        let mut chars = name.chars();
        let file = File::try_from_char(chars.next()?)?;
        let rank = Rank::try_from_string(chars.as_str())?;
        Some(Self::new(file, rank))
    }

    #[inline]
    pub const fn to_index(&self) -> usize {
        *self as usize
    }
    #[inline]
    pub const fn to_mask(&self) -> Mask {
        Mask::new(0x1 << self.to_index())
    }
    #[inline]
    pub const fn file_index(&self) -> usize {
        self.to_index() % NUM_FILES
    }
    #[inline]
    pub const fn rank_index(&self) -> usize {
        self.to_index() / NUM_FILES
    }
    #[inline]
    pub const fn file(&self) -> File {
        File::from_index(self.file_index())
    }
    #[inline]
    pub const fn rank(&self) -> Rank {
        Rank::from_index(self.rank_index())
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

impl FromStr for Square {
    type Err = ParseSquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from_string(s).ok_or_else(|| ParseSquareError(s.to_string()))
    }
}

impl From<Square> for usize {
    fn from(value: Square) -> Self {
        value.to_index()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter)]
pub enum File {
    FileA,
    FileB,
    FileC,
    FileD,
    FileE,
    FileF,
    FileG,
    FileH,
    FileI,
}

use File::{FileA, FileB, FileC, FileD, FileE, FileF, FileG, FileH, FileI};

impl File {
    #[inline]
    pub const fn from_index(index: usize) -> Self {
        const VALUES: [File; NUM_FILES] = [
            FileA, FileB, FileC, FileD, FileE, FileF, FileG, FileH, FileI,
        ];
        debug_assert!(index < NUM_FILES);
        VALUES[index]
    }
    #[inline]
    pub const fn try_from_char(c: char) -> Option<Self> {
        match c {
            'a' => Some(FileA),
            'b' => Some(FileB),
            'c' => Some(FileC),
            'd' => Some(FileD),
            'e' => Some(FileE),
            'f' => Some(FileF),
            'g' => Some(FileG),
            'h' => Some(FileH),
            'i' => Some(FileI),
            _ => None,
        }
    }
    #[inline]
    pub const fn to_char(&self) -> char {
        const VALUES: [char; NUM_FILES] = ['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i'];
        VALUES[self.to_index()]
    }
    #[inline]
    pub const fn to_index(&self) -> usize {
        *self as usize
    }
    #[inline]
    pub fn to_mask(&self) -> Mask {
        Mask::from_squares(Rank::iter().map(|rank| Square::new(*self, rank)))
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

impl Add<isize> for File {
    type Output = Option<Self>;
    fn add(self, rhs: isize) -> Self::Output {
        match self.to_index().checked_add_signed(rhs) {
            Some(i) if i < NUM_FILES => Some(Self::from_index(i)),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter)]
pub enum Rank {
    Rank1,
    Rank2,
    Rank3,
    Rank4,
    Rank5,
    Rank6,
    Rank7,
    Rank8,
    Rank9,
    Rank10,
}

use Rank::{Rank1, Rank10, Rank2, Rank3, Rank4, Rank5, Rank6, Rank7, Rank8, Rank9};

impl Rank {
    #[inline]
    pub const fn from_index(index: usize) -> Self {
        const VALUES: [Rank; NUM_RANKS] = [
            Rank1, Rank2, Rank3, Rank4, Rank5, Rank6, Rank7, Rank8, Rank9, Rank10,
        ];
        debug_assert!(index < NUM_RANKS);
        VALUES[index]
    }
    #[inline]
    pub fn try_from_string(name: &str) -> Option<Self> {
        match name {
            "1" => Some(Rank1),
            "2" => Some(Rank2),
            "3" => Some(Rank3),
            "4" => Some(Rank4),
            "5" => Some(Rank5),
            "6" => Some(Rank6),
            "7" => Some(Rank7),
            "8" => Some(Rank8),
            "9" => Some(Rank9),
            "10" => Some(Rank10),
            _ => None,
        }
    }
    #[inline]
    pub const fn to_index(&self) -> usize {
        *self as usize
    }
    #[inline]
    pub fn to_mask(&self) -> Mask {
        Mask::from_squares(File::iter().map(|file| Square::new(file, *self)))
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_index() + 1)
    }
}

impl Add<isize> for Rank {
    type Output = Option<Self>;
    fn add(self, rhs: isize) -> Self::Output {
        match self.to_index().checked_add_signed(rhs) {
            Some(i) if i < NUM_RANKS => Some(Self::from_index(i)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Offset {
    pub x: isize,
    pub y: isize,
}

impl Offset {
    pub const fn new(x: isize, y: isize) -> Self {
        Self { x, y }
    }
}

impl Add<Offset> for Square {
    type Output = Option<Square>;
    fn add(self, rhs: Offset) -> Self::Output {
        let file = (self.file() + rhs.x)?;
        let rank = (self.rank() + rhs.y)?;
        Some(Square::new(file, rank))
    }
}

impl Index<Square> for [Mask; NUM_SQUARES] {
    type Output = Mask;
    fn index(&self, square: Square) -> &Self::Output {
        &self[square.to_index()]
    }
}

impl IndexMut<Square> for [Mask; NUM_SQUARES] {
    fn index_mut(&mut self, square: Square) -> &mut Self::Output {
        &mut self[square.to_index()]
    }
}

/// `Up` points toward rank 1 (red's side), `Down` toward rank 10.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Direction {
    UpLeft,
    Up,
    UpRight,
    Left,
    Right,
    DownLeft,
    Down,
    DownRight,
}

use Direction::{Down, DownLeft, DownRight, Left, Right, Up, UpLeft, UpRight};

impl Direction {
    pub fn orthogonals() -> impl Iterator<Item = Self> {
        [Up, Left, Right, Down].into_iter()
    }
    pub fn diagonals() -> impl Iterator<Item = Self> {
        [UpLeft, UpRight, DownLeft, DownRight].into_iter()
    }
    /// The two diagonals that continue outward from an orthogonal step, as
    /// taken by the horse and the elephant. Empty for diagonal directions.
    pub fn outward(&self) -> &'static [Direction] {
        match *self {
            Up => &[UpLeft, UpRight],
            Down => &[DownLeft, DownRight],
            Left => &[UpLeft, DownLeft],
            Right => &[UpRight, DownRight],
            _ => &[],
        }
    }
    /// True if this direction has a vertical component matching `forward`.
    pub fn advances(&self, forward: Direction) -> bool {
        let offset: Offset = (*self).into();
        let forward: Offset = forward.into();
        forward.x == 0 && offset.y == forward.y
    }
}

impl From<Direction> for Offset {
    fn from(value: Direction) -> Self {
        match value {
            UpLeft => Self::new(-1, -1),
            Up => Self::new(0, -1),
            UpRight => Self::new(1, -1),
            Left => Self::new(-1, 0),
            Right => Self::new(1, 0),
            DownLeft => Self::new(-1, 1),
            Down => Self::new(0, 1),
            DownRight => Self::new(1, 1),
        }
    }
}

impl Add<Direction> for Square {
    type Output = Option<Square>;
    fn add(self, rhs: Direction) -> Self::Output {
        let offset: Offset = rhs.into();
        self + offset
    }
}

const MASK_BITS: u128 = (0x1 << NUM_SQUARES) - 1;

/// A set of squares, one bit per square (bit `n` is `Square::from_index(n)`).
#[derive(Clone, Serialize, Deserialize, Copy, PartialEq, Eq, Hash, Default)]
pub struct Mask(u128);

impl Mask {
    #[inline]
    pub const fn new(val: u128) -> Self {
        Self(val & MASK_BITS)
    }

    #[inline]
    pub const fn empty() -> Self {
        Self(0)
    }

    #[inline]
    pub const fn all() -> Self {
        Self(MASK_BITS)
    }

    pub fn from_squares<I>(squares: I) -> Self
    where
        I: IntoIterator<Item = Square>,
    {
        squares
            .into_iter()
            .map(|square| square.to_mask())
            .reduce(|m1, m2| m1 | m2)
            .unwrap_or_default()
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    pub fn set(&mut self, square: Square) {
        self.0 |= square.to_mask().0;
    }

    #[inline]
    pub fn reset(&mut self, square: Square) {
        self.0 &= !square.to_mask().0;
    }

    #[inline]
    pub const fn contains(&self, square: Square) -> bool {
        (self.0 & square.to_mask().0) != 0
    }

    pub fn iter(&self) -> MaskIter {
        MaskIter(self.0)
    }
}

impl fmt::Debug for Mask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::iter() {
            for file in File::iter() {
                let square = Square::new(file, rank);
                write!(f, "{}", if self.contains(square) { "#" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Not for Mask {
    type Output = Self;
    fn not(self) -> Self::Output {
        Self(!self.0 & MASK_BITS)
    }
}

impl BitOr for Mask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Mask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitOr<Square> for Mask {
    type Output = Self;

    fn bitor(self, rhs: Square) -> Self {
        Self(self.0 | rhs.to_mask().0)
    }
}

impl BitOrAssign<Square> for Mask {
    fn bitor_assign(&mut self, rhs: Square) {
        self.0 |= rhs.to_mask().0;
    }
}

impl BitAnd for Mask {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl BitAndAssign for Mask {
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0;
    }
}

impl BitAnd<Square> for Mask {
    type Output = Self;

    fn bitand(self, rhs: Square) -> Self {
        Self(self.0 & rhs.to_mask().0)
    }
}

impl IntoIterator for Mask {
    type Item = Square;
    type IntoIter = MaskIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Yields squares in ascending index order (`a1`, `b1`, .. `i10`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaskIter(u128);

impl MaskIter {
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }
    pub const fn len(&self) -> usize {
        self.0.count_ones() as usize
    }
}

impl Iterator for MaskIter {
    type Item = Square;

    fn next(&mut self) -> Option<Self::Item> {
        if self.0 != 0 {
            let square = Square::from_index(self.0.trailing_zeros() as usize);
            self.0 &= self.0 - 1;
            return Some(square);
        }
        None
    }
}

impl DoubleEndedIterator for MaskIter {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.0 != 0 {
            let square = Square::from_index(127 - self.0.leading_zeros() as usize);
            self.0 &= !square.to_mask().0;
            return Some(square);
        }
        None
    }
}
