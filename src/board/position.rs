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

use serde::ser::SerializeTuple;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};
use strum::IntoEnumIterator;

use super::material::{Color, Material, Pair, Piece};
use super::square::{File, Mask, Rank, Square, NUM_SQUARES};

use Color::*;
use Piece::*;
use Rank::*;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Squares([Option<Material>; NUM_SQUARES]);

impl Squares {
    fn empty() -> Self {
        Self([None; NUM_SQUARES])
    }
}

impl Index<Square> for Squares {
    type Output = Option<Material>;
    fn index(&self, index: Square) -> &Self::Output {
        &self.0[index.to_index()]
    }
}

impl IndexMut<Square> for Squares {
    fn index_mut(&mut self, index: Square) -> &mut Self::Output {
        &mut self.0[index.to_index()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Masks {
    pieces: Pair<Mask>,
    generals: Mask,
    cannons: Mask,
}

impl Masks {
    fn empty() -> Self {
        Self {
            pieces: Pair::new(Mask::empty(), Mask::empty()),
            generals: Mask::empty(),
            cannons: Mask::empty(),
        }
    }
}

/// The contents of the 10x9 grid. A position knows nothing about whose turn
/// it is; that belongs to the game built on top of it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Position {
    squares: Squares,
    masks: Masks,
}

/// A by-value copy of a position, taken before a speculative move so the
/// position can be put back exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Snapshot(Position);

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl Serialize for Position {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut tuple = serializer.serialize_tuple(NUM_SQUARES)?;
        for square in Square::iter() {
            tuple.serialize_element(&self.squares[square])?;
        }
        tuple.end()
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct PositionVisitor;
        impl<'de> serde::de::Visitor<'de> for PositionVisitor {
            type Value = Position;
            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a Position as a 90-element tuple of optional pieces")
            }
            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: serde::de::SeqAccess<'de>,
            {
                let mut position = Position::empty();
                for square in Square::iter() {
                    let contents: Option<Material> = seq
                        .next_element()?
                        .ok_or_else(|| serde::de::Error::custom("Missing elements"))?;
                    position.set(square, contents);
                }
                Ok(position)
            }
        }
        deserializer.deserialize_tuple(NUM_SQUARES, PositionVisitor)
    }
}

impl Position {
    /// The standard opening layout: red along the top (ranks 1-4), blue along
    /// the bottom (ranks 7-10).
    pub fn new() -> Self {
        Self::empty().init()
    }

    pub fn empty() -> Self {
        Self {
            squares: Squares::empty(),
            masks: Masks::empty(),
        }
    }

    fn init(mut self) -> Self {
        use File::*;
        const BACK_RANKS: Pair<Rank> = Pair::new(Rank1, Rank10);
        const GENERAL_RANKS: Pair<Rank> = Pair::new(Rank2, Rank9);
        const CANNON_RANKS: Pair<Rank> = Pair::new(Rank3, Rank8);
        const SOLDIER_RANKS: Pair<Rank> = Pair::new(Rank4, Rank7);
        const BACK_RANK: [(File, Piece); 8] = [
            (FileA, Chariot),
            (FileB, Elephant),
            (FileC, Horse),
            (FileD, Guard),
            (FileF, Guard),
            (FileG, Elephant),
            (FileH, Horse),
            (FileI, Chariot),
        ];
        for color in Color::iter() {
            for (file, piece) in BACK_RANK {
                self.init_square(Square::new(file, BACK_RANKS[color]), color, piece);
            }
            self.init_square(Square::new(FileE, GENERAL_RANKS[color]), color, General);
            for file in [FileB, FileH] {
                self.init_square(Square::new(file, CANNON_RANKS[color]), color, Cannon);
            }
            for file in [FileA, FileC, FileE, FileG, FileI] {
                self.init_square(Square::new(file, SOLDIER_RANKS[color]), color, Soldier);
            }
        }
        self
    }

    fn init_square(&mut self, square: Square, color: Color, piece: Piece) {
        let _ = self.place(square, Material::new(color, piece));
    }

    pub fn squares(&self) -> &Squares {
        &self.squares
    }

    /// Builder form of `set`, handy for laying out test positions.
    pub fn set_contents(mut self, square: Square, contents: Option<Material>) -> Self {
        self.set(square, contents);
        self
    }

    /// Replaces the contents of `square`, returning what was there.
    pub fn set(&mut self, square: Square, contents: Option<Material>) -> Option<Material> {
        match contents {
            Some(material) => self.place(square, material),
            None => self.remove(square),
        }
    }

    /// Moves whatever stands on `from` to `to`, capturing any occupant of
    /// `to`. Returns the captured material. Nothing happens if `from` is
    /// empty or equal to `to`.
    pub fn apply(&mut self, from: Square, to: Square) -> Option<Material> {
        if from == to {
            return None;
        }
        let material = self.remove(from)?;
        self.place(to, material)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot(self.clone())
    }

    pub fn restore(&mut self, snapshot: &Snapshot) {
        *self = snapshot.0.clone();
    }

    fn place(&mut self, square: Square, material: Material) -> Option<Material> {
        let replaced = self.remove(square);
        self.squares[square] = Some(material);
        self.masks.pieces[material.color()] |= square;
        match material.piece() {
            General => self.masks.generals |= square,
            Cannon => self.masks.cannons |= square,
            _ => {}
        }
        replaced
    }

    fn remove(&mut self, square: Square) -> Option<Material> {
        let material = self.squares[square].take()?;
        self.masks.pieces[material.color()].reset(square);
        self.masks.generals.reset(square);
        self.masks.cannons.reset(square);
        Some(material)
    }
}

impl Index<Square> for Position {
    type Output = Option<Material>;
    #[inline]
    fn index(&self, index: Square) -> &Self::Output {
        &self.squares[index]
    }
}

impl AsRef<Self> for Position {
    fn as_ref(&self) -> &Self {
        self
    }
}

impl Pos for Position {}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "   ")?;
        for file in File::iter() {
            write!(f, " {}", file)?;
        }
        writeln!(f)?;
        for rank in Rank::iter() {
            write!(f, "{:>3}", rank.to_string())?;
            for file in File::iter() {
                let c = match self[Square::new(file, rank)] {
                    Some(material) => material.to_char(),
                    None => '.',
                };
                write!(f, " {}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Read-only queries over a position.
pub trait Pos: AsRef<Position> {
    #[inline]
    fn contents(&self, square: Square) -> &Option<Material> {
        let pos: &Position = self.as_ref();
        &pos.squares[square]
    }
    #[inline]
    fn red(&self) -> Mask {
        let pos: &Position = self.as_ref();
        pos.masks.pieces[Red]
    }
    #[inline]
    fn blue(&self) -> Mask {
        let pos: &Position = self.as_ref();
        pos.masks.pieces[Blue]
    }
    #[inline]
    fn generals(&self) -> Mask {
        let pos: &Position = self.as_ref();
        pos.masks.generals
    }
    #[inline]
    fn cannons(&self) -> Mask {
        let pos: &Position = self.as_ref();
        pos.masks.cannons
    }
    #[inline]
    fn occupied_by(&self, color: Color) -> Mask {
        match color {
            Red => self.red(),
            Blue => self.blue(),
        }
    }
    #[inline]
    fn occupied(&self) -> Mask {
        self.red() | self.blue()
    }
    #[inline]
    fn vacant(&self) -> Mask {
        !self.occupied()
    }
    #[inline]
    fn is_vacant(&self, square: Square) -> bool {
        self.contents(square).is_none()
    }
    #[inline]
    fn is_occupied(&self, square: Square) -> bool {
        self.contents(square).is_some()
    }
    #[inline]
    fn is_cannon(&self, square: Square) -> bool {
        self.cannons().contains(square)
    }
    /// The square of `color`'s general, if it is on the board.
    #[inline]
    fn general(&self, color: Color) -> Option<Square> {
        let mask = self.occupied_by(color) & self.generals();
        debug_assert!(mask.len() <= 1);
        mask.iter().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use Square::*;

    #[test]
    fn test_initial_layout() {
        let pos = Position::new();
        assert_eq!(pos.red().len(), 16);
        assert_eq!(pos.blue().len(), 16);
        assert_eq!(pos[A1], Some(Material::RR));
        assert_eq!(pos[B1], Some(Material::RE));
        assert_eq!(pos[C1], Some(Material::RH));
        assert_eq!(pos[D1], Some(Material::RA));
        assert_eq!(pos[E1], None);
        assert_eq!(pos[E2], Some(Material::RK));
        assert_eq!(pos[B3], Some(Material::RC));
        assert_eq!(pos[H3], Some(Material::RC));
        assert_eq!(pos[E4], Some(Material::RP));
        assert_eq!(pos[I10], Some(Material::BR));
        assert_eq!(pos[G10], Some(Material::BE));
        assert_eq!(pos[H10], Some(Material::BH));
        assert_eq!(pos[E9], Some(Material::BK));
        assert_eq!(pos[B8], Some(Material::BC));
        assert_eq!(pos[A7], Some(Material::BP));
        assert_eq!(pos[B7], None);
    }

    #[test]
    fn test_generals_and_cannons() {
        let pos = Position::new();
        assert_eq!(pos.general(Red), Some(E2));
        assert_eq!(pos.general(Blue), Some(E9));
        assert_eq!(pos.cannons(), Mask::from_squares([B3, H3, B8, H8]));
        assert!(pos.is_cannon(H8));
        assert!(!pos.is_cannon(H10));
    }

    #[test]
    fn test_apply_captures() {
        let mut pos = Position::new().set_contents(E5, Some(Material::BP));
        let captured = pos.apply(E4, E5);
        assert_eq!(captured, Some(Material::BP));
        assert_eq!(pos[E5], Some(Material::RP));
        assert_eq!(pos[E4], None);
        assert_eq!(pos.blue().len(), 16);
        assert_eq!(pos.red().len(), 16);
    }

    #[test]
    fn test_apply_same_square_or_empty_is_noop() {
        let mut pos = Position::new();
        assert_eq!(pos.apply(E2, E2), None);
        assert_eq!(pos.apply(E5, E6), None);
        assert_eq!(pos, Position::new());
    }

    #[test]
    fn test_capturing_general_clears_mask() {
        let mut pos = Position::empty()
            .set_contents(E2, Some(Material::RK))
            .set_contents(E5, Some(Material::BR));
        pos.apply(E5, E2);
        assert_eq!(pos.general(Red), None);
        assert!(pos.generals().is_empty());
    }

    #[test]
    fn test_snapshot_is_by_value() {
        let mut pos = Position::new();
        let snapshot = pos.snapshot();
        pos.apply(A7, B7);
        pos.apply(B3, B9);
        assert_ne!(pos, Position::new());
        pos.restore(&snapshot);
        assert_eq!(pos, Position::new());
        pos.apply(E4, E5);
        pos.restore(&snapshot);
        assert_eq!(pos, Position::new());
    }

    #[test]
    fn test_display() {
        let text = Position::new().to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 11);
        assert_eq!(lines[0], "    a b c d e f g h i");
        assert_eq!(lines[1], "  1 r e h a . a e h r");
        assert_eq!(lines[2], "  2 . . . . k . . . .");
        assert_eq!(lines[10], " 10 R E H A . A E H R");
    }

    #[test]
    fn test_serde_round_trip() {
        let pos = Position::new().set_contents(E5, Some(Material::BC));
        let json = serde_json::to_string(&pos).unwrap();
        let restored: Position = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, pos);
        assert_eq!(restored.cannons().len(), 5);
    }
}
