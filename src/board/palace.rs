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

//! Palaces and their diagonal lines
//!
//! Each color owns a 3x3 palace: `d1`-`f3` for red and `d8`-`f10` for blue.
//! Two diagonal lines cross each palace through its center. These are the
//! only diagonal lines on the board, so every diagonal step taken by a
//! general, guard, soldier, chariot or cannon is looked up here by absolute
//! square and direction.

use once_cell::sync::Lazy;
use strum::IntoEnumIterator;

use super::material::{Color, Pair};
use super::square::{Direction, File, Mask, Rank, Square, NUM_SQUARES};

use Direction::*;
use Square::*;

/// Every (square, direction) pair that starts a palace diagonal step.
const PALACE_DIAGONALS: [(Square, Direction); 16] = [
    (D1, DownRight),
    (F1, DownLeft),
    (D3, UpRight),
    (F3, UpLeft),
    (E2, UpLeft),
    (E2, UpRight),
    (E2, DownLeft),
    (E2, DownRight),
    (D8, DownRight),
    (F8, DownLeft),
    (D10, UpRight),
    (F10, UpLeft),
    (E9, UpLeft),
    (E9, UpRight),
    (E9, DownLeft),
    (E9, DownRight),
];

static PALACES: Lazy<Pair<Mask>> = Lazy::new(|| {
    fn palace(ranks: [Rank; 3]) -> Mask {
        let files = [File::FileD, File::FileE, File::FileF];
        Mask::from_squares(
            ranks
                .into_iter()
                .flat_map(|rank| files.into_iter().map(move |file| Square::new(file, rank))),
        )
    }
    Pair::new(
        palace([Rank::Rank1, Rank::Rank2, Rank::Rank3]),
        palace([Rank::Rank8, Rank::Rank9, Rank::Rank10]),
    )
});

/// One-step moves inside the palace containing each square: orthogonal
/// neighbours plus the diagonal steps along palace lines.
static PALACE_STEPS: Lazy<[Mask; NUM_SQUARES]> = Lazy::new(|| {
    let mut array = [Mask::empty(); NUM_SQUARES];
    for color in Color::iter() {
        let palace = PALACES[color];
        for square in palace.iter() {
            let orthogonal = Direction::orthogonals()
                .filter_map(|dir| square + dir)
                .filter(|dest| palace.contains(*dest));
            let diagonal = Direction::diagonals()
                .filter(|dir| has_diagonal(square, *dir))
                .filter_map(|dir| square + dir);
            array[square] = Mask::from_squares(orthogonal.chain(diagonal));
        }
    }
    array
});

#[inline]
pub fn palace(color: Color) -> Mask {
    PALACES[color]
}

#[inline]
pub fn in_palace(square: Square) -> bool {
    (*PALACES.red() | *PALACES.blue()).contains(square)
}

/// True if a palace diagonal leaves `square` heading in `dir`.
pub fn has_diagonal(square: Square, dir: Direction) -> bool {
    PALACE_DIAGONALS.contains(&(square, dir))
}

/// Squares along the palace diagonal from `square` in `dir`, nearest first,
/// stopping at the palace wall. Empty when no diagonal leaves `square` that
/// way.
pub fn palace_line(square: Square, dir: Direction) -> Vec<Square> {
    let mut line = Vec::new();
    if has_diagonal(square, dir) {
        let mut next = square + dir;
        while let Some(sq) = next {
            if !in_palace(sq) {
                break;
            }
            line.push(sq);
            next = sq + dir;
        }
    }
    line
}

#[inline]
pub(super) fn palace_steps(square: Square) -> Mask {
    PALACE_STEPS[square]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palaces() {
        assert_eq!(palace(Color::Red).len(), 9);
        assert_eq!(palace(Color::Blue).len(), 9);
        assert!(palace(Color::Red).contains(E2));
        assert!(palace(Color::Blue).contains(E9));
        assert!(!palace(Color::Red).contains(C2));
        assert!(!palace(Color::Blue).contains(E7));
        assert!(in_palace(F10));
        assert!(!in_palace(E5));
    }

    #[test]
    fn test_diagonals_only_from_corners_and_center() {
        for square in [E1, D2, F2, E3, E8, D9, F9, E10] {
            for dir in Direction::diagonals() {
                assert!(!has_diagonal(square, dir), "{square} {dir:?}");
            }
        }
        assert!(has_diagonal(D8, DownRight));
        assert!(!has_diagonal(D8, DownLeft));
        assert!(Direction::diagonals().all(|dir| has_diagonal(E2, dir)));
    }

    #[test]
    fn test_palace_line_from_corner() {
        assert_eq!(palace_line(D8, DownRight), vec![E9, F10]);
        assert_eq!(palace_line(F3, UpLeft), vec![E2, D1]);
        assert_eq!(palace_line(D8, UpLeft), Vec::<Square>::new());
    }

    #[test]
    fn test_palace_line_from_center() {
        assert_eq!(palace_line(E9, UpLeft), vec![D8]);
        assert_eq!(palace_line(E2, DownRight), vec![F3]);
    }

    #[test]
    fn test_palace_steps() {
        let steps = palace_steps(E9);
        assert_eq!(steps.len(), 8);
        let steps = palace_steps(E8);
        assert_eq!(steps, Mask::from_squares([D8, F8, E9]));
        let steps = palace_steps(D1);
        assert_eq!(steps, Mask::from_squares([E1, D2, E2]));
        assert!(palace_steps(E5).is_empty());
    }
}
