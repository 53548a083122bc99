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

#[cfg(feature = "random")]
use rand::{thread_rng, Rng};
use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::{Color, Move};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct GameId(u64);

impl GameId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }
    #[cfg(feature = "random")]
    pub fn random() -> Self {
        Self(thread_rng().gen())
    }
}

/// Whether a game is still in progress and, if not, who won it. Once a
/// game is won it never changes state again.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Display, PartialEq, Eq, Hash, Default)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum GameState {
    #[default]
    Unfinished,
    RedWon,
    BlueWon,
}

impl GameState {
    pub fn won_by(color: Color) -> Self {
        match color {
            Color::Red => Self::RedWon,
            Color::Blue => Self::BlueWon,
        }
    }

    pub fn winner(&self) -> Option<Color> {
        match self {
            Self::Unfinished => None,
            Self::RedWon => Some(Color::Red),
            Self::BlueWon => Some(Color::Blue),
        }
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        *self != Self::Unfinished
    }
}

/// Everything needed to reproduce a game: the moves played from the
/// opening layout (passes included) and the state they led to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameRecord {
    pub id: GameId,
    pub moves: Vec<Move>,
    pub state: GameState,
}
