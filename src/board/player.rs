//! Players, colors, and play directions.
//!
//! A play direction names the arm a player starts in and the opposite arm
//! they must fill to win. The fixed clockwise listing of directions is the
//! seating order that turns rotate through.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::geometry::Arm;

/// Opaque player identifier taken from the game configuration.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        PlayerId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        PlayerId(id.to_string())
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Piece color, assigned by seat index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerColor {
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    Orange,
}

pub const PLAYER_COLORS: [PlayerColor; 6] = [
    PlayerColor::Red,
    PlayerColor::Blue,
    PlayerColor::Green,
    PlayerColor::Yellow,
    PlayerColor::Purple,
    PlayerColor::Orange,
];

/// Direction a player moves across the board, home arm to goal arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayDirection {
    BottomToTop,
    BottomLeftToTopRight,
    TopLeftToBottomRight,
    TopToBottom,
    TopRightToBottomLeft,
    BottomRightToTopLeft,
}

/// The circular seating order, clockwise by home arm.
pub const DIRECTIONS_OF_PLAY: [PlayDirection; 6] = [
    PlayDirection::BottomToTop,
    PlayDirection::BottomLeftToTopRight,
    PlayDirection::TopLeftToBottomRight,
    PlayDirection::TopToBottom,
    PlayDirection::TopRightToBottomLeft,
    PlayDirection::BottomRightToTopLeft,
];

impl PlayDirection {
    /// The arm this direction's pieces start in.
    pub const fn home_arm(self) -> Arm {
        match self {
            PlayDirection::BottomToTop => Arm::Bottom,
            PlayDirection::BottomLeftToTopRight => Arm::BottomLeft,
            PlayDirection::TopLeftToBottomRight => Arm::TopLeft,
            PlayDirection::TopToBottom => Arm::Top,
            PlayDirection::TopRightToBottomLeft => Arm::TopRight,
            PlayDirection::BottomRightToTopLeft => Arm::BottomRight,
        }
    }

    /// The arm this direction's pieces must fill to win.
    pub const fn goal_arm(self) -> Arm {
        self.home_arm().opposite()
    }

    /// Position of this direction in `DIRECTIONS_OF_PLAY`.
    pub fn seat_index(self) -> usize {
        DIRECTIONS_OF_PLAY
            .iter()
            .position(|&d| d == self)
            .unwrap_or_default()
    }

    /// Directions handed out to players, in configuration order, for a
    /// supported player count.
    pub fn seating_for(player_count: usize) -> Option<&'static [PlayDirection]> {
        use PlayDirection::*;
        const TWO: [PlayDirection; 2] = [BottomToTop, TopToBottom];
        const THREE: [PlayDirection; 3] = [BottomToTop, TopLeftToBottomRight, TopRightToBottomLeft];
        const FOUR: [PlayDirection; 4] =
            [BottomToTop, BottomLeftToTopRight, TopToBottom, TopRightToBottomLeft];
        match player_count {
            2 => Some(&TWO),
            3 => Some(&THREE),
            4 => Some(&FOUR),
            6 => Some(&DIRECTIONS_OF_PLAY),
            _ => None,
        }
    }
}

/// A seated player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub display_name: String,
    pub color: PlayerColor,
    pub play_direction: PlayDirection,
    pub has_won: bool,
}
