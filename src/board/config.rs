//! Game configuration.
//!
//! A configuration is fixed for the lifetime of a game: the board width and
//! the ordered list of seated player ids. It can be built in code or read from
//! JSON, and is validated before any board is created.

use serde::{Deserialize, Serialize};

use super::geometry::BoardError;
use super::player::PlayerId;

/// Smallest supported board width (arms of two rows, three pieces each).
pub const MIN_WIDTH: u8 = 5;

/// Largest supported board width (arms of six rows).
pub const MAX_WIDTH: u8 = 13;

/// The standard 121-cell board.
pub const STANDARD_WIDTH: u8 = 9;

/// On this board the no-parking rule is waived when ending a turn.
pub const SMALL_BOARD_WIDTH: u8 = 5;

/// Errors that prevent a game instance from being created.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unsupported board width {0}: expected an odd width between 5 and 13")]
    UnsupportedWidth(u8),

    #[error("unsupported player count {0}: expected 2, 3, 4 or 6")]
    UnsupportedPlayerCount(usize),

    #[error("player '{0}' is configured more than once")]
    DuplicatePlayer(PlayerId),

    #[error("player ids must not be empty")]
    EmptyPlayerId,

    #[error("board is {board} wide but the configuration asks for {config}")]
    WidthMismatch { board: u8, config: u8 },

    #[error("player '{0}' is not part of the configuration")]
    UnknownPlayer(PlayerId),

    #[error(transparent)]
    Board(#[from] BoardError),

    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Immutable parameters of one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub width: u8,
    pub player_ids: Vec<PlayerId>,
}

impl GameConfig {
    pub fn new(width: u8, player_ids: Vec<PlayerId>) -> Self {
        GameConfig { width, player_ids }
    }

    /// Parses and validates a configuration such as
    /// `{"width": 9, "player_ids": ["ann", "bob"]}`.
    pub fn from_json(json: &str) -> Result<GameConfig, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn player_count(&self) -> usize {
        self.player_ids.len()
    }

    /// Checks the width and the seating list.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width % 2 == 0 || !(MIN_WIDTH..=MAX_WIDTH).contains(&self.width) {
            return Err(ConfigError::UnsupportedWidth(self.width));
        }
        if !matches!(self.player_count(), 2 | 3 | 4 | 6) {
            return Err(ConfigError::UnsupportedPlayerCount(self.player_count()));
        }
        for (i, id) in self.player_ids.iter().enumerate() {
            if id.as_str().is_empty() {
                return Err(ConfigError::EmptyPlayerId);
            }
            if self.player_ids[..i].contains(id) {
                return Err(ConfigError::DuplicatePlayer(id.clone()));
            }
        }
        Ok(())
    }
}
