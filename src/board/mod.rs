//! Board representation.
//!
//! Contains the star geometry, cells and their occupancy, players and play
//! directions, the game configuration, and the initial setup.

pub mod cell;
pub mod config;
pub mod geometry;
pub mod player;
pub mod setup;

pub use cell::{Board, Cell, Occupancy};
pub use config::{ConfigError, GameConfig, MAX_WIDTH, MIN_WIDTH, SMALL_BOARD_WIDTH, STANDARD_WIDTH};
pub use geometry::{Arm, BoardError, CellId, Direction, Geometry, Neighbors, Position};
pub use player::{PlayDirection, Player, PlayerColor, PlayerId, DIRECTIONS_OF_PLAY, PLAYER_COLORS};
pub use setup::{create_players, init_blocked_positions, init_board, init_pieces, victory_positions};
