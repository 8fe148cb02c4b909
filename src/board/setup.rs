//! Board initialization.
//!
//! Builds the deterministic starting position for a configuration: the star's
//! cells, blocked arms that no seated player uses, and each player's pieces in
//! their home arm.

use tracing::debug;

use super::cell::{Board, Occupancy};
use super::config::{ConfigError, GameConfig};
use super::geometry::{Arm, CellId, Geometry};
use super::player::{PlayDirection, Player, PLAYER_COLORS};

/// Creates every cell of the configured board, empty and unblocked.
pub fn init_board(config: &GameConfig) -> Result<Board, ConfigError> {
    let geometry = Geometry::new(config.width)?;
    Ok(Board::new(geometry))
}

/// Creates the players in configuration order with seat-assigned directions
/// and colors.
pub fn create_players(config: &GameConfig) -> Result<Vec<Player>, ConfigError> {
    config.validate()?;
    let seating = PlayDirection::seating_for(config.player_count())
        .ok_or(ConfigError::UnsupportedPlayerCount(config.player_count()))?;

    Ok(config
        .player_ids
        .iter()
        .zip(seating)
        .enumerate()
        .map(|(i, (id, &direction))| Player {
            id: id.clone(),
            display_name: id.to_string(),
            color: PLAYER_COLORS[i],
            play_direction: direction,
            has_won: false,
        })
        .collect())
}

/// Arms that are some seated direction's home or goal.
fn arms_in_play(config: &GameConfig) -> Result<Vec<Arm>, ConfigError> {
    let seating = PlayDirection::seating_for(config.player_count())
        .ok_or(ConfigError::UnsupportedPlayerCount(config.player_count()))?;
    let mut arms = Vec::new();
    for d in seating {
        for arm in [d.home_arm(), d.goal_arm()] {
            if !arms.contains(&arm) {
                arms.push(arm);
            }
        }
    }
    Ok(arms)
}

/// Blocks every cell of the arms not in play at this player count.
pub fn init_blocked_positions(board: &mut Board, config: &GameConfig) -> Result<(), ConfigError> {
    let geometry = board_geometry(board, config)?;
    let in_play = arms_in_play(config)?;
    for arm in Arm::ALL {
        let blocked = !in_play.contains(&arm);
        for id in geometry.arm_cells(arm) {
            board.set_blocked(id, blocked)?;
        }
    }
    debug!(?in_play, "blocked unused arms");
    Ok(())
}

/// Fills each player's home arm with their pieces.
pub fn init_pieces(board: &mut Board, players: &[Player], config: &GameConfig) -> Result<(), ConfigError> {
    let geometry = board_geometry(board, config)?;
    for player in players {
        if !config.player_ids.contains(&player.id) {
            return Err(ConfigError::UnknownPlayer(player.id.clone()));
        }
        for id in geometry.arm_cells(player.play_direction.home_arm()) {
            board.set_occupancy(id, Occupancy::Piece(player.id.clone()))?;
        }
    }
    Ok(())
}

/// The board's geometry, provided it was built for `config`.
fn board_geometry(board: &Board, config: &GameConfig) -> Result<Geometry, ConfigError> {
    let geometry = *board.geometry();
    if geometry.width() != config.width {
        return Err(ConfigError::WidthMismatch {
            board: geometry.width(),
            config: config.width,
        });
    }
    Ok(geometry)
}

/// Cells a player moving in `direction` must fill to win.
pub fn victory_positions(geometry: &Geometry, direction: PlayDirection) -> Vec<CellId> {
    geometry.arm_cells(direction.goal_arm())
}
