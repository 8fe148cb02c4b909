//! Victory detection.

use crate::board::{victory_positions, Board, Occupancy, Player, PlayerId};

/// Returns true if `player_id` alone fills every cell of their goal arm.
///
/// Stops at the first cell that is empty, owned by someone else, or not a
/// piece. An unknown player never wins.
pub fn has_won(player_id: &PlayerId, board: &Board, players: &[Player]) -> bool {
    let Some(player) = players.iter().find(|p| &p.id == player_id) else {
        return false;
    };

    for id in victory_positions(board.geometry(), player.play_direction) {
        let Ok(cell) = board.cell(id) else {
            return false;
        };
        match &cell.occupancy {
            Occupancy::Piece(owner) | Occupancy::Selected(owner) if owner == player_id => {}
            _ => return false,
        }
    }

    true
}
