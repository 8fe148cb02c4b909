//! Legal move generation.
//!
//! From a selected piece, a move is either a shift to an adjacent open cell or
//! a jump over an adjacent piece to the open cell directly beyond it. Jumps
//! chain: every landing cell is searched again for further jumps.

use std::collections::BTreeSet;

use crate::board::{Board, BoardError, CellId, Direction, Position};

/// Returns every destination reachable from `start` in one turn.
///
/// Shift destinations come first in direction order, followed by jump
/// landings in depth-first discovery order. Each cell appears once and
/// `start` never does. The moving piece is treated as having left `start`,
/// so a chain can neither hop over it nor land on it.
pub fn valid_moves(start: CellId, board: &Board) -> Result<Vec<CellId>, BoardError> {
    let geometry = board.geometry();
    let origin = geometry.to_position(start)?;
    let mut moves = Vec::new();

    for dir in Direction::ALL {
        if let Some(next) = geometry.step(origin, dir) {
            if board.cell(next)?.is_open() {
                moves.push(next);
            }
        }
    }

    let mut landed = BTreeSet::new();
    collect_jumps(start, origin, board, &mut landed, &mut moves)?;
    Ok(moves)
}

/// Returns only the chained-jump landings reachable from `start`.
pub fn jump_moves(start: CellId, board: &Board) -> Result<Vec<CellId>, BoardError> {
    let origin = board.geometry().to_position(start)?;
    let mut moves = Vec::new();
    let mut landed = BTreeSet::new();
    collect_jumps(start, origin, board, &mut landed, &mut moves)?;
    Ok(moves)
}

/// Depth-first search for jump landings from `from`, skipping cells already
/// landed on in this query.
fn collect_jumps(
    start: CellId,
    from: Position,
    board: &Board,
    landed: &mut BTreeSet<CellId>,
    moves: &mut Vec<CellId>,
) -> Result<(), BoardError> {
    let geometry = board.geometry();

    for dir in Direction::ALL {
        let Some(over) = geometry.step(from, dir) else {
            continue;
        };
        if over == start {
            continue;
        }
        let over_cell = board.cell(over)?;
        if over_cell.blocked || !over_cell.occupancy.is_occupied() {
            continue;
        }

        let Some(landing) = geometry.step(over.position(), dir) else {
            continue;
        };
        if landing == start || landed.contains(&landing) {
            continue;
        }
        if !board.cell(landing)?.is_open() {
            continue;
        }

        landed.insert(landing);
        if !moves.contains(&landing) {
            moves.push(landing);
        }
        collect_jumps(start, landing.position(), board, landed, moves)?;
    }

    Ok(())
}
