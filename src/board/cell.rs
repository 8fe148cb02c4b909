//! Cells, occupancy, and the board that owns them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::geometry::{BoardError, CellId, Geometry};
use super::player::PlayerId;

/// What a cell currently shows.
///
/// Only `Piece` and `Selected` carry an owner.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Occupancy {
    Empty,
    Piece(PlayerId),
    Selected(PlayerId),
    PossibleMove,
}

impl Occupancy {
    /// The owning player of a piece on this cell.
    pub fn owner(&self) -> Option<&PlayerId> {
        match self {
            Occupancy::Piece(owner) | Occupancy::Selected(owner) => Some(owner),
            Occupancy::Empty | Occupancy::PossibleMove => None,
        }
    }

    /// Returns true if a piece stands on the cell.
    pub fn is_occupied(&self) -> bool {
        self.owner().is_some()
    }
}

/// A single board cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub id: CellId,
    pub occupancy: Occupancy,
    /// Outside the playable star for the current player count.
    pub blocked: bool,
}

impl Cell {
    pub fn empty(id: CellId) -> Self {
        Cell {
            id,
            occupancy: Occupancy::Empty,
            blocked: false,
        }
    }

    /// Returns true if a piece may come to rest here.
    pub fn is_open(&self) -> bool {
        !self.blocked && !self.occupancy.is_occupied()
    }
}

/// Every cell of a star board, keyed by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    geometry: Geometry,
    cells: BTreeMap<CellId, Cell>,
}

impl Board {
    /// Creates a board with every cell empty and unblocked.
    pub fn new(geometry: Geometry) -> Self {
        let cells = geometry
            .cells()
            .into_iter()
            .map(|id| (id, Cell::empty(id)))
            .collect();
        Board { geometry, cells }
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn cell(&self, id: CellId) -> Result<&Cell, BoardError> {
        self.cells.get(&id).ok_or(BoardError::InvalidCell(id))
    }

    pub(crate) fn cell_mut(&mut self, id: CellId) -> Result<&mut Cell, BoardError> {
        self.cells.get_mut(&id).ok_or(BoardError::InvalidCell(id))
    }

    /// Replaces the occupancy of a cell.
    pub fn set_occupancy(&mut self, id: CellId, occupancy: Occupancy) -> Result<(), BoardError> {
        self.cell_mut(id)?.occupancy = occupancy;
        Ok(())
    }

    pub fn set_blocked(&mut self, id: CellId, blocked: bool) -> Result<(), BoardError> {
        self.cell_mut(id)?.blocked = blocked;
        Ok(())
    }

    /// Cell ids in row-major order.
    pub fn cell_ids(&self) -> impl Iterator<Item = CellId> + '_ {
        self.cells.keys().copied()
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.cells.values()
    }

    /// The currently selected cell, if any.
    pub fn selected(&self) -> Option<&Cell> {
        self.cells
            .values()
            .find(|c| matches!(c.occupancy, Occupancy::Selected(_)))
    }

    /// Cells holding a piece of `player`, selected or not.
    pub fn pieces_of<'a>(&'a self, player: &'a PlayerId) -> impl Iterator<Item = CellId> + 'a {
        self.cells
            .values()
            .filter(move |c| c.occupancy.owner() == Some(player))
            .map(|c| c.id)
    }
}
