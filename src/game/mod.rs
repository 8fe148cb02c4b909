//! Turn and move state.
//!
//! `GameInstance` owns the board and the per-turn state. It is created from a
//! configuration and afterwards changed only through its three commands:
//! `select_cell`, `select_destination`, and `advance_turn`.

pub mod loading;
pub mod state;
pub mod turn;
pub mod victory;

use crate::board::{BoardError, CellId};

pub use loading::{GameSlot, LoadStatus};
pub use state::{initialize_game, CurrentMove, GameInstance, InitialGame, MoveType, Seating, TurnPhase};
pub use turn::Transition;
pub use victory::has_won;

/// Contract violations by the caller of the turn commands.
///
/// Ordinary misclicks are not errors; they yield `Transition::Unchanged`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("cannot move without a selected piece")]
    NoSelection,

    #[error("{0} is not a legal destination for the selected piece")]
    IllegalDestination(CellId),

    #[error(transparent)]
    Board(#[from] BoardError),
}
