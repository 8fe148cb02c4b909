//! Driver command parser.
//!
//! Parses incoming text commands into structured `Command` variants that the
//! main loop dispatches on.

use tracing::warn;

use crate::board::{CellId, PlayerId};

/// A parsed driver command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Synchronization ping; the engine replies `readyok`.
    IsReady,

    /// Start a new game: `newgame <width> <player> <player>...`.
    NewGame { width: u8, players: Vec<PlayerId> },

    /// Click a piece: `select <x>,<y>`.
    Select { cell: CellId },

    /// Move the selected piece: `move <x>,<y>`.
    Move { cell: CellId },

    /// End the current turn.
    EndTurn,

    /// Report whose turn it is and the step counter.
    Status,

    /// List the highlighted destinations.
    Moves,

    /// Terminate the driver.
    Quit,
}

/// Parses a single line of input into a `Command`.
///
/// Returns `None` for empty lines, unknown commands, and malformed arguments.
pub fn parse_command(line: &str) -> Option<Command> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let (&first, args) = tokens.split_first()?;

    match first {
        "isready" => Some(Command::IsReady),
        "endturn" => Some(Command::EndTurn),
        "status" => Some(Command::Status),
        "moves" => Some(Command::Moves),
        "quit" => Some(Command::Quit),

        "newgame" => parse_newgame(args),
        "select" => parse_cell(args, "select").map(|cell| Command::Select { cell }),
        "move" => parse_cell(args, "move").map(|cell| Command::Move { cell }),

        other => {
            warn!(command = other, "unknown command");
            None
        }
    }
}

/// Parses `newgame <width> <player> <player>...`.
fn parse_newgame(args: &[&str]) -> Option<Command> {
    let Some((width, players)) = args.split_first() else {
        warn!("malformed newgame: expected 'newgame <width> <player>...'");
        return None;
    };
    let width = match width.parse::<u8>() {
        Ok(w) => w,
        Err(_) => {
            warn!(width, "invalid newgame width");
            return None;
        }
    };
    let players = players.iter().map(|p| PlayerId::from(*p)).collect();
    Some(Command::NewGame { width, players })
}

/// Parses the single `<x>,<y>` argument of `select` and `move`.
fn parse_cell(args: &[&str], command: &str) -> Option<CellId> {
    let [cell] = args else {
        warn!(command, "malformed command: expected one '<x>,<y>' argument");
        return None;
    };
    match cell.parse::<CellId>() {
        Ok(id) => Some(id),
        Err(e) => {
            warn!(command, error = %e, "invalid cell");
            None
        }
    }
}
