//! Driver state and command handling.
//!
//! Holds the game slot between commands and turns each command into one
//! response line. All rules live in `game`; this layer only formats.

use std::io::{self, Write};

use crate::board::{CellId, ConfigError, GameConfig, PlayerId};
use crate::game::{GameInstance, GameSlot, MoveType, Transition, TurnPhase};
use crate::protocol::Command;

/// What the main loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Holds the mutable state of the driver between commands.
#[derive(Debug, Default)]
pub struct Engine {
    slot: GameSlot,
}

impl Engine {
    /// Creates an engine with no game loaded.
    pub fn new() -> Self {
        Engine::default()
    }

    pub fn slot(&self) -> &GameSlot {
        &self.slot
    }

    pub fn game(&self) -> Option<&GameInstance> {
        self.slot.game()
    }

    /// Loads a new game from `config`, replacing any current one.
    pub fn load(&mut self, config: GameConfig) -> Result<(), ConfigError> {
        self.slot.load(config).map(|_| ())
    }

    /// Dispatches one parsed command and writes its response.
    pub fn handle<W: Write>(&mut self, cmd: Command, out: &mut W) -> io::Result<Flow> {
        match cmd {
            Command::IsReady => writeln!(out, "readyok")?,
            Command::NewGame { width, players } => self.handle_newgame(width, players, out)?,
            Command::Select { cell } => self.handle_select(cell, out)?,
            Command::Move { cell } => self.handle_move(cell, out)?,
            Command::EndTurn => self.handle_endturn(out)?,
            Command::Status => self.handle_status(out)?,
            Command::Moves => self.handle_moves(out)?,
            Command::Quit => return Ok(Flow::Quit),
        }
        out.flush()?;
        Ok(Flow::Continue)
    }

    fn handle_newgame<W: Write>(&mut self, width: u8, players: Vec<PlayerId>, out: &mut W) -> io::Result<()> {
        let config = GameConfig::new(width, players);
        match self.load(config) {
            Ok(()) => {
                let ids: Vec<String> = self
                    .game()
                    .map(|g| g.player_ids().map(|p| p.to_string()).collect())
                    .unwrap_or_default();
                writeln!(out, "loaded {} {}", width, ids.join(" "))
            }
            Err(e) => writeln!(out, "error {}", e),
        }
    }

    fn handle_select<W: Write>(&mut self, cell: CellId, out: &mut W) -> io::Result<()> {
        let Some(game) = self.slot.game_mut() else {
            return writeln!(out, "error no game loaded");
        };
        match game.select_cell(cell) {
            Ok(t) => write_transition(&t, out),
            Err(e) => writeln!(out, "error {}", e),
        }
    }

    fn handle_move<W: Write>(&mut self, cell: CellId, out: &mut W) -> io::Result<()> {
        let Some(game) = self.slot.game_mut() else {
            return writeln!(out, "error no game loaded");
        };
        match game.select_destination(cell) {
            Ok(t) => write_transition(&t, out),
            Err(e) => writeln!(out, "error {}", e),
        }
    }

    /// Ends the turn only when the rules allow the player to stop here.
    fn handle_endturn<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        let Some(game) = self.slot.game_mut() else {
            return writeln!(out, "error no game loaded");
        };
        if !game.can_end_turn() {
            return writeln!(out, "error cannot end turn");
        }
        let t = game.advance_turn();
        write_transition(&t, out)
    }

    fn handle_status<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let Some(game) = self.game() else {
            return writeln!(out, "error no game loaded");
        };
        let phase = match game.phase() {
            TurnPhase::NoSelection => "idle",
            TurnPhase::PieceSelected => "selected",
            TurnPhase::Won => "won",
        };
        writeln!(
            out,
            "status turn {} step {} phase {} canend {}",
            game.current_move().player_id_to_move,
            game.step_counter(),
            phase,
            game.can_end_turn()
        )
    }

    fn handle_moves<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let Some(game) = self.game() else {
            return writeln!(out, "error no game loaded");
        };
        writeln!(out, "moves{}", format_cells(game.possible_moves()))
    }
}

/// Formats cells as a space-prefixed list, empty for no cells.
fn format_cells(cells: &[CellId]) -> String {
    cells.iter().map(|c| format!(" {}", c)).collect()
}

fn write_transition<W: Write>(t: &Transition, out: &mut W) -> io::Result<()> {
    match t {
        Transition::Unchanged => writeln!(out, "unchanged"),
        Transition::Selected { cell, moves } => {
            writeln!(out, "selected {} moves{}", cell, format_cells(moves))
        }
        Transition::Deselected { cell } => writeln!(out, "deselected {}", cell),
        Transition::Moved { from, to, move_type } => {
            let kind = match move_type {
                MoveType::Shift => "shift",
                MoveType::Jump => "jump",
            };
            writeln!(out, "moved {} {} {}", from, to, kind)
        }
        Transition::TurnPassed { next } => writeln!(out, "turn {}", next),
        Transition::Won { player } => writeln!(out, "won {}", player),
    }
}
