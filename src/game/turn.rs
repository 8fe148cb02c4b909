//! Turn state machine.
//!
//! Three commands drive a game: selecting one of your pieces, selecting a
//! destination for it, and ending the turn. Misclicks leave the game
//! untouched and report `Transition::Unchanged`; calling
//! `select_destination` without a selection is a caller bug and returns
//! `GameError::NoSelection`.
//!
//! The possible-move list and the cells marked `PossibleMove` are always
//! rebuilt together from the selected cell, never edited piecemeal.
//!
//! Only jumps chain. After a jump the piece may keep jumping but never back
//! onto the cell its turn started from; after a shift it may not move again
//! and the turn stays open until it is ended.

use tracing::{debug, info};

use super::state::{CurrentMove, GameInstance, MoveType};
use super::victory::has_won;
use super::GameError;
use crate::board::{BoardError, CellId, Occupancy, PlayerId};
use crate::movegen::{jump_moves, valid_moves};

/// What a command did to the game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// The command was absorbed without any state change.
    Unchanged,
    Selected { cell: CellId, moves: Vec<CellId> },
    Deselected { cell: CellId },
    /// The piece moved and stays selected for further moves.
    Moved {
        from: CellId,
        to: CellId,
        move_type: MoveType,
    },
    TurnPassed { next: PlayerId },
    Won { player: PlayerId },
}

impl GameInstance {
    /// Handles a click on `id` by the player to move.
    pub fn select_cell(&mut self, id: CellId) -> Result<Transition, GameError> {
        let cell = self.board.cell(id)?;
        if self.won {
            return Ok(Transition::Unchanged);
        }

        let (owner, already_selected) = match &cell.occupancy {
            Occupancy::Piece(owner) => (owner.clone(), false),
            Occupancy::Selected(owner) => (owner.clone(), true),
            Occupancy::Empty | Occupancy::PossibleMove => return Ok(Transition::Unchanged),
        };
        if owner != self.current_move.player_id_to_move {
            return Ok(Transition::Unchanged);
        }

        self.clear_possible_moves();

        if already_selected {
            self.deselect_any();
            debug!(cell = %id, "deselected");
            return Ok(Transition::Deselected { cell: id });
        }

        self.deselect_any();

        // Picking a different piece after moving ends the turn.
        if let Some(last) = self.current_move.last_moved {
            if last != id {
                let passed = self.advance_turn();
                if self.current_move.player_id_to_move != owner {
                    return Ok(passed);
                }
            }
        }

        if !self.current_move.has_moved() {
            self.current_move.initially_selected = Some(id);
        }
        self.board.set_occupancy(id, Occupancy::Selected(owner))?;
        let moves = self.moves_from(id)?;
        self.set_possible_moves(moves.clone());

        debug!(cell = %id, moves = moves.len(), "selected");
        Ok(Transition::Selected { cell: id, moves })
    }

    /// Moves the selected piece to `dest`.
    ///
    /// `dest` must be one of the current possible moves. After the move the
    /// game is either won, passed to the next player because a jump chain has
    /// run out, or left with the piece selected at `dest`. A shift leaves the
    /// piece selected with nothing more to do.
    pub fn select_destination(&mut self, dest: CellId) -> Result<Transition, GameError> {
        let (source, owner) = self.selection().ok_or(GameError::NoSelection)?;
        self.board.cell(dest)?;
        if !self.possible_moves.contains(&dest) {
            return Err(GameError::IllegalDestination(dest));
        }

        self.board.set_occupancy(source, Occupancy::Empty)?;
        self.clear_possible_moves();
        self.board.set_occupancy(dest, Occupancy::Selected(owner.clone()))?;

        let move_type = MoveType::classify(source.position(), dest.position());
        self.current_move.move_type = Some(move_type);
        self.current_move.last_moved = Some(dest);
        debug!(from = %source, to = %dest, ?move_type, "moved");

        if has_won(&owner, &self.board, &self.players) {
            self.deselect_any();
            self.clear_possible_moves();
            self.won = true;
            if let Some(player) = self.players.iter_mut().find(|p| p.id == owner) {
                player.has_won = true;
            }
            self.step_counter += 1;
            info!(player = %owner, step = self.step_counter, "game won");
            return Ok(Transition::Won { player: owner });
        }

        let moves = self.moves_from(dest)?;
        if moves.is_empty() && move_type == MoveType::Jump {
            return Ok(self.advance_turn());
        }
        self.set_possible_moves(moves);

        Ok(Transition::Moved {
            from: source,
            to: dest,
            move_type,
        })
    }

    /// Passes the turn to the next seated player.
    ///
    /// Does nothing until a piece has moved this turn, and nothing once the
    /// game is won.
    pub fn advance_turn(&mut self) -> Transition {
        if self.won || !self.current_move.has_moved() {
            return Transition::Unchanged;
        }
        let Some(direction) = self.play_direction() else {
            return Transition::Unchanged;
        };

        self.deselect_any();
        self.clear_possible_moves();
        self.step_counter += 1;

        let next = self
            .seating
            .next_after(direction)
            .cloned()
            .unwrap_or_else(|| self.current_move.player_id_to_move.clone());
        self.current_move = CurrentMove::new(next.clone());

        info!(next = %next, step = self.step_counter, "turn passed");
        Transition::TurnPassed { next }
    }

    /// Destinations for the piece on `from`, given what moved this turn.
    fn moves_from(&self, from: CellId) -> Result<Vec<CellId>, BoardError> {
        match self.current_move.move_type {
            None => valid_moves(from, &self.board),
            Some(MoveType::Shift) => Ok(Vec::new()),
            Some(MoveType::Jump) => {
                let start = self.current_move.initially_selected;
                let mut moves = jump_moves(from, &self.board)?;
                moves.retain(|&c| Some(c) != start);
                Ok(moves)
            }
        }
    }

    /// Returns the selected piece, if any, to plain `Piece` occupancy.
    fn deselect_any(&mut self) {
        let Some((id, owner)) = self.selection() else {
            return;
        };
        if let Ok(cell) = self.board.cell_mut(id) {
            cell.occupancy = Occupancy::Piece(owner);
        }
    }

    fn clear_possible_moves(&mut self) {
        for id in std::mem::take(&mut self.possible_moves) {
            if let Ok(cell) = self.board.cell_mut(id) {
                if cell.occupancy == Occupancy::PossibleMove {
                    cell.occupancy = Occupancy::Empty;
                }
            }
        }
    }

    fn set_possible_moves(&mut self, moves: Vec<CellId>) {
        for &id in &moves {
            if let Ok(cell) = self.board.cell_mut(id) {
                cell.occupancy = Occupancy::PossibleMove;
            }
        }
        self.possible_moves = moves;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{GameConfig, Geometry, PlayDirection};
    use crate::game::TurnPhase;

    fn game(width: u8, names: &[&str]) -> GameInstance {
        let config = GameConfig::new(width, names.iter().map(|n| PlayerId::from(*n)).collect());
        GameInstance::new(config).unwrap()
    }

    fn at(game: &GameInstance, x: i32, y: i32) -> CellId {
        game.board().geometry().to_cell_id(x, y).unwrap()
    }

    /// Cells showing `PossibleMove`, in row-major order.
    fn marked(game: &GameInstance) -> Vec<CellId> {
        game.board()
            .cells()
            .filter(|c| c.occupancy == Occupancy::PossibleMove)
            .map(|c| c.id)
            .collect()
    }

    /// A width-9 game for ann and bob holding only the given pieces.
    fn bare_game(pieces: &[(i32, i32, &str)]) -> GameInstance {
        let mut g = game(9, &["ann", "bob"]);
        let ids: Vec<CellId> = g.board.cell_ids().collect();
        for id in ids {
            g.board.set_occupancy(id, Occupancy::Empty).unwrap();
        }
        for &(x, y, owner) in pieces {
            let id = at(&g, x, y);
            g.board.set_occupancy(id, Occupancy::Piece(PlayerId::from(owner))).unwrap();
        }
        g
    }

    fn sorted(mut v: Vec<CellId>) -> Vec<CellId> {
        v.sort();
        v
    }

    // On the width-5 board ann starts in the bottom arm: (-2,3), (-1,3)
    // and the tip (-2,4). bob starts in the top arm: (1,-3), (2,-3), (2,-4).

    #[test]
    fn selecting_own_piece_marks_moves() {
        let mut g = game(5, &["ann", "bob"]);
        let front = at(&g, -1, 3);
        let t = g.select_cell(front).unwrap();
        let Transition::Selected { cell, moves } = t else {
            panic!("expected selection, got {:?}", t);
        };
        assert_eq!(cell, front);
        assert_eq!(moves, valid_moves_of(&g, front));
        assert_eq!(g.selected_cell(), Some(front));
        assert_eq!(g.phase(), TurnPhase::PieceSelected);
        assert_eq!(sorted(g.possible_moves().to_vec()), marked(&g));
        assert_eq!(g.current_move().initially_selected, Some(front));
    }

    fn valid_moves_of(g: &GameInstance, id: CellId) -> Vec<CellId> {
        // Possible-move markers count as empty, so this matches a fresh query.
        valid_moves(id, g.board()).unwrap()
    }

    #[test]
    fn misclicks_change_nothing() {
        let mut g = game(5, &["ann", "bob"]);
        let before = g.clone();
        let bobs = at(&g, 1, -3);
        let empty = at(&g, 0, 0);
        let blocked = at(&g, 3, -1);
        assert!(g.board().cell(blocked).unwrap().blocked);
        for id in [bobs, empty, blocked] {
            assert_eq!(g.select_cell(id).unwrap(), Transition::Unchanged);
            assert_eq!(g, before);
        }
    }

    #[test]
    fn reselecting_deselects() {
        let mut g = game(5, &["ann", "bob"]);
        let front = at(&g, -1, 3);
        g.select_cell(front).unwrap();
        assert_eq!(g.select_cell(front).unwrap(), Transition::Deselected { cell: front });
        assert_eq!(g.selected_cell(), None);
        assert!(g.possible_moves().is_empty());
        assert!(marked(&g).is_empty());
        assert_eq!(g.phase(), TurnPhase::NoSelection);
    }

    #[test]
    fn switching_selection_before_moving() {
        let mut g = game(5, &["ann", "bob"]);
        let a = at(&g, -1, 3);
        let b = at(&g, -2, 3);
        g.select_cell(a).unwrap();
        g.select_cell(b).unwrap();
        assert_eq!(g.selected_cell(), Some(b));
        assert_eq!(g.board().cell(a).unwrap().occupancy, Occupancy::Piece(PlayerId::from("ann")));
        assert_eq!(g.current_move().initially_selected, Some(b));
        assert_eq!(sorted(g.possible_moves().to_vec()), marked(&g));
    }

    #[test]
    fn destination_without_selection_is_an_error() {
        let mut g = game(5, &["ann", "bob"]);
        let target = at(&g, 0, 0);
        assert_eq!(g.select_destination(target), Err(GameError::NoSelection));
    }

    #[test]
    fn destination_outside_possible_moves_is_an_error() {
        let mut g = game(5, &["ann", "bob"]);
        g.select_cell(at(&g, -1, 3)).unwrap();
        let far = at(&g, 0, 0);
        assert_eq!(g.select_destination(far), Err(GameError::IllegalDestination(far)));
    }

    #[test]
    fn shift_keeps_turn_and_piece_selected() {
        let mut g = game(5, &["ann", "bob"]);
        let from = at(&g, -1, 3);
        let to = at(&g, -1, 2);
        g.select_cell(from).unwrap();
        let t = g.select_destination(to).unwrap();
        assert_eq!(
            t,
            Transition::Moved {
                from,
                to,
                move_type: MoveType::Shift
            }
        );
        assert_eq!(g.board().cell(from).unwrap().occupancy, Occupancy::Empty);
        assert_eq!(g.selected_cell(), Some(to));
        assert_eq!(g.current_move().last_moved, Some(to));
        assert_eq!(g.current_move().move_type, Some(MoveType::Shift));
        assert_eq!(g.step_counter(), 0);
        assert!(g.can_end_turn());
        assert!(g.possible_moves().is_empty());
        assert!(marked(&g).is_empty());
        let selected = g
            .board()
            .cells()
            .filter(|c| matches!(c.occupancy, Occupancy::Selected(_)))
            .count();
        assert_eq!(selected, 1);
    }

    #[test]
    fn advance_without_move_is_a_noop() {
        let mut g = game(5, &["ann", "bob"]);
        g.select_cell(at(&g, -1, 3)).unwrap();
        let before = g.clone();
        assert_eq!(g.advance_turn(), Transition::Unchanged);
        assert_eq!(g, before);
    }

    #[test]
    fn advance_after_move_rotates_and_clears() {
        let mut g = game(5, &["ann", "bob"]);
        g.select_cell(at(&g, -1, 3)).unwrap();
        g.select_destination(at(&g, -1, 2)).unwrap();
        assert_eq!(
            g.advance_turn(),
            Transition::TurnPassed {
                next: PlayerId::from("bob")
            }
        );
        assert_eq!(g.current_move(), &CurrentMove::new(PlayerId::from("bob")));
        assert_eq!(g.play_direction(), Some(PlayDirection::TopToBottom));
        assert_eq!(g.step_counter(), 1);
        assert_eq!(g.selected_cell(), None);
        assert!(marked(&g).is_empty());
    }

    #[test]
    fn picking_another_piece_after_moving_ends_the_turn() {
        let mut g = game(5, &["ann", "bob"]);
        g.select_cell(at(&g, -1, 3)).unwrap();
        g.select_destination(at(&g, -1, 2)).unwrap();
        let t = g.select_cell(at(&g, -2, 3)).unwrap();
        assert_eq!(t, Transition::TurnPassed { next: PlayerId::from("bob") });
        assert_eq!(g.selected_cell(), None);
        assert_eq!(g.step_counter(), 1);
    }

    #[test]
    fn reselecting_the_moved_piece_keeps_the_turn() {
        let mut g = game(5, &["ann", "bob"]);
        let from = at(&g, -1, 3);
        let to = at(&g, -1, 2);
        g.select_cell(from).unwrap();
        g.select_destination(to).unwrap();
        assert_eq!(g.select_cell(to).unwrap(), Transition::Deselected { cell: to });
        assert_eq!(g.select_cell(to).unwrap(), Transition::Selected { cell: to, moves: vec![] });
        assert_eq!(g.current_move().initially_selected, Some(from));
        assert_eq!(g.current_move().player_id_to_move, PlayerId::from("ann"));
    }

    #[test]
    fn no_second_move_after_a_shift() {
        let mut g = game(9, &["ann", "bob"]);
        let from = at(&g, -1, 5);
        let to = at(&g, -1, 4);
        g.select_cell(from).unwrap();
        g.select_destination(to).unwrap();
        assert!(g.possible_moves().is_empty());
        for next in [at(&g, -1, 3), from] {
            assert_eq!(g.select_destination(next), Err(GameError::IllegalDestination(next)));
        }
        assert_eq!(g.current_move().player_id_to_move, PlayerId::from("ann"));
        assert_eq!(g.step_counter(), 0);
        assert_eq!(g.board().cell(from).unwrap().occupancy, Occupancy::Empty);
    }

    #[test]
    fn jump_then_shift_is_refused() {
        let mut g = bare_game(&[(0, 0, "ann"), (1, 0, "bob"), (3, 0, "bob")]);
        let start = at(&g, 0, 0);
        let landing = at(&g, 2, 0);
        g.select_cell(start).unwrap();
        let t = g.select_destination(landing).unwrap();
        assert!(matches!(t, Transition::Moved { move_type: MoveType::Jump, .. }));
        // Hopping back over (1,0) would land on the start cell.
        assert_eq!(g.possible_moves(), &[at(&g, 4, 0)]);
        let beside = at(&g, 2, -1);
        assert_eq!(g.select_destination(beside), Err(GameError::IllegalDestination(beside)));
        assert_eq!(g.board().cell(start).unwrap().occupancy, Occupancy::Empty);
    }

    #[test]
    fn jump_without_follow_up_passes_the_turn() {
        let mut g = bare_game(&[(0, 0, "ann"), (1, 0, "bob")]);
        g.select_cell(at(&g, 0, 0)).unwrap();
        let t = g.select_destination(at(&g, 2, 0)).unwrap();
        assert_eq!(t, Transition::TurnPassed { next: PlayerId::from("bob") });
        assert_eq!(g.step_counter(), 1);
        assert_eq!(
            g.board().cell(at(&g, 2, 0)).unwrap().occupancy,
            Occupancy::Piece(PlayerId::from("ann"))
        );
    }

    #[test]
    fn ending_on_the_start_cell_cannot_end_turn() {
        let mut g = game(5, &["ann", "bob"]);
        let from = at(&g, -1, 3);
        g.current_move.initially_selected = Some(from);
        g.current_move.last_moved = Some(from);
        assert!(!g.can_end_turn());
    }

    #[test]
    fn no_parking_blocks_ending_turn_on_larger_boards() {
        let mut g = game(7, &["a", "b", "c"]);
        let neutral = g.board().geometry().no_parking_cells(PlayDirection::BottomToTop);
        let spot = *neutral.first().unwrap();
        // Reaching a neutral arm takes many moves; set the turn record directly.
        g.current_move.last_moved = Some(spot);
        assert!(!g.can_end_turn());
        let center = at(&g, 0, 0);
        g.current_move.last_moved = Some(center);
        assert!(g.can_end_turn());
    }

    #[test]
    fn small_board_waives_no_parking() {
        let mut g = game(5, &["a", "b", "c"]);
        let neutral = g.board().geometry().no_parking_cells(PlayDirection::BottomToTop);
        g.current_move.last_moved = neutral.first().copied();
        assert!(g.can_end_turn());
    }

    #[test]
    fn win_is_terminal() {
        let mut g = game(5, &["ann", "bob"]);
        let geometry: Geometry = *g.board().geometry();
        let goal = geometry.arm_cells(PlayDirection::BottomToTop.goal_arm());
        let ann = PlayerId::from("ann");
        // Leave one goal cell open with one of ann's pieces beside it.
        let (last, runner) = goal
            .iter()
            .find_map(|&c| {
                geometry
                    .neighbors(c)
                    .unwrap()
                    .into_iter()
                    .find(|n| !goal.contains(n))
                    .map(|n| (c, n))
            })
            .unwrap();
        for &id in &goal {
            let occupancy = if id == last {
                Occupancy::Empty
            } else {
                Occupancy::Piece(ann.clone())
            };
            g.board.set_occupancy(id, occupancy).unwrap();
        }
        g.board.set_occupancy(runner, Occupancy::Piece(ann.clone())).unwrap();

        g.select_cell(runner).unwrap();
        assert!(g.possible_moves().contains(&last));
        assert_eq!(g.select_destination(last).unwrap(), Transition::Won { player: ann.clone() });
        assert!(g.is_won());
        assert_eq!(g.phase(), TurnPhase::Won);
        assert_eq!(g.selected_cell(), None);
        assert!(marked(&g).is_empty());
        assert_eq!(g.step_counter(), 1);
        assert!(g.player(&ann).unwrap().has_won);

        let frozen = g.clone();
        assert_eq!(g.select_cell(last).unwrap(), Transition::Unchanged);
        assert_eq!(g.advance_turn(), Transition::Unchanged);
        assert_eq!(g.select_destination(runner), Err(GameError::NoSelection));
        assert_eq!(g, frozen);
    }
}
