//! Game instance state and queries.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::board::{
    create_players, init_blocked_positions, init_board, init_pieces, Board, BoardError, Cell,
    CellId, ConfigError, GameConfig, Geometry, Occupancy, PlayDirection, Player, PlayerId,
    Position, DIRECTIONS_OF_PLAY, SMALL_BOARD_WIDTH,
};

/// How the piece reached its last cell this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveType {
    Shift,
    Jump,
}

impl MoveType {
    /// Anything farther than one step is a jump.
    pub fn classify(from: Position, to: Position) -> MoveType {
        if Geometry::manhattan_distance(from, to) > 1 {
            MoveType::Jump
        } else {
            MoveType::Shift
        }
    }
}

/// Who is moving and what they have done so far this turn.
///
/// The mover's play direction is not copied here; look it up on the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentMove {
    pub player_id_to_move: PlayerId,
    /// Cell the moving piece stood on before its first move this turn.
    pub initially_selected: Option<CellId>,
    pub last_moved: Option<CellId>,
    pub move_type: Option<MoveType>,
}

impl CurrentMove {
    pub fn new(player_id_to_move: PlayerId) -> Self {
        CurrentMove {
            player_id_to_move,
            initially_selected: None,
            last_moved: None,
            move_type: None,
        }
    }

    /// Returns true once a piece has moved this turn.
    pub fn has_moved(&self) -> bool {
        self.last_moved.is_some()
    }
}

/// Coarse phase of the turn state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TurnPhase {
    NoSelection,
    PieceSelected,
    Won,
}

/// The seated directions in fixed clockwise order, fixed at game creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seating {
    seats: Vec<(PlayDirection, PlayerId)>,
}

impl Seating {
    pub fn new(players: &[Player]) -> Self {
        let seats = DIRECTIONS_OF_PLAY
            .iter()
            .filter_map(|&d| {
                players
                    .iter()
                    .find(|p| p.play_direction == d)
                    .map(|p| (d, p.id.clone()))
            })
            .collect();
        Seating { seats }
    }

    /// The player seated in `direction`, if any.
    pub fn player_at(&self, direction: PlayDirection) -> Option<&PlayerId> {
        self.seats
            .iter()
            .find(|(d, _)| *d == direction)
            .map(|(_, id)| id)
    }

    /// Next seated player scanning forward from `direction`, wrapping around.
    pub fn next_after(&self, direction: PlayDirection) -> Option<&PlayerId> {
        let start = direction.seat_index();
        let len = DIRECTIONS_OF_PLAY.len();
        (1..=len)
            .map(|i| DIRECTIONS_OF_PLAY[(start + i) % len])
            .find_map(|d| self.player_at(d))
    }

    /// Number of occupied seats.
    pub fn seat_count(&self) -> usize {
        self.seats.len()
    }
}

/// Everything a fresh game starts from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitialGame {
    pub players: Vec<Player>,
    pub board: Board,
    pub current_move: CurrentMove,
}

/// Builds players, the board with pieces, and the opening current move.
/// The first configured player moves first.
pub fn initialize_game(config: &GameConfig) -> Result<InitialGame, ConfigError> {
    let players = create_players(config)?;
    let mut board = init_board(config)?;
    init_blocked_positions(&mut board, config)?;
    init_pieces(&mut board, &players, config)?;

    let first = players
        .first()
        .ok_or(ConfigError::UnsupportedPlayerCount(0))?
        .id
        .clone();

    Ok(InitialGame {
        players,
        board,
        current_move: CurrentMove::new(first),
    })
}

/// A running game: board, players, and turn state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameInstance {
    pub(super) config: GameConfig,
    pub(super) board: Board,
    pub(super) players: Vec<Player>,
    pub(super) seating: Seating,
    pub(super) current_move: CurrentMove,
    pub(super) possible_moves: Vec<CellId>,
    pub(super) step_counter: u32,
    pub(super) won: bool,
}

impl GameInstance {
    /// Validates `config` and sets up a new game.
    pub fn new(config: GameConfig) -> Result<GameInstance, ConfigError> {
        let initial = initialize_game(&config)?;
        let game = GameInstance::from_initial(config, initial)?;
        info!(
            width = game.config.width,
            seats = game.seating.seat_count(),
            "game initialized"
        );
        Ok(game)
    }

    /// Wraps an already built starting position, which may have been edited
    /// after `initialize_game`.
    ///
    /// The board must have the configured width and the players must be
    /// exactly the configured ones, in order.
    pub fn from_initial(config: GameConfig, initial: InitialGame) -> Result<GameInstance, ConfigError> {
        config.validate()?;
        let width = initial.board.geometry().width();
        if width != config.width {
            return Err(ConfigError::WidthMismatch {
                board: width,
                config: config.width,
            });
        }
        if let Some(stray) = initial
            .players
            .iter()
            .zip(&config.player_ids)
            .find(|(p, id)| &p.id != *id)
            .map(|(p, _)| p.id.clone())
        {
            return Err(ConfigError::UnknownPlayer(stray));
        }
        if initial.players.len() != config.player_count() {
            return Err(ConfigError::UnsupportedPlayerCount(initial.players.len()));
        }

        let seating = Seating::new(&initial.players);
        Ok(GameInstance {
            config,
            board: initial.board,
            players: initial.players,
            seating,
            current_move: initial.current_move,
            possible_moves: Vec::new(),
            step_counter: 0,
            won: false,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn cell_ids(&self) -> impl Iterator<Item = CellId> + '_ {
        self.board.cell_ids()
    }

    pub fn cell(&self, id: CellId) -> Result<&Cell, BoardError> {
        self.board.cell(id)
    }

    pub fn player_ids(&self) -> impl Iterator<Item = &PlayerId> + '_ {
        self.players.iter().map(|p| &p.id)
    }

    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn seating(&self) -> &Seating {
        &self.seating
    }

    pub fn current_move(&self) -> &CurrentMove {
        &self.current_move
    }

    /// Play direction of the player to move, looked up on the player entity.
    pub fn play_direction(&self) -> Option<PlayDirection> {
        self.player(&self.current_move.player_id_to_move)
            .map(|p| p.play_direction)
    }

    pub fn possible_moves(&self) -> &[CellId] {
        &self.possible_moves
    }

    pub fn step_counter(&self) -> u32 {
        self.step_counter
    }

    pub fn is_won(&self) -> bool {
        self.won
    }

    /// The selected cell and its owner.
    pub fn selection(&self) -> Option<(CellId, PlayerId)> {
        self.board.selected().and_then(|cell| match &cell.occupancy {
            Occupancy::Selected(owner) => Some((cell.id, owner.clone())),
            _ => None,
        })
    }

    pub fn selected_cell(&self) -> Option<CellId> {
        self.board.selected().map(|c| c.id)
    }

    pub fn phase(&self) -> TurnPhase {
        if self.won {
            TurnPhase::Won
        } else if self.selected_cell().is_some() {
            TurnPhase::PieceSelected
        } else {
            TurnPhase::NoSelection
        }
    }

    /// Whether the player to move may end their turn now.
    ///
    /// Requires a move this turn that did not end on the cell the piece
    /// started from, and, except on the small board, a final cell outside
    /// the mover's no-parking arms.
    pub fn can_end_turn(&self) -> bool {
        let Some(last) = self.current_move.last_moved else {
            return false;
        };
        let Some(direction) = self.play_direction() else {
            return false;
        };

        let may_park = self.config.width == SMALL_BOARD_WIDTH
            || !self
                .board
                .geometry()
                .no_parking_cells(direction)
                .contains(&last);

        may_park && self.current_move.initially_selected != Some(last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(width: u8, names: &[&str]) -> GameConfig {
        GameConfig::new(width, names.iter().map(|n| PlayerId::from(*n)).collect())
    }

    #[test]
    fn move_type_by_distance() {
        let o = Position::new(0, 0);
        assert_eq!(MoveType::classify(o, Position::new(0, 1)), MoveType::Shift);
        assert_eq!(MoveType::classify(o, Position::new(0, 2)), MoveType::Jump);
        assert_eq!(MoveType::classify(o, Position::new(4, -2)), MoveType::Jump);
    }

    #[test]
    fn new_game_starts_with_first_player() {
        let game = GameInstance::new(config(9, &["ann", "bob", "cid"])).unwrap();
        assert_eq!(game.current_move().player_id_to_move, PlayerId::from("ann"));
        assert_eq!(game.play_direction(), Some(PlayDirection::BottomToTop));
        assert_eq!(game.phase(), TurnPhase::NoSelection);
        assert_eq!(game.step_counter(), 0);
        assert!(game.possible_moves().is_empty());
        assert!(!game.can_end_turn());
        assert_eq!(game.cell_ids().count(), 121);
        assert_eq!(game.player_ids().count(), 3);
    }

    #[test]
    fn bad_config_creates_no_game() {
        assert!(matches!(
            GameInstance::new(config(9, &["ann"])),
            Err(ConfigError::UnsupportedPlayerCount(1))
        ));
        assert!(matches!(
            GameInstance::new(config(10, &["ann", "bob"])),
            Err(ConfigError::UnsupportedWidth(10))
        ));
    }

    #[test]
    fn seating_wraps_forward() {
        let game = GameInstance::new(config(9, &["a", "b", "c", "d"])).unwrap();
        let seating = game.seating();
        assert_eq!(seating.seat_count(), 4);
        assert_eq!(seating.next_after(PlayDirection::BottomToTop), Some(&PlayerId::from("b")));
        assert_eq!(seating.next_after(PlayDirection::BottomLeftToTopRight), Some(&PlayerId::from("c")));
        assert_eq!(seating.next_after(PlayDirection::TopToBottom), Some(&PlayerId::from("d")));
        assert_eq!(seating.next_after(PlayDirection::TopRightToBottomLeft), Some(&PlayerId::from("a")));
    }

    #[test]
    fn seating_skips_empty_seats() {
        let game = GameInstance::new(config(9, &["a", "b"])).unwrap();
        let seating = game.seating();
        assert_eq!(seating.next_after(PlayDirection::BottomToTop), Some(&PlayerId::from("b")));
        assert_eq!(seating.next_after(PlayDirection::TopToBottom), Some(&PlayerId::from("a")));
        // An unseated direction still resolves to the next seated player.
        assert_eq!(seating.next_after(PlayDirection::TopLeftToBottomRight), Some(&PlayerId::from("b")));
    }

    #[test]
    fn from_initial_rejects_a_mismatched_start() {
        let small = initialize_game(&config(5, &["ann", "bob"])).unwrap();
        assert!(matches!(
            GameInstance::from_initial(config(7, &["ann", "bob"]), small.clone()),
            Err(ConfigError::WidthMismatch { board: 5, config: 7 })
        ));
        assert!(matches!(
            GameInstance::from_initial(config(5, &["ann", "cid"]), small.clone()),
            Err(ConfigError::UnknownPlayer(id)) if id.as_str() == "bob"
        ));
        assert!(GameInstance::from_initial(config(5, &["ann", "bob"]), small).is_ok());
    }

    #[test]
    fn initialize_game_is_deterministic() {
        let cfg = config(7, &["a", "b", "c"]);
        assert_eq!(initialize_game(&cfg).unwrap(), initialize_game(&cfg).unwrap());
    }
}
