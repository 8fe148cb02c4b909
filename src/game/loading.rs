//! Game loading.
//!
//! Building a game is modeled as a request with three outcomes: in flight,
//! fulfilled with a ready game, or failed with a configuration error. The
//! slot holds a game only while its status is `Loaded`.

use tracing::warn;

use super::state::GameInstance;
use crate::board::{ConfigError, GameConfig};

/// Status of the most recent load request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadStatus {
    #[default]
    NotLoaded,
    Loading,
    Loaded,
    Failed(String),
}

/// Holder for the current game and the status of loading it.
#[derive(Debug, Default)]
pub struct GameSlot {
    status: LoadStatus,
    game: Option<GameInstance>,
}

impl GameSlot {
    pub fn new() -> Self {
        GameSlot::default()
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    /// Marks a request as in flight and drops any previous game.
    pub fn begin(&mut self) {
        self.status = LoadStatus::Loading;
        self.game = None;
    }

    /// Completes the request with a ready-made game.
    pub fn fulfil(&mut self, game: GameInstance) -> &mut GameInstance {
        self.status = LoadStatus::Loaded;
        self.game.insert(game)
    }

    /// Completes the request with an error.
    pub fn fail(&mut self, err: &ConfigError) {
        warn!(error = %err, "game failed to load");
        self.status = LoadStatus::Failed(err.to_string());
        self.game = None;
    }

    /// Runs a full request for `config`.
    pub fn load(&mut self, config: GameConfig) -> Result<&mut GameInstance, ConfigError> {
        self.begin();
        match GameInstance::new(config) {
            Ok(game) => Ok(self.fulfil(game)),
            Err(e) => {
                self.fail(&e);
                Err(e)
            }
        }
    }

    pub fn game(&self) -> Option<&GameInstance> {
        self.game.as_ref()
    }

    pub fn game_mut(&mut self) -> Option<&mut GameInstance> {
        self.game.as_mut()
    }
}
