//! Game State Machine
//!
//! The closed set of screens the game can be on and the pure transition
//! function between them. Nothing here touches the player, camera or level;
//! side effects of a transition (resets) are applied by the orchestrator.
//!
//! ```text
//!            Confirm              Pause
//!   Menu ───────────▶ Playing ◀──────────▶ Paused
//!    ▲                   │
//!    │ Confirm           │ Defeat (hook only)
//!    │                   ▼
//!    └─────────────── GameOver
//! ```

use std::fmt;
use serde::{Serialize, Deserialize};

/// Which update/draw routine runs this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum GameState {
    /// Title screen
    #[default]
    Menu = 0,
    /// Simulation running
    Playing = 1,
    /// Simulation frozen, scene still drawn
    Paused = 2,
    /// Run over; confirm returns to the menu
    GameOver = 3,
}

/// Something that may move the state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trigger {
    /// Confirm key went down
    Confirm,
    /// Pause key went down
    Pause,
    /// A loss condition fired (no gameplay rule raises this yet)
    Defeat,
}

impl GameState {
    /// Pure transition function. Unlisted pairs leave the state unchanged.
    pub const fn on(self, trigger: Trigger) -> GameState {
        match (self, trigger) {
            (GameState::Menu, Trigger::Confirm) => GameState::Playing,
            (GameState::Playing, Trigger::Pause) => GameState::Paused,
            (GameState::Paused, Trigger::Pause) => GameState::Playing,
            (GameState::Playing, Trigger::Defeat) => GameState::GameOver,
            (GameState::GameOver, Trigger::Confirm) => GameState::Menu,
            (state, _) => state,
        }
    }

    /// Does the simulation advance in this state?
    #[inline]
    pub fn is_simulating(self) -> bool {
        matches!(self, GameState::Playing)
    }

    /// Is the level scene drawn in this state?
    #[inline]
    pub fn shows_world(self) -> bool {
        matches!(self, GameState::Playing | GameState::Paused)
    }

    /// Short name for logs and events.
    pub fn name(self) -> &'static str {
        match self {
            GameState::Menu => "menu",
            GameState::Playing => "playing",
            GameState::Paused => "paused",
            GameState::GameOver => "game_over",
        }
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
