//! Game Events
//!
//! Events generated during a frame, for logging, front-end cues and
//! replay comparison.

use serde::{Serialize, Deserialize};

use crate::core::vec2::Vec2;
use crate::game::state::GameState;

/// Game event data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameEventData {
    /// State machine moved
    StateChanged {
        /// State before the trigger
        from: GameState,
        /// State after the trigger
        to: GameState,
    },

    /// Player left the ground
    PlayerJumped {
        /// Take-off point
        position: Vec2,
    },

    /// Player touched down
    PlayerLanded {
        /// Landing point
        position: Vec2,
    },

    /// Mission-complete latch went from false to true
    LevelCompleted {
        /// Player position on the completing frame
        position: Vec2,
    },

    /// Player, camera and level were put back to their start
    GameReset,

    /// Exit key is held
    ExitRequested,
}

/// A game event stamped with the frame it happened on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Frame counter when event occurred
    pub frame: u64,

    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(frame: u64, data: GameEventData) -> Self {
        Self { frame, data }
    }

    /// Create state changed event.
    pub fn state_changed(frame: u64, from: GameState, to: GameState) -> Self {
        Self::new(frame, GameEventData::StateChanged { from, to })
    }

    /// Create jump event.
    pub fn player_jumped(frame: u64, position: Vec2) -> Self {
        Self::new(frame, GameEventData::PlayerJumped { position })
    }

    /// Create landing event.
    pub fn player_landed(frame: u64, position: Vec2) -> Self {
        Self::new(frame, GameEventData::PlayerLanded { position })
    }

    /// Create level completed event.
    pub fn level_completed(frame: u64, position: Vec2) -> Self {
        Self::new(frame, GameEventData::LevelCompleted { position })
    }

    /// Create reset event.
    pub fn game_reset(frame: u64) -> Self {
        Self::new(frame, GameEventData::GameReset)
    }

    /// Create exit event.
    pub fn exit_requested(frame: u64) -> Self {
        Self::new(frame, GameEventData::ExitRequested)
    }

    /// The state transition carried by this event, if any.
    pub fn transition(&self) -> Option<(GameState, GameState)> {
        match self.data {
            GameEventData::StateChanged { from, to } => Some((from, to)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_accessor() {
        let e = GameEvent::state_changed(3, GameState::Menu, GameState::Playing);
        assert_eq!(e.frame, 3);
        assert_eq!(e.transition(), Some((GameState::Menu, GameState::Playing)));

        assert_eq!(GameEvent::game_reset(4).transition(), None);
    }

    #[test]
    fn test_event_json_shape() {
        let e = GameEvent::level_completed(10, Vec2::new(2960.0, 400.0));
        let json = serde_json::to_string(&e).unwrap();
        assert!(json.contains("LevelCompleted"));
        let back: GameEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, e);
    }
}
