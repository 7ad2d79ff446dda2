//! Game Configuration
//!
//! Every tunable of the simulation lives here. Defaults are the
//! compile-time constants below; a JSON file can override any subset.

use std::path::Path;
use serde::{Serialize, Deserialize};

use crate::error::ConfigError;
use crate::game::player::PhysicsMode;

// =============================================================================
// GAME CONSTANTS
// =============================================================================

/// Viewport width in pixels
pub const VIEWPORT_WIDTH: f32 = 1280.0;

/// Viewport height in pixels
pub const VIEWPORT_HEIGHT: f32 = 720.0;

/// Horizontal run speed (px/s)
pub const MOVE_SPEED: f32 = 200.0;

/// Vertical walk speed on the brawler playfield (px/s)
pub const WALK_SPEED: f32 = 150.0;

/// Initial jump velocity (px/s, negative = up)
pub const JUMP_VELOCITY: f32 = -500.0;

/// Gravity (px/s²)
pub const GRAVITY: f32 = 1500.0;

/// Terminal fall speed (px/s)
pub const MAX_FALL_SPEED: f32 = 800.0;

/// Floor Y for the platformer model
pub const GROUND_LEVEL: f32 = 500.0;

/// Top of the brawler walk band
pub const WALK_BAND_TOP: f32 = 350.0;

/// Bottom of the brawler walk band
pub const WALK_BAND_BOTTOM: f32 = 650.0;

/// Player bounding box width
pub const PLAYER_WIDTH: f32 = 32.0;

/// Player bounding box height
pub const PLAYER_HEIGHT: f32 = 64.0;

/// Camera lerp coefficient per frame
pub const CAMERA_FOLLOW_SPEED: f32 = 0.1;

/// Default level start
pub const LEVEL_START_X: f32 = 0.0;

/// Default level end
pub const LEVEL_END_X: f32 = 3000.0;

/// Distance before `end_x` at which the level counts as complete
pub const COMPLETION_MARGIN: f32 = 50.0;

/// Spawn offset from `start_x`
pub const SPAWN_OFFSET_X: f32 = 100.0;

/// Spawn Y
pub const SPAWN_Y: f32 = 400.0;

/// Where the sky ends and the street begins
pub const HORIZON_Y: f32 = 300.0;

// =============================================================================
// CONFIG TYPES
// =============================================================================

/// Window/viewport size.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Width in pixels
    pub width: f32,
    /// Height in pixels
    pub height: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: VIEWPORT_WIDTH,
            height: VIEWPORT_HEIGHT,
        }
    }
}

/// Player physics tunables.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Which movement model drives the player
    pub mode: PhysicsMode,
    /// Horizontal speed (px/s)
    pub move_speed: f32,
    /// Vertical walk speed, brawler only (px/s)
    pub walk_speed: f32,
    /// Initial jump velocity (negative = up)
    pub jump_velocity: f32,
    /// Gravity (px/s²)
    pub gravity: f32,
    /// Terminal fall speed
    pub max_fall_speed: f32,
    /// Floor Y, platformer only
    pub ground_level: f32,
    /// Walk band top, brawler only
    pub walk_band_top: f32,
    /// Walk band bottom, brawler only
    pub walk_band_bottom: f32,
    /// Bounding box width
    pub width: f32,
    /// Bounding box height
    pub height: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            mode: PhysicsMode::default(),
            move_speed: MOVE_SPEED,
            walk_speed: WALK_SPEED,
            jump_velocity: JUMP_VELOCITY,
            gravity: GRAVITY,
            max_fall_speed: MAX_FALL_SPEED,
            ground_level: GROUND_LEVEL,
            walk_band_top: WALK_BAND_TOP,
            walk_band_bottom: WALK_BAND_BOTTOM,
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
        }
    }
}

/// Camera tunables.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Lerp coefficient applied once per frame
    pub follow_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            follow_speed: CAMERA_FOLLOW_SPEED,
        }
    }
}

/// Level layout.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// Left boundary
    pub start_x: f32,
    /// Right boundary
    pub end_x: f32,
    /// Completion threshold distance before `end_x`
    pub completion_margin: f32,
    /// Spawn offset from `start_x`
    pub spawn_offset_x: f32,
    /// Spawn Y
    pub spawn_y: f32,
    /// Sky/street split
    pub horizon_y: f32,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            start_x: LEVEL_START_X,
            end_x: LEVEL_END_X,
            completion_margin: COMPLETION_MARGIN,
            spawn_offset_x: SPAWN_OFFSET_X,
            spawn_y: SPAWN_Y,
            horizon_y: HORIZON_Y,
        }
    }
}

/// Complete game configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Viewport size
    pub viewport: ViewportConfig,
    /// Player physics
    pub player: PlayerConfig,
    /// Camera smoothing
    pub camera: CameraConfig,
    /// Level layout
    pub level: LevelConfig,
}

impl GameConfig {
    /// Parse and validate a JSON config. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Serialise to pretty JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every value is in range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let v = &self.viewport;
        if !(v.width > 0.0 && v.width.is_finite()) {
            return Err(ConfigError::invalid("viewport.width", format!("must be positive, got {}", v.width)));
        }
        if !(v.height > 0.0 && v.height.is_finite()) {
            return Err(ConfigError::invalid("viewport.height", format!("must be positive, got {}", v.height)));
        }

        let p = &self.player;
        for (field, value) in [
            ("player.move_speed", p.move_speed),
            ("player.walk_speed", p.walk_speed),
            ("player.gravity", p.gravity),
            ("player.max_fall_speed", p.max_fall_speed),
        ] {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(ConfigError::invalid(field, format!("must be non-negative, got {}", value)));
            }
        }
        if !(p.jump_velocity < 0.0 && p.jump_velocity.is_finite()) {
            return Err(ConfigError::invalid(
                "player.jump_velocity",
                format!("must be negative (upward), got {}", p.jump_velocity),
            ));
        }
        if p.walk_band_top > p.walk_band_bottom {
            return Err(ConfigError::invalid(
                "player.walk_band_top",
                format!("{} is below walk_band_bottom {}", p.walk_band_top, p.walk_band_bottom),
            ));
        }
        if !(p.width > 0.0 && p.height > 0.0) {
            return Err(ConfigError::invalid("player.width", "bounding box must have positive size"));
        }

        let c = &self.camera;
        if !(c.follow_speed > 0.0 && c.follow_speed <= 1.0) {
            return Err(ConfigError::invalid(
                "camera.follow_speed",
                format!("must be in (0, 1], got {}", c.follow_speed),
            ));
        }

        let l = &self.level;
        if !(l.start_x.is_finite() && l.end_x.is_finite()) {
            return Err(ConfigError::invalid("level.end_x", "boundaries must be finite"));
        }
        if l.end_x <= l.start_x {
            return Err(ConfigError::invalid(
                "level.end_x",
                format!("must be greater than start_x ({} <= {})", l.end_x, l.start_x),
            ));
        }
        // The player's left edge stops at `end_x - width`; completion must lie at or before it.
        let max_player_x = l.end_x - p.width;
        if max_player_x < l.start_x {
            return Err(ConfigError::invalid(
                "level.end_x",
                format!("level is narrower than the player ({} < {})", l.end_x - l.start_x, p.width),
            ));
        }
        if !(l.completion_margin >= p.width && l.completion_margin <= l.end_x - l.start_x) {
            return Err(ConfigError::invalid(
                "level.completion_margin",
                format!(
                    "must be between player.width ({}) and the level width, got {}",
                    p.width, l.completion_margin
                ),
            ));
        }
        let spawn_x = l.start_x + l.spawn_offset_x;
        if !(spawn_x >= l.start_x && spawn_x <= max_player_x) {
            return Err(ConfigError::invalid(
                "level.spawn_offset_x",
                format!("spawn x {} is outside [{}, {}]", spawn_x, l.start_x, max_player_x),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.player.mode, PhysicsMode::Brawler);
        assert_eq!(config.camera.follow_speed, 0.1);
        assert_eq!(config.level.end_x, 3000.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = GameConfig::from_json(r#"{ "level": { "end_x": 5000.0 } }"#).unwrap();
        assert_eq!(config.level.end_x, 5000.0);
        assert_eq!(config.level.start_x, 0.0);
        assert_eq!(config.player, PlayerConfig::default());
    }

    #[test]
    fn test_physics_mode_from_json() {
        let config = GameConfig::from_json(r#"{ "player": { "mode": "platformer" } }"#).unwrap();
        assert_eq!(config.player.mode, PhysicsMode::Platformer);
    }

    #[test]
    fn test_json_roundtrip_preserves_config() {
        let mut config = GameConfig::default();
        config.viewport.width = 800.0;
        let json = config.to_json().unwrap();
        assert_eq!(GameConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_rejects_inverted_level() {
        let err = GameConfig::from_json(r#"{ "level": { "start_x": 100.0, "end_x": 50.0 } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "level.end_x", .. }));
    }

    #[test]
    fn test_rejects_bad_follow_speed() {
        let err = GameConfig::from_json(r#"{ "camera": { "follow_speed": 1.5 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "camera.follow_speed", .. }));
    }

    #[test]
    fn test_rejects_inverted_walk_band() {
        let mut config = GameConfig::default();
        config.player.walk_band_top = 700.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_margin_narrower_than_player() {
        let err = GameConfig::from_json(r#"{ "level": { "completion_margin": 10.0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "level.completion_margin", .. }));

        let ok = GameConfig::from_json(r#"{ "level": { "completion_margin": 32.0 } }"#);
        assert!(ok.is_ok(), "Margin equal to the player width is reachable");
    }

    #[test]
    fn test_rejects_spawn_outside_level() {
        let err = GameConfig::from_json(r#"{ "level": { "spawn_offset_x": 2990.0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "level.spawn_offset_x", .. }));

        let err = GameConfig::from_json(r#"{ "level": { "spawn_offset_x": -5.0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "level.spawn_offset_x", .. }));
    }

    #[test]
    fn test_rejects_level_narrower_than_player() {
        let err = GameConfig::from_json(r#"{ "level": { "start_x": 0.0, "end_x": 20.0 } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "level.end_x", .. }));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = GameConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = GameConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
