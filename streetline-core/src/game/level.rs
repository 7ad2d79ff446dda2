//! Level bounds and completion.

use serde::{Serialize, Deserialize};
use tracing::info;

use crate::config::{LevelConfig, COMPLETION_MARGIN, HORIZON_Y, SPAWN_OFFSET_X, SPAWN_Y};
use crate::core::rect::Rect;
use crate::core::vec2::Vec2;

/// Rectangles the renderer fills to draw the level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LevelGeometry {
    /// Sky band above the horizon
    pub sky: Rect,
    /// Street from the horizon to the bottom of the viewport
    pub ground: Rect,
    /// Marker over the completion zone
    pub end_zone: Rect,
}

/// A single horizontal stretch of street.
///
/// `is_complete` is a one-way latch: once set it stays set until `reset`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Level {
    start_x: f32,
    end_x: f32,
    completion_margin: f32,
    spawn_offset_x: f32,
    spawn_y: f32,
    horizon_y: f32,
    is_complete: bool,
}

impl Level {
    /// Level spanning `[start_x, end_x]` with default layout values.
    pub fn new(start_x: f32, end_x: f32) -> Self {
        Self {
            start_x,
            end_x,
            completion_margin: COMPLETION_MARGIN,
            spawn_offset_x: SPAWN_OFFSET_X,
            spawn_y: SPAWN_Y,
            horizon_y: HORIZON_Y,
            is_complete: false,
        }
    }

    /// Level from config.
    pub fn from_config(config: &LevelConfig) -> Self {
        Self {
            start_x: config.start_x,
            end_x: config.end_x,
            completion_margin: config.completion_margin,
            spawn_offset_x: config.spawn_offset_x,
            spawn_y: config.spawn_y,
            horizon_y: config.horizon_y,
            is_complete: false,
        }
    }

    /// Latch completion once the player reaches `end_x - margin`.
    pub fn check_completion(&mut self, player_position: Vec2) {
        if !self.is_complete && player_position.x >= self.completion_x() {
            self.is_complete = true;
            info!(x = player_position.x, end_x = self.end_x, "level complete");
        }
    }

    /// Clear the completion latch.
    pub fn reset(&mut self) {
        self.is_complete = false;
    }

    /// Where a new run starts.
    pub fn player_start_position(&self) -> Vec2 {
        Vec2::new(self.start_x + self.spawn_offset_x, self.spawn_y)
    }

    /// X at which the level counts as complete.
    #[inline]
    pub fn completion_x(&self) -> f32 {
        self.end_x - self.completion_margin
    }

    /// Has the player reached the end?
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.is_complete
    }

    /// Left boundary.
    #[inline]
    pub fn start_x(&self) -> f32 {
        self.start_x
    }

    /// Right boundary.
    #[inline]
    pub fn end_x(&self) -> f32 {
        self.end_x
    }

    /// Level width.
    #[inline]
    pub fn width(&self) -> f32 {
        self.end_x - self.start_x
    }

    /// World-space rectangles for a viewport `viewport_height` pixels tall.
    pub fn geometry(&self, viewport_height: f32) -> LevelGeometry {
        let horizon = self.horizon_y.clamp(0.0, viewport_height);
        LevelGeometry {
            sky: Rect::new(self.start_x, 0.0, self.width(), horizon),
            ground: Rect::new(self.start_x, horizon, self.width(), viewport_height - horizon),
            end_zone: Rect::new(self.completion_x(), 0.0, self.completion_margin, viewport_height),
        }
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::from_config(&LevelConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_position() {
        let level = Level::new(0.0, 3000.0);
        assert_eq!(level.player_start_position(), Vec2::new(100.0, 400.0));

        let shifted = Level::new(500.0, 3000.0);
        assert_eq!(shifted.player_start_position(), Vec2::new(600.0, 400.0));
    }

    #[test]
    fn test_completion_threshold() {
        let mut level = Level::new(0.0, 3000.0);

        level.check_completion(Vec2::new(2949.9, 400.0));
        assert!(!level.is_complete());

        level.check_completion(Vec2::new(2950.0, 400.0));
        assert!(level.is_complete());
    }

    #[test]
    fn test_completion_latches() {
        let mut level = Level::new(0.0, 3000.0);
        level.check_completion(Vec2::new(2960.0, 400.0));
        assert!(level.is_complete());

        level.check_completion(Vec2::new(100.0, 400.0));
        assert!(level.is_complete(), "Latch never clears itself");

        level.reset();
        assert!(!level.is_complete());
    }

    #[test]
    fn test_geometry() {
        let level = Level::new(0.0, 3000.0);
        let g = level.geometry(720.0);

        assert_eq!(g.sky, Rect::new(0.0, 0.0, 3000.0, 300.0));
        assert_eq!(g.ground, Rect::new(0.0, 300.0, 3000.0, 420.0));
        assert_eq!(g.end_zone, Rect::new(2950.0, 0.0, 50.0, 720.0));
    }

    #[test]
    fn test_geometry_short_viewport() {
        let level = Level::new(0.0, 3000.0);
        let g = level.geometry(200.0);
        assert_eq!(g.sky.h, 200.0);
        assert_eq!(g.ground.h, 0.0);
    }

    #[test]
    fn test_from_config() {
        let config = LevelConfig {
            end_x: 5000.0,
            completion_margin: 10.0,
            ..LevelConfig::default()
        };
        let level = Level::from_config(&config);
        assert_eq!(level.completion_x(), 4990.0);
        assert_eq!(level.end_x(), 5000.0);
        assert_eq!(level.width(), 5000.0);
    }
}
