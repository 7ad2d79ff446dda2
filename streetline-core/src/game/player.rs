//! Player Physics
//!
//! A single controllable character with two alternative movement models:
//!
//! - [`PhysicsMode::Brawler`] (default): free walking on a vertical band of
//!   the street; jumping is a separate visual elevation (`jump_height`) that
//!   never changes world Y.
//! - [`PhysicsMode::Platformer`]: gravity acts on world Y and a fixed floor
//!   stops the fall.
//!
//! The two models are never combined. Only `update` and `reset` write the
//! player's position.

use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::config::PlayerConfig;
use crate::core::rect::Rect;
use crate::core::vec2::Vec2;
use crate::game::input::InputFrame;

/// Movement model.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhysicsMode {
    /// Beat-em-up: walk band + jump height
    #[default]
    Brawler,
    /// Side-view platformer: gravity + floor
    Platformer,
}

/// What happened during one `update`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MotionEvents {
    /// A jump started this frame
    pub jumped: bool,
    /// The player touched down this frame after being airborne
    pub landed: bool,
}

/// The player character.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Player {
    position: Vec2,
    velocity: Vec2,
    is_on_ground: bool,
    is_facing_right: bool,
    /// Visual elevation above `position.y` (brawler only)
    jump_height: f32,
    /// Rate of change of the elevation, negative while rising (brawler only)
    jump_velocity: f32,
    /// Leftmost allowed `position.x`
    min_x: f32,
    /// Rightmost allowed `position.x`
    max_x: f32,
    config: PlayerConfig,
}

impl Player {
    /// Create a player at `start` with no horizontal limits.
    pub fn new(config: PlayerConfig, start: Vec2) -> Self {
        let mut player = Self {
            position: start,
            velocity: Vec2::ZERO,
            is_on_ground: false,
            is_facing_right: true,
            jump_height: 0.0,
            jump_velocity: 0.0,
            min_x: f32::NEG_INFINITY,
            max_x: f32::INFINITY,
            config,
        };
        player.reset(start);
        player
    }

    /// Limit `position.x` to `[min_x, max_x]`.
    pub fn set_horizontal_bounds(&mut self, min_x: f32, max_x: f32) {
        self.min_x = min_x;
        self.max_x = max_x.max(min_x);
        self.position.x = self.position.x.clamp(self.min_x, self.max_x);
    }

    /// Put the player back at `start` (x kept inside the bounds) with all motion cleared.
    pub fn reset(&mut self, start: Vec2) {
        self.position = Vec2::new(start.x.clamp(self.min_x, self.max_x), start.y);
        self.velocity = Vec2::ZERO;
        self.is_on_ground = false;
        self.is_facing_right = true;
        self.jump_height = 0.0;
        self.jump_velocity = 0.0;
    }

    /// Advance one frame.
    ///
    /// `dt` is the frame's elapsed time in seconds; negative or non-finite
    /// values are treated as zero. Input bits that are not movement keys are
    /// ignored.
    pub fn update(&mut self, dt: f32, input: &InputFrame) -> MotionEvents {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        let horizontal = input.horizontal();
        self.velocity.x = horizontal * self.config.move_speed;
        if horizontal > 0.0 {
            self.is_facing_right = true;
        } else if horizontal < 0.0 {
            self.is_facing_right = false;
        }

        let events = match self.config.mode {
            PhysicsMode::Brawler => self.step_brawler(dt, input),
            PhysicsMode::Platformer => self.step_platformer(dt, input),
        };

        self.position.x = self.position.x.clamp(self.min_x, self.max_x);

        #[cfg(feature = "debug-tracing")]
        tracing::trace!(
            position = %self.position,
            velocity = %self.velocity,
            jump_height = self.jump_height,
            on_ground = self.is_on_ground,
            "player step"
        );

        events
    }

    /// Beat-em-up step: walk band on Y, separate jump elevation.
    fn step_brawler(&mut self, dt: f32, input: &InputFrame) -> MotionEvents {
        let cfg = &self.config;
        let mut events = MotionEvents::default();

        self.velocity.y = input.vertical() * cfg.walk_speed;
        self.position += self.velocity * dt;

        if self.position.y < cfg.walk_band_top {
            self.position.y = cfg.walk_band_top;
            self.velocity.y = 0.0;
        } else if self.position.y > cfg.walk_band_bottom {
            self.position.y = cfg.walk_band_bottom;
            self.velocity.y = 0.0;
        }

        let was_airborne = self.is_airborne();
        if input.jump() && self.jump_height <= 0.0 {
            self.jump_velocity = cfg.jump_velocity;
            self.is_on_ground = false;
            events.jumped = true;
        }

        if self.is_airborne() {
            self.jump_velocity = (self.jump_velocity + cfg.gravity * dt).min(cfg.max_fall_speed);
            self.jump_height -= self.jump_velocity * dt;

            if self.jump_height <= 0.0 {
                self.jump_height = 0.0;
                self.jump_velocity = 0.0;
                self.is_on_ground = true;
                events.landed = was_airborne;
                // A jump that ends on the frame it starts never left the ground.
                events.jumped &= was_airborne;
            }
        } else {
            self.is_on_ground = true;
        }

        if events.jumped {
            debug!(x = self.position.x, "player jumped");
        }
        if events.landed {
            debug!(x = self.position.x, "player landed");
        }
        events
    }

    /// Platformer step: gravity on world Y, snap to the floor.
    fn step_platformer(&mut self, dt: f32, input: &InputFrame) -> MotionEvents {
        let cfg = &self.config;
        let mut events = MotionEvents::default();
        let was_on_ground = self.is_on_ground;

        if input.jump() && self.is_on_ground {
            self.velocity.y = cfg.jump_velocity;
            self.is_on_ground = false;
            events.jumped = true;
        }

        if !self.is_on_ground {
            self.velocity.y = (self.velocity.y + cfg.gravity * dt).min(cfg.max_fall_speed);
        }

        self.position += self.velocity * dt;

        if self.position.y >= cfg.ground_level {
            self.position.y = cfg.ground_level;
            self.velocity.y = 0.0;
            self.is_on_ground = true;
            events.landed = !was_on_ground;
            events.jumped = false;
        } else {
            self.is_on_ground = false;
        }

        if events.jumped {
            debug!(x = self.position.x, "player jumped");
        }
        if events.landed {
            debug!(x = self.position.x, "player landed");
        }
        events
    }

    #[inline]
    fn is_airborne(&self) -> bool {
        self.jump_height != 0.0 || self.jump_velocity != 0.0
    }

    /// Current world position (top-left of the bounding box).
    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Current velocity.
    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Standing on the ground (not mid-jump).
    #[inline]
    pub fn is_on_ground(&self) -> bool {
        self.is_on_ground
    }

    /// Facing right (sticky: keeps the last horizontal direction).
    #[inline]
    pub fn is_facing_right(&self) -> bool {
        self.is_facing_right
    }

    /// Visual elevation (brawler).
    #[inline]
    pub fn jump_height(&self) -> f32 {
        self.jump_height
    }

    /// Elevation velocity (brawler).
    #[inline]
    pub fn jump_velocity(&self) -> f32 {
        self.jump_velocity
    }

    /// Active physics model.
    #[inline]
    pub fn mode(&self) -> PhysicsMode {
        self.config.mode
    }

    /// Collision box at `position`, fixed size.
    pub fn bounding_box(&self) -> Rect {
        Rect::at(self.position, self.config.width, self.config.height)
    }

    /// Where to draw the sprite: the bounding box raised by `jump_height`.
    pub fn draw_rect(&self) -> Rect {
        self.bounding_box().translate(Vec2::new(0.0, -self.jump_height))
    }
}

// =============================================================================
// TESTS
// =============================================================================
