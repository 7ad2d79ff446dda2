//! Side-scrolling camera.
//!
//! Horizontal follow only: the ideal position centres the target in the
//! viewport, is clamped to the level, and the camera eases toward it by a
//! fixed fraction every frame. The fraction is per frame, not per second,
//! so the easing is frame-rate dependent.

use serde::{Serialize, Deserialize};

use crate::config::{CameraConfig, ViewportConfig};
use crate::core::rect::Rect;
use crate::core::transform::ViewTransform;
use crate::core::vec2::{lerp, Vec2};
use crate::game::level::Level;

/// Follow camera.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Camera {
    position: Vec2,
    viewport_width: f32,
    viewport_height: f32,
    follow_speed: f32,
    min_x: f32,
    max_x: f32,
}

impl Camera {
    /// Create a camera at the origin.
    ///
    /// If `max_x < min_x` the range collapses to `min_x`.
    pub fn new(viewport: ViewportConfig, follow_speed: f32, min_x: f32, max_x: f32) -> Self {
        Self {
            position: Vec2::ZERO,
            viewport_width: viewport.width,
            viewport_height: viewport.height,
            follow_speed,
            min_x,
            max_x: max_x.max(min_x),
        }
    }

    /// Camera whose range keeps the viewport inside `level`.
    pub fn for_level(viewport: ViewportConfig, config: CameraConfig, level: &Level) -> Self {
        Self::new(
            viewport,
            config.follow_speed,
            level.start_x(),
            level.end_x() - viewport.width,
        )
    }

    /// Ease toward the clamped ideal position for `target`.
    pub fn follow(&mut self, target: Vec2) {
        let ideal_x = (target.x - self.viewport_width / 2.0).clamp(self.min_x, self.max_x);
        self.position.x = lerp(self.position.x, ideal_x, self.follow_speed);
        self.position.y = 0.0;
    }

    /// World → screen: translate by `-position`.
    pub fn transform(&self) -> ViewTransform {
        ViewTransform::translation(-self.position)
    }

    /// World-space rectangle currently on screen.
    pub fn visible_area(&self) -> Rect {
        Rect::at(self.position, self.viewport_width, self.viewport_height)
    }

    /// Snap to the origin.
    pub fn reset(&mut self) {
        self.position = Vec2::ZERO;
    }

    /// Snap to `position` without smoothing or clamping.
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Current position (top-left of the visible area).
    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Smallest x the camera eases toward.
    #[inline]
    pub fn min_x(&self) -> f32 {
        self.min_x
    }

    /// Largest x the camera eases toward.
    #[inline]
    pub fn max_x(&self) -> f32 {
        self.max_x
    }

    /// Lerp coefficient.
    #[inline]
    pub fn follow_speed(&self) -> f32 {
        self.follow_speed
    }
}
