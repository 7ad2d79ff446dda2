//! Axis-aligned rectangles and colours.
//!
//! The render sink only ever receives these two shapes of data.

use serde::{Serialize, Deserialize};

use super::vec2::Vec2;

/// Axis-aligned rectangle. `(x, y)` is the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width
    pub w: f32,
    /// Height
    pub h: f32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle of the given size with its top-left corner at `origin`.
    #[inline]
    pub fn at(origin: Vec2, w: f32, h: f32) -> Self {
        Self::new(origin.x, origin.y, w, h)
    }

    /// Top-left corner.
    #[inline]
    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Right edge.
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    /// Bottom edge.
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Centre point.
    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    /// Same size, moved by `offset`.
    #[inline]
    pub fn translate(&self, offset: Vec2) -> Self {
        Self::new(self.x + offset.x, self.y + offset.y, self.w, self.h)
    }

    /// Check whether two rectangles overlap (touching edges do not count).
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// RGBA colour, components in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
    /// Alpha
    pub a: f32,
}

impl Color {
    /// Opaque colour.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Colour with alpha.
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque white
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    /// Opaque black
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    /// Sky fill
    pub const SKY: Self = Self::rgb(0.53, 0.81, 0.92);
    /// Street/ground fill
    pub const GROUND: Self = Self::rgb(0.36, 0.33, 0.30);
    /// End-zone marker
    pub const END_ZONE: Self = Self::rgba(1.0, 0.84, 0.0, 0.6);
    /// Player placeholder
    pub const PLAYER: Self = Self::rgb(0.86, 0.20, 0.18);
    /// Dimmed overlay for pause/game-over screens
    pub const OVERLAY: Self = Self::rgba(0.0, 0.0, 0.0, 0.5);
    /// Drop shadow under a jumping character
    pub const SHADOW: Self = Self::rgba(0.0, 0.0, 0.0, 0.35);
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}
