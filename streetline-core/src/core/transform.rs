//! World → screen transform.
//!
//! A 3x3 affine matrix in row-major order. The camera only ever produces
//! pure translations; front ends read the matrix as-is.

use serde::{Serialize, Deserialize};

use super::rect::Rect;
use super::vec2::Vec2;

/// Row-major 3x3 affine matrix.
///
/// ```text
/// | m[0] m[1] m[2] |   | x |
/// | m[3] m[4] m[5] | * | y |
/// |  0    0    1   |   | 1 |
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    /// Matrix elements, row-major, last row implied `[0, 0, 1]`.
    pub m: [f32; 9],
}

impl ViewTransform {
    /// Identity transform (screen space).
    pub const IDENTITY: Self = Self {
        m: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
    };

    /// Pure translation.
    pub const fn translation(offset: Vec2) -> Self {
        Self {
            m: [1.0, 0.0, offset.x, 0.0, 1.0, offset.y, 0.0, 0.0, 1.0],
        }
    }

    /// Translation component.
    #[inline]
    pub fn offset(&self) -> Vec2 {
        Vec2::new(self.m[2], self.m[5])
    }

    /// Transform a point.
    #[inline]
    pub fn apply(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            self.m[0] * p.x + self.m[1] * p.y + self.m[2],
            self.m[3] * p.x + self.m[4] * p.y + self.m[5],
        )
    }

    /// Transform a rectangle (axis-aligned transforms only).
    #[inline]
    pub fn apply_rect(&self, r: &Rect) -> Rect {
        let origin = self.apply(r.origin());
        Rect::new(origin.x, origin.y, r.w * self.m[0], r.h * self.m[4])
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
