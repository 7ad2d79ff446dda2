//! Core primitives.
//!
//! Geometry and hashing types shared by the simulation and the render sink.

pub mod vec2;
pub mod rect;
pub mod transform;
pub mod hash;

// Re-export core types
pub use vec2::{Vec2, lerp};
pub use rect::{Rect, Color};
pub use transform::ViewTransform;
pub use hash::{StateHash, StateHasher, compute_state_hash};
