//! # Streetline
//!
//! Core of a 2D side-scrolling beat-em-up: one player walking a
//! horizontally scrolling street from a start line to an end zone.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      STREETLINE CORE                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Geometry and hashing primitives           │
//! │  ├── vec2.rs     - 2D float vector, lerp                     │
//! │  ├── rect.rs     - Rectangles and colours                    │
//! │  ├── transform.rs- World → screen transform                  │
//! │  └── hash.rs     - State hashing for replay checks           │
//! │                                                              │
//! │  game/           - Frame logic                               │
//! │  ├── input.rs    - Key snapshots, edges, recordings          │
//! │  ├── state.rs    - Menu / Playing / Paused / GameOver        │
//! │  ├── player.rs   - Movement and jump physics                 │
//! │  ├── camera.rs   - Follow camera                             │
//! │  ├── level.rs    - Bounds and completion                     │
//! │  ├── tick.rs     - Frame orchestrator                        │
//! │  ├── render.rs   - Render sink contract                      │
//! │  └── events.rs   - Frame events                              │
//! │                                                              │
//! │  config.rs       - Tunables, JSON loading, validation        │
//! │  error.rs        - Error types                               │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Frame Order
//!
//! Input edges → state transition → (playing only) player → camera →
//! level completion → draw. The step takes the frame's wall-clock `dt`;
//! given the same `(dt, input)` sequence the run is reproducible, which
//! is what [`game::replay`] and [`Game::compute_hash`] check.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod config;
pub mod error;

// Re-export commonly used types
pub use crate::core::vec2::Vec2;
pub use crate::core::rect::{Color, Rect};
pub use crate::core::transform::ViewTransform;
pub use config::GameConfig;
pub use error::{ConfigError, RecordingError};
pub use game::input::{InputFrame, InputEdges, InputRecording};
pub use game::state::GameState;
pub use game::tick::{Game, FrameResult};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Nominal frame rate (Hz) used by the headless runner
pub const TICK_RATE: u32 = 60;
