//! Game Logic Module
//!
//! Everything the frame loop touches. No windowing, no audio, no pixels.
//!
//! ## Module Structure
//!
//! - `input`: Key snapshots, edge detection, input recording
//! - `state`: Screen state machine and its transition function
//! - `player`: Player movement (beat-em-up and platformer models)
//! - `camera`: Horizontal follow camera
//! - `level`: Level bounds, spawn point, completion latch
//! - `tick`: Frame orchestrator
//! - `render`: Render sink contract
//! - `events`: Game events for logging and replay comparison

pub mod input;
pub mod state;
pub mod player;
pub mod camera;
pub mod level;
pub mod tick;
pub mod render;
pub mod events;

// Re-export key types
pub use input::{InputFrame, InputEdges, InputRecording};
pub use state::{GameState, Trigger};
pub use player::{PhysicsMode, Player};
pub use camera::Camera;
pub use level::Level;
pub use tick::{Game, FrameResult, SceneTextures, replay};
pub use render::{RenderSink, DrawList, DrawRect, Label, TextureId};
pub use events::{GameEvent, GameEventData};
