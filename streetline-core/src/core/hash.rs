//! State Hashing for Replay Verification
//!
//! Provides hashing of game state so a recorded session can be replayed
//! and compared against the recorded run.
//!
//! Floats are hashed by their bit pattern: two runs only match if they
//! performed the same arithmetic in the same order.

use sha2::{Sha256, Digest};
use super::vec2::Vec2;

/// SHA-256 digest
pub type StateHash = [u8; 32];

/// Hasher for game state.
///
/// Wraps SHA-256 with helpers for the simulation types.
/// Order of updates is significant.
pub struct StateHasher {
    hasher: Sha256,
}

impl StateHasher {
    /// Hasher whose output is bound to `domain`.
    pub fn new(domain: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        Self { hasher }
    }

    /// Create hasher for orchestrator state.
    pub fn for_game_state() -> Self {
        Self::new(b"STREETLINE_STATE_V1")
    }

    /// Create hasher for an input recording.
    pub fn for_input_recording() -> Self {
        Self::new(b"STREETLINE_INPUTS_V1")
    }

    /// Feed one byte.
    #[inline]
    pub fn update_u8(&mut self, value: u8) {
        self.hasher.update([value]);
    }

    /// Feed a `u32`, little-endian.
    #[inline]
    pub fn update_u32(&mut self, value: u32) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Feed a `u64`, little-endian.
    #[inline]
    pub fn update_u64(&mut self, value: u64) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with an f32 (bit pattern, little-endian).
    #[inline]
    pub fn update_f32(&mut self, value: f32) {
        self.hasher.update(value.to_bits().to_le_bytes());
    }

    /// Update with a Vec2.
    #[inline]
    pub fn update_vec2(&mut self, value: Vec2) {
        self.update_f32(value.x);
        self.update_f32(value.y);
    }

    /// Feed a flag as one byte.
    #[inline]
    pub fn update_bool(&mut self, value: bool) {
        self.update_u8(value as u8);
    }

    /// Consume the hasher.
    pub fn finalize(self) -> StateHash {
        self.hasher.finalize().into()
    }
}

/// Compute state hash for replay verification.
///
/// Called by `Game::compute_hash()`. The closure adds state-specific data
/// after the frame counter.
pub fn compute_state_hash<F>(frame: u64, add_state: F) -> StateHash
where
    F: FnOnce(&mut StateHasher),
{
    let mut hasher = StateHasher::for_game_state();
    hasher.update_u64(frame);
    add_state(&mut hasher);
    hasher.finalize()
}
