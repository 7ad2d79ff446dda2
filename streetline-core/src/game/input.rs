//! Input Capture and Edge Detection
//!
//! The front end hands the core one raw snapshot per frame: which logical
//! keys are currently down. Transitions in the state machine need
//! *edges* (down now, up last frame), so the orchestrator keeps the
//! previous snapshot and derives an [`InputEdges`] value each frame.

use serde::{Serialize, Deserialize};

use crate::core::hash::{StateHash, StateHasher};
use crate::error::RecordingError;

// =============================================================================
// INPUT TYPES
// =============================================================================

/// Raw key-down state for a single frame.
///
/// One bit per logical key. Anything not set is "not pressed".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct InputFrame {
    /// Key flags (packed bits):
    /// - Bit 0: Move left
    /// - Bit 1: Move right
    /// - Bit 2: Move up
    /// - Bit 3: Move down
    /// - Bit 4: Jump
    /// - Bit 5: Pause
    /// - Bit 6: Confirm
    /// - Bit 7: Exit
    pub flags: u8,
}

impl InputFrame {
    /// Move left flag bit
    pub const LEFT: u8 = 0x01;
    /// Move right flag bit
    pub const RIGHT: u8 = 0x02;
    /// Move up flag bit
    pub const UP: u8 = 0x04;
    /// Move down flag bit
    pub const DOWN: u8 = 0x08;
    /// Jump flag bit
    pub const JUMP: u8 = 0x10;
    /// Pause flag bit
    pub const PAUSE: u8 = 0x20;
    /// Confirm flag bit
    pub const CONFIRM: u8 = 0x40;
    /// Exit flag bit
    pub const EXIT: u8 = 0x80;

    /// Create an empty input frame (nothing held).
    pub const fn new() -> Self {
        Self { flags: 0 }
    }

    /// Create from raw flag bits.
    pub const fn from_flags(flags: u8) -> Self {
        Self { flags }
    }

    /// Builder: also hold `flag`.
    pub const fn with(self, flag: u8) -> Self {
        Self { flags: self.flags | flag }
    }

    /// Check if a key is down.
    #[inline]
    pub fn is_down(&self, flag: u8) -> bool {
        self.flags & flag != 0
    }

    /// Set or clear a key.
    #[inline]
    pub fn set(&mut self, flag: u8, down: bool) {
        if down {
            self.flags |= flag;
        } else {
            self.flags &= !flag;
        }
    }

    /// Move left held.
    #[inline]
    pub fn left(&self) -> bool {
        self.is_down(Self::LEFT)
    }

    /// Move right held.
    #[inline]
    pub fn right(&self) -> bool {
        self.is_down(Self::RIGHT)
    }

    /// Move up held.
    #[inline]
    pub fn up(&self) -> bool {
        self.is_down(Self::UP)
    }

    /// Move down held.
    #[inline]
    pub fn down(&self) -> bool {
        self.is_down(Self::DOWN)
    }

    /// Jump held.
    #[inline]
    pub fn jump(&self) -> bool {
        self.is_down(Self::JUMP)
    }

    /// Exit held.
    #[inline]
    pub fn exit(&self) -> bool {
        self.is_down(Self::EXIT)
    }

    /// Horizontal axis: -1 left, +1 right, 0 for neither or both.
    #[inline]
    pub fn horizontal(&self) -> f32 {
        axis(self.left(), self.right())
    }

    /// Vertical axis: -1 up, +1 down, 0 for neither or both.
    #[inline]
    pub fn vertical(&self) -> f32 {
        axis(self.up(), self.down())
    }

    /// Check if this is an idle frame (nothing held).
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.flags == 0
    }
}

#[inline]
fn axis(negative: bool, positive: bool) -> f32 {
    match (negative, positive) {
        (true, false) => -1.0,
        (false, true) => 1.0,
        _ => 0.0,
    }
}

/// Keys that went down this frame.
///
/// Computed from the previous and current snapshots, never stored
/// globally: `pressed = current & !previous`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputEdges {
    pressed: u8,
}

impl InputEdges {
    /// Derive edges from two consecutive snapshots.
    #[inline]
    pub fn between(previous: InputFrame, current: InputFrame) -> Self {
        Self {
            pressed: current.flags & !previous.flags,
        }
    }

    /// Check whether `flag` went down this frame.
    #[inline]
    pub fn pressed(&self, flag: u8) -> bool {
        self.pressed & flag != 0
    }

    /// Confirm went down this frame.
    #[inline]
    pub fn confirm(&self) -> bool {
        self.pressed(InputFrame::CONFIRM)
    }

    /// Pause went down this frame.
    #[inline]
    pub fn pause(&self) -> bool {
        self.pressed(InputFrame::PAUSE)
    }

    /// Nothing went down this frame.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pressed == 0
    }
}

// =============================================================================
// INPUT RECORDING
// =============================================================================

/// Input change entry. Only stored when the snapshot changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputDelta {
    /// Frame index when this input state began
    pub frame: u32,
    /// The new input state
    pub input: InputFrame,
}

/// Recorded session: per-frame `dt` plus delta-compressed inputs.
///
/// Used for:
/// - Replay playback
/// - Verifying a replay reaches the same state hash
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct InputRecording {
    /// Elapsed time of every recorded frame
    frame_times: Vec<f32>,

    /// Delta-compressed input data.
    /// Only stores frames where input CHANGED.
    deltas: Vec<InputDelta>,

    /// Last recorded input (for delta comparison)
    #[serde(skip)]
    last_input: InputFrame,
}

impl InputRecording {
    /// Create an empty recording.
    pub fn new() -> Self {
        Self {
            frame_times: Vec::with_capacity(3600), // one minute at 60 Hz
            deltas: Vec::with_capacity(256),
            last_input: InputFrame::new(),
        }
    }

    /// Record one frame.
    ///
    /// The input is only stored if it changed from the previous frame.
    pub fn record(&mut self, dt: f32, input: InputFrame) {
        let frame = self.frame_times.len() as u32;
        self.frame_times.push(dt);

        if input != self.last_input {
            self.deltas.push(InputDelta { frame, input });
            self.last_input = input;
        }
    }

    /// Input held at a specific frame.
    ///
    /// Uses binary search over the deltas.
    pub fn input_at(&self, frame: u32) -> InputFrame {
        let idx = self.deltas.partition_point(|d| d.frame <= frame);
        if idx == 0 {
            InputFrame::new()
        } else {
            self.deltas[idx - 1].input
        }
    }

    /// Number of recorded frames.
    pub fn frame_count(&self) -> usize {
        self.frame_times.len()
    }

    /// Number of stored deltas.
    pub fn delta_count(&self) -> usize {
        self.deltas.len()
    }

    /// All deltas.
    pub fn deltas(&self) -> &[InputDelta] {
        &self.deltas
    }

    /// Iterate `(dt, input)` for every recorded frame.
    pub fn replay_iter(&self) -> ReplayIterator<'_> {
        ReplayIterator {
            recording: self,
            frame: 0,
            delta_idx: 0,
            current: InputFrame::new(),
        }
    }

    /// Hash of the full recording.
    pub fn compute_hash(&self) -> StateHash {
        let mut hasher = StateHasher::for_input_recording();
        hasher.update_u32(self.frame_times.len() as u32);
        for dt in &self.frame_times {
            hasher.update_f32(*dt);
        }
        for delta in &self.deltas {
            hasher.update_u32(delta.frame);
            hasher.update_u8(delta.input.flags);
        }
        hasher.finalize()
    }

    /// Encode with bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>, RecordingError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode with bincode and check the streams agree.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RecordingError> {
        let mut recording: Self = bincode::deserialize(bytes)?;

        let frames = recording.frame_times.len() as u32;
        let mut previous: Option<u32> = None;
        for delta in &recording.deltas {
            if delta.frame >= frames {
                return Err(RecordingError::Corrupt(format!(
                    "delta at frame {} beyond {} recorded frames",
                    delta.frame, frames
                )));
            }
            if previous.is_some_and(|p| p >= delta.frame) {
                return Err(RecordingError::Corrupt(format!(
                    "deltas out of order at frame {}",
                    delta.frame
                )));
            }
            previous = Some(delta.frame);
        }

        recording.last_input = recording
            .deltas
            .last()
            .map(|d| d.input)
            .unwrap_or_default();
        Ok(recording)
    }
}

/// Iterator for replaying inputs frame by frame.
pub struct ReplayIterator<'a> {
    recording: &'a InputRecording,
    frame: usize,
    delta_idx: usize,
    current: InputFrame,
}

impl Iterator for ReplayIterator<'_> {
    type Item = (f32, InputFrame);

    fn next(&mut self) -> Option<Self::Item> {
        let dt = *self.recording.frame_times.get(self.frame)?;

        while let Some(delta) = self.recording.deltas.get(self.delta_idx) {
            if delta.frame as usize <= self.frame {
                self.current = delta.input;
                self.delta_idx += 1;
            } else {
                break;
            }
        }

        self.frame += 1;
        Some((dt, self.current))
    }
}

// =============================================================================
// TESTS
// =============================================================================
