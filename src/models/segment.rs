//! Sub-beat note segments and their per-beat weighted views

use serde::{Deserialize, Serialize};

/// A slice of a note that does not cross a beat boundary.
///
/// Produced once by the segment builder and read-only afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// MIDI pitch of the originating note
    pub pitch: i32,

    /// Pitch class (0-11)
    pub pitch_class: u8,

    /// Onset in beats
    pub onset: f64,

    /// Duration in beats; never spans a beat boundary
    pub duration: f64,

    /// Melodic-approach multiplier (0.8, 1.0 or 1.2) inherited from
    /// the originating note
    pub approach: f64,
}

/// A segment observed from a given evaluation beat.
///
/// Ephemeral: recomputed for every query beat by the salience model.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightedNote {
    pub pitch: i32,
    pub pitch_class: u8,
    pub onset: f64,

    /// Perceptual weight at the evaluation beat (>= 0)
    pub salience: f64,

    /// Time-decay factor applied, in [0, 1]
    pub decay: f64,
}
