//! Tunable constants of the salience and scoring model

use serde::{Deserialize, Serialize};

/// Fixed constants threaded through salience computation and scoring.
///
/// The defaults are the tuned production values; callers may override
/// them per analysis since nothing is process-global.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisParams {
    /// Per-beat salience decay away from a segment's home beat
    pub decay_rate: f64,

    /// Duration subtracted before weighting, so very short notes
    /// register only at the minimum salience
    pub passing_note_threshold: f64,

    /// Floor below which no note's pre-decay salience may fall
    pub min_salience: f64,

    /// Salience forgiven before a non-chord tone starts to penalize
    pub non_chord_tone_floor: f64,

    /// Flat per-beat penalty per unit of chord complexity
    pub complexity_penalty: f64,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            decay_rate: 0.3,
            passing_note_threshold: 0.125,
            min_salience: 0.025,
            non_chord_tone_floor: 0.05,
            complexity_penalty: 0.05,
        }
    }
}
